//! AWS Lambda handler for dashboard recomputation
//!
//! Accepts dashboard inputs as JSON through a Lambda Function URL and returns
//! the full report: metrics, scenario projections and customer flows.

use std::time::Instant;

use aws_lambda_events::http::{HeaderMap, HeaderValue};
use aws_lambda_events::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use startup_metrics::{recompute, DashboardConfig, DashboardInputs, DashboardReport};

/// Request body; every field falls back to its default
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardRequest {
    pub inputs: DashboardInputs,
    /// May lower the horizon limit; it cannot raise it past the projection ceiling
    pub config: DashboardConfig,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub report: DashboardReport,
    pub execution_time_ms: u64,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static("POST, OPTIONS"));
    headers.insert("access-control-allow-headers", HeaderValue::from_static("Content-Type"));
    headers
}

fn response(status: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code: status,
        headers: cors_headers(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status: i64, error: serde_json::Value) -> Result<LambdaFunctionUrlResponse, Error> {
    let body = serde_json::to_string(&json!({ "error": error }))?;
    Ok(response(status, Some(body)))
}

/// Build the HTTP response for one request
fn respond(
    method: Option<&str>,
    body: Option<&str>,
    is_base64_encoded: bool,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = Instant::now();

    // CORS preflight
    if method == Some("OPTIONS") {
        return Ok(response(200, None));
    }

    if is_base64_encoded {
        return error_response(400, json!("Base64-encoded bodies are not supported"));
    }

    let parsed: DashboardRequest = match serde_json::from_str(body.unwrap_or("{}")) {
        Ok(r) => r,
        Err(e) => {
            warn!("invalid request body: {}", e);
            return error_response(400, json!(format!("Invalid JSON: {}", e)));
        }
    };

    let report = match recompute(&parsed.inputs, &parsed.config) {
        Ok(report) => report,
        Err(e) => return error_response(400, serde_json::to_value(&e)?),
    };

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "recomputed {} months with {} issue(s) in {} ms",
        report.projection_months,
        report.issues().len(),
        execution_time_ms
    );

    let body = serde_json::to_string(&DashboardResponse { report, execution_time_ms })?;
    Ok(response(200, Some(body)))
}

async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let request = event.payload;
    respond(
        request.request_context.http.method.as_deref(),
        request.body.as_deref(),
        request.is_base64_encoded,
    )
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(resp: &LambdaFunctionUrlResponse) -> serde_json::Value {
        serde_json::from_str(resp.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_preflight_has_no_body() {
        let resp = respond(Some("OPTIONS"), None, false).unwrap();
        assert_eq!(resp.status_code, 200);
        assert!(resp.body.is_none());
        assert_eq!(resp.headers.get("access-control-allow-origin").unwrap().to_str().unwrap(), "*");
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        let resp = respond(Some("POST"), None, false).unwrap();
        assert_eq!(resp.status_code, 200);
        let json = body_json(&resp);
        assert_eq!(json["report"]["projection_months"], 12);
        assert_eq!(json["report"]["customers"]["blended_cac"]["value"], 140.0);
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        let resp = respond(Some("POST"), Some("{not json"), false).unwrap();
        assert_eq!(resp.status_code, 400);
        let error = body_json(&resp)["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid JSON"));
    }

    #[test]
    fn test_base64_body_is_bad_request() {
        let resp = respond(Some("POST"), Some("e30="), true).unwrap();
        assert_eq!(resp.status_code, 400);
    }

    #[test]
    fn test_invalid_input_returns_structured_error() {
        let body = r#"{"inputs": {"financial": {"cash_balance": -1.0}}}"#;
        let resp = respond(Some("POST"), Some(body), false).unwrap();
        assert_eq!(resp.status_code, 400);
        let json = body_json(&resp);
        assert_eq!(json["error"]["kind"], "invalid_input");
        assert_eq!(json["error"]["field"], "cash_balance");
    }

    #[test]
    fn test_config_cannot_raise_horizon_ceiling() {
        let body = r#"{"config": {"max_projection_months": 4294967295},
                       "inputs": {"projection_months": 4000000000}}"#;
        let resp = respond(Some("POST"), Some(body), false).unwrap();
        assert_eq!(resp.status_code, 400);
        assert_eq!(body_json(&resp)["error"]["field"], "projection_months");
    }
}
