//! Error taxonomy for metric formulas, projections and input validation

use serde::Serialize;
use thiserror::Error;

/// Structured failure reported to the presentation layer.
///
/// Every variant names the offending field so a host can attach the message
/// to the right input or chart instead of showing a generic failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricsError {
    /// A formula's denominator is zero (churn = 0, customers = 0, CAC = 0)
    #[error("{metric} is undefined: {field} is zero")]
    DivisionUndefined {
        metric: &'static str,
        field: &'static str,
    },

    /// Exponential growth rate at or below -100%
    #[error("invalid {field} {rate}: exponential growth requires a rate greater than -1")]
    InvalidRate { field: &'static str, rate: f64 },

    /// Negative amounts, fractions outside [0, 1], non-positive periods
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl MetricsError {
    pub fn division_undefined(metric: &'static str, field: &'static str) -> Self {
        MetricsError::DivisionUndefined { metric, field }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        MetricsError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the input field that caused the failure
    pub fn field(&self) -> &'static str {
        match self {
            MetricsError::DivisionUndefined { field, .. }
            | MetricsError::InvalidRate { field, .. }
            | MetricsError::InvalidInput { field, .. } => field,
        }
    }
}

/// Require a finite, non-negative amount
pub fn require_non_negative(field: &'static str, value: f64) -> Result<f64, MetricsError> {
    if !value.is_finite() {
        return Err(MetricsError::invalid_input(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(MetricsError::invalid_input(
            field,
            format!("must not be negative (got {})", value),
        ));
    }
    Ok(value)
}

/// Require a fraction in [0, 1]
pub fn require_fraction(field: &'static str, value: f64) -> Result<f64, MetricsError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(MetricsError::invalid_input(
            field,
            format!("must be a fraction between 0 and 1 (got {})", value),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reports_offending_field() {
        let err = MetricsError::division_undefined("ltv", "churn_rate");
        assert_eq!(err.field(), "churn_rate");
        assert_eq!(err.to_string(), "ltv is undefined: churn_rate is zero");
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let err = MetricsError::InvalidRate { field: "worst_rate", rate: -1.0 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "invalid_rate");
        assert_eq!(json["field"], "worst_rate");
        assert_eq!(json["rate"], -1.0);
    }

    #[test]
    fn test_validators() {
        assert!(require_non_negative("cash_balance", 0.0).is_ok());
        assert!(require_non_negative("cash_balance", -0.01).is_err());
        assert!(require_non_negative("cash_balance", f64::NAN).is_err());
        assert!(require_fraction("churn_rate", 1.0).is_ok());
        assert!(require_fraction("churn_rate", 1.5).is_err());
    }
}
