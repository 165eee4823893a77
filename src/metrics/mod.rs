//! Metric formulas, customer unit economics and health labels

mod formulas;
mod health;
mod customers;

pub use formulas::{
    arpu, burn_rate, cac, churn_rate, lifetime_months, ltv, ltv_cac_ratio, mom_growth,
    runway_months, Runway,
};
pub use health::{
    classify_ltv_cac, ChurnHealth, LtvCacHealth, DEFAULT_CHURN_ATTENTION,
    DEFAULT_CHURN_EXCELLENT, DEFAULT_HEALTHY_LTV_CAC,
};
pub use customers::{blended_cac, weighted_average, HealthThresholds, UnitEconomics};

use serde::Serialize;

use crate::error::MetricsError;

/// Display sentinel for metrics whose formula is undefined
pub const NOT_AVAILABLE: &str = "N/A";

/// A metric result as handed to the presentation layer
///
/// Exactly one of `value` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MetricsError>,
}

impl Metric {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }

    /// Two-decimal rendering, or the "N/A" sentinel
    pub fn display(&self) -> String {
        self.display_with(|v| format!("{:.2}", v))
    }

    pub fn display_with(&self, fmt: impl Fn(f64) -> String) -> String {
        match self.value {
            Some(v) => fmt(v),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<Result<f64, MetricsError>> for Metric {
    fn from(result: Result<f64, MetricsError>) -> Self {
        match result {
            Ok(value) => Metric { value: Some(value), error: None },
            Err(error) => Metric { value: None, error: Some(error) },
        }
    }
}
