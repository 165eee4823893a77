//! Unit economics for a customer base or a single segment

use serde::Serialize;

use super::formulas::{cac, lifetime_months, ltv, ltv_cac_ratio};
use super::health::{ChurnHealth, LtvCacHealth};
use super::Metric;
use crate::error::MetricsError;
use crate::inputs::{CustomerInputs, SegmentInputs};

/// Thresholds used to label customer metrics
#[derive(Debug, Clone, Copy)]
pub struct HealthThresholds {
    pub healthy_ltv_cac: f64,
    pub churn_excellent: f64,
    pub churn_attention: f64,
}

/// LTV, CAC and their ratio, each independently defined or undefined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitEconomics {
    pub ltv: Metric,
    pub cac: Metric,
    pub ltv_cac_ratio: Metric,
    pub lifetime_months: Metric,
    pub ltv_cac_health: Option<LtvCacHealth>,
    pub churn_health: ChurnHealth,
}

impl UnitEconomics {
    /// Evaluate every metric; an undefined one never blocks the others
    pub fn evaluate(customers: &CustomerInputs, thresholds: &HealthThresholds) -> Self {
        let ltv_result = ltv(customers.average_revenue_per_customer, customers.churn_rate);
        let cac_result = cac(customers.acquisition_cost, customers.new_customers_per_month);

        let ratio_result = match (&ltv_result, &cac_result) {
            (Ok(l), Ok(c)) => ltv_cac_ratio(*l, *c),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };

        let ltv_cac_health = ratio_result
            .as_ref()
            .ok()
            .map(|r| LtvCacHealth::classify(*r, thresholds.healthy_ltv_cac));

        Self {
            ltv: Metric::from(ltv_result),
            cac: Metric::from(cac_result),
            ltv_cac_ratio: Metric::from(ratio_result),
            lifetime_months: Metric::from(lifetime_months(customers.churn_rate)),
            ltv_cac_health,
            churn_health: ChurnHealth::classify(
                customers.churn_rate,
                thresholds.churn_excellent,
                thresholds.churn_attention,
            ),
        }
    }
}

/// Weighted average of `(value, weight)` pairs, e.g. churn blended by segment size
pub fn weighted_average(pairs: &[(f64, f64)]) -> Result<f64, MetricsError> {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if total_weight == 0.0 {
        return Err(MetricsError::division_undefined(
            "weighted_average",
            "total_customers",
        ));
    }
    let weighted: f64 = pairs.iter().map(|(v, w)| v * w).sum();
    Ok(weighted / total_weight)
}

/// CAC blended across segments, weighted by segment size
///
/// Segments without new customers have no CAC and are left out.
pub fn blended_cac(segments: &[SegmentInputs]) -> Result<f64, MetricsError> {
    let pairs: Vec<(f64, f64)> = segments
        .iter()
        .filter_map(|s| {
            cac(s.customers.acquisition_cost, s.customers.new_customers_per_month)
                .ok()
                .map(|c| (c, s.total_customers))
        })
        .collect();
    if pairs.is_empty() {
        return Err(MetricsError::division_undefined(
            "blended_cac",
            "new_customers_per_month",
        ));
    }
    weighted_average(&pairs)
}
