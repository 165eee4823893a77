//! One full dashboard recomputation
//!
//! `recompute` is the single entry point a host calls on every input change.
//! It takes an immutable input snapshot and returns every metric and series
//! the charts need; nothing is retained between calls.

use log::{debug, warn};
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::MetricsError;
use crate::inputs::{DashboardInputs, Segment};
use crate::metrics::{
    arpu, blended_cac, burn_rate, mom_growth, runway_months, weighted_average, Metric, Runway,
    UnitEconomics,
};
use crate::projection::{
    period_labels, project_customer_flow, runway_curve, CustomerFlow, GrowthParameters,
    ProjectionSeries,
};
use crate::scenario::{CashScenario, ScenarioEngine, ScenarioRates, ScenarioResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub cash_balance: f64,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub burn_rate: f64,
    pub runway: Runway,
    pub mom_growth: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub economics: UnitEconomics,
    /// Sum over segments; absent when no segments were entered
    pub total_customers: Option<f64>,
    pub arpu: Metric,
    /// Churn and CAC across segments, weighted by segment size
    pub blended_churn: Metric,
    pub blended_cac: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub segment: Segment,
    pub total_customers: f64,
    pub economics: UnitEconomics,
    pub flow: Result<CustomerFlow, MetricsError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub projection_months: u32,
    /// `YYYY-MM` per period, empty when the inputs carry no start date
    pub period_labels: Vec<String>,
    pub financial: FinancialSummary,
    pub customers: CustomerSummary,
    pub segments: Vec<SegmentReport>,
    pub revenue_scenarios: ScenarioResult,
    pub cash_scenarios: Vec<CashScenario>,
    pub runway_curve: ProjectionSeries,
}

impl DashboardReport {
    /// Every per-scenario or per-segment failure, labelled by where it occurred
    pub fn issues(&self) -> Vec<(String, &MetricsError)> {
        let mut issues: Vec<(String, &MetricsError)> = self
            .revenue_scenarios
            .failures()
            .into_iter()
            .map(|(scenario, e)| (format!("revenue/{}", scenario.as_str()), e))
            .collect();

        for cash in &self.cash_scenarios {
            if let Err(e) = &cash.cash {
                issues.push((format!("cash/{}", cash.scenario.as_str()), e));
            }
        }
        for segment in &self.segments {
            if let Err(e) = &segment.flow {
                issues.push((format!("customers/{}", segment.segment.as_str()), e));
            }
        }
        issues
    }
}

/// Recompute every metric and projection from an input snapshot
///
/// Invalid top-level inputs are rejected before any projection runs.
/// Undefined ratios and invalid per-scenario rates are reported in place.
pub fn recompute(
    inputs: &DashboardInputs,
    config: &DashboardConfig,
) -> Result<DashboardReport, MetricsError> {
    if let Err(e) = inputs.validate(config.horizon_limit()) {
        warn!("rejected dashboard inputs: {}", e);
        return Err(e);
    }

    let months = inputs.projection_months;
    let financial = &inputs.financial;
    let thresholds = config.thresholds();

    let burn = burn_rate(financial.monthly_revenue, financial.monthly_expenses);
    let financial_summary = FinancialSummary {
        cash_balance: financial.cash_balance,
        monthly_revenue: financial.monthly_revenue,
        monthly_expenses: financial.monthly_expenses,
        burn_rate: burn,
        runway: runway_months(financial.cash_balance, burn),
        mom_growth: match inputs.previous_revenue {
            Some(previous) => Metric::from(mom_growth(financial.monthly_revenue, previous)),
            None => Metric::from(Err::<f64, _>(MetricsError::division_undefined(
                "mom_growth",
                "previous_revenue",
            ))),
        },
    };

    let segment_sizes: Vec<(f64, f64)> = inputs
        .segments
        .iter()
        .map(|s| (s.customers.churn_rate, s.total_customers))
        .collect();
    let total_customers = if inputs.segments.is_empty() {
        None
    } else {
        Some(segment_sizes.iter().map(|(_, total)| total).sum::<f64>())
    };

    let customer_summary = CustomerSummary {
        economics: UnitEconomics::evaluate(&inputs.customers, &thresholds),
        total_customers,
        arpu: match total_customers {
            Some(total) => Metric::from(arpu(financial.monthly_revenue, total)),
            None => Metric::from(Err::<f64, _>(MetricsError::division_undefined(
                "arpu",
                "total_customers",
            ))),
        },
        blended_churn: Metric::from(weighted_average(&segment_sizes)),
        blended_cac: Metric::from(blended_cac(&inputs.segments)),
    };

    let segments = inputs
        .segments
        .iter()
        .map(|s| {
            let params = GrowthParameters::new(
                s.acquisition_growth.model,
                s.acquisition_growth.rate,
                months,
            );
            SegmentReport {
                segment: s.segment,
                total_customers: s.total_customers,
                economics: UnitEconomics::evaluate(&s.customers, &thresholds),
                flow: project_customer_flow(
                    s.total_customers,
                    s.customers.new_customers_per_month,
                    s.customers.churn_rate,
                    &params,
                ),
            }
        })
        .collect();

    let engine = ScenarioEngine::with_adjustments(config.scenarios);
    let growth = &inputs.revenue_growth;
    let revenue_scenarios = engine.run(
        financial.monthly_revenue,
        growth.model,
        &ScenarioRates::from(growth),
        months,
    )?;
    let cash_scenarios = engine.run_cash(financial, growth, months, config.expense_growth_rate)?;

    let labels = inputs
        .start_date
        .map(|start| period_labels(start, months))
        .unwrap_or_default();

    let report = DashboardReport {
        projection_months: months,
        period_labels: labels,
        financial: financial_summary,
        customers: customer_summary,
        segments,
        revenue_scenarios,
        cash_scenarios,
        runway_curve: runway_curve(financial.cash_balance, burn, months),
    };

    debug!(
        "recomputed dashboard: burn {:.2}, runway {}, {} issue(s)",
        burn,
        report.financial.runway.display(),
        report.issues().len()
    );
    Ok(report)
}
