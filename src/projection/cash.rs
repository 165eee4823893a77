//! Cash balance projections

use super::growth::MAX_PROJECTION_PERIODS;
use super::series::ProjectionSeries;
use crate::error::MetricsError;
use crate::metrics::{runway_months, Runway};

/// Cash balance declining at a constant burn rate
///
/// Runs until the runway's last whole month, capped at `horizon` (itself
/// capped at [`MAX_PROJECTION_PERIODS`]). With no burn the balance stays
/// flat for the whole horizon.
pub fn runway_curve(cash_balance: f64, burn_rate: f64, horizon: u32) -> ProjectionSeries {
    let horizon = horizon.min(MAX_PROJECTION_PERIODS);
    let months = match runway_months(cash_balance, burn_rate) {
        Runway::Months(m) => (m.floor().max(0.0) as u32).min(horizon),
        Runway::Unbounded => horizon,
    };
    let burn = burn_rate.max(0.0);

    let values = (0..=months)
        .map(|month| cash_balance - burn * month as f64)
        .collect();
    ProjectionSeries::from_values(values)
}

/// Cash balance driven by a projected revenue series and growing expenses
///
/// cash[0] is the opening balance; each month subtracts that month's burn,
/// where expenses grow by `expense_growth` per month and projected revenue
/// is floored at zero.
pub fn project_cash(
    cash_balance: f64,
    revenue: &ProjectionSeries,
    monthly_expenses: f64,
    expense_growth: f64,
) -> Result<ProjectionSeries, MetricsError> {
    if revenue.is_empty() {
        return Err(MetricsError::invalid_input(
            "revenue",
            "revenue projection has no periods",
        ));
    }
    if !expense_growth.is_finite() || expense_growth <= -1.0 {
        return Err(MetricsError::InvalidRate {
            field: "expense_growth_rate",
            rate: expense_growth,
        });
    }

    let mut values = Vec::with_capacity(revenue.len());
    let mut cash = cash_balance;
    let mut expenses = monthly_expenses;

    for (index, point) in revenue.points().iter().enumerate() {
        values.push(cash);
        if index + 1 == revenue.len() {
            break;
        }
        cash -= expenses - point.value.max(0.0);
        expenses *= 1.0 + expense_growth;
    }

    Ok(ProjectionSeries::from_values(values))
}
