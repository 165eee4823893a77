//! Monthly customer flow: acquisitions, churn and resulting customer count

use serde::Serialize;

use super::growth::{project_as, GrowthParameters};
use super::series::ProjectionSeries;
use crate::error::{require_fraction, MetricsError};

/// New, churned and total customers per period
///
/// Period 0 is the opening position (no flow). Counts are whole customers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerFlow {
    pub new: ProjectionSeries,
    pub churned: ProjectionSeries,
    pub total: ProjectionSeries,
}

impl CustomerFlow {
    /// Net change in customers over the whole horizon
    pub fn net_change(&self) -> f64 {
        self.total.final_value().unwrap_or(0.0) - self.total.start_value().unwrap_or(0.0)
    }
}

/// Project a customer base forward
///
/// Monthly acquisitions start at `new_per_month` and evolve under
/// `acquisition`; each month churns `floor(total * churn_rate)` customers
/// and the total never drops below zero.
pub fn project_customer_flow(
    opening_customers: f64,
    new_per_month: f64,
    churn_rate: f64,
    acquisition: &GrowthParameters,
) -> Result<CustomerFlow, MetricsError> {
    require_fraction("churn_rate", churn_rate)?;
    let acquisitions = project_as(new_per_month, acquisition, "acquisition_growth")?;

    let periods = acquisition.periods as usize;
    let mut new = Vec::with_capacity(periods + 1);
    let mut churned = Vec::with_capacity(periods + 1);
    let mut total = Vec::with_capacity(periods + 1);

    let mut current = opening_customers.floor().max(0.0);
    new.push(0.0);
    churned.push(0.0);
    total.push(current);

    for month in 1..=periods {
        let acquired = acquisitions
            .value_at(month as u32 - 1)
            .unwrap_or(0.0)
            .max(0.0)
            .floor();
        let lost = (current * churn_rate).floor();
        current = (current + acquired - lost).max(0.0);

        new.push(acquired);
        churned.push(lost);
        total.push(current);
    }

    Ok(CustomerFlow {
        new: ProjectionSeries::from_values(new),
        churned: ProjectionSeries::from_values(churned),
        total: ProjectionSeries::from_values(total),
    })
}
