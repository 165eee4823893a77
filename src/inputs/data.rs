//! Input snapshot types captured from the dashboard form
//!
//! Every field is a plain scalar. A snapshot is immutable for the duration
//! of one recomputation; defaults mirror the form's initial values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{require_fraction, require_non_negative, MetricsError};
use crate::projection::{GrowthModel, MAX_PROJECTION_PERIODS};

/// Cash position and monthly P&L
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialInputs {
    pub cash_balance: f64,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
}

impl Default for FinancialInputs {
    fn default() -> Self {
        Self {
            cash_balance: 100_000.0,
            monthly_revenue: 10_000.0,
            monthly_expenses: 20_000.0,
        }
    }
}

impl FinancialInputs {
    pub fn validate(&self) -> Result<(), MetricsError> {
        require_non_negative("cash_balance", self.cash_balance)?;
        require_non_negative("monthly_revenue", self.monthly_revenue)?;
        require_non_negative("monthly_expenses", self.monthly_expenses)?;
        Ok(())
    }
}

/// Acquisition and retention figures for a customer base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInputs {
    pub new_customers_per_month: f64,
    /// Monthly churn as a fraction in [0, 1]
    pub churn_rate: f64,
    /// Total monthly acquisition spend
    pub acquisition_cost: f64,
    pub average_revenue_per_customer: f64,
}

impl Default for CustomerInputs {
    fn default() -> Self {
        Self {
            new_customers_per_month: 20.0,
            churn_rate: 0.044,
            acquisition_cost: 3_250.0,
            average_revenue_per_customer: 100.0,
        }
    }
}

impl CustomerInputs {
    pub fn validate(&self) -> Result<(), MetricsError> {
        require_non_negative("new_customers_per_month", self.new_customers_per_month)?;
        require_fraction("churn_rate", self.churn_rate)?;
        require_non_negative("acquisition_cost", self.acquisition_cost)?;
        require_non_negative(
            "average_revenue_per_customer",
            self.average_revenue_per_customer,
        )?;
        Ok(())
    }
}

/// Customer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    B2B,
    B2C,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::B2B => "B2B",
            Segment::B2C => "B2C",
        }
    }
}

/// Growth model and rate for a single projected quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthChoice {
    pub model: GrowthModel,
    pub rate: f64,
}

impl Default for GrowthChoice {
    fn default() -> Self {
        Self {
            model: GrowthModel::Fixed,
            rate: 0.0,
        }
    }
}

/// One customer segment with its own acquisition growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentInputs {
    pub segment: Segment,
    pub total_customers: f64,
    #[serde(default)]
    pub customers: CustomerInputs,
    /// How monthly new-customer acquisitions grow over the horizon
    #[serde(default)]
    pub acquisition_growth: GrowthChoice,
}

impl SegmentInputs {
    pub fn validate(&self) -> Result<(), MetricsError> {
        require_non_negative("total_customers", self.total_customers)?;
        self.customers.validate()?;
        if self.customers.new_customers_per_month > self.total_customers {
            return Err(MetricsError::invalid_input(
                "new_customers_per_month",
                format!(
                    "{} new customers exceeds the {} segment total of {}",
                    self.customers.new_customers_per_month,
                    self.segment.as_str(),
                    self.total_customers
                ),
            ));
        }
        if !self.acquisition_growth.rate.is_finite() {
            return Err(MetricsError::invalid_input(
                "acquisition_growth",
                "rate must be a finite number",
            ));
        }
        Ok(())
    }

    fn default_segments() -> Vec<Self> {
        vec![
            SegmentInputs {
                segment: Segment::B2B,
                total_customers: 20.0,
                customers: CustomerInputs {
                    new_customers_per_month: 5.0,
                    churn_rate: 0.02,
                    acquisition_cost: 2_500.0,
                    average_revenue_per_customer: 100.0,
                },
                acquisition_growth: GrowthChoice::default(),
            },
            SegmentInputs {
                segment: Segment::B2C,
                total_customers: 80.0,
                customers: CustomerInputs {
                    new_customers_per_month: 15.0,
                    churn_rate: 0.05,
                    acquisition_cost: 750.0,
                    average_revenue_per_customer: 100.0,
                },
                acquisition_growth: GrowthChoice::default(),
            },
        ]
    }
}

/// Growth model with one rate per scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthSelection {
    pub model: GrowthModel,
    pub best_rate: f64,
    pub normal_rate: f64,
    pub worst_rate: f64,
}

impl Default for GrowthSelection {
    fn default() -> Self {
        Self {
            model: GrowthModel::Exponential,
            best_rate: 0.15,
            normal_rate: 0.10,
            worst_rate: 0.05,
        }
    }
}

/// Complete input snapshot for one dashboard recomputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardInputs {
    pub financial: FinancialInputs,
    /// Last month's revenue, for month-over-month growth
    pub previous_revenue: Option<f64>,
    pub customers: CustomerInputs,
    pub segments: Vec<SegmentInputs>,
    pub revenue_growth: GrowthSelection,
    pub projection_months: u32,
    /// Calendar month of period 0; labels are omitted when absent
    pub start_date: Option<NaiveDate>,
}

impl Default for DashboardInputs {
    fn default() -> Self {
        Self {
            financial: FinancialInputs::default(),
            previous_revenue: Some(8_000.0),
            customers: CustomerInputs::default(),
            segments: SegmentInputs::default_segments(),
            revenue_growth: GrowthSelection::default(),
            projection_months: 12,
            start_date: None,
        }
    }
}

impl DashboardInputs {
    /// Reject invalid top-level inputs before any projection runs
    ///
    /// `max_projection_months` is bounded by [`MAX_PROJECTION_PERIODS`].
    /// Per-scenario growth rates are not checked here; an invalid rate only
    /// fails its own scenario.
    pub fn validate(&self, max_projection_months: u32) -> Result<(), MetricsError> {
        let max_projection_months = max_projection_months.min(MAX_PROJECTION_PERIODS);
        self.financial.validate()?;
        if let Some(previous) = self.previous_revenue {
            require_non_negative("previous_revenue", previous)?;
        }
        self.customers.validate()?;
        for segment in &self.segments {
            segment.validate()?;
        }

        if self.projection_months == 0 {
            return Err(MetricsError::invalid_input(
                "projection_months",
                "must be a positive number of months",
            ));
        }
        if self.projection_months > max_projection_months {
            return Err(MetricsError::invalid_input(
                "projection_months",
                format!(
                    "{} exceeds the maximum of {}",
                    self.projection_months, max_projection_months
                ),
            ));
        }

        let growth = &self.revenue_growth;
        for (field, rate) in [
            ("best_rate", growth.best_rate),
            ("normal_rate", growth.normal_rate),
            ("worst_rate", growth.worst_rate),
        ] {
            if !rate.is_finite() {
                return Err(MetricsError::invalid_input(field, "must be a finite number"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DashboardInputs::default().validate(120).is_ok());
    }

    #[test]
    fn test_negative_cash_rejected() {
        let mut inputs = DashboardInputs::default();
        inputs.financial.cash_balance = -1.0;
        let err = inputs.validate(120).unwrap_err();
        assert_eq!(err.field(), "cash_balance");
    }

    #[test]
    fn test_zero_and_excessive_months_rejected() {
        let mut inputs = DashboardInputs::default();
        inputs.projection_months = 0;
        assert_eq!(inputs.validate(120).unwrap_err().field(), "projection_months");
        inputs.projection_months = 121;
        assert_eq!(inputs.validate(120).unwrap_err().field(), "projection_months");
    }

    #[test]
    fn test_raised_limit_is_bounded() {
        let mut inputs = DashboardInputs::default();
        inputs.projection_months = 2_000_000;
        assert_eq!(inputs.validate(u32::MAX).unwrap_err().field(), "projection_months");
        inputs.projection_months = MAX_PROJECTION_PERIODS;
        assert!(inputs.validate(u32::MAX).is_ok());
    }

    #[test]
    fn test_churn_out_of_range_rejected() {
        let mut inputs = DashboardInputs::default();
        inputs.customers.churn_rate = 1.2;
        assert_eq!(inputs.validate(120).unwrap_err().field(), "churn_rate");
    }

    #[test]
    fn test_segment_new_customers_above_total_rejected() {
        let mut inputs = DashboardInputs::default();
        inputs.segments[0].customers.new_customers_per_month = 50.0;
        assert_eq!(
            inputs.validate(120).unwrap_err().field(),
            "new_customers_per_month"
        );
    }

    #[test]
    fn test_invalid_exponential_rate_is_not_a_top_level_error() {
        let mut inputs = DashboardInputs::default();
        inputs.revenue_growth.worst_rate = -1.0;
        assert!(inputs.validate(120).is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let inputs: DashboardInputs = serde_json::from_str(
            r#"{"financial": {"cash_balance": 50000.0}, "projection_months": 6}"#,
        )
        .unwrap();
        assert_eq!(inputs.financial.cash_balance, 50_000.0);
        assert_eq!(inputs.financial.monthly_expenses, 20_000.0);
        assert_eq!(inputs.projection_months, 6);
        assert_eq!(inputs.segments.len(), 2);
    }
}
