//! Closed-form financial and unit-economics formulas
//!
//! All functions are pure. Formulas with a denominator return
//! `MetricsError::DivisionUndefined` instead of a silent zero so the caller
//! can show a sentinel such as "N/A".

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;

/// Months of cash left at the current burn rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum Runway {
    /// Exact fractional months until cash runs out
    Months(f64),
    /// No burn (cash flow is break-even or positive)
    Unbounded,
}

impl Runway {
    /// Whole months for display, rounded down
    pub fn whole_months(&self) -> Option<u32> {
        match self {
            Runway::Months(m) => Some(m.floor().max(0.0) as u32),
            Runway::Unbounded => None,
        }
    }

    /// Exact value for further computation
    pub fn months(&self) -> Option<f64> {
        match self {
            Runway::Months(m) => Some(*m),
            Runway::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Runway::Unbounded)
    }

    pub fn display(&self) -> String {
        match self {
            Runway::Months(m) => format!("{} months", m.floor().max(0.0) as u64),
            Runway::Unbounded => "No burn".to_string(),
        }
    }
}

/// Monthly burn rate. Negative means net positive cash flow.
pub fn burn_rate(revenue: f64, expenses: f64) -> f64 {
    expenses - revenue
}

/// Runway in months; unbounded when there is no burn
pub fn runway_months(cash_balance: f64, burn_rate: f64) -> Runway {
    if burn_rate <= 0.0 {
        Runway::Unbounded
    } else {
        Runway::Months(cash_balance / burn_rate)
    }
}

/// Customer lifetime value: revenue per customer over the expected lifetime
pub fn ltv(average_revenue_per_customer: f64, churn_rate: f64) -> Result<f64, MetricsError> {
    if churn_rate == 0.0 {
        return Err(MetricsError::division_undefined("ltv", "churn_rate"));
    }
    Ok(average_revenue_per_customer / churn_rate)
}

/// Customer acquisition cost: acquisition spend per new customer
pub fn cac(acquisition_cost: f64, new_customers_per_month: f64) -> Result<f64, MetricsError> {
    if new_customers_per_month == 0.0 {
        return Err(MetricsError::division_undefined(
            "cac",
            "new_customers_per_month",
        ));
    }
    Ok(acquisition_cost / new_customers_per_month)
}

pub fn ltv_cac_ratio(ltv: f64, cac: f64) -> Result<f64, MetricsError> {
    if cac == 0.0 {
        return Err(MetricsError::division_undefined("ltv_cac_ratio", "cac"));
    }
    Ok(ltv / cac)
}

/// Fraction of customers lost during the period
pub fn churn_rate(lost_customers: f64, total_customers: f64) -> Result<f64, MetricsError> {
    if total_customers == 0.0 {
        return Err(MetricsError::division_undefined(
            "churn_rate",
            "total_customers",
        ));
    }
    Ok(lost_customers / total_customers)
}

/// Month-over-month revenue growth as a fraction (0.25 = +25%)
pub fn mom_growth(current: f64, previous: f64) -> Result<f64, MetricsError> {
    if previous == 0.0 {
        return Err(MetricsError::division_undefined(
            "mom_growth",
            "previous_revenue",
        ));
    }
    Ok((current - previous) / previous)
}

/// Expected customer lifetime in months for a monthly churn fraction
pub fn lifetime_months(churn_rate: f64) -> Result<f64, MetricsError> {
    if churn_rate == 0.0 {
        return Err(MetricsError::division_undefined(
            "lifetime_months",
            "churn_rate",
        ));
    }
    Ok(1.0 / churn_rate)
}

/// Average revenue per customer
pub fn arpu(monthly_revenue: f64, total_customers: f64) -> Result<f64, MetricsError> {
    if total_customers == 0.0 {
        return Err(MetricsError::division_undefined("arpu", "total_customers"));
    }
    Ok(monthly_revenue / total_customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_burn_rate_sign() {
        assert_eq!(burn_rate(10_000.0, 20_000.0), 10_000.0);
        assert_eq!(burn_rate(25_000.0, 20_000.0), -5_000.0);
    }

    #[test]
    fn test_runway_twelve_months() {
        let runway = runway_months(12_000.0, 1_000.0);
        assert_eq!(runway, Runway::Months(12.0));
        assert_eq!(runway.whole_months(), Some(12));
    }

    #[test]
    fn test_runway_keeps_fraction_internally() {
        let runway = runway_months(10_000.0, 3_000.0);
        assert_relative_eq!(runway.months().unwrap(), 10.0 / 3.0);
        assert_eq!(runway.whole_months(), Some(3));
        assert_eq!(runway.display(), "3 months");
    }

    #[test]
    fn test_runway_without_burn_is_unbounded() {
        assert!(runway_months(50_000.0, 0.0).is_unbounded());
        assert!(runway_months(50_000.0, -2_500.0).is_unbounded());
        assert_eq!(runway_months(0.0, 0.0).whole_months(), None);
    }

    #[test]
    fn test_ltv_exact() {
        for &(arpc, churn) in &[(1200.0, 0.1), (49.99, 0.03), (0.0, 0.5), (310.0, 1.0)] {
            assert_eq!(ltv(arpc, churn).unwrap(), arpc / churn);
        }
    }

    #[test]
    fn test_ltv_zero_churn_is_undefined() {
        let err = ltv(1200.0, 0.0).unwrap_err();
        assert_eq!(err, MetricsError::division_undefined("ltv", "churn_rate"));
    }

    #[test]
    fn test_cac_zero_customers_is_undefined() {
        assert!(matches!(
            cac(500.0, 0.0),
            Err(MetricsError::DivisionUndefined { field: "new_customers_per_month", .. })
        ));
    }

    #[test]
    fn test_ltv_cac_ratio_composition() {
        let l = ltv(1200.0, 0.1).unwrap();
        let c = cac(500.0, 10.0).unwrap();
        assert_relative_eq!(l, 12_000.0);
        assert_relative_eq!(c, 50.0);
        assert_relative_eq!(ltv_cac_ratio(l, c).unwrap(), 240.0);
        assert!(ltv_cac_ratio(l, 0.0).is_err());
    }

    #[test]
    fn test_growth_and_lifetime() {
        assert_relative_eq!(mom_growth(10_000.0, 8_000.0).unwrap(), 0.25);
        assert!(mom_growth(10_000.0, 0.0).is_err());
        assert_relative_eq!(lifetime_months(0.05).unwrap(), 20.0);
        assert_relative_eq!(churn_rate(3.0, 60.0).unwrap(), 0.05);
        assert_relative_eq!(arpu(10_000.0, 100.0).unwrap(), 100.0);
        assert!(arpu(10_000.0, 0.0).is_err());
    }
}
