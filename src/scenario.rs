//! Best / normal / worst scenario projections
//!
//! The engine projects the same starting value under one growth model with
//! three rates. Scenarios are independent: a rate that is invalid for one
//! scenario is reported on that scenario only, and the others still compute.
//! Only invalid top-level inputs (such as a zero horizon) fail the whole run.

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::inputs::{FinancialInputs, GrowthSelection};
use crate::metrics::{burn_rate, runway_months, Runway};
use crate::projection::{
    project_as, project_cash, GrowthModel, GrowthParameters, ProjectionSeries,
    MAX_PROJECTION_PERIODS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Best,
    Normal,
    Worst,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Best, Scenario::Normal, Scenario::Worst];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Best => "Best Case",
            Scenario::Normal => "Normal Case",
            Scenario::Worst => "Worst Case",
        }
    }

    /// Input field holding this scenario's growth rate
    pub fn rate_field(&self) -> &'static str {
        match self {
            Scenario::Best => "best_rate",
            Scenario::Normal => "normal_rate",
            Scenario::Worst => "worst_rate",
        }
    }
}

/// One growth rate per scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRates {
    pub best: f64,
    pub normal: f64,
    pub worst: f64,
}

impl ScenarioRates {
    pub fn new(best: f64, normal: f64, worst: f64) -> Self {
        Self { best, normal, worst }
    }

    pub fn get(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Best => self.best,
            Scenario::Normal => self.normal,
            Scenario::Worst => self.worst,
        }
    }
}

impl From<&GrowthSelection> for ScenarioRates {
    fn from(selection: &GrowthSelection) -> Self {
        Self::new(selection.best_rate, selection.normal_rate, selection.worst_rate)
    }
}

/// Projection for one scenario, or the error that scenario hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub rate: f64,
    pub result: Result<ProjectionSeries, MetricsError>,
}

impl ScenarioOutcome {
    pub fn series(&self) -> Option<&ProjectionSeries> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&MetricsError> {
        self.result.as_ref().err()
    }
}

/// The three scenario projections, each under its own label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub model: GrowthModel,
    pub periods: u32,
    pub start_value: f64,
    pub best: ScenarioOutcome,
    pub normal: ScenarioOutcome,
    pub worst: ScenarioOutcome,
}

impl ScenarioResult {
    pub fn get(&self, scenario: Scenario) -> &ScenarioOutcome {
        match scenario {
            Scenario::Best => &self.best,
            Scenario::Normal => &self.normal,
            Scenario::Worst => &self.worst,
        }
    }

    pub fn outcomes(&self) -> [&ScenarioOutcome; 3] {
        [&self.best, &self.normal, &self.worst]
    }

    /// Scenarios that failed, with their errors
    pub fn failures(&self) -> Vec<(Scenario, &MetricsError)> {
        self.outcomes()
            .into_iter()
            .filter_map(|o| o.error().map(|e| (o.scenario, e)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes().iter().all(|o| o.result.is_ok())
    }
}

/// Revenue and expense multipliers applied to the base financials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub revenue_multiplier: f64,
    pub expense_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustments {
    pub best: ScenarioAdjustment,
    pub normal: ScenarioAdjustment,
    pub worst: ScenarioAdjustment,
}

impl ScenarioAdjustments {
    pub fn get(&self, scenario: Scenario) -> ScenarioAdjustment {
        match scenario {
            Scenario::Best => self.best,
            Scenario::Normal => self.normal,
            Scenario::Worst => self.worst,
        }
    }
}

impl Default for ScenarioAdjustments {
    /// Best: +20% revenue, -10% expenses. Worst: -20% revenue, +10% expenses.
    fn default() -> Self {
        Self {
            best: ScenarioAdjustment {
                revenue_multiplier: 1.2,
                expense_multiplier: 0.9,
            },
            normal: ScenarioAdjustment {
                revenue_multiplier: 1.0,
                expense_multiplier: 1.0,
            },
            worst: ScenarioAdjustment {
                revenue_multiplier: 0.8,
                expense_multiplier: 1.1,
            },
        }
    }
}

/// Burn, runway and cash path under one scenario's adjusted financials
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashScenario {
    pub scenario: Scenario,
    pub monthly_revenue: f64,
    pub monthly_expenses: f64,
    pub burn_rate: f64,
    pub runway: Runway,
    pub revenue: Result<ProjectionSeries, MetricsError>,
    pub cash: Result<ProjectionSeries, MetricsError>,
}

/// Runs best / normal / worst projections
#[derive(Debug, Clone, Default)]
pub struct ScenarioEngine {
    adjustments: ScenarioAdjustments,
}

impl ScenarioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adjustments(adjustments: ScenarioAdjustments) -> Self {
        Self { adjustments }
    }

    pub fn adjustments(&self) -> &ScenarioAdjustments {
        &self.adjustments
    }

    /// Project `start_value` under each scenario's rate
    ///
    /// Fails only for a horizon outside `1..=MAX_PROJECTION_PERIODS` or a
    /// non-finite start value; per-rate
    /// failures are recorded in the corresponding outcome.
    pub fn run(
        &self,
        start_value: f64,
        model: GrowthModel,
        rates: &ScenarioRates,
        periods: u32,
    ) -> Result<ScenarioResult, MetricsError> {
        check_horizon(start_value, periods)?;

        let project_one = |scenario: Scenario| {
            let rate = rates.get(scenario);
            let params = GrowthParameters::new(model, rate, periods);
            let result = project_as(start_value, &params, scenario.rate_field());
            if let Err(e) = &result {
                warn!("{} projection failed: {}", scenario.as_str(), e);
            }
            ScenarioOutcome { scenario, rate, result }
        };

        let (best, (normal, worst)) = rayon::join(
            || project_one(Scenario::Best),
            || rayon::join(|| project_one(Scenario::Normal), || project_one(Scenario::Worst)),
        );

        Ok(ScenarioResult {
            model,
            periods,
            start_value,
            best,
            normal,
            worst,
        })
    }

    /// Adjusted burn, runway and cash projection for every scenario
    ///
    /// Each scenario's revenue starts from the adjusted monthly revenue and
    /// grows at that scenario's rate; expenses grow by `expense_growth` per
    /// month. Results are returned in best, normal, worst order.
    pub fn run_cash(
        &self,
        financial: &FinancialInputs,
        growth: &GrowthSelection,
        periods: u32,
        expense_growth: f64,
    ) -> Result<Vec<CashScenario>, MetricsError> {
        financial.validate()?;
        check_horizon(financial.monthly_revenue, periods)?;
        let rates = ScenarioRates::from(growth);

        let scenarios: Vec<CashScenario> = Scenario::ALL
            .par_iter()
            .map(|&scenario| {
                let adjustment = self.adjustments.get(scenario);
                let monthly_revenue = financial.monthly_revenue * adjustment.revenue_multiplier;
                let monthly_expenses = financial.monthly_expenses * adjustment.expense_multiplier;
                let burn = burn_rate(monthly_revenue, monthly_expenses);

                let params = GrowthParameters::new(growth.model, rates.get(scenario), periods);
                let revenue = project_as(monthly_revenue, &params, scenario.rate_field());
                let cash = revenue.as_ref().map_err(Clone::clone).and_then(|series| {
                    project_cash(financial.cash_balance, series, monthly_expenses, expense_growth)
                });
                if let Err(e) = &cash {
                    warn!("{} cash projection failed: {}", scenario.as_str(), e);
                }

                CashScenario {
                    scenario,
                    monthly_revenue,
                    monthly_expenses,
                    burn_rate: burn,
                    runway: runway_months(financial.cash_balance, burn),
                    revenue,
                    cash,
                }
            })
            .collect();

        Ok(scenarios)
    }
}

fn check_horizon(start_value: f64, periods: u32) -> Result<(), MetricsError> {
    if periods == 0 {
        return Err(MetricsError::invalid_input(
            "periods",
            "must be a positive integer",
        ));
    }
    if periods > MAX_PROJECTION_PERIODS {
        return Err(MetricsError::invalid_input(
            "periods",
            format!("{} exceeds the maximum of {}", periods, MAX_PROJECTION_PERIODS),
        ));
    }
    if !start_value.is_finite() {
        return Err(MetricsError::invalid_input(
            "start_value",
            "must be a finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scenarios_share_start_and_length() {
        let engine = ScenarioEngine::new();
        let result = engine
            .run(1_000.0, GrowthModel::Exponential, &ScenarioRates::new(0.15, 0.10, 0.05), 12)
            .unwrap();

        assert!(result.is_complete());
        for outcome in result.outcomes() {
            let series = outcome.series().unwrap();
            assert_eq!(series.len(), 13);
            assert_eq!(series.start_value(), Some(1_000.0));
        }
        let best = result.best.series().unwrap().final_value().unwrap();
        let worst = result.worst.series().unwrap().final_value().unwrap();
        assert!(best > worst);
    }

    #[test]
    fn test_outcomes_are_labelled() {
        let result = ScenarioEngine::new()
            .run(100.0, GrowthModel::Linear, &ScenarioRates::new(30.0, 20.0, 10.0), 1)
            .unwrap();
        assert_eq!(result.best.scenario, Scenario::Best);
        assert_eq!(result.get(Scenario::Normal).series().unwrap().values(), vec![100.0, 120.0]);
        assert_eq!(result.get(Scenario::Worst).rate, 10.0);
    }

    #[test]
    fn test_invalid_worst_rate_isolated() {
        let result = ScenarioEngine::new()
            .run(100.0, GrowthModel::Exponential, &ScenarioRates::new(0.2, 0.1, -1.0), 6)
            .unwrap();

        assert!(result.best.series().is_some());
        assert!(result.normal.series().is_some());
        assert_eq!(
            result.worst.error(),
            Some(&MetricsError::InvalidRate { field: "worst_rate", rate: -1.0 })
        );
        assert!(!result.is_complete());
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].0, Scenario::Worst);
    }

    #[test]
    fn test_zero_periods_aborts_run() {
        let err = ScenarioEngine::new()
            .run(100.0, GrowthModel::Linear, &ScenarioRates::new(1.0, 1.0, 1.0), 0)
            .unwrap_err();
        assert_eq!(err.field(), "periods");
    }

    #[test]
    fn test_oversized_horizon_aborts_run() {
        let engine = ScenarioEngine::new();
        let rates = ScenarioRates::new(1.0, 1.0, 1.0);
        let err = engine.run(100.0, GrowthModel::Linear, &rates, 2_000_000).unwrap_err();
        assert_eq!(err.field(), "periods");

        let growth = GrowthSelection::default();
        let err = engine
            .run_cash(&FinancialInputs::default(), &growth, MAX_PROJECTION_PERIODS + 1, 0.02)
            .unwrap_err();
        assert_eq!(err.field(), "periods");
    }

    #[test]
    fn test_cash_scenarios_apply_adjustments() {
        let financial = FinancialInputs {
            cash_balance: 100_000.0,
            monthly_revenue: 10_000.0,
            monthly_expenses: 20_000.0,
        };
        let growth = GrowthSelection {
            model: GrowthModel::Fixed,
            best_rate: 0.0,
            normal_rate: 0.0,
            worst_rate: 0.0,
        };
        let cash = ScenarioEngine::new().run_cash(&financial, &growth, 12, 0.0).unwrap();

        assert_eq!(cash.len(), 3);
        assert_eq!(cash[0].scenario, Scenario::Best);
        assert_relative_eq!(cash[0].burn_rate, 18_000.0 - 12_000.0);
        assert_relative_eq!(cash[1].burn_rate, 10_000.0);
        assert_relative_eq!(cash[2].burn_rate, 22_000.0 - 8_000.0);
        assert_eq!(cash[1].runway, Runway::Months(10.0));

        let normal_cash = cash[1].cash.as_ref().unwrap();
        assert_eq!(normal_cash.len(), 13);
        assert_relative_eq!(normal_cash.value_at(10).unwrap(), 0.0);
    }

    #[test]
    fn test_cash_scenario_invalid_rate_only_fails_that_scenario() {
        let financial = FinancialInputs::default();
        let growth = GrowthSelection {
            model: GrowthModel::Exponential,
            best_rate: -1.5,
            normal_rate: 0.1,
            worst_rate: 0.05,
        };
        let cash = ScenarioEngine::new().run_cash(&financial, &growth, 6, 0.02).unwrap();
        assert!(cash[0].cash.is_err());
        assert!(cash[1].cash.is_ok());
        assert!(cash[2].cash.is_ok());
    }
}
