//! Growth models for projecting a value over a number of periods

use log::debug;
use serde::{Deserialize, Serialize};

use super::series::ProjectionSeries;
use crate::error::MetricsError;

/// Longest horizon any projection accepts
pub const MAX_PROJECTION_PERIODS: u32 = 120;

/// How a value evolves from one period to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthModel {
    /// Constant absolute increment per period; same arithmetic as `Linear`
    Fixed,
    /// value[i] = value[i-1] + rate
    Linear,
    /// value[i] = value[i-1] * (1 + rate)
    Exponential,
}

impl GrowthModel {
    pub const ALL: [GrowthModel; 3] = [
        GrowthModel::Fixed,
        GrowthModel::Linear,
        GrowthModel::Exponential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthModel::Fixed => "Fixed",
            GrowthModel::Linear => "Linear",
            GrowthModel::Exponential => "Exponential",
        }
    }

    /// Next period's value from the prior one
    fn step(&self, prior: f64, rate: f64) -> f64 {
        match self {
            GrowthModel::Fixed | GrowthModel::Linear => prior + rate,
            GrowthModel::Exponential => prior * (1.0 + rate),
        }
    }
}

impl std::str::FromStr for GrowthModel {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(GrowthModel::Fixed),
            "linear" => Ok(GrowthModel::Linear),
            "exponential" => Ok(GrowthModel::Exponential),
            other => Err(MetricsError::invalid_input(
                "growth_model",
                format!("unknown growth model '{}'", other),
            )),
        }
    }
}

/// Model, rate and horizon for one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    pub model: GrowthModel,
    /// Absolute increment (Fixed/Linear) or fractional growth (Exponential)
    pub rate: f64,
    pub periods: u32,
}

impl GrowthParameters {
    pub fn new(model: GrowthModel, rate: f64, periods: u32) -> Self {
        Self { model, rate, periods }
    }

    /// Check the horizon and the rate, attributing a rate failure to `rate_field`
    pub fn validate_as(&self, rate_field: &'static str) -> Result<(), MetricsError> {
        if self.periods == 0 {
            return Err(MetricsError::invalid_input(
                "periods",
                "must be a positive integer",
            ));
        }
        if self.periods > MAX_PROJECTION_PERIODS {
            return Err(MetricsError::invalid_input(
                "periods",
                format!(
                    "{} exceeds the maximum of {}",
                    self.periods, MAX_PROJECTION_PERIODS
                ),
            ));
        }
        if !self.rate.is_finite() {
            return Err(MetricsError::invalid_input(rate_field, "must be a finite number"));
        }
        if self.model == GrowthModel::Exponential && self.rate <= -1.0 {
            return Err(MetricsError::InvalidRate {
                field: rate_field,
                rate: self.rate,
            });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        self.validate_as("rate")
    }
}

/// Project `start_value` forward; output has `periods + 1` points
pub fn project(start_value: f64, params: &GrowthParameters) -> Result<ProjectionSeries, MetricsError> {
    project_as(start_value, params, "rate")
}

/// Like [`project`], naming the rate field in any error
pub fn project_as(
    start_value: f64,
    params: &GrowthParameters,
    rate_field: &'static str,
) -> Result<ProjectionSeries, MetricsError> {
    if !start_value.is_finite() {
        return Err(MetricsError::invalid_input(
            "start_value",
            "must be a finite number",
        ));
    }
    params.validate_as(rate_field)?;

    let mut values = Vec::with_capacity(params.periods as usize + 1);
    values.push(start_value);

    let mut current = start_value;
    for _ in 1..=params.periods {
        current = params.model.step(current, params.rate);
        values.push(current);
    }

    debug!(
        "{} projection from {} at rate {} over {} periods -> {}",
        params.model.as_str(),
        start_value,
        params.rate,
        params.periods,
        current
    );

    Ok(ProjectionSeries::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_projection() {
        let series = project(100.0, &GrowthParameters::new(GrowthModel::Linear, 10.0, 3)).unwrap();
        assert_eq!(series.values(), vec![100.0, 110.0, 120.0, 130.0]);
    }

    #[test]
    fn test_fixed_matches_linear() {
        let fixed = project(250.0, &GrowthParameters::new(GrowthModel::Fixed, -7.5, 12)).unwrap();
        let linear = project(250.0, &GrowthParameters::new(GrowthModel::Linear, -7.5, 12)).unwrap();
        assert_eq!(fixed, linear);
    }

    #[test]
    fn test_exponential_projection() {
        let series =
            project(100.0, &GrowthParameters::new(GrowthModel::Exponential, 0.1, 2)).unwrap();
        let values = series.values();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 100.0);
        assert_relative_eq!(values[1], 110.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 121.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exponential_decline() {
        let series =
            project(100.0, &GrowthParameters::new(GrowthModel::Exponential, -0.5, 2)).unwrap();
        assert_eq!(series.values(), vec![100.0, 50.0, 25.0]);
    }

    #[test]
    fn test_exponential_rate_at_minus_one_fails() {
        let err = project(100.0, &GrowthParameters::new(GrowthModel::Exponential, -1.0, 2))
            .unwrap_err();
        assert_eq!(err, MetricsError::InvalidRate { field: "rate", rate: -1.0 });

        let err = project(100.0, &GrowthParameters::new(GrowthModel::Exponential, -3.0, 2))
            .unwrap_err();
        assert!(matches!(err, MetricsError::InvalidRate { .. }));
    }

    #[test]
    fn test_linear_allows_large_negative_rate() {
        let series = project(100.0, &GrowthParameters::new(GrowthModel::Linear, -60.0, 2)).unwrap();
        assert_eq!(series.values(), vec![100.0, 40.0, -20.0]);
    }

    #[test]
    fn test_zero_periods_rejected() {
        let err = project(100.0, &GrowthParameters::new(GrowthModel::Linear, 1.0, 0)).unwrap_err();
        assert_eq!(err.field(), "periods");
    }

    #[test]
    fn test_horizon_above_ceiling_rejected() {
        let params = GrowthParameters::new(GrowthModel::Linear, 1.0, MAX_PROJECTION_PERIODS + 1);
        assert_eq!(project(100.0, &params).unwrap_err().field(), "periods");

        let params = GrowthParameters::new(GrowthModel::Linear, 1.0, u32::MAX);
        assert!(project(100.0, &params).is_err());
    }

    #[test]
    fn test_length_and_start_value_invariant() {
        for model in GrowthModel::ALL {
            for periods in [1u32, 2, 12, 36, 120] {
                for &start in &[0.0, 1.5, 10_000.0, -40.0] {
                    let series = project(start, &GrowthParameters::new(model, 0.07, periods)).unwrap();
                    assert_eq!(series.len(), periods as usize + 1);
                    assert_eq!(series.start_value(), Some(start));
                }
            }
        }
    }

    #[test]
    fn test_parse_model() {
        assert_eq!("exponential".parse::<GrowthModel>().unwrap(), GrowthModel::Exponential);
        assert_eq!("Fixed".parse::<GrowthModel>().unwrap(), GrowthModel::Fixed);
        assert!("logistic".parse::<GrowthModel>().is_err());
    }
}
