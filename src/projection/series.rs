//! Projection output structures

use serde::{Deserialize, Serialize};

/// A single projected value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period: u32,
    pub value: f64,
}

/// Ordered projected values for periods 0..=N
///
/// Period 0 holds the starting value. The series is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    /// Build a series from values indexed by period
    pub fn from_values(values: Vec<f64>) -> Self {
        let points = values
            .into_iter()
            .enumerate()
            .map(|(period, value)| ProjectionPoint {
                period: period as u32,
                value,
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[ProjectionPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Number of points (periods + 1)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of projected periods, excluding period 0
    pub fn periods(&self) -> u32 {
        self.points.len().saturating_sub(1) as u32
    }

    pub fn value_at(&self, period: u32) -> Option<f64> {
        self.points.get(period as usize).map(|p| p.value)
    }

    pub fn start_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }

    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// First period whose value is below zero
    pub fn first_negative_period(&self) -> Option<u32> {
        self.points.iter().find(|p| p.value < 0.0).map(|p| p.period)
    }

    pub fn summary(&self) -> SeriesSummary {
        let start = self.start_value().unwrap_or(0.0);
        let end = self.final_value().unwrap_or(0.0);
        let min = self.points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);

        SeriesSummary {
            periods: self.periods(),
            start,
            end,
            min: if self.is_empty() { 0.0 } else { min },
            max: if self.is_empty() { 0.0 } else { max },
            total_change: end - start,
        }
    }
}

/// Summary statistics for a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub periods: u32,
    pub start: f64,
    pub end: f64,
    pub min: f64,
    pub max: f64,
    pub total_change: f64,
}
