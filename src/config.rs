//! Tunable constants for dashboard recomputation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::{
    HealthThresholds, DEFAULT_CHURN_ATTENTION, DEFAULT_CHURN_EXCELLENT, DEFAULT_HEALTHY_LTV_CAC,
};
use crate::projection::MAX_PROJECTION_PERIODS;
use crate::scenario::ScenarioAdjustments;

/// Longest horizon a recomputation will project; a config may lower it
/// but never raise it past [`MAX_PROJECTION_PERIODS`]
pub const DEFAULT_MAX_PROJECTION_MONTHS: u32 = MAX_PROJECTION_PERIODS;

/// Monthly expense growth used in cash projections (2%)
pub const DEFAULT_EXPENSE_GROWTH_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub max_projection_months: u32,
    pub expense_growth_rate: f64,
    pub healthy_ltv_cac: f64,
    pub churn_excellent: f64,
    pub churn_attention: f64,
    pub scenarios: ScenarioAdjustments,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_projection_months: DEFAULT_MAX_PROJECTION_MONTHS,
            expense_growth_rate: DEFAULT_EXPENSE_GROWTH_RATE,
            healthy_ltv_cac: DEFAULT_HEALTHY_LTV_CAC,
            churn_excellent: DEFAULT_CHURN_EXCELLENT,
            churn_attention: DEFAULT_CHURN_ATTENTION,
            scenarios: ScenarioAdjustments::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Configured horizon limit, bounded by the projection ceiling
    pub fn horizon_limit(&self) -> u32 {
        self.max_projection_months.min(MAX_PROJECTION_PERIODS)
    }

    pub fn thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            healthy_ltv_cac: self.healthy_ltv_cac,
            churn_excellent: self.churn_excellent,
            churn_attention: self.churn_attention,
        }
    }
}
