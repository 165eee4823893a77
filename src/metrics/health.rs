//! Health labels for unit-economics metrics
//!
//! Labels are classifications layered on top of the numeric results; the
//! formulas themselves never bake a threshold in.

use serde::{Deserialize, Serialize};

/// LTV/CAC ratio at or above which unit economics count as healthy
pub const DEFAULT_HEALTHY_LTV_CAC: f64 = 3.0;

/// Monthly churn below which retention is excellent
pub const DEFAULT_CHURN_EXCELLENT: f64 = 0.02;

/// Monthly churn above which retention needs attention
pub const DEFAULT_CHURN_ATTENTION: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LtvCacHealth {
    /// Below 1: each customer costs more than it returns
    Unprofitable,
    /// Between 1 and the healthy threshold
    Inefficient,
    Healthy,
}

impl LtvCacHealth {
    pub fn classify(ratio: f64, healthy_threshold: f64) -> Self {
        if ratio >= healthy_threshold {
            LtvCacHealth::Healthy
        } else if ratio >= 1.0 {
            LtvCacHealth::Inefficient
        } else {
            LtvCacHealth::Unprofitable
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, LtvCacHealth::Healthy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LtvCacHealth::Unprofitable => "unprofitable",
            LtvCacHealth::Inefficient => "inefficient",
            LtvCacHealth::Healthy => "healthy",
        }
    }
}

/// Label an LTV/CAC ratio with the default threshold
pub fn classify_ltv_cac(ratio: f64) -> LtvCacHealth {
    LtvCacHealth::classify(ratio, DEFAULT_HEALTHY_LTV_CAC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnHealth {
    Excellent,
    Normal,
    NeedsAttention,
}

impl ChurnHealth {
    pub fn classify(churn_rate: f64, excellent_below: f64, attention_above: f64) -> Self {
        if churn_rate < excellent_below {
            ChurnHealth::Excellent
        } else if churn_rate <= attention_above {
            ChurnHealth::Normal
        } else {
            ChurnHealth::NeedsAttention
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnHealth::Excellent => "excellent",
            ChurnHealth::Normal => "normal",
            ChurnHealth::NeedsAttention => "needs attention",
        }
    }
}
