//! Startup Metrics - burn, runway, unit economics and growth scenarios
//!
//! This library provides:
//! - Closed-form financial formulas (burn rate, runway, LTV, CAC, LTV/CAC)
//! - Fixed, linear and exponential growth projections over a monthly horizon
//! - Best / normal / worst scenario projections with per-scenario errors
//! - Cash and customer-flow projections
//! - A pure `recompute` entry point producing everything a dashboard renders

pub mod error;
pub mod config;
pub mod inputs;
pub mod metrics;
pub mod projection;
pub mod scenario;
pub mod dashboard;
pub mod output;

// Re-export commonly used types
pub use error::MetricsError;
pub use config::DashboardConfig;
pub use inputs::{CustomerInputs, DashboardInputs, FinancialInputs, GrowthSelection};
pub use metrics::{Metric, Runway};
pub use projection::{project, GrowthModel, GrowthParameters, ProjectionSeries};
pub use scenario::{Scenario, ScenarioEngine, ScenarioRates, ScenarioResult};
pub use dashboard::{recompute, DashboardReport};
