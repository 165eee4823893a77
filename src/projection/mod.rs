//! Growth projections over a monthly horizon

mod series;
mod growth;
mod cash;
mod customers;
mod calendar;

pub use series::{ProjectionPoint, ProjectionSeries, SeriesSummary};
pub use growth::{project, project_as, GrowthModel, GrowthParameters, MAX_PROJECTION_PERIODS};
pub use cash::{project_cash, runway_curve};
pub use customers::{project_customer_flow, CustomerFlow};
pub use calendar::period_labels;
