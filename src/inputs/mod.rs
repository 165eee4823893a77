//! Dashboard input snapshots and loading

mod data;
pub mod loader;

pub use data::{
    CustomerInputs, DashboardInputs, FinancialInputs, GrowthChoice, GrowthSelection, Segment,
    SegmentInputs,
};
pub use loader::{load_inputs, load_inputs_from_reader, load_snapshot, load_snapshot_from_reader};
