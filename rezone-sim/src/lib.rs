//! rezone-sim library - Simulation orchestrator module
//!
//! Fans rezoning requests out to the Capacity Engine, one per selected
//! neighborhood, with a bounded in-flight pool, then aggregates the
//! per-parcel results into a citywide report.

pub mod client;
pub mod orchestrator;
pub mod report;
