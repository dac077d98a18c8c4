//! Simulation report assembly and rendering
//!
//! Turns a fan-out result into the citywide summary the original tool
//! displayed: nominal capacity, a capacity-by-neighborhood
//! leaderboard, and a per-parcel added-capacity histogram.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use rezone_common::api::RezonedParcel;
use rezone_common::ZoningParams;

use crate::orchestrator::FanoutResult;

/// Histogram bin count: parcels bucketed by whole added units, 0..=30
pub const HISTOGRAM_BINS: usize = 31;

/// Leaderboard length
pub const LEADERBOARD_SIZE: usize = 10;

/// One leaderboard entry
#[derive(Debug, Clone, Serialize)]
pub struct NhoodCapacity {
    pub nhood: String,
    pub capacity: f64,
}

/// A failed neighborhood fetch
#[derive(Debug, Clone, Serialize)]
pub struct FailedNhood {
    pub nhood: String,
    pub error: String,
}

/// Full simulation report, serializable as the JSON artifact
#[derive(Debug, Serialize)]
pub struct SimReport {
    pub generated_at: DateTime<Utc>,
    pub engine_url: String,
    pub params: ZoningParams,
    pub nhoods_requested: usize,
    pub nhoods_failed: Vec<FailedNhood>,
    pub parcel_count: usize,
    pub nominal_capacity: f64,
    pub capacity_by_nhood: BTreeMap<String, f64>,
    pub leaderboard: Vec<NhoodCapacity>,
    pub histogram: Vec<u64>,
    pub permalink: String,
    pub elapsed_ms: u128,
}

impl SimReport {
    pub fn new(
        engine_url: String,
        params: ZoningParams,
        nhoods_requested: usize,
        permalink: String,
        elapsed_ms: u128,
        result: FanoutResult,
    ) -> Self {
        let leaderboard = leaderboard(&result.capacity_by_nhood);
        let histogram = histogram(result.parcels.values());

        Self {
            generated_at: Utc::now(),
            engine_url,
            params,
            nhoods_requested,
            nhoods_failed: result
                .failures
                .into_iter()
                .map(|(nhood, error)| FailedNhood { nhood, error })
                .collect(),
            parcel_count: result.parcels.len(),
            nominal_capacity: result.nominal_capacity,
            capacity_by_nhood: result.capacity_by_nhood,
            leaderboard,
            histogram,
            permalink,
            elapsed_ms,
        }
    }

    /// Human-readable summary for stdout
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Rezoning simulation: distance {} m, height multiple {}, local height {}\n",
            self.params.distance_m, self.params.height_multiple, self.params.height_stat
        ));
        out.push_str(&format!(
            "Neighborhoods: {} requested, {} failed\n",
            self.nhoods_requested,
            self.nhoods_failed.len()
        ));
        out.push_str(&format!(
            "Nominal capacity: {} units across {} parcels ({} ms)\n",
            self.nominal_capacity, self.parcel_count, self.elapsed_ms
        ));

        if !self.leaderboard.is_empty() {
            out.push_str("\nCapacity by neighborhood:\n");
            for entry in &self.leaderboard {
                out.push_str(&format!("  {:<32} {:>8}\n", entry.nhood, entry.capacity));
            }
        }

        let histogram_total: u64 = self.histogram.iter().sum();
        if histogram_total > 0 {
            out.push_str("\nCapacity by parcel (units -> parcels):\n");
            for (units, count) in self.histogram.iter().enumerate() {
                if *count > 0 {
                    out.push_str(&format!("  {:>3}  {}\n", units, count));
                }
            }
        }

        if !self.nhoods_failed.is_empty() {
            out.push_str("\nFailed neighborhoods:\n");
            for failure in &self.nhoods_failed {
                out.push_str(&format!("  {}: {}\n", failure.nhood, failure.error));
            }
        }

        out.push_str(&format!("\nShare link params: {}\n", self.permalink));
        out
    }
}

/// Top neighborhoods by added capacity, descending
fn leaderboard(capacity_by_nhood: &BTreeMap<String, f64>) -> Vec<NhoodCapacity> {
    let mut entries: Vec<NhoodCapacity> = capacity_by_nhood
        .iter()
        .map(|(nhood, capacity)| NhoodCapacity {
            nhood: nhood.clone(),
            capacity: *capacity,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.capacity
            .partial_cmp(&a.capacity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

/// Bucket parcels by whole added units into bins 0..=30.
///
/// Parcels below one unit are excluded; parcels beyond the last bin
/// fall off the chart, matching the original display.
fn histogram<'a, I: Iterator<Item = &'a RezonedParcel>>(parcels: I) -> Vec<u64> {
    let mut bins = vec![0u64; HISTOGRAM_BINS];
    for parcel in parcels {
        if parcel.added_capacity < 1.0 {
            continue;
        }
        let bin = parcel.added_capacity.floor() as usize;
        if bin < HISTOGRAM_BINS {
            bins[bin] += 1;
        }
    }
    bins
}
