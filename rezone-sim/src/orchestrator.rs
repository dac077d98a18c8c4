//! Bounded fan-out across neighborhoods
//!
//! One request per neighborhood against the Capacity Engine, with at
//! most `max_inflight` requests in the air at once. The pool is seeded
//! to the limit and refilled as responses drain; a 100 ms ticker
//! reports progress while requests are outstanding. A failed
//! neighborhood is recorded and never aborts the run.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use rezone_common::api::RezonedParcel;

use crate::client::ClientError;

/// Default in-flight request limit
pub const DEFAULT_MAX_INFLIGHT: usize = 4;

/// Progress reporting cadence
const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Aggregated outcome of a fan-out run
#[derive(Debug, Default)]
pub struct FanoutResult {
    /// Per-parcel results keyed by blklot; later responses win on
    /// duplicate parcels
    pub parcels: HashMap<String, RezonedParcel>,
    /// Added capacity summed per neighborhood
    pub capacity_by_nhood: BTreeMap<String, f64>,
    /// Citywide added capacity
    pub nominal_capacity: f64,
    /// Neighborhoods whose fetch failed, with the error message
    pub failures: Vec<(String, String)>,
}

impl FanoutResult {
    fn absorb(&mut self, nhood: String, parcels: Vec<RezonedParcel>) {
        let capacity: f64 = parcels.iter().map(|p| p.added_capacity).sum();
        for parcel in parcels {
            self.parcels.insert(parcel.blklot.clone(), parcel);
        }
        self.capacity_by_nhood.insert(nhood, capacity);
        self.nominal_capacity += capacity;
    }
}

/// Run the fan-out: one fetch per neighborhood, bounded concurrency.
///
/// `fetch` is the per-neighborhood request; in production it wraps
/// `EngineClient::rezone`.
pub async fn run<F, Fut>(nhoods: Vec<String>, max_inflight: usize, fetch: F) -> FanoutResult
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<RezonedParcel>, ClientError>>,
{
    let total = nhoods.len();
    let mut pending = nhoods.into_iter();
    let mut inflight = FuturesUnordered::new();

    let spawn = |nhood: String| {
        let fut = fetch(nhood.clone());
        async move { (nhood, fut.await) }
    };

    // Seed the pool up to the in-flight limit
    for _ in 0..max_inflight.max(1) {
        if let Some(nhood) = pending.next() {
            inflight.push(spawn(nhood));
        }
    }

    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut result = FanoutResult::default();
    let mut completed = 0usize;

    while !inflight.is_empty() {
        tokio::select! {
            Some((nhood, outcome)) = inflight.next() => {
                completed += 1;
                match outcome {
                    Ok(parcels) => {
                        info!(nhood = %nhood, parcels = parcels.len(), "neighborhood rezoned");
                        result.absorb(nhood, parcels);
                    }
                    Err(e) => {
                        warn!(nhood = %nhood, error = %e, "neighborhood fetch failed");
                        result.failures.push((nhood, e.to_string()));
                    }
                }
                if let Some(next) = pending.next() {
                    inflight.push(spawn(next));
                }
            }
            _ = ticker.tick() => {
                info!(completed, total, "rezoning in progress");
            }
        }
    }

    result
}
