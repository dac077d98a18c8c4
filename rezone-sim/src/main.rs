//! Simulation orchestrator (rezone-sim) - main entry point
//!
//! Replays a full simulation session against a running Capacity
//! Engine: validates the zoning parameters, fans one request per
//! selected neighborhood out with a bounded in-flight pool, and prints
//! the aggregated citywide report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use rezone_common::params::{DEFAULT_DISTANCE_M, DEFAULT_HEIGHT_MULTIPLE};
use rezone_common::{nhoods, HeightStat, ZoningParams};
use rezone_sim::client::EngineClient;
use rezone_sim::orchestrator::{self, DEFAULT_MAX_INFLIGHT};
use rezone_sim::report::SimReport;

/// Command-line arguments for rezone-sim
#[derive(Parser, Debug)]
#[command(name = "rezone-sim")]
#[command(about = "Citywide rezoning simulation against a Capacity Engine")]
#[command(version)]
struct Args {
    /// Capacity Engine base URL
    #[arg(long, default_value = "http://127.0.0.1:5750", env = "REZONE_ENGINE_URL")]
    engine_url: String,

    /// Neighbor search radius in meters
    #[arg(long, default_value_t = DEFAULT_DISTANCE_M)]
    distance: f64,

    /// Multiplier applied to the reference height
    #[arg(long, default_value_t = DEFAULT_HEIGHT_MULTIPLE)]
    height_multiple: f64,

    /// Reference-height statistic: max, mean, or median
    #[arg(long, default_value = "max")]
    local_height: String,

    /// Comma-separated neighborhood names (default: the west-side set)
    #[arg(long, conflicts_with = "all")]
    nhoods: Option<String>,

    /// Simulate every neighborhood the engine has parcels for
    #[arg(long)]
    all: bool,

    /// Maximum in-flight requests
    #[arg(long, default_value_t = DEFAULT_MAX_INFLIGHT)]
    max_inflight: usize,

    /// Write the full JSON report to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rezone_sim=info".into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Rezone Simulator (rezone-sim) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let height_stat: HeightStat = args
        .local_height
        .parse()
        .map_err(|e: rezone_common::Error| anyhow::anyhow!(e.user_message()))?;
    let params = ZoningParams {
        distance_m: args.distance,
        height_multiple: args.height_multiple,
        height_stat,
    };
    params
        .validate()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let client = EngineClient::new(&args.engine_url);
    let selection = select_nhoods(&args, &client).await?;
    if selection.is_empty() {
        bail!("No neighborhoods selected");
    }

    let permalink = format!(
        "distance={}&heightMultiple={}&localHeight={}&selectedNhoods={}",
        params.distance_m,
        params.height_multiple,
        params.height_stat,
        nhoods::encode_selection(&selection)
    );

    info!(
        "Rezoning {} neighborhoods via {} (max {} in flight)",
        selection.len(),
        client.base_url(),
        args.max_inflight
    );

    let started = Instant::now();
    let total = selection.len();
    let result = orchestrator::run(selection, args.max_inflight, move |nhood| {
        let client = client.clone();
        async move { client.rezone(&nhood, &params).await }
    })
    .await;

    if result.failures.len() == total {
        bail!("All {} neighborhood requests failed", total);
    }

    let report = SimReport::new(
        args.engine_url,
        params,
        total,
        permalink,
        started.elapsed().as_millis(),
        result,
    );

    print!("{}", report.render_text());

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

/// Resolve the neighborhood selection from the CLI arguments
async fn select_nhoods(args: &Args, client: &EngineClient) -> Result<Vec<String>> {
    if args.all {
        let listed = client
            .nhoods()
            .await
            .context("Failed to list neighborhoods from the engine")?;
        return Ok(listed
            .into_iter()
            .filter(|n| n.parcel_count > 0)
            .map(|n| n.nhood)
            .collect());
    }

    if let Some(list) = &args.nhoods {
        let mut selection = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !nhoods::is_known(name) {
                bail!("Unknown neighborhood: {}", name);
            }
            selection.push(name.to_string());
        }
        return Ok(selection);
    }

    Ok(nhoods::DEFAULT_NHOODS.iter().map(|n| n.to_string()).collect())
}
