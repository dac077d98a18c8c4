//! Capacity Engine (rezone-ce) - main entry point
//!
//! Loads the parcel dataset into memory, builds the spatial index, and
//! serves contextual rezoning queries over HTTP. The `ingest`
//! subcommand converts the parcel and neighborhood GeoJSON files into
//! the SQLite dataset the server loads.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;

use rezone_common::{config, db};
use rezone_ce::{build_router, dataset::Dataset, ingest, AppState};

/// Command-line arguments for rezone-ce
#[derive(Parser, Debug)]
#[command(name = "rezone-ce")]
#[command(about = "Capacity Engine for the rezone upzoning simulator")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5750", env = "REZONE_CE_PORT")]
    port: u16,

    /// Root folder containing rezone.db
    #[arg(short, long, env = "REZONE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import parcel and neighborhood GeoJSON into the dataset
    Ingest {
        /// Parcel FeatureCollection path
        #[arg(long)]
        parcels: PathBuf,

        /// Neighborhood FeatureCollection path
        #[arg(long)]
        nhoods: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rezone_ce=info,tower_http=info".into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Rezone Capacity Engine (rezone-ce) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), "REZONE_ROOT_FOLDER");
    config::ensure_root_folder(&root_folder)?;
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    if let Some(Command::Ingest { parcels, nhoods }) = args.command {
        let pool = db::init_database(&db_path)
            .await
            .context("Failed to initialize database")?;
        let summary = ingest::ingest_geojson(&pool, &parcels, &nhoods)
            .await
            .context("Ingest failed")?;
        info!(
            "Ingest complete: {} parcels, {} neighborhoods, {} skipped",
            summary.parcels, summary.neighborhoods, summary.skipped
        );
        return Ok(());
    }

    if !db_path.exists() {
        bail!(
            "No dataset at {} (run `rezone-ce ingest` first)",
            db_path.display()
        );
    }

    // Serving never writes; connect read-only
    let pool = db::connect_readonly(&db_path)
        .await
        .context("Failed to connect to database")?;

    let parcel_rows = db::load_parcels(&pool).await?;
    let nhood_rows = db::load_neighborhoods(&pool).await?;
    info!(
        "Loaded {} parcels across {} neighborhoods",
        parcel_rows.len(),
        nhood_rows.len()
    );

    let dataset = Dataset::build(parcel_rows, nhood_rows).context("Failed to build dataset")?;
    info!("Spatial index ready ({} parcels)", dataset.len());

    let state = AppState::new(Arc::new(dataset));
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("rezone-ce listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
