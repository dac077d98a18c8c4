//! rezone-ce library - Capacity Engine module
//!
//! Owns the in-memory parcel dataset and answers contextual rezoning
//! queries over HTTP: for each parcel in a neighborhood, derive a
//! reference height from nearby buildings, project a new zoned height,
//! and estimate the added unit capacity.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::dataset::Dataset;

pub mod api;
pub mod dataset;
pub mod engine;
pub mod ingest;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable parcel dataset built at startup
    pub dataset: Arc<Dataset>,
}

impl AppState {
    /// Create new application state
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/rezoning", get(api::get_rezoning))
        .route("/api/nhoods", get(api::get_nhoods))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
