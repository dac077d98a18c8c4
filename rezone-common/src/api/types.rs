//! API request/response types
//!
//! Field names follow the established wire format: response envelopes
//! are camelCase, per-parcel rows keep their snake_case column names.

use serde::{Deserialize, Serialize};

/// Rezoning result for a single parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RezonedParcel {
    /// Parcel identifier (block + lot)
    pub blklot: String,
    /// Reference height derived from nearby buildings, in feet
    pub nearby_height: f64,
    /// Proposed zoned height after applying the multiplier, in feet
    pub new_zoned_height: f64,
    /// Estimated added unit capacity, integral and capped at 1000
    pub added_capacity: f64,
}

/// Response body for `GET /api/rezoning`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RezoningResponse {
    pub rezoned_parcels: Vec<RezonedParcel>,
}

/// One neighborhood in the dataset listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NhoodSummary {
    pub nhood: String,
    pub parcel_count: usize,
}

/// Response body for `GET /api/nhoods`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NhoodsResponse {
    pub nhoods: Vec<NhoodSummary>,
}

/// Error response body shared by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
