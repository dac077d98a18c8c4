//! Neighborhood listing endpoint

use axum::{extract::State, Json};

use rezone_common::api::{NhoodSummary, NhoodsResponse};

use crate::AppState;

/// GET /api/nhoods
///
/// Lists the neighborhoods in the loaded dataset with their parcel
/// counts, so clients can enumerate valid `nhood` query values.
pub async fn get_nhoods(State(state): State<AppState>) -> Json<NhoodsResponse> {
    let nhoods = state
        .dataset
        .nhoods()
        .map(|(nhood, parcel_count)| NhoodSummary {
            nhood: nhood.to_string(),
            parcel_count,
        })
        .collect();

    Json(NhoodsResponse { nhoods })
}
