//! Contextual rezoning query endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use rezone_common::api::RezoningResponse;
use rezone_common::{Error, HeightStat, ZoningParams};

use crate::{engine, AppState};

/// Query parameters for a rezoning request.
///
/// Values arrive as strings and are parsed by hand so malformed input
/// produces the established error messages rather than a generic 400.
#[derive(Debug, Deserialize)]
pub struct RezoningQuery {
    pub distance: Option<String>,

    #[serde(rename = "heightMultiple")]
    pub height_multiple: Option<String>,

    pub nhood: Option<String>,

    #[serde(rename = "localHeight")]
    pub local_height: Option<String>,
}

/// GET /api/rezoning
///
/// Evaluates a contextual rezoning for one neighborhood and returns
/// the per-parcel results.
pub async fn get_rezoning(
    State(state): State<AppState>,
    Query(query): Query<RezoningQuery>,
) -> Result<Json<RezoningResponse>, RezoningError> {
    let (Some(distance), Some(height_multiple), Some(local_height)) =
        (query.distance, query.height_multiple, query.local_height)
    else {
        return Err(RezoningError::MissingParams);
    };
    let nhood = query.nhood.ok_or(RezoningError::MissingNhood)?;

    let distance_m: f64 = distance
        .trim()
        .parse()
        .map_err(|_| RezoningError::InvalidParam("Distance must be a number".to_string()))?;
    let height_multiple: f64 = height_multiple.trim().parse().map_err(|_| {
        RezoningError::InvalidParam("Height multiple must be a number".to_string())
    })?;
    let height_stat: HeightStat = local_height
        .parse()
        .map_err(|e: Error| RezoningError::InvalidParam(e.user_message()))?;

    let params = ZoningParams {
        distance_m,
        height_multiple,
        height_stat,
    };
    params
        .validate()
        .map_err(|e| RezoningError::InvalidParam(e.user_message()))?;

    // The evaluation is CPU-bound; keep it off the async workers
    let dataset = state.dataset.clone();
    let rezoned_parcels = tokio::task::spawn_blocking(move || {
        engine::evaluate_neighborhood(&dataset, &nhood, &params)
    })
    .await
    .map_err(|e| RezoningError::Internal(e.to_string()))?
    .map_err(|e| match e {
        Error::NotFound(msg) => RezoningError::UnknownNhood(msg),
        other => RezoningError::Internal(other.to_string()),
    })?;

    Ok(Json(RezoningResponse { rezoned_parcels }))
}

/// Rezoning API errors
#[derive(Debug)]
pub enum RezoningError {
    MissingParams,
    MissingNhood,
    InvalidParam(String),
    UnknownNhood(String),
    Internal(String),
}

impl IntoResponse for RezoningError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RezoningError::MissingParams => (
                StatusCode::BAD_REQUEST,
                "distance, heightMultiple, and localHeight are required".to_string(),
            ),
            RezoningError::MissingNhood => {
                (StatusCode::BAD_REQUEST, "nhood is required".to_string())
            }
            RezoningError::InvalidParam(msg) => (StatusCode::BAD_REQUEST, msg),
            RezoningError::UnknownNhood(msg) => (StatusCode::NOT_FOUND, msg),
            RezoningError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
