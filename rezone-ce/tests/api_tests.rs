//! Integration tests for rezone-ce API endpoints
//!
//! Drives the router directly with a small fixture dataset: a block of
//! parcels 50 feet apart inside one neighborhood boundary, plus an
//! isolated parcel with no neighbors in range.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

use rezone_ce::{build_router, dataset::Dataset, AppState};
use rezone_common::db::{NeighborhoodRow, ParcelRow};

fn fixture_dataset() -> Dataset {
    let mut parcels = Vec::new();
    // Row of five parcels along x, 50 ft apart, heights 20..60
    for i in 0..5 {
        parcels.push(ParcelRow {
            blklot: format!("000100{}", i),
            height: 20.0 + 10.0 * i as f64,
            gen_hght: 40.0,
            area_sq_ft: 2_500.0,
            x_ft: 50.0 * i as f64,
            y_ft: 0.0,
        });
    }
    // Isolated parcel, far from everything
    parcels.push(ParcelRow {
        blklot: "0009999".to_string(),
        height: 30.0,
        gen_hght: 40.0,
        area_sq_ft: 2_500.0,
        x_ft: 10_000.0,
        y_ft: 10_000.0,
    });

    let nhoods = vec![
        NeighborhoodRow {
            nhood: "Mission".to_string(),
            boundary: "[[-100,-100],[400,-100],[400,100],[-100,100]]".to_string(),
        },
        NeighborhoodRow {
            nhood: "Seacliff".to_string(),
            boundary: "[[9000,9000],[11000,9000],[11000,11000],[9000,11000]]".to_string(),
        },
    ];

    Dataset::build(parcels, nhoods).unwrap()
}

fn setup_app() -> axum::Router {
    let state = AppState::new(Arc::new(fixture_dataset()));
    build_router(state)
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let response = app.oneshot(test_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rezone-ce");
    assert!(body["version"].is_string());
}

// =============================================================================
// Parameter Validation Tests
// =============================================================================

#[tokio::test]
async fn test_missing_params_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(test_request("/api/rezoning?distance=10&nhood=Mission"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body["error"],
        "distance, heightMultiple, and localHeight are required"
    );
}

#[tokio::test]
async fn test_missing_nhood_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=10&heightMultiple=1.3&localHeight=max",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "nhood is required");
}

#[tokio::test]
async fn test_non_numeric_distance_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=abc&heightMultiple=1.3&localHeight=max&nhood=Mission",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Distance must be a number");
}

#[tokio::test]
async fn test_out_of_range_distance_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=250&heightMultiple=1.3&localHeight=max&nhood=Mission",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Distance must be between 0 and 200 meters");
}

#[tokio::test]
async fn test_unknown_local_height_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=10&heightMultiple=1.3&localHeight=p90&nhood=Mission",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_nhood_is_404() {
    let app = setup_app();

    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=10&heightMultiple=1.3&localHeight=max&nhood=Atlantis",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

// =============================================================================
// Rezoning Evaluation Tests
// =============================================================================

#[tokio::test]
async fn test_rezoning_returns_per_parcel_results() {
    let app = setup_app();

    // 20 m (~65 ft) reaches the adjacent parcels 50 ft away
    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=20&heightMultiple=1.3&localHeight=max&nhood=Mission",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let parcels = body["rezonedParcels"].as_array().unwrap();
    assert_eq!(parcels.len(), 5);

    for parcel in parcels {
        assert!(parcel["blklot"].is_string());
        assert!(parcel["nearby_height"].as_f64().unwrap() > 0.0);
        assert!(parcel["new_zoned_height"].as_f64().unwrap() > 0.0);
        let added = parcel["added_capacity"].as_f64().unwrap();
        assert!((0.0..=1000.0).contains(&added));
        assert_eq!(added, added.trunc());
    }

    // Middle parcel (height 40) sees neighbors of 30 and 50
    let middle = parcels
        .iter()
        .find(|p| p["blklot"] == "0001002")
        .unwrap();
    assert_eq!(middle["nearby_height"].as_f64().unwrap(), 50.0);
    assert_eq!(middle["new_zoned_height"].as_f64().unwrap(), 65.0);
}

#[tokio::test]
async fn test_statistic_changes_reference_height() {
    let app = setup_app();

    let uri = |stat: &str| {
        format!(
            "/api/rezoning?distance=20&heightMultiple=1.0&localHeight={}&nhood=Mission",
            stat
        )
    };

    let max_body = extract_json(
        setup_app()
            .oneshot(test_request(&uri("max")))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let mean_body = extract_json(
        app.oneshot(test_request(&uri("mean")))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    let pick = |body: &Value, blklot: &str| -> f64 {
        body["rezonedParcels"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["blklot"] == blklot)
            .unwrap()["nearby_height"]
            .as_f64()
            .unwrap()
    };

    // Middle parcel: neighbors are 30 and 50
    assert_eq!(pick(&max_body, "0001002"), 50.0);
    assert_eq!(pick(&mean_body, "0001002"), 40.0);
}

#[tokio::test]
async fn test_parcels_without_neighbors_are_omitted() {
    let app = setup_app();

    // Seacliff contains only the isolated parcel
    let response = app
        .oneshot(test_request(
            "/api/rezoning?distance=20&heightMultiple=1.3&localHeight=max&nhood=Seacliff",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["rezonedParcels"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Neighborhood Listing Tests
// =============================================================================

#[tokio::test]
async fn test_nhoods_listing() {
    let app = setup_app();

    let response = app.oneshot(test_request("/api/nhoods")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let nhoods = body["nhoods"].as_array().unwrap();
    assert_eq!(nhoods.len(), 2);
    assert_eq!(nhoods[0]["nhood"], "Mission");
    assert_eq!(nhoods[0]["parcel_count"], 5);
    assert_eq!(nhoods[1]["nhood"], "Seacliff");
    assert_eq!(nhoods[1]["parcel_count"], 1);
}
