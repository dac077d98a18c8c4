//! GeoJSON dataset ingest
//!
//! One-time conversion of the parcel and neighborhood
//! FeatureCollections (WGS84 lon/lat) into the SQLite dataset the
//! engine loads at startup. Footprints are projected into the local
//! planar frame; lot area comes from the footprint (sum of polygon
//! parts), the indexed site from the centroid of the largest part.
//! Features without an identifier or a usable footprint are skipped
//! and counted.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use rezone_common::db::{insert_neighborhood, insert_parcel, NeighborhoodRow, ParcelRow};
use rezone_common::geometry::{LocalPlane, PlanePoint, Ring};
use rezone_common::{Error, Result};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Value,
    geometry: Option<Geometry>,
}

/// Positions are arrays of 2+ numbers; trailing elements (altitude)
/// are ignored
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Other,
}

/// Counts reported after an ingest run
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub parcels: usize,
    pub neighborhoods: usize,
    pub skipped: usize,
}

/// Import both FeatureCollections into the database
pub async fn ingest_geojson(
    pool: &sqlx::SqlitePool,
    parcels_path: &Path,
    nhoods_path: &Path,
) -> Result<IngestSummary> {
    let plane = LocalPlane::san_francisco();
    let mut summary = IngestSummary::default();

    let parcels = read_collection(parcels_path)?;
    info!(
        "Ingesting {} parcel features from {}",
        parcels.features.len(),
        parcels_path.display()
    );
    for feature in parcels.features {
        match parcel_from_feature(&plane, &feature) {
            Some(row) => {
                insert_parcel(pool, &row).await?;
                summary.parcels += 1;
            }
            None => summary.skipped += 1,
        }
    }

    let nhoods = read_collection(nhoods_path)?;
    info!(
        "Ingesting {} neighborhood features from {}",
        nhoods.features.len(),
        nhoods_path.display()
    );
    for feature in nhoods.features {
        match neighborhood_from_feature(&plane, &feature) {
            Some(row) => {
                insert_neighborhood(pool, &row).await?;
                summary.neighborhoods += 1;
            }
            None => summary.skipped += 1,
        }
    }

    if summary.skipped > 0 {
        warn!("Skipped {} features without id or usable footprint", summary.skipped);
    }

    Ok(summary)
}

fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::InvalidInput(format!("Bad GeoJSON in {}: {}", path.display(), e)))
}

/// Exterior rings of a geometry, projected into the plane
fn projected_rings(plane: &LocalPlane, geometry: &Geometry) -> Vec<Ring> {
    let project_ring = |ring: &[Position]| -> Option<Ring> {
        let points: Vec<PlanePoint> = ring
            .iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| plane.project(pos[0], pos[1]))
            .collect();
        let ring = Ring::new(points);
        (!ring.is_degenerate()).then_some(ring)
    };

    match geometry {
        Geometry::Polygon { coordinates } => coordinates
            .first()
            .and_then(|exterior| project_ring(exterior))
            .into_iter()
            .collect(),
        Geometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .filter_map(|polygon| polygon.first())
            .filter_map(|exterior| project_ring(exterior))
            .collect(),
        Geometry::Other => Vec::new(),
    }
}

fn parcel_from_feature(plane: &LocalPlane, feature: &Feature) -> Option<ParcelRow> {
    let blklot = feature.properties.get("blklot")?.as_str()?.to_string();
    let rings = projected_rings(plane, feature.geometry.as_ref()?);
    if rings.is_empty() {
        return None;
    }

    let height = number_property(&feature.properties, "height").unwrap_or(0.0);
    let gen_hght = number_property(&feature.properties, "zoned_height")
        .or_else(|| number_property(&feature.properties, "gen_hght"))
        .unwrap_or(0.0);

    let area_sq_ft: f64 = rings.iter().map(Ring::area_sq_ft).sum();
    let site = largest_ring(&rings).centroid();

    Some(ParcelRow {
        blklot,
        height,
        gen_hght,
        area_sq_ft,
        x_ft: site.x_ft,
        y_ft: site.y_ft,
    })
}

fn neighborhood_from_feature(plane: &LocalPlane, feature: &Feature) -> Option<NeighborhoodRow> {
    let name = feature.properties.get("nhood")?.as_str()?.to_string();
    let rings = projected_rings(plane, feature.geometry.as_ref()?);
    if rings.is_empty() {
        return None;
    }

    // Boundaries are stored as the largest part only; the SF analysis
    // neighborhoods are single polygons in practice
    let boundary = largest_ring(&rings);
    let coords: Vec<[f64; 2]> = boundary
        .points()
        .iter()
        .map(|p| [p.x_ft, p.y_ft])
        .collect();

    Some(NeighborhoodRow {
        nhood: name,
        boundary: serde_json::to_string(&coords).ok()?,
    })
}

fn largest_ring(rings: &[Ring]) -> &Ring {
    rings
        .iter()
        .max_by(|a, b| {
            a.area_sq_ft()
                .partial_cmp(&b.area_sq_ft())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("caller checked rings is non-empty")
}

fn number_property(properties: &serde_json::Value, key: &str) -> Option<f64> {
    let value = properties.get(key)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
