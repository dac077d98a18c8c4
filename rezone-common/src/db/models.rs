//! Database models and queries

use crate::Result;
use sqlx::SqlitePool;

/// A parcel row: built height, zoned height limit, precomputed lot
/// area and planar centroid (feet)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ParcelRow {
    pub blklot: String,
    pub height: f64,
    pub gen_hght: f64,
    pub area_sq_ft: f64,
    pub x_ft: f64,
    pub y_ft: f64,
}

/// A neighborhood row: name plus boundary ring as a JSON array of
/// `[x_ft, y_ft]` coordinates
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct NeighborhoodRow {
    pub nhood: String,
    pub boundary: String,
}

/// Load every parcel
pub async fn load_parcels(pool: &SqlitePool) -> Result<Vec<ParcelRow>> {
    let rows = sqlx::query_as::<_, ParcelRow>(
        "SELECT blklot, height, gen_hght, area_sq_ft, x_ft, y_ft FROM parcels",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Load every neighborhood boundary
pub async fn load_neighborhoods(pool: &SqlitePool) -> Result<Vec<NeighborhoodRow>> {
    let rows = sqlx::query_as::<_, NeighborhoodRow>(
        "SELECT nhood, boundary FROM neighborhoods ORDER BY nhood",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Number of parcels in the dataset
pub async fn count_parcels(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parcels")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert or replace a parcel
pub async fn insert_parcel(pool: &SqlitePool, parcel: &ParcelRow) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO parcels (blklot, height, gen_hght, area_sq_ft, x_ft, y_ft)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&parcel.blklot)
    .bind(parcel.height)
    .bind(parcel.gen_hght)
    .bind(parcel.area_sq_ft)
    .bind(parcel.x_ft)
    .bind(parcel.y_ft)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or replace a neighborhood boundary
pub async fn insert_neighborhood(pool: &SqlitePool, nhood: &NeighborhoodRow) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO neighborhoods (nhood, boundary) VALUES (?, ?)")
        .bind(&nhood.nhood)
        .bind(&nhood.boundary)
        .execute(pool)
        .await?;
    Ok(())
}
