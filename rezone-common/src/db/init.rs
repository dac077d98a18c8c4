//! Database initialization
//!
//! Creates the SQLite database on first run and brings up the parcel
//! and neighborhood tables. Table creation is idempotent so services
//! can call this unconditionally at startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize a read-write database connection, creating the file and
/// tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_parcels_table(&pool).await?;
    create_neighborhoods_table(&pool).await?;

    Ok(pool)
}

/// Open an existing database read-only (the serving path never writes)
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;
    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer during ingest
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

async fn create_parcels_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parcels (
            blklot TEXT PRIMARY KEY,
            height REAL NOT NULL DEFAULT 0,
            gen_hght REAL NOT NULL DEFAULT 0,
            area_sq_ft REAL NOT NULL DEFAULT 0,
            x_ft REAL NOT NULL,
            y_ft REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_neighborhoods_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS neighborhoods (
            nhood TEXT PRIMARY KEY,
            boundary TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
