//! # Rezone Common Library
//!
//! Shared code for the rezone services including:
//! - Zoning parameter model and validation
//! - Neighborhood registry and selection encoding
//! - Planar geometry over the local San Francisco frame
//! - API request/response types
//! - Database models and queries
//! - Configuration loading

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod geometry;
pub mod nhoods;
pub mod params;

pub use error::{Error, Result};
pub use params::{HeightStat, ZoningParams};
