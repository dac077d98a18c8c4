//! HTTP API handlers for rezone-ce

pub mod buildinfo;
pub mod health;
pub mod nhoods;
pub mod rezoning;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use nhoods::get_nhoods;
pub use rezoning::get_rezoning;
