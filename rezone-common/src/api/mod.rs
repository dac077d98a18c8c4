//! Shared API types for the rezone services

pub mod types;

pub use types::{
    ErrorBody, NhoodSummary, NhoodsResponse, RezonedParcel, RezoningResponse,
};
