//! Database layer: connection setup, models, and queries

pub mod init;
pub mod models;

pub use init::{connect_readonly, init_database};
pub use models::{
    count_parcels, insert_neighborhood, insert_parcel, load_neighborhoods, load_parcels,
    NeighborhoodRow, ParcelRow,
};
