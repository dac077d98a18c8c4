//! Contextual rezoning evaluation
//!
//! For every parcel in a neighborhood: find the parcels whose centroid
//! lies within the search radius (citywide, not just in-neighborhood),
//! derive a reference height from their built heights, scale it by the
//! height multiplier, and convert the envelope change into an added
//! unit capacity estimate. Parcels with no neighbor in range are
//! omitted from the result.

pub mod capacity;
pub mod stats;

use tracing::debug;

use rezone_common::api::RezonedParcel;
use rezone_common::geometry::meters_to_feet;
use rezone_common::{Error, Result, ZoningParams};

use crate::dataset::Dataset;

/// Evaluate a rezoning for every parcel in a neighborhood.
///
/// The caller is responsible for parameter validation; an unknown
/// neighborhood is a `NotFound` error.
pub fn evaluate_neighborhood(
    dataset: &Dataset,
    nhood: &str,
    params: &ZoningParams,
) -> Result<Vec<RezonedParcel>> {
    let members = dataset
        .partition(nhood)
        .ok_or_else(|| Error::NotFound(format!("Unknown neighborhood: {}", nhood)))?;

    let radius_ft = meters_to_feet(params.distance_m);
    let mut results = Vec::with_capacity(members.len());
    let mut nearby_heights: Vec<f64> = Vec::new();

    for &idx in members {
        let parcel = dataset.parcel(idx);

        nearby_heights.clear();
        for neighbor_idx in dataset.neighbors_within(parcel.site, radius_ft) {
            if neighbor_idx != idx {
                nearby_heights.push(dataset.parcel(neighbor_idx).height_ft);
            }
        }
        if nearby_heights.is_empty() {
            continue;
        }

        let nearby_height = stats::apply(params.height_stat, &mut nearby_heights);
        let new_zoned_height = nearby_height * params.height_multiple;

        // Status quo counts whichever is greater: what stands today or
        // what current zoning already allows
        let squo_height = parcel.height_ft.max(parcel.zoned_height_ft);

        let added_capacity =
            capacity::added_capacity(squo_height, new_zoned_height, parcel.area_sq_ft);

        results.push(RezonedParcel {
            blklot: parcel.blklot.clone(),
            nearby_height,
            new_zoned_height,
            added_capacity,
        });
    }

    debug!(
        nhood,
        evaluated = members.len(),
        rezoned = results.len(),
        "neighborhood evaluated"
    );

    Ok(results)
}
