//! In-memory parcel dataset with spatial index
//!
//! Built once at startup from the database rows: every parcel goes into
//! an R*-tree keyed by its planar centroid for radius queries, and each
//! parcel is assigned to the first neighborhood whose boundary contains
//! its centroid. Parcels outside every boundary belong to no
//! neighborhood and are never evaluated, but still count as neighbors.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::warn;

use rezone_common::db::{NeighborhoodRow, ParcelRow};
use rezone_common::geometry::{PlanePoint, Ring};
use rezone_common::{Error, Result};

/// A parcel loaded for evaluation
#[derive(Debug, Clone)]
pub struct Parcel {
    pub blklot: String,
    /// Actual built height, feet
    pub height_ft: f64,
    /// Currently zoned height limit, feet
    pub zoned_height_ft: f64,
    /// Lot area, square feet
    pub area_sq_ft: f64,
    /// Planar centroid
    pub site: PlanePoint,
}

/// R-tree entry: parcel centroid plus its index into `Dataset::parcels`
struct ParcelSite {
    x_ft: f64,
    y_ft: f64,
    idx: usize,
}

impl RTreeObject for ParcelSite {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x_ft, self.y_ft])
    }
}

impl PointDistance for ParcelSite {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x_ft - point[0];
        let dy = self.y_ft - point[1];
        dx * dx + dy * dy
    }
}

/// The immutable evaluation dataset
pub struct Dataset {
    parcels: Vec<Parcel>,
    tree: RTree<ParcelSite>,
    /// Neighborhood name -> parcel indices, in boundary load order
    partitions: HashMap<String, Vec<usize>>,
    /// Neighborhood names in boundary load order
    nhood_order: Vec<String>,
}

impl Dataset {
    /// Build the dataset from database rows
    pub fn build(parcel_rows: Vec<ParcelRow>, nhood_rows: Vec<NeighborhoodRow>) -> Result<Self> {
        let mut boundaries: Vec<(String, Ring)> = Vec::with_capacity(nhood_rows.len());
        for row in nhood_rows {
            let ring = parse_boundary(&row.boundary).map_err(|e| {
                Error::Internal(format!("Bad boundary for {}: {}", row.nhood, e))
            })?;
            if ring.is_degenerate() {
                warn!("Skipping degenerate boundary for {}", row.nhood);
                continue;
            }
            boundaries.push((row.nhood, ring));
        }

        let parcels: Vec<Parcel> = parcel_rows
            .into_iter()
            .map(|row| Parcel {
                blklot: row.blklot,
                height_ft: row.height,
                zoned_height_ft: row.gen_hght,
                area_sq_ft: row.area_sq_ft,
                site: PlanePoint::new(row.x_ft, row.y_ft),
            })
            .collect();

        let mut partitions: HashMap<String, Vec<usize>> = HashMap::new();
        for (name, _) in &boundaries {
            partitions.entry(name.clone()).or_default();
        }
        let mut unassigned = 0usize;
        for (idx, parcel) in parcels.iter().enumerate() {
            match boundaries.iter().find(|(_, ring)| ring.contains(&parcel.site)) {
                Some((name, _)) => partitions.entry(name.clone()).or_default().push(idx),
                None => unassigned += 1,
            }
        }
        if unassigned > 0 {
            warn!("{} parcels fall outside every neighborhood boundary", unassigned);
        }

        let sites: Vec<ParcelSite> = parcels
            .iter()
            .enumerate()
            .map(|(idx, p)| ParcelSite {
                x_ft: p.site.x_ft,
                y_ft: p.site.y_ft,
                idx,
            })
            .collect();
        let tree = RTree::bulk_load(sites);

        let nhood_order = boundaries.into_iter().map(|(name, _)| name).collect();

        Ok(Self {
            parcels,
            tree,
            partitions,
            nhood_order,
        })
    }

    /// Number of parcels loaded
    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn parcel(&self, idx: usize) -> &Parcel {
        &self.parcels[idx]
    }

    /// Parcel indices belonging to a neighborhood, or None if the
    /// neighborhood is not in the dataset
    pub fn partition(&self, nhood: &str) -> Option<&[usize]> {
        self.partitions.get(nhood).map(|v| v.as_slice())
    }

    /// Neighborhoods with their parcel counts, in load order
    pub fn nhoods(&self) -> impl Iterator<Item = (&str, usize)> {
        self.nhood_order.iter().map(|name| {
            let count = self.partitions.get(name).map(|v| v.len()).unwrap_or(0);
            (name.as_str(), count)
        })
    }

    /// Indices of parcels whose centroid lies within `radius_ft` of the
    /// given point (including any parcel located at the point itself)
    pub fn neighbors_within(
        &self,
        site: PlanePoint,
        radius_ft: f64,
    ) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_within_distance([site.x_ft, site.y_ft], radius_ft * radius_ft)
            .map(|s| s.idx)
    }
}

/// Parse a boundary ring stored as a JSON array of `[x_ft, y_ft]`
fn parse_boundary(json: &str) -> std::result::Result<Ring, serde_json::Error> {
    let coords: Vec<[f64; 2]> = serde_json::from_str(json)?;
    Ok(Ring::new(
        coords.into_iter().map(|[x, y]| PlanePoint::new(x, y)).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel_row(blklot: &str, x: f64, y: f64) -> ParcelRow {
        ParcelRow {
            blklot: blklot.to_string(),
            height: 30.0,
            gen_hght: 40.0,
            area_sq_ft: 2_500.0,
            x_ft: x,
            y_ft: y,
        }
    }

    fn square_boundary(name: &str, x0: f64, y0: f64, size: f64) -> NeighborhoodRow {
        NeighborhoodRow {
            nhood: name.to_string(),
            boundary: format!(
                "[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}]]",
                x0 = x0,
                y0 = y0,
                x1 = x0 + size,
                y1 = y0 + size
            ),
        }
    }

    #[test]
    fn parcels_are_partitioned_by_boundary() {
        let dataset = Dataset::build(
            vec![
                parcel_row("A", 50.0, 50.0),
                parcel_row("B", 150.0, 50.0),
                parcel_row("C", 950.0, 950.0), // outside both
            ],
            vec![
                square_boundary("West", 0.0, 0.0, 100.0),
                square_boundary("East", 100.0, 0.0, 100.0),
            ],
        )
        .unwrap();

        assert_eq!(dataset.partition("West"), Some(&[0usize][..]));
        assert_eq!(dataset.partition("East"), Some(&[1usize][..]));
        assert_eq!(dataset.partition("Atlantis"), None);
    }

    #[test]
    fn nhoods_report_counts_in_load_order() {
        let dataset = Dataset::build(
            vec![parcel_row("A", 50.0, 50.0), parcel_row("B", 60.0, 50.0)],
            vec![
                square_boundary("West", 0.0, 0.0, 100.0),
                square_boundary("East", 100.0, 0.0, 100.0),
            ],
        )
        .unwrap();

        let listed: Vec<(String, usize)> = dataset
            .nhoods()
            .map(|(n, c)| (n.to_string(), c))
            .collect();
        assert_eq!(
            listed,
            vec![("West".to_string(), 2), ("East".to_string(), 0)]
        );
    }

    #[test]
    fn radius_query_respects_distance() {
        let dataset = Dataset::build(
            vec![
                parcel_row("A", 0.0, 0.0),
                parcel_row("B", 30.0, 0.0),
                parcel_row("C", 0.0, 40.0),
                parcel_row("D", 100.0, 100.0),
            ],
            vec![square_boundary("West", -10.0, -10.0, 200.0)],
        )
        .unwrap();

        let mut found: Vec<usize> = dataset
            .neighbors_within(PlanePoint::new(0.0, 0.0), 45.0)
            .collect();
        found.sort_unstable();
        // A (itself), B at 30 ft, C at 40 ft; D at ~141 ft is out
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn bad_boundary_json_is_an_error() {
        let result = Dataset::build(
            vec![],
            vec![NeighborhoodRow {
                nhood: "Broken".to_string(),
                boundary: "not json".to_string(),
            }],
        );
        assert!(result.is_err());
    }
}
