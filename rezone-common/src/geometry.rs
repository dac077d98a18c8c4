//! Planar geometry over a local San Francisco frame
//!
//! Footprints arrive as WGS84 lon/lat and are worked in a local planar
//! frame in US survey feet (the frame the lot-area heuristics are
//! calibrated for). Projection is equirectangular about a fixed city
//! origin, which is accurate to well under a foot across the ~12 km
//! extent of San Francisco.

pub const FEET_PER_METER: f64 = 3.280_839_895_013_123;

// Equirectangular approximation constants
const M_PER_DEG_LAT: f64 = 110_574.0;
const M_PER_DEG_LON_EQUATOR: f64 = 111_320.0;

/// Projection origin (San Francisco Civic Center)
pub const SF_ORIGIN_LON: f64 = -122.4194;
pub const SF_ORIGIN_LAT: f64 = 37.7749;

/// Convert meters to US survey feet
pub fn meters_to_feet(m: f64) -> f64 {
    m * FEET_PER_METER
}

/// A point in the local planar frame, in feet east/north of the origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanePoint {
    pub x_ft: f64,
    pub y_ft: f64,
}

impl PlanePoint {
    pub fn new(x_ft: f64, y_ft: f64) -> Self {
        Self { x_ft, y_ft }
    }

    /// Euclidean distance to another point, in feet
    pub fn distance_ft(&self, other: &PlanePoint) -> f64 {
        let dx = self.x_ft - other.x_ft;
        let dy = self.y_ft - other.y_ft;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Equirectangular lon/lat -> plane projection anchored at a fixed origin
#[derive(Debug, Clone, Copy)]
pub struct LocalPlane {
    origin_lon: f64,
    origin_lat: f64,
    m_per_deg_lon: f64,
}

impl LocalPlane {
    pub fn new(origin_lon: f64, origin_lat: f64) -> Self {
        let m_per_deg_lon =
            M_PER_DEG_LON_EQUATOR * origin_lat.to_radians().cos().abs().max(1e-6);
        Self {
            origin_lon,
            origin_lat,
            m_per_deg_lon,
        }
    }

    /// Plane anchored at the San Francisco origin
    pub fn san_francisco() -> Self {
        Self::new(SF_ORIGIN_LON, SF_ORIGIN_LAT)
    }

    /// Project a lon/lat coordinate into the plane
    pub fn project(&self, lon: f64, lat: f64) -> PlanePoint {
        let x_m = (lon - self.origin_lon) * self.m_per_deg_lon;
        let y_m = (lat - self.origin_lat) * M_PER_DEG_LAT;
        PlanePoint::new(meters_to_feet(x_m), meters_to_feet(y_m))
    }
}

/// A polygon exterior ring in the local plane.
///
/// Rings are accepted open or closed; the closing duplicate vertex is
/// dropped on construction. Degenerate rings (fewer than 3 distinct
/// vertices) have zero area and contain nothing.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    points: Vec<PlanePoint>,
}

impl Ring {
    pub fn new(mut points: Vec<PlanePoint>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    pub fn points(&self) -> &[PlanePoint] {
        &self.points
    }

    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Enclosed area via the shoelace formula, in square feet
    pub fn area_sq_ft(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let mut twice_area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x_ft * b.y_ft - b.x_ft * a.y_ft;
        }
        (twice_area / 2.0).abs()
    }

    /// Area-weighted polygon centroid, falling back to the vertex mean
    /// for degenerate or zero-area rings
    pub fn centroid(&self) -> PlanePoint {
        let n = self.points.len();
        if n == 0 {
            return PlanePoint::default();
        }

        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let cross = a.x_ft * b.y_ft - b.x_ft * a.y_ft;
            twice_area += cross;
            cx += (a.x_ft + b.x_ft) * cross;
            cy += (a.y_ft + b.y_ft) * cross;
        }

        if twice_area.abs() < f64::EPSILON {
            let sum = self
                .points
                .iter()
                .fold((0.0, 0.0), |acc, p| (acc.0 + p.x_ft, acc.1 + p.y_ft));
            return PlanePoint::new(sum.0 / n as f64, sum.1 / n as f64);
        }

        let factor = twice_area * 3.0;
        PlanePoint::new(cx / factor, cy / factor)
    }

    /// Ray-casting point-in-polygon test.
    ///
    /// Points exactly on an edge may land on either side; boundary
    /// parcels are rare enough that the assignment is acceptable.
    pub fn contains(&self, p: &PlanePoint) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y_ft > p.y_ft) != (b.y_ft > p.y_ft) {
                let x_cross = (b.x_ft - a.x_ft) * (p.y_ft - a.y_ft) / (b.y_ft - a.y_ft) + a.x_ft;
                if p.x_ft < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Ring {
        Ring::new(vec![
            PlanePoint::new(0.0, 0.0),
            PlanePoint::new(100.0, 0.0),
            PlanePoint::new(100.0, 100.0),
            PlanePoint::new(0.0, 100.0),
        ])
    }

    #[test]
    fn square_area_and_centroid() {
        let ring = unit_square();
        assert!((ring.area_sq_ft() - 10_000.0).abs() < 1e-9);
        let c = ring.centroid();
        assert!((c.x_ft - 50.0).abs() < 1e-9);
        assert!((c.y_ft - 50.0).abs() < 1e-9);
    }

    #[test]
    fn closed_ring_drops_duplicate_vertex() {
        let ring = Ring::new(vec![
            PlanePoint::new(0.0, 0.0),
            PlanePoint::new(100.0, 0.0),
            PlanePoint::new(100.0, 100.0),
            PlanePoint::new(0.0, 100.0),
            PlanePoint::new(0.0, 0.0),
        ]);
        assert_eq!(ring.points().len(), 4);
        assert!((ring.area_sq_ft() - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn containment() {
        let ring = unit_square();
        assert!(ring.contains(&PlanePoint::new(50.0, 50.0)));
        assert!(ring.contains(&PlanePoint::new(1.0, 99.0)));
        assert!(!ring.contains(&PlanePoint::new(150.0, 50.0)));
        assert!(!ring.contains(&PlanePoint::new(-1.0, 50.0)));
    }

    #[test]
    fn degenerate_rings_are_empty() {
        let ring = Ring::new(vec![PlanePoint::new(0.0, 0.0), PlanePoint::new(1.0, 1.0)]);
        assert!(ring.is_degenerate());
        assert_eq!(ring.area_sq_ft(), 0.0);
        assert!(!ring.contains(&PlanePoint::new(0.5, 0.5)));
    }

    #[test]
    fn projection_distance_scale() {
        let plane = LocalPlane::san_francisco();
        let origin = plane.project(SF_ORIGIN_LON, SF_ORIGIN_LAT);
        assert!(origin.distance_ft(&PlanePoint::default()) < 1e-9);

        // One degree of latitude is ~110.574 km
        let north = plane.project(SF_ORIGIN_LON, SF_ORIGIN_LAT + 0.01);
        let expected_ft = meters_to_feet(1_105.74);
        assert!((origin.distance_ft(&north) - expected_ft).abs() < 1.0);
    }

    #[test]
    fn meters_to_feet_conversion() {
        assert!((meters_to_feet(1.0) - 3.280_839_9).abs() < 1e-6);
        assert!((meters_to_feet(200.0) - 656.168).abs() < 1e-3);
    }
}
