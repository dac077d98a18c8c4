//! Floor-count and lot-coverage capacity heuristic
//!
//! Converts a zoned height envelope into an estimated residential unit
//! count: floors above a ground-floor allowance, a lot-coverage
//! discount, tower floor-plate limits above 85 feet, and an 80%
//! efficiency factor. Results are in units (thousands of square feet
//! of buildable floor area).

/// Square feet per acre
pub const ACRE_SQ_FT: f64 = 43_560.0;

/// Usable share of the gross envelope
const EFFICIENCY: f64 = 0.8;

/// Per-parcel cap on added units
const UNIT_CAP: f64 = 1_000.0;

/// Assumed floor-to-floor height, feet
const FLOOR_HEIGHT_FT: f64 = 10.0;

/// Height above which the tower floor-plate rules kick in, feet
const TOWER_THRESHOLD_FT: f64 = 85.0;

/// Maximum tower floor plate, square feet
const TOWER_PLATE_SQ_FT: f64 = 12_000.0;

/// Lot area above which a single tower no longer covers the parcel
const LARGE_LOT_SQ_FT: f64 = 45_000.0;

/// Floors below the tower portion that may use the full podium plate
const PODIUM_FLOORS: f64 = 7.0;

/// Residential floors available under a height limit.
///
/// The first 10 feet (15 for buildings over 50 feet, which need taller
/// lobbies and mechanical space) are reserved for the ground floor.
/// May be negative for very low height limits; the added-capacity step
/// clamps at zero overall.
pub fn residential_floors(height_ft: f64) -> f64 {
    let ground = if height_ft <= 50.0 { 10.0 } else { 15.0 };
    ((height_ft - ground) / FLOOR_HEIGHT_FT).floor()
}

/// Lot coverage discount: 55% on lots over an acre, 75% otherwise
pub fn lot_coverage_discount(area_sq_ft: f64) -> f64 {
    if area_sq_ft / ACRE_SQ_FT > 1.0 {
        0.55
    } else {
        0.75
    }
}

/// Buildable envelope under a height limit, in units.
///
/// Below the tower threshold the envelope is simply ground floor times
/// floor count. Above it, floors beyond the podium are limited to a
/// 12,000 sq ft tower plate; lots over 45,000 sq ft get one tower per
/// acre.
pub fn envelope_units(height_ft: f64, area_sq_ft: f64) -> f64 {
    let floors = residential_floors(height_ft);
    let ground_floor = area_sq_ft * lot_coverage_discount(area_sq_ft);
    let tower_floors = (floors - PODIUM_FLOORS).max(0.0);

    let gross = if height_ft <= TOWER_THRESHOLD_FT {
        ground_floor * floors
    } else if area_sq_ft < TOWER_PLATE_SQ_FT {
        ground_floor * floors
    } else if area_sq_ft < LARGE_LOT_SQ_FT {
        ground_floor * PODIUM_FLOORS + TOWER_PLATE_SQ_FT * tower_floors
    } else {
        ground_floor * PODIUM_FLOORS
            + (area_sq_ft / ACRE_SQ_FT).round() * TOWER_PLATE_SQ_FT * tower_floors
    };

    gross * EFFICIENCY / 1_000.0
}

/// Added capacity of raising a parcel from its status-quo height to a
/// new zoned height: zero when the new envelope is smaller, otherwise
/// the rounded difference capped at 1,000 units
pub fn added_capacity(squo_height_ft: f64, new_height_ft: f64, area_sq_ft: f64) -> f64 {
    let squo = envelope_units(squo_height_ft, area_sq_ft);
    let new = envelope_units(new_height_ft, area_sq_ft);
    if new < squo {
        0.0
    } else {
        (new - squo).round().min(UNIT_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_step_at_podium_heights() {
        assert_eq!(residential_floors(40.0), 3.0);
        assert_eq!(residential_floors(50.0), 4.0);
        // Crossing 50 ft raises the ground-floor allowance to 15
        assert_eq!(residential_floors(51.0), 3.0);
        assert_eq!(residential_floors(85.0), 7.0);
        assert_eq!(residential_floors(105.0), 9.0);
    }

    #[test]
    fn floors_can_go_negative() {
        assert_eq!(residential_floors(0.0), -1.0);
        assert_eq!(residential_floors(5.0), -1.0);
    }

    #[test]
    fn coverage_discount_steps_at_one_acre() {
        assert_eq!(lot_coverage_discount(2_500.0), 0.75);
        assert_eq!(lot_coverage_discount(43_560.0), 0.75);
        assert_eq!(lot_coverage_discount(43_561.0), 0.55);
    }

    #[test]
    fn envelope_low_rise() {
        // 2,500 sq ft lot, 40 ft limit: 3 floors * 1,875 sq ft * 0.8
        let units = envelope_units(40.0, 2_500.0);
        assert!((units - 4.5).abs() < 1e-9);
    }

    #[test]
    fn envelope_small_lot_tower_keeps_full_plate() {
        // Under 12,000 sq ft the tower plate limit does not apply
        let units = envelope_units(105.0, 10_000.0);
        let expected = 10_000.0 * 0.75 * 9.0 * 0.8 / 1_000.0;
        assert!((units - expected).abs() < 1e-9);
    }

    #[test]
    fn envelope_mid_lot_tower_is_plate_limited() {
        // 20,000 sq ft lot, 105 ft: podium 7 floors + 2 tower floors at
        // the 12,000 sq ft plate
        let units = envelope_units(105.0, 20_000.0);
        let expected = (20_000.0 * 0.75 * 7.0 + 12_000.0 * 2.0) * 0.8 / 1_000.0;
        assert!((units - expected).abs() < 1e-9);
    }

    #[test]
    fn envelope_large_lot_gets_one_tower_per_acre() {
        // 100,000 sq ft lot (~2.3 acres -> 2 towers), 105 ft
        let units = envelope_units(105.0, 100_000.0);
        let expected = (100_000.0 * 0.55 * 7.0 + 2.0 * 12_000.0 * 2.0) * 0.8 / 1_000.0;
        assert!((units - expected).abs() < 1e-9);
    }

    #[test]
    fn added_capacity_is_zero_for_downzoning() {
        assert_eq!(added_capacity(85.0, 40.0, 2_500.0), 0.0);
    }

    #[test]
    fn added_capacity_rounds_the_delta() {
        // squo 4.5 units (3 floors), new 7.5 units (5 floors) -> 3
        let added = added_capacity(40.0, 65.0, 2_500.0);
        assert_eq!(added, 3.0);
    }

    #[test]
    fn added_capacity_caps_at_one_thousand() {
        let added = added_capacity(10.0, 10_000.0, 200_000.0);
        assert_eq!(added, 1_000.0);
    }

    #[test]
    fn added_capacity_is_integral() {
        for (squo, new, area) in [(40.0, 57.0, 3_333.0), (25.0, 91.0, 17_500.0)] {
            let added = added_capacity(squo, new, area);
            assert_eq!(added, added.trunc());
            assert!(added >= 0.0);
        }
    }
}
