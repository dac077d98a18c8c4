//! Reference-height statistics

use rezone_common::HeightStat;

/// Apply a statistic to a non-empty set of nearby building heights.
///
/// Sorts the slice in place for the median. Returns 0.0 for an empty
/// slice, though callers skip parcels without neighbors before getting
/// here.
pub fn apply(stat: HeightStat, heights: &mut [f64]) -> f64 {
    if heights.is_empty() {
        return 0.0;
    }
    match stat {
        HeightStat::Max => heights.iter().copied().fold(f64::MIN, f64::max),
        HeightStat::Mean => heights.iter().sum::<f64>() / heights.len() as f64,
        HeightStat::Median => median(heights),
    }
}

/// Interpolated median (continuous percentile at 0.5): for an even
/// count, the mean of the two middle values
fn median(heights: &mut [f64]) -> f64 {
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = heights.len();
    let h = (n - 1) as f64 * 0.5;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if frac == 0.0 {
        heights[lo]
    } else {
        heights[lo] + (heights[lo + 1] - heights[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_of_heights() {
        let mut h = vec![12.0, 45.0, 30.0];
        assert_eq!(apply(HeightStat::Max, &mut h), 45.0);
    }

    #[test]
    fn mean_of_heights() {
        let mut h = vec![10.0, 20.0, 60.0];
        assert_eq!(apply(HeightStat::Mean, &mut h), 30.0);
    }

    #[test]
    fn median_odd_count_is_middle_value() {
        let mut h = vec![40.0, 10.0, 25.0];
        assert_eq!(apply(HeightStat::Median, &mut h), 25.0);
    }

    #[test]
    fn median_even_count_interpolates() {
        let mut h = vec![1.0, 10.0, 2.0, 3.0];
        assert_eq!(apply(HeightStat::Median, &mut h), 2.5);

        let mut h = vec![1.0, 3.0];
        assert_eq!(apply(HeightStat::Median, &mut h), 2.0);
    }

    #[test]
    fn single_value_is_its_own_statistic() {
        for stat in [HeightStat::Max, HeightStat::Mean, HeightStat::Median] {
            let mut h = vec![42.0];
            assert_eq!(apply(stat, &mut h), 42.0);
        }
    }
}
