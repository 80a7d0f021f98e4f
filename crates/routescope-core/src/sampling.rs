//! Equidistant sampling of route points for per-point annotation lookups.
//!
//! Samples are spread evenly over the *index* range of the route, not over
//! its travelled distance. Integer flooring of the step means the last sample
//! is not guaranteed to be the route's final point, and samples are not
//! guaranteed to be distinct.

use crate::models::Point;

/// Samples taken along a route for air-quality lookups.
pub const AIR_QUALITY_SAMPLES: usize = 5;
/// Samples taken along a route for weather lookups.
pub const WEATHER_SAMPLES: usize = 10;

/// Index plan for [`sample`].
///
/// Routes with fewer than two points produce no samples. A `count` of one
/// yields only the first point; zero yields nothing.
pub fn sample_indices(len: usize, count: usize) -> Vec<usize> {
    if len < 2 || count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![0];
    }

    let segments = len - 1;
    let step = segments / (count - 1);
    (0..count)
        .map(|i| i.saturating_mul(step).min(segments))
        .collect()
}

/// Pick `count` points spread evenly along the index range of `points`.
pub fn sample(points: &[Point], count: usize) -> Vec<Point> {
    sample_indices(points.len(), count)
        .into_iter()
        .map(|index| points[index])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, i as f64)).collect()
    }

    #[test]
    fn short_routes_yield_no_samples() {
        assert!(sample(&[], 5).is_empty());
        assert!(sample(&diagonal(1), 5).is_empty());
        assert!(sample(&diagonal(1), 10).is_empty());
    }

    #[test]
    fn sample_count_matches_request() {
        for len in 2..40 {
            let points = diagonal(len);
            for count in 2..12 {
                let samples = sample(&points, count);
                assert_eq!(samples.len(), count, "len={len} count={count}");
                assert!(samples.iter().all(|p| points.contains(p)));
            }
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let points = diagonal(23);
        assert_eq!(sample(&points, 7), sample(&points, 7));
    }

    #[test]
    fn evenly_divisible_routes_give_distinct_increasing_samples() {
        // segments = 12, divisible by count - 1 for these counts
        for count in [2, 3, 4, 5, 7, 13] {
            let indices = sample_indices(13, count);
            assert!(
                indices.windows(2).all(|w| w[0] < w[1]),
                "count={count} indices={indices:?}"
            );
            assert_eq!(*indices.last().unwrap(), 12);
        }
    }

    #[test]
    fn five_points_five_samples_is_identity() {
        let points = diagonal(5);
        assert_eq!(sample(&points, 5), points);
    }

    #[test]
    fn last_sample_can_miss_route_end() {
        let points = diagonal(11);
        let indices = sample_indices(points.len(), 10);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

        let samples = sample(&points, 10);
        assert_eq!(samples[9], Point::new(9.0, 9.0));
        assert_ne!(samples[9], *points.last().unwrap());
    }

    #[test]
    fn short_routes_repeat_points_instead_of_deduplicating() {
        // segments = 2, step = floor(2 / 4) = 0
        let indices = sample_indices(3, AIR_QUALITY_SAMPLES);
        assert_eq!(indices, vec![0, 0, 0, 0, 0]);

        // segments = 5, step = 1, tail clamps to the last index
        let indices = sample_indices(6, 10);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn single_sample_is_the_route_start() {
        let points = diagonal(4);
        assert_eq!(sample(&points, 1), vec![Point::new(0.0, 0.0)]);
        assert!(sample(&points, 0).is_empty());
    }
}
