//! Great-circle distance.

use rayon::prelude::*;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Haversine distance in meters between two `(lat, lon)` points given in
/// decimal degrees.
///
/// The half-angle term `h` is clamped to `[0, 1]` before `asin` to
/// absorb floating-point overshoot for near-antipodal or coincident
/// points.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_r(lat1, lon1, lat2, lon2, EARTH_RADIUS_M)
}

/// As [`haversine`], but with an explicit radius (meters).
pub fn haversine_r(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let arc = 2.0 * h.sqrt().asin();

    arc * radius
}

/// Sum of consecutive haversine distances along a polyline of
/// `(lat, lon)` points, rounded to 3 decimals, as required of every
/// edge `length` in the graph. Parallelised with `rayon`
/// for bulk edge-length computation over a freshly parsed way list.
pub fn polyline_length(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let total: f64 = points
        .par_windows(2)
        .map(|w| haversine(w[0].0, w[0].1, w[1].0, w[1].1))
        .sum();
    round3(total)
}

/// Round to 3 decimals; NaN collapses to 0.0.
pub fn round3(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        (x * 1000.0).round() / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine(41.89, 12.49, 41.89, 12.49), 0.0);
    }

    #[test]
    fn known_distance_rome_to_milan_order_of_magnitude() {
        // Rome ~ (41.9, 12.5), Milan ~ (45.46, 9.19). True distance ~477km.
        let d = haversine(41.9, 12.5, 45.46, 9.19);
        assert!(d > 400_000.0 && d < 520_000.0, "got {d}");
    }

    #[test]
    fn clamp_absorbs_floating_point_overshoot() {
        // Antipodal-ish points push h very close to / past 1.0 before clamping.
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1.0);
    }

    #[test]
    fn polyline_length_matches_sum_of_segments() {
        let pts = vec![(0.0, 0.0), (0.0, 0.001), (0.0, 0.002)];
        let expected = haversine(0.0, 0.0, 0.0, 0.001) + haversine(0.0, 0.001, 0.0, 0.002);
        assert!((polyline_length(&pts) - round3(expected)).abs() <= 0.001);
    }

    #[test]
    fn polyline_length_single_point_is_zero() {
        assert_eq!(polyline_length(&[(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn round3_maps_nan_to_zero() {
        assert_eq!(round3(f64::NAN), 0.0);
    }
}
