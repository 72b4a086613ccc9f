//! Bounding-box enlargement.

use crate::haversine::EARTH_RADIUS_M;
use tracematch_common::BBox;

/// Widen a bbox by `dist` meters on every side.
///
/// `Δlat = dist·180/(π·R)`, `Δlon = Δlat / cos(lat_mean)` — the longitude
/// delta is derived from the latitude delta rather than computed
/// independently.
pub fn enlarge_bbox(bbox: BBox, dist: f64) -> BBox {
    let delta_lat = (dist / EARTH_RADIUS_M) * (180.0 / std::f64::consts::PI);
    let lat_mean = bbox.mean_lat();
    let delta_lon = delta_lat / (lat_mean.to_radians()).cos();

    BBox::new(
        bbox.north + delta_lat,
        bbox.south - delta_lat,
        bbox.west - delta_lon,
        bbox.east + delta_lon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_is_identity() {
        let bbox = BBox::new(1.0, 0.0, 0.0, 1.0);
        let enlarged = enlarge_bbox(bbox, 0.0);
        assert_eq!(enlarged, bbox);
    }

    #[test]
    fn enlarging_widens_in_all_directions() {
        let bbox = BBox::new(1.0, 0.0, 0.0, 1.0);
        let enlarged = enlarge_bbox(bbox, 1000.0);
        assert!(enlarged.north > bbox.north);
        assert!(enlarged.south < bbox.south);
        assert!(enlarged.west < bbox.west);
        assert!(enlarged.east > bbox.east);
    }

    #[test]
    fn longitude_delta_grows_with_latitude() {
        // At higher latitude, cos(lat) shrinks, so the same buffer distance
        // yields a larger longitude delta.
        let low_lat = enlarge_bbox(BBox::new(1.0, 0.0, 0.0, 1.0), 1000.0);
        let high_lat = enlarge_bbox(BBox::new(61.0, 60.0, 0.0, 1.0), 1000.0);
        let low_delta = low_lat.east - 1.0;
        let high_delta = high_lat.east - 1.0;
        assert!(high_delta > low_delta);
    }
}
