//! Stable coordinate hashing for interpolated nodes.
//!
//! A naive approach of mixing bit-shifts of unequal width over a
//! coordinate's decimal expansion and truncating via modulo can collide.
//! This hashes a deterministic 64-bit digest over the fixed-point
//! integer encoding of the coordinate instead.

/// Fixed-point scale: 1e7 gives ~1.1cm resolution at the equator, well
/// under OSM's typical coordinate precision (7 decimal digits).
const FXP_SCALE: f64 = 1e7;

/// Deterministic, total hash of a `(lon, lat)` pair into a non-negative
/// 64-bit id. Equal coordinates always hash equal; coordinates differing
/// in the 5th decimal place (i.e. by at least ~1cm) hash to different
/// ids at typical OSM precision.
///
/// # Panics
/// Debug builds assert neither coordinate is NaN; the function has no
/// defined behavior for NaN inputs.
pub fn stable_geo_id(lon: f64, lat: f64) -> u64 {
    debug_assert!(!lon.is_nan() && !lat.is_nan(), "stable_geo_id requires finite coordinates");

    let lon_fxp = (lon * FXP_SCALE).round() as i64;
    let lat_fxp = (lat * FXP_SCALE).round() as i64;

    // Interleave the two 64-bit words into a single 64-bit state and run
    // it through a splitmix64-style finalizer for avalanche.
    let mut x = (lon_fxp as u64) ^ (lat_fxp as u64).rotate_left(32);
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^= x >> 31;

    // Clear the sign bit so the id reads as non-negative if ever cast to i64.
    x & 0x7FFF_FFFF_FFFF_FFFF
}
