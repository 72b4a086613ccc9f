//! Geodesy primitives: haversine distance, bbox
//! enlargement, and stable coordinate hashing for interpolated nodes.

pub mod bbox;
pub mod hash;
pub mod haversine;

pub use bbox::enlarge_bbox;
pub use hash::stable_geo_id;
pub use haversine::{haversine, haversine_r, polyline_length, round3, EARTH_RADIUS_M};
