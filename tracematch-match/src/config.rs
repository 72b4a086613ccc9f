//! Matching configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Edge interpolation spacing in meters, applied before candidate search.
    pub interp_dist: f64,
    /// Candidate search radius in meters.
    pub radius: f64,
    /// Keep only the closest candidate per distinct edge.
    pub closest: bool,
    /// Emission model standard deviation (GPS noise), in meters.
    pub sigma: f64,
    /// Transition model scale parameter, in meters.
    pub beta: f64,
    /// Optional cap on route search distance (meters); pairs further
    /// apart than this are treated as unreachable rather than searched
    /// to completion.
    pub route_length_cap: Option<f64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            interp_dist: 1.0,
            radius: 10.0,
            closest: true,
            sigma: 4.07,
            beta: 20.0,
            route_length_cap: None,
        }
    }
}
