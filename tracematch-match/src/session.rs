//! Matching session orchestration.
//!
//! Wires up Components C–G for a single trajectory: interpolate the
//! graph, search candidates, build the trellis, decode, reconstruct.
//! Owns nothing beyond the session's lifetime.

use tracing::{info, warn};

use tracematch_graph::interpolate_graph;
use tracematch_graph::Graph;

use crate::candidate::{find_candidates, SpatialIndex};
use crate::config::MatchConfig;
use crate::dijkstra::RouteCache;
use crate::error::MatchError;
use crate::reconstruct::reconstruct;
use crate::trellis::Trellis;
use crate::viterbi::decode;

/// The result of matching a trajectory against a road network: the
/// deduplicated node-id path, its coordinate polyline, and the Viterbi
/// joint log-probability of the chosen path.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub node_ids: Vec<u64>,
    pub polyline: Vec<(f64, f64)>,
    pub joint_log_prob: f64,
}

/// Match `trajectory` (a time-ordered `(lat, lon)` sequence) against
/// `graph`.
///
/// `graph` is interpolated internally at `cfg.interp_dist`; the caller's
/// graph is never mutated. If any observation
/// produces zero candidates within `cfg.radius`, matching fails with
/// [`MatchError::NoCandidates`] rather than silently skipping the layer —
/// callers that want to tolerate gaps should pre-filter their trajectory
/// and match the surviving runs separately.
pub fn match_trajectory(
    graph: &Graph,
    trajectory: &[(f64, f64)],
    cfg: &MatchConfig,
) -> Result<MatchOutcome, MatchError> {
    if trajectory.len() < 2 {
        return Err(MatchError::TooShort);
    }

    let interpolated = interpolate_graph(graph, cfg.interp_dist);
    info!(
        nodes = interpolated.node_count(),
        edges = interpolated.edge_count(),
        "interpolated graph for matching session"
    );

    let index = SpatialIndex::build(&interpolated);
    let candidate_sets = find_candidates(&index, trajectory, cfg)?;

    for (i, set) in candidate_sets.iter().enumerate() {
        if set.is_empty() {
            warn!(observation_index = i, "no candidates within radius");
            return Err(MatchError::NoCandidates(i));
        }
    }

    let trellis = Trellis::build(&candidate_sets);
    let cache = RouteCache::new(&interpolated, cfg.route_length_cap);
    let decoded = decode(&trellis, cfg, &cache)?;
    let path = reconstruct(&interpolated, &candidate_sets, &decoded, &cache)?;

    info!(
        joint_log_prob = decoded.joint_log_prob,
        path_nodes = path.node_ids.len(),
        "matched trajectory"
    );

    Ok(MatchOutcome {
        node_ids: path.node_ids,
        polyline: path.polyline,
        joint_log_prob: decoded.joint_log_prob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracematch_graph::{Edge, TagBag};

    fn straight_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(1, 0.0, 0.0);
        g.add_node(2, 0.0, 0.001);
        g.push_edge(Edge {
            u: 1,
            v: 2,
            key: 0,
            osmid: 10,
            geometry: vec![(0.0, 0.0), (0.0, 0.001)],
            length_m: 111.2,
            oneway: true,
            tags: TagBag::default(),
        });
        g.meta.simplified = true;
        g
    }

    #[test]
    fn matches_straight_segment_scenario() {
        // straight segment, lon monotonically increasing.
        let g = straight_graph();
        let trajectory =
            vec![(0.0, 0.00025), (0.0, 0.0005), (0.0, 0.00075)];
        let cfg = MatchConfig { radius: 20.0, interp_dist: 1.0, ..MatchConfig::default() };

        let outcome = match_trajectory(&g, &trajectory, &cfg).unwrap();
        assert!(outcome.joint_log_prob.is_finite());
        assert!(outcome.joint_log_prob <= 0.0 + 1e-9);
        assert_eq!(*outcome.node_ids.first().unwrap(), 1);
        assert_eq!(*outcome.node_ids.last().unwrap(), 2);
        for pair in outcome.polyline.windows(2) {
            assert!(pair[1].1 >= pair[0].1, "longitude should not decrease along the path");
        }
    }

    #[test]
    fn no_candidates_surfaces_observation_index() {
        let g = straight_graph();
        // Far away from the road network entirely.
        let trajectory = vec![(10.0, 10.0), (10.0, 10.001)];
        let cfg = MatchConfig { radius: 5.0, ..MatchConfig::default() };

        let err = match_trajectory(&g, &trajectory, &cfg).unwrap_err();
        assert!(matches!(err, MatchError::NoCandidates(0)));
    }

    #[test]
    fn unreachable_components_surface_unreachable() {
        let mut g = Graph::new();
        g.add_node(1, 0.0, 0.0);
        g.add_node(2, 0.0, 0.001);
        g.add_node(3, 5.0, 5.0);
        g.add_node(4, 5.0, 5.001);
        g.push_edge(Edge {
            u: 1,
            v: 2,
            key: 0,
            osmid: 10,
            geometry: vec![(0.0, 0.0), (0.0, 0.001)],
            length_m: 111.2,
            oneway: true,
            tags: TagBag::default(),
        });
        g.push_edge(Edge {
            u: 3,
            v: 4,
            key: 0,
            osmid: 11,
            geometry: vec![(5.0, 5.0), (5.0, 5.001)],
            length_m: 111.2,
            oneway: true,
            tags: TagBag::default(),
        });

        let trajectory = vec![(0.0, 0.0003), (5.0, 5.0005)];
        let cfg = MatchConfig { radius: 50.0, ..MatchConfig::default() };

        let err = match_trajectory(&g, &trajectory, &cfg).unwrap_err();
        assert!(matches!(err, MatchError::Unreachable));
    }

    /// Three edges meeting at a T-junction `J`; a trajectory that drives
    /// through the stem and turns onto the branch must pass through `J`
    /// exactly once.
    #[test]
    fn t_junction_turn_visits_shared_node_exactly_once() {
        let mut g = Graph::new();
        g.add_node(1, 0.0, 0.000); // stem start
        g.add_node(2, 0.0, 0.001); // J
        g.add_node(3, 0.001, 0.001); // branch end

        let edge = |u, v, geometry: Vec<(f64, f64)>| Edge {
            u,
            v,
            key: 0,
            osmid: u as i64 * 10 + v as i64,
            geometry,
            length_m: 111.2,
            oneway: true,
            tags: TagBag::default(),
        };
        g.push_edge(edge(1, 2, vec![(0.0, 0.000), (0.0, 0.001)]));
        g.push_edge(edge(2, 3, vec![(0.0, 0.001), (0.001, 0.001)]));
        g.meta.simplified = true;

        let trajectory = vec![(0.0, 0.0003), (0.0, 0.0008), (0.0005, 0.001)];
        let cfg = MatchConfig { radius: 25.0, interp_dist: 1.0, ..MatchConfig::default() };

        let outcome = match_trajectory(&g, &trajectory, &cfg).unwrap();
        let visits = outcome.node_ids.iter().filter(|&&id| id == 2).count();
        assert_eq!(visits, 1, "junction node should appear exactly once: {:?}", outcome.node_ids);
    }

    /// A 4-node roundabout; a trajectory encircling it should traverse
    /// the ring exactly once with no revisited node.
    #[test]
    fn roundabout_loop_traverses_ring_without_revisits() {
        let mut g = Graph::new();
        // A small square ring, oneway in the direction 1 -> 2 -> 3 -> 4 -> 1.
        g.add_node(1, 0.000, 0.000);
        g.add_node(2, 0.000, 0.001);
        g.add_node(3, 0.001, 0.001);
        g.add_node(4, 0.001, 0.000);

        let coord = |id: u64| match id {
            1 => (0.000, 0.000),
            2 => (0.000, 0.001),
            3 => (0.001, 0.001),
            _ => (0.001, 0.000),
        };
        for (u, v) in [(1u64, 2u64), (2, 3), (3, 4), (4, 1)] {
            g.push_edge(Edge {
                u,
                v,
                key: 0,
                osmid: u as i64 * 10 + v as i64,
                geometry: vec![coord(u), coord(v)],
                length_m: 111.2,
                oneway: true,
                tags: TagBag::default(),
            });
        }
        g.meta.simplified = true;

        let trajectory = vec![
            (0.0002, 0.0000),
            (0.0000, 0.0005),
            (0.0005, 0.0010),
            (0.0010, 0.0005),
        ];
        let cfg = MatchConfig { radius: 30.0, interp_dist: 1.0, ..MatchConfig::default() };

        let outcome = match_trajectory(&g, &trajectory, &cfg).unwrap();
        let mut seen = std::collections::HashSet::new();
        for &id in &outcome.node_ids {
            assert!(seen.insert(id), "node {id} revisited: {:?}", outcome.node_ids);
        }
    }
}
