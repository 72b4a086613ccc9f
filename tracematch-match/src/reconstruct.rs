//! Path reconstruction: concatenate the per-step
//! shortest paths between chosen candidates into a single deduplicated
//! node sequence and its coordinate polyline.

use tracematch_graph::{Graph, NodeId};

use crate::candidate::CandidateSet;
use crate::dijkstra::RouteCache;
use crate::error::MatchError;
use crate::viterbi::DecodeResult;

/// The reconstructed path through the graph: a deduplicated node-id
/// sequence (no two adjacent ids equal) and the
/// `(lat, lon)` polyline of those nodes.
#[derive(Debug, Clone)]
pub struct ReconstructedPath {
    pub node_ids: Vec<NodeId>,
    pub polyline: Vec<(f64, f64)>,
}

/// Walk the chosen candidate at each observation, stitch the shortest
/// path between every consecutive pair, and collapse runs of equal
/// adjacent node ids at the seams.
pub fn reconstruct(
    graph: &Graph,
    candidate_sets: &[CandidateSet],
    decoded: &DecodeResult,
    cache: &RouteCache,
) -> Result<ReconstructedPath, MatchError> {
    let chosen_nodes: Vec<NodeId> = decoded
        .chosen
        .iter()
        .zip(candidate_sets)
        .map(|(&idx, set)| set.candidates[idx].node_id)
        .collect();

    let mut node_ids: Vec<NodeId> = Vec::new();
    for pair in chosen_nodes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let route = cache.route(a, b).ok_or(MatchError::NoRoute(a, b))?;
        for node in route.nodes {
            if node_ids.last() != Some(&node) {
                node_ids.push(node);
            }
        }
    }

    if node_ids.is_empty() {
        if let Some(&only) = chosen_nodes.first() {
            node_ids.push(only);
        }
    }

    let polyline = node_ids
        .iter()
        .filter_map(|&id| graph.node_coord(id))
        .collect();

    Ok(ReconstructedPath { node_ids, polyline })
}
