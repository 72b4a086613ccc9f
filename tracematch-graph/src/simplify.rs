//! Junction detection and segment collapsing.
//!
//! A node is kept as a graph vertex if it is a way endpoint, is shared by
//! more than one way, or is revisited within the same way (a degree != 2
//! junction). Everything else is an intermediate point on some edge's
//! geometry and disappears from the node set, folded into the polyline
//! of the edge that passes through it.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use tracematch_geometry::haversine::polyline_length;

use crate::builder::ParsedWay;
use crate::model::{Edge, Graph, NodeId};
use crate::tags::{is_oneway, is_reversed};

fn kept_nodes(ways: &[ParsedWay]) -> HashSet<NodeId> {
    let mut occurrences: HashMap<NodeId, u32> = HashMap::new();
    let mut endpoints: HashSet<NodeId> = HashSet::new();

    for way in ways {
        endpoints.insert(way.nodes[0]);
        endpoints.insert(*way.nodes.last().unwrap());
        for &n in &way.nodes {
            *occurrences.entry(n).or_insert(0) += 1;
        }
    }

    occurrences
        .into_iter()
        .filter_map(|(n, count)| (count > 1 || endpoints.contains(&n)).then_some(n))
        .collect()
}

/// Split one way into segments between consecutive kept nodes.
fn segments_for_way<'a>(way: &'a ParsedWay, kept: &HashSet<NodeId>) -> Vec<&'a [NodeId]> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    for i in 1..way.nodes.len() {
        let is_last = i == way.nodes.len() - 1;
        if is_last || kept.contains(&way.nodes[i]) {
            segments.push(&way.nodes[start..=i]);
            start = i;
        }
    }
    segments
}

/// Build the raw (unsimplified) directed graph from parsed ways: every
/// consecutive node pair in every way becomes an edge, with no junction
/// collapsing. Every node
/// that appears on any way keeps its own graph vertex.
pub fn build_raw(ways: &[ParsedWay], coords: &HashMap<NodeId, (f64, f64)>) -> Graph {
    let mut graph = Graph::new();

    for way in ways {
        for &n in &way.nodes {
            if let Some(&(lat, lon)) = coords.get(&n) {
                graph.add_node(n, lat, lon);
            }
        }
    }

    for way in ways {
        let reversed = is_reversed(&way.tags);
        let oneway = is_oneway(&way.tags, false);

        let mut node_ids = way.nodes.clone();
        if reversed {
            node_ids.reverse();
        }

        for pair in node_ids.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if u == v {
                continue;
            }
            let geometry = vec![coords[&u], coords[&v]];
            let length_m = polyline_length(&geometry);

            graph.push_edge(Edge {
                u,
                v,
                key: 0,
                osmid: way.osmid,
                geometry: geometry.clone(),
                length_m,
                oneway,
                tags: way.tags.clone(),
            });

            if !oneway {
                let mut rev_geometry = geometry;
                rev_geometry.reverse();
                graph.push_edge(Edge {
                    u: v,
                    v: u,
                    key: 0,
                    osmid: way.osmid,
                    geometry: rev_geometry,
                    length_m,
                    oneway,
                    tags: way.tags.clone(),
                });
            }
        }
    }

    graph.meta.simplified = false;
    graph
}

/// Build the final simplified directed graph from parsed ways.
///
/// Bidirectional ways become two parallel directed edges (u→v and v→u);
/// oneway ways become a single directed edge, reversed first if the way's
/// tags mark its node order as traveling against the mapped direction
///.
pub fn simplify(ways: &[ParsedWay], coords: &HashMap<NodeId, (f64, f64)>) -> Graph {
    let kept = kept_nodes(ways);
    let mut graph = Graph::new();

    for (&id, &(lat, lon)) in coords {
        if kept.contains(&id) {
            graph.add_node(id, lat, lon);
        }
    }

    for way in ways {
        let reversed = is_reversed(&way.tags);
        let oneway = is_oneway(&way.tags, false);

        for segment in segments_for_way(way, &kept) {
            let mut node_ids: Vec<NodeId> = segment.to_vec();
            if reversed {
                node_ids.reverse();
            }

            let geometry: Vec<(f64, f64)> =
                node_ids.iter().map(|n| coords[n]).collect();
            if geometry.len() < 2 {
                warn!(osmid = way.osmid, "degenerate edge geometry, skipping");
                continue;
            }
            let length_m = polyline_length(&geometry);
            let u = node_ids[0];
            let v = *node_ids.last().unwrap();

            if u == v {
                // Zero-length or self-touching segment; not a usable edge.
                continue;
            }

            graph.push_edge(Edge {
                u,
                v,
                key: 0,
                osmid: way.osmid,
                geometry: geometry.clone(),
                length_m,
                oneway,
                tags: way.tags.clone(),
            });

            if !oneway {
                let mut rev_geometry = geometry;
                rev_geometry.reverse();
                graph.push_edge(Edge {
                    u: v,
                    v: u,
                    key: 0,
                    osmid: way.osmid,
                    geometry: rev_geometry,
                    length_m,
                    oneway,
                    tags: way.tags.clone(),
                });
            }
        }
    }

    graph.meta.simplified = true;
    graph
}
