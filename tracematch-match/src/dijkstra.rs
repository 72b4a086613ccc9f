//! Weighted shortest paths between candidate node ids,
//! with a memoizing cache since the same `(u, v)` pair is often queried
//! both during Viterbi transition scoring and during path reconstruction.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use priority_queue::PriorityQueue;
use tracematch_graph::{Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct MinCost(f64);

impl Eq for MinCost {}

impl PartialOrd for MinCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinCost {
    // Reversed so the priority queue (a max-heap) pops the smallest cost first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}

/// A shortest route: total weighted length in meters and the node
/// sequence traversed, endpoints included.
#[derive(Debug, Clone)]
pub struct Route {
    pub length_m: f64,
    pub nodes: Vec<NodeId>,
}

fn dijkstra(graph: &Graph, from: NodeId, to: NodeId, cap: Option<f64>) -> Option<Route> {
    if from == to {
        return Some(Route { length_m: 0.0, nodes: vec![from] });
    }

    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue = PriorityQueue::new();

    dist.insert(from, 0.0);
    queue.push(from, MinCost(0.0));

    while let Some((node, MinCost(cost))) = queue.pop() {
        if let Some(c) = cap {
            if cost > c {
                continue;
            }
        }
        if node == to {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }

        for edge in graph.out_edges(node) {
            let next_cost = cost + edge.length_m;
            if let Some(c) = cap {
                if next_cost > c {
                    continue;
                }
            }
            if next_cost < *dist.get(&edge.v).unwrap_or(&f64::INFINITY) {
                dist.insert(edge.v, next_cost);
                prev.insert(edge.v, node);
                queue.push(edge.v, MinCost(next_cost));
            }
        }
    }

    let length_m = *dist.get(&to)?;
    let mut nodes = vec![to];
    let mut cursor = to;
    while cursor != from {
        cursor = *prev.get(&cursor)?;
        nodes.push(cursor);
    }
    nodes.reverse();
    Some(Route { length_m, nodes })
}

/// Thread-safe memoization cache for shortest-path queries within a
/// single matching session, keyed by `(from, to)`.
pub struct RouteCache<'g> {
    graph: &'g Graph,
    cap: Option<f64>,
    cache: Mutex<HashMap<(NodeId, NodeId), Option<Route>>>,
}

impl<'g> RouteCache<'g> {
    pub fn new(graph: &'g Graph, cap: Option<f64>) -> Self {
        RouteCache { graph, cap, cache: Mutex::new(HashMap::new()) }
    }

    pub fn route(&self, from: NodeId, to: NodeId) -> Option<Route> {
        if let Some(hit) = self.cache.lock().unwrap().get(&(from, to)) {
            return hit.clone();
        }
        let route = dijkstra(self.graph, from, to, self.cap);
        self.cache.lock().unwrap().insert((from, to), route.clone());
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracematch_graph::{Edge, TagBag};

    fn chain_graph() -> Graph {
        let mut g = Graph::new();
        for (u, v, len) in [(1u64, 2u64, 10.0), (2, 3, 10.0), (3, 4, 10.0)] {
            g.add_node(u, 0.0, 0.0);
            g.add_node(v, 0.0, 0.0);
            g.push_edge(Edge {
                u,
                v,
                key: 0,
                osmid: 1,
                geometry: vec![],
                length_m: len,
                oneway: true,
                tags: TagBag::default(),
            });
        }
        g
    }

    #[test]
    fn finds_shortest_path_along_a_chain() {
        let g = chain_graph();
        let route = dijkstra(&g, 1, 4, None).unwrap();
        assert_eq!(route.nodes, vec![1, 2, 3, 4]);
        assert!((route.length_m - 30.0).abs() < 1e-9);
    }

    #[test]
    fn same_node_is_zero_length() {
        let g = chain_graph();
        let route = dijkstra(&g, 2, 2, None).unwrap();
        assert_eq!(route.nodes, vec![2]);
        assert_eq!(route.length_m, 0.0);
    }

    #[test]
    fn unreachable_pair_returns_none() {
        let g = chain_graph();
        // Graph is directed; there's no edge back from 4 to 1.
        assert!(dijkstra(&g, 4, 1, None).is_none());
    }

    #[test]
    fn route_length_cap_makes_far_pairs_unreachable() {
        let g = chain_graph();
        assert!(dijkstra(&g, 1, 4, Some(15.0)).is_none());
        assert!(dijkstra(&g, 1, 2, Some(15.0)).is_some());
    }

    #[test]
    fn cache_returns_consistent_results() {
        let g = chain_graph();
        let cache = RouteCache::new(&g, None);
        let a = cache.route(1, 4).unwrap();
        let b = cache.route(1, 4).unwrap();
        assert_eq!(a.nodes, b.nodes);
    }
}
