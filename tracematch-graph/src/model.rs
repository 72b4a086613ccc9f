//! In-memory graph representation.
//!
//! A directed multigraph: parallel edges between the same pair of nodes
//! are distinguished by a monotonic `key`, mirroring the `(u, v, k)`
//! addressing scheme common to OSM-derived routing graphs.

use std::collections::HashMap;

use crate::tags::TagBag;

pub type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeData {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub u: NodeId,
    pub v: NodeId,
    pub key: u32,
    pub osmid: i64,
    /// `(lat, lon)` vertices, first == coord of `u`, last == coord of `v`.
    pub geometry: Vec<(f64, f64)>,
    pub length_m: f64,
    pub oneway: bool,
    pub tags: TagBag,
}

#[derive(Debug, Clone)]
pub struct GraphMeta {
    pub crs: String,
    pub simplified: bool,
    pub interpolated: bool,
    pub created: String,
}

impl Default for GraphMeta {
    fn default() -> Self {
        GraphMeta {
            crs: "EPSG:4326".to_string(),
            simplified: false,
            interpolated: false,
            created: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: HashMap<NodeId, NodeData>,
    pub edges: Vec<Edge>,
    pub out_adjacency: HashMap<NodeId, Vec<usize>>,
    pub meta: GraphMeta,
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            nodes: HashMap::new(),
            edges: Vec::new(),
            out_adjacency: HashMap::new(),
            meta: GraphMeta {
                created: chrono::Utc::now().to_rfc3339(),
                ..GraphMeta::default()
            },
        }
    }

    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) {
        self.nodes.insert(id, NodeData { lat, lon });
    }

    /// Append an edge, assigning it the next free `key` for its `(u, v)`
    /// pair and wiring it into the adjacency index. Returns the edge's
    /// index into `self.edges`.
    pub fn push_edge(&mut self, mut edge: Edge) -> usize {
        let existing = self.out_adjacency.get(&edge.u);
        let key = existing
            .map(|idxs| idxs.iter().filter(|&&i| self.edges[i].v == edge.v).count())
            .unwrap_or(0) as u32;
        edge.key = key;

        let u = edge.u;
        let idx = self.edges.len();
        self.edges.push(edge);
        self.out_adjacency.entry(u).or_default().push(idx);
        idx
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.out_adjacency
            .get(&node)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn out_edge_indices(&self, node: NodeId) -> &[usize] {
        self.out_adjacency.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn node_coord(&self, id: NodeId) -> Option<(f64, f64)> {
        self.nodes.get(&id).map(|n| (n.lat, n.lon))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(u: NodeId, v: NodeId) -> Edge {
        Edge {
            u,
            v,
            key: 0,
            osmid: 1,
            geometry: vec![],
            length_m: 10.0,
            oneway: true,
            tags: TagBag::default(),
        }
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut g = Graph::new();
        let i0 = g.push_edge(edge(1, 2));
        let i1 = g.push_edge(edge(1, 2));
        assert_eq!(g.edge(i0).key, 0);
        assert_eq!(g.edge(i1).key, 1);
    }

    #[test]
    fn distinct_targets_do_not_share_keys() {
        let mut g = Graph::new();
        g.push_edge(edge(1, 2));
        let i1 = g.push_edge(edge(1, 3));
        assert_eq!(g.edge(i1).key, 0);
    }

    #[test]
    fn out_edges_only_returns_edges_from_that_node() {
        let mut g = Graph::new();
        g.push_edge(edge(1, 2));
        g.push_edge(edge(2, 3));
        let out: Vec<_> = g.out_edges(1).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].v, 2);
    }
}
