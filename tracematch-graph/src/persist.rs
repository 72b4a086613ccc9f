//! Graph (de)serialization via a bincode save/load round-trip.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::model::{Edge, Graph, GraphMeta, NodeData, NodeId};
use crate::tags::TagBag;

#[derive(Serialize, Deserialize)]
struct WireTagBag {
    highway: Option<String>,
    oneway: Option<String>,
    lanes: Option<String>,
    maxspeed: Option<String>,
    junction: Option<String>,
    service: Option<String>,
    access: Option<String>,
    bridge: Option<String>,
    tunnel: Option<String>,
    extra: std::collections::HashMap<String, String>,
}

#[derive(Serialize, Deserialize)]
struct WireEdge {
    u: NodeId,
    v: NodeId,
    key: u32,
    osmid: i64,
    geometry: Vec<(f64, f64)>,
    length_m: f64,
    oneway: bool,
    tags: WireTagBag,
}

#[derive(Serialize, Deserialize)]
struct WireGraph {
    nodes: Vec<(NodeId, f64, f64)>,
    edges: Vec<WireEdge>,
    crs: String,
    simplified: bool,
    interpolated: bool,
    created: String,
}

impl From<&Graph> for WireGraph {
    fn from(g: &Graph) -> Self {
        WireGraph {
            nodes: g.nodes.iter().map(|(&id, n)| (id, n.lat, n.lon)).collect(),
            edges: g
                .edges
                .iter()
                .map(|e| WireEdge {
                    u: e.u,
                    v: e.v,
                    key: e.key,
                    osmid: e.osmid,
                    geometry: e.geometry.clone(),
                    length_m: e.length_m,
                    oneway: e.oneway,
                    tags: WireTagBag {
                        highway: e.tags.highway.clone(),
                        oneway: e.tags.oneway.clone(),
                        lanes: e.tags.lanes.clone(),
                        maxspeed: e.tags.maxspeed.clone(),
                        junction: e.tags.junction.clone(),
                        service: e.tags.service.clone(),
                        access: e.tags.access.clone(),
                        bridge: e.tags.bridge.clone(),
                        tunnel: e.tags.tunnel.clone(),
                        extra: e.tags.extra.clone(),
                    },
                })
                .collect(),
            crs: g.meta.crs.clone(),
            simplified: g.meta.simplified,
            interpolated: g.meta.interpolated,
            created: g.meta.created.clone(),
        }
    }
}

impl From<WireGraph> for Graph {
    fn from(w: WireGraph) -> Self {
        let mut graph = Graph {
            nodes: w.nodes.into_iter().map(|(id, lat, lon)| (id, NodeData { lat, lon })).collect(),
            edges: Vec::new(),
            out_adjacency: Default::default(),
            meta: GraphMeta {
                crs: w.crs,
                simplified: w.simplified,
                interpolated: w.interpolated,
                created: w.created,
            },
        };
        for e in w.edges {
            graph.push_edge(Edge {
                u: e.u,
                v: e.v,
                key: e.key,
                osmid: e.osmid,
                geometry: e.geometry,
                length_m: e.length_m,
                oneway: e.oneway,
                tags: TagBag {
                    highway: e.tags.highway,
                    oneway: e.tags.oneway,
                    lanes: e.tags.lanes,
                    maxspeed: e.tags.maxspeed,
                    junction: e.tags.junction,
                    service: e.tags.service,
                    access: e.tags.access,
                    bridge: e.tags.bridge,
                    tunnel: e.tags.tunnel,
                    extra: e.tags.extra,
                },
            });
        }
        graph
    }
}

pub fn save(graph: &Graph, path: impl AsRef<Path>) -> Result<(), GraphError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let wire = WireGraph::from(graph);
    bincode::serialize_into(&mut writer, &wire)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let wire: WireGraph = bincode::deserialize_from(reader)?;
    Ok(Graph::from(wire))
}
