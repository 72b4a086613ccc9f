//! Raw graph assembly from a parsed OSM document.

use std::collections::HashMap;

use tracematch_common::{BBox, GraphSource, NetworkType, OsmDocument, OsmElement};
use tracematch_geometry::enlarge_bbox;
use tracing::{debug, info};

use crate::error::GraphError;
use crate::model::{Graph, NodeId};
use crate::simplify;
use crate::tags::{is_drivable, TagBag};

/// A way after tag parsing, before junction detection / simplification.
pub struct ParsedWay {
    pub osmid: i64,
    pub nodes: Vec<NodeId>,
    pub tags: TagBag,
}

/// Parse nodes and drivable ways out of a raw OSM document.
///
/// Ways failing the network filter are
/// dropped silently — that is the filter's job. A way referencing a node
/// absent from the document is a hard error: the document is internally
/// inconsistent and no reasonable graph can be built from it.
pub fn parse_elements(
    doc: &OsmDocument,
    network_type: NetworkType,
) -> Result<(HashMap<NodeId, (f64, f64)>, Vec<ParsedWay>), GraphError> {
    let mut coords: HashMap<NodeId, (f64, f64)> = HashMap::new();
    for el in &doc.elements {
        if let OsmElement::Node(n) = el {
            coords.insert(n.id as NodeId, (n.lat, n.lon));
        }
    }

    let mut ways = Vec::new();
    for el in &doc.elements {
        let OsmElement::Way(w) = el else { continue };

        if w.nodes.len() < 2 {
            return Err(GraphError::DegenerateWay(w.id));
        }
        let mut node_ids: Vec<NodeId> = Vec::with_capacity(w.nodes.len());
        for &n in &w.nodes {
            let n = n as NodeId;
            if node_ids.last() != Some(&n) {
                node_ids.push(n);
            }
        }
        if node_ids.len() < 2 {
            return Err(GraphError::DegenerateWay(w.id));
        }
        for &node_id in &node_ids {
            if !coords.contains_key(&node_id) {
                return Err(GraphError::MissingNode { osmid: w.id, node_id });
            }
        }

        let tags = TagBag::from_raw(w.tags.clone());
        match network_type {
            NetworkType::Drive => {
                if !is_drivable(&tags) {
                    continue;
                }
            }
        }

        ways.push(ParsedWay { osmid: w.id, nodes: node_ids, tags });
    }

    debug!(nodes = coords.len(), ways = ways.len(), "parsed OSM elements");
    Ok((coords, ways))
}

/// Build a directed graph from a raw OSM document, optionally
/// simplifying junction chains.
pub fn build_graph(doc: &OsmDocument, network_type: NetworkType, simplify: bool) -> Result<Graph, GraphError> {
    let (coords, ways) = parse_elements(doc, network_type)?;
    let graph = if simplify {
        simplify::simplify(&ways, &coords)
    } else {
        simplify::build_raw(&ways, &coords)
    };
    if graph.edge_count() == 0 {
        return Err(GraphError::EmptyGraph);
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        simplified = simplify,
        "built graph"
    );
    Ok(graph)
}

/// Fetch OSM data for `bbox` (enlarged by `buffer_dist` meters) through a
/// [`GraphSource`] collaborator and build the graph from it.
/// The download itself (HTTP, retries, Overpass query formatting) is the
/// source's concern; this function only owns enlargement + construction.
pub fn graph_from_bbox(
    source: &dyn GraphSource,
    bbox: BBox,
    simplify: bool,
    network_type: NetworkType,
    buffer_dist: f64,
) -> Result<Graph, GraphError> {
    let enlarged = enlarge_bbox(bbox, buffer_dist);
    let doc = source.osm_json(enlarged, network_type)?;
    build_graph(&doc, network_type, simplify)
}
