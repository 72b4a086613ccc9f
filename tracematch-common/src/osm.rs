//! Raw OSM JSON shapes, as produced by an Overpass-style endpoint.
//!
//! This is deliberately a thin mirror of the wire format (§6 of the
//! spec): `{"elements": [...]}` with `node` and `way` elements. Parsing
//! this into the routing graph's own `Node`/`Edge` types is the job of
//! `tracematch-graph`; this crate only owns the wire shape so that both
//! the graph builder and test fixtures can share it.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct OsmDocument {
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum OsmElement {
    Node(OsmNode),
    Way(OsmWay),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmWay {
    pub id: i64,
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OsmDocument {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
