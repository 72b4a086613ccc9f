//! Collaborator boundary for OSM acquisition.
//!
//! Downloading OSM data over HTTP is explicitly out of scope for the
//! matching core. `GraphSource` is the seam: production
//! code plugs in a real Overpass/Geofabrik client, tests plug in
//! `FixtureSource`. Nothing in this crate performs network I/O.

use crate::bbox::BBox;
use crate::osm::OsmDocument;
use std::fmt;

#[derive(Debug)]
pub struct SourceError(pub String);

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OSM source error: {}", self.0)
    }
}

impl std::error::Error for SourceError {}

/// The network filter a caller selects in `graph_from_bbox`.
///
/// Only `Drive` is implemented; any other variant must fail loudly at
/// the call site rather than silently falling back to `Drive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Drive,
}

impl NetworkType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "drive" => Some(NetworkType::Drive),
            _ => None,
        }
    }
}

/// An OSM acquisition collaborator: given an (already-enlarged) bbox and
/// a network type, return the raw Overpass-style JSON document.
pub trait GraphSource {
    fn osm_json(&self, bbox: BBox, network_type: NetworkType) -> Result<OsmDocument, SourceError>;
}

/// An in-memory `GraphSource` for tests and offline fixtures: returns a
/// fixed document regardless of the requested bbox/network type.
pub struct FixtureSource {
    document: OsmDocument,
}

impl FixtureSource {
    pub fn new(document: OsmDocument) -> Self {
        Self { document }
    }
}

impl GraphSource for FixtureSource {
    fn osm_json(&self, _bbox: BBox, _network_type: NetworkType) -> Result<OsmDocument, SourceError> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::OsmDocument;

    #[test]
    fn network_type_rejects_unknown() {
        assert_eq!(NetworkType::parse("drive"), Some(NetworkType::Drive));
        assert_eq!(NetworkType::parse("walk"), None);
    }

    #[test]
    fn fixture_source_ignores_bbox() {
        let doc = OsmDocument::from_json_str(r#"{"elements": []}"#).unwrap();
        let source = FixtureSource::new(doc);
        let bbox = BBox::new(1.0, 0.0, 0.0, 1.0);
        let result = source.osm_json(bbox, NetworkType::Drive).unwrap();
        assert!(result.elements.is_empty());
    }
}
