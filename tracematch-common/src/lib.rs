//! Shared types for the tracematch map-matching engine: the OSM wire
//! format, the bounding box type, the `GraphSource` collaborator
//! boundary, and log initialisation shared by the CLI and HTTP binaries.

pub mod bbox;
pub mod logging;
pub mod osm;
pub mod source;

pub use bbox::BBox;
pub use logging::init_tracing;
pub use osm::{OsmDocument, OsmElement, OsmNode, OsmWay};
pub use source::{FixtureSource, GraphSource, NetworkType, SourceError};
