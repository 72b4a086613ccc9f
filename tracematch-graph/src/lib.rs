//! Graph construction, simplification, interpolation and persistence.

pub mod builder;
pub mod error;
pub mod interpolate;
pub mod model;
pub mod persist;
pub mod simplify;
pub mod tags;

pub use builder::{build_graph, graph_from_bbox, parse_elements, ParsedWay};
pub use error::GraphError;
pub use interpolate::{interpolate_geom, interpolate_graph};
pub use model::{Edge, Graph, GraphMeta, NodeData, NodeId};
pub use persist::{load, save};
pub use simplify::build_raw;
pub use tags::{is_drivable, is_oneway, is_reversed, TagBag};
