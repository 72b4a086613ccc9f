use thiserror::Error;

/// Library-level errors from graph construction, simplification and
/// interpolation. Kept typed (rather than `anyhow`) since this crate is
/// consumed by both the CLI and the HTTP server, which each want to
/// translate failures into their own boundary conventions.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("way {osmid} references unknown node {node_id}")]
    MissingNode { osmid: i64, node_id: u64 },

    #[error("edge geometry has fewer than 2 points: way {0}")]
    DegenerateWay(i64),

    #[error("unrecognized network type {0:?}")]
    UnknownNetworkType(String),

    #[error("graph has no edges after filtering")]
    EmptyGraph,

    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] Box<bincode::ErrorKind>),

    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("collaborator source failed: {0}")]
    Source(#[from] tracematch_common::SourceError),
}
