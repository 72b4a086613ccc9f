use thiserror::Error;
use tracematch_graph::NodeId;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("observation {0} has no candidates within the search radius")]
    NoCandidates(usize),

    #[error("no route between node {0} and node {1}")]
    NoRoute(NodeId, NodeId),

    #[error("no positive-probability path through the trellis")]
    Unreachable,

    #[error("trajectory has fewer than 2 observations")]
    TooShort,

    #[error(transparent)]
    Graph(#[from] tracematch_graph::GraphError),
}
