//! Server-wide shared state: the loaded graph, held read-only for the
//! lifetime of the process.

use tracematch_graph::Graph;

pub struct ServerState {
    pub graph: Graph,
}

impl ServerState {
    pub fn new(graph: Graph) -> Self {
        ServerState { graph }
    }
}
