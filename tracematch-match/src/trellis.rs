//! Trellis construction.
//!
//! Nodes are addressed by `(layer, index)` pairs rather than formatted
//! `"{i}_{j}"` string keys: a hot relaxation loop has no business
//! allocating a string per node.

use crate::candidate::{Candidate, CandidateSet};

#[derive(Debug, Clone)]
pub enum TrellisNode {
    Sentinel,
    Candidate(Candidate),
}

/// A layered DAG: `layers[0]` is the virtual `start` sentinel,
/// `layers[last]` is the virtual `target` sentinel, and every layer in
/// between holds one observation's candidates. Every node in layer `i`
/// has an implicit incoming edge from every node in layer `i - 1`.
pub struct Trellis {
    pub layers: Vec<Vec<TrellisNode>>,
}

impl Trellis {
    pub fn build(candidate_sets: &[CandidateSet]) -> Self {
        let mut layers = Vec::with_capacity(candidate_sets.len() + 2);
        layers.push(vec![TrellisNode::Sentinel]);
        for set in candidate_sets {
            layers.push(set.candidates.iter().cloned().map(TrellisNode::Candidate).collect());
        }
        layers.push(vec![TrellisNode::Sentinel]);
        Trellis { layers }
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, i: usize) -> &[TrellisNode] {
        &self.layers[i]
    }

    /// Index of the first real observation layer (layer 0 is `start`).
    pub fn first_observation_layer(&self) -> usize {
        1
    }

    /// Index of the last real observation layer (the layer before `target`).
    pub fn last_observation_layer(&self) -> usize {
        self.num_layers() - 2
    }
}
