//! Candidate search, trellis construction, HMM/Viterbi decoding and path
//! reconstruction for tracematch.
//!
//! [`match_trajectory`] is the crate's single entry point;
//! everything else is exposed for callers that want to drive the
//! pipeline stage-by-stage (e.g. to inspect intermediate candidate sets).

pub mod candidate;
pub mod config;
pub mod dijkstra;
pub mod error;
pub mod reconstruct;
pub mod session;
pub mod trellis;
pub mod viterbi;

pub use candidate::{find_candidates, Candidate, CandidateSet, SpatialIndex};
pub use config::MatchConfig;
pub use dijkstra::{Route, RouteCache};
pub use error::MatchError;
pub use reconstruct::{reconstruct, ReconstructedPath};
pub use session::{match_trajectory, MatchOutcome};
pub use trellis::{Trellis, TrellisNode};
pub use viterbi::{decode, emission_log_prob, transition_log_prob, DecodeResult};
