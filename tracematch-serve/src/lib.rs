//! Thin HTTP surface over the tracematch matching core.
//!
//! Exposes `POST /match` and `GET /health` only — not a
//! routing-for-queries service; no point-to-point/matrix/isochrone
//! endpoints are implemented.

pub mod api;
pub mod state;

pub use api::build_router;
pub use state::ServerState;
