//! HTTP handlers: CORS layer, typed request/response structs, and a
//! shared `ErrorResponse`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use tracematch_match::{match_trajectory, MatchConfig, MatchError, MatchOutcome};

use crate::state::ServerState;

pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/match", post(match_trajectory_handler))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    /// Time-ordered `[lat, lon]` observations.
    pub trajectory: Vec<(f64, f64)>,
    /// Matching parameters; defaults to [`MatchConfig::default`] when omitted.
    #[serde(default = "default_config")]
    pub config: MatchConfig,
}

fn default_config() -> MatchConfig {
    MatchConfig::default()
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub node_ids: Vec<u64>,
    pub polyline: Vec<(f64, f64)>,
    pub joint_log_prob: f64,
}

impl From<MatchOutcome> for MatchResponse {
    fn from(o: MatchOutcome) -> Self {
        MatchResponse { node_ids: o.node_ids, polyline: o.polyline, joint_log_prob: o.joint_log_prob }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map the match-error taxonomy onto HTTP status codes: malformed or
/// unmatchable input is a 4xx, an internal graph-construction failure
/// (never expected once the server is up with a loaded graph) is a 5xx.
struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        let status = match &err {
            MatchError::TooShort | MatchError::NoCandidates(_) => StatusCode::BAD_REQUEST,
            MatchError::NoRoute(_, _) | MatchError::Unreachable => StatusCode::UNPROCESSABLE_ENTITY,
            MatchError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

async fn match_trajectory_handler(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    info!(observations = req.trajectory.len(), "received match request");
    let outcome = match_trajectory(&state.graph, &req.trajectory, &req.config).map_err(|err| {
        error!(%err, "match request failed");
        ApiError::from(err)
    })?;
    Ok(Json(outcome.into()))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
