use axum::{
    extract::{rejection::JsonRejection, State as AxumState},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use diceroller_types::{ErrorResponse, GameError, GameState, RollOutcome, RollRequest, SaveResponse};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error as ThisError;

use crate::persistence::PersistenceError;
use crate::Server;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Simple health response for basic liveness checks
#[derive(Serialize)]
struct HealthzResponse {
    ok: bool,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    InvalidRequest(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Game(err) => (StatusCode::BAD_REQUEST, err.code()),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILED"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        };
        let body = ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET / - Landing page that drives the API from the browser.
pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn healthz() -> Response {
    Json(HealthzResponse { ok: true }).into_response()
}

/// POST /api/roll - Roll in the requested mode and return the event with updated stats.
pub(super) async fn roll(
    AxumState(server): AxumState<Arc<Server>>,
    payload: Result<Json<RollRequest>, JsonRejection>,
) -> Result<Json<RollOutcome>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(server.roll(request).await?))
}

/// GET /api/state - Full current game state.
pub(super) async fn state(AxumState(server): AxumState<Arc<Server>>) -> Json<GameState> {
    Json(server.state().await)
}

/// POST /api/reset - Reset to defaults and return the fresh state.
pub(super) async fn reset(AxumState(server): AxumState<Arc<Server>>) -> Json<GameState> {
    Json(server.reset().await)
}

/// POST /api/save - Persist the current state.
pub(super) async fn save(
    AxumState(server): AxumState<Arc<Server>>,
) -> Result<Json<SaveResponse>, ApiError> {
    let path = server.save().await?;
    Ok(Json(SaveResponse {
        saved: true,
        path: path.display().to_string(),
    }))
}

/// POST /api/load - Replace the live state with the persisted snapshot.
pub(super) async fn load(
    AxumState(server): AxumState<Arc<Server>>,
) -> Result<Json<GameState>, ApiError> {
    Ok(Json(server.load().await?))
}
