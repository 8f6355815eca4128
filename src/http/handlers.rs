//! Route handlers.
//!
//! Handlers only parse input and map errors; the username routes resolve
//! the handle and then call the same pipeline function as the id route.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::aggregation::{AggregateResult, GamesResult, Identity, UserId};
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `GET /` usage document.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Roblox Gamepass Fetcher API",
        "usage": "GET /gamepasses/:userId or /gamepasses/username/:username",
        "example_userId": "/gamepasses/360475870",
        "example_username": "/gamepasses/username/Inspacto",
        "example_games": "/games/username/Inspacto",
    }))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /gamepasses/{user_id}`
#[tracing::instrument(name = "gamepasses_by_id", skip(state))]
pub async fn gamepasses_by_id(
    State(state): State<AppState>,
    Path(raw_user_id): Path<String>,
) -> Result<Json<AggregateResult>, ApiError> {
    let user_id: UserId = raw_user_id.parse().map_err(|_| {
        tracing::debug!("rejected non-numeric userId");
        ApiError::InvalidUserId
    })?;

    state
        .aggregator
        .aggregate(Identity::Id(user_id))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_aggregate(e, ApiError::GAMEPASSES_FAILED))
}

/// `GET /gamepasses/username/{username}`
#[tracing::instrument(name = "gamepasses_by_username", skip(state))]
pub async fn gamepasses_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AggregateResult>, ApiError> {
    state
        .aggregator
        .aggregate(Identity::Handle(username))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_aggregate(e, ApiError::GAMEPASSES_FAILED))
}

/// `GET /games/username/{username}`
#[tracing::instrument(name = "games_by_username", skip(state))]
pub async fn games_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<GamesResult>, ApiError> {
    state
        .aggregator
        .list_games(Identity::Handle(username))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_aggregate(e, ApiError::GAMES_FAILED))
}
