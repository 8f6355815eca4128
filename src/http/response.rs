//! Error responses.
//!
//! Maps pipeline failures to status codes and JSON bodies. Bodies carry the
//! upstream error's message text only, never internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::aggregation::AggregateError;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path parameter is not a positive integer. Raised before any upstream call.
    #[error("Invalid userId. Must be a number.")]
    InvalidUserId,

    /// Handle did not resolve.
    #[error("User not found or Roblox API failed")]
    UserNotFound,

    /// Listing failed; the whole response depends on it.
    #[error("{context}: {message}")]
    Upstream {
        context: &'static str,
        message: String,
    },
}

impl ApiError {
    pub const GAMEPASSES_FAILED: &'static str = "Failed to fetch gamepasses";
    pub const GAMES_FAILED: &'static str = "Failed to fetch games";

    /// Map a pipeline failure, labelling listing failures with `context`.
    pub fn from_aggregate(err: AggregateError, context: &'static str) -> Self {
        match err {
            AggregateError::Resolution { .. } => ApiError::UserNotFound,
            listing @ AggregateError::Listing(_) => ApiError::Upstream {
                context,
                message: listing.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUserId => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Upstream { context, message } => json!({
                "error": context,
                "message": message,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
