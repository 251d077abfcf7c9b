//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::views;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// The first data load has not finished.
    #[error("data is still loading")]
    Loading,

    /// The first data load failed.
    #[error("data load failed: {0}")]
    LoadFailed(String),

    /// Wrong debug key.
    #[error("unauthorized")]
    Unauthorized,

    /// No session on an API route that needs one.
    #[error("login required")]
    LoginRequired,

    /// Route disabled or absent.
    #[error("not found")]
    NotFound,

    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else.
    #[error(transparent)]
    Internal(#[from] crate::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::Loading => (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(views::loading_page()),
            )
                .into_response(),
            Self::LoadFailed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::error_page(&message)),
            )
                .into_response(),
            Self::Unauthorized => {
                (StatusCode::FORBIDDEN, Json(json!({"error": "Unauthorized"}))).into_response()
            }
            Self::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Login required"})),
            )
                .into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
}
