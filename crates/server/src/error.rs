//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::reports::ReportError;

/// Application-level error type for the depot server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Report generation failed.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures carry diagnostic detail in the logs only.
        if matches!(
            self,
            Self::Database(_) | Self::Report(_) | Self::Internal(_)
        ) {
            tracing::error!(error = %self, "request failed");
        }

        let status = match &self {
            Self::Database(_) | Self::Report(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Report(_) => "Report generation failed".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
