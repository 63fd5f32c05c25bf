//! Error handling module
//!
//! Defines error types and handling logic used in the project

use crate::services::runner::RunError;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Plan identifier is not one of the known tiers
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    /// Usage command exited with a nonzero status
    #[error("ccusage failed: {0}")]
    FetchFailed(String),

    /// Usage command output could not be decoded
    #[error("Malformed usage response: {0}")]
    MalformedResponse(String),

    /// Usage command could not be run at all
    #[error("Usage command error: {0}")]
    UsageCommand(#[from] RunError),

    /// Query string could not be decoded
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable failure description
    pub detail: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownPlan(_) | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::FetchFailed(_)
            | AppError::MalformedResponse(_)
            | AppError::UsageCommand(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::UnknownPlan(_) => "unknown_plan",
            AppError::FetchFailed(_) => "fetch_failed",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::UsageCommand(_) => "command_error",
            AppError::InvalidQuery(_) => "invalid_query",
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to response body
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            detail: self.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidQuery(rejection.body_text())
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_client_error() {
            tracing::warn!("Client error: {} - Status code: {}", self, status);
        } else {
            tracing::error!(
                error_type = self.error_type(),
                "Application error: {} - Status code: {}",
                self,
                status
            );
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
