//! Unified error types for the Tablebook API
//!
//! This module defines error types for each layer:
//! - `DomainError`: business rule and storage failures raised by the core
//! - `AppError`: HTTP edge errors (wraps domain errors and extractor
//!   rejections for responses)
//!
//! Every rejection keeps a distinguishable kind so clients can tell a
//! validation failure from a booking conflict from an authorization failure.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backing store or connection failure. Never retried by the core.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable kind, surfaced in error responses
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::NotFound(_) => "not_found",
            DomainError::PermissionDenied(_) => "permission_denied",
            DomainError::Conflict(_) => "conflict",
            DomainError::Unavailable(_) => "unavailable",
            DomainError::Internal(_) => "internal",
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, kind, details) = match &self {
            AppError::Domain(e @ DomainError::InvalidArgument(msg)) => (
                StatusCode::BAD_REQUEST,
                "Invalid argument",
                e.kind(),
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", e.kind(), Some(msg.clone()))
            }
            AppError::Domain(e @ DomainError::PermissionDenied(msg)) => (
                StatusCode::FORBIDDEN,
                "Permission denied",
                e.kind(),
                Some(msg.clone()),
            ),
            AppError::Domain(e @ DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", e.kind(), Some(msg.clone()))
            }
            AppError::Domain(e @ DomainError::Unavailable(msg)) => {
                tracing::error!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable",
                    e.kind(),
                    None,
                )
            }
            AppError::Domain(e @ DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    e.kind(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request",
                "invalid_argument",
                Some(msg.clone()),
            ),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", "unauthorized", None)
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            kind,
            details,
        });

        (status, body).into_response()
    }
}
