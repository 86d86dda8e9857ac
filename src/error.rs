// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::{GenerationError, StorageError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Purchase required to use this feature")]
    EntitlementRequired,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::EntitlementRequired => (StatusCode::FORBIDDEN, "entitlement_required"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Generation(err) => match err {
                GenerationError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                GenerationError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
                GenerationError::QuotaExhausted => (StatusCode::PAYMENT_REQUIRED, "quota_exhausted"),
                GenerationError::BackendUnavailable(_) => {
                    (StatusCode::BAD_GATEWAY, "backend_unavailable")
                }
                GenerationError::ParseError(_) => (StatusCode::BAD_GATEWAY, "parse_error"),
            },
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let details = match &self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => Some(msg.clone()),
            AppError::Generation(GenerationError::BackendUnavailable(msg)) => {
                tracing::error!(error = %msg, "Generation backend unavailable");
                Some("Could not generate activity. Please try again.".to_string())
            }
            AppError::Generation(GenerationError::ParseError(msg)) => {
                tracing::error!(error = %msg, "Generation reply could not be parsed");
                Some("Could not generate activity. Please try again.".to_string())
            }
            AppError::Generation(err) => Some(err.to_string()),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
            AppError::Unauthorized | AppError::EntitlementRequired => None,
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
