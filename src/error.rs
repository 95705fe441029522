// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every failure leaves the gateway as a `{"message": "..."}` body, which is
//! the only error shape the browser code understands.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authorization header is required.")]
    MissingAuthorization,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Non-OK answer from the backend, relayed with the backend's status.
    #[error("Backend responded {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    BadGateway(String),

    /// Transport or decoding failure; `message` is what the client sees.
    #[error("{message}")]
    Unexpected {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap any failure as a 500 with a fixed client-facing message.
    pub fn unexpected(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Unexpected {
            message,
            source: source.into(),
        }
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingAuthorization => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Upstream { message, .. } => {
                tracing::warn!(status = %status, message = %message, "Relaying backend error");
                message.clone()
            }
            AppError::Validation(errors) => describe_validation(errors),
            AppError::Unexpected { message, source } => {
                tracing::error!(error = %source, "{}", message);
                (*message).to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Flatten validator output into `path: message` entries.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    collect_validation(errors, "", &mut entries);
    entries.sort();
    if entries.is_empty() {
        "Invalid request.".to_string()
    } else {
        entries.join("; ")
    }
}

fn collect_validation(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid ({})", err.code));
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validation(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
