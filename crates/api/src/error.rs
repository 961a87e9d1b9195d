//! API error types with HTTP response mapping.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while producing the API description document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document could not be serialized to JSON.
    #[error("failed to serialize API document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document source could not produce a document.
    #[error("API document unavailable: {0}")]
    Unavailable(String),
}

/// Errors in the server lifecycle. Only `Bind` is fatal to the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting or serving connections failed.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    /// The background server task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// API document generation failed; answered as plain text.
    Schema(SchemaError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Schema(err) => {
                tracing::error!(error = %err, "API document generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    err.to_string(),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                let body = serde_json::json!({ "error": msg });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::Schema(err)
    }
}
