//! Network error types

use std::io;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors seen by the server runtime and the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Core(#[from] buddy_core::Error),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors returned by the HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required field missing, reported back verbatim
    #[error("{0}")]
    Validation(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Store failure. Only the operation name reaches the client.
    #[error("Internal Server Error during {operation}.")]
    Store {
        operation: &'static str,
        #[source]
        source: buddy_core::Error,
    },

    #[error("Internal Server Error: database unavailable.")]
    Unavailable,
}

impl ApiError {
    /// Map a core error raised while performing `operation`
    pub fn during(operation: &'static str) -> impl FnOnce(buddy_core::Error) -> ApiError {
        move |source| match source {
            buddy_core::Error::Validation(reason) => ApiError::Validation(reason),
            source => ApiError::Store { operation, source },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(reason) => {
                warn!(reason = %reason, "Rejected request");
                StatusCode::BAD_REQUEST
            }
            ApiError::MalformedPayload(reason) => {
                warn!(reason = %reason, "Malformed payload");
                StatusCode::BAD_REQUEST
            }
            ApiError::Store { operation, source } => {
                error!(operation = *operation, error = %source, "Store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Unavailable => {
                error!("Database lock poisoned");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
