//! Broker error types.
//!
//! `SourceError` and `ResolveError` describe failures inside the
//! credential-resolution chain. `BrokerError` is the HTTP-facing type; it
//! maps to status codes via the `IntoResponse` impl. Error messages
//! returned to clients are intentionally generic — clients never learn
//! which intermediate sources were tried. Actual errors are logged
//! server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure of a single credential source attempt.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no configuration and was skipped. Expected, not an
    /// error condition.
    #[error("source not configured")]
    Unconfigured,

    /// Transport-level failure reaching the issuer, including timeouts.
    #[error("issuer unreachable: {0}")]
    Unreachable(String),

    /// The issuer answered with a non-success status.
    #[error("issuer rejected the request with status {status}")]
    Rejected { status: u16 },

    /// The issuer answered 2xx but the body could not be parsed into
    /// connection details.
    #[error("issuer returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Terminal failure of a full resolution pass.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Every source in the chain failed or was unconfigured. Carries the
    /// last source's failure — the final fallback's, since nothing after
    /// it could recover.
    #[error("no credential source available: {last}")]
    NoSourceAvailable { last: SourceError },
}

/// HTTP-facing broker error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400 Bad Request
/// - NoSourceAvailable: 503 Service Unavailable
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No credential source available: {0}")]
    NoSourceAvailable(String),

    #[error("Internal server error")]
    Internal,
}

impl BrokerError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            BrokerError::BadRequest(_) => 400,
            BrokerError::NoSourceAvailable(_) => 503,
            BrokerError::Internal => 500,
        }
    }
}

impl From<ResolveError> for BrokerError {
    fn from(err: ResolveError) -> Self {
        let ResolveError::NoSourceAvailable { last } = err;
        BrokerError::NoSourceAvailable(last.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            BrokerError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            BrokerError::NoSourceAvailable(reason) => {
                // Log actual reason server-side, return generic message to client
                tracing::warn!(target: "broker.resolve", reason = %reason, "No credential source available");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NO_CREDENTIAL_SOURCE",
                    "No credential source is currently available".to_string(),
                )
            }
            BrokerError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
