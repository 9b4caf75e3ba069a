//! Gateway error types with HTTP status code mapping.
//!
//! [`MenuError`] is the central error type for the gateway. Each variant
//! maps to a coarse [`ErrorKind`], a numeric error code, an HTTP status
//! code, and a structured JSON error response.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "unknown table token: table3_token_abc",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`MenuError::error_code`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Coarse error taxonomy shared by every store and the analytics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unknown token, PIN, order id, or table number.
    NotFound,
    /// A uniqueness rule would be violated.
    Conflict,
    /// Input outside the accepted domain.
    InvalidArgument,
    /// A read-only collaborator (mission log) cannot be consulted.
    Unavailable,
    /// Infrastructure failure (disk, serialization).
    Internal,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                  |
/// |-----------|--------------------|------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request              |
/// | 2000–2999 | Not Found/Conflict | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server             | 500 Internal Server Error    |
/// | 5000–5999 | Analytics          | 503 Service Unavailable      |
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// No table is mapped to the given token.
    #[error("unknown table token: {0}")]
    TokenNotFound(String),

    /// No table is mapped to the given PIN.
    #[error("unknown table pin: {0}")]
    PinNotFound(String),

    /// No table with the given number is provisioned.
    #[error("table {0} not found")]
    TableNotFound(u32),

    /// Order with the given ID was not found.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// A token or table number is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request validation failed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Status string outside `pending | ready | delivered | failed`.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// The mission log is absent or cannot be interpreted.
    #[error("mission log unavailable: {0}")]
    MissionLogUnavailable(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MenuError {
    /// Returns the coarse taxonomy this variant belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TokenNotFound(_)
            | Self::PinNotFound(_)
            | Self::TableNotFound(_)
            | Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidArgument(_) | Self::InvalidStatus(_) => ErrorKind::InvalidArgument,
            Self::MissionLogUnavailable(_) => ErrorKind::Unavailable,
            Self::PersistenceError(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidArgument(_) => 1001,
            Self::InvalidStatus(_) => 1002,
            Self::TokenNotFound(_) => 2001,
            Self::PinNotFound(_) => 2002,
            Self::TableNotFound(_) => 2003,
            Self::OrderNotFound(_) => 2004,
            Self::Conflict(_) => 2009,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::MissionLogUnavailable(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for MenuError {
    fn from(err: std::io::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<JsonRejection> for MenuError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for MenuError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
