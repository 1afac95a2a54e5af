//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

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
///     "code": 1001,
///     "message": "invalid request: title must not be empty",
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
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status               |
/// |-----------|-----------------------|---------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request           |
/// | 3000–3099 | Server / Collaborator | 500 Internal Server Error |
/// | 3100–3199 | Messaging             | 500 Internal Server Error |
///
/// Messaging errors are usually handled internally (a decode failure drops
/// the offending message, a publish failure is logged by the write path);
/// the HTTP mapping exists so every variant stays total under
/// [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A broker or transport session could not be established. Fatal to the
    /// startup path that attempted it; never retried internally.
    #[error("connection failed: {0}")]
    Connection(String),

    /// An outbound broker message could not be encoded.
    #[error("encode error on topic {topic}: {reason}")]
    Encode {
        /// Topic the message was bound for.
        topic: &'static str,
        /// Underlying serializer failure.
        reason: String,
    },

    /// An inbound payload did not match the schema registered for its topic.
    /// Reported per message; the subscription continues.
    #[error("decode error on topic {topic}: {reason}")]
    Decode {
        /// Topic the payload arrived on.
        topic: &'static str,
        /// Underlying deserializer failure.
        reason: String,
    },

    /// The broker rejected a publish or the session was lost mid-send.
    /// Reported to the caller; no implicit retry.
    #[error("publish error on topic {topic}: {reason}")]
    Publish {
        /// Topic the publish targeted.
        topic: &'static str,
        /// Broker-reported failure.
        reason: String,
    },

    /// Persistence layer failure.
    #[error("repository error: {0}")]
    Repository(String),

    /// Search backend failure.
    #[error("search error: {0}")]
    Search(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Internal(_) => 3000,
            Self::Repository(_) => 3001,
            Self::Connection(_) => 3002,
            Self::Search(_) => 3004,
            Self::Encode { .. } => 3101,
            Self::Decode { .. } => 3102,
            Self::Publish { .. } => 3103,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Connection(_)
            | Self::Encode { .. }
            | Self::Decode { .. }
            | Self::Publish { .. }
            | Self::Repository(_)
            | Self::Search(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
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

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = GatewayError::InvalidRequest("title must not be empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn messaging_errors_map_to_server_range() {
        let err = GatewayError::Decode {
            topic: "feeds.created",
            reason: "truncated payload".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3102);
    }

    #[test]
    fn display_includes_topic() {
        let err = GatewayError::Publish {
            topic: "feeds.created",
            reason: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("feeds.created"));
        assert!(msg.contains("connection reset"));
    }
}
