//! API error handling
//!
//! Maps the application error taxonomy onto HTTP statuses and a JSON body
//! `{ "error", "code", "details"? }`. Internal error details are only
//! included when explicitly enabled.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Configure whether internal error details are included in 500 responses
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) | Self::OutOfBounds(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::OutOfBounds(_) => "out_of_bounds",
            Self::NotFound(_) => "not_found",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let (error, details) = match self {
            Self::InvalidArgument(msg) | Self::OutOfBounds(msg) | Self::NotFound(msg) => {
                (msg, None)
            },
            Self::ServiceUnavailable(msg) => {
                let details = should_expose_details().then_some(msg);
                ("Service temporarily unavailable".to_string(), details)
            },
            Self::Internal(msg) => {
                // Never leak internals unless explicitly enabled
                let details = should_expose_details().then_some(msg);
                ("An internal error occurred".to_string(), details)
            },
        };

        (
            status,
            Json(ErrorResponse {
                error,
                code,
                details,
            }),
        )
            .into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            ApplicationError::OutOfBounds(msg) => Self::OutOfBounds(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            e @ ApplicationError::UpstreamUnavailable { .. } => {
                Self::ServiceUnavailable(e.to_string())
            },
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_bad_requests_with_distinct_codes() {
        let invalid = ApiError::InvalidArgument("lat is required".to_string());
        let outside = ApiError::OutOfBounds("outside Switzerland".to_string());

        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(outside.status(), StatusCode::BAD_REQUEST);
        assert_ne!(invalid.code(), outside.code());
    }

    #[test]
    fn application_errors_map_to_statuses() {
        let cases = [
            (ApplicationError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (ApplicationError::OutOfBounds("x".into()), StatusCode::BAD_REQUEST),
            (ApplicationError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApplicationError::upstream("swisstopo", "timeout"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApplicationError::Configuration("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApplicationError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (source, expected) in cases {
            let api: ApiError = source.into();
            assert_eq!(api.into_response().status(), expected);
        }
    }

    #[test]
    fn error_response_omits_missing_details() {
        let resp = ErrorResponse {
            error: "bad".to_string(),
            code: "invalid_argument".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn display_includes_message() {
        let err = ApiError::NotFound("Site not found: 9".to_string());
        assert_eq!(err.to_string(), "Not found: Site not found: 9");
    }
}
