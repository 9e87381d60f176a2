//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies every failure a handler can report and renders
//! it, via its [`IntoResponse`] implementation, as an [`ErrorBody`] with
//! the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use byt_hub::{AuthError, IngressError};
use byt_types::ErrorBody;
use byt_upstream::UpstreamError;
use tracing::error;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The shared-secret credential is missing or wrong.
    #[error("Invalid or missing FCC API key")]
    Unauthorized,

    /// A required variable is not configured. Holds the variable name.
    #[error("{0} is not set on the server")]
    ConfigurationMissing(&'static str),

    /// The request itself is malformed.
    #[error("{error}: {message}")]
    InvalidRequest {
        /// Short error title.
        error: &'static str,
        /// Detail message.
        message: String,
    },

    /// No polling session with the requested id.
    #[error("No polling session with that id")]
    UnknownSession,

    /// An upstream feed failed.
    #[error("{context}: {source}")]
    Upstream {
        /// What the server was doing, e.g. `Failed to fetch eBird data`.
        context: &'static str,
        /// The upstream failure.
        source: UpstreamError,
    },

    /// The hub could not forward a notification.
    #[error("{0}")]
    Notify(String),

    /// An internal error occurred.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap an upstream failure with what the handler was doing.
    pub const fn upstream(context: &'static str, source: UpstreamError) -> Self {
        Self::Upstream { context, source }
    }

    /// Status code, error title, and detail message for this error.
    fn parts(&self) -> (StatusCode, String, String) {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                String::from("Unauthorized"),
                self.to_string(),
            ),
            Self::ConfigurationMissing(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Server not configured"),
                self.to_string(),
            ),
            Self::InvalidRequest { error, message } => {
                (StatusCode::BAD_REQUEST, (*error).to_owned(), message.clone())
            }
            Self::UnknownSession => (
                StatusCode::NOT_FOUND,
                String::from("Unknown session"),
                self.to_string(),
            ),
            Self::Upstream { context, source } if !source.is_shape_error() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                (*context).to_owned(),
                source.to_string(),
            ),
            Self::Upstream { source, .. } => {
                let title = if matches!(source, UpstreamError::ShapeMismatch(_)) {
                    "Upstream response shape mismatch"
                } else {
                    "Upstream response unexpected"
                };
                (StatusCode::BAD_GATEWAY, title.to_owned(), source.to_string())
            }
            Self::Notify(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Failed to send notification"),
                msg.clone(),
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Internal server error"),
                msg.clone(),
            ),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotConfigured => Self::ConfigurationMissing("FCC_API_KEY"),
            AuthError::Rejected => Self::Unauthorized,
        }
    }
}

impl From<IngressError> for ApiError {
    fn from(e: IngressError) -> Self {
        match e {
            IngressError::ConfigurationMissing => Self::ConfigurationMissing("FCC_API_KEY"),
            IngressError::Unauthorized => Self::Unauthorized,
            IngressError::InvalidPayload(e) => Self::InvalidRequest {
                error: "Invalid notification",
                message: e.to_string(),
            },
            IngressError::Broadcast(e) => Self::Notify(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        if status.is_server_error() {
            error!(status = status.as_u16(), %error, %message, "Request failed");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_errors_map_to_bad_gateway() {
        let err = ApiError::upstream(
            "Failed to fetch eBird data",
            UpstreamError::UnexpectedShape("Expected an array of observations"),
        );
        let (status, title, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(title, "Upstream response unexpected");
        assert_eq!(message, "Expected an array of observations");

        let err = ApiError::upstream("x", UpstreamError::ShapeMismatch("Expected fields"));
        assert_eq!(err.parts().1, "Upstream response shape mismatch");
    }

    #[test]
    fn other_upstream_errors_carry_context_as_title() {
        let err = ApiError::upstream(
            "Failed to fetch flight data",
            UpstreamError::Status {
                service: "FlightAware API",
                status: 503,
            },
        );
        let (status, title, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(title, "Failed to fetch flight data");
        assert_eq!(message, "FlightAware API responded with status: 503");
    }

    #[test]
    fn missing_secret_names_the_variable() {
        let err = ApiError::from(AuthError::NotConfigured);
        let (status, title, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(title, "Server not configured");
        assert_eq!(message, "FCC_API_KEY is not set on the server");
    }

    #[test]
    fn rejected_credential_is_unauthorized() {
        let (status, title, message) = ApiError::from(AuthError::Rejected).parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(title, "Unauthorized");
        assert_eq!(message, "Invalid or missing FCC API key");
    }
}
