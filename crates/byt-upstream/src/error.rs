//! Error types for upstream calls.

/// Errors that can occur while calling a third-party feed.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response.
    #[error("{service} request failed: {reason}")]
    Transport {
        /// Upstream display name.
        service: &'static str,
        /// Underlying transport error.
        reason: String,
    },

    /// The upstream answered with a non-success status.
    #[error("{service} responded with status: {status}")]
    Status {
        /// Upstream display name.
        service: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The body was not valid JSON.
    #[error("{service} returned an unreadable body: {reason}")]
    Decode {
        /// Upstream display name.
        service: &'static str,
        /// Underlying decode error.
        reason: String,
    },

    /// The JSON did not have the expected top-level shape.
    #[error("{0}")]
    UnexpectedShape(&'static str),

    /// A required field was missing from an element.
    #[error("{0}")]
    ShapeMismatch(&'static str),

    /// A configured base URL could not be used.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl UpstreamError {
    /// Whether the failure is a malformed upstream payload rather than a
    /// transport or status failure.
    pub const fn is_shape_error(&self) -> bool {
        matches!(self, Self::UnexpectedShape(_) | Self::ShapeMismatch(_))
    }
}
