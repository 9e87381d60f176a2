//! Error types for the hub.

use byt_types::SessionId;

/// Errors raised by registry and hub operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A session with the same identifier is already registered.
    #[error("session {0} is already registered")]
    DuplicateSession(SessionId),

    /// An event envelope could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// The new session's outbox refused the handshake frame.
    #[error("session {0} rejected the handshake")]
    Handshake(SessionId),
}

/// Why a single frame could not be queued for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The session's outbox is at capacity.
    #[error("outbox full")]
    Full,

    /// The session's transport has already gone away.
    #[error("outbox closed")]
    Closed,
}
