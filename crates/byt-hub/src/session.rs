//! Per-session lifecycle.
//!
//! A session moves through a small state machine driven by transport
//! signals:
//!
//! ```text
//! Connecting --Handshaken--> Active
//!     |                        |
//!     +----Closed/Failed-------+----> Disconnected
//! ```
//!
//! Only `Active` sessions are broadcast targets. `Disconnected` is
//! terminal.

use std::sync::Arc;

use byt_types::{SessionId, TransportKind};
use chrono::{DateTime, Utc};

/// A pre-serialized frame shared by every outbox it is pushed into.
pub type Frame = Arc<str>;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Registered; the handshake has not been queued yet.
    Connecting,
    /// Handshake queued; receives broadcasts.
    Active,
    /// Gone. Terminal.
    Disconnected,
}

/// Transport events that drive [`SessionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionSignal {
    /// The handshake frame was queued.
    Handshaken,
    /// The client closed the connection.
    Closed,
    /// The transport failed or expired.
    Failed,
}

impl SessionState {
    /// Apply a transport signal.
    pub const fn on(self, signal: SessionSignal) -> Self {
        match (self, signal) {
            (Self::Disconnected, _) | (_, SessionSignal::Closed | SessionSignal::Failed) => {
                Self::Disconnected
            }
            (Self::Connecting | Self::Active, SessionSignal::Handshaken) => Self::Active,
        }
    }

    /// Whether broadcasts are delivered in this state.
    pub const fn accepts_broadcast(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One real-time connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identifier assigned at connect time.
    pub id: SessionId,
    /// Wall-clock time the session connected.
    pub connected_at: DateTime<Utc>,
    /// How the client is attached.
    pub transport: TransportKind,
}

impl Session {
    /// Create a session with a fresh identifier.
    pub fn new(transport: TransportKind) -> Self {
        Self {
            id: SessionId::new(),
            connected_at: Utc::now(),
            transport,
        }
    }
}

/// Why a session left the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client closed the connection or asked to leave.
    ClientClosed,
    /// The transport reported an error.
    TransportError(String),
    /// A polling session stayed idle past the ping timeout.
    Expired,
    /// Writing to the client failed.
    SendFailed,
}

impl DisconnectReason {
    /// Signal this reason feeds into the session state machine.
    pub const fn signal(&self) -> SessionSignal {
        match self {
            Self::ClientClosed => SessionSignal::Closed,
            Self::TransportError(_) | Self::Expired | Self::SendFailed => SessionSignal::Failed,
        }
    }
}

impl core::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ClientClosed => f.write_str("client closed"),
            Self::TransportError(e) => write!(f, "transport error: {e}"),
            Self::Expired => f.write_str("ping timeout"),
            Self::SendFailed => f.write_str("send failed"),
        }
    }
}
