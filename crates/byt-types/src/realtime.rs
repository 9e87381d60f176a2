//! Real-time channel frames.
//!
//! Every frame sent or received on the real-time channel, whatever the
//! transport, is an [`Envelope`]: a named event plus an opaque JSON
//! payload.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SessionId;

/// The named event carried by a real-time frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ChannelEvent {
    /// Handshake pushed to a session right after it connects.
    ConnectionStatus,
    /// A client-originated message relayed to every session.
    Message,
    /// A notification accepted through the REST ingress.
    Notification,
    /// A processing error reported back to a single session.
    Error,
}

impl ChannelEvent {
    /// Wire name of the event.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionStatus => "connection_status",
            Self::Message => "message",
            Self::Notification => "notification",
            Self::Error => "error",
        }
    }
}

/// One frame on the real-time channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Envelope {
    /// Event name.
    pub event: ChannelEvent,
    /// Opaque JSON payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Build an envelope from an event name and payload.
    pub const fn new(event: ChannelEvent, data: serde_json::Value) -> Self {
        Self { event, data }
    }
}

/// Payload of the [`ChannelEvent::ConnectionStatus`] handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ConnectionStatus {
    /// Always `"connected"`.
    pub status: String,
    /// Human-readable greeting.
    pub message: String,
    /// Identifier assigned to the new session.
    pub session_id: SessionId,
}

impl ConnectionStatus {
    /// Handshake payload for a freshly connected session.
    pub fn connected(session_id: SessionId) -> Self {
        Self {
            status: String::from("connected"),
            message: String::from("Connected to notification server"),
            session_id,
        }
    }
}

/// How a session is attached to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TransportKind {
    /// Bidirectional streaming over a `WebSocket`.
    WebSocket,
    /// Fallback long-polling over plain HTTP.
    Polling,
}

impl core::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WebSocket => f.write_str("websocket"),
            Self::Polling => f.write_str("polling"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_snake_case_event_names() {
        let env = Envelope::new(ChannelEvent::ConnectionStatus, serde_json::json!({"a": 1}));
        let json = serde_json::to_value(&env).unwrap_or_default();
        assert_eq!(json["event"], "connection_status");
        assert_eq!(json["data"]["a"], 1);
    }

    #[test]
    fn event_as_str_matches_serde() {
        for event in [
            ChannelEvent::ConnectionStatus,
            ChannelEvent::Message,
            ChannelEvent::Notification,
            ChannelEvent::Error,
        ] {
            let json = serde_json::to_value(event).unwrap_or_default();
            assert_eq!(json, event.as_str());
        }
    }

    #[test]
    fn handshake_carries_session_id_in_camel_case() {
        let id = SessionId::new();
        let json = serde_json::to_value(ConnectionStatus::connected(id)).unwrap_or_default();
        assert_eq!(json["status"], "connected");
        assert_eq!(json["sessionId"], id.to_string());
    }

    #[test]
    fn client_frame_without_data_defaults_to_null() {
        let env: Result<Envelope, _> = serde_json::from_str(r#"{"event":"message"}"#);
        assert_eq!(
            env.ok(),
            Some(Envelope::new(ChannelEvent::Message, serde_json::Value::Null))
        );
    }
}
