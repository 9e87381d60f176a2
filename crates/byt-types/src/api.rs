//! REST response bodies.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SessionId;
use crate::realtime::Envelope;

/// Body of a successful `POST /notify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NotifyResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Number of sessions the hub attempted to deliver to.
    pub recipients: usize,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Number of registered sessions.
    pub connections: usize,
    /// Process uptime in seconds.
    pub uptime: f64,
}

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorBody {
    /// Short error title.
    pub error: String,
    /// Detail message.
    pub message: String,
}

/// Body of `POST /poll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PollConnected {
    /// Identifier of the new polling session.
    pub session_id: SessionId,
}

/// Body of `GET /poll/{id}`: every frame queued for the session, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PollBatch {
    /// Queued frames, oldest first.
    pub events: Vec<Envelope>,
}

/// One quote from the literary clock, trimmed to the fields clients use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiteraryQuote {
    /// Text before the time phrase.
    pub quote_first: serde_json::Value,
    /// Text after the time phrase.
    pub quote_last: serde_json::Value,
    /// The time phrase itself.
    pub quote_time_case: serde_json::Value,
    /// Title of the work.
    pub title: serde_json::Value,
    /// Author of the work.
    pub author: serde_json::Value,
}
