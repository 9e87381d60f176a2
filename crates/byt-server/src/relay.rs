//! Frames sent by clients.
//!
//! Both transports accept the same client frame, an [`Envelope`]. A
//! `message` envelope is rebroadcast to every active session. Anything
//! else earns the sender an `error` event and nothing is broadcast.

use byt_hub::{BroadcastHub, Delivery};
use byt_types::{ChannelEvent, Envelope, SessionId};
use serde_json::json;
use tracing::{debug, warn};

/// Why a client frame was not relayed.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The frame is not a valid envelope.
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),

    /// The envelope names an event clients may not send.
    #[error("unsupported client event: {0}")]
    UnsupportedEvent(&'static str),

    /// The hub failed to encode the broadcast.
    #[error("{0}")]
    Broadcast(#[from] byt_hub::HubError),
}

/// Relay one client frame from `origin`.
///
/// On failure the origin session is sent an `error` event describing it.
pub async fn relay_client_frame(
    hub: &BroadcastHub,
    origin: SessionId,
    raw: &str,
) -> Result<Delivery, RelayError> {
    match relay(hub, raw).await {
        Ok(delivery) => {
            debug!(session_id = %origin, attempted = delivery.attempted, "Client message relayed");
            Ok(delivery)
        }
        Err(e) => {
            warn!(session_id = %origin, error = %e, "Error processing message");
            let notice = json!({
                "message": "Error processing message",
                "error": e.to_string(),
            });
            if let Err(send_err) = hub.send_to(origin, ChannelEvent::Error, notice).await {
                warn!(session_id = %origin, error = %send_err, "Could not report client error");
            }
            Err(e)
        }
    }
}

async fn relay(hub: &BroadcastHub, raw: &str) -> Result<Delivery, RelayError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.event != ChannelEvent::Message {
        return Err(RelayError::UnsupportedEvent(envelope.event.as_str()));
    }
    Ok(hub.broadcast(ChannelEvent::Message, envelope.data).await?)
}
