//! Event fan-out to every active session.
//!
//! [`BroadcastHub`] is the only writer of session outboxes. It connects
//! new sessions (queuing the handshake before the session becomes a
//! broadcast target), fans events out against a registry snapshot, and
//! tears sessions down on disconnect.

use std::sync::Arc;

use byt_types::{ChannelEvent, ConnectionStatus, Envelope, SessionId, TransportKind};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{DeliveryError, HubError};
use crate::registry::ConnectionRegistry;
use crate::session::{DisconnectReason, Frame, Session};

/// Default bound on frames queued per session.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// A freshly connected session: its identifier and the receiving end of
/// its outbox. The handshake frame is already queued.
#[derive(Debug)]
pub struct Connection {
    /// Identifier assigned to the session.
    pub session_id: SessionId,
    /// Frames queued for the client, oldest first.
    pub frames: mpsc::Receiver<Frame>,
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Active sessions the frame was offered to.
    pub attempted: usize,
    /// Offers that failed (outbox full or closed).
    pub failed: usize,
}

/// Fans events out to every active session in a [`ConnectionRegistry`].
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    registry: ConnectionRegistry,
    outbox_capacity: usize,
}

impl BroadcastHub {
    /// Create a hub over a registry.
    ///
    /// `outbox_capacity` is clamped to at least one frame.
    pub fn new(registry: ConnectionRegistry, outbox_capacity: usize) -> Self {
        Self {
            registry,
            outbox_capacity: outbox_capacity.max(1),
        }
    }

    /// The registry this hub delivers to.
    pub const fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register a new session and queue its handshake.
    ///
    /// The session is only marked active after the handshake is queued,
    /// so no broadcast frame can overtake it.
    pub async fn connect(&self, transport: TransportKind) -> Result<Connection, HubError> {
        let session = Session::new(transport);
        let id = session.id;
        let handshake = encode(
            ChannelEvent::ConnectionStatus,
            serde_json::to_value(ConnectionStatus::connected(id))?,
        )?;

        let (tx, rx) = mpsc::channel(self.outbox_capacity);
        let handshake_sent = tx.try_send(handshake).is_ok();
        if !handshake_sent {
            return Err(HubError::Handshake(id));
        }
        self.registry.register(session, tx).await?;
        self.registry.activate(id).await;

        info!(
            session_id = %id,
            %transport,
            connections = self.registry.count(),
            "Session connected"
        );

        Ok(Connection {
            session_id: id,
            frames: rx,
        })
    }

    /// Remove a session. Returns `false` if it was already gone.
    pub async fn disconnect(&self, id: SessionId, reason: &DisconnectReason) -> bool {
        match self.registry.apply(id, reason.signal()).await {
            Some(_) => {
                info!(
                    session_id = %id,
                    %reason,
                    connections = self.registry.count(),
                    "Session disconnected"
                );
                true
            }
            None => false,
        }
    }

    /// Offer an event to every session active at the time of the call.
    ///
    /// Per-session failures are collected and logged; they never abort
    /// the fan-out. Fails only if the event cannot be encoded.
    pub async fn broadcast(&self, event: ChannelEvent, payload: Value) -> Result<Delivery, HubError> {
        let frame = encode(event, payload)?;
        let targets = self.registry.all().await;

        let mut delivery = Delivery::default();
        let mut failures: Vec<(SessionId, DeliveryError)> = Vec::new();
        for handle in targets.iter().filter(|h| h.state.accepts_broadcast()) {
            delivery.attempted = delivery.attempted.saturating_add(1);
            if let Err(e) = handle.try_deliver(&frame) {
                failures.push((handle.session.id, e));
            }
        }
        delivery.failed = failures.len();

        for (session_id, error) in &failures {
            warn!(%session_id, %error, event = event.as_str(), "Broadcast delivery failed");
        }
        debug!(
            event = event.as_str(),
            attempted = delivery.attempted,
            failed = delivery.failed,
            "Broadcast complete"
        );

        Ok(delivery)
    }

    /// Queue an event for a single session.
    ///
    /// Returns `Ok(false)` if the session is unknown or its outbox
    /// refused the frame.
    pub async fn send_to(
        &self,
        id: SessionId,
        event: ChannelEvent,
        payload: Value,
    ) -> Result<bool, HubError> {
        let Some(handle) = self.registry.get(id).await else {
            return Ok(false);
        };
        let frame = encode(event, payload)?;
        match handle.try_deliver(&frame) {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(session_id = %id, %error, event = event.as_str(), "Direct delivery failed");
                Ok(false)
            }
        }
    }
}

/// Serialize an event envelope into a shareable frame.
fn encode(event: ChannelEvent, payload: Value) -> Result<Frame, HubError> {
    let text = serde_json::to_string(&Envelope::new(event, payload))?;
    Ok(Arc::from(text))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn hub() -> BroadcastHub {
        BroadcastHub::new(ConnectionRegistry::new(), 8)
    }

    fn decode(frame: &Frame) -> Envelope {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn handshake_is_first_frame_and_carries_session_id() {
        let hub = hub();
        let mut conn = hub.connect(TransportKind::WebSocket).await.unwrap();
        hub.broadcast(ChannelEvent::Notification, json!({"n": 1}))
            .await
            .unwrap();

        let first = decode(&conn.frames.recv().await.unwrap());
        assert_eq!(first.event, ChannelEvent::ConnectionStatus);
        assert_eq!(first.data["status"], "connected");
        assert_eq!(first.data["sessionId"], conn.session_id.to_string());

        let second = decode(&conn.frames.recv().await.unwrap());
        assert_eq!(second.event, ChannelEvent::Notification);
        assert_eq!(second.data, json!({"n": 1}));
    }

    #[tokio::test]
    async fn broadcast_reaches_every_active_session() {
        let hub = hub();
        let mut conns = Vec::new();
        for _ in 0..3 {
            conns.push(hub.connect(TransportKind::WebSocket).await.unwrap());
        }

        let delivery = hub
            .broadcast(ChannelEvent::Message, json!("hello"))
            .await
            .unwrap();
        assert_eq!(delivery, Delivery { attempted: 3, failed: 0 });

        for conn in &mut conns {
            let _handshake = conn.frames.recv().await.unwrap();
            let frame = decode(&conn.frames.recv().await.unwrap());
            assert_eq!(frame.event, ChannelEvent::Message);
            assert_eq!(frame.data, json!("hello"));
        }
    }

    #[tokio::test]
    async fn failed_sends_are_counted_but_do_not_abort() {
        let hub = hub();
        let mut alive = hub.connect(TransportKind::WebSocket).await.unwrap();
        let gone = hub.connect(TransportKind::WebSocket).await.unwrap();
        drop(gone.frames);

        let delivery = hub
            .broadcast(ChannelEvent::Notification, json!({}))
            .await
            .unwrap();
        assert_eq!(delivery.attempted, 2);
        assert_eq!(delivery.failed, 1);

        let _handshake = alive.frames.recv().await.unwrap();
        assert!(alive.frames.recv().await.is_some());
    }

    #[tokio::test]
    async fn full_outbox_counts_as_failure() {
        let hub = BroadcastHub::new(ConnectionRegistry::new(), 1);
        let _conn = hub.connect(TransportKind::Polling).await.unwrap();

        // The handshake already fills the single slot.
        let delivery = hub
            .broadcast(ChannelEvent::Notification, json!(1))
            .await
            .unwrap();
        assert_eq!(delivery, Delivery { attempted: 1, failed: 1 });
    }

    #[tokio::test]
    async fn late_session_does_not_receive_earlier_broadcast() {
        let hub = hub();
        let mut early = hub.connect(TransportKind::WebSocket).await.unwrap();
        let delivery = hub
            .broadcast(ChannelEvent::Notification, json!("first"))
            .await
            .unwrap();
        assert_eq!(delivery.attempted, 1);

        let mut late = hub.connect(TransportKind::WebSocket).await.unwrap();
        let _handshake = late.frames.recv().await.unwrap();
        assert!(late.frames.try_recv().is_err());

        let _handshake = early.frames.recv().await.unwrap();
        assert_eq!(decode(&early.frames.recv().await.unwrap()).data, json!("first"));
    }

    #[tokio::test]
    async fn connecting_sessions_are_skipped() {
        let hub = hub();
        let (tx, _rx) = mpsc::channel(4);
        hub.registry()
            .register(Session::new(TransportKind::WebSocket), tx)
            .await
            .unwrap();

        let delivery = hub
            .broadcast(ChannelEvent::Notification, json!(null))
            .await
            .unwrap();
        assert_eq!(delivery.attempted, 0);
        assert_eq!(hub.registry().count(), 1);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let hub = hub();
        let conn = hub.connect(TransportKind::WebSocket).await.unwrap();
        assert!(hub.disconnect(conn.session_id, &DisconnectReason::ClientClosed).await);
        assert!(!hub.disconnect(conn.session_id, &DisconnectReason::ClientClosed).await);
        assert_eq!(hub.registry().count(), 0);

        let delivery = hub
            .broadcast(ChannelEvent::Notification, json!(null))
            .await
            .unwrap();
        assert_eq!(delivery.attempted, 0);
    }

    #[tokio::test]
    async fn send_to_targets_one_session() {
        let hub = hub();
        let mut target = hub.connect(TransportKind::WebSocket).await.unwrap();
        let mut other = hub.connect(TransportKind::WebSocket).await.unwrap();

        let sent = hub
            .send_to(target.session_id, ChannelEvent::Error, json!({"message": "bad"}))
            .await
            .unwrap();
        assert!(sent);

        let _handshake = target.frames.recv().await.unwrap();
        assert_eq!(
            decode(&target.frames.recv().await.unwrap()).event,
            ChannelEvent::Error
        );
        let _handshake = other.frames.recv().await.unwrap();
        assert!(other.frames.try_recv().is_err());

        let unknown = hub
            .send_to(SessionId::new(), ChannelEvent::Error, json!(null))
            .await
            .unwrap();
        assert!(!unknown);
    }
}
