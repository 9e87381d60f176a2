//! HTTP long-polling transport.
//!
//! Clients that cannot hold a `WebSocket` open a session with
//! `POST /poll`, then repeatedly `GET /poll/{id}` to drain their outbox.
//! The first batch always starts with the `connection_status` handshake.
//! A session that has not polled within the ping timeout is expired by
//! [`spawn_reaper`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use byt_hub::{Connection, DisconnectReason, Frame};
use byt_types::{PollConnected, SessionId, TransportKind};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::relay::relay_client_frame;
use crate::state::AppState;

type Outbox = Arc<Mutex<mpsc::Receiver<Frame>>>;

#[derive(Debug)]
struct PollSlot {
    frames: Outbox,
    last_seen: Instant,
}

/// Outboxes of every polling session, keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct PollingSessions {
    slots: Arc<Mutex<HashMap<SessionId, PollSlot>>>,
}

impl PollingSessions {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a freshly connected session's outbox.
    pub async fn insert(&self, connection: Connection) {
        let slot = PollSlot {
            frames: Arc::new(Mutex::new(connection.frames)),
            last_seen: Instant::now(),
        };
        self.slots.lock().await.insert(connection.session_id, slot);
    }

    /// Mark a session as seen and hand out its outbox.
    async fn checkout(&self, id: SessionId) -> Option<Outbox> {
        let mut slots = self.slots.lock().await;
        let slot = slots.get_mut(&id)?;
        slot.last_seen = Instant::now();
        Some(Arc::clone(&slot.frames))
    }

    /// Mark a session as seen. Returns `false` if it is unknown.
    pub async fn touch(&self, id: SessionId) -> bool {
        self.checkout(id).await.is_some()
    }

    /// Drop a session's outbox. Returns `false` if it was already gone.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.slots.lock().await.remove(&id).is_some()
    }

    /// Remove and return every session idle for longer than `timeout`.
    pub async fn expire(&self, timeout: Duration) -> Vec<SessionId> {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;
        let expired: Vec<SessionId> = slots
            .iter()
            .filter(|(_, slot)| now.saturating_duration_since(slot.last_seen) > timeout)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            slots.remove(id);
        }
        expired
    }
}

fn parse_session(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().ok().ok_or(ApiError::UnknownSession)
}

/// Open a polling session.
///
/// # Route
///
/// `POST /poll`
pub async fn connect(State(state): State<Arc<AppState>>) -> Result<Json<PollConnected>, ApiError> {
    let connection = state
        .hub
        .connect(TransportKind::Polling)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let session_id = connection.session_id;
    state.polling.insert(connection).await;
    Ok(Json(PollConnected { session_id }))
}

/// Wait for frames and return every one queued, oldest first.
///
/// Waits up to the configured poll wait for the first frame; an empty
/// `events` array means nothing arrived in time. The body is assembled
/// from the pre-encoded frames as `{"events":[...]}`.
///
/// # Route
///
/// `GET /poll/{id}`
pub async fn poll(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_session(&id)?;
    let outbox = state
        .polling
        .checkout(id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut frames_rx = outbox.lock().await;

    let mut frames: Vec<Frame> = Vec::new();
    match tokio::time::timeout(state.poll_wait, frames_rx.recv()).await {
        Ok(Some(frame)) => frames.push(frame),
        Ok(None) => {
            state.polling.remove(id).await;
            return Err(ApiError::UnknownSession);
        }
        Err(_) => {}
    }
    while let Ok(frame) = frames_rx.try_recv() {
        frames.push(frame);
    }
    drop(frames_rx);
    state.polling.touch(id).await;

    debug!(session_id = %id, frames = frames.len(), "Poll answered");
    let body = format!("{{\"events\":[{}]}}", frames.join(","));
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Relay a client frame from a polling session.
///
/// # Route
///
/// `POST /poll/{id}`
pub async fn send(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_session(&id)?;
    if !state.polling.touch(id).await {
        return Err(ApiError::UnknownSession);
    }
    let delivery = relay_client_frame(&state.hub, id, &body)
        .await
        .map_err(|e| ApiError::InvalidRequest {
            error: "Error processing message",
            message: e.to_string(),
        })?;
    Ok(Json(serde_json::json!({ "recipients": delivery.attempted })))
}

/// Close a polling session. Closing an unknown session also succeeds.
///
/// # Route
///
/// `DELETE /poll/{id}`
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if let Ok(id) = parse_session(&id) {
        state.polling.remove(id).await;
        state.hub.disconnect(id, &DisconnectReason::ClientClosed).await;
    }
    StatusCode::NO_CONTENT
}

/// Periodically expire polling sessions idle past the ping timeout.
pub fn spawn_reaper(state: Arc<AppState>) -> JoinHandle<()> {
    let timeout = state.ping_timeout;
    let period = timeout
        .checked_div(2)
        .unwrap_or_default()
        .max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            for id in state.polling.expire(timeout).await {
                if state.hub.disconnect(id, &DisconnectReason::Expired).await {
                    info!(session_id = %id, "Polling session expired");
                }
            }
        }
    })
}
