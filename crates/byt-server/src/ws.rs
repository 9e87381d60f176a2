//! `WebSocket` transport.
//!
//! Clients connect to `GET /ws`. The first frame they receive is the
//! `connection_status` handshake, followed by every `notification` and
//! `message` broadcast while they stay connected. Text frames from the
//! client are relayed through [`relay_client_frame`].

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use byt_hub::{Connection, DisconnectReason};
use byt_types::TransportKind;
use tracing::{debug, warn};

use crate::relay::relay_client_frame;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` session.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_connect(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Drive one session: forward outbox frames to the socket and client
/// frames to the relay until either side goes away.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let Connection {
        session_id,
        mut frames,
    } = match state.hub.connect(TransportKind::WebSocket).await {
        Ok(conn) => conn,
        Err(e) => {
            warn!(error = %e, "Could not register WebSocket session");
            return;
        }
    };

    let reason = loop {
        tokio::select! {
            frame = frames.recv() => {
                match frame {
                    Some(text) => {
                        let msg = Message::Text(text.to_string().into());
                        if socket.send(msg).await.is_err() {
                            break DisconnectReason::SendFailed;
                        }
                    }
                    None => break DisconnectReason::TransportError(String::from("outbox closed")),
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = relay_client_frame(&state.hub, session_id, text.as_str()).await {
                            debug!(%session_id, error = %e, "Client frame not relayed");
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break DisconnectReason::SendFailed;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break DisconnectReason::ClientClosed,
                    Some(Err(e)) => break DisconnectReason::TransportError(e.to_string()),
                    Some(Ok(_)) => {
                        debug!(%session_id, "Ignoring non-text client frame");
                    }
                }
            }
        }
    };

    state.hub.disconnect(session_id, &reason).await;
}
