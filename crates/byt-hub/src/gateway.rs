//! REST ingress for notifications.
//!
//! [`IngressGateway::submit`] authorizes a submission against the shared
//! secret and forwards the payload, untouched, to the [`BroadcastHub`]
//! as a [`ChannelEvent::Notification`]. The caller only ever learns how
//! many sessions were attempted, never which deliveries failed.

use std::sync::Arc;

use byt_types::ChannelEvent;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::auth::{authorize, AuthError};
use crate::error::HubError;
use crate::hub::BroadcastHub;

/// Result of an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngressReceipt {
    /// Number of sessions the hub attempted to deliver to.
    pub recipients: usize,
}

/// Why a submission was not broadcast.
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    /// No shared secret is configured on the server.
    #[error("ingress secret is not configured")]
    ConfigurationMissing,

    /// The credential is missing or wrong.
    #[error("invalid or missing credential")]
    Unauthorized,

    /// The body is not a JSON document.
    #[error("{0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The hub failed while forwarding the event.
    #[error("broadcast failed: {0}")]
    Broadcast(#[from] HubError),
}

impl From<AuthError> for IngressError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotConfigured => Self::ConfigurationMissing,
            AuthError::Rejected => Self::Unauthorized,
        }
    }
}

/// Authorizes and forwards REST-submitted notifications.
#[derive(Debug, Clone)]
pub struct IngressGateway {
    hub: BroadcastHub,
    secret: Option<Arc<str>>,
}

impl IngressGateway {
    /// Create a gateway in front of a hub.
    pub fn new(hub: BroadcastHub, secret: Option<String>) -> Self {
        Self {
            hub,
            secret: secret.map(Arc::from),
        }
    }

    /// Authorize and broadcast one notification.
    pub async fn submit(
        &self,
        payload: Value,
        credential: Option<&str>,
    ) -> Result<IngressReceipt, IngressError> {
        self.admit(credential)?;
        self.forward(payload).await
    }

    /// Authorize, then decode `body` as JSON and broadcast it.
    ///
    /// The credential is checked before the body is read. An empty body
    /// is an empty object.
    pub async fn submit_raw(
        &self,
        body: &[u8],
        credential: Option<&str>,
    ) -> Result<IngressReceipt, IngressError> {
        self.admit(credential)?;
        let payload = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_slice(body).map_err(IngressError::InvalidPayload)?
        };
        self.forward(payload).await
    }

    fn admit(&self, credential: Option<&str>) -> Result<(), IngressError> {
        authorize(self.secret.as_deref(), credential).map_err(|e| {
            warn!(reason = %e, "Notification rejected");
            IngressError::from(e)
        })
    }

    async fn forward(&self, payload: Value) -> Result<IngressReceipt, IngressError> {
        let delivery = self
            .hub
            .broadcast(ChannelEvent::Notification, payload)
            .await
            .map_err(|e| {
                error!(error = %e, "Error sending notification");
                IngressError::Broadcast(e)
            })?;

        info!(
            recipients = delivery.attempted,
            failed = delivery.failed,
            "Notification broadcast"
        );

        Ok(IngressReceipt {
            recipients: delivery.attempted,
        })
    }
}
