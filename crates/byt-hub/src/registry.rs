//! The live session set.
//!
//! [`ConnectionRegistry`] is a cheap-to-clone handle over a shared map of
//! [`SessionHandle`]s. Every mutation and every snapshot is a single lock
//! acquisition, so readers never see a half-applied change. The
//! population count is kept in an atomic beside the map so it can be
//! reported without taking the lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use byt_types::SessionId;
use tokio::sync::{mpsc, RwLock};
use tokio::sync::mpsc::error::TrySendError;

use crate::error::{DeliveryError, HubError};
use crate::session::{Frame, Session, SessionSignal, SessionState};

/// A registered session together with its state and outbox.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Session metadata.
    pub session: Session,
    /// Current lifecycle state.
    pub state: SessionState,
    outbox: mpsc::Sender<Frame>,
}

impl SessionHandle {
    /// Queue a frame without waiting.
    pub fn try_deliver(&self, frame: &Frame) -> Result<(), DeliveryError> {
        self.outbox
            .try_send(Arc::clone(frame))
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::Full,
                TrySendError::Closed(_) => DeliveryError::Closed,
            })
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    count: AtomicUsize,
}

/// Shared handle to the set of live sessions.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session in the [`SessionState::Connecting`] state.
    ///
    /// Confirms the identifier is unique among live sessions.
    pub async fn register(
        &self,
        session: Session,
        outbox: mpsc::Sender<Frame>,
    ) -> Result<SessionId, HubError> {
        let id = session.id;
        let mut sessions = self.inner.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(HubError::DuplicateSession(id));
        }
        sessions.insert(
            id,
            SessionHandle {
                session,
                state: SessionState::Connecting,
                outbox,
            },
        );
        self.inner.count.fetch_add(1, Ordering::AcqRel);
        Ok(id)
    }

    /// Feed a transport signal to a session's state machine.
    ///
    /// A session that ends up [`SessionState::Disconnected`] is removed.
    /// Returns the new state, or `None` when the session is not registered.
    pub async fn apply(&self, id: SessionId, signal: SessionSignal) -> Option<SessionState> {
        let mut sessions = self.inner.sessions.write().await;
        let handle = sessions.get_mut(&id)?;
        let next = handle.state.on(signal);
        handle.state = next;
        if next == SessionState::Disconnected && sessions.remove(&id).is_some() {
            self.inner.count.fetch_sub(1, Ordering::AcqRel);
        }
        Some(next)
    }

    /// Mark a session active once its handshake is queued.
    pub async fn activate(&self, id: SessionId) -> bool {
        self.apply(id, SessionSignal::Handshaken).await == Some(SessionState::Active)
    }

    /// Remove a session. Removing an absent session is a no-op.
    pub async fn unregister(&self, id: SessionId) -> Option<Session> {
        let mut sessions = self.inner.sessions.write().await;
        let removed = sessions.remove(&id)?;
        self.inner.count.fetch_sub(1, Ordering::AcqRel);
        Some(removed.session)
    }

    /// Snapshot of every registered session.
    ///
    /// The returned vector is detached from the registry; later
    /// registrations and removals do not affect it.
    pub async fn all(&self) -> Vec<SessionHandle> {
        self.inner.sessions.read().await.values().cloned().collect()
    }

    /// Look up one session.
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.inner.sessions.read().await.get(&id).cloned()
    }

    /// Whether a session is registered.
    pub async fn contains(&self, id: SessionId) -> bool {
        self.inner.sessions.read().await.contains_key(&id)
    }

    /// Number of registered sessions, without enumerating them.
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::Acquire)
    }
}
