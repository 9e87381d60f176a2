//! Real-time fan-out core for the BYT notification server.
//!
//! This crate owns the only shared mutable state in the system: the set
//! of live client sessions. It provides:
//!
//! - [`ConnectionRegistry`] -- the live session set with O(1) counting
//!   and tear-free snapshots
//! - [`BroadcastHub`] -- connects sessions (handshake first) and fans
//!   events out to every active session
//! - [`IngressGateway`] -- authorizes REST-submitted notifications and
//!   forwards them to the hub
//!
//! # Architecture
//!
//! Each session owns a bounded outbox of pre-serialized frames. The hub
//! encodes an event once, snapshots the registry, and pushes the frame
//! into every active outbox without awaiting. A transport task (one per
//! `WebSocket`, or the polling table) drains the outbox toward the
//! client. A full or closed outbox loses that frame and is logged; it
//! never stalls or aborts the fan-out.

pub mod auth;
pub mod error;
pub mod gateway;
pub mod hub;
pub mod registry;
pub mod session;

// Re-export primary types for convenience.
pub use auth::{authorize, AuthError};
pub use error::{DeliveryError, HubError};
pub use gateway::{IngressError, IngressGateway, IngressReceipt};
pub use hub::{BroadcastHub, Connection, Delivery, DEFAULT_OUTBOX_CAPACITY};
pub use registry::{ConnectionRegistry, SessionHandle};
pub use session::{DisconnectReason, Frame, Session, SessionSignal, SessionState};
