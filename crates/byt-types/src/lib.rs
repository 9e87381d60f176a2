//! Shared wire types for the BYT notification hub.
//!
//! Everything a browser client sees on the wire is defined here: the
//! real-time frame envelope, the REST response bodies, and the bird
//! sightings payload. Types flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for identifiers
//! - [`realtime`] -- Real-time channel frames and session metadata
//! - [`api`] -- REST response and error bodies
//! - [`sightings`] -- Aggregated bird sightings response

pub mod api;
pub mod ids;
pub mod realtime;
pub mod sightings;

// Re-export all public types at crate root for convenience.
pub use api::{
    ErrorBody, HealthResponse, LiteraryQuote, NotifyResponse, PollBatch, PollConnected,
};
pub use ids::SessionId;
pub use realtime::{ChannelEvent, ConnectionStatus, Envelope, TransportKind};
pub use sightings::{Sighting, SightingsMetadata, SightingsResponse};
