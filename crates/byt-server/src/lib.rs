//! HTTP and `WebSocket` surface of the BYT notification server.
//!
//! Serves the real-time channel (a `WebSocket` at `/ws` and an HTTP
//! long-polling fallback at `/poll`), the `POST /notify` ingress, and a
//! set of authenticated feed proxies under `/api`.
//!
//! # Modules
//!
//! - [`config`] -- environment configuration
//! - [`state`] -- shared state (hub, gateway, polling table, feeds)
//! - [`router`] -- route table
//! - [`ws`] / [`polling`] -- the two client transports
//! - [`relay`] -- frames sent by clients
//! - [`ingress`] -- `POST /notify`
//! - [`auth`] -- shared-secret guard for `/api`
//! - [`proxy`] / [`sightings`] -- feed endpoints
//! - [`error`] -- [`ApiError`](error::ApiError) and its HTTP rendering
//! - [`server`] -- listener lifecycle

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ingress;
pub mod polling;
pub mod proxy;
pub mod relay;
pub mod router;
pub mod server;
pub mod sightings;
pub mod state;
pub mod ws;
