//! Axum router construction.
//!
//! Assembles every route (REST, long-polling, `WebSocket`) into a single
//! [`Router`] with permissive CORS and request tracing.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, handlers, ingress, polling, proxy, sightings, ws};

/// Build the complete router.
///
/// The router includes:
/// - `GET /health` -- liveness and session count
/// - `POST /notify` -- broadcast a notification (shared secret)
/// - `GET /ws` -- `WebSocket` session
/// - `POST /poll`, `GET|POST|DELETE /poll/{id}` -- long-polling session
/// - `GET /api/...` -- feed proxies, all behind the shared secret
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/flights/{kind}", get(proxy::flights))
        .route("/birthdays", get(proxy::birthdays))
        .route("/rebrickable/minifigs/{id}", get(proxy::minifig))
        .route("/birds-sighted-nearby", get(sightings::birds_sighted_nearby))
        .route("/this-or-that/random-pair", get(proxy::random_pair))
        .route(
            "/literary-clock/{hours}/{minutes}",
            get(proxy::literary_clock),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/notify", post(ingress::notify))
        // Real-time transports
        .route("/ws", get(ws::ws_connect))
        .route("/poll", post(polling::connect))
        .route(
            "/poll/{id}",
            get(polling::poll)
                .post(polling::send)
                .delete(polling::disconnect),
        )
        // Feed proxies
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
