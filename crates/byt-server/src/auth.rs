//! Shared-secret guard for the `/api` routes.
//!
//! The secret is presented as the `fccApiKey` query parameter. The check
//! runs before the handler, so a rejected request never reaches an
//! upstream.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string carrying the shared secret.
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyQuery {
    /// The presented credential.
    #[serde(rename = "fccApiKey")]
    pub fcc_api_key: Option<String>,
}

/// The credential carried by a request's query string.
///
/// A query string that cannot be decoded, such as one repeating
/// `fccApiKey`, presents no credential.
pub fn presented_key(query: Result<Query<ApiKeyQuery>, QueryRejection>) -> Option<String> {
    query.ok().and_then(|Query(q)| q.fcc_api_key)
}

/// Reject the request unless it carries the configured secret.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ApiKeyQuery>, QueryRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = presented_key(query);
    if let Err(e) = byt_hub::authorize(state.api_key(), presented.as_deref()) {
        warn!(path = %request.uri().path(), reason = %e, "API request rejected");
        return Err(e.into());
    }
    Ok(next.run(request).await)
}
