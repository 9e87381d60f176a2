//! `POST /notify`: broadcast a notification to every connected client.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use byt_types::NotifyResponse;

use crate::auth::{presented_key, ApiKeyQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Authorize and broadcast the JSON body, untouched, as a
/// `notification` event.
///
/// The body is only decoded once the credential has been accepted.
///
/// # Route
///
/// `POST /notify?fccApiKey=...`
pub async fn notify(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ApiKeyQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<NotifyResponse>, ApiError> {
    let credential = presented_key(query);
    let receipt = state
        .gateway
        .submit_raw(&body, credential.as_deref())
        .await?;

    Ok(Json(NotifyResponse {
        message: String::from("Notification sent successfully"),
        recipients: receipt.recipients,
    }))
}
