//! `GET /api/birds-sighted-nearby`: top notable species near the site.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use byt_sightings::aggregate_top;
use byt_types::SightingsResponse;
use chrono::Utc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Fetch recent notable observations, aggregate them per species, and
/// return the top entries with thumbnails where one could be found.
pub async fn birds_sighted_nearby(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SightingsResponse>, ApiError> {
    let ebird = state
        .feeds
        .ebird
        .as_ref()
        .ok_or(ApiError::ConfigurationMissing("EBIRD_API_KEY"))?;
    let records = ebird
        .recent_notable(&state.site)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch eBird data", e))?;

    let top = aggregate_top(
        &records,
        state.site.top,
        state.site.timezone,
        &state.feeds.wikipedia,
    )
    .await;
    info!(
        records = records.len(),
        species = top.ranked.len(),
        "Bird sightings aggregated"
    );

    Ok(Json(top.into_response(&state.site, Utc::now())))
}
