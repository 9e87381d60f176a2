//! Authenticated pass-through endpoints under `/api`.
//!
//! Each handler forwards to one upstream adapter and relays its JSON.
//! A feed without a configured credential answers `Server not
//! configured` naming the missing variable.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use byt_types::LiteraryQuote;
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/flights/{kind}` -- `FlightAware` arrivals or departures at JFK.
pub async fn flights(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let feed = state
        .feeds
        .flights
        .as_ref()
        .ok_or(ApiError::ConfigurationMissing("FLIGHTAWARE_API_KEY"))?;
    let body = feed
        .airport_flights(&kind)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch flight data", e))?;
    Ok(Json(body))
}

/// `GET /api/birthdays`
pub async fn birthdays(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let feed = state
        .feeds
        .birthdays
        .as_ref()
        .ok_or(ApiError::ConfigurationMissing("BIRTHDAY_CALENDAR_SERVER_API_KEY"))?;
    let body = feed
        .calendar()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch birthday data", e))?;
    Ok(Json(body))
}

/// `GET /api/rebrickable/minifigs/{id}`
pub async fn minifig(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let feed = state
        .feeds
        .rebrickable
        .as_ref()
        .ok_or(ApiError::ConfigurationMissing("REBRICKABLE_API_KEY"))?;
    let body = feed
        .minifig(&id)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch minifig data", e))?;
    Ok(Json(body))
}

/// `GET /api/this-or-that/random-pair`
pub async fn random_pair(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let feed = state
        .feeds
        .this_or_that
        .as_ref()
        .ok_or(ApiError::ConfigurationMissing("THIS_OR_THAT_MACHINE_SERVER_API_KEY"))?;
    let body = feed
        .random_pair()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch random pair", e))?;
    Ok(Json(body))
}

/// A wall-clock time requested from the literary clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct ClockTime {
    /// Hour of day.
    #[validate(range(min = 0, max = 23))]
    pub hours: i64,
    /// Minute of hour.
    #[validate(range(min = 0, max = 59))]
    pub minutes: i64,
}

impl ClockTime {
    /// Parse and range-check the two path segments.
    pub fn parse(hours: &str, minutes: &str) -> Result<(u32, u32), ApiError> {
        let time = hours
            .trim()
            .parse::<i64>()
            .ok()
            .zip(minutes.trim().parse::<i64>().ok())
            .map(|(hours, minutes)| Self { hours, minutes })
            .filter(|time| time.validate().is_ok());
        time.and_then(|t| u32::try_from(t.hours).ok().zip(u32::try_from(t.minutes).ok()))
            .ok_or_else(|| ApiError::InvalidRequest {
                error: "Invalid time",
                message: String::from("Hours must be 0-23 and minutes must be 0-59"),
            })
    }
}

/// `GET /api/literary-clock/{hours}/{minutes}` -- one random quote
/// mentioning that time.
pub async fn literary_clock(
    State(state): State<Arc<AppState>>,
    Path((hours, minutes)): Path<(String, String)>,
) -> Result<Json<LiteraryQuote>, ApiError> {
    let (hours, minutes) = ClockTime::parse(&hours, &minutes)?;
    let quote = state
        .feeds
        .literary_clock
        .quote_at(hours, minutes)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch literary clock quote", e))?;
    Ok(Json(quote))
}
