//! Aggregated bird sightings payload served by `/api/birds-sighted-nearby`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Fixed observation site and the time window covered by the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SightingsMetadata {
    /// Display name of the site.
    pub location_name: String,
    /// Site latitude.
    pub lat: f64,
    /// Site longitude.
    pub lng: f64,
    /// Search radius in kilometres.
    pub distance_km: u32,
    /// Earliest observation among the ranked species, in site-local time.
    pub since_date_time: Option<String>,
    /// Whole hours elapsed since `since_date_time`.
    #[ts(type = "number | null")]
    pub hours_since_since_date: Option<i64>,
}

/// One ranked species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Sighting {
    /// Species code (synthesized from the names when the feed omits it).
    pub code: String,
    /// Common name.
    pub common_name: String,
    /// Scientific name, when reported.
    pub scientific_name: Option<String>,
    /// Number of observations of this species.
    pub count: u64,
    /// Thumbnail URL, `null` when the lookup failed.
    pub image_url: Option<String>,
}

/// Full sightings response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SightingsResponse {
    /// Site and time window.
    pub metadata: SightingsMetadata,
    /// Ranked species, best first.
    pub sightings: Vec<Sighting>,
}
