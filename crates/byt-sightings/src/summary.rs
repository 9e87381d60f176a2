//! The observation site and the metadata block of the response.

use byt_types::SightingsMetadata;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const MS_PER_HOUR: i64 = 3_600_000;

/// A fixed place whose recent notable sightings are aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSite {
    /// Display name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Search radius in kilometres.
    pub distance_km: u32,
    /// Upper bound on records requested from the feed.
    pub max_results: u32,
    /// Species kept after ranking.
    pub top: usize,
    /// Local time zone of the site.
    pub timezone: Tz,
}

impl ObservationSite {
    /// Gantry Plaza State Park, Long Island City.
    pub fn gantry_state_park() -> Self {
        Self {
            name: String::from("Gantry State Park"),
            lat: 40.747_681,
            lng: -73.956_555,
            distance_km: 5,
            max_results: 100,
            top: 4,
            timezone: chrono_tz::America::New_York,
        }
    }

    /// Metadata block for a ranking whose window opens at `window_start`.
    pub fn metadata(
        &self,
        window_start: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> SightingsMetadata {
        SightingsMetadata {
            location_name: self.name.clone(),
            lat: self.lat,
            lng: self.lng,
            distance_km: self.distance_km,
            since_date_time: window_start.map(|ts| format_local(ts, self.timezone)),
            hours_since_since_date: window_start.map(|ts| hours_between(ts, now)),
        }
    }
}

impl Default for ObservationSite {
    fn default() -> Self {
        Self::gantry_state_park()
    }
}

/// Render a timestamp as `M/D/YYYY, h:mm:ss AM` in `timezone`.
pub fn format_local(ts: DateTime<Utc>, timezone: Tz) -> String {
    ts.with_timezone(&timezone)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Whole hours from `start` to `now`, rounded half up.
pub fn hours_between(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(start)
        .num_milliseconds()
        .saturating_add(MS_PER_HOUR / 2)
        .checked_div_euclid(MS_PER_HOUR)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn formats_in_site_local_time() {
        let site = ObservationSite::gantry_state_park();
        assert_eq!(
            format_local(utc(2024, 5, 1, 12, 15), site.timezone),
            "5/1/2024, 8:15:00 AM"
        );
        assert_eq!(
            format_local(utc(2024, 12, 24, 23, 5), site.timezone),
            "12/24/2024, 6:05:00 PM"
        );
    }

    #[test]
    fn hours_round_half_up() {
        let start = utc(2024, 5, 1, 0, 0);
        assert_eq!(hours_between(start, start + Duration::minutes(29)), 0);
        assert_eq!(hours_between(start, start + Duration::minutes(30)), 1);
        assert_eq!(hours_between(start, start + Duration::minutes(150)), 3);
        assert_eq!(hours_between(start, start + Duration::hours(48)), 48);
    }

    #[test]
    fn metadata_without_window_has_null_time_fields() {
        let site = ObservationSite::default();
        let meta = site.metadata(None, Utc::now());
        assert_eq!(meta.location_name, "Gantry State Park");
        assert_eq!(meta.distance_km, 5);
        assert_eq!(meta.since_date_time, None);
        assert_eq!(meta.hours_since_since_date, None);
    }

    #[test]
    fn metadata_with_window_reports_elapsed_hours() {
        let site = ObservationSite::default();
        let start = utc(2024, 5, 1, 12, 15);
        let meta = site.metadata(Some(start), start + Duration::hours(5));
        assert_eq!(meta.since_date_time.as_deref(), Some("5/1/2024, 8:15:00 AM"));
        assert_eq!(meta.hours_since_since_date, Some(5));
    }
}
