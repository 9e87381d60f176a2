//! Raw observation records.
//!
//! The feed is loosely typed: any field may be missing, empty, or of the
//! wrong JSON type. Decoding never fails; a field that does not have
//! the expected shape is treated as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Common name used when the feed omits one.
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// One sighting as reported by the feed.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Species code.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub species_code: Option<String>,
    /// Common name.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub com_name: Option<String>,
    /// Scientific name.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub sci_name: Option<String>,
    /// Number of individuals seen. Any finite number is kept as-is.
    #[serde(default, deserialize_with = "finite_count")]
    pub how_many: Option<f64>,
    /// Observation time, as reported.
    #[serde(default, deserialize_with = "non_empty_string")]
    pub obs_dt: Option<String>,
}

impl ObservationRecord {
    /// Decode one feed element. Non-object elements become an empty record.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// Species key: the code, or `"{common}|{scientific}"` when absent.
    pub fn species_key(&self) -> String {
        self.species_code.clone().unwrap_or_else(|| {
            format!(
                "{}|{}",
                self.common_name(),
                self.sci_name.as_deref().unwrap_or_default()
            )
        })
    }

    /// Common name, defaulting to [`UNKNOWN_SPECIES`].
    pub fn common_name(&self) -> &str {
        self.com_name.as_deref().unwrap_or(UNKNOWN_SPECIES)
    }

    /// Individuals this record contributes (1 when not reported).
    pub fn individuals(&self) -> f64 {
        self.how_many.unwrap_or(1.0)
    }

    /// Observation time, when it parses.
    pub fn observed_at(&self, timezone: Tz) -> Option<DateTime<Utc>> {
        self.obs_dt
            .as_deref()
            .and_then(|raw| parse_observed_at(raw, timezone))
    }
}

/// Parse a feed timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, and `YYYY-MM-DD`. Values
/// without an offset are local time at the observation site.
pub fn parse_observed_at(raw: &str, timezone: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn finite_count<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_f64()
        .filter(|n| n.is_finite()))
}
