//! eBird recent notable observations.

use byt_sightings::{ObservationRecord, ObservationSite};
use serde_json::Value;
use tracing::debug;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "eBird API";

/// Client for the eBird observation feed.
#[derive(Debug, Clone)]
pub struct EBird {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EBird {
    /// Create an eBird adapter.
    pub const fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Recent notable observations around `site`.
    ///
    /// Fails with [`UpstreamError::UnexpectedShape`] when the feed does not
    /// return an array. Individual elements are decoded leniently.
    pub async fn recent_notable(
        &self,
        site: &ObservationSite,
    ) -> Result<Vec<ObservationRecord>, UpstreamError> {
        let url = endpoint(&self.base_url, &["data", "obs", "geo", "recent", "notable"])?;
        let request = self
            .http
            .get(url)
            .query(&[
                ("lat", site.lat.to_string()),
                ("lng", site.lng.to_string()),
                ("dist", site.distance_km.to_string()),
                ("maxResults", site.max_results.to_string()),
            ])
            .header("Accept", "application/json")
            .header("x-ebirdapitoken", &self.api_key);

        let Value::Array(items) = fetch_json(request, SERVICE).await? else {
            return Err(UpstreamError::UnexpectedShape(
                "Expected an array of observations",
            ));
        };

        debug!(observations = items.len(), "eBird observations received");
        Ok(items.iter().map(ObservationRecord::from_value).collect())
    }
}
