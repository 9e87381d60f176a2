//! Rebrickable LEGO minifigure catalogue.

use serde_json::Value;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "Rebrickable API";

/// Client for minifigure details.
#[derive(Debug, Clone)]
pub struct Rebrickable {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Rebrickable {
    /// Create a Rebrickable adapter.
    pub const fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Details of one minifigure (e.g. `fig-000001`).
    pub async fn minifig(&self, id: &str) -> Result<Value, UpstreamError> {
        let url = endpoint(&self.base_url, &["minifigs", id, ""])?;
        let request = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .header("Authorization", format!("key {}", self.api_key));
        fetch_json(request, SERVICE).await
    }
}
