//! This or That machine: random vote pairs.

use serde_json::Value;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "This or That API";

/// Client for random vote pairs.
#[derive(Debug, Clone)]
pub struct ThisOrThat {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ThisOrThat {
    /// Create a This or That adapter.
    pub const fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// A random pair with its vote counts.
    pub async fn random_pair(&self) -> Result<Value, UpstreamError> {
        let url = endpoint(&self.base_url, &["votes", "get-random-pair-votes"])?;
        let request = self.http.get(url).query(&[("key", self.api_key.as_str())]);
        fetch_json(request, SERVICE).await
    }
}
