//! Birthday calendar server.

use serde_json::Value;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "Birthday calendar API";

/// Client for the birthday calendar.
#[derive(Debug, Clone)]
pub struct BirthdayCalendar {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BirthdayCalendar {
    /// Create a birthday calendar adapter.
    pub const fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// The full calendar.
    pub async fn calendar(&self) -> Result<Value, UpstreamError> {
        let url = endpoint(&self.base_url, &[""])?;
        let request = self
            .http
            .get(url)
            .query(&[("fccApiKey", self.api_key.as_str())]);
        fetch_json(request, SERVICE).await
    }
}
