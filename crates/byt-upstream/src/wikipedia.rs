//! Wikipedia page thumbnails, used to illustrate ranked species.

use byt_sightings::ImageLookup;
use serde_json::Value;
use tracing::debug;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "Wikipedia API";

/// Resolves a page title to its summary thumbnail.
///
/// Never fails: every error is logged and becomes `None`.
#[derive(Debug, Clone)]
pub struct WikipediaImageLookup {
    http: reqwest::Client,
    base_url: String,
}

impl WikipediaImageLookup {
    /// Create a Wikipedia lookup.
    pub const fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    async fn summary(&self, title: &str) -> Result<Value, UpstreamError> {
        let url = endpoint(&self.base_url, &["page", "summary", title])?;
        fetch_json(self.http.get(url), SERVICE).await
    }
}

impl ImageLookup for WikipediaImageLookup {
    async fn thumbnail(&self, title: &str) -> Option<String> {
        match self.summary(title).await {
            Ok(page) => {
                let source = page
                    .get("thumbnail")
                    .and_then(|t| t.get("source"))
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned);
                if source.is_none() {
                    debug!(title, "Wikipedia page has no thumbnail");
                }
                source
            }
            Err(e) => {
                debug!(title, error = %e, "Wikipedia lookup failed");
                None
            }
        }
    }
}
