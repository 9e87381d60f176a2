//! Literature clock: quotes that mention a given time of day.

use byt_types::LiteraryQuote;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::Value;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "Literary clock";

/// Fields every quote must carry.
pub const QUOTE_FIELDS: [&str; 5] = [
    "quote_first",
    "quote_last",
    "quote_time_case",
    "title",
    "author",
];

/// Client for the literature clock.
#[derive(Debug, Clone)]
pub struct LiteraryClock {
    http: reqwest::Client,
    base_url: String,
}

impl LiteraryClock {
    /// Create a literature clock adapter.
    pub const fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// One randomly chosen quote for `hours:minutes`.
    ///
    /// The caller is responsible for range-checking the time.
    pub async fn quote_at(&self, hours: u32, minutes: u32) -> Result<LiteraryQuote, UpstreamError> {
        let file = format!("{hours:02}_{minutes:02}.json");
        let url = endpoint(&self.base_url, &["times", &file])?;
        let body = fetch_json(self.http.get(url), SERVICE).await?;
        pick_quote(&body, &mut rand::rng())
    }
}

/// Pick one quote uniformly at random from an upstream body.
pub fn pick_quote<R: Rng + ?Sized>(body: &Value, rng: &mut R) -> Result<LiteraryQuote, UpstreamError> {
    let picked = body
        .as_array()
        .and_then(|quotes| quotes.choose(rng))
        .ok_or(UpstreamError::UnexpectedShape(
            "Expected a non-empty array of quotes",
        ))?;

    if !QUOTE_FIELDS.iter().all(|name| picked.get(name).is_some()) {
        return Err(UpstreamError::ShapeMismatch(
            "Expected fields: quote_first, quote_last, quote_time_case, title, author",
        ));
    }

    let field = |name: &str| picked.get(name).cloned().unwrap_or_default();
    Ok(LiteraryQuote {
        quote_first: field("quote_first"),
        quote_last: field("quote_last"),
        quote_time_case: field("quote_time_case"),
        title: field("title"),
        author: field("author"),
    })
}
