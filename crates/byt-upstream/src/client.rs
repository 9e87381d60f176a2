//! Shared HTTP plumbing for the feed adapters.

use std::time::Duration;

use reqwest::{RequestBuilder, Url};
use serde_json::Value;

use crate::error::UpstreamError;

/// User agent sent to every upstream.
pub const USER_AGENT: &str = "byt-server/1.0 (https://github.com/your-repo/byt-server)";

/// Base URLs of every upstream. Tests point these at mock servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    /// `FlightAware` `AeroAPI`.
    pub flightaware: String,
    /// Birthday calendar server.
    pub birthdays: String,
    /// Rebrickable LEGO API.
    pub rebrickable: String,
    /// eBird API v2.
    pub ebird: String,
    /// Wikipedia REST API.
    pub wikipedia: String,
    /// This or That machine server.
    pub this_or_that: String,
    /// Literature clock.
    pub literary_clock: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            flightaware: String::from("https://aeroapi.flightaware.com/aeroapi"),
            birthdays: String::from("https://birthday-calendar-server.fcc.lol"),
            rebrickable: String::from("https://rebrickable.com/api/v3/lego"),
            ebird: String::from("https://api.ebird.org/v2"),
            wikipedia: String::from("https://en.wikipedia.org/api/rest_v1"),
            this_or_that: String::from("https://this-or-that-machine-server.noshado.ws"),
            literary_clock: String::from("https://literature-clock.jenevoldsen.com"),
        }
    }
}

/// Build the client shared by every adapter.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Client(e.to_string()))
}

/// Append percent-encoded path segments to a base URL.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base).map_err(|e| UpstreamError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| UpstreamError::InvalidUrl(base.to_owned()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and decode a JSON body, failing on non-success status.
pub(crate) async fn fetch_json(
    request: RequestBuilder,
    service: &'static str,
) -> Result<Value, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::Transport {
            service,
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| UpstreamError::Decode {
            service,
            reason: e.to_string(),
        })
}
