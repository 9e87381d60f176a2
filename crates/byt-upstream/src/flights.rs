//! `FlightAware` `AeroAPI` airport flight boards.

use serde_json::Value;

use crate::client::{endpoint, fetch_json};
use crate::error::UpstreamError;

const SERVICE: &str = "FlightAware API";

/// Airport whose boards are proxied.
pub const AIRPORT: &str = "KJFK";

/// Client for airport flight boards.
#[derive(Debug, Clone)]
pub struct FlightAware {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FlightAware {
    /// Create a `FlightAware` adapter.
    pub const fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Flights of one board type (`arrivals`, `departures`, ...) at [`AIRPORT`].
    pub async fn airport_flights(&self, kind: &str) -> Result<Value, UpstreamError> {
        let url = endpoint(&self.base_url, &["airports", AIRPORT, "flights", kind])?;
        let request = self.http.get(url).header("x-apikey", &self.api_key);
        fetch_json(request, SERVICE).await
    }
}
