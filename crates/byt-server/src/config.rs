//! Server configuration.
//!
//! All configuration is loaded from environment variables (a `.env` file
//! is honoured by the binary). Feed credentials are optional: a missing
//! one only disables the endpoint that needs it.

use std::str::FromStr;
use std::time::Duration;

use byt_hub::DEFAULT_OUTBOX_CAPACITY;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure.
        reason: String,
    },
}

/// API keys for the proxied feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedCredentials {
    /// `FLIGHTAWARE_API_KEY`.
    pub flightaware: Option<String>,
    /// `BIRTHDAY_CALENDAR_SERVER_API_KEY`.
    pub birthdays: Option<String>,
    /// `REBRICKABLE_API_KEY`.
    pub rebrickable: Option<String>,
    /// `EBIRD_API_KEY`.
    pub ebird: Option<String>,
    /// `THIS_OR_THAT_MACHINE_SERVER_API_KEY`.
    pub this_or_that: Option<String>,
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Shared secret (`FCC_API_KEY`) guarding `/notify` and `/api/*`.
    pub api_key: Option<String>,
    /// Feed credentials.
    pub credentials: FeedCredentials,
    /// Idle time after which a polling session is dropped.
    pub ping_timeout: Duration,
    /// How long a long-poll waits for the first frame.
    pub poll_wait: Duration,
    /// Frames queued per session before new ones are dropped.
    pub outbox_capacity: usize,
    /// Timeout for each upstream request.
    pub upstream_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 3102,
            api_key: None,
            credentials: FeedCredentials::default(),
            ping_timeout: Duration::from_millis(60_000),
            poll_wait: Duration::from_millis(25_000),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            upstream_timeout: Duration::from_millis(10_000),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables (defaults in parentheses):
    /// - `HOST` (`0.0.0.0`), `PORT` (`3102`)
    /// - `FCC_API_KEY` -- shared secret for ingress and proxy routes
    /// - `FLIGHTAWARE_API_KEY`, `BIRTHDAY_CALENDAR_SERVER_API_KEY`,
    ///   `REBRICKABLE_API_KEY`, `EBIRD_API_KEY`,
    ///   `THIS_OR_THAT_MACHINE_SERVER_API_KEY` -- feed credentials
    /// - `PING_TIMEOUT_MS` (`60000`) -- polling session idle expiry
    /// - `POLL_WAIT_MS` (`25000`) -- long-poll wait
    /// - `OUTBOX_CAPACITY` (`256`) -- per-session queue bound
    /// - `UPSTREAM_TIMEOUT_MS` (`10000`) -- upstream request timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: optional_var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            api_key: optional_var("FCC_API_KEY"),
            credentials: FeedCredentials {
                flightaware: optional_var("FLIGHTAWARE_API_KEY"),
                birthdays: optional_var("BIRTHDAY_CALENDAR_SERVER_API_KEY"),
                rebrickable: optional_var("REBRICKABLE_API_KEY"),
                ebird: optional_var("EBIRD_API_KEY"),
                this_or_that: optional_var("THIS_OR_THAT_MACHINE_SERVER_API_KEY"),
            },
            ping_timeout: Duration::from_millis(parse_var("PING_TIMEOUT_MS", 60_000)?),
            poll_wait: Duration::from_millis(parse_var("POLL_WAIT_MS", 25_000)?),
            outbox_capacity: parse_var("OUTBOX_CAPACITY", defaults.outbox_capacity)?,
            upstream_timeout: Duration::from_millis(parse_var("UPSTREAM_TIMEOUT_MS", 10_000)?),
        })
    }
}

/// Read a variable, treating unset and empty alike.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable, falling back to `default` when unset.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    optional_var(name).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
    })
}
