//! Shared application state.
//!
//! [`AppState`] is built once at startup and shared by every handler
//! behind an `Arc`. It owns the broadcast hub, the ingress gateway, the
//! polling session table, and one adapter per configured feed.

use std::time::{Duration, Instant};

use byt_hub::{BroadcastHub, ConnectionRegistry, IngressGateway};
use byt_sightings::ObservationSite;
use byt_upstream::{
    build_http_client, BirthdayCalendar, EBird, FlightAware, LiteraryClock, Rebrickable,
    ThisOrThat, UpstreamEndpoints, UpstreamError, WikipediaImageLookup,
};

use crate::config::{FeedCredentials, ServerConfig};
use crate::polling::PollingSessions;

/// Upstream adapters. A feed whose credential is not configured is
/// `None`, and its endpoint answers `Server not configured`.
#[derive(Debug, Clone)]
pub struct Feeds {
    /// `FlightAware` airport boards.
    pub flights: Option<FlightAware>,
    /// Birthday calendar.
    pub birthdays: Option<BirthdayCalendar>,
    /// Rebrickable minifigures.
    pub rebrickable: Option<Rebrickable>,
    /// eBird notable observations.
    pub ebird: Option<EBird>,
    /// This or That random pairs.
    pub this_or_that: Option<ThisOrThat>,
    /// Wikipedia thumbnails (no credential).
    pub wikipedia: WikipediaImageLookup,
    /// Literary clock quotes (no credential).
    pub literary_clock: LiteraryClock,
}

impl Feeds {
    /// Build every adapter that has what it needs.
    pub fn new(
        http: &reqwest::Client,
        endpoints: UpstreamEndpoints,
        credentials: FeedCredentials,
    ) -> Self {
        let UpstreamEndpoints {
            flightaware,
            birthdays,
            rebrickable,
            ebird,
            wikipedia,
            this_or_that,
            literary_clock,
        } = endpoints;

        Self {
            flights: credentials
                .flightaware
                .map(|key| FlightAware::new(http.clone(), flightaware, key)),
            birthdays: credentials
                .birthdays
                .map(|key| BirthdayCalendar::new(http.clone(), birthdays, key)),
            rebrickable: credentials
                .rebrickable
                .map(|key| Rebrickable::new(http.clone(), rebrickable, key)),
            ebird: credentials
                .ebird
                .map(|key| EBird::new(http.clone(), ebird, key)),
            this_or_that: credentials
                .this_or_that
                .map(|key| ThisOrThat::new(http.clone(), this_or_that, key)),
            wikipedia: WikipediaImageLookup::new(http.clone(), wikipedia),
            literary_clock: LiteraryClock::new(http.clone(), literary_clock),
        }
    }
}

/// Top-level shared state for the server.
#[derive(Debug)]
pub struct AppState {
    /// Session fan-out.
    pub hub: BroadcastHub,
    /// Authorizes `POST /notify` and forwards to the hub.
    pub gateway: IngressGateway,
    /// Outboxes of polling-transport sessions.
    pub polling: PollingSessions,
    /// Upstream adapters.
    pub feeds: Feeds,
    /// Site whose bird sightings are aggregated.
    pub site: ObservationSite,
    /// Longest a `GET /poll/{id}` waits for the first frame.
    pub poll_wait: Duration,
    /// Idle time after which a polling session is expired.
    pub ping_timeout: Duration,
    api_key: Option<String>,
    started_at: Instant,
}

impl AppState {
    /// Build state against the public upstreams.
    pub fn new(config: &ServerConfig) -> Result<Self, UpstreamError> {
        Self::with_endpoints(config, UpstreamEndpoints::default())
    }

    /// Build state against the given upstream base URLs.
    pub fn with_endpoints(
        config: &ServerConfig,
        endpoints: UpstreamEndpoints,
    ) -> Result<Self, UpstreamError> {
        let http = build_http_client(config.upstream_timeout)?;
        let hub = BroadcastHub::new(ConnectionRegistry::new(), config.outbox_capacity);
        let gateway = IngressGateway::new(hub.clone(), config.api_key.clone());

        Ok(Self {
            hub,
            gateway,
            polling: PollingSessions::new(),
            feeds: Feeds::new(&http, endpoints, config.credentials.clone()),
            site: ObservationSite::gantry_state_park(),
            poll_wait: config.poll_wait,
            ping_timeout: config.ping_timeout,
            api_key: config.api_key.clone(),
            started_at: Instant::now(),
        })
    }

    /// The shared secret guarding `/notify` and `/api/*`.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Registered sessions across both transports.
    pub fn connections(&self) -> usize {
        self.hub.registry().count()
    }

    /// Seconds since the state was built.
    pub fn uptime(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
