//! Adapters for the third-party feeds relayed by the BYT server.
//!
//! Each adapter wraps one upstream API: it builds the request (URL,
//! headers, credentials), fails fast on a non-success status, and hands
//! back the decoded JSON. None of them keep state beyond a shared
//! [`reqwest::Client`].
//!
//! | Adapter | Upstream |
//! |---------|----------|
//! | [`FlightAware`] | airport arrivals/departures |
//! | [`BirthdayCalendar`] | birthday calendar server |
//! | [`Rebrickable`] | LEGO minifigure catalogue |
//! | [`EBird`] | recent notable bird observations |
//! | [`WikipediaImageLookup`] | page thumbnails (best effort) |
//! | [`ThisOrThat`] | random vote pairs |
//! | [`LiteraryClock`] | quotes mentioning a time of day |

pub mod birthdays;
pub mod client;
pub mod ebird;
pub mod error;
pub mod flights;
pub mod literary_clock;
pub mod rebrickable;
pub mod this_or_that;
pub mod wikipedia;

pub use birthdays::BirthdayCalendar;
pub use client::{build_http_client, UpstreamEndpoints};
pub use ebird::EBird;
pub use error::UpstreamError;
pub use flights::FlightAware;
pub use literary_clock::LiteraryClock;
pub use rebrickable::Rebrickable;
pub use this_or_that::ThisOrThat;
pub use wikipedia::WikipediaImageLookup;
