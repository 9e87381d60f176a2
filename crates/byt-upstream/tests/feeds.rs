//! Adapter tests against local mock upstreams.
//!
//! Each test starts a `wiremock` server, points one adapter at it, and
//! checks the request the adapter sends and how it interprets the reply.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use byt_sightings::{ImageLookup, ObservationSite};
use byt_upstream::{
    build_http_client, BirthdayCalendar, EBird, FlightAware, LiteraryClock, Rebrickable,
    ThisOrThat, UpstreamError, WikipediaImageLookup,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

// =========================================================================
// Pass-through feeds
// =========================================================================

#[tokio::test]
async fn flights_send_api_key_header_and_relay_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/airports/KJFK/flights/arrivals"))
        .and(header("x-apikey", "fa-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"arrivals": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = FlightAware::new(http(), server.uri(), String::from("fa-key"));
    let body = adapter.airport_flights("arrivals").await.unwrap();
    assert_eq!(body, json!({"arrivals": [1, 2]}));
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let adapter = FlightAware::new(http(), server.uri(), String::from("fa-key"));
    let err = adapter.airport_flights("departures").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    assert_eq!(
        err.to_string(),
        "FlightAware API responded with status: 503"
    );
    assert!(!err.is_shape_error());
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let adapter = BirthdayCalendar::new(http(), server.uri(), String::from("bd-key"));
    assert!(matches!(
        adapter.calendar().await,
        Err(UpstreamError::Decode { .. })
    ));
}

#[tokio::test]
async fn birthdays_pass_key_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("fccApiKey", "bd-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Ada"}])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = BirthdayCalendar::new(http(), server.uri(), String::from("bd-key"));
    assert_eq!(adapter.calendar().await.unwrap(), json!([{"name": "Ada"}]));
}

#[tokio::test]
async fn minifig_uses_key_authorization_and_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/minifigs/fig-000001/"))
        .and(header("Authorization", "key rb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"set_num": "fig-000001"})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = Rebrickable::new(http(), server.uri(), String::from("rb-key"));
    let body = adapter.minifig("fig-000001").await.unwrap();
    assert_eq!(body["set_num"], "fig-000001");
}

#[tokio::test]
async fn random_pair_passes_key_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/votes/get-random-pair-votes"))
        .and(query_param("key", "tot-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"left": 1, "right": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = ThisOrThat::new(http(), server.uri(), String::from("tot-key"));
    assert_eq!(adapter.random_pair().await.unwrap()["right"], 2);
}

// =========================================================================
// Literary clock
// =========================================================================

#[tokio::test]
async fn literary_clock_pads_time_and_trims_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/times/07_05.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "time": "07:05",
            "quote_first": "At ",
            "quote_last": " she left.",
            "quote_time_case": "five past seven",
            "title": "Novel",
            "author": "Writer",
            "sfw": "yes"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = LiteraryClock::new(http(), server.uri());
    let quote = adapter.quote_at(7, 5).await.unwrap();
    assert_eq!(quote.quote_time_case, "five past seven");
    let json = serde_json::to_value(&quote).unwrap();
    assert!(json.get("sfw").is_none());
    assert!(json.get("time").is_none());
}

#[tokio::test]
async fn literary_clock_empty_array_is_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let adapter = LiteraryClock::new(http(), server.uri());
    let err = adapter.quote_at(23, 59).await.unwrap_err();
    assert!(matches!(err, UpstreamError::UnexpectedShape(_)));
    assert!(err.is_shape_error());
}

// =========================================================================
// eBird
// =========================================================================

#[tokio::test]
async fn ebird_sends_site_query_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/obs/geo/recent/notable"))
        .and(query_param("dist", "5"))
        .and(query_param("maxResults", "100"))
        .and(header("x-ebirdapitoken", "eb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"speciesCode": "mutswa", "comName": "Mute Swan", "howMany": 2},
            "junk"
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = EBird::new(http(), server.uri(), String::from("eb-key"));
    let records = adapter
        .recent_notable(&ObservationSite::gantry_state_park())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records.first().map(|r| r.species_key()).as_deref(), Some("mutswa"));
    assert_eq!(records.get(1).map(|r| r.species_key()).as_deref(), Some("Unknown|"));
}

#[tokio::test]
async fn ebird_object_body_is_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let adapter = EBird::new(http(), server.uri(), String::from("eb-key"));
    let err = adapter
        .recent_notable(&ObservationSite::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Expected an array of observations");
}

// =========================================================================
// Wikipedia thumbnails
// =========================================================================

#[tokio::test]
async fn thumbnail_is_read_from_page_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/summary/Mute%20Swan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Mute swan",
            "thumbnail": {"source": "https://upload.example/swan.jpg", "width": 320}
        })))
        .mount(&server)
        .await;

    let lookup = WikipediaImageLookup::new(http(), server.uri());
    assert_eq!(
        lookup.thumbnail("Mute Swan").await.as_deref(),
        Some("https://upload.example/swan.jpg")
    );
}

#[tokio::test]
async fn thumbnail_failures_degrade_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/summary/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/summary/Plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Plain"})))
        .mount(&server)
        .await;

    let lookup = WikipediaImageLookup::new(http(), server.uri());
    assert_eq!(lookup.thumbnail("Missing").await, None);
    assert_eq!(lookup.thumbnail("Plain").await, None);

    let unreachable = WikipediaImageLookup::new(http(), String::from("http://127.0.0.1:9"));
    assert_eq!(unreachable.thumbnail("Anything").await, None);
}
