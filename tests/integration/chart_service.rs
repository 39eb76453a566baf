//! Integration tests for the chart service client against a mock HTTP server

use algoscan::services::chart_service::PRICES_ENDPOINT;
use algoscan::services::market_data::{MarketDataError, MarketDataProvider, Timeframe};
use algoscan::services::ChartServiceClient;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAN_1: i64 = 1_704_067_200_000;
const JAN_2: i64 = 1_704_153_600_000;

fn client(server: &MockServer) -> ChartServiceClient {
    ChartServiceClient::with_client(server.uri(), reqwest::Client::new())
        .with_retries(2, Duration::from_millis(1))
}

fn prices_body() -> serde_json::Value {
    json!({
        "d": [
            [JAN_2, 10.5, 11.0, 10.0, 10.8, 10.6, 2500],
            [JAN_1, 10.0, 10.4, 9.8, 10.2, 10.1, "n/a"]
        ]
    })
}

#[tokio::test]
async fn test_fetch_decodes_and_sorts_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .and(body_string_contains(r#""SampleTime":"1mm""#))
        .and(body_string_contains(r#""TimeFrame":"1d""#))
        .and(body_string_contains(r#""Key":"ENI.MTA""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(prices_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bars = client(&server)
        .get_series("ENI.MTA", Timeframe::Daily)
        .await
        .unwrap();

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(bars[0].close, 10.2);
    assert_eq!(bars[0].volume, 0.0);
    assert_eq!(bars[0].weighted_average, 10.1);
    assert_eq!(bars[1].open, 10.5);
    assert_eq!(bars[1].high, 11.0);
    assert_eq!(bars[1].low, 10.0);
    assert_eq!(bars[1].volume, 2500.0);
}

#[tokio::test]
async fn test_longer_timeframes_request_daily_samples() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .and(body_string_contains(r#""SampleTime":"1d""#))
        .and(body_string_contains(r#""TimeFrame":"6m""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "d": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let bars = client(&server)
        .get_series("ENI.MTA", Timeframe::HalfYearly)
        .await
        .unwrap();
    assert!(bars.is_empty());
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(prices_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bars = client(&server)
        .get_series("ENI.MTA", Timeframe::Daily)
        .await
        .unwrap();
    assert_eq!(bars.len(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown key"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_series("NOPE", Timeframe::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Status { status: 404, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_series("ENI.MTA", Timeframe::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRICES_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_series("ENI.MTA", Timeframe::Daily)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Decode(_)));
}
