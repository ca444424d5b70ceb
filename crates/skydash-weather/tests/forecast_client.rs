//! Integration tests for ForecastClient using wiremock.
//!
//! These tests verify request shape, retry behaviour, parsing and caching
//! against a mock Open-Meteo server.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use chrono_tz::Tz;
use skydash_weather::timezone::FixedTimezone;
use skydash_weather::{
    ClientConfig, Coordinate, FetchError, ForecastClient, ResponseCache, RetryConfig,
    TimezoneMode,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Forecast body with `days` days of hourly rows in naive local time
fn forecast_body(days: usize) -> serde_json::Value {
    let hours = days * 24;
    let times: Vec<String> = (0..hours)
        .map(|h| format!("2024-01-{:02}T{:02}:00", 1 + h / 24, h % 24))
        .collect();
    let series = |v: f64| vec![serde_json::json!(v); hours];
    serde_json::json!({
        "latitude": 40.71,
        "longitude": -74.01,
        "timezone": "America/New_York",
        "hourly": {
            "time": times,
            "precipitation_probability": series(35.0),
            "cloud_cover": series(75.0),
            "relative_humidity_2m": series(64.0),
            "wind_speed_180m": series(22.1),
            "dew_point_2m": series(-2.4),
            "wind_gusts_10m": series(31.0),
            "surface_pressure": series(1011.2),
            "pressure_msl": series(1016.8),
            "weather_code": vec![serde_json::json!(61); hours],
        },
        "daily": {
            "time": (0..days).map(|d| format!("2024-01-{:02}", d + 1)).collect::<Vec<_>>(),
            "sunrise": (0..days)
                .map(|d| format!("2024-01-{:02}T07:20:00-05:00", d + 1))
                .collect::<Vec<_>>(),
            "sunset": (0..days)
                .map(|d| format!("2024-01-{:02}T16:39:00-05:00", d + 1))
                .collect::<Vec<_>>(),
        }
    })
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig::new(max_attempts, 1, 5)
}

fn client_for(server: &MockServer, max_attempts: u32) -> ForecastClient {
    let config = ClientConfig {
        base_url: server.uri(),
        retry: fast_retry(max_attempts),
        ..ClientConfig::default()
    };
    ForecastClient::new(config)
        .unwrap()
        .with_resolver(Arc::new(FixedTimezone(Tz::America__New_York)))
}

fn new_york() -> Coordinate {
    Coordinate::new(40.71, -74.01).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "America/New_York"))
        .and(query_param("forecast_days", "7"))
        .and(query_param("daily", "sunrise,sunset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let result = client.fetch(&new_york()).await.unwrap();

    assert_eq!(result.timezone_name(), "America/New_York");
    assert_eq!(result.hourly.len(), 168);
    assert_eq!(result.daily.len(), 7);
    assert_eq!(result.hourly[0].weather_code, Some(61));
    assert_eq!(result.hourly[0].dew_point, Some(-2.4));
    assert_eq!(result.hourly[0].mean_sea_level_pressure, Some(1016.8));
}

#[tokio::test]
async fn test_new_york_sunrise_is_local() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let result = client.fetch(&new_york()).await.unwrap();

    let sunrise = result.daily[0].sunrise;
    assert_eq!(sunrise.hour(), 7);
    assert_eq!(sunrise.minute(), 20);
    assert_eq!(sunrise.timezone(), Tz::America__New_York);
    assert_eq!(result.hourly[9].time.hour(), 9);
}

#[tokio::test]
async fn test_resolver_feeds_timezone_parameter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "America/New_York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        base_url: mock_server.uri(),
        retry: fast_retry(1),
        ..ClientConfig::default()
    };
    // Default resolver is the offline one
    let client = ForecastClient::new(config).unwrap();
    let result = client.fetch(&new_york()).await.unwrap();
    assert_eq!(result.timezone, Tz::America__New_York);
}

#[tokio::test]
async fn test_auto_timezone_mode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        base_url: mock_server.uri(),
        timezone_mode: TimezoneMode::Auto,
        retry: fast_retry(1),
        ..ClientConfig::default()
    };
    let client = ForecastClient::new(config).unwrap();
    let result = client.fetch(&new_york()).await.unwrap();
    assert_eq!(result.timezone_name(), "America/New_York");
}

#[tokio::test]
async fn test_retryable_status_uses_every_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let err = client.fetch(&new_york()).await.unwrap_err();

    match err {
        FetchError::Transient {
            attempts, status, ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(status, Some(503));
        }
        other => panic!("expected transient error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_recovers_after_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 5);
    let result = client.fetch(&new_york()).await.unwrap();
    assert_eq!(result.daily.len(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 5);
    let err = client.fetch(&new_york()).await.unwrap_err();

    assert!(matches!(err, FetchError::Rejected { status: 404 }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_bad_request_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Cannot initialize WeatherVariable from invalid String value"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 5);
    let err = client.fetch(&new_york()).await.unwrap_err();
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_missing_daily_is_parse_error() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body(1);
    body.as_object_mut().unwrap().remove("daily");

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let err = client.fetch(&new_york()).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let err = client.fetch(&new_york()).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_truncated_body_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promise 1000 bytes, send a few, then hang up
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\n{\"hourly\":",
            )
            .await;
    });

    let config = ClientConfig {
        base_url: format!("http://{}", addr),
        retry: fast_retry(1),
        ..ClientConfig::default()
    };
    let client = ForecastClient::new(config)
        .unwrap()
        .with_resolver(Arc::new(FixedTimezone(Tz::UTC)));

    let err = client.fetch(&new_york()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    assert!(err.user_message().contains("Network"));
}

#[tokio::test]
async fn test_connection_failure_is_transient() {
    let config = ClientConfig {
        // Nothing listens on the discard port
        base_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
        retry: fast_retry(2),
        ..ClientConfig::default()
    };
    let client = ForecastClient::new(config)
        .unwrap()
        .with_resolver(Arc::new(FixedTimezone(Tz::UTC)));

    let err = client.fetch(&new_york()).await.unwrap_err();
    match err {
        FetchError::Transient {
            attempts, status, ..
        } => {
            assert_eq!(attempts, 2);
            assert_eq!(status, None);
        }
        other => panic!("expected transient error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = Arc::new(ResponseCache::in_memory(Duration::from_secs(3600)).unwrap());
    let client = client_for(&mock_server, 3).with_cache(cache.clone());

    let first = client.fetch(&new_york()).await.unwrap();
    let second = client.fetch(&new_york()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len().unwrap(), 1);
}

#[tokio::test]
async fn test_cache_is_keyed_by_timezone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(1)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let cache = Arc::new(ResponseCache::in_memory(Duration::from_secs(3600)).unwrap());
    let ny = client_for(&mock_server, 1).with_cache(cache.clone());
    let utc = client_for(&mock_server, 1)
        .with_resolver(Arc::new(FixedTimezone(Tz::UTC)))
        .with_cache(cache.clone());

    let a = ny.fetch(&new_york()).await.unwrap();
    let b = utc.fetch(&new_york()).await.unwrap();

    assert_eq!(a.timezone, Tz::America__New_York);
    assert_eq!(b.timezone, Tz::UTC);
    assert_eq!(cache.len().unwrap(), 2);
}

#[tokio::test]
async fn test_failed_responses_are_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let cache = Arc::new(ResponseCache::in_memory(Duration::from_secs(3600)).unwrap());
    let client = client_for(&mock_server, 1).with_cache(cache.clone());

    assert!(client.fetch(&new_york()).await.is_err());
    assert!(cache.is_empty().unwrap());
}

#[tokio::test]
async fn test_file_cache_shared_between_clients() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("http_cache.sqlite");

    {
        let cache = Arc::new(ResponseCache::open(&cache_path, Duration::from_secs(3600)).unwrap());
        let client = client_for(&mock_server, 1).with_cache(cache);
        client.fetch(&new_york()).await.unwrap();
    }

    let cache = Arc::new(ResponseCache::open(&cache_path, Duration::from_secs(3600)).unwrap());
    let client = client_for(&mock_server, 1).with_cache(cache);
    let result = client.fetch(&new_york()).await.unwrap();
    assert_eq!(result.hourly.len(), 168);
}
