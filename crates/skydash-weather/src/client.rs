//! Open-Meteo forecast client.
//!
//! One GET per fetch, retried on transient failures, parsed positionally into
//! hourly and daily tables localized to a single zone.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cache::ResponseCache;
use crate::error::FetchError;
use crate::retry::{send_with_retry, RetryConfig};
use crate::timezone::{localize_timestamp, zone_or_utc, OfflineTimezoneResolver, TimezoneResolver};
use crate::types::{Coordinate, DailyRecord, ForecastResult, HourlyRecord};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const FORECAST_PATH: &str = "/v1/forecast";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "SkyDash/0.1.0";
const BODY_SNIPPET_CHARS: usize = 512;

pub const HOURLY_VARIABLES: [&str; 9] = [
    "precipitation_probability",
    "cloud_cover",
    "relative_humidity_2m",
    "wind_speed_180m",
    "dew_point_2m",
    "wind_gusts_10m",
    "surface_pressure",
    "pressure_msl",
    "weather_code",
];

pub const DAILY_VARIABLES: [&str; 2] = ["sunrise", "sunset"];

/// Literal sent as `timezone` when the provider picks the zone
pub const AUTO_TIMEZONE: &str = "auto";

/// How the `timezone` request parameter is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneMode {
    /// Resolve locally from the coordinate
    #[default]
    Resolve,
    /// Send `timezone=auto` and trust the zone echoed in the response
    Auto,
}

/// Everything a [`ForecastClient`] needs, handed over at construction
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the API, without [`FORECAST_PATH`]
    pub base_url: String,
    pub forecast_days: u8,
    pub timeout: Duration,
    pub timezone_mode: TimezoneMode,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            timezone_mode: TimezoneMode::default(),
            retry: RetryConfig::default(),
        }
    }
}

pub struct ForecastClient {
    http: Client,
    config: ClientConfig,
    resolver: Arc<dyn TimezoneResolver>,
    cache: Option<Arc<ResponseCache>>,
}

impl std::fmt::Debug for ForecastClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastClient")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

impl ForecastClient {
    /// Build a client with the offline timezone resolver and no cache.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            config,
            resolver: Arc::new(OfflineTimezoneResolver),
            cache: None,
        })
    }

    /// Consult and fill `cache` on every fetch.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn TimezoneResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), FORECAST_PATH)
    }

    /// Timezone request parameter for `coordinate`.
    pub fn timezone_param(&self, coordinate: &Coordinate) -> String {
        match self.config.timezone_mode {
            TimezoneMode::Resolve => self.resolver.resolve(coordinate),
            TimezoneMode::Auto => AUTO_TIMEZONE.to_string(),
        }
    }

    /// Full query parameter set; also the cache key material.
    pub fn query_params(&self, coordinate: &Coordinate, timezone: &str) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", coordinate.latitude().to_string()),
            ("longitude", coordinate.longitude().to_string()),
            ("timezone", timezone.to_string()),
            ("hourly", HOURLY_VARIABLES.join(",")),
            ("daily", DAILY_VARIABLES.join(",")),
            ("forecast_days", self.config.forecast_days.to_string()),
        ]
    }

    /// Fetch and localize the forecast for `coordinate`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, coordinate: &Coordinate) -> Result<ForecastResult, FetchError> {
        let timezone = self.timezone_param(coordinate);
        let endpoint = self.endpoint();
        let params = self.query_params(coordinate, &timezone);
        let cache_key = ResponseCache::cache_key(&endpoint, &params);

        if let Some(body) = self.cached_body(&cache_key) {
            match parse_forecast(&body, &timezone) {
                Ok(result) => {
                    tracing::debug!("Serving forecast from cache");
                    return Ok(result);
                }
                Err(e) => tracing::warn!("Ignoring unusable cached response: {}", e),
            }
        }

        let body = self.download(&endpoint, &params).await?;

        let result = parse_forecast(&body, &timezone).inspect_err(|e| {
            tracing::error!(
                "{} (endpoint: {}, query: {}, body: {})",
                e,
                endpoint,
                cache_key,
                snippet(&body)
            );
        })?;

        self.store(&cache_key, &body);

        tracing::info!(
            "Fetched {} hourly and {} daily rows in {}",
            result.hourly.len(),
            result.daily.len(),
            result.timezone_name()
        );
        Ok(result)
    }

    fn cached_body(&self, key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.get(key) {
            Ok(hit) => {
                if hit.is_none() {
                    tracing::debug!("Cache miss");
                }
                hit
            }
            Err(e) => {
                tracing::warn!("Response cache read failed: {}", e);
                None
            }
        }
    }

    fn store(&self, key: &str, body: &str) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(key, body) {
                tracing::warn!("Response cache write failed: {}", e);
            }
        }
    }

    async fn download(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, FetchError> {
        let outcome = send_with_retry(&self.config.retry, || {
            self.http.get(endpoint).query(params).send()
        })
        .await;

        let exhausted = outcome.exhausted();
        let attempts = outcome.attempts;

        let response = match outcome.result {
            Ok(response) => response,
            Err(e) if exhausted => {
                return Err(FetchError::Transient {
                    attempts,
                    status: None,
                    reason: e.to_string(),
                })
            }
            Err(e) => return Err(FetchError::Network(e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            if exhausted {
                return Err(FetchError::Transient {
                    attempts,
                    status: Some(status.as_u16()),
                    reason: format!("HTTP {}", status),
                });
            }
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Forecast request rejected with {}: {}", status, snippet(&body));
            return Err(FetchError::Rejected {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(FetchError::Network)
    }
}

fn snippet(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
    if body.chars().count() > BODY_SNIPPET_CHARS {
        out.push_str("...");
    }
    out
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    timezone: Option<String>,
    hourly: RawHourly,
    daily: RawDaily,
}

#[derive(Debug, Deserialize)]
struct RawHourly {
    time: Vec<String>,
    precipitation_probability: Vec<Option<f64>>,
    cloud_cover: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    wind_speed_180m: Vec<Option<f64>>,
    dew_point_2m: Vec<Option<f64>>,
    wind_gusts_10m: Vec<Option<f64>>,
    surface_pressure: Vec<Option<f64>>,
    pressure_msl: Vec<Option<f64>>,
    weather_code: Vec<Option<i32>>,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    time: Vec<String>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

fn check_len(section: &str, field: &str, len: usize, expected: usize) -> Result<(), FetchError> {
    if len == expected {
        Ok(())
    } else {
        Err(FetchError::Parse(format!(
            "{}.{} has {} values for {} timestamps",
            section, field, len, expected
        )))
    }
}

/// Parse a forecast body. `timezone` is the request parameter: a zone name or `auto`.
pub fn parse_forecast(body: &str, timezone: &str) -> Result<ForecastResult, FetchError> {
    let raw: RawForecast =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let tz: Tz = if timezone == AUTO_TIMEZONE {
        raw.timezone.as_deref().map(zone_or_utc).unwrap_or(Tz::UTC)
    } else {
        zone_or_utc(timezone)
    };

    let hourly = localize_hourly(raw.hourly, tz)?;
    let daily = localize_daily(raw.daily, tz)?;

    if hourly.is_empty() {
        return Err(FetchError::Parse("hourly section is empty".into()));
    }
    if daily.is_empty() {
        return Err(FetchError::Parse("daily section is empty".into()));
    }

    Ok(ForecastResult {
        hourly,
        daily,
        timezone: tz,
    })
}

fn localize_hourly(raw: RawHourly, tz: Tz) -> Result<Vec<HourlyRecord>, FetchError> {
    let n = raw.time.len();
    check_len("hourly", "precipitation_probability", raw.precipitation_probability.len(), n)?;
    check_len("hourly", "cloud_cover", raw.cloud_cover.len(), n)?;
    check_len("hourly", "relative_humidity_2m", raw.relative_humidity_2m.len(), n)?;
    check_len("hourly", "wind_speed_180m", raw.wind_speed_180m.len(), n)?;
    check_len("hourly", "dew_point_2m", raw.dew_point_2m.len(), n)?;
    check_len("hourly", "wind_gusts_10m", raw.wind_gusts_10m.len(), n)?;
    check_len("hourly", "surface_pressure", raw.surface_pressure.len(), n)?;
    check_len("hourly", "pressure_msl", raw.pressure_msl.len(), n)?;
    check_len("hourly", "weather_code", raw.weather_code.len(), n)?;

    raw.time
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Ok::<_, FetchError>(HourlyRecord {
                time: localize_timestamp(t, tz).map_err(FetchError::Parse)?,
                precipitation_probability: raw.precipitation_probability[i],
                cloud_cover: raw.cloud_cover[i],
                relative_humidity: raw.relative_humidity_2m[i],
                wind_speed: raw.wind_speed_180m[i],
                dew_point: raw.dew_point_2m[i],
                wind_gusts: raw.wind_gusts_10m[i],
                surface_pressure: raw.surface_pressure[i],
                mean_sea_level_pressure: raw.pressure_msl[i],
                weather_code: raw.weather_code[i],
            })
        })
        .collect()
}

fn localize_daily(raw: RawDaily, tz: Tz) -> Result<Vec<DailyRecord>, FetchError> {
    let n = raw.time.len();
    check_len("daily", "sunrise", raw.sunrise.len(), n)?;
    check_len("daily", "sunset", raw.sunset.len(), n)?;

    raw.time
        .iter()
        .zip(&raw.sunrise)
        .zip(&raw.sunset)
        .map(|((date, sunrise), sunset)| {
            Ok::<_, FetchError>(DailyRecord {
                date: localize_timestamp(date, tz).map_err(FetchError::Parse)?,
                sunrise: localize_timestamp(sunrise, tz).map_err(FetchError::Parse)?,
                sunset: localize_timestamp(sunset, tz).map_err(FetchError::Parse)?,
            })
        })
        .collect()
}
