//! Forecast pipeline for SkyDash
//!
//! Picks a location, resolves its timezone offline, fetches hourly and daily
//! forecasts from Open-Meteo with retry and an optional response cache, and
//! derives the values the dashboard renders.

pub mod cache;
pub mod client;
pub mod codes;
pub mod derive;
pub mod error;
pub mod locations;
pub mod retry;
pub mod session;
pub mod timezone;
pub mod types;
pub mod units;

pub use cache::ResponseCache;
pub use client::{ClientConfig, ForecastClient, TimezoneMode};
pub use codes::{get_weather_info, WeatherCodeInfo};
pub use derive::{build_view, CurrentPolicy, DashboardView};
pub use error::FetchError;
pub use locations::City;
pub use retry::RetryConfig;
pub use session::{Dashboard, Selection, SelectionOutcome};
pub use timezone::{OfflineTimezoneResolver, TimezoneResolver};
pub use types::*;
pub use units::{celsius_to_fahrenheit, fahrenheit_to_celsius};
