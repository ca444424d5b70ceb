pub mod config;
pub mod error;

pub use config::{
    CacheConfig, Config, HttpConfig, LoggingConfig, TemperatureUnit, TimezoneMode,
    ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, WeatherError};

use anyhow::Result;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter when set.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("SkyDash core initialized");
    Ok(())
}
