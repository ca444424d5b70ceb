use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use skydash_core::{AppError, Config, ConfigError, NetworkError, WeatherError};
use skydash_weather::derive::{ChartPoint, DashboardView};
use skydash_weather::locations::{self, City};
use skydash_weather::units::{format_clock, format_temperature};
use skydash_weather::{
    ClientConfig, Dashboard, ForecastClient, ResponseCache, RetryConfig, Selection,
    SelectionOutcome, TemperatureUnit,
};

/// Terminal weather dashboard backed by Open-Meteo
#[derive(Debug, Parser)]
#[command(name = "skydash", version)]
struct Cli {
    /// City to show (defaults to the configured city)
    city: Option<String>,

    /// Show temperatures in Fahrenheit
    #[arg(long, conflicts_with = "celsius")]
    fahrenheit: bool,

    /// Show temperatures in Celsius
    #[arg(long)]
    celsius: bool,

    /// List known cities by country and exit
    #[arg(long)]
    list: bool,

    /// Skip the response cache for this run
    #[arg(long)]
    no_cache: bool,

    /// Delete every cached response and exit
    #[arg(long)]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            match &e {
                AppError::Weather(WeatherError::Unavailable(detail)) => {
                    eprintln!("{}: {}", e.user_message(), detail)
                }
                _ => eprintln!("{}", e.user_message()),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load().map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;
    skydash_core::init(&config.logging)?;
    config.ensure_valid()?;

    if cli.list {
        print_city_list();
        return Ok(());
    }

    if cli.clear_cache {
        let cache = open_cache(&config)?;
        cache
            .clear()
            .map_err(|e| WeatherError::CacheError(format!("{:#}", e)))?;
        println!("Cleared {}", config.cache_path().display());
        return Ok(());
    }

    let city = match &cli.city {
        Some(name) => {
            locations::find(name).ok_or_else(|| WeatherError::UnknownCity(name.clone()))?
        }
        None => default_city(&config)?,
    };
    let unit = temperature_unit(&cli, &config);

    let mut client = ForecastClient::new(client_config(&config))
        .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

    if config.cache.enabled && !cli.no_cache {
        match open_cache(&config) {
            Ok(cache) => {
                if let Err(e) = cache.purge_expired() {
                    tracing::warn!("Failed to purge expired cache entries: {}", e);
                }
                client = client.with_cache(Arc::new(cache));
            }
            Err(e) => tracing::warn!("Response cache disabled: {}", e),
        }
    }

    tracing::info!("Fetching weather for {}", city.label());
    let dashboard = Dashboard::new(Arc::new(client));
    let selection = Selection {
        coordinate: city.coordinate,
        unit,
    };

    match dashboard.select(selection).await {
        SelectionOutcome::Ready(view) => {
            print_dashboard(city, &view);
            Ok(())
        }
        SelectionOutcome::Failed(e) => Err(WeatherError::Unavailable(e.user_message()).into()),
        SelectionOutcome::Superseded => Ok(()),
    }
}

fn default_city(config: &Config) -> Result<&'static City, AppError> {
    let configured = &config.weather.default_city;
    if let Some(city) = locations::find(configured) {
        return Ok(city);
    }
    tracing::warn!(
        "Configured default city {:?} is not in the city list, using {}",
        configured,
        locations::DEFAULT_CITY
    );
    locations::find(locations::DEFAULT_CITY)
        .ok_or_else(|| WeatherError::UnknownCity(configured.clone()).into())
}

fn open_cache(config: &Config) -> Result<ResponseCache, AppError> {
    let cache = ResponseCache::open(
        config.cache_path(),
        Duration::from_secs(config.cache.ttl_secs),
    )
    .map_err(|e| WeatherError::CacheError(format!("{:#}", e)))?;
    Ok(cache)
}

fn client_config(config: &Config) -> ClientConfig {
    ClientConfig {
        base_url: config.weather.api_base_url.clone(),
        forecast_days: config.weather.forecast_days,
        timeout: Duration::from_secs(config.http.timeout_secs),
        timezone_mode: config.weather.timezone_mode,
        retry: RetryConfig::new(
            config.http.max_attempts,
            config.http.initial_backoff_ms,
            config.http.max_backoff_ms,
        ),
    }
}

fn temperature_unit(cli: &Cli, config: &Config) -> TemperatureUnit {
    if cli.fahrenheit {
        return TemperatureUnit::Fahrenheit;
    }
    if cli.celsius {
        return TemperatureUnit::Celsius;
    }
    config.weather.temperature_unit
}

fn print_city_list() {
    for country in locations::countries() {
        println!("{}", country);
        for city in locations::cities_in(country) {
            println!("  {:<20} {}", city.name, city.coordinate.label());
        }
    }
}

fn or_dash(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{:.0}{}", v, suffix))
        .unwrap_or_else(|| "--".to_string())
}

fn temperature(value: Option<f64>, unit: TemperatureUnit) -> String {
    value
        .map(|v| format_temperature(v, unit))
        .unwrap_or_else(|| "--".to_string())
}

fn print_dashboard(city: &City, view: &DashboardView) {
    println!(
        "{}  {}  [{}]",
        city.label(),
        city.coordinate.label(),
        view.timezone.name()
    );
    println!();

    if let Some(current) = &view.current {
        println!(
            "{}  {}  {}",
            format_clock(&current.time),
            current.weather.description,
            temperature(current.temperature, view.unit)
        );
        println!(
            "  Humidity {}  Clouds {}  Precipitation {}",
            or_dash(current.humidity, "%"),
            or_dash(current.cloud_cover, "%"),
            or_dash(current.precipitation_probability, "%")
        );
        println!(
            "  Wind {} (gusts {})  Pressure {} (sea level {})",
            or_dash(current.wind_speed, " km/h"),
            or_dash(current.wind_gusts, " km/h"),
            or_dash(current.surface_pressure, " hPa"),
            or_dash(current.mean_sea_level_pressure, " hPa")
        );
    }

    if let Some(sun) = &view.sun {
        println!(
            "  Sunrise {}  Sunset {}",
            format_clock(&sun.sunrise),
            format_clock(&sun.sunset)
        );
    }

    println!();
    for day in &view.days {
        println!(
            "{:<6} {:<24} {:>6} / {:>6}",
            day.label,
            day.weather.description,
            temperature(day.high, view.unit),
            temperature(day.low, view.unit)
        );
    }

    println!();
    for (rain, temp) in view.precipitation.iter().zip(&view.temperature) {
        println!(
            "{:>8}  {:>5} {}  {:>6} {}",
            format_clock(&rain.time),
            or_dash(rain.value, "%"),
            swatch(rain),
            temperature(temp.value, view.unit),
            swatch(temp)
        );
    }
}

fn swatch(point: &ChartPoint) -> &'static str {
    point.color.unwrap_or("-------")
}
