use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Temperature unit used by the derived views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FetchError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(FetchError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(FetchError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// For compile-time registry data already known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Header label as shown on the dashboard, e.g. `40.71°N, -74.01°E`.
    pub fn label(&self) -> String {
        format!("{}°N, {}°E", self.latitude, self.longitude)
    }
}

/// One forecast hour.
///
/// Measurements are `None` where the provider sent `null` for that hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub time: DateTime<Tz>,
    pub precipitation_probability: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub relative_humidity: Option<f64>,
    /// Wind speed at 180 m
    pub wind_speed: Option<f64>,
    /// Dew point at 2 m in °C; the dashboard labels this "temperature"
    pub dew_point: Option<f64>,
    pub wind_gusts: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub mean_sea_level_pressure: Option<f64>,
    pub weather_code: Option<i32>,
}

/// One forecast day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    /// Local midnight of the day
    pub date: DateTime<Tz>,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

/// Hourly and daily tables localized to a single zone
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyRecord>,
    pub timezone: Tz,
}

impl ForecastResult {
    /// IANA name of the zone every timestamp is expressed in
    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(40.71, -74.01).is_ok());
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(FetchError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.01),
            Err(FetchError::InvalidCoordinate(_))
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_coordinate_label() {
        let c = Coordinate::new(40.71, -74.01).unwrap();
        assert_eq!(c.label(), "40.71°N, -74.01°E");
    }

    #[test]
    fn test_unit_symbol() {
        assert_eq!(TemperatureUnit::Celsius.symbol(), "°C");
        assert_eq!(TemperatureUnit::Fahrenheit.symbol(), "°F");
    }
}
