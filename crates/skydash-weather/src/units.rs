//! Temperature conversion and display formatting.
//!
//! Conversions never round; rounding to whole degrees happens only in
//! [`format_temperature`].

use chrono::{DateTime, TimeZone};

use crate::types::TemperatureUnit;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Express a Celsius reading in the requested unit.
pub fn convert_celsius(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
    }
}

/// `21.6` in Celsius renders as `22°C`.
pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    // + 0.0 folds -0 into 0
    format!("{:.0}{}", value.round() + 0.0, unit.symbol())
}

/// 12-hour clock without a leading zero, e.g. `7:20 AM`.
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}
