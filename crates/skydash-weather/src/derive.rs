//! Presentation-ready values computed from a [`ForecastResult`].
//!
//! Everything here is pure: callers pass "now" explicitly so the same input
//! always yields the same view.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::codes::{get_weather_info, WeatherCodeInfo};
use crate::types::{DailyRecord, ForecastResult, HourlyRecord, TemperatureUnit};
use crate::units::convert_celsius;

pub const WINDOW_HOURS: usize = 12;
pub const STRIP_DAYS: usize = 7;
const HOURS_PER_DAY: usize = 24;

/// Placeholder until the daily table carries real minima.
pub const SIMULATED_LOW_OFFSET: f64 = 5.0;

/// Which hourly row counts as "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentPolicy {
    /// Row 0, whatever its timestamp
    FirstHour,
    #[default]
    ClosestHour,
}

/// Index of the row nearest to `now`; exact ties go to the earlier timestamp.
pub fn closest_hour_index(hourly: &[HourlyRecord], now: &DateTime<Tz>) -> Option<usize> {
    let now_ms = now.timestamp_millis();
    hourly
        .iter()
        .enumerate()
        .min_by_key(|(_, record)| {
            let t = record.time.timestamp_millis();
            (t.abs_diff(now_ms), t)
        })
        .map(|(i, _)| i)
}

pub fn current_index(
    hourly: &[HourlyRecord],
    now: &DateTime<Tz>,
    policy: CurrentPolicy,
) -> Option<usize> {
    match policy {
        CurrentPolicy::FirstHour => (!hourly.is_empty()).then_some(0),
        CurrentPolicy::ClosestHour => closest_hour_index(hourly, now),
    }
}

/// Up to [`WINDOW_HOURS`] rows starting at `start`.
pub fn hour_window(hourly: &[HourlyRecord], start: usize) -> &[HourlyRecord] {
    let start = start.min(hourly.len());
    let end = start.saturating_add(WINDOW_HOURS).min(hourly.len());
    &hourly[start..end]
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub time: DateTime<Tz>,
    /// Dew point at 2 m, in the active unit
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gusts: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub mean_sea_level_pressure: Option<f64>,
    pub weather: WeatherCodeInfo,
}

impl CurrentConditions {
    pub fn from_record(record: &HourlyRecord, unit: TemperatureUnit) -> Self {
        Self {
            time: record.time,
            temperature: record.dew_point.map(|c| convert_celsius(c, unit)),
            humidity: record.relative_humidity,
            cloud_cover: record.cloud_cover,
            precipitation_probability: record.precipitation_probability,
            wind_speed: record.wind_speed,
            wind_gusts: record.wind_gusts,
            surface_pressure: record.surface_pressure,
            mean_sea_level_pressure: record.mean_sea_level_pressure,
            weather: weather_for(record),
        }
    }
}

fn weather_for(record: &HourlyRecord) -> WeatherCodeInfo {
    record
        .weather_code
        .map(get_weather_info)
        .unwrap_or(WeatherCodeInfo::UNKNOWN)
}

/// One cell of the 7-day strip
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    /// "Today", then short weekday names counted from today
    pub label: String,
    /// Local date of the sampled hourly row
    pub date: NaiveDate,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub weather: WeatherCodeInfo,
}

/// Sample hourly row `i * 24` for each of the next [`STRIP_DAYS`] days.
///
/// Stops early when the table is shorter than a full week.
pub fn daily_strip(
    hourly: &[HourlyRecord],
    today: NaiveDate,
    unit: TemperatureUnit,
) -> Vec<DayForecast> {
    (0..STRIP_DAYS)
        .map_while(|day| {
            let record = hourly.get(day * HOURS_PER_DAY)?;
            let high = record.dew_point.map(|c| convert_celsius(c, unit));
            Some(DayForecast {
                label: day_label(today, day),
                date: record.time.date_naive(),
                high,
                low: high.map(|h| h - SIMULATED_LOW_OFFSET),
                weather: weather_for(record),
            })
        })
        .collect()
}

fn day_label(today: NaiveDate, offset: usize) -> String {
    if offset == 0 {
        return "Today".to_string();
    }
    today
        .checked_add_days(Days::new(offset as u64))
        .map(|d| d.format("%a").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    /// Today was missing from the daily table and the first row was used
    pub fallback: bool,
}

/// Sunrise and sunset for `today`, falling back to the first daily row.
pub fn sun_times_for(daily: &[DailyRecord], today: NaiveDate) -> Option<SunTimes> {
    if let Some(row) = daily.iter().find(|d| d.date.date_naive() == today) {
        return Some(SunTimes {
            sunrise: row.sunrise,
            sunset: row.sunset,
            fallback: false,
        });
    }

    let first = daily.first()?;
    tracing::warn!(
        "No daily row for {}, using {} for sunrise/sunset",
        today,
        first.date.date_naive()
    );
    Some(SunTimes {
        sunrise: first.sunrise,
        sunset: first.sunset,
        fallback: true,
    })
}

/// Five ordered display bands shared by both charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Band {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

const PRECIPITATION_COLORS: [&str; 5] = ["#d4e6f1", "#a9cce3", "#5dade2", "#2e86c1", "#1b4f72"];
const TEMPERATURE_COLORS: [&str; 5] = ["#2c7bb6", "#abd9e9", "#ffffbf", "#fdae61", "#d7191c"];

impl Band {
    fn index(self) -> usize {
        self as usize
    }

    pub fn precipitation_color(self) -> &'static str {
        PRECIPITATION_COLORS[self.index()]
    }

    pub fn temperature_color(self) -> &'static str {
        TEMPERATURE_COLORS[self.index()]
    }
}

/// Band a probability in percent. 20, 40, 60 and 80 open the next band up.
pub fn precipitation_band(probability: f64) -> Band {
    if probability.is_nan() || probability < 20.0 {
        Band::VeryLow
    } else if probability < 40.0 {
        Band::Low
    } else if probability < 60.0 {
        Band::Moderate
    } else if probability < 80.0 {
        Band::High
    } else {
        Band::VeryHigh
    }
}

/// Band a normalized position in `[0, 1]`.
pub fn position_band(position: f64) -> Band {
    if position.is_nan() || position < 0.2 {
        Band::VeryLow
    } else if position < 0.4 {
        Band::Low
    } else if position < 0.6 {
        Band::Moderate
    } else if position < 0.8 {
        Band::High
    } else {
        Band::VeryHigh
    }
}

/// Normalize each value against the window's own min and max.
///
/// Missing values stay missing; a flat window sits at 0.5.
pub fn temperature_positions(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present = values.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    values
        .iter()
        .map(|value| {
            let v = value.filter(|v| v.is_finite())?;
            if max == min {
                Some(0.5)
            } else {
                Some((v - min) / (max - min))
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub time: DateTime<Tz>,
    pub value: Option<f64>,
    pub band: Option<Band>,
    pub color: Option<&'static str>,
}

pub fn precipitation_series(window: &[HourlyRecord]) -> Vec<ChartPoint> {
    window
        .iter()
        .map(|record| {
            let band = record.precipitation_probability.map(precipitation_band);
            ChartPoint {
                time: record.time,
                value: record.precipitation_probability,
                band,
                color: band.map(Band::precipitation_color),
            }
        })
        .collect()
}

pub fn temperature_series(window: &[HourlyRecord], unit: TemperatureUnit) -> Vec<ChartPoint> {
    let values: Vec<Option<f64>> = window
        .iter()
        .map(|r| r.dew_point.map(|c| convert_celsius(c, unit)))
        .collect();
    let positions = temperature_positions(&values);

    window
        .iter()
        .zip(values)
        .zip(positions)
        .map(|((record, value), position)| {
            let band = position.map(position_band);
            ChartPoint {
                time: record.time,
                value,
                band,
                color: band.map(Band::temperature_color),
            }
        })
        .collect()
}

/// Everything the dashboard renders for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub timezone: Tz,
    pub unit: TemperatureUnit,
    pub current: Option<CurrentConditions>,
    pub sun: Option<SunTimes>,
    pub days: Vec<DayForecast>,
    pub precipitation: Vec<ChartPoint>,
    pub temperature: Vec<ChartPoint>,
}

pub fn build_view(
    result: &ForecastResult,
    now: DateTime<Utc>,
    unit: TemperatureUnit,
    policy: CurrentPolicy,
) -> DashboardView {
    let local_now = now.with_timezone(&result.timezone);
    let today = local_now.date_naive();

    let current_idx = current_index(&result.hourly, &local_now, policy);
    let window_start = closest_hour_index(&result.hourly, &local_now).unwrap_or(0);
    let window = hour_window(&result.hourly, window_start);

    DashboardView {
        timezone: result.timezone,
        unit,
        current: current_idx
            .and_then(|i| result.hourly.get(i))
            .map(|r| CurrentConditions::from_record(r, unit)),
        sun: sun_times_for(&result.daily, today),
        days: daily_strip(&result.hourly, today, unit),
        precipitation: precipitation_series(window),
        temperature: temperature_series(window, unit),
    }
}
