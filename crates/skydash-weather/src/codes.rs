//! WMO weather interpretation codes.
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::Serialize;

/// Description and icon name for a WMO code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeInfo {
    pub description: &'static str,
    pub icon: &'static str,
}

impl WeatherCodeInfo {
    const fn new(description: &'static str, icon: &'static str) -> Self {
        Self { description, icon }
    }

    pub const UNKNOWN: WeatherCodeInfo = WeatherCodeInfo::new("Unknown", "question");
}

/// Look up a WMO code. Total: unmapped codes yield `("Unknown", "question")`.
pub fn get_weather_info(code: i32) -> WeatherCodeInfo {
    match code {
        0 => WeatherCodeInfo::new("Clear sky", "sun"),
        1 => WeatherCodeInfo::new("Mainly clear", "sun-cloud"),
        2 => WeatherCodeInfo::new("Partly cloudy", "sun-cloud"),
        3 => WeatherCodeInfo::new("Overcast", "cloud"),
        45 => WeatherCodeInfo::new("Foggy", "fog"),
        48 => WeatherCodeInfo::new("Depositing rime fog", "fog"),
        51 => WeatherCodeInfo::new("Light drizzle", "drizzle"),
        53 => WeatherCodeInfo::new("Moderate drizzle", "drizzle"),
        55 => WeatherCodeInfo::new("Dense drizzle", "drizzle"),
        56 => WeatherCodeInfo::new("Light freezing drizzle", "sleet"),
        57 => WeatherCodeInfo::new("Dense freezing drizzle", "sleet"),
        61 => WeatherCodeInfo::new("Slight rain", "rain"),
        63 => WeatherCodeInfo::new("Moderate rain", "rain"),
        65 => WeatherCodeInfo::new("Heavy rain", "heavy-rain"),
        66 => WeatherCodeInfo::new("Light freezing rain", "sleet"),
        67 => WeatherCodeInfo::new("Heavy freezing rain", "sleet"),
        71 => WeatherCodeInfo::new("Slight snow fall", "snow"),
        73 => WeatherCodeInfo::new("Moderate snow fall", "snow"),
        75 => WeatherCodeInfo::new("Heavy snow fall", "heavy-snow"),
        77 => WeatherCodeInfo::new("Snow grains", "snow"),
        80 => WeatherCodeInfo::new("Slight rain showers", "rain"),
        81 => WeatherCodeInfo::new("Moderate rain showers", "rain"),
        82 => WeatherCodeInfo::new("Violent rain showers", "heavy-rain"),
        85 => WeatherCodeInfo::new("Slight snow showers", "snow"),
        86 => WeatherCodeInfo::new("Heavy snow showers", "heavy-snow"),
        95 => WeatherCodeInfo::new("Thunderstorm", "thunder"),
        96 => WeatherCodeInfo::new("Thunderstorm with slight hail", "thunder-hail"),
        99 => WeatherCodeInfo::new("Thunderstorm with heavy hail", "thunder-hail"),
        _ => WeatherCodeInfo::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(get_weather_info(0), WeatherCodeInfo::new("Clear sky", "sun"));
    }

    #[test]
    fn test_wmo_code_cloud_cover() {
        assert_eq!(get_weather_info(1).icon, "sun-cloud");
        assert_eq!(get_weather_info(2).icon, "sun-cloud");
        assert_eq!(get_weather_info(3).description, "Overcast");
    }

    #[test]
    fn test_wmo_code_fog() {
        assert_eq!(get_weather_info(45).icon, "fog");
        assert_eq!(get_weather_info(48).description, "Depositing rime fog");
    }

    #[test]
    fn test_wmo_code_freezing_precipitation_is_sleet() {
        for code in [56, 57, 66, 67] {
            assert_eq!(get_weather_info(code).icon, "sleet", "code {}", code);
        }
    }

    #[test]
    fn test_wmo_code_heavy_variants() {
        assert_eq!(get_weather_info(65).icon, "heavy-rain");
        assert_eq!(get_weather_info(82).icon, "heavy-rain");
        assert_eq!(get_weather_info(75).icon, "heavy-snow");
        assert_eq!(get_weather_info(86).icon, "heavy-snow");
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(get_weather_info(95).icon, "thunder");
        assert_eq!(get_weather_info(96).icon, "thunder-hail");
        assert_eq!(get_weather_info(99).icon, "thunder-hail");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in [4, 44, 100, 999, -1, i32::MIN, i32::MAX] {
            assert_eq!(get_weather_info(code), WeatherCodeInfo::UNKNOWN, "code {}", code);
        }
        assert_eq!(WeatherCodeInfo::UNKNOWN.description, "Unknown");
        assert_eq!(WeatherCodeInfo::UNKNOWN.icon, "question");
    }
}
