//! Defines data structures for weather data.
//!
//! Includes structs for:
//! - Deserializing Open-Meteo `/v1/forecast` responses.
//! - The condensed `WeatherReport` shown on the dashboard and printed by the CLI.

use serde::{Deserialize, Serialize};

// --- Open-Meteo Response Structs ---

/// Response structure for the `/v1/forecast` endpoint (only the fields we request).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ForecastResponse {
    pub current_weather: CurrentWeather,
    pub hourly: Option<HourlyData>,
}

/// The `current_weather` block of a forecast response.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrentWeather {
    /// Air temperature in °C.
    pub temperature: f64,
    /// WMO weather interpretation code. Missing codes are treated as clear sky.
    #[serde(default)]
    pub weathercode: Option<u16>,
    pub windspeed: Option<f64>,
    pub time: Option<String>,
}

/// The `hourly` block of a forecast response.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HourlyData {
    #[serde(default)]
    pub time: Vec<String>,
    /// Hourly temperatures in °C, aligned with `time`. `None` when the key is absent.
    #[serde(default)]
    pub temperature_2m: Option<Vec<f64>>,
}

// --- Domain Structs ---

/// Coarse weather condition, one per dashboard icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[default]
    Sun,
    Rain,
    Snow,
    Storm,
    Cloud,
}

impl WeatherCondition {
    /// Maps a WMO weather code to a condition.
    pub fn from_wmo_code(code: u16) -> Self {
        match code {
            61 | 63 | 65 | 80 | 81 => WeatherCondition::Rain,
            71 | 73 | 75 | 77 | 85 | 86 => WeatherCondition::Snow,
            0..=3 => WeatherCondition::Sun,
            95 | 96 | 99 => WeatherCondition::Storm,
            _ => WeatherCondition::Cloud,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Sun => "sun",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Storm => "storm",
            WeatherCondition::Cloud => "cloud",
        }
    }
}

/// Number of hourly temperatures kept for the forecast strip.
pub const FORECAST_HOURS: usize = 4;

/// Current conditions in Fahrenheit plus a short hourly forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct WeatherReport {
    pub temp_f: f64,
    pub condition: WeatherCondition,
    /// Up to `FORECAST_HOURS` hourly temperatures in °F.
    pub forecast_f: Vec<f64>,
}

/// Converts Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

impl From<&ForecastResponse> for WeatherReport {
    fn from(resp: &ForecastResponse) -> Self {
        let current_c = resp.current_weather.temperature;
        let code = resp.current_weather.weathercode.unwrap_or(0);

        // Fall back to the current reading only when the series is missing; an empty
        // series stays empty
        let hourly: Vec<f64> = resp
            .hourly
            .as_ref()
            .and_then(|h| h.temperature_2m.clone())
            .unwrap_or_else(|| vec![current_c]);

        Self {
            temp_f: celsius_to_fahrenheit(current_c),
            condition: WeatherCondition::from_wmo_code(code),
            forecast_f: hourly
                .into_iter()
                .take(FORECAST_HOURS)
                .map(celsius_to_fahrenheit)
                .collect(),
        }
    }
}
