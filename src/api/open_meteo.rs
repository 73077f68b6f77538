//! Provides a client for interacting with the Open-Meteo forecast API.
//!
//! This module defines the `OpenMeteoClient` struct and its methods for fetching
//! current conditions and an hourly temperature forecast for a fixed location.

use crate::error::{AppError, Result};
use crate::models::{ForecastResponse, WeatherReport};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

pub const BASE_URL: &str = "https://api.open-meteo.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Where to ask for the weather.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name used to align the hourly series.
    pub timezone: String,
}

/// An asynchronous client for fetching data from the Open-Meteo API.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Creates a new `OpenMeteoClient` against `base_url`, normally [`BASE_URL`]
    /// or a mock server in tests.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches current weather and the next hours of forecast for `location`.
    ///
    /// Corresponds to the `/v1/forecast` endpoint with `current_weather=true`
    /// and `hourly=temperature_2m`.
    pub async fn get_current_weather(&self, location: &WeatherLocation) -> Result<WeatherReport> {
        info!(
            "Fetching weather for lat {} lon {} ({})",
            location.latitude, location.longitude, location.timezone
        );

        let url = format!("{}/v1/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("timezone", location.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching weather: {}", e);
                AppError::Api(e.into())
            })?;

        // Check HTTP status code and handle potential API errors
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                error!(
                    "Weather request failed with status {}: {}",
                    e.status().unwrap_or_default(),
                    e
                );
                return Err(AppError::Api(std::sync::Arc::new(e)));
            },
        };

        // Read the body first so a malformed payload surfaces as a JSON error
        let body = response.text().await.map_err(|e| {
            error!("Error reading weather response body: {}", e);
            AppError::Api(e.into())
        })?;
        let forecast: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Error parsing weather response JSON: {}", e);
            AppError::from(e)
        })?;

        let report = WeatherReport::from(&forecast);
        debug!(
            "Weather: {:.1}°F {} forecast {:?}",
            report.temp_f,
            report.condition.label(),
            report.forecast_f
        );

        Ok(report)
    }
}
