#[cfg(test)]
mod tests {
    use crate::api::{OpenMeteoClient, WeatherLocation};
    use crate::error::{AppError, Result};
    use crate::models::WeatherCondition;
    use mockito::Matcher;
    use serde_json::json; // For creating JSON bodies easily

    // Helper to build the location used by every test
    fn test_location() -> WeatherLocation {
        WeatherLocation {
            latitude: 29.8922,
            longitude: -81.3139,
            timezone: "America/New_York".to_string(),
        }
    }

    // Helper to match the query string the client is expected to send
    fn expected_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("latitude".into(), "29.8922".into()),
            Matcher::UrlEncoded("longitude".into(), "-81.3139".into()),
            Matcher::UrlEncoded("current_weather".into(), "true".into()),
            Matcher::UrlEncoded("hourly".into(), "temperature_2m".into()),
            Matcher::UrlEncoded("timezone".into(), "America/New_York".into()),
        ])
    }

    #[tokio::test]
    async fn test_get_current_weather_success() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "latitude": 29.89,
            "longitude": -81.31,
            "current_weather": {
                "temperature": 25.0,
                "windspeed": 11.2,
                "weathercode": 95,
                "time": "2024-06-01T12:00"
            },
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00", "2024-06-01T02:00",
                         "2024-06-01T03:00", "2024-06-01T04:00"],
                "temperature_2m": [20.0, 21.0, 22.0, 23.0, 24.0]
            }
        });
        let mock = server
            .mock("GET", "/v1/forecast")
            .match_query(expected_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(&server.url())?;
        let report = client.get_current_weather(&test_location()).await?;

        mock.assert_async().await;
        assert!((report.temp_f - 77.0).abs() < 1e-9);
        assert_eq!(report.condition, WeatherCondition::Storm);
        assert_eq!(report.forecast_f.len(), 4, "Forecast should be cut to 4 hours");
        assert!((report.forecast_f[0] - 68.0).abs() < 1e-9);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_current_weather_missing_code_is_sun() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"current_weather": {"temperature": 0.0}}).to_string())
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(&server.url())?;
        let report = client.get_current_weather(&test_location()).await?;

        assert_eq!(report.condition, WeatherCondition::Sun);
        assert_eq!(report.forecast_f, vec![32.0]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_current_weather_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"error":true,"reason":"boom"}"#)
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(&server.url()).unwrap();
        let result = client.get_current_weather(&test_location()).await;

        assert!(result.is_err());
        match result.err().unwrap() {
            AppError::Api(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(500)),
            other => panic!("Expected AppError::Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_current_weather_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"hourly": {}}"#)
            .create_async()
            .await;

        let client = OpenMeteoClient::with_base_url(&server.url()).unwrap();
        let result = client.get_current_weather(&test_location()).await;

        assert!(matches!(result, Err(AppError::JsonParse(_))));
    }
}
