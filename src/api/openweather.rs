//! Provides a client for current conditions from OpenWeatherMap.

use super::{AirDataSource, SyntheticDataProvider};
use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, OpenWeatherResponse, WeatherReading};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// An asynchronous client for the OpenWeatherMap `/weather` endpoint.
pub struct OpenWeatherClient {
    client: Client,
    source: SourceConfig,
    synthetic: SyntheticDataProvider,
}

impl OpenWeatherClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(source: SourceConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            source,
            synthetic: SyntheticDataProvider::new(),
        })
    }
}

impl AirDataSource for OpenWeatherClient {
    type Reading = WeatherReading;
    const NAME: &'static str = "weather";

    async fn fetch_live(&self, coords: Coordinates) -> Result<WeatherReading> {
        let api_key = self.source.api_key.as_deref().ok_or_else(|| {
            AppError::SourceUnavailable("OPENWEATHER_API_KEY is not set".to_string())
        })?;

        let url = format!("{}/weather", self.source.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lng.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: OpenWeatherResponse = response.json().await?;
        debug!("Received weather for {}", coords);
        Ok(payload.into())
    }

    fn synthesize(&self, coords: Coordinates, _now: DateTime<Utc>) -> Result<WeatherReading> {
        self.synthetic.weather(coords)
    }
}
