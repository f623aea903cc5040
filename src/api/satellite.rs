//! Provides a client for the satellite (NASA TEMPO) source.
//!
//! There is no public TEMPO feed, so the live path is a placeholder: it calls whatever
//! endpoint `NASA_API_URL` names and accepts a TEMPO-shaped JSON payload. In practice the
//! synthetic reading is what callers get, and that is the behaviour to rely on.

use super::{AirDataSource, SyntheticDataProvider};
use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, SatelliteReading, SatelliteResponse};
use crate::seeded::determine_quality;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

/// An asynchronous client for the satellite endpoint.
pub struct SatelliteClient {
    client: Client,
    source: SourceConfig,
    synthetic: SyntheticDataProvider,
}

impl SatelliteClient {
    /// Creates a client whose requests give up after `timeout`.
    pub fn new(source: SourceConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            source,
            synthetic: SyntheticDataProvider::new(),
        })
    }
}

impl AirDataSource for SatelliteClient {
    type Reading = SatelliteReading;
    const NAME: &'static str = "satellite";

    async fn fetch_live(&self, coords: Coordinates) -> Result<SatelliteReading> {
        let api_key = self
            .source
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::SourceUnavailable("NASA_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .get(&self.source.base_url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lng.to_string()),
                ("api_key", api_key.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: SatelliteResponse = response.json().await?;
        if !payload.measurements.is_physical() {
            return Err(AppError::SourceUnavailable(
                "satellite payload contains negative or non-finite values".to_string(),
            ));
        }

        let fallback_quality = determine_quality(coords, Some(coords.seed_label().as_str()))?;
        Ok(payload.into_reading(coords, Utc::now(), fallback_quality))
    }

    fn synthesize(&self, coords: Coordinates, now: DateTime<Utc>) -> Result<SatelliteReading> {
        self.synthetic.satellite(coords, now)
    }
}
