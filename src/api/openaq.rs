//! Provides a client for ground station readings from the OpenAQ `/latest` endpoint.
//!
//! The client tries a radius search around the query point first and a country-wide
//! search second; the first endpoint that returns at least one station wins.

use super::{with_fallback, AirDataSource, SyntheticDataProvider};
use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::locations::nearest_preset;
use crate::models::{
    Coordinates, GroundStationReading, OpenAQLatestResponse, OpenAQLatestResult, Sourced,
    StationDefaults,
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default search radius around the query point.
pub const DEFAULT_RADIUS_METERS: u32 = 50_000;
/// Results requested per endpoint.
const PAGE_LIMIT: &str = "10";

/// An asynchronous client for fetching ground station data from OpenAQ.
pub struct OpenAQClient {
    client: Client,
    source: SourceConfig,
    radius_meters: u32,
    fallback_country: String,
    synthetic: SyntheticDataProvider,
}

impl OpenAQClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// `fallback_country` is the ISO code used for the country-wide search.
    pub fn new(
        source: SourceConfig,
        timeout: Duration,
        radius_meters: u32,
        fallback_country: String,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            source,
            radius_meters,
            fallback_country,
            synthetic: SyntheticDataProvider::new(),
        })
    }

    /// Stations within `radius_meters` of `coords`, live if possible, synthetic otherwise.
    pub async fn fetch_ground_stations(
        &self,
        coords: Coordinates,
        radius_meters: u32,
    ) -> Result<Sourced<Vec<GroundStationReading>>> {
        with_fallback(
            Self::NAME,
            coords,
            self.fetch_live_within(coords, radius_meters),
            || self.synthetic.ground_stations(coords, Utc::now()),
        )
        .await
    }

    async fn fetch_live_within(
        &self,
        coords: Coordinates,
        radius_meters: u32,
    ) -> Result<Vec<GroundStationReading>> {
        let api_key = self
            .source
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::SourceUnavailable("OPENAQ_KEY is not set".to_string()))?;

        let endpoints: [(&str, Vec<(&str, String)>); 2] = [
            (
                "radius search",
                vec![
                    ("coordinates", format!("{},{}", coords.lat, coords.lng)),
                    ("radius", radius_meters.to_string()),
                    ("limit", PAGE_LIMIT.to_string()),
                ],
            ),
            (
                "country search",
                vec![
                    ("country", self.fallback_country.clone()),
                    ("limit", PAGE_LIMIT.to_string()),
                ],
            ),
        ];

        for (label, query) in endpoints.iter() {
            match self.get_latest(api_key, query).await {
                Ok(results) if !results.is_empty() => {
                    debug!("OpenAQ {} returned {} stations", label, results.len());
                    return Ok(self.convert(results, coords));
                },
                Ok(_) => debug!("OpenAQ {} returned no stations", label),
                Err(e) => warn!("OpenAQ {} failed: {}", label, e),
            }
        }

        Err(AppError::SourceUnavailable(format!(
            "no OpenAQ endpoint returned stations near {}",
            coords
        )))
    }

    /// One request against `/latest`.
    async fn get_latest(
        &self,
        api_key: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<OpenAQLatestResult>> {
        let url = format!("{}/latest", self.source.base_url);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Api(e.into()))?;

        // Check HTTP status code and handle potential API errors
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let status = e.status();
                if status == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || status == Some(reqwest::StatusCode::FORBIDDEN)
                {
                    error!("Received 401/403 from OpenAQ. Check OPENAQ_KEY validity and permissions.");
                }
                return Err(AppError::Api(e.into()));
            },
        };

        let api_response: OpenAQLatestResponse = response.json().await?;
        Ok(api_response.results)
    }

    fn convert(&self, results: Vec<OpenAQLatestResult>, coords: Coordinates) -> Vec<GroundStationReading> {
        let defaults = StationDefaults {
            coordinates: coords,
            city: nearest_preset(coords, 50.0)
                .map(|p| p.name)
                .unwrap_or("Unknown"),
            country: &self.fallback_country,
            now: Utc::now(),
        };
        results
            .into_iter()
            .map(|r| r.into_reading(&defaults))
            .collect()
    }
}

impl AirDataSource for OpenAQClient {
    type Reading = Vec<GroundStationReading>;
    const NAME: &'static str = "ground stations";

    async fn fetch_live(&self, coords: Coordinates) -> Result<Vec<GroundStationReading>> {
        self.fetch_live_within(coords, self.radius_meters).await
    }

    fn synthesize(&self, coords: Coordinates, now: DateTime<Utc>) -> Result<Vec<GroundStationReading>> {
        self.synthetic.ground_stations(coords, now)
    }

    /// Searches within the configured radius.
    async fn fetch(&self, coords: Coordinates) -> Result<Sourced<Vec<GroundStationReading>>> {
        self.fetch_ground_stations(coords, self.radius_meters).await
    }
}
