//! The air quality aggregation service: three adapters in, one composite result out.

use crate::aggregate::{aggregate, attribution};
use crate::api::{AirDataSource, OpenAQClient, OpenWeatherClient, SatelliteClient, SyntheticDataProvider};
use crate::config::Config;
use crate::error::Result;
use crate::locations::PresetLocation;
use crate::models::{
    AqiCategory, CompositeAirQualityResult, Coordinates, GroundStationReading, SatelliteReading,
    SourceProvenance, WeatherReading,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

/// Owns one client per source. Holds no mutable state, so one instance serves any number of queries.
pub struct AirQualityService {
    satellite: SatelliteClient,
    ground_stations: OpenAQClient,
    weather: OpenWeatherClient,
}

impl AirQualityService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            satellite: SatelliteClient::new(config.satellite.clone(), config.request_timeout)?,
            ground_stations: OpenAQClient::new(
                config.openaq.clone(),
                config.request_timeout,
                config.radius_meters,
                config.fallback_country.clone(),
            )?,
            weather: OpenWeatherClient::new(config.openweather.clone(), config.request_timeout)?,
        })
    }

    /// Queries all three sources concurrently and blends the results.
    ///
    /// Live failures are absorbed by each adapter; an error here means synthetic
    /// generation itself failed.
    pub async fn query(&self, coords: Coordinates) -> Result<CompositeAirQualityResult> {
        info!("Querying air quality for {}", coords);

        let (satellite, ground_stations, weather) = tokio::join!(
            self.satellite.fetch(coords),
            self.ground_stations.fetch(coords),
            self.weather.fetch(coords),
        );
        let (satellite, ground_stations, weather) = (satellite?, ground_stations?, weather?);

        let provenance = SourceProvenance {
            satellite: satellite.provenance(),
            ground_stations: ground_stations.provenance(),
            weather: weather.provenance(),
        };
        debug!(
            ?provenance,
            stations = ground_stations.value().len(),
            "Sources resolved for {}",
            coords
        );

        Ok(compose(
            coords,
            Some(satellite.into_inner()),
            ground_stations.into_inner(),
            Some(weather.into_inner()),
            provenance,
            Utc::now(),
        ))
    }

    /// The composite built from synthetic data only, without touching the network.
    pub fn query_offline(&self, coords: Coordinates) -> Result<CompositeAirQualityResult> {
        offline_composite(coords, Utc::now())
    }
}

/// Synthetic-only composite for `coords`, stamped with `now`. Pure.
pub fn offline_composite(coords: Coordinates, now: DateTime<Utc>) -> Result<CompositeAirQualityResult> {
    let provider = SyntheticDataProvider::new();
    let satellite = provider.satellite(coords, now)?;
    let ground_stations = provider.ground_stations(coords, now)?;
    let weather = provider.weather(coords)?;

    Ok(compose(
        coords,
        Some(satellite),
        ground_stations,
        Some(weather),
        SourceProvenance::all_synthetic(),
        now,
    ))
}

/// Offline composites for every location, computed in parallel and ranked by descending AQI.
///
/// Ties keep the input order.
pub fn survey<'a>(
    locations: &'a [PresetLocation],
    now: DateTime<Utc>,
) -> Result<Vec<(&'a PresetLocation, CompositeAirQualityResult)>> {
    let mut ranked = locations
        .par_iter()
        .map(|location| offline_composite(location.coordinates(), now).map(|r| (location, r)))
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|a, b| b.1.combined_aqi.cmp(&a.1.combined_aqi));
    debug!("Surveyed {} locations", ranked.len());
    Ok(ranked)
}

fn compose(
    coords: Coordinates,
    satellite: Option<SatelliteReading>,
    ground_stations: Vec<GroundStationReading>,
    weather: Option<WeatherReading>,
    provenance: SourceProvenance,
    now: DateTime<Utc>,
) -> CompositeAirQualityResult {
    let assessment = aggregate(satellite.as_ref(), &ground_stations, weather.as_ref());

    CompositeAirQualityResult {
        coordinates: coords,
        satellite,
        ground_stations,
        weather,
        combined_aqi: assessment.combined_aqi,
        category: AqiCategory::from_aqi(assessment.combined_aqi),
        recommendations: assessment.recommendations,
        attribution: attribution(now),
        provenance,
    }
}
