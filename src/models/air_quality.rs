//! Domain value objects produced by the source adapters and the aggregator.
//!
//! Everything here is constructed fresh per query and serialized with camelCase
//! field names for `--json` output.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "coordinates must be finite numbers, got ({}, {})",
                lat, lng
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::InvalidInput(format!(
                "latitude {} is outside -90..90",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::InvalidInput(format!(
                "longitude {} is outside -180..180",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// The `"{lat}_{lng}"` label every generator derives its seeds from.
    ///
    /// Negative zero prints as `0`, so both zeros seed the same readings.
    pub fn seed_label(&self) -> String {
        format!("{}_{}", self.lat + 0.0, self.lng + 0.0)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Coarse satellite pollution classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Moderate,
    Poor,
}

impl Quality {
    /// Partitions a 0-100 pollution score: good below 30, poor from 70.
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Quality::Good
        } else if score < 70.0 {
            Quality::Moderate
        } else {
            Quality::Poor
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quality::Good => "good",
            Quality::Moderate => "moderate",
            Quality::Poor => "poor",
        };
        f.write_str(label)
    }
}

/// Column densities reported by the (simulated) TEMPO instrument. ppb, except AOD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteMeasurements {
    pub no2: f64,
    pub formaldehyde: f64,
    pub ozone: f64,
    pub aerosol_optical_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteReading {
    pub timestamp: DateTime<Utc>,
    pub location: Coordinates,
    pub measurements: SatelliteMeasurements,
    pub quality: Quality,
}

/// One pollutant value reported by a ground station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundStationReading {
    pub location: String,
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub measurements: Vec<Measurement>,
}

/// The sixteen points of the compass, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompassPoint {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::Nne,
        CompassPoint::Ne,
        CompassPoint::Ene,
        CompassPoint::E,
        CompassPoint::Ese,
        CompassPoint::Se,
        CompassPoint::Sse,
        CompassPoint::S,
        CompassPoint::Ssw,
        CompassPoint::Sw,
        CompassPoint::Wsw,
        CompassPoint::W,
        CompassPoint::Wnw,
        CompassPoint::Nw,
        CompassPoint::Nnw,
    ];

    /// Maps a bearing to its sector: `round(degrees / 22.5) mod 16`.
    ///
    /// The bearing is normalised into [0, 360) first so negative bearings wrap like positive ones.
    pub fn from_degrees(degrees: f64) -> Self {
        let sector = (degrees.rem_euclid(360.0) / 22.5).round() as usize;
        Self::ALL[sector % 16]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::Nne => "NNE",
            CompassPoint::Ne => "NE",
            CompassPoint::Ene => "ENE",
            CompassPoint::E => "E",
            CompassPoint::Ese => "ESE",
            CompassPoint::Se => "SE",
            CompassPoint::Sse => "SSE",
            CompassPoint::S => "S",
            CompassPoint::Ssw => "SSW",
            CompassPoint::Sw => "SW",
            CompassPoint::Wsw => "WSW",
            CompassPoint::W => "W",
            CompassPoint::Wnw => "WNW",
            CompassPoint::Nw => "NW",
            CompassPoint::Nnw => "NNW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// km/h.
    pub wind_speed: f64,
    pub wind_direction: CompassPoint,
    /// hPa.
    pub pressure: f64,
    /// km.
    pub visibility: f64,
}

/// Whether a reading came from its live source or from the deterministic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Synthetic,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Live => f.write_str("live"),
            Provenance::Synthetic => f.write_str("synthetic"),
        }
    }
}

/// An adapter result tagged with the path that produced it.
///
/// Falling back is an expected outcome, so it is modelled as data rather than as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Synthetic(T),
}

impl<T> Sourced<T> {
    pub fn provenance(&self) -> Provenance {
        match self {
            Sourced::Live(_) => Provenance::Live,
            Sourced::Synthetic(_) => Provenance::Synthetic,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Sourced::Live(v) | Sourced::Synthetic(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Live(v) | Sourced::Synthetic(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceProvenance {
    pub satellite: Provenance,
    pub ground_stations: Provenance,
    pub weather: Provenance,
}

impl SourceProvenance {
    pub fn all_synthetic() -> Self {
        Self {
            satellite: Provenance::Synthetic,
            ground_stations: Provenance::Synthetic,
            weather: Provenance::Synthetic,
        }
    }
}

/// Display metadata describing where the numbers came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub satellite: String,
    pub ground_stations: String,
    pub weather: String,
    pub citation: String,
    pub last_updated: DateTime<Utc>,
}

/// Five-band health category for a composite AQI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            _ => AqiCategory::VeryUnhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the presentation layer needs for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeAirQualityResult {
    pub coordinates: Coordinates,
    pub satellite: Option<SatelliteReading>,
    pub ground_stations: Vec<GroundStationReading>,
    pub weather: Option<WeatherReading>,
    pub combined_aqi: u32,
    pub category: AqiCategory,
    pub recommendations: Vec<String>,
    pub attribution: Attribution,
    pub provenance: SourceProvenance,
}
