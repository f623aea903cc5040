//! Wire structures for the OpenAQ `/latest` endpoint.
//!
//! The endpoint has shipped two result shapes over time (`measurements`/`value` and
//! `parameters`/`lastValue`); both are accepted. Every field is optional and parsed
//! leniently: a missing or malformed value becomes `None` instead of failing the whole
//! response, so a partial station entry still converts into a `GroundStationReading`.

use super::{Coordinates, GroundStationReading, Measurement};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_UNIT: &str = "µg/m³";

/// Generic response metadata.
#[allow(dead_code)] // Fields might not all be used currently
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OpenAQMeta {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub found: Option<serde_json::Value>, // may be a number or a string like ">1000"
}

/// Response structure for the `/latest` endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OpenAQLatestResponse {
    #[serde(default)]
    pub meta: OpenAQMeta,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<OpenAQLatestResult>,
}

/// Geographical coordinates as reported by the API (either may be null).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OpenAQCoordinates {
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,
}

/// One station entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OpenAQLatestResult {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Option<OpenAQCoordinates>,
    #[serde(default, alias = "parameters", deserialize_with = "lenient_vec")]
    pub measurements: Vec<OpenAQParameterValue>,
}

/// A single pollutant value of a station entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OpenAQParameterValue {
    #[serde(default, deserialize_with = "lenient")]
    pub parameter: Option<String>,
    #[serde(default, alias = "lastValue", deserialize_with = "lenient")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Reads any JSON value and keeps it only if it converts into `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`] for arrays: unconvertible elements are skipped, a non-array is empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Field-level defaults used when a station entry is incomplete.
#[derive(Debug, Clone, Copy)]
pub struct StationDefaults<'a> {
    pub coordinates: Coordinates,
    pub city: &'a str,
    pub country: &'a str,
    pub now: DateTime<Utc>,
}

impl OpenAQLatestResult {
    /// Converts a station entry, substituting defaults field by field.
    ///
    /// Values without a parameter name are dropped; reported coordinates that fall outside
    /// the valid range are replaced by the query coordinates.
    pub fn into_reading(self, defaults: &StationDefaults<'_>) -> GroundStationReading {
        let coordinates = self
            .coordinates
            .and_then(|c| {
                let lat = c.latitude.unwrap_or(defaults.coordinates.lat);
                let lng = c.longitude.unwrap_or(defaults.coordinates.lng);
                Coordinates::new(lat, lng).ok()
            })
            .unwrap_or(defaults.coordinates);

        let measurements = self
            .measurements
            .into_iter()
            .filter_map(|m| {
                let parameter = m.parameter?;
                Some(Measurement {
                    parameter: parameter.to_lowercase(),
                    value: m.value.unwrap_or(0.0),
                    unit: m.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
                    last_updated: m.last_updated.unwrap_or(defaults.now),
                })
            })
            .collect();

        GroundStationReading {
            location: self.location.unwrap_or_else(|| "Unknown".to_string()),
            city: self.city.unwrap_or_else(|| defaults.city.to_string()),
            country: self.country.unwrap_or_else(|| defaults.country.to_string()),
            coordinates,
            measurements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn defaults() -> StationDefaults<'static> {
        StationDefaults {
            coordinates: Coordinates::new(9.93, 76.26).unwrap(),
            city: "Kochi",
            country: "IN",
            now: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_full_entry_with_measurements_shape() {
        let raw = json!({
            "location": "Vyttila",
            "city": "Kochi",
            "country": "IN",
            "coordinates": { "latitude": 9.96, "longitude": 76.31 },
            "measurements": [
                { "parameter": "pm25", "value": 41.5, "unit": "µg/m³", "lastUpdated": "2024-05-01T10:00:00Z" },
                { "parameter": "NO2", "value": 12.0, "unit": "ppb", "lastUpdated": "2024-05-01T10:00:00Z" }
            ]
        });
        let entry: OpenAQLatestResult = serde_json::from_value(raw).unwrap();
        let reading = entry.into_reading(&defaults());

        assert_eq!(reading.location, "Vyttila");
        assert_eq!(reading.coordinates, Coordinates::new(9.96, 76.31).unwrap());
        assert_eq!(reading.measurements.len(), 2);
        assert_eq!(reading.measurements[0].value, 41.5);
        assert_eq!(reading.measurements[1].parameter, "no2");
        assert_eq!(
            reading.measurements[1].last_updated,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parameters_shape_with_last_value() {
        let raw = json!({
            "location": "Station A",
            "parameters": [ { "parameter": "o3", "lastValue": 33.0 } ]
        });
        let entry: OpenAQLatestResult = serde_json::from_value(raw).unwrap();
        let reading = entry.into_reading(&defaults());

        assert_eq!(reading.measurements.len(), 1);
        assert_eq!(reading.measurements[0].value, 33.0);
        assert_eq!(reading.measurements[0].unit, "µg/m³");
        assert_eq!(reading.measurements[0].last_updated, defaults().now);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let entry: OpenAQLatestResult = serde_json::from_value(json!({})).unwrap();
        let reading = entry.into_reading(&defaults());

        assert_eq!(reading.location, "Unknown");
        assert_eq!(reading.city, "Kochi");
        assert_eq!(reading.country, "IN");
        assert_eq!(reading.coordinates, defaults().coordinates);
        assert!(reading.measurements.is_empty());
    }

    #[test]
    fn test_partial_coordinates_and_nameless_values() {
        let raw = json!({
            "coordinates": { "latitude": 10.0, "longitude": null },
            "measurements": [ { "value": 5.0 }, { "parameter": "pm10" } ]
        });
        let entry: OpenAQLatestResult = serde_json::from_value(raw).unwrap();
        let reading = entry.into_reading(&defaults());

        assert_eq!(reading.coordinates.lat, 10.0);
        assert_eq!(reading.coordinates.lng, 76.26);
        assert_eq!(reading.measurements.len(), 1);
        assert_eq!(reading.measurements[0].parameter, "pm10");
        assert_eq!(reading.measurements[0].value, 0.0);
    }

    #[test]
    fn test_malformed_fields_are_defaulted_individually() {
        let raw = json!({
            "location": "Odd",
            "city": 42,
            "coordinates": { "latitude": "north", "longitude": 76.3 },
            "measurements": [
                { "parameter": "pm25", "value": "n/a", "lastUpdated": "2024-06-01 08:00" },
                { "parameter": "pm10", "value": 18.0, "lastUpdated": "2024-05-01T10:00:00Z" },
                "garbage"
            ]
        });
        let entry: OpenAQLatestResult = serde_json::from_value(raw).unwrap();
        let reading = entry.into_reading(&defaults());

        assert_eq!(reading.location, "Odd");
        assert_eq!(reading.city, "Kochi");
        assert_eq!(reading.coordinates, Coordinates::new(9.93, 76.3).unwrap());
        assert_eq!(reading.measurements.len(), 2);
        assert_eq!(reading.measurements[0].value, 0.0);
        assert_eq!(reading.measurements[0].last_updated, defaults().now);
        assert_eq!(reading.measurements[1].value, 18.0);
        assert_eq!(
            reading.measurements[1].last_updated,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_response_skips_unreadable_results() {
        let response: OpenAQLatestResponse = serde_json::from_value(json!({
            "results": [ { "location": "Good" }, 7, { "location": "Also good" } ]
        }))
        .unwrap();
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_response_without_results() {
        let response: OpenAQLatestResponse =
            serde_json::from_value(json!({ "meta": { "found": ">1000" } })).unwrap();
        assert!(response.results.is_empty());
    }
}
