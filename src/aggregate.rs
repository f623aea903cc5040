//! Blends the adapter outputs into one composite index and a list of health advisories.
//!
//! The index is a deliberately simple in-house heuristic, not the EPA AQI: it averages the
//! satellite NO2/ozone mean with weighted ground station pollutant values.

use crate::models::{Attribution, GroundStationReading, SatelliteReading, WeatherReading};
use chrono::{DateTime, Utc};

/// Composite index reported when there is nothing to blend.
pub const DEFAULT_AQI: u32 = 50;
/// Ceiling applied to each weighted ground station value.
const GROUND_VALUE_CAP: f64 = 200.0;

pub const ADVISORY_NO2: &str = "High NO₂ levels detected. Limit outdoor activities near busy roads.";
pub const ADVISORY_OZONE: &str =
    "Elevated ozone levels. Avoid outdoor exercise during peak hours (10 AM - 4 PM).";
pub const ADVISORY_FORMALDEHYDE: &str = "Formaldehyde detected. Consider using air purifiers indoors.";
pub const ADVISORY_STAGNANT_AIR: &str = "Low wind conditions may trap pollutants. Extra caution advised.";
pub const ADVISORY_HUMIDITY: &str = "High humidity may worsen particle pollution effects.";
pub const ADVISORY_ACCEPTABLE: &str =
    "Air quality is within acceptable ranges. Continue normal activities.";

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub combined_aqi: u32,
    pub recommendations: Vec<String>,
}

/// Combines all available inputs into an [`Assessment`].
pub fn aggregate(
    satellite: Option<&SatelliteReading>,
    ground_stations: &[GroundStationReading],
    weather: Option<&WeatherReading>,
) -> Assessment {
    Assessment {
        combined_aqi: combined_aqi(satellite, ground_stations),
        recommendations: health_recommendations(satellite, weather),
    }
}

/// Mean of the satellite term `(no2 + ozone) / 2` and every weighted ground value.
///
/// Ground values: pm25 x3, pm10 x2, no2 and o3 as-is, each capped at 200. Other parameters
/// are ignored. Returns [`DEFAULT_AQI`] when nothing contributes.
pub fn combined_aqi(
    satellite: Option<&SatelliteReading>,
    ground_stations: &[GroundStationReading],
) -> u32 {
    let mut total = 0.0;
    let mut count = 0u32;

    if let Some(satellite) = satellite {
        total += (satellite.measurements.no2 + satellite.measurements.ozone) / 2.0;
        count += 1;
    }

    for measurement in ground_stations.iter().flat_map(|s| s.measurements.iter()) {
        let weight = match measurement.parameter.as_str() {
            "pm25" => 3.0,
            "pm10" => 2.0,
            "no2" | "o3" => 1.0,
            _ => continue,
        };
        total += (measurement.value * weight).min(GROUND_VALUE_CAP);
        count += 1;
    }

    if count == 0 {
        return DEFAULT_AQI;
    }
    (total / f64::from(count)).round().max(0.0) as u32
}

/// Canned advisories, in a fixed order. Each rule is checked independently.
pub fn health_recommendations(
    satellite: Option<&SatelliteReading>,
    weather: Option<&WeatherReading>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(satellite) = satellite {
        let m = &satellite.measurements;
        if m.no2 > 30.0 {
            recommendations.push(ADVISORY_NO2.to_string());
        }
        if m.ozone > 60.0 {
            recommendations.push(ADVISORY_OZONE.to_string());
        }
        if m.formaldehyde > 2.0 {
            recommendations.push(ADVISORY_FORMALDEHYDE.to_string());
        }
    }

    if let Some(weather) = weather {
        if weather.wind_speed < 5.0 {
            recommendations.push(ADVISORY_STAGNANT_AIR.to_string());
        }
        if weather.humidity > 70.0 {
            recommendations.push(ADVISORY_HUMIDITY.to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations.push(ADVISORY_ACCEPTABLE.to_string());
    }
    recommendations
}

/// Provenance labels shown alongside every result, stamped with `now`.
pub fn attribution(now: DateTime<Utc>) -> Attribution {
    Attribution {
        satellite: "NASA TEMPO Mission - Tropospheric Emissions: Monitoring of Pollution (Simulated)"
            .to_string(),
        ground_stations: "OpenAQ - Open Air Quality Data Platform (Simulated)".to_string(),
        weather: "OpenWeatherMap API (Simulated)".to_string(),
        citation: "Data simulated for Kerala, India. Not for operational use.".to_string(),
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompassPoint, Coordinates, Measurement, Quality, SatelliteMeasurements,
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 5, 9, 30, 0).unwrap()
    }

    fn satellite(no2: f64, ozone: f64, formaldehyde: f64) -> SatelliteReading {
        SatelliteReading {
            timestamp: now(),
            location: Coordinates { lat: 9.9, lng: 76.2 },
            measurements: SatelliteMeasurements {
                no2,
                formaldehyde,
                ozone,
                aerosol_optical_depth: 0.3,
            },
            quality: Quality::Moderate,
        }
    }

    fn weather(wind_speed: f64, humidity: f64) -> WeatherReading {
        WeatherReading {
            temperature: 30.0,
            humidity,
            wind_speed,
            wind_direction: CompassPoint::Sw,
            pressure: 1010.0,
            visibility: 8.0,
        }
    }

    fn station(values: &[(&str, f64)]) -> GroundStationReading {
        GroundStationReading {
            location: "Station 1".to_string(),
            city: "Kochi".to_string(),
            country: "IN".to_string(),
            coordinates: Coordinates { lat: 9.9, lng: 76.2 },
            measurements: values
                .iter()
                .map(|(parameter, value)| Measurement {
                    parameter: parameter.to_string(),
                    value: *value,
                    unit: "µg/m³".to_string(),
                    last_updated: now(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_satellite_only() {
        assert_eq!(combined_aqi(Some(&satellite(40.0, 80.0, 1.0)), &[]), 60);
    }

    #[test]
    fn test_single_station_weights() {
        let stations = vec![station(&[("pm25", 20.0), ("pm10", 30.0), ("no2", 15.0), ("o3", 50.0)])];
        // 60 + 60 + 15 + 50 = 185 over 4
        assert_eq!(combined_aqi(None, &stations), 46);
    }

    #[test]
    fn test_empty_input_defaults_to_fifty() {
        assert_eq!(combined_aqi(None, &[]), DEFAULT_AQI);
        assert_eq!(combined_aqi(None, &[station(&[])]), DEFAULT_AQI);
    }

    #[test]
    fn test_cap_and_unknown_parameters() {
        let stations = vec![station(&[("pm25", 100.0), ("co", 900.0), ("so2", 40.0)])];
        assert_eq!(combined_aqi(None, &stations), 200);

        let stations = vec![
            station(&[("pm10", 150.0)]),
            station(&[("o3", 40.0)]),
        ];
        // 15 + min(300, 200) + 40 over 3
        assert_eq!(combined_aqi(Some(&satellite(10.0, 20.0, 0.0)), &stations), 85);
    }

    #[test]
    fn test_rounding_half_up() {
        let stations = vec![station(&[("no2", 10.0), ("o3", 11.0)])];
        assert_eq!(combined_aqi(None, &stations), 11);
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let recs = health_recommendations(
            Some(&satellite(35.0, 65.0, 2.5)),
            Some(&weather(3.0, 75.0)),
        );
        assert_eq!(
            recs,
            vec![
                ADVISORY_NO2,
                ADVISORY_OZONE,
                ADVISORY_FORMALDEHYDE,
                ADVISORY_STAGNANT_AIR,
                ADVISORY_HUMIDITY,
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let recs = health_recommendations(
            Some(&satellite(30.0, 60.0, 2.0)),
            Some(&weather(5.0, 70.0)),
        );
        assert_eq!(recs, vec![ADVISORY_ACCEPTABLE]);
    }

    #[test]
    fn test_rules_are_independent() {
        let recs = health_recommendations(Some(&satellite(10.0, 70.0, 0.5)), Some(&weather(12.0, 90.0)));
        assert_eq!(recs, vec![ADVISORY_OZONE, ADVISORY_HUMIDITY]);

        let recs = health_recommendations(None, Some(&weather(1.0, 50.0)));
        assert_eq!(recs, vec![ADVISORY_STAGNANT_AIR]);
    }

    #[test]
    fn test_no_inputs_is_acceptable() {
        let assessment = aggregate(None, &[], None);
        assert_eq!(assessment.combined_aqi, 50);
        assert_eq!(assessment.recommendations, vec![ADVISORY_ACCEPTABLE]);
    }

    #[test]
    fn test_attribution_is_static_apart_from_time() {
        let a = attribution(now());
        let b = attribution(now() + chrono::Duration::hours(1));
        assert_eq!(a.satellite, b.satellite);
        assert_eq!(a.citation, b.citation);
        assert_eq!(a.last_updated, now());
        assert!(a.satellite.contains("TEMPO"));
    }

    #[test]
    fn test_attribution_labels() {
        let a = attribution(now());
        assert_eq!(a.ground_stations, "OpenAQ - Open Air Quality Data Platform (Simulated)");
        assert_eq!(a.weather, "OpenWeatherMap API (Simulated)");
        assert_eq!(a.citation, "Data simulated for Kerala, India. Not for operational use.");
    }
}
