//! Provides a deterministic synthetic data provider for all three sources.
//!
//! This is the fallback used whenever a live API is unreachable, unconfigured or returns
//! nothing usable. Every value is derived from the query coordinates through
//! [`crate::seeded`], so the same location always yields the same readings. The observation
//! time is passed in by the caller, which keeps the generators pure.

use crate::error::Result;
use crate::locations::nearest_preset;
use crate::models::{
    CompassPoint, Coordinates, GroundStationReading, Measurement, SatelliteMeasurements,
    SatelliteReading, WeatherReading,
};
use crate::seeded::{determine_quality, realistic_value, SeededRng};
use chrono::{DateTime, Utc};

/// Stations further than this from every preset get an "Unknown" city.
const CITY_MATCH_RADIUS_KM: f64 = 50.0;
/// Synthetic stations are scattered within +/- half of this many degrees.
const STATION_JITTER_DEGREES: f64 = 0.01;

/// Typical range and unit of each pollutant a synthetic station reports.
const STATION_POLLUTANTS: [(&str, f64, f64, &str); 4] = [
    ("pm25", 10.0, 60.0, "µg/m³"),
    ("pm10", 20.0, 100.0, "µg/m³"),
    ("no2", 10.0, 50.0, "ppb"),
    ("o3", 20.0, 80.0, "ppb"),
];

/// Generates plausible readings for any coordinate pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticDataProvider;

impl SyntheticDataProvider {
    pub fn new() -> Self {
        Self
    }

    /// A simulated TEMPO reading.
    ///
    /// All four fields and the quality share the coordinate label, so they rise and fall together.
    pub fn satellite(&self, coords: Coordinates, now: DateTime<Utc>) -> Result<SatelliteReading> {
        let label = coords.seed_label();
        let label = Some(label.as_str());

        Ok(SatelliteReading {
            timestamp: now,
            location: coords,
            measurements: SatelliteMeasurements {
                no2: realistic_value(15.0, 50.0, coords, label)?,
                formaldehyde: realistic_value(0.5, 3.0, coords, label)?,
                ozone: realistic_value(30.0, 80.0, coords, label)?,
                aerosol_optical_depth: realistic_value(0.1, 0.5, coords, label)?,
            },
            quality: determine_quality(coords, label)?,
        })
    }

    /// Between one and three stations near `coords`; the count itself comes from the seed.
    pub fn ground_stations(
        &self,
        coords: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<Vec<GroundStationReading>> {
        let label = coords.seed_label();
        let station_count = 1 + (SeededRng::new(&label).next_unit() * 3.0).floor() as usize;

        let (city, country) = match nearest_preset(coords, CITY_MATCH_RADIUS_KM) {
            Some(preset) => (preset.name, "IN"),
            None => ("Unknown", "N/A"),
        };

        let mut stations = Vec::with_capacity(station_count);
        for i in 0..station_count {
            let station_label = format!("{}_station{}", label, i);
            let jitter = |axis: &str| {
                (SeededRng::new(&format!("{}_{}", station_label, axis)).next_unit() - 0.5)
                    * STATION_JITTER_DEGREES
            };

            let measurements = STATION_POLLUTANTS
                .iter()
                .map(|(parameter, min, max, unit)| {
                    let value_label = format!("{}_{}", station_label, parameter);
                    Ok(Measurement {
                        parameter: parameter.to_string(),
                        value: realistic_value(*min, *max, coords, Some(value_label.as_str()))?,
                        unit: unit.to_string(),
                        last_updated: now,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            stations.push(GroundStationReading {
                location: format!("Station {}", i + 1),
                city: city.to_string(),
                country: country.to_string(),
                coordinates: Coordinates {
                    lat: (coords.lat + jitter("lat")).clamp(-90.0, 90.0),
                    lng: (coords.lng + jitter("lng")).clamp(-180.0, 180.0),
                },
                measurements,
            });
        }

        Ok(stations)
    }

    /// Current conditions with the wind bearing mapped onto the compass.
    pub fn weather(&self, coords: Coordinates) -> Result<WeatherReading> {
        let label = coords.seed_label();
        let field = |name: &str| format!("{}_{}", label, name);

        let bearing = realistic_value(0.0, 360.0, coords, Some(field("winddir").as_str()))?;
        Ok(WeatherReading {
            temperature: realistic_value(24.0, 36.0, coords, Some(field("temp").as_str()))?,
            humidity: realistic_value(60.0, 95.0, coords, Some(field("humidity").as_str()))?,
            wind_speed: realistic_value(0.0, 15.0, coords, Some(field("wind").as_str()))?,
            wind_direction: CompassPoint::from_degrees(bearing),
            pressure: realistic_value(990.0, 1020.0, coords, Some(field("pressure").as_str()))?,
            visibility: realistic_value(5.0, 10.0, coords, Some(field("visibility").as_str()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::PRESET_LOCATIONS;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 5, 9, 30, 0).unwrap()
    }

    fn sample_coordinates() -> Vec<Coordinates> {
        let mut coords: Vec<Coordinates> = PRESET_LOCATIONS.iter().map(|p| p.coordinates()).collect();
        coords.push(Coordinates::new(52.3676, 4.9041).unwrap());
        coords.push(Coordinates::new(-33.8688, 151.2093).unwrap());
        coords.push(Coordinates::new(0.0, 0.0).unwrap());
        coords
    }

    /// Largest factor `realistic_value` can apply (tropical, inland).
    const MAX_FACTOR: f64 = 1.2 * 1.1;
    const MIN_FACTOR: f64 = 0.8 * 0.9;

    fn within_scaled(v: f64, min: f64, max: f64) -> bool {
        v >= (min * MIN_FACTOR - 0.01).max(0.0) && v <= max * MAX_FACTOR + 0.01
    }

    #[test]
    fn test_satellite_is_deterministic() {
        let provider = SyntheticDataProvider::new();
        for coords in sample_coordinates() {
            let a = provider.satellite(coords, fixed_now()).unwrap();
            let b = provider.satellite(coords, fixed_now()).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.location, coords);
            assert_eq!(a.timestamp, fixed_now());
        }
    }

    #[test]
    fn test_satellite_values_for_kochi() {
        let kochi = Coordinates::new(9.9312, 76.2673).unwrap();
        let reading = SyntheticDataProvider::new().satellite(kochi, fixed_now()).unwrap();
        assert_eq!(
            reading.measurements,
            SatelliteMeasurements {
                no2: 61.35,
                formaldehyde: 3.63,
                ozone: 98.95,
                aerosol_optical_depth: 0.61,
            }
        );
        assert_eq!(reading.quality, crate::models::Quality::Poor);
    }

    #[test]
    fn test_negative_zero_yields_same_readings() {
        let provider = SyntheticDataProvider::new();
        let positive = Coordinates::new(0.0, 10.0).unwrap();
        let negative = Coordinates::new(-0.0, 10.0).unwrap();
        assert_eq!(
            provider.satellite(positive, fixed_now()).unwrap().measurements,
            provider.satellite(negative, fixed_now()).unwrap().measurements
        );
        assert_eq!(provider.weather(positive).unwrap(), provider.weather(negative).unwrap());
    }

    #[test]
    fn test_satellite_ranges() {
        let provider = SyntheticDataProvider::new();
        for coords in sample_coordinates() {
            let m = provider.satellite(coords, fixed_now()).unwrap().measurements;
            assert!(within_scaled(m.no2, 15.0, 50.0), "no2 {}", m.no2);
            assert!(within_scaled(m.formaldehyde, 0.5, 3.0), "hcho {}", m.formaldehyde);
            assert!(within_scaled(m.ozone, 30.0, 80.0), "o3 {}", m.ozone);
            assert!(
                within_scaled(m.aerosol_optical_depth, 0.1, 0.5),
                "aod {}",
                m.aerosol_optical_depth
            );
        }
    }

    #[test]
    fn test_ground_stations_are_deterministic_and_well_formed() {
        let provider = SyntheticDataProvider::new();
        for coords in sample_coordinates() {
            let a = provider.ground_stations(coords, fixed_now()).unwrap();
            let b = provider.ground_stations(coords, fixed_now()).unwrap();
            assert_eq!(a, b);
            assert!((1..=3).contains(&a.len()), "{} stations", a.len());

            for (i, station) in a.iter().enumerate() {
                assert_eq!(station.location, format!("Station {}", i + 1));
                assert!((station.coordinates.lat - coords.lat).abs() <= 0.005 + 1e-9);
                assert!((station.coordinates.lng - coords.lng).abs() <= 0.005 + 1e-9);

                let params: Vec<&str> = station.measurements.iter().map(|m| m.parameter.as_str()).collect();
                assert_eq!(params, vec!["pm25", "pm10", "no2", "o3"]);
                for (m, (_, min, max, unit)) in station.measurements.iter().zip(STATION_POLLUTANTS.iter()) {
                    assert!(within_scaled(m.value, *min, *max), "{} {}", m.parameter, m.value);
                    assert_eq!(m.unit, *unit);
                }
            }
        }
    }

    #[test]
    fn test_ground_station_city_from_nearest_preset() {
        let provider = SyntheticDataProvider::new();
        let kochi = Coordinates::new(9.9312, 76.2673).unwrap();
        let stations = provider.ground_stations(kochi, fixed_now()).unwrap();
        assert!(stations.iter().all(|s| s.city == "Kochi" && s.country == "IN"));

        let amsterdam = Coordinates::new(52.3676, 4.9041).unwrap();
        let stations = provider.ground_stations(amsterdam, fixed_now()).unwrap();
        assert!(stations.iter().all(|s| s.city == "Unknown"));
    }

    #[test]
    fn test_weather_is_deterministic_and_in_range() {
        let provider = SyntheticDataProvider::new();
        for coords in sample_coordinates() {
            let w = provider.weather(coords).unwrap();
            assert_eq!(w, provider.weather(coords).unwrap());
            assert!(within_scaled(w.temperature, 24.0, 36.0));
            assert!(within_scaled(w.humidity, 60.0, 95.0));
            assert!(within_scaled(w.wind_speed, 0.0, 15.0));
            assert!(within_scaled(w.pressure, 990.0, 1020.0));
            assert!(within_scaled(w.visibility, 5.0, 10.0));
            assert!(CompassPoint::ALL.contains(&w.wind_direction));
        }
    }
}
