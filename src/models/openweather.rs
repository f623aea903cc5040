//! Wire structures for the OpenWeatherMap current weather endpoint (`units=metric`).

use super::{CompassPoint, WeatherReading};
use serde::{Deserialize, Serialize};

/// Response of `/weather`. Only the fields the service reads are modelled.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OpenWeatherResponse {
    pub main: Option<OpenWeatherMain>,
    pub wind: Option<OpenWeatherWind>,
    /// Metres.
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OpenWeatherMain {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OpenWeatherWind {
    /// Metres per second.
    pub speed: Option<f64>,
    pub deg: Option<f64>,
}

impl From<OpenWeatherResponse> for WeatherReading {
    /// Fills absent fields with typical values and converts to the reading's units
    /// (wind m/s to km/h, visibility m to km).
    fn from(response: OpenWeatherResponse) -> Self {
        let main = response.main.unwrap_or_default();
        let wind = response.wind.unwrap_or_default();

        WeatherReading {
            temperature: main.temp.unwrap_or(25.0),
            humidity: main.humidity.unwrap_or(70.0),
            wind_speed: wind.speed.unwrap_or(5.0) * 3.6,
            wind_direction: CompassPoint::from_degrees(wind.deg.unwrap_or(0.0)),
            pressure: main.pressure.unwrap_or(1013.0),
            visibility: response.visibility.unwrap_or(10_000.0) / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_response_converts_units() {
        let response: OpenWeatherResponse = serde_json::from_value(json!({
            "main": { "temp": 31.2, "humidity": 78, "pressure": 1009 },
            "wind": { "speed": 2.5, "deg": 225 },
            "visibility": 6000,
            "name": "Kochi"
        }))
        .unwrap();
        let reading = WeatherReading::from(response);

        assert_eq!(reading.temperature, 31.2);
        assert_eq!(reading.humidity, 78.0);
        assert_eq!(reading.pressure, 1009.0);
        assert_eq!(reading.wind_speed, 9.0);
        assert_eq!(reading.wind_direction, CompassPoint::Sw);
        assert_eq!(reading.visibility, 6.0);
    }

    #[test]
    fn test_empty_response_uses_defaults() {
        let reading = WeatherReading::from(OpenWeatherResponse::default());

        assert_eq!(reading.temperature, 25.0);
        assert_eq!(reading.humidity, 70.0);
        assert_eq!(reading.wind_speed, 18.0);
        assert_eq!(reading.wind_direction, CompassPoint::N);
        assert_eq!(reading.pressure, 1013.0);
        assert_eq!(reading.visibility, 10.0);
    }
}
