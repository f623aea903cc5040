//! Preset locations offered by the CLI: the district headquarters of Kerala.

use crate::error::{AppError, Result};
use crate::models::Coordinates;

/// A named location with fixed coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl PresetLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

pub const PRESET_LOCATIONS: [PresetLocation; 15] = [
    PresetLocation { name: "Thiruvananthapuram", lat: 8.5241, lng: 76.9366 },
    PresetLocation { name: "Kollam", lat: 8.8932, lng: 76.6141 },
    PresetLocation { name: "Pathanamthitta", lat: 9.2646, lng: 76.7874 },
    PresetLocation { name: "Alappuzha", lat: 9.4981, lng: 76.3388 },
    PresetLocation { name: "Kottayam", lat: 9.5916, lng: 76.5222 },
    PresetLocation { name: "Idukki", lat: 9.849, lng: 77.0995 },
    PresetLocation { name: "Ernakulam", lat: 9.9816, lng: 76.2999 },
    PresetLocation { name: "Kochi", lat: 9.9312, lng: 76.2673 },
    PresetLocation { name: "Thrissur", lat: 10.5276, lng: 76.2144 },
    PresetLocation { name: "Palakkad", lat: 10.7867, lng: 76.6548 },
    PresetLocation { name: "Malappuram", lat: 11.0734, lng: 76.0884 },
    PresetLocation { name: "Kozhikode", lat: 11.2588, lng: 75.7804 },
    PresetLocation { name: "Wayanad", lat: 11.6854, lng: 76.1311 },
    PresetLocation { name: "Kannur", lat: 11.8745, lng: 75.3704 },
    PresetLocation { name: "Kasaragod", lat: 12.499, lng: 74.9901 },
];

/// Finds a preset by name. An exact (case-insensitive) match wins over a fragment match.
pub fn find_preset(query: &str) -> Result<&'static PresetLocation> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::InvalidInput("location name is empty".to_string()));
    }

    PRESET_LOCATIONS
        .iter()
        .find(|p| p.name.to_lowercase() == needle)
        .or_else(|| {
            PRESET_LOCATIONS
                .iter()
                .find(|p| p.name.to_lowercase().contains(&needle))
        })
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "unknown location '{}'. Run `aircast cities` for the list",
                query.trim()
            ))
        })
}

/// The closest preset within `max_km` of `coords`, if any.
pub fn nearest_preset(coords: Coordinates, max_km: f64) -> Option<&'static PresetLocation> {
    PRESET_LOCATIONS
        .iter()
        .map(|p| (p, coords.distance_km(&p.coordinates())))
        .filter(|(_, d)| *d <= max_km)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}
