//! Terminal presentation of composite results: comfy-table tables and colored categories.

use crate::locations::PresetLocation;
use crate::models::{
    AqiCategory, CompositeAirQualityResult, GroundStationReading, Provenance, SatelliteReading,
    WeatherReading,
};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Table};

/// Prints every section of a composite result.
pub fn print_composite(label: &str, result: &CompositeAirQualityResult) {
    println!(
        "{} {} ({})",
        "Air quality for".cyan().bold(),
        label.bold(),
        result.coordinates
    );
    println!(
        "Composite AQI: {} {}",
        result.combined_aqi.to_string().bold(),
        colorize_category(result.category)
    );
    println!("------------------------------------------");

    if let Some(satellite) = &result.satellite {
        println!(
            "{} [{}]",
            "Satellite".bold(),
            provenance_label(result.provenance.satellite)
        );
        println!("{}", satellite_table(satellite));
    }

    println!(
        "{} [{}]",
        "Ground stations".bold(),
        provenance_label(result.provenance.ground_stations)
    );
    if result.ground_stations.is_empty() {
        println!("No ground stations reported.");
    } else {
        println!("{}", ground_station_table(&result.ground_stations));
    }

    if let Some(weather) = &result.weather {
        println!(
            "{} [{}]",
            "Weather".bold(),
            provenance_label(result.provenance.weather)
        );
        println!("{}", weather_table(weather));
    }

    println!("{}", "Health recommendations".bold());
    for recommendation in &result.recommendations {
        println!("  • {}", recommendation);
    }

    let attribution = &result.attribution;
    println!();
    println!("{}", "Sources".dimmed());
    println!("  {}", attribution.satellite.dimmed());
    println!("  {}", attribution.ground_stations.dimmed());
    println!("  {}", attribution.weather.dimmed());
    println!("  {}", attribution.citation.dimmed());
    println!(
        "  {}",
        format!("Last updated: {}", attribution.last_updated.to_rfc3339()).dimmed()
    );
}

pub fn satellite_table(reading: &SatelliteReading) -> Table {
    let m = &reading.measurements;
    let mut table = new_table(&["Measurement", "Value"]);
    table
        .add_row(vec!["NO₂".to_string(), format!("{:.2} ppb", m.no2)])
        .add_row(vec!["Ozone".to_string(), format!("{:.2} ppb", m.ozone)])
        .add_row(vec![
            "Formaldehyde".to_string(),
            format!("{:.2} ppb", m.formaldehyde),
        ])
        .add_row(vec![
            "Aerosol optical depth".to_string(),
            format!("{:.2}", m.aerosol_optical_depth),
        ])
        .add_row(vec!["Quality".to_string(), reading.quality.to_string()]);
    table
}

pub fn ground_station_table(stations: &[GroundStationReading]) -> Table {
    let mut table = new_table(&["Station", "City", "Parameter", "Value", "Updated"]);
    for station in stations {
        if station.measurements.is_empty() {
            table.add_row(vec![
                station.location.clone(),
                station.city.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
        for m in &station.measurements {
            table.add_row(vec![
                station.location.clone(),
                station.city.clone(),
                m.parameter.clone(),
                format!("{:.2} {}", m.value, m.unit),
                m.last_updated.format("%Y-%m-%d %H:%M UTC").to_string(),
            ]);
        }
    }
    table
}

pub fn weather_table(weather: &WeatherReading) -> Table {
    let mut table = new_table(&["Condition", "Value"]);
    table
        .add_row(vec![
            "Temperature".to_string(),
            format!("{:.1} °C", weather.temperature),
        ])
        .add_row(vec!["Humidity".to_string(), format!("{:.0} %", weather.humidity)])
        .add_row(vec![
            "Wind".to_string(),
            format!("{:.1} km/h {}", weather.wind_speed, weather.wind_direction),
        ])
        .add_row(vec![
            "Pressure".to_string(),
            format!("{:.0} hPa", weather.pressure),
        ])
        .add_row(vec![
            "Visibility".to_string(),
            format!("{:.1} km", weather.visibility),
        ]);
    table
}

pub fn survey_table(ranked: &[(&PresetLocation, CompositeAirQualityResult)]) -> Table {
    let mut table = new_table(&["Rank", "Location", "AQI", "Category", "Advisories"]);
    for (rank, (preset, result)) in ranked.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            preset.name.to_string(),
            result.combined_aqi.to_string(),
            result.category.to_string(),
            result.recommendations.len().to_string(),
        ]);
    }
    table
}

pub fn presets_table(presets: &[PresetLocation]) -> Table {
    let mut table = new_table(&["Location", "Latitude", "Longitude"]);
    for preset in presets {
        table.add_row(vec![
            preset.name.to_string(),
            format!("{:.4}", preset.lat),
            format!("{:.4}", preset.lng),
        ]);
    }
    table
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header.to_vec());
    table
}

fn colorize_category(category: AqiCategory) -> ColoredString {
    let label = category.label();
    match category {
        AqiCategory::Good => label.green().bold(),
        AqiCategory::Moderate => label.yellow().bold(),
        AqiCategory::UnhealthyForSensitiveGroups => label.truecolor(255, 140, 0).bold(),
        AqiCategory::Unhealthy => label.red().bold(),
        AqiCategory::VeryUnhealthy => label.magenta().bold(),
    }
}

fn provenance_label(provenance: Provenance) -> ColoredString {
    match provenance {
        Provenance::Live => "live".green(),
        Provenance::Synthetic => "synthetic".yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::PRESET_LOCATIONS;
    use crate::models::{CompassPoint, Coordinates};
    use crate::service::{offline_composite, survey};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_weather_table_contents() {
        let table = weather_table(&WeatherReading {
            temperature: 31.25,
            humidity: 82.0,
            wind_speed: 4.5,
            wind_direction: CompassPoint::Ssw,
            pressure: 1006.4,
            visibility: 7.0,
        })
        .to_string();
        assert!(table.contains("4.5 km/h SSW"));
        assert!(table.contains("1006 hPa"));
        assert!(table.contains("7.0 km"));
    }

    #[test]
    fn test_ground_station_table_lists_every_measurement() {
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 9, 30, 0).unwrap();
        let result = offline_composite(Coordinates::new(9.9312, 76.2673).unwrap(), now).unwrap();
        let table = ground_station_table(&result.ground_stations).to_string();
        for station in &result.ground_stations {
            assert!(table.contains(&station.location));
        }
        assert!(table.contains("pm25"));
        assert!(table.contains("2024-10-05 09:30 UTC"));
    }

    #[test]
    fn test_survey_table_has_a_row_per_location() {
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 9, 30, 0).unwrap();
        let ranked = survey(&PRESET_LOCATIONS, now).unwrap();
        let table = survey_table(&ranked).to_string();
        for preset in PRESET_LOCATIONS.iter() {
            assert!(table.contains(preset.name), "{} missing", preset.name);
        }
    }

    #[test]
    fn test_presets_table() {
        let table = presets_table(&PRESET_LOCATIONS[..2]).to_string();
        assert!(table.contains("Thiruvananthapuram"));
        assert!(table.contains("8.8932"));
    }
}
