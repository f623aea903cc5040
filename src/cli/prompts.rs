//! Interactive prompts used by the menu loop.

use crate::error::Result;
use crate::locations::{PresetLocation, PRESET_LOCATIONS};
use crate::models::Coordinates;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input};

/// Lets the user pick a preset location. `None` if the prompt was cancelled.
pub fn prompt_preset() -> Result<Option<&'static PresetLocation>> {
    let names: Vec<&str> = PRESET_LOCATIONS.iter().map(|p| p.name).collect();
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Which location?")
        .items(&names)
        .default(7) // Kochi
        .interact_opt()?;
    Ok(selection.map(|i| &PRESET_LOCATIONS[i]))
}

/// Asks for a latitude and a longitude, re-prompting until each is in range.
pub fn prompt_coordinates() -> Result<Coordinates> {
    let theme = ColorfulTheme::default();
    let lat: f64 = Input::with_theme(&theme)
        .with_prompt("Latitude (-90..90)")
        .validate_with(|v: &f64| validate_range(*v, 90.0))
        .interact_text()?;
    let lng: f64 = Input::with_theme(&theme)
        .with_prompt("Longitude (-180..180)")
        .validate_with(|v: &f64| validate_range(*v, 180.0))
        .interact_text()?;
    Coordinates::new(lat, lng)
}

fn validate_range(value: f64, limit: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value.abs() <= limit {
        Ok(())
    } else {
        Err(format!("enter a number between -{} and {}", limit, limit))
    }
}
