use super::render;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::locations::{find_preset, PRESET_LOCATIONS};
use crate::models::{CompositeAirQualityResult, Coordinates};
use crate::service::{survey, AirQualityService};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info};

/// Blend satellite, ground station and weather data into one air quality estimate
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single command; without one an interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Composite air quality for a latitude/longitude pair
    Query(QueryArgs),

    /// Composite air quality for a preset Kerala location
    City(CityArgs),

    /// List the preset locations
    Cities,

    /// Rank every preset location by composite AQI (synthetic data only)
    Survey(SurveyArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Latitude in decimal degrees (-90..90)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees (-180..180)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CityArgs {
    /// Preset name or a fragment of it (e.g. "kochi", "thiru")
    pub name: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Skip the live APIs and use synthetic data only
    #[arg(long)]
    pub offline: bool,

    /// Print the result as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SurveyArgs {
    /// Print the ranking as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// CLI application
pub struct App {
    service: AirQualityService,
}

impl App {
    /// Create a new CLI application
    pub fn new(config: &Config) -> Result<Self> {
        let service = AirQualityService::new(config).map_err(|e| {
            error!("Failed to build HTTP clients: {}", e);
            e
        })?;
        Ok(Self { service })
    }

    /// Run a single command
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Query(args) => {
                let coords = Coordinates::new(args.lat, args.lng)?;
                self.show_location(&coords.to_string(), coords, args.output)
                    .await?;
            },
            Commands::City(args) => {
                let preset = find_preset(&args.name)?;
                self.show_location(preset.name, preset.coordinates(), args.output)
                    .await?;
            },
            Commands::Cities => {
                println!("{}", render::presets_table(&PRESET_LOCATIONS));
            },
            Commands::Survey(args) => {
                self.show_survey(args.json)?;
            },
        }

        Ok(())
    }

    /// Fetch (or synthesize) and print the composite for one location
    pub async fn show_location(
        &self,
        label: &str,
        coords: Coordinates,
        output: OutputArgs,
    ) -> Result<()> {
        info!("Showing air quality for {} ({})", label, coords);

        let result = if output.offline {
            self.service.query_offline(coords)?
        } else {
            self.query_with_spinner(label, coords).await?
        };

        if output.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            render::print_composite(label, &result);
        }
        Ok(())
    }

    /// Rank all presets and print the result
    pub fn show_survey(&self, json: bool) -> Result<()> {
        let ranked = survey(&PRESET_LOCATIONS, Utc::now())?;

        if json {
            let rows: Vec<serde_json::Value> = ranked
                .iter()
                .map(|(preset, result)| {
                    serde_json::json!({
                        "location": preset.name,
                        "combinedAqi": result.combined_aqi,
                        "category": result.category,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!(
                "{}",
                "Composite AQI ranking (synthetic data)".cyan().bold()
            );
            println!("{}", render::survey_table(&ranked));
        }
        Ok(())
    }

    async fn query_with_spinner(
        &self,
        label: &str,
        coords: Coordinates,
    ) -> Result<CompositeAirQualityResult> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Contacting satellite, ground and weather sources for {}...", label));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.service.query(coords).await;
        spinner.finish_and_clear();

        result.map_err(|e| {
            error!("Aggregate query for {} failed: {}", coords, e);
            AppError::Cli(format!("could not assemble air quality data for {}: {}", label, e))
        })
    }
}
