mod aggregate;
mod api;
mod cli;
mod config;
mod error;
mod locations;
mod models;
mod seeded;
mod service;

use clap::Parser;
use cli::{App, Cli, Commands, OutputArgs, SurveyArgs};
use colored::*;
use config::Config;
use dialoguer::{theme::ColorfulTheme, Select};
use error::{AppError, Result};
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_logging(config.log_dir.as_deref())?;

    info!("Initializing aircast...");

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e);
        },
    };

    if let Some(command) = cli.command {
        return app.run_command(command).await;
    }

    run_interactive(&app).await
}

/// Console logs go to stderr so `--json` output stays clean. When a log
/// directory is configured, JSON lines are also written to a daily rolling file.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = Builder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix("aircast")
                .filename_suffix("log")
                .build(dir)
                .map_err(|e| AppError::Config(format!("cannot open log directory: {}", e)))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run_interactive(app: &App) -> Result<()> {
    println!("{}", "Welcome to aircast!".cyan().bold());

    let options = &[
        "Air quality for a preset location",
        "Air quality for coordinates",
        "Rank all preset locations",
        "List preset locations",
        "Exit",
    ];

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()?
            .unwrap_or(options.len() - 1);

        println!("\n---\n");

        let command_result = match selection {
            0 => match cli::prompt_preset() {
                Ok(Some(preset)) => {
                    app.show_location(preset.name, preset.coordinates(), OutputArgs::default())
                        .await
                },
                Ok(None) => continue,
                Err(e) => {
                    println!("{} {}", "Failed to get location:".red(), e);
                    continue;
                },
            },
            1 => match cli::prompt_coordinates() {
                Ok(coords) => {
                    app.show_location(&coords.to_string(), coords, OutputArgs::default())
                        .await
                },
                Err(e) => {
                    println!("{} {}", "Failed to get coordinates:".red(), e);
                    continue;
                },
            },
            2 => app.run_command(Commands::Survey(SurveyArgs::default())).await,
            3 => app.run_command(Commands::Cities).await,
            _ => {
                println!("{}", "Exiting aircast. Goodbye!".green());
                break;
            },
        };

        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    Ok(())
}
