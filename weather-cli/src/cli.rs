use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode, Select};
use weather_core::{Config, TemperatureUnit, WeatherQuery, WeatherService, config::API_KEY_ENV};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup for any city")]
pub struct Cli {
    /// OpenWeatherMap API key; overrides $OPENWEATHER_API_KEY and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API key and display defaults in the config file.
    Configure,

    /// Show current weather and the daily forecast for a city.
    Show {
        /// City name, e.g. "London" or "New York".
        city: String,

        /// Optional 2-letter country code, e.g. GB or US.
        #[arg(long, short)]
        country: Option<String>,

        /// celsius, fahrenheit or kelvin (defaults to the configured unit).
        #[arg(long, short)]
        units: Option<TemperatureUnit>,

        /// Number of forecast days to summarize.
        #[arg(long)]
        days: Option<usize>,

        /// Only show current conditions.
        #[arg(long)]
        no_forecast: bool,

        /// Add temperature, humidity and wind charts.
        #[arg(long)]
        chart: bool,
    },

    /// Show only the daily forecast for a city.
    Forecast {
        city: String,

        #[arg(long, short)]
        country: Option<String>,

        #[arg(long, short)]
        units: Option<TemperatureUnit>,

        /// Number of days to summarize.
        #[arg(long)]
        days: Option<usize>,

        /// Add temperature, humidity and wind charts.
        #[arg(long)]
        chart: bool,
    },

    /// Look up coordinates for a city name.
    Geocode {
        city: String,

        #[arg(long, short)]
        country: Option<String>,

        #[arg(long, default_value_t = 5)]
        limit: u8,
    },

    /// Show the air quality index for a city.
    Air {
        city: String,

        #[arg(long, short)]
        country: Option<String>,
    },

    /// Interactive session: search, switch units and toggle views.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { api_key, command } = self;
        let config = Config::load()?;
        let service = |config: &Config| WeatherService::from_config(config, api_key.as_deref());

        match command {
            Command::Configure => configure(config)?,
            Command::Show { city, country, units, days, no_forecast, chart } => {
                let query = WeatherQuery {
                    city,
                    country,
                    unit: units.unwrap_or(config.default_units),
                    include_forecast: !no_forecast,
                    days: days.unwrap_or(config.forecast_days),
                };
                let report = service(&config)?.lookup(&query).await?;
                print!("{}", render::report(&report, chart));
            }
            Command::Forecast { city, country, units, days, chart } => {
                let query = WeatherQuery {
                    city,
                    country,
                    unit: units.unwrap_or(config.default_units),
                    include_forecast: true,
                    days: days.unwrap_or(config.forecast_days),
                };
                let report = service(&config)?.lookup(&query).await?;
                print!("{}", render::forecast(&report, chart));
            }
            Command::Geocode { city, country, limit } => {
                let locations = service(&config)?.geocode(&city, country.as_deref(), limit).await?;
                print!("{}", render::locations(&locations));
            }
            Command::Air { city, country } => {
                let (location, air) = service(&config)?.air_quality(&city, country.as_deref()).await?;
                print!("{}", render::air_quality(&location, &air));
            }
            Command::Interactive => {
                let service = Arc::new(service(&config)?);
                let screen = interactive::Screen::new(
                    config.default_city.clone(),
                    config.default_units,
                    config.forecast_days,
                );
                let runtime = tokio::runtime::Handle::current();
                tokio::task::spawn_blocking(move || interactive::run(service, runtime, screen))
                    .await
                    .context("interactive session panicked")??;
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    println!("Get a free key at https://openweathermap.org/api");
    println!("Leave the key empty to keep the current one (or use ${API_KEY_ENV}).");

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    let units = TemperatureUnit::all().to_vec();
    let start = units.iter().position(|u| *u == config.default_units).unwrap_or(0);
    config.default_units = Select::new("Default temperature units:", units)
        .with_starting_cursor(start)
        .prompt()?;

    config.forecast_days = CustomType::<usize>::new("Forecast days (1-5):")
        .with_default(config.forecast_days)
        .with_error_message("Please type a whole number")
        .prompt()?
        .clamp(1, 5);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
