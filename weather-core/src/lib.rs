//! Core library for the `weather` lookup tools.
//!
//! This crate defines:
//! - Configuration & credential resolution
//! - The OpenWeatherMap HTTP client and its error classification
//! - Normalization of provider JSON into stable model types
//! - Daily aggregation of the 3-hourly forecast
//! - A provider abstraction with a live and a sample-data implementation
//! - [`WeatherService`], the single lookup path used by every shell
//!
//! It is used by `weather-cli` and `weather-web`.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod units;

pub use aggregate::daily_summaries;
pub use client::{ClientConfig, IconSize, OpenWeatherClient, icon_url};
pub use config::{Config, Credential};
pub use error::{Result, WeatherError};
pub use model::{
    AirQuality, CityQuery, Condition, CurrentConditions, DailySummary, Forecast, ForecastEntry,
    Location, Wind,
};
pub use provider::{ProviderId, WeatherProvider};
pub use service::{WeatherQuery, WeatherReport, WeatherService};
pub use units::{TemperatureUnit, Units};
