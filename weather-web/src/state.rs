use std::sync::Arc;

use weather_core::{Config, TemperatureUnit, WeatherService};

use crate::page::Pages;

/// Form defaults taken from the config file.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub city: String,
    pub unit: TemperatureUnit,
    pub days: usize,
}

impl From<&Config> for Defaults {
    fn from(config: &Config) -> Self {
        Self {
            city: config.default_city.clone(),
            unit: config.default_units,
            days: config.forecast_days,
        }
    }
}

/// Shared, immutable handler state. No request-to-request data lives here.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
    pub defaults: Defaults,
    pub pages: Pages,
}

impl AppState {
    /// Fails only if the bundled templates do not compile.
    pub fn new(service: WeatherService, defaults: Defaults) -> Result<Self, tera::Error> {
        Ok(Self { service: Arc::new(service), defaults, pages: Pages::new()? })
    }
}
