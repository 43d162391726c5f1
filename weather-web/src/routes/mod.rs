pub mod api;
pub mod dashboard;
pub mod health;

use serde::Deserialize;
use weather_core::{TemperatureUnit, WeatherError, WeatherQuery};

use crate::state::Defaults;

/// Query string shared by the dashboard and the JSON endpoint.
///
/// HTML checkboxes are sent as `on` when ticked and left out when not, so a
/// missing `forecast` / `charts` only means "on" when the form was never
/// submitted (`submitted` absent).
///
/// Every field is taken as text and parsed here, so malformed values become
/// [`WeatherError::Validation`] instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub units: Option<String>,
    pub forecast: Option<String>,
    pub charts: Option<String>,
    pub days: Option<String>,
    pub submitted: Option<String>,
}

fn flag(value: Option<&str>, submitted: bool) -> Result<bool, WeatherError> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(!submitted),
        Some(v) => match v.as_str() {
            "on" | "true" | "1" | "yes" => Ok(true),
            "off" | "false" | "0" | "no" => Ok(false),
            _ => Err(WeatherError::validation(format!("'{v}' is not a valid on/off value"))),
        },
    }
}

impl WeatherParams {
    pub fn submitted(&self) -> bool {
        self.submitted.is_some()
    }

    pub fn show_forecast(&self) -> Result<bool, WeatherError> {
        flag(self.forecast.as_deref(), self.submitted())
    }

    pub fn show_charts(&self) -> Result<bool, WeatherError> {
        flag(self.charts.as_deref(), self.submitted())
    }

    pub fn unit(&self, defaults: &Defaults) -> Result<TemperatureUnit, WeatherError> {
        match self.units.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => u.parse(),
            None => Ok(defaults.unit),
        }
    }

    /// Blank means the configured default.
    pub fn days(&self, defaults: &Defaults) -> Result<usize, WeatherError> {
        match self.days.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Ok(defaults.days),
            Some(d) => d
                .parse()
                .map_err(|_| WeatherError::validation(format!("'{d}' is not a valid number of days"))),
        }
    }

    /// City typed into the form, falling back to the default on first load.
    pub fn city<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        match &self.city {
            Some(city) => city,
            None => &defaults.city,
        }
    }

    pub fn to_query(&self, defaults: &Defaults) -> Result<WeatherQuery, WeatherError> {
        Ok(WeatherQuery {
            city: self.city(defaults).to_string(),
            country: self.country.clone().filter(|c| !c.trim().is_empty()),
            unit: self.unit(defaults)?,
            include_forecast: self.show_forecast()?,
            days: self.days(defaults)?,
        })
    }
}
