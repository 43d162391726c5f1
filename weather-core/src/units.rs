use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::WeatherError;

/// Unit a temperature value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

const KELVIN_OFFSET: f64 = 273.15;

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit, TemperatureUnit::Kelvin]
    }

    /// Convert `value` from `self` into `to`, going through Celsius.
    pub fn convert(self, value: f64, to: TemperatureUnit) -> f64 {
        if self == to {
            return value;
        }

        let celsius = match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(value),
            TemperatureUnit::Kelvin => value - KELVIN_OFFSET,
        };

        match to {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }

    /// Request unit system that returns temperatures in this unit.
    pub fn units(&self) -> Units {
        match self {
            TemperatureUnit::Celsius => Units::Metric,
            TemperatureUnit::Fahrenheit => Units::Imperial,
            TemperatureUnit::Kelvin => Units::Kelvin,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(TemperatureUnit::Fahrenheit),
            "k" | "kelvin" | "standard" => Ok(TemperatureUnit::Kelvin),
            _ => Err(WeatherError::validation(format!(
                "Unknown temperature unit '{s}'. Supported: celsius, fahrenheit, kelvin."
            ))),
        }
    }
}

/// Unit system sent to the provider as the `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Kelvin,
}

impl Units {
    /// OpenWeatherMap calls its Kelvin system "standard".
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Kelvin => "standard",
        }
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        match self {
            Units::Metric => TemperatureUnit::Celsius,
            Units::Imperial => TemperatureUnit::Fahrenheit,
            Units::Kelvin => TemperatureUnit::Kelvin,
        }
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<TemperatureUnit>().map(|unit| unit.units())
    }
}
