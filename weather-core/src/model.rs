use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::{Result, WeatherError},
    units::TemperatureUnit,
};

/// A validated city lookup: non-empty city, optional 2-letter country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    city: String,
    country: Option<String>,
}

impl CityQuery {
    pub fn new(city: &str, country: Option<&str>) -> Result<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::validation("Please enter a city name"));
        }

        let country = match country.map(str::trim).filter(|c| !c.is_empty()) {
            None => None,
            Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(code.to_ascii_uppercase())
            }
            Some(code) => {
                return Err(WeatherError::validation(format!(
                    "Country code '{code}' must be two letters, e.g. GB or US"
                )));
            }
        };

        Ok(Self { city: city.to_string(), country })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Value of the provider's `q` parameter.
    pub fn as_query(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.city, country),
            None => self.city.clone(),
        }
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Weather group, description and icon id for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// m/s.
    pub speed: f64,
    /// Meteorological degrees; 0 when the provider omits it.
    pub direction: f64,
    pub gust: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: Location,
    pub observed_at: DateTime<FixedOffset>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    pub condition: Condition,
    pub wind: Wind,
    pub visibility_km: f64,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    pub unit: TemperatureUnit,
}

impl CurrentConditions {
    /// Same observation with every temperature field expressed in `unit`.
    pub fn to_unit(&self, unit: TemperatureUnit) -> Self {
        let from = self.unit;
        Self {
            temperature: from.convert(self.temperature, unit),
            feels_like: from.convert(self.feels_like, unit),
            unit,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub temp: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature: TemperatureRange,
    pub condition: Condition,
    pub humidity: u8,
    pub pressure: f64,
    pub wind: Wind,
    pub visibility_km: f64,
    /// rain + snow over the slot, in mm.
    pub precipitation_mm: f64,
    pub unit: TemperatureUnit,
}

impl ForecastEntry {
    pub fn to_unit(&self, unit: TemperatureUnit) -> Self {
        let from = self.unit;
        let t = self.temperature;
        Self {
            temperature: TemperatureRange {
                temp: from.convert(t.temp, unit),
                feels_like: from.convert(t.feels_like, unit),
                min: from.convert(t.min, unit),
                max: from.convert(t.max, unit),
            },
            unit,
            ..self.clone()
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Absent when the provider omits the `city` block.
    pub location: Option<Location>,
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn to_unit(&self, unit: TemperatureUnit) -> Self {
        Self {
            location: self.location.clone(),
            entries: self.entries.iter().map(|e| e.to_unit(unit)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Per-day reduction of forecast entries. Derived, never provider-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temperature: DailyTemperature,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation_mm: f64,
    /// Number of forecast slots the day was built from.
    pub samples: usize,
    pub unit: TemperatureUnit,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pollutants {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub lat: f64,
    pub lon: f64,
    pub measured_at: DateTime<Utc>,
    /// 1 (good) to 5 (very poor).
    pub aqi: u8,
    pub components: Pollutants,
}

impl AirQuality {
    pub fn label(&self) -> &'static str {
        match self.aqi {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            5 => "Very Poor",
            _ => "Unknown",
        }
    }
}
