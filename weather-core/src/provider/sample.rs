//! Fixed demonstration dataset used when no API key is configured.
//!
//! The values are already in normalized form, so shells render them through
//! exactly the same code path as live data.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Timelike, Utc};

use crate::{
    error::Result,
    model::{
        AirQuality, CityQuery, Condition, CurrentConditions, Forecast, ForecastEntry, Location,
        Pollutants, TemperatureRange, Wind,
    },
    provider::ProviderId,
    units::TemperatureUnit,
};

use super::WeatherProvider;

const SAMPLE_FORECAST_SLOTS: i64 = 40;

pub fn sample_location() -> Location {
    Location {
        name: "London".to_string(),
        country: "GB".to_string(),
        state: None,
        lat: 51.5074,
        lon: -0.1278,
    }
}

fn partly_cloudy() -> Condition {
    Condition {
        main: "Clouds".to_string(),
        description: "Partly Cloudy".to_string(),
        icon: "02d".to_string(),
    }
}

fn at_time_of_day(base: DateTime<FixedOffset>, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .and_then(|t| base.date_naive().and_time(t).and_local_timezone(*base.offset()).single())
        .unwrap_or(base)
}

/// London, 20.5 °C, "Partly Cloudy", observed at `now`.
pub fn sample_current(now: DateTime<FixedOffset>) -> CurrentConditions {
    CurrentConditions {
        location: sample_location(),
        observed_at: now,
        temperature: 20.5,
        feels_like: 22.0,
        humidity: 65,
        pressure: 1013.0,
        condition: partly_cloudy(),
        wind: Wind { speed: 3.5, direction: 270.0, gust: 5.0 },
        visibility_km: 10.0,
        sunrise: at_time_of_day(now, 6, 30),
        sunset: at_time_of_day(now, 20, 15),
        unit: TemperatureUnit::Celsius,
    }
}

/// 40 three-hourly slots starting at `base`, following a simple daily cycle
/// with a slight warming trend.
pub fn sample_forecast(base: DateTime<FixedOffset>) -> Forecast {
    let entries = (0..SAMPLE_FORECAST_SLOTS)
        .map(|i| {
            let temp = (20 + (i % 8 - 4) * 2 + i / 8) as f64;
            ForecastEntry {
                timestamp: base + Duration::hours(i * 3),
                temperature: TemperatureRange {
                    temp,
                    feels_like: temp + 2.0,
                    min: temp - 2.0,
                    max: temp + 2.0,
                },
                condition: partly_cloudy(),
                humidity: (60 + (i % 5) * 5) as u8,
                pressure: (1013 + (i % 3) * 2) as f64,
                wind: Wind { speed: (3 + i % 4) as f64, direction: 270.0, gust: 5.0 },
                visibility_km: 10.0,
                precipitation_mm: 0.0,
                unit: TemperatureUnit::Celsius,
            }
        })
        .collect();

    Forecast { location: Some(sample_location()), entries }
}

fn sample_air_quality(now: DateTime<Utc>) -> AirQuality {
    let location = sample_location();
    AirQuality {
        lat: location.lat,
        lon: location.lon,
        measured_at: now,
        aqi: 2,
        components: Pollutants {
            co: 201.94,
            no: 0.02,
            no2: 15.42,
            o3: 68.66,
            so2: 2.15,
            pm2_5: 5.8,
            pm10: 8.1,
            nh3: 0.9,
        },
    }
}

/// Serves the fixed dataset, whatever city is asked for.
#[derive(Debug, Clone, Default)]
pub struct SampleProvider {
    now: Option<DateTime<FixedOffset>>,
}

impl SampleProvider {
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Pin the clock, so repeated lookups return identical data.
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self { now: Some(now) }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now.unwrap_or_else(|| {
            let now = Utc::now().fixed_offset();
            now.with_nanosecond(0).unwrap_or(now)
        })
    }
}

#[async_trait]
impl WeatherProvider for SampleProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Sample
    }

    async fn current(&self, _query: &CityQuery, unit: TemperatureUnit) -> Result<CurrentConditions> {
        Ok(sample_current(self.now()).to_unit(unit))
    }

    async fn forecast(&self, _query: &CityQuery, unit: TemperatureUnit) -> Result<Forecast> {
        Ok(sample_forecast(self.now()).to_unit(unit))
    }

    async fn geocode(&self, _query: &CityQuery, _limit: u8) -> Result<Vec<Location>> {
        Ok(vec![sample_location()])
    }

    async fn air_quality(&self, _lat: f64, _lon: f64) -> Result<AirQuality> {
        Ok(sample_air_quality(self.now().with_timezone(&Utc)))
    }
}
