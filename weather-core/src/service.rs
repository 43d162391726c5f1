//! The one fetch → normalize → aggregate path every shell goes through.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Config,
    aggregate::daily_summaries,
    error::{Result, WeatherError},
    model::{AirQuality, CityQuery, CurrentConditions, DailySummary, Forecast, Location},
    provider::{ProviderId, WeatherProvider, provider_from_config},
    units::TemperatureUnit,
};

pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// What a shell collected from its input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub city: String,
    pub country: Option<String>,
    pub unit: TemperatureUnit,
    pub include_forecast: bool,
    pub days: usize,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: None,
            unit: TemperatureUnit::Celsius,
            include_forecast: true,
            days: DEFAULT_FORECAST_DAYS,
        }
    }

    pub fn city_query(&self) -> Result<CityQuery> {
        CityQuery::new(&self.city, self.country.as_deref())
    }
}

/// Everything a shell renders for one lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub source: ProviderId,
    pub unit: TemperatureUnit,
    pub current: CurrentConditions,
    pub forecast: Option<Forecast>,
    pub daily: Vec<DailySummary>,
    pub days: usize,
}

impl WeatherReport {
    pub fn is_sample(&self) -> bool {
        self.source == ProviderId::Sample
    }

    /// Re-express the report in `unit` without another request. Daily
    /// summaries are rebuilt from the converted entries.
    pub fn to_unit(&self, unit: TemperatureUnit) -> Self {
        let forecast = self.forecast.as_ref().map(|f| f.to_unit(unit));
        let daily = forecast
            .as_ref()
            .map(|f| daily_summaries(&f.entries, self.days))
            .unwrap_or_default();

        Self {
            source: self.source,
            unit,
            current: self.current.to_unit(unit),
            forecast,
            daily,
            days: self.days,
        }
    }
}

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config, explicit_api_key: Option<&str>) -> Result<Self> {
        Ok(Self::new(provider_from_config(config, explicit_api_key)?))
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn is_sample(&self) -> bool {
        self.provider_id() == ProviderId::Sample
    }

    /// Validate, fetch current conditions and (optionally) the forecast, and
    /// aggregate the forecast into daily summaries.
    pub async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherReport> {
        let city = query.city_query()?;
        debug!(query = %city, unit = %query.unit, provider = %self.provider.id(), "weather lookup");

        let current = self.provider.current(&city, query.unit).await.inspect_err(|e| {
            warn!(kind = e.kind(), error = %e, "current weather lookup failed");
        })?;

        let (forecast, daily) = if query.include_forecast {
            let forecast = self.provider.forecast(&city, query.unit).await.inspect_err(|e| {
                warn!(kind = e.kind(), error = %e, "forecast lookup failed");
            })?;
            let daily = daily_summaries(&forecast.entries, query.days);
            (Some(forecast), daily)
        } else {
            (None, Vec::new())
        };

        Ok(WeatherReport {
            source: self.provider.id(),
            unit: query.unit,
            current,
            forecast,
            daily,
            days: query.days,
        })
    }

    pub async fn geocode(&self, city: &str, country: Option<&str>, limit: u8) -> Result<Vec<Location>> {
        let query = CityQuery::new(city, country)?;
        self.provider.geocode(&query, limit).await
    }

    /// Resolve the city to coordinates first, then ask for its air quality.
    pub async fn air_quality(&self, city: &str, country: Option<&str>) -> Result<(Location, AirQuality)> {
        let location = self
            .geocode(city, country, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Provider { status: 404, message: "city not found".into() })?;

        let air = self.provider.air_quality(location.lat, location.lon).await?;
        Ok((location, air))
    }
}
