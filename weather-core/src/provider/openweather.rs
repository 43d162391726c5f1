use async_trait::async_trait;
use tracing::debug;

use crate::{
    client::{ClientConfig, OpenWeatherClient},
    error::Result,
    model::{AirQuality, CityQuery, CurrentConditions, Forecast, Location},
    normalize::{normalize_air_pollution, normalize_current, normalize_forecast},
    provider::ProviderId,
    units::{TemperatureUnit, Units},
};

use super::WeatherProvider;

/// Live OpenWeatherMap data: client call, then normalization.
///
/// Requests are always made in metric and converted locally, so switching
/// the display unit never changes what the provider was asked for.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: OpenWeatherClient,
}

impl OpenWeatherProvider {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self { client: OpenWeatherClient::new(config)? })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn current(&self, query: &CityQuery, unit: TemperatureUnit) -> Result<CurrentConditions> {
        let raw = self.client.current_weather(query, Units::Metric).await?;
        let current = normalize_current(&raw, TemperatureUnit::Celsius)?;
        debug!(location = %current.location.display_name(), "current weather normalized");
        Ok(current.to_unit(unit))
    }

    async fn forecast(&self, query: &CityQuery, unit: TemperatureUnit) -> Result<Forecast> {
        let raw = self.client.forecast(query, Units::Metric).await?;
        let forecast = normalize_forecast(&raw, TemperatureUnit::Celsius)?;
        debug!(entries = forecast.entries.len(), "forecast normalized");
        Ok(forecast.to_unit(unit))
    }

    async fn geocode(&self, query: &CityQuery, limit: u8) -> Result<Vec<Location>> {
        self.client.geocode(query, limit).await
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality> {
        let raw = self.client.air_pollution(lat, lon).await?;
        normalize_air_pollution(&raw)
    }
}
