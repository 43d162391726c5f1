use crate::{
    Config,
    config::Credential,
    error::Result,
    model::{AirQuality, CityQuery, CurrentConditions, Forecast, Location},
    provider::{openweather::OpenWeatherProvider, sample::SampleProvider},
    units::TemperatureUnit,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;
pub mod sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenWeather,
    Sample,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Sample => "sample",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of normalized weather data.
///
/// Temperatures come back in the `unit` asked for; everything else uses the
/// provider's metric units (m/s, hPa, km, mm).
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn current(&self, query: &CityQuery, unit: TemperatureUnit) -> Result<CurrentConditions>;

    async fn forecast(&self, query: &CityQuery, unit: TemperatureUnit) -> Result<Forecast>;

    async fn geocode(&self, query: &CityQuery, limit: u8) -> Result<Vec<Location>>;

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality>;
}

/// Live provider when a real credential resolves, sample data otherwise.
///
/// The decision is made here, before any request exists, so the sample
/// branch never touches the network.
pub fn provider_from_config(
    config: &Config,
    explicit_api_key: Option<&str>,
) -> Result<Box<dyn WeatherProvider>> {
    provider_for_credential(config, config.credential(explicit_api_key))
}

pub fn provider_for_credential(
    config: &Config,
    credential: Credential,
) -> Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match credential {
        Credential::ApiKey(key) => {
            Box::new(OpenWeatherProvider::new(config.client_config(&key))?)
        }
        Credential::Placeholder => {
            tracing::info!("no API key configured, using sample weather data");
            Box::new(SampleProvider::new())
        }
    };

    Ok(boxed)
}
