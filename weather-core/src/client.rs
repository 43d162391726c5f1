use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::{Result, WeatherError},
    model::{CityQuery, Location},
    normalize::normalize_geocode,
    units::Units,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the client needs, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IconSize {
    fn suffix(&self) -> &'static str {
        match self {
            IconSize::Small => "1x",
            IconSize::Medium => "2x",
            IconSize::Large => "4x",
        }
    }
}

pub fn icon_url(icon: &str, size: IconSize) -> String {
    format!("{ICON_BASE_URL}/{icon}@{}.png", size.suffix())
}

/// Thin HTTP layer over the OpenWeatherMap endpoints.
///
/// Every call is a single GET with the configured timeout. The outcome is
/// the parsed JSON body or exactly one classified [`WeatherError`].
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    config: ClientConfig,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Unexpected(format!("could not build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub async fn current_weather(&self, query: &CityQuery, units: Units) -> Result<Value> {
        let url = format!("{}/weather", self.config.base_url);
        let q = query.as_query();
        self.get_json(&url, "current weather", &[("q", q.as_str()), ("units", units.as_query())])
            .await
    }

    pub async fn forecast(&self, query: &CityQuery, units: Units) -> Result<Value> {
        let url = format!("{}/forecast", self.config.base_url);
        let q = query.as_query();
        self.get_json(&url, "5-day forecast", &[("q", q.as_str()), ("units", units.as_query())])
            .await
    }

    pub async fn geocode(&self, query: &CityQuery, limit: u8) -> Result<Vec<Location>> {
        let url = format!("{}/direct", self.config.geo_url);
        let q = query.as_query();
        let limit = limit.max(1).to_string();
        let raw = self
            .get_json(&url, "geocoding", &[("q", q.as_str()), ("limit", limit.as_str())])
            .await?;
        normalize_geocode(&raw)
    }

    pub async fn air_pollution(&self, lat: f64, lon: f64) -> Result<Value> {
        let url = format!("{}/air_pollution", self.config.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.get_json(&url, "air pollution", &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }

    async fn get_json(&self, url: &str, what: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!(url, ?params, "requesting {what}");

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(WeatherError::from)
            .inspect_err(|e| warn!(error = %e, "{what} request failed"))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!("failed to read {what} response body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let message = provider_message(&body);
            warn!(status = status.as_u16(), %message, "{what} request rejected by provider");
            return Err(WeatherError::Provider { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::Unexpected(format!("{what} response is not valid JSON: {e}: {}", truncate_body(&body)))
        })
    }
}

/// Error text from a provider error body: its `message` field, else the raw
/// (truncated) body, else a generic fallback.
fn provider_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message").map(|m| match m {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    });

    match from_json {
        Some(msg) if !msg.is_empty() => msg,
        _ if !body.trim().is_empty() => truncate_body(body.trim()),
        _ => "Unknown error".to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
