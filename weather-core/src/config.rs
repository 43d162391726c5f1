use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::{client::ClientConfig, units::TemperatureUnit};

/// Value that means "no credential configured"; selects sample data.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Environment variable consulted when no key is passed explicitly.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Outcome of credential resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    Placeholder,
}

/// First non-empty of `explicit`, `env`, `file`; the placeholder (or nothing
/// at all) resolves to [`Credential::Placeholder`].
pub fn resolve_credential(explicit: Option<&str>, env: Option<&str>, file: Option<&str>) -> Credential {
    let key = [explicit, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty());

    match key {
        Some(k) if k != PLACEHOLDER_API_KEY => Credential::ApiKey(k.to_string()),
        _ => Credential::Placeholder,
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_units = "celsius"
/// forecast_days = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_units: TemperatureUnit,
    pub default_city: String,
    pub forecast_days: usize,
    pub timeout_secs: u64,
    /// Replaces `https://api.openweathermap.org/data/2.5`, e.g. for a proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Replaces `https://api.openweathermap.org/geo/1.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_units: TemperatureUnit::Celsius,
            default_city: "London".to_string(),
            forecast_days: 5,
            timeout_secs: 10,
            base_url: None,
            geo_url: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let key = api_key.trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    /// Resolve the credential: `explicit`, then `$OPENWEATHER_API_KEY`, then the file.
    pub fn credential(&self, explicit: Option<&str>) -> Credential {
        let env = std::env::var(API_KEY_ENV).ok();
        resolve_credential(explicit, env.as_deref(), self.api_key.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn client_config(&self, api_key: &str) -> ClientConfig {
        let mut client = ClientConfig::new(api_key).with_timeout(self.timeout());
        if let Some(url) = &self.base_url {
            client.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.geo_url {
            client.geo_url = url.trim_end_matches('/').to_string();
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins() {
        let c = resolve_credential(Some("ARG"), Some("ENV"), Some("FILE"));
        assert_eq!(c, Credential::ApiKey("ARG".into()));
    }

    #[test]
    fn env_beats_file_and_blank_values_are_skipped() {
        assert_eq!(
            resolve_credential(Some("  "), Some("ENV"), Some("FILE")),
            Credential::ApiKey("ENV".into())
        );
        assert_eq!(resolve_credential(None, Some(""), Some("FILE")), Credential::ApiKey("FILE".into()));
    }

    #[test]
    fn nothing_or_placeholder_means_sample_mode() {
        assert_eq!(resolve_credential(None, None, None), Credential::Placeholder);
        assert_eq!(
            resolve_credential(Some(PLACEHOLDER_API_KEY), Some("ENV"), None),
            Credential::Placeholder
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("default_units = \"fahrenheit\"\n").unwrap();
        assert_eq!(cfg.default_units, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.forecast_days, 5);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.default_city, "London");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("  OPEN_KEY ".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api_key.as_deref(), Some("OPEN_KEY"));
    }

    #[test]
    fn blank_api_key_clears_it() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn client_config_carries_timeout() {
        let cfg = Config { timeout_secs: 3, ..Config::default() };
        let client = cfg.client_config("KEY");
        assert_eq!(client.api_key, "KEY");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.base_url, crate::client::DEFAULT_BASE_URL);
    }

    #[test]
    fn url_overrides_reach_client_config() {
        let cfg = Config {
            base_url: Some("http://127.0.0.1:8080/".into()),
            geo_url: Some("http://127.0.0.1:8081".into()),
            ..Config::default()
        };
        let client = cfg.client_config("KEY");
        assert_eq!(client.base_url, "http://127.0.0.1:8080");
        assert_eq!(client.geo_url, "http://127.0.0.1:8081");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.default_city, "London");
        assert_eq!(cfg.forecast_days, 5);
    }

    #[test]
    fn save_creates_parent_dirs_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("weather").join("config.toml");

        let mut cfg = Config {
            default_units: TemperatureUnit::Kelvin,
            default_city: "Oslo".into(),
            forecast_days: 3,
            ..Config::default()
        };
        cfg.set_api_key("FILE_KEY".into());
        cfg.save_to(&path).unwrap();

        assert!(path.exists());
        let back = Config::load_from(&path).unwrap();
        assert_eq!(back.api_key.as_deref(), Some("FILE_KEY"));
        assert_eq!(back.default_units, TemperatureUnit::Kelvin);
        assert_eq!(back.default_city, "Oslo");
        assert_eq!(back.forecast_days, 3);
        assert!(back.base_url.is_none());
    }

    #[test]
    fn unparsable_file_is_an_error_naming_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "forecast_days = \"many\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"), "{err:#}");
    }
}
