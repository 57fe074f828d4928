use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

/// Environment variable that overrides the OpenWeather API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

pub const DEFAULT_CITY: &str = "Seoul";

/// Per-provider settings. Quote providers need no key; `base_url` is mostly
/// useful for pointing a provider at a mirror or a test server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City used when a request names neither a city nor coordinates.
    pub default_city: String,

    /// Language code passed to the weather provider for descriptions.
    pub language: String,

    /// Timeout applied to every outbound provider call; 0 disables it.
    pub timeout_secs: u64,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            language: "en".to_string(),
            timeout_secs: 10,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
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
        let dirs = ProjectDirs::from("dev", "weather-quote", "weather-quote")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHER_API_KEY` on top of the file contents. Called once at
    /// startup; lookups never read the environment themselves.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.upsert_provider_api_key(ProviderId::OpenWeather, key);
            }
        }
        self
    }

    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .or_default()
            .api_key = Some(api_key);
    }

    pub fn set_provider_base_url(&mut self, provider_id: ProviderId, base_url: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .or_default()
            .base_url = Some(base_url);
    }

    /// Returns the API key for a provider, if present and non-blank.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .and_then(|cfg| cfg.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Configured base URL for a provider, or its public endpoint.
    pub fn provider_base_url(&self, provider_id: ProviderId) -> &str {
        self.providers
            .get(provider_id.as_str())
            .and_then(|cfg| cfg.base_url.as_deref())
            .unwrap_or_else(|| provider_id.default_base_url())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }

    /// Per-call timeout, or `None` when `timeout_secs` is 0.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch `WEATHER_API_KEY`.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_api_key_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: every test reading or writing this variable holds ENV_LOCK.
        unsafe {
            match value {
                Some(v) => std::env::set_var(API_KEY_ENV, v),
                None => std::env::remove_var(API_KEY_ENV),
            }
        }
        let out = f();
        unsafe { std::env::remove_var(API_KEY_ENV) };
        out
    }

    #[test]
    fn env_sets_openweather_key() {
        let cfg = with_api_key_env(Some("ENV_KEY"), || Config::default().with_env_overrides());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut file_cfg = Config::default();
        file_cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());

        let cfg = with_api_key_env(Some("   "), || file_cfg.clone().with_env_overrides());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FILE_KEY"));

        let cfg = with_api_key_env(Some(""), || Config::default().with_env_overrides());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), None);
    }

    #[test]
    fn env_overrides_file_key() {
        let mut file_cfg = Config::default();
        file_cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());
        file_cfg.set_provider_base_url(ProviderId::OpenWeather, "http://localhost:1".into());

        let cfg = with_api_key_env(Some("ENV_KEY"), || file_cfg.with_env_overrides());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
        assert_eq!(cfg.provider_base_url(ProviderId::OpenWeather), "http://localhost:1");
    }

    #[test]
    fn unset_env_leaves_config_alone() {
        let cfg = with_api_key_env(None, || Config::default().with_env_overrides());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cfg: Config = toml::from_str("timeout_secs = 0").unwrap();
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.default_city, "Seoul");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(10)));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
        assert!(cfg.is_provider_configured(ProviderId::Quotable));
        assert!(cfg.is_provider_configured(ProviderId::ZenQuotes));
    }

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "  ".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), None);
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn base_url_override_keeps_api_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        cfg.set_provider_base_url(ProviderId::OpenWeather, "http://localhost:1234".into());

        assert_eq!(cfg.provider_base_url(ProviderId::OpenWeather), "http://localhost:1234");
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("KEY"));
        assert_eq!(
            cfg.provider_base_url(ProviderId::ZenQuotes),
            ProviderId::ZenQuotes.default_base_url()
        );
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            default_city = "Busan"

            [providers.openweather]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_city, "Busan");
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("abc"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("weather-quote-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("weather-quote-test-{}", std::process::id()))
            .join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
