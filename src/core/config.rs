use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::catalog::CurrencyCode;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

fn default_base_url() -> String {
    DEFAULT_YAHOO_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    2
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        YahooProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Base currency used when `--from` is not given.
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
    /// Quote currency used when `--to` is not given.
    #[serde(default = "default_target_currency")]
    pub target_currency: CurrencyCode,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::Usd
}

fn default_target_currency() -> CurrencyCode {
    CurrencyCode::Eur
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            target_currency: default_target_currency(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "xconv", "xconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo(&self) -> YahooProviderConfig {
        self.providers.yahoo.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
    timeout_secs: 5
currency: "gbp"
target_currency: "PKR"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        let yahoo = config.yahoo();
        assert_eq!(yahoo.base_url, "http://example.com/yahoo");
        assert_eq!(yahoo.timeout_secs, 5);
        assert_eq!(yahoo.retries, 2);
        assert_eq!(config.currency, CurrencyCode::Gbp);
        assert_eq!(config.target_currency, CurrencyCode::Pkr);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.yahoo().base_url, DEFAULT_YAHOO_BASE_URL);
        assert_eq!(config.yahoo().timeout_secs, 10);
        assert_eq!(config.currency, CurrencyCode::Usd);
        assert_eq!(config.target_currency, CurrencyCode::Eur);
    }

    #[test]
    fn test_unsupported_currency_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("currency: \"XYZ\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
