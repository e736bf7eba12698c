//! Configuration infrastructure
//!
//! Contains configuration loading and management for the product parser.
//! Everything is optional in the JSON file: missing sections fall back to
//! the Ozon defaults below.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::info;
use tracing::level_filters::LevelFilter;

use crate::domain::constants::site;
pub use crate::infrastructure::http_client::HttpClientConfig;
pub use crate::infrastructure::parsing::ParsingConfig;

const CONFIG_DIR_NAME: &str = "ozon-product-parser";
const CONFIG_FILE_NAME: &str = "config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub http: HttpClientConfig,
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
}

/// Target site addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Product page template containing `{sku}`
    pub product_url_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            product_url_template: site::PRODUCT_URL_TEMPLATE.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            module_filters: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Reject values that would make every fetch fail
    pub fn validate(&self) -> Result<()> {
        if !self.site.product_url_template.contains(site::SKU_PLACEHOLDER) {
            anyhow::bail!(
                "site.product_url_template must contain {}: {}",
                site::SKU_PLACEHOLDER,
                self.site.product_url_template
            );
        }
        if self.http.timeout_seconds == 0 {
            anyhow::bail!("http.timeout_seconds must be greater than 0");
        }
        self.logging.validate()
    }
}

impl LoggingConfig {
    /// Reject unknown level names, which `EnvFilter` would otherwise read as
    /// target names
    pub fn validate(&self) -> Result<()> {
        LevelFilter::from_str(self.level.trim())
            .map(|_| ())
            .map_err(|_| {
                anyhow::anyhow!(
                    "logging.level must be one of off, error, warn, info, debug, trace: {}",
                    self.level
                )
            })
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file
    Loaded,
    /// File was missing and has been written with defaults
    CreatedDefault,
}

/// Loads and stores [`AppConfig`] as JSON
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the platform config directory for this application
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Configuration manager using the default config file location
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(CONFIG_FILE_NAME)))
    }

    /// Configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration, writing the defaults first if the file does not exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        self.load_or_create().await.map(|(config, _)| config)
    }

    /// Like [`Self::load_config`], also reporting whether the file was created.
    ///
    /// Callers that set up logging from the loaded configuration use the
    /// source to log what happened once a subscriber exists.
    pub async fn load_or_create(&self) -> Result<(AppConfig, ConfigSource)> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok((default_config, ConfigSource::CreatedDefault));
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", self.config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration file: {}", self.config_path.display()))?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok((config, ConfigSource::Loaded))
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }
}

/// Default values
pub mod defaults {
    /// Desktop Chrome on Windows 10
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

    pub const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const MAX_REDIRECTS: usize = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let config = manager.load_config().await.unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(manager.config_path().exists());
    }

    #[tokio::test]
    async fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let mut config = AppConfig::default();
        config.http.timeout_seconds = 5;
        config.parsing.blocking_markers.push("captcha".to_string());
        manager.save_config(&config).await.unwrap();

        assert_eq!(manager.load_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn partial_file_uses_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"logging": {"level": "debug"}}"#).unwrap();

        let config = ConfigManager::with_path(&path).load_config().await.unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.http, HttpClientConfig::default());
        assert_eq!(config.site.product_url_template, "https://www.ozon.ru/product/{sku}/");
    }

    #[tokio::test]
    async fn reports_whether_defaults_were_written() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let (_, first) = manager.load_or_create().await.unwrap();
        let (_, second) = manager.load_or_create().await.unwrap();

        assert_eq!(first, ConfigSource::CreatedDefault);
        assert_eq!(second, ConfigSource::Loaded);
    }

    #[test]
    fn misspelled_log_level_is_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        for level in ["off", "error", "WARN", "info", "debug", "trace"] {
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "{level} should be accepted");
        }
    }

    #[tokio::test]
    async fn file_with_unknown_log_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"logging": {"level": "verbose"}}"#).unwrap();

        assert!(ConfigManager::with_path(&path).load_config().await.is_err());
    }

    #[tokio::test]
    async fn template_without_placeholder_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"site": {"product_url_template": "https://example.com/"}}"#).unwrap();

        assert!(ConfigManager::with_path(&path).load_config().await.is_err());
    }
}
