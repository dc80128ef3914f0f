use crate::error::{AppError, Result};
use ammo_inventory_common::{ClientConfig, DEFAULT_MAX_PRODUCTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// サーバーURLを上書きする環境変数
pub const URL_ENV: &str = "AMMO_INVENTORY_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub read_retries: u32,
    pub default_max_products: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: (ClientConfig::DEFAULT_TIMEOUT_MS / 1000) as u64,
            read_retries: ClientConfig::DEFAULT_READ_RETRIES,
            default_max_products: DEFAULT_MAX_PRODUCTS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Home directory not found".into()))?;
        Ok(home.join(".config").join("ammo-inventory").join("config.json"))
    }

    /// サーバーURL（環境変数を優先、末尾の `/` は除く）
    pub fn base_url(&self) -> Result<String> {
        let url = match std::env::var(URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.base_url.clone().ok_or(AppError::MissingBaseUrl)?,
        };
        Ok(url.trim().trim_end_matches('/').to_string())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "URL must start with http:// or https://: {}",
                url
            )));
        }
        self.base_url = Some(url);
        self.save()
    }

    /// `timeout_seconds` が 0 なら既定値を使う
    pub fn client_config(&self) -> ClientConfig {
        let timeout_ms = match self.timeout_seconds {
            0 => ClientConfig::DEFAULT_TIMEOUT_MS,
            secs => secs.saturating_mul(1000).min(u32::MAX as u64) as u32,
        };
        ClientConfig {
            timeout_ms,
            read_retries: self.read_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_client_defaults() {
        let config = Config::default();
        assert_eq!(config.client_config(), ClientConfig::default());
        assert_eq!(config.default_max_products, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"base_url":"http://pi:5000"}"#).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://pi:5000"));
        assert_eq!(config.timeout_seconds, 15);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config { timeout_seconds: 0, ..Config::default() };
        assert_eq!(config.client_config().timeout_ms, ClientConfig::DEFAULT_TIMEOUT_MS);

        let config = Config { timeout_seconds: 30, ..Config::default() };
        assert_eq!(config.client_config().timeout_ms, 30_000);
    }
}
