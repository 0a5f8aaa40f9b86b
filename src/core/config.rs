use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_target_currency() -> String {
    "BRL".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "cambio", "cambio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read config file: {} (run `cambio setup` to create one)",
                path.as_ref().display()
            )
        })?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization_with_defaults() {
        let yaml_str = r#"
provider:
  api_key: "abc123"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.api_key, "abc123");
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.target_currency, "BRL");
    }

    #[test]
    fn test_config_deserialization_with_overrides() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
  api_key: "abc123"
base_currency: "EUR"
target_currency: "JPY"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.target_currency, "JPY");
    }

    #[test]
    fn test_config_requires_api_key() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_load_from_missing_path_mentions_setup() {
        let err = AppConfig::load_from_path("/nonexistent/cambio/config.yaml").unwrap_err();
        assert!(err.to_string().contains("cambio setup"));
    }
}
