use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Station configuration file. Run-specific knobs live on the command line;
/// this holds what stays fixed for a station.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub id: u32,
    /// Allow scheduling while the station is in testing mode.
    #[serde(default)]
    pub allow_testing: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub db_base_url: String,
    pub network_base_url: String,
    /// Network token; required only to commit observations.
    pub api_token: Option<String>,
    /// Database token; required to download TLEs.
    pub db_api_token: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            db_base_url: "https://db.satnogs.org".to_string(),
            network_base_url: "https://network.satnogs.org".to_string(),
            api_token: None,
            db_api_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub dir: PathBuf,
    pub max_age_hours: f64,
    pub max_norad_cat_id: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("cache"),
            max_age_hours: 24.0,
            max_norad_cat_id: 90000,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;

        // Tokens from the environment take precedence over the file.
        if let Ok(token) = std::env::var("SATNOGS_API_TOKEN") {
            if !token.is_empty() {
                config.network.api_token = Some(token);
            }
        }
        if let Ok(token) = std::env::var("SATNOGS_DB_API_TOKEN") {
            if !token.is_empty() {
                config.network.db_api_token = Some(token);
            }
        }

        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
