use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use serde_with::DurationSeconds;
use serde_with::serde_as;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// dashboard connection config
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    pub client: String,
    pub addr: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub key: SecretString,

    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,

    pub proxy: Option<ProxyConfig>,
}

// proxy config
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;

        info!("Loaded configuration for client {}", config.client);

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.client.is_empty() {
            anyhow::bail!("Client name cannot be empty");
        }
        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let mut config_file = std::env::current_dir()?;
    config_file.push("config");
    config_file.push("settings.toml");
    Ok(config_file)
}

// default load config from config/settings.toml
pub fn load_config() -> Result<DashboardConfig> {
    DashboardConfig::from_file(&default_config_path()?)
}
