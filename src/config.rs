use crate::domain::Environment;
use crate::error::{MigrationError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn default_page_size() -> u32 {
    10_000
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    /// Owning agency used to scope reconciliation of the shared source catalog
    pub agency_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    /// Organisation written into every concept's publisher
    pub publisher_identifier: String,
    pub registration_status: String,
    pub publication_level: String,
    /// Public export used for reconciliation
    pub export_base_url: String,
    pub export_publisher_identifier: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Partner API base URL per environment
    pub environments: BTreeMap<Environment, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotConfig {
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MigrationError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source.page_size == 0 || self.destination.page_size == 0 {
            return Err(MigrationError::Config("page_size must be positive".to_string()));
        }
        if self.destination.publisher_identifier.trim().is_empty() {
            return Err(MigrationError::Config(
                "destination.publisher_identifier is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl DestinationConfig {
    pub fn base_url(&self, env: Environment) -> Result<&str> {
        self.environments
            .get(&env)
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| {
                MigrationError::Config(format!(
                    "no destination URL configured for {env}, add it under [destination.environments]"
                ))
            })
    }
}
