use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }

    // `PORT` and the hosted KV credentials are injected by the deployment
    // platform rather than written under the APP_ prefix.
    fn platform_overrides(vars: &HashMap<String, String>) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        if let Some(port) = non_empty(vars, PLATFORM_PORT_VAR) {
            overrides.push(("general.port", port));
        }
        if let (Some(url), Some(token)) = (
            non_empty(vars, PLATFORM_KV_URL_VAR),
            non_empty(vars, PLATFORM_KV_TOKEN_VAR),
        ) {
            overrides.push(("storage.rest.url", url));
            overrides.push(("storage.rest.token", token));
        }
        overrides
    }
}

const PLATFORM_PORT_VAR: &str = "PORT";
const PLATFORM_KV_URL_VAR: &str = "KV_REST_API_URL";
const PLATFORM_KV_TOKEN_VAR: &str = "KV_REST_API_TOKEN";

fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Memory,
    Database,
    Rest,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub key: String,
    pub database: Option<DatabaseConfig>,
    pub rest: Option<RestKvConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::default(),
            key: defaults::DEFAULT_STORAGE_KEY.to_string(),
            database: None,
            rest: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_db_min_idle")]
    pub min_idle: u32,
}

/// Connection settings for a Redis-over-REST key-value service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RestKvConfig {
    pub url: String,
    pub token: String,
    #[serde(default = "default_rest_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_db_max_connections() -> u32 {
    defaults::DEFAULT_DB_MAX_CONNECTIONS as u32
}

fn default_db_min_idle() -> u32 {
    defaults::DEFAULT_DB_MIN_IDLE as u32
}

fn default_rest_timeout_secs() -> u64 {
    defaults::DEFAULT_REST_TIMEOUT_SECS as u64
}
