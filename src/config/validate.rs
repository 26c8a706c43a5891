use anyhow::{Result, bail};

use super::{AppConfig, StorageBackendKind};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.storage.key.trim().is_empty() {
        errors.push("storage.key must not be empty".to_string());
    }

    if let Some(database) = cfg.storage.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("storage.database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "storage.database.min_idle ({}) must be <= storage.database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(rest) = cfg.storage.rest.as_ref() {
        let url = rest.url.trim().to_ascii_lowercase();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push("storage.rest.url must start with http:// or https://".to_string());
        }

        if rest.token.trim().is_empty() {
            errors.push("storage.rest.token must not be empty".to_string());
        }

        if rest.timeout_secs == 0 {
            errors.push("storage.rest.timeout_secs must be > 0".to_string());
        }
    }

    match cfg.storage.backend {
        StorageBackendKind::Database if cfg.storage.database.is_none() => {
            errors.push("storage.backend=database requires storage.database.url".to_string());
        }
        StorageBackendKind::Rest if cfg.storage.rest.is_none() => {
            errors.push("storage.backend=rest requires storage.rest.url and token".to_string());
        }
        _ => {}
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
