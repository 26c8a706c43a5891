use std::{collections::HashMap, path::Path};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Loads a config struct from `APP_`-prefixed environment variables, with
/// nested keys separated by `__` (`APP_STORAGE__BACKEND=rest`).
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn load_dotenv() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Unprefixed variables set by hosting platforms, mapped onto config
    /// keys. They win over the prefixed variables.
    fn platform_overrides(_vars: &HashMap<String, String>) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::from_vars(std::env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let overrides = Self::platform_overrides(&vars);

        let mut builder = config_rs::Config::builder().add_source(
            config_rs::Environment::with_prefix(Self::PREFIX)
                .prefix_separator("_")
                .separator(Self::SEPARATOR)
                .try_parsing(true)
                .source(Some(vars)),
        );
        for (key, value) in overrides {
            builder = builder
                .set_override(key, value)
                .with_context(|| format!("failed to apply override for {key}"))?;
        }

        let cfg = builder
            .build()
            .context("failed to read environment variables for config")?
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
