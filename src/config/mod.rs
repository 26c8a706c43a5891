pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig, RestKvConfig, StorageBackendKind,
    StorageConfig,
};
pub use envconfig::EnvConfig;
