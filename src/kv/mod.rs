mod database;
mod memory;
mod rest;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::config::{StorageBackendKind, StorageConfig};

pub use database::DatabaseKv;
pub use memory::MemoryKv;
pub use rest::RestKv;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
    #[error("stored value is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("value could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type KvResult<T> = Result<T, KvError>;

/// Minimal get/set contract the todo store is written against.
#[async_trait]
pub trait KvBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> KvResult<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> KvResult<()>;
}

pub async fn connect(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    let backend: Arc<dyn KvBackend> = match cfg.backend {
        StorageBackendKind::Memory => Arc::new(MemoryKv::new()),
        StorageBackendKind::Database => {
            let database = cfg
                .database
                .as_ref()
                .context("storage.database is required for the database backend")?;
            let db = crate::db::connection::connect(database).await?;
            Arc::new(DatabaseKv::new(db))
        }
        StorageBackendKind::Rest => {
            let rest = cfg
                .rest
                .as_ref()
                .context("storage.rest is required for the rest backend")?;
            Arc::new(RestKv::new(rest)?)
        }
    };
    tracing::info!(backend = backend.name(), key = %cfg.key, "todo storage ready");
    Ok(backend)
}
