use std::sync::Arc;

use axum::Router;

use crate::{
    config::AppConfig,
    kv::{KvBackend, MemoryKv},
    routes::app,
    state::AppState,
    store::TodoStore,
};

pub fn test_state_with(backend: Arc<dyn KvBackend>) -> Arc<AppState> {
    let cfg = AppConfig::default();
    let store = TodoStore::new(backend, cfg.storage.key.clone());
    AppState::new(cfg, store)
}

pub fn test_state() -> Arc<AppState> {
    test_state_with(Arc::new(MemoryKv::new()))
}

pub fn test_app(state: Arc<AppState>) -> Router {
    app(state)
}
