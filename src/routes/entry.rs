use std::sync::Arc;

use axum::{
    Router,
    extract::OriginalUri,
    http::Method,
    middleware,
};

use crate::{
    error::AppError,
    middleware::{catch_panic_layer, cors_layer, json_error_middleware, preflight_middleware},
    state::AppState,
};

use super::{root, todos};

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(root::router())
        .merge(todos::router(state))
        .fallback(route_not_found)
}

/// The router with the middleware stack every deployment runs: JSON errors,
/// panic recovery, OPTIONS short-circuit and CORS headers.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(middleware::from_fn(preflight_middleware))
        .layer(cors_layer())
}

async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route {method} {uri} not found"))
}
