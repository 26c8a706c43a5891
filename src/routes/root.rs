use axum::{Json, Router, routing::get};
use serde_json::{Map, Value, json};

use super::{
    API_PREFIX,
    route_list::{RouteInfo, routes},
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(describe_api))
        .route(API_PREFIX, get(describe_api))
        .route(&format!("{API_PREFIX}/routes.json"), get(list_routes_json))
}

async fn describe_api() -> Json<Value> {
    let endpoints: Map<String, Value> = routes()
        .iter()
        .map(|route| {
            (
                format!("{} {}", route.method, route.path),
                Value::String(route.description.to_string()),
            )
        })
        .collect();

    Json(json!({
        "message": "Todo API is running",
        "endpoints": endpoints,
    }))
}

async fn list_routes_json() -> Json<&'static [RouteInfo]> {
    Json(routes())
}
