pub mod config;
pub mod db;
pub mod error;
pub mod kv;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod test_helpers;
