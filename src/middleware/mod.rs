mod cors;
mod json_error;
mod panic;

pub use cors::{cors_layer, preflight_middleware};
pub use json_error::{METHOD_NOT_ALLOWED_MESSAGE, json_error_middleware};
pub use panic::catch_panic_layer;
