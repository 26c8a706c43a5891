use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in request body";

/// JSON body extractor that ignores `Content-Type` and reports every parse or
/// shape failure as `400 Invalid JSON in request body`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::bad_request(INVALID_JSON_MESSAGE))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|err| {
                tracing::debug!(error = %err, "rejected request body");
                AppError::bad_request(INVALID_JSON_MESSAGE)
            })
    }
}
