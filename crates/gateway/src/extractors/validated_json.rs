//! Validated JSON extractor.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::{AppError, AppResult};

/// JSON extractor that runs every declared field check on the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = Json::<T>::from_request(req, state).await;
        validated(payload).map(ValidatedJson)
    }
}

/// Check an already extracted body.
///
/// Handlers that must authorize the caller before looking at the payload
/// take `Result<Json<T>, JsonRejection>` and call this afterwards.
pub fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(value) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    value
        .validate()
        .map_err(|e| AppError::InvalidFields(field_errors(&e)))?;

    Ok(value)
}

/// Flatten validation failures to one message per field.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let message = errors
                .first()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| error.code.to_string())
                })
                .unwrap_or_else(|| "invalid value".to_string());
            (field.to_string(), message)
        })
        .collect()
}
