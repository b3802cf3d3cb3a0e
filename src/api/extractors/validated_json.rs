//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::domain::Schema;
use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Shape errors (wrong type, unknown enum value) are validation errors;
/// unparseable bodies are bad requests.
///
/// # Example
///
/// ```rust,ignore
/// use parcel_tracker::api::extractors::ValidatedJson;
/// use parcel_tracker::domain::UserCandidate;
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<UserCandidate>) {
///     // payload passed its schema rules
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Schema,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(from_rejection)?;

        value.check()?;

        Ok(ValidatedJson(value))
    }
}

fn from_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::validation(e.body_text()),
        other => AppError::BadRequest(other.body_text()),
    }
}
