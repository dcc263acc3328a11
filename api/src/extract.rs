use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use store::validation::{Validate, ValidationErrors};

use crate::error::ApiError;

/// A JSON body that has been parsed and passed its validation rules.
///
/// Parse failures (malformed JSON, unknown enum values, missing fields) are
/// reported as validation errors with status 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError::Validation(ValidationErrors::single("body", rejection.body_text()))
            })?;
        value.validate()?;
        Ok(Self(value))
    }
}
