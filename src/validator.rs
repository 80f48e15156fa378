//! JSON extraction with request validation.
//!
//! [`ValidatedJson`] deserializes the body and runs the DTO's `validator`
//! rules before the handler sees it. Deserialization problems are 400s;
//! rule violations are 422s carrying every failed field, not just the first.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(anyhow::anyhow!("{}", rejection.body_text()))
            })?;

        value.validate().map_err(|errors| {
            let details: Vec<String> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, field_errors)| {
                    field_errors.iter().map(move |e| match &e.message {
                        Some(message) => format!("{field}: {message}"),
                        None => format!("{field} is invalid"),
                    })
                })
                .collect();
            AppError::unprocessable(anyhow::anyhow!("{}", details.join(", ")))
        })?;

        Ok(ValidatedJson(value))
    }
}
