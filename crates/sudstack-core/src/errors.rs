//! Application error types.
//!
//! [`AppError`] is the HTTP-facing error: a status code plus a source error,
//! rendered as a JSON body. [`AuthzError`] is the typed outcome of the
//! authorization primitives; conversion into `AppError` fixes the status
//! mapping in one place.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

use crate::taxonomy::InvalidModuleOrAction;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal_error<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Outcome of a denied authorization check.
///
/// `Unauthorized` and `PermissionDenied` are expected client errors;
/// `InvalidModuleOrAction` signals a misconfigured route and maps to a
/// server error.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthorized,

    #[error(transparent)]
    InvalidModuleOrAction(#[from] InvalidModuleOrAction),

    #[error("missing permission: {}", missing.join(", "))]
    PermissionDenied { missing: Vec<String> },
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match &err {
            AuthzError::Unauthorized => AppError::unauthorized(err.to_string()),
            AuthzError::PermissionDenied { .. } => AppError::forbidden(err.to_string()),
            // A route asking for a pair outside the taxonomy is a
            // programming error, not an access problem.
            AuthzError::InvalidModuleOrAction(_) => AppError::internal_error(anyhow::anyhow!(
                "{err}"
            )),
        }
    }
}
