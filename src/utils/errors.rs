//! Domain errors for account hierarchy operations.
//!
//! Every failure mode of the account operations has its own variant; the
//! `From<AccountError> for AppError` impl fixes the HTTP status mapping in
//! one place. Validation errors are reported in full (the entire violation
//! list, not just the first pair).

use thiserror::Error;

pub use sudstack_core::errors::AppError;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AccountError {
    /// Requested set exceeds the creator's, or is all-false. `violations`
    /// lists every offending `module.action`; empty means the set had no
    /// grants at all.
    #[error("invalid permissions{}", format_violations(.violations))]
    InvalidPermissions { violations: Vec<String> },

    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("an account with this phone number already exists")]
    DuplicatePhone,

    #[error("a center admin account requires a branch")]
    BranchRequired,

    #[error("{0}")]
    Forbidden(String),

    #[error("account is already deactivated")]
    AlreadyDeactivated,

    #[error("account is already active")]
    AlreadyActive,

    #[error("account not found")]
    NotFound,

    #[error("account was modified concurrently, retry the operation")]
    VersionConflict,

    #[error(transparent)]
    Store(StoreError),

    #[error("{0}")]
    Internal(String),
}

fn format_violations(violations: &[String]) -> String {
    if violations.is_empty() {
        ": at least one permission must be granted".to_string()
    } else {
        format!(": exceeds creator permissions on {}", violations.join(", "))
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AccountError::DuplicateEmail,
            StoreError::DuplicatePhone => AccountError::DuplicatePhone,
            StoreError::NotFound => AccountError::NotFound,
            StoreError::VersionConflict => AccountError::VersionConflict,
            other => AccountError::Store(other),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match &err {
            AccountError::InvalidPermissions { .. } | AccountError::BranchRequired => {
                AppError::unprocessable(anyhow::anyhow!("{err}"))
            }
            AccountError::DuplicateEmail
            | AccountError::DuplicatePhone
            | AccountError::AlreadyDeactivated
            | AccountError::AlreadyActive
            | AccountError::VersionConflict => AppError::conflict(anyhow::anyhow!("{err}")),
            AccountError::Forbidden(_) => AppError::forbidden(err.to_string()),
            AccountError::NotFound => AppError::not_found(anyhow::anyhow!("{err}")),
            AccountError::Store(_) | AccountError::Internal(_) => {
                AppError::database(anyhow::anyhow!("{err}"))
            }
        }
    }
}
