//! Provisioning commands.
//!
//! Super admins can only be created from the command line, never through
//! the API. The stored permission set is irrelevant for a super admin (the
//! authorize primitive bypasses it) but is persisted as the full matrix so
//! exports and UIs show the truth.

use chrono::Utc;
use sqlx::PgPool;

use sudstack_core::PermissionSet;
use sudstack_models::{Account, AccountId, AccountRole};

use crate::store::{AccountStore, PgAccountStore};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

pub async fn create_super_admin(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<Account, AppError> {
    let store = PgAccountStore::new(pool.clone());

    if store
        .find_by_email(email)
        .await
        .map_err(|e| AppError::database(anyhow::anyhow!("{e}")))?
        .is_some()
    {
        return Err(AppError::conflict(anyhow::anyhow!(
            "An account with email {} already exists",
            email
        )));
    }

    let now = Utc::now();
    let account = Account {
        id: AccountId::new(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password_hash: hash_password(password)?,
        role: AccountRole::SuperAdmin,
        permissions: PermissionSet::full(),
        branch_id: None,
        created_by: None,
        active: true,
        email_verified: true,
        version: 0,
        created_at: now,
        updated_at: now,
    };

    store
        .insert(&account)
        .await
        .map_err(|e| AppError::database(anyhow::anyhow!("{e}")))
}
