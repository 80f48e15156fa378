//! PostgreSQL-backed account store.
//!
//! Uses the runtime query API with manual row mapping. Permissions are
//! stored as JSONB in the account row; the unique indexes on email and
//! phone are the authority for duplicate detection. The cascade
//! deactivation runs inside a single transaction.

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use sudstack_core::PermissionSet;
use sudstack_models::{Account, AccountId, AccountRole, BranchId};

use super::{AccountStore, StoreError};

const ACCOUNT_COLUMNS: &str = "id, name, email, phone, password_hash, role, permissions, \
     branch_id, created_by, active, email_verified, version, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    let role_str: String = row.try_get("role")?;
    let role = AccountRole::parse(&role_str).ok_or_else(|| {
        sqlx::Error::Decode(format!("unknown account role `{role_str}`").into())
    })?;
    let Json(permissions): Json<PermissionSet> = row.try_get("permissions")?;

    Ok(Account {
        id: row.try_get::<AccountId, _>("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        password_hash: row.try_get("password_hash")?,
        role,
        permissions,
        branch_id: row.try_get::<Option<BranchId>, _>("branch_id")?,
        created_by: row.try_get::<Option<AccountId>, _>("created_by")?,
        active: row.try_get("active")?,
        email_verified: row.try_get("email_verified")?,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_unique_violation(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("email") {
                return StoreError::DuplicateEmail;
            }
            if constraint.contains("phone") {
                return StoreError::DuplicatePhone;
            }
        }
    }
    StoreError::Database(e)
}

impl AccountStore for PgAccountStore {
    async fn insert(&self, account: &Account) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO accounts \
             (id, name, email, phone, password_hash, role, permissions, branch_id, \
              created_by, active, email_verified, version, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(account.id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(Json(&account.permissions))
            .bind(account.branch_id)
            .bind(account.created_by)
            .bind(account.active)
            .bind(account.email_verified)
            .bind(account.version)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(account_from_row(&row)?)
    }

    async fn update(
        &self,
        account: &Account,
        expected_version: i64,
    ) -> Result<Account, StoreError> {
        let sql = format!(
            "UPDATE accounts SET \
             name = $2, email = $3, phone = $4, password_hash = $5, permissions = $6, \
             branch_id = $7, active = $8, email_verified = $9, \
             version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $10 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(account.id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.phone)
            .bind(&account.password_hash)
            .bind(Json(&account.permissions))
            .bind(account.branch_id)
            .bind(account.active)
            .bind(account.email_verified)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        match row {
            Some(row) => Ok(account_from_row(&row)?),
            // Distinguish a stale version from a missing record.
            None => match self.find_by_id(account.id).await? {
                Some(_) => Err(StoreError::VersionConflict),
                None => Err(StoreError::NotFound),
            },
        }
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose().map_err(Into::into)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose().map_err(Into::into)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone = $1");
        let row = sqlx::query(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose().map_err(Into::into)
    }

    async fn list_created_by(&self, creator: AccountId) -> Result<Vec<Account>, StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE created_by = $1 ORDER BY created_at"
        );
        let rows = sqlx::query(&sql)
            .bind(creator)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(account_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Account>, i64), StoreError> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let accounts = rows
            .iter()
            .map(account_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok((accounts, total))
    }

    async fn deactivate_with_children(
        &self,
        parent: AccountId,
    ) -> Result<(Account, u64), StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE accounts SET active = FALSE, version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND active = TRUE \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(parent)
            .fetch_optional(&mut *tx)
            .await?;

        let deactivated = match row {
            Some(row) => account_from_row(&row)?,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
                        .bind(parent)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists {
                    StoreError::VersionConflict
                } else {
                    StoreError::NotFound
                });
            }
        };

        let cascaded = sqlx::query(
            "UPDATE accounts SET active = FALSE, version = version + 1, updated_at = NOW() \
             WHERE created_by = $1 AND active = TRUE",
        )
        .bind(parent)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok((deactivated, cascaded))
    }
}
