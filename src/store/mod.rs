//! Identity store contract.
//!
//! The account hierarchy services talk to storage through [`AccountStore`]
//! so the same logic runs against PostgreSQL in production and the
//! in-memory store in tests. Implementations must enforce unique indexes on
//! email and phone, and must apply [`AccountStore::deactivate_with_children`]
//! as one atomic unit: readers never observe a deactivated parent with
//! still-active children.

pub mod memory;
pub mod postgres;

use thiserror::Error;

use sudstack_models::{Account, AccountId};

pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

/// Storage-level failures.
///
/// Duplicate variants back-stop the service's pre-checks against races; the
/// unique indexes are the source of truth.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("an account with this phone number already exists")]
    DuplicatePhone,

    #[error("account not found")]
    NotFound,

    /// The record changed since it was read. Callers retry; the store never
    /// applies last-write-wins.
    #[error("account was modified concurrently")]
    VersionConflict,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence seam for account records.
#[allow(async_fn_in_trait)]
pub trait AccountStore: Send + Sync {
    /// Persist a new account. Fails with a duplicate variant when the email
    /// or phone is already taken.
    async fn insert(&self, account: &Account) -> Result<Account, StoreError>;

    /// Compare-and-set write: applies `account` only if the stored version
    /// still equals `expected_version`, bumping version and `updated_at`.
    async fn update(&self, account: &Account, expected_version: i64)
    -> Result<Account, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError>;

    /// Accounts whose `created_by` points at `creator`.
    async fn list_created_by(&self, creator: AccountId) -> Result<Vec<Account>, StoreError>;

    /// Page of accounts plus the total count.
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Account>, i64), StoreError>;

    /// Deactivate `parent` and every active account it created, in one
    /// atomic unit. Returns the deactivated parent and the number of
    /// children affected. Fails with [`StoreError::VersionConflict`] when
    /// the parent is already inactive (lost race with another writer).
    async fn deactivate_with_children(
        &self,
        parent: AccountId,
    ) -> Result<(Account, u64), StoreError>;
}
