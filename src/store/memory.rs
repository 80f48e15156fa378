//! In-memory account store.
//!
//! Backs the test suite and local experiments. A single mutex guards the
//! map, which also gives the cascade operation its atomicity: nobody
//! observes a half-applied deactivation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sudstack_models::{Account, AccountId};

use super::{AccountStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<BTreeMap<AccountId, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<AccountId, Account>> {
        self.accounts.lock().expect("account store poisoned")
    }
}

impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: &Account) -> Result<Account, StoreError> {
        let mut accounts = self.lock();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if accounts.values().any(|a| a.phone == account.phone) {
            return Err(StoreError::DuplicatePhone);
        }
        accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn update(
        &self,
        account: &Account,
        expected_version: i64,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.lock();
        let stored = accounts.get_mut(&account.id).ok_or(StoreError::NotFound)?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict);
        }
        let mut updated = account.clone();
        updated.version = expected_version + 1;
        updated.updated_at = Utc::now();
        *stored = updated.clone();
        Ok(updated)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().values().find(|a| a.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().values().find(|a| a.phone == phone).cloned())
    }

    async fn list_created_by(&self, creator: AccountId) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .lock()
            .values()
            .filter(|a| a.created_by == Some(creator))
            .cloned()
            .collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Account>, i64), StoreError> {
        let accounts = self.lock();
        let total = accounts.len() as i64;
        let page = accounts
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn deactivate_with_children(
        &self,
        parent: AccountId,
    ) -> Result<(Account, u64), StoreError> {
        // One guard for the whole cascade keeps it atomic.
        let mut accounts = self.lock();
        let now = Utc::now();

        let parent_account = accounts.get_mut(&parent).ok_or(StoreError::NotFound)?;
        if !parent_account.active {
            return Err(StoreError::VersionConflict);
        }
        parent_account.active = false;
        parent_account.version += 1;
        parent_account.updated_at = now;
        let deactivated = parent_account.clone();

        let mut cascaded = 0u64;
        for account in accounts.values_mut() {
            if account.created_by == Some(parent) && account.active {
                account.active = false;
                account.version += 1;
                account.updated_at = now;
                cascaded += 1;
            }
        }

        Ok((deactivated, cascaded))
    }
}
