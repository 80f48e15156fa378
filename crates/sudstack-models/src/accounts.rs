//! Account hierarchy entities.
//!
//! Three account tiers form the hierarchy:
//!
//! ```text
//! Super Admin (provisioned via CLI, implicit full access)
//!     ↓ creates
//! Admins / Center Admins (stored permission set; center admins branch-bound)
//!     ↓ create
//! Staff (permission set ⊆ creating admin's set, branch inherited)
//! ```
//!
//! Accounts are soft-deleted only: `active` flips, rows stay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sudstack_core::PermissionSet;
use utoipa::ToSchema;

use crate::ids::{AccountId, BranchId};

/// Account tier tag.
///
/// The tag drives the hierarchy rules; the only place it grants access by
/// itself is the super-admin bypass inside the `authorize` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    SuperAdmin,
    Admin,
    CenterAdmin,
    Staff,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::SuperAdmin => "super_admin",
            AccountRole::Admin => "admin",
            AccountRole::CenterAdmin => "center_admin",
            AccountRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(AccountRole::SuperAdmin),
            "admin" => Some(AccountRole::Admin),
            "center_admin" => Some(AccountRole::CenterAdmin),
            "staff" => Some(AccountRole::Staff),
            _ => None,
        }
    }

    /// Admins and center admins: the tier that owns staff accounts.
    pub fn is_admin_tier(&self) -> bool {
        matches!(self, AccountRole::Admin | AccountRole::CenterAdmin)
    }

    /// Hierarchy level (higher number = more privileges).
    pub fn hierarchy_level(&self) -> u8 {
        match self {
            AccountRole::SuperAdmin => 2,
            AccountRole::Admin | AccountRole::CenterAdmin => 1,
            AccountRole::Staff => 0,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account record.
///
/// `version` implements optimistic concurrency: every update names the
/// version it read, and the store rejects stale writes instead of silently
/// overwriting (a lost update could widen permissions past the subset
/// invariant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password_hash: String,
    pub role: AccountRole,
    pub permissions: PermissionSet,
    /// Branch binding. Required for center admins, optional for admins;
    /// staff inherit their creator's value verbatim (including `None`).
    pub branch_id: Option<BranchId>,
    /// The account that created this one (lookup-only back-reference).
    pub created_by: Option<AccountId>,
    pub active: bool,
    pub email_verified: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The permission set authorization evaluates for this account.
    /// Super admins hold every permission regardless of stored data.
    pub fn effective_permissions(&self) -> PermissionSet {
        if self.role == AccountRole::SuperAdmin {
            PermissionSet::full()
        } else {
            self.permissions.clone()
        }
    }
}

/// The authenticated actor evaluated by authorization checks.
///
/// A snapshot resolved from token claims: plain data, no storage handle, so
/// checks against it are pure and freely repeatable within a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: AccountId,
    pub email: String,
    pub role: AccountRole,
    pub branch_id: Option<BranchId>,
    pub permissions: PermissionSet,
}

impl Principal {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            branch_id: account.branch_id,
            permissions: account.permissions.clone(),
        }
    }

    /// The set subordinate grants are validated against. Super admins
    /// dominate everything.
    pub fn effective_permissions(&self) -> PermissionSet {
        if self.role == AccountRole::SuperAdmin {
            PermissionSet::full()
        } else {
            self.permissions.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudstack_core::{Action, Module};

    #[test]
    fn test_role_parse_round_trip() {
        for role in [
            AccountRole::SuperAdmin,
            AccountRole::Admin,
            AccountRole::CenterAdmin,
            AccountRole::Staff,
        ] {
            assert_eq!(AccountRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(AccountRole::parse("manager"), None);
    }

    #[test]
    fn test_admin_tier() {
        assert!(AccountRole::Admin.is_admin_tier());
        assert!(AccountRole::CenterAdmin.is_admin_tier());
        assert!(!AccountRole::SuperAdmin.is_admin_tier());
        assert!(!AccountRole::Staff.is_admin_tier());
    }

    #[test]
    fn test_hierarchy_levels() {
        assert!(
            AccountRole::SuperAdmin.hierarchy_level() > AccountRole::Admin.hierarchy_level()
        );
        assert_eq!(
            AccountRole::Admin.hierarchy_level(),
            AccountRole::CenterAdmin.hierarchy_level()
        );
        assert!(AccountRole::Admin.hierarchy_level() > AccountRole::Staff.hierarchy_level());
    }

    fn sample_account(role: AccountRole) -> Account {
        Account {
            id: AccountId::new(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            phone: "+15550100".to_string(),
            password_hash: "hash".to_string(),
            role,
            permissions: PermissionSet::empty(),
            branch_id: None,
            created_by: None,
            active: true,
            email_verified: true,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_super_admin_effective_permissions_ignore_stored_set() {
        let account = sample_account(AccountRole::SuperAdmin);
        assert!(
            account
                .effective_permissions()
                .read(Module::Settings, Action::Delete)
        );
    }

    #[test]
    fn test_staff_effective_permissions_are_stored_set() {
        let account = sample_account(AccountRole::Staff);
        assert!(
            !account
                .effective_permissions()
                .read(Module::Orders, Action::View)
        );
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = sample_account(AccountRole::Admin);
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_principal_snapshot_matches_account() {
        let account = sample_account(AccountRole::CenterAdmin);
        let principal = Principal::from_account(&account);
        assert_eq!(principal.id, account.id);
        assert_eq!(principal.role, AccountRole::CenterAdmin);
        assert_eq!(principal.permissions, account.permissions);
    }
}
