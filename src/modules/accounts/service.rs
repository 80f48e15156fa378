//! Account hierarchy operations.
//!
//! All creation and mutation of accounts flows through [`AccountService`]:
//! super admins provision admins and center admins, admins provision staff,
//! and every permission grant a subordinate receives is validated against
//! the creator's *current* permission set. Each operation attempts an audit
//! record; audit failure never fails the operation (the sinks guarantee
//! that), and no operation here retries on its own.

use chrono::Utc;
use tracing::instrument;

use sudstack_core::audit::{AuditEvent, AuditSink, AuditStatus, RiskLevel};
use sudstack_core::{PermissionSet, PresetKey, get_preset, is_subset};
use sudstack_models::{Account, AccountId, AccountRole, BranchId, Principal};

use crate::store::AccountStore;
use crate::utils::errors::AccountError;
use crate::utils::password::hash_password;

use super::model::{CreateAdminDto, CreateStaffDto};

const RESOURCE_TYPE: &str = "account";
const CATEGORY: &str = "account_management";

#[derive(Debug, Clone)]
pub struct AccountService<S, A> {
    store: S,
    audit: A,
}

impl<S: AccountStore, A: AuditSink> AccountService<S, A> {
    pub fn new(store: S, audit: A) -> Self {
        Self { store, audit }
    }

    /// Create an admin account. Super admins only.
    #[instrument(skip(self, dto), fields(actor = %actor.id))]
    pub async fn create_admin(
        &self,
        actor: &Principal,
        dto: CreateAdminDto,
    ) -> Result<Account, AccountError> {
        self.create_admin_tier(actor, dto, AccountRole::Admin).await
    }

    /// Create a center-admin account. Super admins only; a branch binding
    /// is mandatory.
    #[instrument(skip(self, dto), fields(actor = %actor.id))]
    pub async fn create_center_admin(
        &self,
        actor: &Principal,
        dto: CreateAdminDto,
    ) -> Result<Account, AccountError> {
        self.create_admin_tier(actor, dto, AccountRole::CenterAdmin)
            .await
    }

    async fn create_admin_tier(
        &self,
        actor: &Principal,
        dto: CreateAdminDto,
        role: AccountRole,
    ) -> Result<Account, AccountError> {
        if actor.role != AccountRole::SuperAdmin {
            return Err(AccountError::Forbidden(
                "Only super admins can create admin accounts".to_string(),
            ));
        }
        if role == AccountRole::CenterAdmin && dto.branch_id.is_none() {
            return Err(AccountError::BranchRequired);
        }

        let permissions = resolve_requested(dto.permissions.as_ref(), dto.preset)?;
        self.check_duplicates(&dto.email, &dto.phone).await?;

        let account = self
            .persist_new(
                actor,
                role,
                dto.name,
                dto.email,
                dto.phone,
                &dto.password,
                permissions,
                dto.branch_id,
            )
            .await?;

        self.record_creation(actor, &account, dto.preset);
        Ok(account)
    }

    /// Create a staff account. Admin tier only: the new account's grants
    /// must be a subset of the actor's, and its branch is inherited from
    /// the actor verbatim (including no branch).
    #[instrument(skip(self, dto), fields(actor = %actor.id))]
    pub async fn create_staff(
        &self,
        actor: &Principal,
        dto: CreateStaffDto,
    ) -> Result<Account, AccountError> {
        if !actor.role.is_admin_tier() {
            return Err(AccountError::Forbidden(
                "Only admins can create staff accounts".to_string(),
            ));
        }
        if !actor.permissions.has_any_grant() {
            return Err(AccountError::Forbidden(
                "An admin without permissions cannot create staff".to_string(),
            ));
        }

        let permissions = resolve_requested(dto.permissions.as_ref(), dto.preset)?;
        let report = is_subset(&actor.effective_permissions(), &permissions);
        if !report.is_valid {
            // Over-provisioning attempts are worth a trail of their own.
            self.audit.record(AuditEvent {
                actor_id: Some(actor.id.as_uuid()),
                actor_type: actor.role.as_str().to_string(),
                action: "account.create".to_string(),
                category: CATEGORY.to_string(),
                description: format!(
                    "rejected staff creation exceeding creator permissions: {}",
                    report.violations.join(", ")
                ),
                resource_type: RESOURCE_TYPE.to_string(),
                resource_id: None,
                status: AuditStatus::Denied,
                risk_level: RiskLevel::Medium,
                before: None,
                after: None,
                metadata: Some(serde_json::json!({ "violations": report.violations.clone() })),
                timestamp: Utc::now(),
            });
            return Err(AccountError::InvalidPermissions {
                violations: report.violations,
            });
        }

        self.check_duplicates(&dto.email, &dto.phone).await?;

        let account = self
            .persist_new(
                actor,
                AccountRole::Staff,
                dto.name,
                dto.email,
                dto.phone,
                &dto.password,
                permissions,
                actor.branch_id,
            )
            .await?;

        self.record_creation(actor, &account, dto.preset);
        Ok(account)
    }

    /// Replace the target's permission set.
    ///
    /// Re-validates the subset invariant against the actor's *current* set
    /// when the target is staff: an admin whose own permissions were later
    /// reduced cannot keep over-privileged staff.
    #[instrument(skip(self, new_set), fields(actor = %actor.id, target = %target_id))]
    pub async fn update_permissions(
        &self,
        actor: &Principal,
        target_id: AccountId,
        new_set: PermissionSet,
    ) -> Result<Account, AccountError> {
        let target = self.authorized_target(actor, target_id).await?;

        let new_set = new_set.sanitized();
        if !new_set.has_any_grant() {
            return Err(AccountError::InvalidPermissions { violations: vec![] });
        }
        if target.role == AccountRole::Staff {
            let report = is_subset(&actor.effective_permissions(), &new_set);
            if !report.is_valid {
                return Err(AccountError::InvalidPermissions {
                    violations: report.violations,
                });
            }
        }

        let before = permissions_snapshot(&target.permissions);
        let mut updated = target.clone();
        updated.permissions = new_set;
        let updated = self.store.update(&updated, target.version).await?;

        self.audit.record(AuditEvent {
            actor_id: Some(actor.id.as_uuid()),
            actor_type: actor.role.as_str().to_string(),
            action: "account.update_permissions".to_string(),
            category: CATEGORY.to_string(),
            description: format!("updated permissions of {}", updated.email),
            resource_type: RESOURCE_TYPE.to_string(),
            resource_id: Some(updated.id.as_uuid()),
            status: AuditStatus::Success,
            risk_level: RiskLevel::High,
            before: Some(before),
            after: Some(permissions_snapshot(&updated.permissions)),
            metadata: None,
            timestamp: Utc::now(),
        });

        Ok(updated)
    }

    /// Deactivate the target. Admin-tier targets cascade: every account in
    /// their created-set goes inactive in the same atomic store operation.
    /// Re-deactivation is an error, not a no-op.
    #[instrument(skip(self), fields(actor = %actor.id, target = %target_id))]
    pub async fn deactivate(
        &self,
        actor: &Principal,
        target_id: AccountId,
        reason: &str,
    ) -> Result<(Account, u64), AccountError> {
        let target = self.authorized_target(actor, target_id).await?;
        if !target.active {
            return Err(AccountError::AlreadyDeactivated);
        }

        let (account, cascaded_count) = self
            .store
            .deactivate_with_children(target_id)
            .await
            .map_err(|e| match e {
                // Lost the race with another writer: the target went
                // inactive between our read and the cascade.
                crate::store::StoreError::VersionConflict => AccountError::AlreadyDeactivated,
                other => other.into(),
            })?;

        self.audit.record(AuditEvent {
            actor_id: Some(actor.id.as_uuid()),
            actor_type: actor.role.as_str().to_string(),
            action: "account.deactivate".to_string(),
            category: CATEGORY.to_string(),
            description: format!("deactivated {}", account.email),
            resource_type: RESOURCE_TYPE.to_string(),
            resource_id: Some(account.id.as_uuid()),
            status: AuditStatus::Success,
            risk_level: if cascaded_count > 0 {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            },
            before: Some(serde_json::json!({ "active": true })),
            after: Some(serde_json::json!({ "active": false })),
            metadata: Some(serde_json::json!({
                "reason": reason,
                "cascaded_count": cascaded_count,
            })),
            timestamp: Utc::now(),
        });

        Ok((account, cascaded_count))
    }

    /// Reactivate the target. Never cascades: previously cascaded accounts
    /// are reactivated one by one, deliberately.
    #[instrument(skip(self), fields(actor = %actor.id, target = %target_id))]
    pub async fn reactivate(
        &self,
        actor: &Principal,
        target_id: AccountId,
    ) -> Result<Account, AccountError> {
        let target = self.authorized_target(actor, target_id).await?;
        if target.active {
            return Err(AccountError::AlreadyActive);
        }

        let mut updated = target.clone();
        updated.active = true;
        let updated = self.store.update(&updated, target.version).await?;

        self.audit.record(AuditEvent {
            actor_id: Some(actor.id.as_uuid()),
            actor_type: actor.role.as_str().to_string(),
            action: "account.reactivate".to_string(),
            category: CATEGORY.to_string(),
            description: format!("reactivated {}", updated.email),
            resource_type: RESOURCE_TYPE.to_string(),
            resource_id: Some(updated.id.as_uuid()),
            status: AuditStatus::Success,
            risk_level: RiskLevel::Medium,
            before: Some(serde_json::json!({ "active": false })),
            after: Some(serde_json::json!({ "active": true })),
            metadata: None,
            timestamp: Utc::now(),
        });

        Ok(updated)
    }

    pub async fn get_account(
        &self,
        actor: &Principal,
        target_id: AccountId,
    ) -> Result<Account, AccountError> {
        self.authorized_target(actor, target_id).await
    }

    pub async fn list_accounts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Account>, i64), AccountError> {
        Ok(self.store.list(limit, offset).await?)
    }

    /// The accounts `target_id` created. Admin-tier actors may list their
    /// own roster; super admins may list anyone's.
    pub async fn list_created(
        &self,
        actor: &Principal,
        target_id: AccountId,
    ) -> Result<Vec<Account>, AccountError> {
        if actor.role != AccountRole::SuperAdmin && actor.id != target_id {
            return Err(AccountError::Forbidden(
                "You can only list accounts you created".to_string(),
            ));
        }
        self.store
            .find_by_id(target_id)
            .await?
            .ok_or(AccountError::NotFound)?;
        Ok(self.store.list_created_by(target_id).await?)
    }

    /// Fetch `target_id` and check the actor's authority over it: super
    /// admins reach anything except other super admins, admin-tier actors
    /// reach only accounts they created.
    async fn authorized_target(
        &self,
        actor: &Principal,
        target_id: AccountId,
    ) -> Result<Account, AccountError> {
        let target = self
            .store
            .find_by_id(target_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        match actor.role {
            AccountRole::SuperAdmin => {
                if target.role == AccountRole::SuperAdmin && target.id != actor.id {
                    return Err(AccountError::Forbidden(
                        "Super admin accounts are managed outside this API".to_string(),
                    ));
                }
            }
            AccountRole::Admin | AccountRole::CenterAdmin => {
                if target.created_by != Some(actor.id) {
                    return Err(AccountError::Forbidden(
                        "You can only manage accounts you created".to_string(),
                    ));
                }
            }
            AccountRole::Staff => {
                return Err(AccountError::Forbidden(
                    "Staff accounts cannot manage other accounts".to_string(),
                ));
            }
        }

        Ok(target)
    }

    async fn check_duplicates(&self, email: &str, phone: &str) -> Result<(), AccountError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AccountError::DuplicateEmail);
        }
        if self.store.find_by_phone(phone).await?.is_some() {
            return Err(AccountError::DuplicatePhone);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn persist_new(
        &self,
        actor: &Principal,
        role: AccountRole,
        name: String,
        email: String,
        phone: String,
        password: &str,
        permissions: PermissionSet,
        branch_id: Option<BranchId>,
    ) -> Result<Account, AccountError> {
        let password_hash =
            hash_password(password).map_err(|e| AccountError::Internal(e.to_string()))?;
        let now = Utc::now();

        let account = Account {
            id: AccountId::new(),
            name,
            email,
            phone,
            password_hash,
            role,
            permissions,
            branch_id,
            created_by: Some(actor.id),
            active: true,
            // Internal provisioning, not self-serve signup.
            email_verified: true,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        Ok(self.store.insert(&account).await?)
    }

    fn record_creation(&self, actor: &Principal, account: &Account, preset: Option<PresetKey>) {
        self.audit.record(AuditEvent {
            actor_id: Some(actor.id.as_uuid()),
            actor_type: actor.role.as_str().to_string(),
            action: "account.create".to_string(),
            category: CATEGORY.to_string(),
            description: format!(
                "created {} account {}",
                account.role, account.email
            ),
            resource_type: RESOURCE_TYPE.to_string(),
            resource_id: Some(account.id.as_uuid()),
            status: AuditStatus::Success,
            risk_level: if account.role.is_admin_tier() {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            },
            before: None,
            after: Some(permissions_snapshot(&account.permissions)),
            metadata: preset.map(|p| serde_json::json!({ "preset": p.as_str() })),
            timestamp: Utc::now(),
        });
    }
}

/// Resolve the requested permission set from an explicit set and/or a
/// preset shortcut. The explicit set wins when both are present. The result
/// is sanitized to the canonical shape and must contain at least one grant.
fn resolve_requested(
    explicit: Option<&PermissionSet>,
    preset: Option<PresetKey>,
) -> Result<PermissionSet, AccountError> {
    let set = match (explicit, preset) {
        (Some(set), _) => set.sanitized(),
        (None, Some(key)) => get_preset(key).permissions.clone(),
        (None, None) => PermissionSet::empty(),
    };
    if !set.has_any_grant() {
        return Err(AccountError::InvalidPermissions { violations: vec![] });
    }
    Ok(set)
}

fn permissions_snapshot(set: &PermissionSet) -> serde_json::Value {
    serde_json::to_value(set).unwrap_or(serde_json::Value::Null)
}
