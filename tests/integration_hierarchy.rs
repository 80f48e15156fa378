//! End-to-end tests of the account hierarchy against the in-memory store.

use sudstack::modules::accounts::model::{CreateAdminDto, CreateStaffDto};
use sudstack::modules::accounts::service::AccountService;
use sudstack::store::{AccountStore, InMemoryAccountStore, StoreError};
use sudstack::utils::errors::AccountError;
use sudstack_core::audit::MemoryAuditSink;
use sudstack_core::{Action, Module, PermissionSet, PresetKey};
use sudstack_models::{AccountId, AccountRole, BranchId, Principal};

type TestService = AccountService<InMemoryAccountStore, MemoryAuditSink>;

fn service() -> (TestService, InMemoryAccountStore, MemoryAuditSink) {
    let store = InMemoryAccountStore::new();
    let audit = MemoryAuditSink::new();
    let service = AccountService::new(store.clone(), audit.clone());
    (service, store, audit)
}

fn super_admin() -> Principal {
    Principal {
        id: AccountId::new(),
        email: "root@suds.example".to_string(),
        role: AccountRole::SuperAdmin,
        branch_id: None,
        permissions: PermissionSet::empty(),
    }
}

fn admin_dto(tag: &str) -> CreateAdminDto {
    CreateAdminDto {
        name: format!("Admin {tag}"),
        email: format!("{tag}@suds.example"),
        phone: format!("+1555{tag}"),
        password: "spin-cycle-99".to_string(),
        permissions: None,
        preset: Some(PresetKey::BranchManager),
        branch_id: None,
    }
}

fn staff_dto(tag: &str, permissions: Option<PermissionSet>) -> CreateStaffDto {
    CreateStaffDto {
        name: format!("Staff {tag}"),
        email: format!("{tag}@suds.example"),
        phone: format!("+1666{tag}"),
        password: "press-and-fold".to_string(),
        permissions,
        preset: None,
    }
}

fn orders_only() -> PermissionSet {
    let mut set = PermissionSet::empty();
    set.set(Module::Orders, Action::View, true).unwrap();
    set.set(Module::Orders, Action::Create, true).unwrap();
    set
}

async fn provision_admin(service: &TestService, tag: &str) -> Principal {
    let account = service
        .create_admin(&super_admin(), admin_dto(tag))
        .await
        .unwrap();
    Principal::from_account(&account)
}

// ---- creation ----

#[tokio::test]
async fn test_super_admin_creates_admin() {
    let (service, store, audit) = service();
    let root = super_admin();

    let account = service.create_admin(&root, admin_dto("0001")).await.unwrap();

    assert_eq!(account.role, AccountRole::Admin);
    assert!(account.active);
    assert!(account.email_verified);
    assert_eq!(account.created_by, Some(root.id));
    // Preset shortcut applied.
    assert!(account.permissions.read(Module::Orders, Action::Delete));
    assert!(!account.permissions.read(Module::Financial, Action::Approve));

    let stored = store.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.permissions, account.permissions);

    assert_eq!(audit.len(), 1);
    let event = &audit.events()[0];
    assert_eq!(event.action, "account.create");
    assert_eq!(event.actor_id, Some(root.id.as_uuid()));
    assert!(event.after.is_some());
}

#[tokio::test]
async fn test_only_super_admins_create_admin_tier() {
    let (service, _, _) = service();
    let admin = provision_admin(&service, "0002").await;

    let err = service
        .create_admin(&admin, admin_dto("0003"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    let err = service
        .create_center_admin(&admin, admin_dto("0004"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));
}

#[tokio::test]
async fn test_center_admin_requires_branch() {
    let (service, _, _) = service();
    let root = super_admin();

    let err = service
        .create_center_admin(&root, admin_dto("0005"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::BranchRequired));

    let branch = BranchId::new();
    let mut dto = admin_dto("0006");
    dto.branch_id = Some(branch);
    let account = service.create_center_admin(&root, dto).await.unwrap();
    assert_eq!(account.role, AccountRole::CenterAdmin);
    assert_eq!(account.branch_id, Some(branch));
}

#[tokio::test]
async fn test_duplicate_email_and_phone_are_rejected_before_write() {
    let (service, store, _) = service();
    let root = super_admin();
    service.create_admin(&root, admin_dto("0007")).await.unwrap();

    let mut same_email = admin_dto("0008");
    same_email.email = "0007@suds.example".to_string();
    assert!(matches!(
        service.create_admin(&root, same_email).await.unwrap_err(),
        AccountError::DuplicateEmail
    ));

    let mut same_phone = admin_dto("0009");
    same_phone.phone = "+15550007".to_string();
    assert!(matches!(
        service.create_admin(&root, same_phone).await.unwrap_err(),
        AccountError::DuplicatePhone
    ));

    // Nothing partial was written.
    let (_, total) = store.list(100, 0).await.unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_admin_creates_staff_within_subset() {
    let (service, _, audit) = service();
    let admin = provision_admin(&service, "0010").await;

    let staff = service
        .create_staff(&admin, staff_dto("0011", Some(orders_only())))
        .await
        .unwrap();

    assert_eq!(staff.role, AccountRole::Staff);
    assert_eq!(staff.created_by, Some(admin.id));
    assert!(staff.permissions.read(Module::Orders, Action::View));
    assert!(!staff.permissions.read(Module::Orders, Action::Delete));
    // Creation of admin + staff both audited.
    assert_eq!(audit.len(), 2);
}

#[tokio::test]
async fn test_staff_exceeding_admin_set_is_rejected_with_violations() {
    let (service, _, audit) = service();
    let root = super_admin();

    // Admin with orders only, nothing in financial.
    let mut dto = admin_dto("0012");
    dto.preset = None;
    dto.permissions = Some(orders_only());
    let admin = Principal::from_account(&service.create_admin(&root, dto).await.unwrap());

    let mut wanted = orders_only();
    wanted.set(Module::Financial, Action::View, true).unwrap();

    let err = service
        .create_staff(&admin, staff_dto("0013", Some(wanted)))
        .await
        .unwrap_err();
    match err {
        AccountError::InvalidPermissions { violations } => {
            assert_eq!(violations, vec!["financial.view"]);
        }
        other => panic!("expected InvalidPermissions, got {other:?}"),
    }

    // The rejected attempt leaves a denied audit record.
    let event = audit.events().into_iter().last().unwrap();
    assert_eq!(event.status, sudstack_core::audit::AuditStatus::Denied);
    assert_eq!(event.metadata.unwrap()["violations"][0], "financial.view");
}

#[tokio::test]
async fn test_staff_with_no_grants_is_rejected() {
    let (service, _, _) = service();
    let admin = provision_admin(&service, "0014").await;

    // Omitted permissions resolve to the empty set.
    let err = service
        .create_staff(&admin, staff_dto("0015", None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::InvalidPermissions { violations } if violations.is_empty()
    ));

    let err = service
        .create_staff(&admin, staff_dto("0016", Some(PermissionSet::empty())))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidPermissions { .. }));
}

#[tokio::test]
async fn test_staff_and_super_admin_cannot_create_staff() {
    let (service, _, _) = service();
    let admin = provision_admin(&service, "0017").await;
    let staff_account = service
        .create_staff(&admin, staff_dto("0018", Some(orders_only())))
        .await
        .unwrap();
    let staff = Principal::from_account(&staff_account);

    let err = service
        .create_staff(&staff, staff_dto("0019", Some(orders_only())))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    // The root provisions admins, not staff.
    let err = service
        .create_staff(&super_admin(), staff_dto("0020", Some(orders_only())))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));
}

#[tokio::test]
async fn test_admin_with_all_false_set_cannot_create_staff() {
    let (service, store, _) = service();
    let admin = provision_admin(&service, "0021").await;

    // Simulate an admin whose grants were wiped at the store level.
    let mut stored = store.find_by_id(admin.id).await.unwrap().unwrap();
    stored.permissions = PermissionSet::empty();
    let stored = store.update(&stored, stored.version).await.unwrap();
    let hollow_admin = Principal::from_account(&stored);

    let err = service
        .create_staff(&hollow_admin, staff_dto("0022", Some(orders_only())))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));
}

// ---- branch inheritance ----

#[tokio::test]
async fn test_staff_inherits_branch_from_center_admin() {
    let (service, _, _) = service();
    let root = super_admin();
    let branch = BranchId::new();

    let mut dto = admin_dto("0023");
    dto.branch_id = Some(branch);
    let center_admin =
        Principal::from_account(&service.create_center_admin(&root, dto).await.unwrap());

    let staff = service
        .create_staff(&center_admin, staff_dto("0024", Some(orders_only())))
        .await
        .unwrap();
    assert_eq!(staff.branch_id, Some(branch));
}

#[tokio::test]
async fn test_staff_inherits_missing_branch_verbatim() {
    let (service, _, _) = service();
    // Plain admin without a branch: staff gets no branch either.
    let admin = provision_admin(&service, "0025").await;
    assert_eq!(admin.branch_id, None);

    let staff = service
        .create_staff(&admin, staff_dto("0026", Some(orders_only())))
        .await
        .unwrap();
    assert_eq!(staff.branch_id, None);
}

#[tokio::test]
async fn test_admin_lists_only_its_own_roster() {
    let (service, _, _) = service();
    let admin_a = provision_admin(&service, "0060").await;
    let admin_b = provision_admin(&service, "0061").await;
    let staff = service
        .create_staff(&admin_a, staff_dto("0062", Some(orders_only())))
        .await
        .unwrap();

    let roster = service.list_created(&admin_a, admin_a.id).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, staff.id);

    // Peeking at another admin's roster is refused.
    let err = service
        .list_created(&admin_b, admin_a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    // The root sees everyone's.
    let roster = service
        .list_created(&super_admin(), admin_a.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);
}

// ---- permission updates ----

#[tokio::test]
async fn test_update_permissions_replaces_set_and_audits_before_after() {
    let (service, _, audit) = service();
    let admin = provision_admin(&service, "0027").await;
    let staff = service
        .create_staff(&admin, staff_dto("0028", Some(orders_only())))
        .await
        .unwrap();

    let mut new_set = orders_only();
    new_set.set(Module::Orders, Action::Cancel, true).unwrap();

    let updated = service
        .update_permissions(&admin, staff.id, new_set.clone())
        .await
        .unwrap();
    assert_eq!(updated.permissions, new_set.sanitized());
    assert_eq!(updated.version, staff.version + 1);

    let event = audit.events().into_iter().last().unwrap();
    assert_eq!(event.action, "account.update_permissions");
    assert!(event.before.is_some());
    assert!(event.after.is_some());
    assert_ne!(event.before, event.after);
}

#[tokio::test]
async fn test_update_revalidates_against_admins_current_set() {
    let (service, store, _) = service();
    let admin = provision_admin(&service, "0029").await;
    let staff = service
        .create_staff(&admin, staff_dto("0030", Some(orders_only())))
        .await
        .unwrap();

    // The admin is later downgraded to viewer-like access.
    let mut stored = store.find_by_id(admin.id).await.unwrap().unwrap();
    let mut reduced = PermissionSet::empty();
    reduced.set(Module::Orders, Action::View, true).unwrap();
    stored.permissions = reduced;
    let stored = store.update(&stored, stored.version).await.unwrap();
    let downgraded = Principal::from_account(&stored);

    // Re-granting the staff's old permissions now fails: the admin no
    // longer dominates orders.create.
    let err = service
        .update_permissions(&downgraded, staff.id, orders_only())
        .await
        .unwrap_err();
    match err {
        AccountError::InvalidPermissions { violations } => {
            assert_eq!(violations, vec!["orders.create"]);
        }
        other => panic!("expected InvalidPermissions, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_rejects_all_false_set() {
    let (service, _, _) = service();
    let admin = provision_admin(&service, "0031").await;
    let staff = service
        .create_staff(&admin, staff_dto("0032", Some(orders_only())))
        .await
        .unwrap();

    let err = service
        .update_permissions(&admin, staff.id, PermissionSet::empty())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidPermissions { .. }));
}

#[tokio::test]
async fn test_admins_cannot_touch_other_admins_staff() {
    let (service, _, _) = service();
    let admin_a = provision_admin(&service, "0033").await;
    let admin_b = provision_admin(&service, "0034").await;
    let staff = service
        .create_staff(&admin_a, staff_dto("0035", Some(orders_only())))
        .await
        .unwrap();

    let err = service
        .update_permissions(&admin_b, staff.id, orders_only())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));

    let err = service
        .deactivate(&admin_b, staff.id, "not mine")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Forbidden(_)));
}

#[tokio::test]
async fn test_super_admin_updates_any_staff() {
    let (service, _, _) = service();
    let root = super_admin();
    let admin = provision_admin(&service, "0036").await;
    let staff = service
        .create_staff(&admin, staff_dto("0037", Some(orders_only())))
        .await
        .unwrap();

    // Root authority isn't limited by the created-by link, and its
    // effective set dominates everything.
    let updated = service
        .update_permissions(&root, staff.id, PermissionSet::full())
        .await
        .unwrap();
    assert!(updated.permissions.read(Module::Settings, Action::Delete));
}

#[tokio::test]
async fn test_update_of_missing_account_is_not_found() {
    let (service, _, _) = service();
    let err = service
        .update_permissions(&super_admin(), AccountId::new(), orders_only())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound));
}

// ---- deactivation & cascade ----

#[tokio::test]
async fn test_deactivating_admin_cascades_to_all_staff() {
    let (service, store, audit) = service();
    let root = super_admin();
    let admin = provision_admin(&service, "0038").await;

    let mut staff_ids = Vec::new();
    for i in 0..5 {
        let staff = service
            .create_staff(&admin, staff_dto(&format!("004{i}"), Some(orders_only())))
            .await
            .unwrap();
        staff_ids.push(staff.id);
    }

    let (account, cascaded) = service
        .deactivate(&root, admin.id, "branch closure")
        .await
        .unwrap();
    assert!(!account.active);
    assert_eq!(cascaded, 5);

    for id in &staff_ids {
        let staff = store.find_by_id(*id).await.unwrap().unwrap();
        assert!(!staff.active, "staff {id} survived the cascade");
    }

    let event = audit.events().into_iter().last().unwrap();
    assert_eq!(event.action, "account.deactivate");
    let metadata = event.metadata.unwrap();
    assert_eq!(metadata["cascaded_count"], 5);
    assert_eq!(metadata["reason"], "branch closure");
}

#[tokio::test]
async fn test_deactivating_admin_without_staff_succeeds_with_zero() {
    let (service, _, _) = service();
    let root = super_admin();
    let admin = provision_admin(&service, "0045").await;

    let (_, cascaded) = service.deactivate(&root, admin.id, "unused").await.unwrap();
    assert_eq!(cascaded, 0);
}

#[tokio::test]
async fn test_re_deactivation_is_rejected() {
    let (service, _, _) = service();
    let root = super_admin();
    let admin = provision_admin(&service, "0046").await;

    service.deactivate(&root, admin.id, "first").await.unwrap();
    let err = service
        .deactivate(&root, admin.id, "second")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::AlreadyDeactivated));
}

#[tokio::test]
async fn test_admin_deactivates_own_staff_without_cascade_targets() {
    let (service, _, _) = service();
    let admin = provision_admin(&service, "0047").await;
    let staff = service
        .create_staff(&admin, staff_dto("0048", Some(orders_only())))
        .await
        .unwrap();

    let (account, cascaded) = service
        .deactivate(&admin, staff.id, "left the company")
        .await
        .unwrap();
    assert!(!account.active);
    assert_eq!(cascaded, 0);
}

#[tokio::test]
async fn test_reactivation_does_not_cascade() {
    let (service, store, _) = service();
    let root = super_admin();
    let admin = provision_admin(&service, "0049").await;
    let staff = service
        .create_staff(&admin, staff_dto("0050", Some(orders_only())))
        .await
        .unwrap();

    service.deactivate(&root, admin.id, "audit hold").await.unwrap();

    let reactivated = service.reactivate(&root, admin.id).await.unwrap();
    assert!(reactivated.active);

    // The cascaded staff stays down until reactivated individually.
    let staff_after = store.find_by_id(staff.id).await.unwrap().unwrap();
    assert!(!staff_after.active);

    let err = service.reactivate(&root, admin.id).await.unwrap_err();
    assert!(matches!(err, AccountError::AlreadyActive));
}

// ---- concurrency ----

#[tokio::test]
async fn test_stale_writes_are_rejected_not_merged() {
    let (_, store, _) = service();
    let root = super_admin();
    let service = AccountService::new(store.clone(), MemoryAuditSink::new());
    let admin = service
        .create_admin(&root, admin_dto("0051"))
        .await
        .unwrap();

    // Two writers read version 0; the second write must fail.
    let mut first = admin.clone();
    first.name = "First Writer".to_string();
    store.update(&first, admin.version).await.unwrap();

    let mut second = admin.clone();
    second.name = "Second Writer".to_string();
    let err = store.update(&second, admin.version).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict));
}

#[tokio::test]
async fn test_permissions_round_trip_through_the_store() {
    let (service, store, _) = service();
    let root = super_admin();

    let mut dto = admin_dto("0052");
    dto.preset = None;
    let mut requested = PermissionSet::empty();
    requested.set(Module::Orders, Action::Refund, true).unwrap();
    requested.set(Module::Users, Action::AssignRole, true).unwrap();
    dto.permissions = Some(requested.clone());

    let created = service.create_admin(&root, dto).await.unwrap();
    let stored = store.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(stored.permissions, requested.sanitized());
    assert_eq!(
        serde_json::to_string(&stored.permissions).unwrap(),
        serde_json::to_string(&requested.sanitized()).unwrap()
    );
}
