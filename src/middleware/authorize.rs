//! Request-time authorization decision procedure.
//!
//! [`authorize`] is the single place access decisions are made, including
//! the super-admin bypass: no other code compares role tags. The check is a
//! pure function of the principal snapshot and the target pair, so it can
//! run many times per request, concurrently, with no side effects.
//!
//! Decision order:
//!
//! 1. no principal → `Unauthorized`
//! 2. super admin → allow, regardless of the stored permission set
//! 3. pair outside the taxonomy → `InvalidModuleOrAction` (route bug)
//! 4. otherwise → allow iff the stored set grants the pair

use sudstack_core::errors::AuthzError;
use sudstack_core::taxonomy::{Action, InvalidModuleOrAction, Module, permission_label};
use sudstack_models::{AccountRole, Principal};

/// Decide whether `principal` may perform `action` on `module`.
pub fn authorize(
    principal: Option<&Principal>,
    module: Module,
    action: Action,
) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthorized)?;

    if principal.role == AccountRole::SuperAdmin {
        return Ok(());
    }

    if !module.supports(action) {
        return Err(AuthzError::InvalidModuleOrAction(InvalidModuleOrAction {
            module,
            action,
        }));
    }

    if principal.permissions.read(module, action) {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied {
            missing: vec![permission_label(module, action)],
        })
    }
}

/// Allow only when every pair is granted; a denial lists all missing pairs.
pub fn require_all(
    principal: Option<&Principal>,
    pairs: &[(Module, Action)],
) -> Result<(), AuthzError> {
    let mut missing = Vec::new();
    for &(module, action) in pairs {
        match authorize(principal, module, action) {
            Ok(()) => {}
            Err(AuthzError::PermissionDenied { missing: m }) => missing.extend(m),
            Err(other) => return Err(other),
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied { missing })
    }
}

/// Allow when at least one pair is granted; a denial lists every pair that
/// was checked.
pub fn require_any(
    principal: Option<&Principal>,
    pairs: &[(Module, Action)],
) -> Result<(), AuthzError> {
    let mut missing = Vec::new();
    for &(module, action) in pairs {
        match authorize(principal, module, action) {
            Ok(()) => return Ok(()),
            Err(AuthzError::PermissionDenied { missing: m }) => missing.extend(m),
            Err(other) => return Err(other),
        }
    }
    Err(AuthzError::PermissionDenied { missing })
}

/// Allow when any action in `module` is granted. Advanced actions count,
/// not merely `view`.
pub fn require_module_access(
    principal: Option<&Principal>,
    module: Module,
) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthorized)?;

    if principal.role == AccountRole::SuperAdmin {
        return Ok(());
    }

    if principal.permissions.module_granted(module) {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied {
            missing: module
                .actions()
                .iter()
                .map(|&a| permission_label(module, a))
                .collect(),
        })
    }
}
