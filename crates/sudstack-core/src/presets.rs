//! Preset role templates.
//!
//! Four well-known permission templates usable as shortcuts when creating
//! accounts. The registry is built once on first access and never written
//! again; [`get_preset`] always returns the same bit-identical permissions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::permission_set::PermissionSet;
use crate::taxonomy::{Action, Module};

/// Well-known preset identifiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum PresetKey {
    Viewer,
    Manager,
    FinanceAdmin,
    BranchManager,
}

impl PresetKey {
    /// All preset keys, in registry order.
    pub const ALL: [PresetKey; 4] = [
        PresetKey::Viewer,
        PresetKey::Manager,
        PresetKey::FinanceAdmin,
        PresetKey::BranchManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetKey::Viewer => "viewer",
            PresetKey::Manager => "manager",
            PresetKey::FinanceAdmin => "financeAdmin",
            PresetKey::BranchManager => "branchManager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "viewer" => Some(PresetKey::Viewer),
            "manager" => Some(PresetKey::Manager),
            "financeAdmin" => Some(PresetKey::FinanceAdmin),
            "branchManager" => Some(PresetKey::BranchManager),
            _ => None,
        }
    }
}

impl std::fmt::Display for PresetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, immutable permission template.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresetRole {
    pub key: PresetKey,
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: PermissionSet,
}

/// Listing entry for account-creation UIs; permissions are fetched via
/// [`get_preset`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresetSummary {
    pub key: PresetKey,
    pub name: &'static str,
    pub description: &'static str,
}

fn grant_all(set: &mut PermissionSet, module: Module, actions: &[Action]) {
    for &action in actions {
        set.set(module, action, true).expect("preset grant in taxonomy");
    }
}

fn viewer() -> PermissionSet {
    let mut set = PermissionSet::empty();
    for module in Module::ALL {
        grant_all(&mut set, module, &[Action::View]);
    }
    set
}

fn manager() -> PermissionSet {
    let mut set = PermissionSet::empty();
    grant_all(
        &mut set,
        Module::Orders,
        &[
            Action::View,
            Action::Create,
            Action::Update,
            Action::Assign,
            Action::Cancel,
        ],
    );
    grant_all(
        &mut set,
        Module::Customers,
        &[Action::View, Action::Create, Action::Update],
    );
    grant_all(&mut set, Module::Users, &[Action::View, Action::Create]);
    grant_all(&mut set, Module::Reports, &[Action::View, Action::Export]);
    set
}

fn finance_admin() -> PermissionSet {
    let mut set = PermissionSet::empty();
    grant_all(
        &mut set,
        Module::Financial,
        &[
            Action::View,
            Action::Create,
            Action::Update,
            Action::Approve,
            Action::Export,
        ],
    );
    grant_all(&mut set, Module::Reports, &[Action::View, Action::Export]);
    grant_all(&mut set, Module::Orders, &[Action::View, Action::Refund]);
    set
}

fn branch_manager() -> PermissionSet {
    let mut set = PermissionSet::full();
    set.set(Module::Financial, Action::Approve, false)
        .expect("taxonomy pair");
    set
}

static REGISTRY: LazyLock<BTreeMap<PresetKey, PresetRole>> = LazyLock::new(|| {
    BTreeMap::from([
        (
            PresetKey::Viewer,
            PresetRole {
                key: PresetKey::Viewer,
                name: "Viewer",
                description: "Read-only access to every module",
                permissions: viewer(),
            },
        ),
        (
            PresetKey::Manager,
            PresetRole {
                key: PresetKey::Manager,
                name: "Manager",
                description: "Day-to-day order and customer operations",
                permissions: manager(),
            },
        ),
        (
            PresetKey::FinanceAdmin,
            PresetRole {
                key: PresetKey::FinanceAdmin,
                name: "Finance Admin",
                description: "Financial records, approvals, exports and refunds",
                permissions: finance_admin(),
            },
        ),
        (
            PresetKey::BranchManager,
            PresetRole {
                key: PresetKey::BranchManager,
                name: "Branch Manager",
                description: "Broad branch-level access without financial approval",
                permissions: branch_manager(),
            },
        ),
    ])
});

/// Look up a preset by key. Idempotent: the returned permissions are the
/// same bit-identical value on every call.
pub fn get_preset(key: PresetKey) -> &'static PresetRole {
    REGISTRY.get(&key).expect("all preset keys registered")
}

/// The preset catalog (key, name, description), in registry order.
pub fn list_presets() -> Vec<PresetSummary> {
    REGISTRY
        .values()
        .map(|preset| PresetSummary {
            key: preset.key,
            name: preset.name,
            description: preset.description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_presets() {
        let listing = list_presets();
        assert_eq!(listing.len(), 4);
        for key in PresetKey::ALL {
            assert!(listing.iter().any(|p| p.key == key));
        }
    }

    #[test]
    fn test_get_preset_is_idempotent() {
        for key in PresetKey::ALL {
            let first = serde_json::to_string(&get_preset(key).permissions).unwrap();
            for _ in 0..3 {
                let again = serde_json::to_string(&get_preset(key).permissions).unwrap();
                assert_eq!(first, again);
            }
        }
    }

    #[test]
    fn test_viewer_is_view_only() {
        let set = &get_preset(PresetKey::Viewer).permissions;
        for module in Module::ALL {
            for &action in module.actions() {
                assert_eq!(set.read(module, action), action == Action::View);
            }
        }
    }

    #[test]
    fn test_manager_grants() {
        let set = &get_preset(PresetKey::Manager).permissions;
        assert!(set.read(Module::Orders, Action::Create));
        assert!(set.read(Module::Orders, Action::Assign));
        assert!(set.read(Module::Orders, Action::Cancel));
        assert!(!set.read(Module::Orders, Action::Delete));
        assert!(!set.read(Module::Orders, Action::Refund));
        assert!(set.read(Module::Customers, Action::Update));
        assert!(!set.read(Module::Customers, Action::Delete));
        assert!(set.read(Module::Users, Action::Create));
        assert!(!set.read(Module::Users, Action::AssignRole));
        assert!(set.read(Module::Reports, Action::Export));
        assert!(!set.read(Module::Financial, Action::View));
    }

    #[test]
    fn test_finance_admin_grants() {
        let set = &get_preset(PresetKey::FinanceAdmin).permissions;
        assert!(set.read(Module::Financial, Action::View));
        assert!(set.read(Module::Financial, Action::Approve));
        assert!(set.read(Module::Financial, Action::Export));
        assert!(!set.read(Module::Financial, Action::Delete));
        assert!(set.read(Module::Reports, Action::View));
        assert!(set.read(Module::Reports, Action::Export));
        assert!(set.read(Module::Orders, Action::Refund));
        assert!(!set.read(Module::Orders, Action::Create));
        assert!(!set.read(Module::Settings, Action::View));
    }

    #[test]
    fn test_branch_manager_grants() {
        let set = &get_preset(PresetKey::BranchManager).permissions;
        assert!(set.read(Module::Orders, Action::Delete));
        assert!(set.read(Module::Users, Action::AssignRole));
        assert!(set.read(Module::Financial, Action::View));
        assert!(!set.read(Module::Financial, Action::Approve));
    }

    #[test]
    fn test_preset_key_parse() {
        assert_eq!(PresetKey::parse("viewer"), Some(PresetKey::Viewer));
        assert_eq!(PresetKey::parse("financeAdmin"), Some(PresetKey::FinanceAdmin));
        assert_eq!(PresetKey::parse("finance_admin"), None);
    }
}
