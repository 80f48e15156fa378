//! The fixed permission catalog for the Sudstack API.
//!
//! Every permission in the system is a `(Module, Action)` pair drawn from
//! this closed taxonomy. All modules support the common CRUD actions; a few
//! modules add advanced actions on top (e.g. `orders.refund`,
//! `users.assignRole`). Authorization checks are total over well-formed
//! pairs: a pair outside the taxonomy reads as not-granted, and only the
//! input-validation path ([`Module::supports`] via `PermissionSet::set`)
//! treats it as an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A business-domain permission bucket.
///
/// The set is fixed and closed: declaration order is the canonical taxonomy
/// order used for deterministic iteration and serialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Module {
    Orders,
    Customers,
    Branches,
    Services,
    Financial,
    Reports,
    Users,
    Settings,
}

/// An operation within a module.
///
/// `View`/`Create`/`Update`/`Delete` are common to every module; the rest
/// are advanced actions valid only for specific modules (see
/// [`Module::actions`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    Assign,
    Cancel,
    Refund,
    Approve,
    Export,
    AssignRole,
    ApproveChanges,
}

use Action::*;

impl Module {
    /// All modules, in taxonomy order.
    pub const ALL: [Module; 8] = [
        Module::Orders,
        Module::Customers,
        Module::Branches,
        Module::Services,
        Module::Financial,
        Module::Reports,
        Module::Users,
        Module::Settings,
    ];

    /// The valid actions for this module: common actions followed by the
    /// module's advanced actions. Ordering is stable.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Module::Orders => &[View, Create, Update, Delete, Assign, Cancel, Refund],
            Module::Services => &[View, Create, Update, Delete, ApproveChanges],
            Module::Financial => &[View, Create, Update, Delete, Approve, Export],
            Module::Reports => &[View, Create, Update, Delete, Export],
            Module::Users => &[View, Create, Update, Delete, AssignRole],
            Module::Customers | Module::Branches | Module::Settings => {
                &[View, Create, Update, Delete]
            }
        }
    }

    /// Whether `action` is part of this module's valid action set.
    pub fn supports(&self, action: Action) -> bool {
        self.actions().contains(&action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Orders => "orders",
            Module::Customers => "customers",
            Module::Branches => "branches",
            Module::Services => "services",
            Module::Financial => "financial",
            Module::Reports => "reports",
            Module::Users => "users",
            Module::Settings => "settings",
        }
    }

    /// Parse a module from its wire name (case-sensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "orders" => Some(Module::Orders),
            "customers" => Some(Module::Customers),
            "branches" => Some(Module::Branches),
            "services" => Some(Module::Services),
            "financial" => Some(Module::Financial),
            "reports" => Some(Module::Reports),
            "users" => Some(Module::Users),
            "settings" => Some(Module::Settings),
            _ => None,
        }
    }
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            View => "view",
            Create => "create",
            Update => "update",
            Delete => "delete",
            Assign => "assign",
            Cancel => "cancel",
            Refund => "refund",
            Approve => "approve",
            Export => "export",
            AssignRole => "assignRole",
            ApproveChanges => "approveChanges",
        }
    }

    /// Parse an action from its wire name (case-sensitive, camelCase).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(View),
            "create" => Some(Create),
            "update" => Some(Update),
            "delete" => Some(Delete),
            "assign" => Some(Assign),
            "cancel" => Some(Cancel),
            "refund" => Some(Refund),
            "approve" => Some(Approve),
            "export" => Some(Export),
            "assignRole" => Some(AssignRole),
            "approveChanges" => Some(ApproveChanges),
            _ => None,
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `"module.action"` label used in violation lists and deny diagnostics.
pub fn permission_label(module: Module, action: Action) -> String {
    format!("{}.{}", module, action)
}

/// Error signalled when a `(module, action)` pair is not part of the
/// taxonomy. Raised only on input-validation paths; runtime permission
/// reads are total and default-deny instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("action `{action}` is not defined for module `{module}`")]
pub struct InvalidModuleOrAction {
    pub module: Module,
    pub action: Action,
}
