//! Dominance check between two permission sets.
//!
//! [`is_subset`] answers "may `candidate` be held by a subordinate of the
//! account holding `parent`?" by walking the full taxonomy and collecting
//! every pair the candidate grants that the parent does not. The check is
//! pure and order-independent; violations are reported in taxonomy order.

use serde::Serialize;
use utoipa::ToSchema;

use crate::permission_set::PermissionSet;
use crate::taxonomy::{Module, permission_label};

/// Outcome of a subset validation.
///
/// `violations` lists every `"module.action"` the candidate grants beyond
/// the parent, in taxonomy order; it is empty iff `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubsetReport {
    pub is_valid: bool,
    pub violations: Vec<String>,
}

/// Check that `candidate` grants nothing beyond `parent`.
///
/// Pairs absent from `candidate` read as denied and are never violations;
/// extra grants on the parent side are irrelevant. An empty candidate is
/// always a valid subset, and every set is a subset of itself.
pub fn is_subset(parent: &PermissionSet, candidate: &PermissionSet) -> SubsetReport {
    let mut violations = Vec::new();
    for module in Module::ALL {
        for &action in module.actions() {
            if candidate.read(module, action) && !parent.read(module, action) {
                violations.push(permission_label(module, action));
            }
        }
    }
    SubsetReport {
        is_valid: violations.is_empty(),
        violations,
    }
}
