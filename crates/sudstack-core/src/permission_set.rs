//! The per-account permission grant table.
//!
//! A [`PermissionSet`] maps every module to a table of action grants.
//! Reads are total and deny-by-default: a module or action missing from the
//! stored data is simply not granted, never an error. Writes go through
//! [`PermissionSet::set`], which rejects pairs outside the taxonomy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::taxonomy::{Action, InvalidModuleOrAction, Module, permission_label};

/// Module → action → granted table for one account.
///
/// The underlying maps are ordered by taxonomy order, so iteration and
/// serialization are deterministic and two sets with the same grants are
/// bit-identical on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct PermissionSet(BTreeMap<Module, BTreeMap<Action, bool>>);

impl PermissionSet {
    /// A set with every valid `(module, action)` pair present and denied.
    pub fn empty() -> Self {
        Self::filled(false)
    }

    /// A set with every valid `(module, action)` pair granted.
    pub fn full() -> Self {
        Self::filled(true)
    }

    fn filled(granted: bool) -> Self {
        let mut map = BTreeMap::new();
        for module in Module::ALL {
            let actions = module
                .actions()
                .iter()
                .map(|&action| (action, granted))
                .collect();
            map.insert(module, actions);
        }
        Self(map)
    }

    /// Read one grant. Total: returns `false` when the module or action is
    /// absent from the stored data, and `false` for pairs outside the
    /// taxonomy. Never fails.
    pub fn read(&self, module: Module, action: Action) -> bool {
        if !module.supports(action) {
            return false;
        }
        self.0
            .get(&module)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(false)
    }

    /// Write one grant. Rejects `(module, action)` pairs that are not part
    /// of the taxonomy; this is the input-validation counterpart of the
    /// always-total [`read`](Self::read).
    pub fn set(
        &mut self,
        module: Module,
        action: Action,
        granted: bool,
    ) -> Result<(), InvalidModuleOrAction> {
        if !module.supports(action) {
            return Err(InvalidModuleOrAction { module, action });
        }
        self.0.entry(module).or_default().insert(action, granted);
        Ok(())
    }

    /// Whether at least one valid `(module, action)` pair is granted.
    pub fn has_any_grant(&self) -> bool {
        self.0.iter().any(|(module, actions)| {
            actions
                .iter()
                .any(|(&action, &granted)| granted && module.supports(action))
        })
    }

    /// Whether any action in `module` is granted. Advanced actions count:
    /// module access is not merely `view`.
    pub fn module_granted(&self, module: Module) -> bool {
        module.actions().iter().any(|&a| self.read(module, a))
    }

    /// The `"module.action"` labels of every granted pair, in taxonomy order.
    pub fn granted_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        for module in Module::ALL {
            for &action in module.actions() {
                if self.read(module, action) {
                    labels.push(permission_label(module, action));
                }
            }
        }
        labels
    }

    /// The canonical full-shape copy of this set: every module present with
    /// exactly its valid action set, anything outside the taxonomy dropped.
    /// Persisted sets are sanitized so they round-trip bit-for-bit.
    pub fn sanitized(&self) -> PermissionSet {
        let mut out = PermissionSet::empty();
        for module in Module::ALL {
            for &action in module.actions() {
                // set() cannot fail here: the pair comes from the taxonomy
                out.set(module, action, self.read(module, action))
                    .expect("taxonomy pair");
            }
        }
        out
    }
}
