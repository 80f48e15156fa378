use sudstack_core::{Module, PermissionSet, PresetKey, get_preset, is_subset};

#[test]
fn test_reflexivity_for_every_preset() {
    for key in PresetKey::ALL {
        let set = &get_preset(key).permissions;
        let report = is_subset(set, set);
        assert!(report.is_valid, "{key} is not a subset of itself");
        assert!(report.violations.is_empty());
    }
}

#[test]
fn test_empty_candidate_is_valid_against_anything() {
    for key in PresetKey::ALL {
        let parent = &get_preset(key).permissions;
        assert!(is_subset(parent, &PermissionSet::empty()).is_valid);
        assert!(is_subset(parent, &PermissionSet::default()).is_valid);
    }
}

#[test]
fn test_single_flip_monotonicity_over_the_whole_taxonomy() {
    // For every valid pair: a candidate that is the parent plus that one
    // extra grant is invalid, with exactly that pair reported.
    let parent = PermissionSet::empty();
    for module in Module::ALL {
        for &action in module.actions() {
            let mut candidate = PermissionSet::empty();
            candidate.set(module, action, true).unwrap();

            let report = is_subset(&parent, &candidate);
            assert!(!report.is_valid);
            assert_eq!(report.violations, vec![format!("{module}.{action}")]);
        }
    }
}

#[test]
fn test_flip_beyond_a_real_parent() {
    // Same property with a non-trivial parent: manager plus one grant the
    // manager lacks.
    let parent = get_preset(PresetKey::Manager).permissions.clone();
    let mut candidate = parent.clone();
    candidate
        .set(Module::Orders, sudstack_core::Action::Refund, true)
        .unwrap();

    let report = is_subset(&parent, &candidate);
    assert!(!report.is_valid);
    assert_eq!(report.violations, vec!["orders.refund"]);
}

#[test]
fn test_full_candidate_against_empty_parent_reports_everything() {
    let report = is_subset(&PermissionSet::empty(), &PermissionSet::full());
    let total: usize = Module::ALL.iter().map(|m| m.actions().len()).sum();
    assert_eq!(report.violations.len(), total);
    // Deterministic: first violation is the first taxonomy pair.
    assert_eq!(report.violations[0], "orders.view");
}

#[test]
fn test_viewer_is_subset_of_branch_manager() {
    let viewer = &get_preset(PresetKey::Viewer).permissions;
    let branch_manager = &get_preset(PresetKey::BranchManager).permissions;
    assert!(is_subset(branch_manager, viewer).is_valid);
    // But not the other way around.
    assert!(!is_subset(viewer, branch_manager).is_valid);
}
