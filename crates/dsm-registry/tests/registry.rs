//! Registry behavior against the embedded default module.

use dsm_registry::{DEFAULT_MODULE_ID, ModuleRegistry};

#[test]
fn default_registry_exposes_seed_in_merged_view() {
    let registry = ModuleRegistry::with_default_module().expect("seeded registry");
    assert_eq!(registry.len(), 1);

    let merged = registry.merged_module();
    assert!(merged.categories.iter().any(|c| c.act_code == "SUD"));
    assert!(merged.categories.iter().any(|c| c.act_code == "MENCAT"));
    assert!(merged.purposes.iter().any(|p| p.act_code == "RESEARCH"));
    assert!(merged.policies.is_empty());
}

#[test]
fn seed_module_is_replaceable_like_any_other() {
    let mut registry = ModuleRegistry::with_default_module().expect("seeded registry");
    let mut replacement = registry
        .module(DEFAULT_MODULE_ID)
        .expect("seed present")
        .clone();
    replacement.enabled = false;
    registry.add_module(replacement);

    assert_eq!(registry.len(), 1);
    assert!(registry.merged_module().categories.is_empty());
}
