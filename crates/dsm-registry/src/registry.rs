use dsm_model::Module;

use crate::default_module::default_module;
use crate::error::RegistryError;

/// Process-wide collection of loaded modules.
///
/// Modules keep their insertion order; re-adding an id replaces the existing
/// entry in place, so the merged view stays stable while a module is
/// refreshed.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the embedded default module, as constructed at
    /// process start.
    pub fn with_default_module() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        let module = default_module()?;
        tracing::info!(id = %module.id, "registry initialized with default module");
        registry.add_module(module);
        Ok(registry)
    }

    /// Insert or replace a module by id. Last write wins per id; the
    /// original position is retained on replacement.
    pub fn add_module(&mut self, module: Module) {
        match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => *existing = module,
            None => self.modules.push(module),
        }
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    /// Remove a module by id; returns it when present.
    pub fn remove_module(&mut self, id: &str) -> Option<Module> {
        let index = self.modules.iter().position(|m| m.id == id)?;
        Some(self.modules.remove(index))
    }

    /// All modules, in insertion order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// A synthetic module aggregating every enabled module's categories,
    /// purposes, and policies, in module-insertion order then intra-module
    /// order.
    ///
    /// Duplicate act codes or policy ids across modules are kept as-is:
    /// two modules may intentionally define the same code differently, and
    /// callers of the merged view must tolerate repeats. Bindings stay
    /// module-scoped and are never part of the aggregate.
    pub fn merged_module(&self) -> Module {
        let mut merged = Module::new("merged", "Merged Modules");
        merged.settings = Some(dsm_model::ModuleSettings { editable: false });
        for module in self.modules.iter().filter(|m| m.enabled) {
            merged.categories.extend(module.categories.iter().cloned());
            merged.purposes.extend(module.purposes.iter().cloned());
            merged.policies.extend(module.policies.iter().cloned());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsm_model::{Binding, HierarchyNode};

    fn module_with_category(id: &str, enabled: bool, category: &str) -> Module {
        let mut module = Module::new(id, id);
        module.enabled = enabled;
        module.categories.push(HierarchyNode {
            act_code: category.to_string(),
            system: None,
            name: category.to_string(),
            description: None,
            enabled: true,
            parent_code: None,
        });
        module
    }

    #[test]
    fn merged_view_includes_enabled_modules_only() {
        let mut registry = ModuleRegistry::new();
        registry.add_module(module_with_category("m1", true, "c1"));
        registry.add_module(module_with_category("m2", false, "c2"));

        let merged = registry.merged_module();
        let codes: Vec<&str> = merged.categories.iter().map(|c| c.act_code.as_str()).collect();
        assert_eq!(codes, vec!["c1"]);
    }

    #[test]
    fn merged_view_keeps_repeats_in_insertion_order() {
        let mut registry = ModuleRegistry::new();
        registry.add_module(module_with_category("m1", true, "SUD"));
        registry.add_module(module_with_category("m2", true, "SUD"));

        let merged = registry.merged_module();
        assert_eq!(merged.categories.len(), 2);
    }

    #[test]
    fn merged_view_excludes_bindings() {
        let mut registry = ModuleRegistry::new();
        let mut module = module_with_category("m1", true, "c1");
        module.rules.bindings.push(Binding::from_template());
        registry.add_module(module);

        assert!(registry.merged_module().rules.bindings.is_empty());
    }

    #[test]
    fn add_module_replaces_in_place() {
        let mut registry = ModuleRegistry::new();
        registry.add_module(module_with_category("m1", true, "c1"));
        registry.add_module(module_with_category("m2", true, "c2"));

        let mut replacement = module_with_category("m1", true, "c9");
        replacement.name = "replaced".to_string();
        registry.add_module(replacement);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.modules()[0].name, "replaced");
        assert_eq!(registry.modules()[0].categories[0].act_code, "c9");
        assert_eq!(registry.modules()[1].id, "m2");
    }

    #[test]
    fn remove_module_by_id() {
        let mut registry = ModuleRegistry::new();
        registry.add_module(module_with_category("m1", true, "c1"));
        assert!(registry.remove_module("m1").is_some());
        assert!(registry.remove_module("m1").is_none());
        assert!(registry.is_empty());
    }
}
