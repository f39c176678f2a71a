use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::error::ModelError;
use crate::hierarchy::HierarchyNode;
use crate::policy::Policy;

pub(crate) fn default_true() -> bool {
    true
}

/// The rule section of a module document. Bindings are module-scoped and are
/// never merged across modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// Per-module editor settings carried in the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSettings {
    #[serde(default = "default_true")]
    pub editable: bool,
}

/// A data-segmentation module: a versioned, enable/disable-able bundle of
/// information categories, purposes of use, organizational policies, and the
/// rule bindings that tie them to coded clinical terms.
///
/// This struct is the persisted document shape; serde field names match the
/// wire format exactly, and deserialization is deliberately tolerant
/// (missing lists become empty) so that loosely-formed documents load and are
/// reported by the schema validator instead of failing up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub categories: Vec<HierarchyNode>,
    #[serde(default)]
    pub purposes: Vec<HierarchyNode>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ModuleSettings>,
}

/// A serialized module ready to hand to a download mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub filename: String,
    pub contents: String,
}

impl Module {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
            description: None,
            enabled: true,
            categories: Vec::new(),
            purposes: Vec::new(),
            policies: Vec::new(),
            rules: Rules::default(),
            settings: None,
        }
    }

    /// Whether the document allows editing. Absent settings mean editable.
    pub fn is_editable(&self) -> bool {
        self.settings.as_ref().map(|s| s.editable).unwrap_or(true)
    }

    /// Look up a binding by id.
    pub fn binding(&self, id: &str) -> Option<&Binding> {
        self.rules.bindings.iter().find(|b| b.id == id)
    }

    pub fn binding_mut(&mut self, id: &str) -> Option<&mut Binding> {
        self.rules.bindings.iter_mut().find(|b| b.id == id)
    }

    /// Resolve a category act code. Unresolved references are tolerated and
    /// simply report `None`.
    pub fn category(&self, act_code: &str) -> Option<&HierarchyNode> {
        self.categories.iter().find(|c| c.act_code == act_code)
    }

    /// Resolve a purpose act code; same looseness as [`Module::category`].
    pub fn purpose(&self, act_code: &str) -> Option<&HierarchyNode> {
        self.purposes.iter().find(|p| p.act_code == act_code)
    }

    pub fn remove_category(&mut self, index: usize) -> Option<HierarchyNode> {
        (index < self.categories.len()).then(|| self.categories.remove(index))
    }

    pub fn remove_purpose(&mut self, index: usize) -> Option<HierarchyNode> {
        (index < self.purposes.len()).then(|| self.purposes.remove(index))
    }

    pub fn remove_policy(&mut self, index: usize) -> Option<Policy> {
        (index < self.policies.len()).then(|| self.policies.remove(index))
    }

    /// Remove a binding by id. Returns whether a binding was removed.
    pub fn remove_binding(&mut self, id: &str) -> bool {
        let before = self.rules.bindings.len();
        self.rules.bindings.retain(|b| b.id != id);
        self.rules.bindings.len() != before
    }

    /// Serialize the module for download as tab-indented JSON.
    ///
    /// When `editable` is given, the exported copy carries that value in
    /// `settings.editable` (the "lock on download" toggle); `None` leaves the
    /// settings exactly as stored. The working document is never mutated.
    pub fn export(&self, editable: Option<bool>) -> Result<ExportPayload, ModelError> {
        let mut copy = self.clone();
        if let Some(editable) = editable {
            copy.settings = Some(ModuleSettings { editable });
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        copy.serialize(&mut serializer)?;

        let filename = if self.id.is_empty() {
            "module.json".to_string()
        } else {
            format!("{}.json", self.id)
        };
        Ok(ExportPayload {
            filename,
            contents: String::from_utf8_lossy(&buf).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editable_defaults_to_true_without_settings() {
        let module = Module::new("m1", "Module");
        assert!(module.is_editable());
    }

    #[test]
    fn editable_honors_settings() {
        let mut module = Module::new("m1", "Module");
        module.settings = Some(ModuleSettings { editable: false });
        assert!(!module.is_editable());
    }

    #[test]
    fn binding_lookup_by_id() {
        let mut module = Module::new("m1", "Module");
        let binding = Binding::from_template();
        let id = binding.id.clone();
        module.rules.bindings.push(binding);

        assert!(module.binding(&id).is_some());
        assert!(module.binding("nope").is_none());
        assert!(module.remove_binding(&id));
        assert!(!module.remove_binding(&id));
    }

    #[test]
    fn unresolved_references_report_none() {
        let module = Module::new("m1", "Module");
        assert!(module.category("SUD").is_none());
        assert!(module.purpose("RESEARCH").is_none());
    }

    #[test]
    fn export_overrides_editable_without_touching_working_copy() {
        let mut module = Module::new("m1", "Module");
        module.settings = Some(ModuleSettings { editable: true });

        let payload = module.export(Some(false)).expect("export");
        assert_eq!(payload.filename, "m1.json");
        assert!(payload.contents.contains("\"editable\": false"));
        assert!(module.is_editable());
    }

    #[test]
    fn export_without_override_keeps_settings() {
        let module = Module::new("", "Module");
        let payload = module.export(None).expect("export");
        assert_eq!(payload.filename, "module.json");
        assert!(!payload.contents.contains("settings"));
    }
}
