use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::Policy;

fn default_confidence() -> f64 {
    1.0
}

/// A plain system/code/display triple, used for binding bases and labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub display: String,
}

/// A coded clinical term with a confidence weight.
///
/// `confidence` is a `[0, 1]` weight expressing certainty that this code
/// legitimately maps to the containing category or purpose. The bound is
/// enforced by the schema validator, not at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSetCoding {
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl CodeSetCoding {
    pub fn new(system: impl Into<String>, code: impl Into<String>, confidence: f64) -> Self {
        Self {
            system: system.into(),
            code: code.into(),
            confidence,
        }
    }
}

/// An ordered collection of coded terms. Order is insertion order and is
/// meaningful for display; `(system, code)` pairs are expected to be unique
/// within one code set, with duplicates removed by the dedup operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeSet {
    #[serde(default, rename = "groupID", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub codes: Vec<CodeSetCoding>,
}

impl CodeSet {
    /// A fresh coding as the editor creates it: empty term, full confidence.
    pub fn code_from_template() -> CodeSetCoding {
        CodeSetCoding {
            system: String::new(),
            code: String::new(),
            confidence: 1.0,
        }
    }
}

/// A rule binding a category/purpose pair to code sets, labels, and
/// policies.
///
/// `category` and `purpose` are loose references by act code into the owning
/// module's lists; unresolved references are tolerated and treated as unset
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<Coding>,
    #[serde(default)]
    pub labels: Vec<Coding>,
    #[serde(default, rename = "codeSets")]
    pub code_sets: Vec<CodeSet>,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl Binding {
    /// A fresh binding with a unique id and one default code set.
    pub fn from_template() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: None,
            purpose: None,
            basis: None,
            labels: Vec::new(),
            code_sets: vec![Self::code_set_from_template()],
            policies: Vec::new(),
        }
    }

    /// An empty code set with a fresh group id.
    pub fn code_set_from_template() -> CodeSet {
        CodeSet {
            group_id: Some(Uuid::new_v4().to_string()),
            codes: Vec::new(),
        }
    }

    /// An empty label row.
    pub fn label_from_template() -> Coding {
        Coding::default()
    }

    /// Deep copy with a `-copy` suffix on the id.
    pub fn duplicated(&self) -> Self {
        let mut copy = self.clone();
        copy.id.push_str("-copy");
        copy
    }

    /// Total coded terms across all code sets.
    pub fn total_codes(&self) -> usize {
        self.code_sets.iter().map(|cs| cs.codes.len()).sum()
    }

    pub fn is_policy_attached(&self, policy_id: &str) -> bool {
        self.policies.iter().any(|p| p.id == policy_id)
    }

    /// Attach or detach a policy by identity. Idempotent set membership:
    /// toggling twice restores the first state. Attaching stores an owned
    /// deep copy of the policy. Returns whether the policy is now attached.
    pub fn toggle_policy(&mut self, policy: &Policy) -> bool {
        if let Some(index) = self.policies.iter().position(|p| p.id == policy.id) {
            self.policies.remove(index);
            false
        } else {
            self.policies.push(policy.clone());
            true
        }
    }

    /// First code set, creating one from template when none exist. Selecting
    /// a binding in the editor guarantees a code set to type into.
    pub fn ensure_code_set(&mut self) -> &mut CodeSet {
        if self.code_sets.is_empty() {
            self.code_sets.push(Self::code_set_from_template());
        }
        &mut self.code_sets[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_has_one_empty_code_set() {
        let binding = Binding::from_template();
        assert!(!binding.id.is_empty());
        assert!(binding.labels.is_empty());
        assert_eq!(binding.code_sets.len(), 1);
        assert!(binding.code_sets[0].codes.is_empty());
        assert!(binding.code_sets[0].group_id.is_some());
    }

    #[test]
    fn code_template_has_full_confidence() {
        let code = CodeSet::code_from_template();
        assert_eq!(code.confidence, 1.0);
        assert!(code.system.is_empty());
        assert!(code.code.is_empty());
    }

    #[test]
    fn policy_toggle_is_idempotent_set_membership() {
        let mut binding = Binding::from_template();
        let policy = Policy {
            id: "policy-1".to_string(),
            name: "Policy".to_string(),
            control_authority: None,
            control_id: None,
        };

        assert!(binding.toggle_policy(&policy));
        assert!(binding.is_policy_attached("policy-1"));
        assert_eq!(binding.policies.len(), 1);

        assert!(!binding.toggle_policy(&policy));
        assert!(!binding.is_policy_attached("policy-1"));
        assert!(binding.policies.is_empty());
    }

    #[test]
    fn duplicated_appends_copy_suffix() {
        let binding = Binding::from_template();
        let copy = binding.duplicated();
        assert_eq!(copy.id, format!("{}-copy", binding.id));
        assert_eq!(copy.code_sets, binding.code_sets);
    }

    #[test]
    fn total_codes_spans_code_sets() {
        let mut binding = Binding::from_template();
        binding.code_sets[0]
            .codes
            .push(CodeSetCoding::new("sys", "a", 0.5));
        let mut second = Binding::code_set_from_template();
        second.codes.push(CodeSetCoding::new("sys", "b", 1.0));
        second.codes.push(CodeSetCoding::new("sys", "c", 1.0));
        binding.code_sets.push(second);

        assert_eq!(binding.total_codes(), 3);
    }

    #[test]
    fn ensure_code_set_creates_when_empty() {
        let mut binding = Binding::from_template();
        binding.code_sets.clear();
        binding.ensure_code_set();
        assert_eq!(binding.code_sets.len(), 1);
        binding.ensure_code_set();
        assert_eq!(binding.code_sets.len(), 1);
    }
}
