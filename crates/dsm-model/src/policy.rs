use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organizational policy referenced by rule bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
}

impl Policy {
    /// A freshly created policy with a short unique id.
    pub fn from_template() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("policy-{}", &uuid[..6]),
            name: "New Policy".to_string(),
            control_authority: None,
            control_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_are_unique() {
        let a = Policy::from_template();
        let b = Policy::from_template();
        assert!(a.id.starts_with("policy-"));
        assert_eq!(a.id.len(), "policy-".len() + 6);
        assert_ne!(a.id, b.id);
    }
}
