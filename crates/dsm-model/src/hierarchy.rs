use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::module::default_true;

/// Code system carried by the default category and purpose definitions.
pub const ACT_CODE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v3-ActCode";

/// A node in the category or purpose hierarchy.
///
/// Categories and purposes share this shape and live in independent
/// namespaces; `act_code` is unique within its own list. The parent is kept
/// as a code into the owning list and resolved on demand, so the serialized
/// form matches the wire format and no live back-pointer can go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(default)]
    pub act_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(
        default,
        rename = "parentCode",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_code: Option<String>,
}

impl HierarchyNode {
    /// A freshly created node as the editor produces it.
    pub fn from_template(name: impl Into<String>) -> Self {
        Self {
            act_code: "NEW".to_string(),
            system: Some(ACT_CODE_SYSTEM.to_string()),
            name: name.into(),
            description: Some("Description".to_string()),
            enabled: true,
            parent_code: None,
        }
    }

    /// Resolve this node's parent against the owning list.
    pub fn parent<'a>(&self, all: &'a [HierarchyNode]) -> Option<&'a HierarchyNode> {
        let code = self.parent_code.as_deref()?;
        all.iter().find(|n| n.act_code == code)
    }

    /// True iff `ancestor_code` appears anywhere in this node's parent chain.
    ///
    /// The walk is bounded by a visited set: a cycle already present in bad
    /// data terminates the traversal instead of looping forever.
    pub fn is_descendant_of(&self, ancestor_code: &str, all: &[HierarchyNode]) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.parent_code.as_deref();
        while let Some(code) = current {
            if code == ancestor_code {
                return true;
            }
            if !visited.insert(code) {
                return false;
            }
            current = all
                .iter()
                .find(|n| n.act_code == code)
                .and_then(|n| n.parent_code.as_deref());
        }
        false
    }
}

/// Legal parent choices for `node`: every other node that is not one of its
/// descendants. Adopting a descendant would create a cycle.
pub fn available_parents<'a>(
    node: &HierarchyNode,
    all: &'a [HierarchyNode],
) -> Vec<&'a HierarchyNode> {
    all.iter()
        .filter(|candidate| {
            candidate.act_code != node.act_code
                && !candidate.is_descendant_of(&node.act_code, all)
        })
        .collect()
}

/// Assign or clear the parent of the node identified by `node_code`.
///
/// Clearing always succeeds. Setting requires the target code to resolve
/// within `all` and to be a legal parent (not the node itself, not one of
/// its descendants); anything else is a no-op. Returns whether the parent
/// was changed.
pub fn set_parent(all: &mut [HierarchyNode], node_code: &str, new_parent: Option<&str>) -> bool {
    let Some(index) = all.iter().position(|n| n.act_code == node_code) else {
        return false;
    };

    match new_parent {
        None => {
            all[index].parent_code = None;
            true
        }
        Some(parent_code) => {
            if parent_code == node_code {
                return false;
            }
            let Some(candidate) = all.iter().find(|n| n.act_code == parent_code) else {
                return false;
            };
            if candidate.is_descendant_of(node_code, all) {
                return false;
            }
            all[index].parent_code = Some(parent_code.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(code: &str, parent: Option<&str>) -> HierarchyNode {
        HierarchyNode {
            act_code: code.to_string(),
            system: None,
            name: code.to_string(),
            description: None,
            enabled: true,
            parent_code: parent.map(str::to_string),
        }
    }

    fn chain() -> Vec<HierarchyNode> {
        // X -> Y -> Z: Z's parent is Y, Y's parent is X.
        vec![node("X", None), node("Y", Some("X")), node("Z", Some("Y"))]
    }

    #[test]
    fn descendant_walks_multiple_hops() {
        let all = chain();
        assert!(all[2].is_descendant_of("X", &all));
        assert!(all[2].is_descendant_of("Y", &all));
        assert!(!all[0].is_descendant_of("Z", &all));
    }

    #[test]
    fn descendant_terminates_on_cyclic_bad_data() {
        let all = vec![node("A", Some("B")), node("B", Some("A"))];
        assert!(!all[0].is_descendant_of("C", &all));
        assert!(all[0].is_descendant_of("B", &all));
    }

    #[test]
    fn available_parents_excludes_self_and_descendants() {
        let all = chain();
        let parents: Vec<&str> = available_parents(&all[0], &all)
            .iter()
            .map(|n| n.act_code.as_str())
            .collect();
        assert!(parents.is_empty(), "X may not adopt Y or Z: {parents:?}");

        let parents: Vec<&str> = available_parents(&all[2], &all)
            .iter()
            .map(|n| n.act_code.as_str())
            .collect();
        assert_eq!(parents, vec!["X", "Y"]);
    }

    #[test]
    fn set_parent_rejects_cycle() {
        let mut all = chain();
        assert!(!set_parent(&mut all, "X", Some("Z")));
        assert_eq!(all[0].parent_code, None);
    }

    #[test]
    fn set_parent_rejects_unknown_code() {
        let mut all = chain();
        assert!(!set_parent(&mut all, "Z", Some("MISSING")));
        assert_eq!(all[2].parent_code.as_deref(), Some("Y"));
    }

    #[test]
    fn set_parent_assigns_and_clears() {
        let mut all = chain();
        assert!(set_parent(&mut all, "Z", Some("X")));
        assert_eq!(all[2].parent_code.as_deref(), Some("X"));

        assert!(set_parent(&mut all, "Z", None));
        assert_eq!(all[2].parent_code, None);
        assert!(all[2].parent(&all).is_none());
    }

    #[test]
    fn parent_resolves_against_owning_list() {
        let all = chain();
        assert_eq!(all[1].parent(&all).map(|n| n.act_code.as_str()), Some("X"));
    }
}
