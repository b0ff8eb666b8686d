//! The layout tree and its pure mutation operations
//!
//! Every mutation clones the tree, applies the change to the clone and
//! returns it. Validation happens before anything is returned, so a failed
//! call never yields a half-edited tree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::node::{Node, SectionNode, ROOT_ID};
use super::patch::NodePatch;

/// A rooted tree of layout nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTree {
    pub root: Node,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// An empty layout: a single untitled root section
    pub fn new() -> Self {
        Self {
            root: Node::Section(SectionNode::new(ROOT_ID)),
        }
    }

    /// Wrap an existing root node after checking the tree invariants
    pub fn from_root(root: Node) -> Result<Self, EngineError> {
        let tree = Self { root };
        tree.validate()?;
        Ok(tree)
    }

    /// Check the reserved root id and id uniqueness
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.root.id() != ROOT_ID {
            return Err(EngineError::validation(format!(
                "root node must have id '{}', found '{}'",
                ROOT_ID,
                self.root.id()
            )));
        }
        let mut seen = HashSet::new();
        for id in self.root.subtree_ids() {
            if !seen.insert(id) {
                return Err(EngineError::validation(format!("duplicate node id '{}'", id)));
            }
        }
        Ok(())
    }

    /// Look up a node by id
    pub fn find(&self, id: &str) -> Result<&Node, EngineError> {
        self.root
            .find(id)
            .ok_or_else(|| EngineError::node_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.root.find(id).is_some()
    }

    /// Id of the node's parent; None for the root or an unknown id
    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.root
            .descendants()
            .find(|n| n.children().iter().any(|c| c.id() == id))
            .map(Node::id)
    }

    /// Every node in depth-first pre-order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.root.descendants()
    }

    /// Insert `node` (with its subtree) under `parent_id`
    ///
    /// An index past the end appends. A repeat takes the node as its item
    /// template and rejects a second one.
    pub fn insert_child(
        &self,
        parent_id: &str,
        node: Node,
        index: Option<usize>,
    ) -> Result<Self, EngineError> {
        self.check_new_ids(&node)?;
        let node_id = node.id().to_string();

        let mut next = self.clone();
        let parent = next
            .root
            .find_mut(parent_id)
            .ok_or_else(|| EngineError::node_not_found(parent_id))?;
        attach(parent, node, index)?;

        tracing::debug!(parent = parent_id, node = %node_id, "inserted node");
        Ok(next)
    }

    /// Remove a node and its whole subtree
    pub fn remove_node(&self, node_id: &str) -> Result<Self, EngineError> {
        if node_id == self.root.id() {
            return Err(EngineError::validation("the root node cannot be removed"));
        }
        let mut next = self.clone();
        detach(&mut next.root, node_id).ok_or_else(|| EngineError::node_not_found(node_id))?;

        tracing::debug!(node = node_id, "removed node");
        Ok(next)
    }

    /// Move a node under a new parent at `index`
    ///
    /// The index is taken in the new parent's child list after the node has
    /// been detached, so moving within one parent behaves like a reorder.
    pub fn move_node(
        &self,
        node_id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<Self, EngineError> {
        if node_id == self.root.id() {
            return Err(EngineError::validation("the root node cannot be moved"));
        }
        let node = self.find(node_id)?;
        self.find(new_parent_id)?;
        if node.find(new_parent_id).is_some() {
            return Err(EngineError::validation(format!(
                "cannot move '{}' beneath itself",
                node_id
            )));
        }

        let mut next = self.clone();
        let detached =
            detach(&mut next.root, node_id).ok_or_else(|| EngineError::node_not_found(node_id))?;
        let parent = next
            .root
            .find_mut(new_parent_id)
            .ok_or_else(|| EngineError::node_not_found(new_parent_id))?;
        attach(parent, detached, Some(index))?;

        tracing::debug!(node = node_id, parent = new_parent_id, index, "moved node");
        Ok(next)
    }

    /// Apply a variant-specific attribute patch to one node
    pub fn update_node_attributes(
        &self,
        node_id: &str,
        patch: NodePatch,
    ) -> Result<Self, EngineError> {
        let mut next = self.clone();
        let node = next
            .root
            .find_mut(node_id)
            .ok_or_else(|| EngineError::node_not_found(node_id))?;
        patch.apply(node)?;

        tracing::debug!(node = node_id, "updated node attributes");
        Ok(next)
    }

    /// Reject a new subtree whose ids clash with each other or with the tree
    fn check_new_ids(&self, node: &Node) -> Result<(), EngineError> {
        let existing: HashSet<&str> = self.root.subtree_ids().into_iter().collect();
        let mut incoming = HashSet::new();
        for id in node.subtree_ids() {
            if id.trim().is_empty() {
                return Err(EngineError::validation("node id must not be empty"));
            }
            if existing.contains(id) || !incoming.insert(id) {
                return Err(EngineError::validation(format!("duplicate node id '{}'", id)));
            }
        }
        Ok(())
    }
}

/// Attach `child` to `parent`
fn attach(parent: &mut Node, child: Node, index: Option<usize>) -> Result<(), EngineError> {
    match parent {
        Node::TextLeaf(leaf) => Err(EngineError::validation(format!(
            "text leaf '{}' cannot have children",
            leaf.id
        ))),
        Node::Repeat(repeat) => {
            if repeat.item.is_some() {
                return Err(EngineError::validation(
                    "repeat accepts exactly one child template",
                ));
            }
            repeat.item = Some(Box::new(child));
            Ok(())
        }
        Node::Section(_) | Node::Row(_) | Node::Column(_) => {
            let children = parent
                .container_children_mut()
                .ok_or_else(|| EngineError::validation("node does not accept children"))?;
            let at = index.unwrap_or(children.len()).min(children.len());
            children.insert(at, child);
            Ok(())
        }
    }
}

/// Remove the node with `id` from beneath `parent`, returning it
fn detach(parent: &mut Node, id: &str) -> Option<Node> {
    match parent {
        Node::Repeat(repeat) => {
            if repeat.item.as_ref().is_some_and(|item| item.id() == id) {
                return repeat.item.take().map(|item| *item);
            }
            repeat.item.as_deref_mut().and_then(|item| detach(item, id))
        }
        Node::TextLeaf(_) => None,
        Node::Section(_) | Node::Row(_) | Node::Column(_) => {
            let children = parent.container_children_mut()?;
            if let Some(pos) = children.iter().position(|c| c.id() == id) {
                return Some(children.remove(pos));
            }
            children.iter_mut().find_map(|c| detach(c, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::patch::{LeafPatch, SectionPatch};
    use pretty_assertions::assert_eq;

    fn sample() -> LayoutTree {
        LayoutTree::from_root(Node::section(
            ROOT_ID,
            vec![
                Node::section("header", vec![Node::leaf("name", Some("full_name"))]),
                Node::repeat("exp", Some(Node::column("exp_item", vec![Node::leaf("role", Some("role"))]))),
                Node::row("contacts", vec![]),
            ],
        ))
        .expect("valid tree")
    }

    fn child_ids<'a>(tree: &'a LayoutTree, id: &str) -> Vec<&'a str> {
        tree.find(id).unwrap().children().iter().map(Node::id).collect()
    }

    #[test]
    fn test_new_tree_has_reserved_root() {
        let tree = LayoutTree::new();
        assert_eq!(tree.root.id(), ROOT_ID);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_from_root_rejects_wrong_root_id() {
        let err = LayoutTree::from_root(Node::section("main", vec![])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_root_rejects_duplicate_ids() {
        let root = Node::section(ROOT_ID, vec![Node::leaf("a", None), Node::leaf("a", None)]);
        assert!(LayoutTree::from_root(root).unwrap_err().is_validation());
    }

    #[test]
    fn test_insert_child_at_index_is_pure() {
        let tree = sample();
        let next = tree
            .insert_child("contacts", Node::leaf("email", Some("email")), None)
            .unwrap()
            .insert_child("contacts", Node::leaf("phone", Some("phone")), Some(0))
            .unwrap();
        assert_eq!(child_ids(&next, "contacts"), vec!["phone", "email"]);
        assert!(child_ids(&tree, "contacts").is_empty());
    }

    #[test]
    fn test_insert_index_past_end_appends() {
        let next = sample()
            .insert_child(ROOT_ID, Node::leaf("footer", None), Some(99))
            .unwrap();
        assert_eq!(child_ids(&next, ROOT_ID), vec!["header", "exp", "contacts", "footer"]);
    }

    #[test]
    fn test_insert_into_unknown_parent() {
        let err = sample()
            .insert_child("nope", Node::leaf("x", None), None)
            .unwrap_err();
        assert_eq!(err, EngineError::node_not_found("nope"));
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let err = sample()
            .insert_child("contacts", Node::leaf("role", None), None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_insert_into_leaf_rejected() {
        let err = sample()
            .insert_child("name", Node::leaf("x", None), None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_repeat_rejects_second_child() {
        let err = sample()
            .insert_child("exp", Node::leaf("extra", None), None)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::validation("repeat accepts exactly one child template")
        );
    }

    #[test]
    fn test_empty_repeat_accepts_first_child() {
        let tree = sample()
            .insert_child(ROOT_ID, Node::repeat("skills", None), None)
            .unwrap()
            .insert_child("skills", Node::leaf("skill", Some("skill")), None)
            .unwrap();
        assert_eq!(child_ids(&tree, "skills"), vec!["skill"]);
    }

    #[test]
    fn test_remove_node_removes_subtree() {
        let tree = sample().remove_node("exp").unwrap();
        assert!(!tree.contains("exp"));
        assert!(!tree.contains("role"));
        assert!(tree.contains("header"));
    }

    #[test]
    fn test_remove_root_rejected() {
        assert!(sample().remove_node(ROOT_ID).unwrap_err().is_validation());
    }

    #[test]
    fn test_remove_unknown_node() {
        assert!(sample().remove_node("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_repeat_item_empties_repeat() {
        let tree = sample().remove_node("exp_item").unwrap();
        assert!(tree.find("exp").unwrap().children().is_empty());
    }

    #[test]
    fn test_move_node_between_parents() {
        let tree = sample().move_node("name", "contacts", 0).unwrap();
        assert!(child_ids(&tree, "header").is_empty());
        assert_eq!(child_ids(&tree, "contacts"), vec!["name"]);
        assert_eq!(tree.parent_id("name"), Some("contacts"));
    }

    #[test]
    fn test_move_node_reorders_within_parent() {
        let tree = sample().move_node("contacts", ROOT_ID, 0).unwrap();
        assert_eq!(child_ids(&tree, ROOT_ID), vec!["contacts", "header", "exp"]);
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let err = sample().move_node("exp", "exp_item", 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_move_into_occupied_repeat_rejected() {
        let err = sample().move_node("name", "exp", 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_move_root_rejected() {
        assert!(sample().move_node(ROOT_ID, "header", 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_node_attributes() {
        let tree = sample()
            .update_node_attributes(
                "header",
                NodePatch::Section(SectionPatch {
                    title: Some(Some("About".to_string())),
                    divider: Some(true),
                    ..Default::default()
                }),
            )
            .unwrap();
        let Node::Section(header) = tree.find("header").unwrap() else {
            panic!("expected section");
        };
        assert_eq!(header.title.as_deref(), Some("About"));
        assert!(header.divider);
    }

    #[test]
    fn test_update_unknown_node() {
        let err = sample()
            .update_node_attributes("ghost", NodePatch::Leaf(LeafPatch::default()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parent_of_root_is_none() {
        assert_eq!(sample().parent_id(ROOT_ID), None);
        assert_eq!(sample().parent_id("exp_item"), Some("exp"));
    }
}
