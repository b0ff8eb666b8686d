//! Binding integrity between the field registry and the layout tree
//!
//! Field renames and removals go through [`rewrite_bindings`], which is the
//! only code that edits `bind_field` in bulk.

use crate::fields::FieldRegistry;
use crate::tree::{LayoutTree, Node};

/// Rebind every leaf bound to `old_field_id`
///
/// With `new_field_id = None` the binding is cleared. The rewrite touches
/// each node independently, so it is order-independent and running it a
/// second time changes nothing.
pub fn rewrite_bindings(root: &Node, old_field_id: &str, new_field_id: Option<&str>) -> Node {
    let mut next = root.clone();
    rewrite_in_place(&mut next, old_field_id, new_field_id);
    next
}

fn rewrite_in_place(node: &mut Node, old_field_id: &str, new_field_id: Option<&str>) {
    if let Node::TextLeaf(leaf) = node {
        if leaf.bind_field.as_deref() == Some(old_field_id) {
            leaf.bind_field = new_field_id.map(str::to_string);
        }
    }
    node.for_each_child_mut(|child| rewrite_in_place(child, old_field_id, new_field_id));
}

/// Ids of the nodes bound to `field_id`, in depth-first order
pub fn check_in_use(root: &Node, field_id: &str) -> Vec<String> {
    root.descendants()
        .filter(|n| n.bind_field() == Some(field_id))
        .map(|n| n.id().to_string())
        .collect()
}

/// Number of nodes bound to `field_id`
pub fn count_bindings(root: &Node, field_id: &str) -> usize {
    root.descendants()
        .filter(|n| n.bind_field() == Some(field_id))
        .count()
}

/// Bindings whose field is not in the registry, as `(node id, field id)`
pub fn dangling_bindings<'a>(tree: &'a LayoutTree, fields: &FieldRegistry) -> Vec<(&'a str, &'a str)> {
    tree.nodes()
        .filter_map(|n| n.bind_field().map(|f| (n.id(), f)))
        .filter(|(_, field)| !fields.contains(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;
    use crate::tree::ROOT_ID;
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        Node::section(
            ROOT_ID,
            vec![
                Node::leaf("email_top", Some("email")),
                Node::leaf("name", Some("full_name")),
                Node::repeat(
                    "refs",
                    Some(Node::row("ref_row", vec![Node::leaf("ref_email", Some("email"))])),
                ),
            ],
        )
    }

    #[test]
    fn test_rewrite_renames_every_binding() {
        let rewritten = rewrite_bindings(&sample(), "email", Some("contact_email"));
        assert_eq!(check_in_use(&rewritten, "email"), Vec::<String>::new());
        assert_eq!(
            check_in_use(&rewritten, "contact_email"),
            vec!["email_top".to_string(), "ref_email".to_string()]
        );
        assert_eq!(count_bindings(&rewritten, "full_name"), 1);
    }

    #[test]
    fn test_rewrite_clears_binding() {
        let rewritten = rewrite_bindings(&sample(), "email", None);
        assert_eq!(rewritten.find("email_top").unwrap().bind_field(), None);
        assert_eq!(rewritten.find("ref_email").unwrap().bind_field(), None);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once = rewrite_bindings(&sample(), "email", Some("mail"));
        let twice = rewrite_bindings(&once, "email", Some("mail"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rename_preserves_reference_count() {
        let root = sample();
        let before = count_bindings(&root, "email");
        let after = count_bindings(&rewrite_bindings(&root, "email", Some("mail")), "mail");
        assert_eq!(before, after);
    }

    #[test]
    fn test_rewrite_leaves_input_untouched() {
        let root = sample();
        let _ = rewrite_bindings(&root, "email", None);
        assert_eq!(count_bindings(&root, "email"), 2);
    }

    #[test]
    fn test_dangling_bindings() {
        let tree = LayoutTree::from_root(sample()).unwrap();
        let mut fields = FieldRegistry::new();
        fields.upsert_field(Field::new("email", "Email"), None).unwrap();
        assert_eq!(dangling_bindings(&tree, &fields), vec![("name", "full_name")]);
    }
}
