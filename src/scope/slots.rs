//! Enumeration of the form controls a filled template needs
//!
//! Each bound leaf appears once per repeat instance it lives in. The form
//! surface uses the slots to know which scope each control writes to.

use crate::fields::FieldRegistry;
use crate::tree::Node;

use super::resolver::{format_path, PathSegment, RepeatPath};
use super::values::{Value, ValueObject};

/// One bound leaf instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub path: RepeatPath,
    pub node_id: String,
    pub field_id: String,
}

impl FieldSlot {
    /// Human-readable location, e.g. `exp[1]/role_leaf`
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            self.node_id.clone()
        } else {
            format!("{}/{}", format_path(&self.path), self.node_id)
        }
    }
}

/// Every bound leaf instance under `root`, in document order
///
/// Repeats contribute one set of slots per entry present in `values`.
pub fn field_slots(root: &Node, values: &ValueObject) -> Vec<FieldSlot> {
    let mut slots = Vec::new();
    let mut path = Vec::new();
    collect_slots(root, values, &mut path, &mut slots);
    slots
}

fn collect_slots(node: &Node, scope: &ValueObject, path: &mut RepeatPath, slots: &mut Vec<FieldSlot>) {
    match node {
        Node::TextLeaf(leaf) => {
            if let Some(field) = &leaf.bind_field {
                slots.push(FieldSlot {
                    path: path.clone(),
                    node_id: leaf.id.clone(),
                    field_id: field.clone(),
                });
            }
        }
        Node::Repeat(repeat) => {
            let Some(template) = repeat.item.as_deref() else {
                return;
            };
            let items = scope.get(&repeat.id).map(Value::as_items).unwrap_or(&[]);
            for (index, item) in items.iter().enumerate() {
                path.push(PathSegment::new(repeat.id.clone(), index));
                collect_slots(template, item, path, slots);
                path.pop();
            }
        }
        _ => {
            for child in node.children() {
                collect_slots(child, scope, path, slots);
            }
        }
    }
}

/// What is wrong with a filled-in value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingRequired,
    TooLong { max: usize, actual: usize },
}

/// A problem found while checking values against field constraints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueIssue {
    pub slot: FieldSlot,
    pub kind: IssueKind,
}

impl std::fmt::Display for ValueIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::MissingRequired => {
                write!(f, "{}: field '{}' is required", self.slot.location(), self.slot.field_id)
            }
            IssueKind::TooLong { max, actual } => write!(
                f,
                "{}: field '{}' has {} characters, at most {} allowed",
                self.slot.location(),
                self.slot.field_id,
                actual,
                max
            ),
        }
    }
}

/// Check required and max-length constraints for every slot
///
/// Bindings to unknown fields are skipped; they are reported by template
/// validation instead. List values are checked entry by entry.
pub fn check_values(fields: &FieldRegistry, root: &Node, values: &ValueObject) -> Vec<ValueIssue> {
    let mut issues = Vec::new();
    for slot in field_slots(root, values) {
        let Some(field) = fields.get(&slot.field_id) else {
            continue;
        };
        let scope = super::resolver::resolve_scope(values, &slot.path);
        let value = scope.get(&slot.field_id);

        if field.required && value.map_or(true, Value::is_blank) {
            issues.push(ValueIssue {
                slot: slot.clone(),
                kind: IssueKind::MissingRequired,
            });
        }

        if let (Some(max), Some(value)) = (field.max_length, value) {
            let longest = match value {
                Value::Text(s) => s.chars().count(),
                Value::Strings(entries) => entries.iter().map(|e| e.chars().count()).max().unwrap_or(0),
                Value::Items(_) => 0,
            };
            if longest > max {
                issues.push(ValueIssue {
                    slot,
                    kind: IssueKind::TooLong {
                        max,
                        actual: longest,
                    },
                });
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, InputKind};
    use crate::tree::ROOT_ID;
    use pretty_assertions::assert_eq;

    fn layout() -> Node {
        Node::section(
            ROOT_ID,
            vec![
                Node::leaf("name_leaf", Some("full_name")),
                Node::repeat(
                    "exp",
                    Some(Node::column(
                        "exp_item",
                        vec![
                            Node::leaf("role_leaf", Some("role")),
                            Node::repeat("notes", Some(Node::leaf("note_leaf", Some("note")))),
                        ],
                    )),
                ),
                Node::leaf("free", None),
            ],
        )
    }

    fn values() -> ValueObject {
        serde_json::from_str(
            r#"{
                "full_name": "",
                "exp": [
                    { "role": "Engineer", "notes": [{ "note": "n1" }, { "note": "n2" }] },
                    { "role": "" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_slots_follow_repeat_entries() {
        let slots = field_slots(&layout(), &values());
        let locations: Vec<String> = slots.iter().map(FieldSlot::location).collect();
        assert_eq!(
            locations,
            vec![
                "name_leaf",
                "exp[0]/role_leaf",
                "exp[0].notes[0]/note_leaf",
                "exp[0].notes[1]/note_leaf",
                "exp[1]/role_leaf",
            ]
        );
    }

    #[test]
    fn test_slots_without_values_skip_repeats() {
        let slots = field_slots(&layout(), &ValueObject::new());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].field_id, "full_name");
    }

    #[test]
    fn test_check_values_reports_required_and_length() {
        let mut fields = FieldRegistry::new();
        fields.upsert_field(Field::new("full_name", "Full Name").required(), None).unwrap();
        fields.upsert_field(Field::new("role", "Role").required().with_max_length(5), None).unwrap();

        let issues = check_values(&fields, &layout(), &values());
        let rendered: Vec<String> = issues.iter().map(ValueIssue::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "name_leaf: field 'full_name' is required",
                "exp[0]/role_leaf: field 'role' has 8 characters, at most 5 allowed",
                "exp[1]/role_leaf: field 'role' is required",
            ]
        );
    }

    #[test]
    fn test_max_length_applies_per_list_entry() {
        let mut fields = FieldRegistry::new();
        fields
            .upsert_field(
                Field::new("skills", "Skills").with_kind(InputKind::ListChips).with_max_length(6),
                None,
            )
            .unwrap();
        let root = Node::section(ROOT_ID, vec![Node::leaf("skills_leaf", Some("skills"))]);

        // eight entries of six characters: 48 in total, none over the limit
        let short: ValueObject =
            serde_json::from_str(r#"{"skills": ["rustic", "golang", "kotlin", "elixir", "pascal", "prolog", "racket", "erlang"]}"#)
                .unwrap();
        assert!(check_values(&fields, &root, &short).is_empty());

        let long: ValueObject = serde_json::from_str(r#"{"skills": ["sql", "typescript", "c"]}"#).unwrap();
        let issues = check_values(&fields, &root, &long);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::TooLong { max: 6, actual: 10 });
        assert_eq!(issues[0].slot.location(), "skills_leaf");
    }
}
