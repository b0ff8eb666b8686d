//! Scope resolution and structural updates for nested repeats
//!
//! A repeat path names one instance inside (possibly nested) repeats. The
//! scope at a path is the value object of that instance; fields bound
//! inside the repeat read and write there.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::Node;

use super::values::{Value, ValueObject};

static EMPTY_SCOPE: ValueObject = BTreeMap::new();

/// One step into a repeat: which repeat node and which entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub repeat_id: String,
    pub index: usize,
}

impl PathSegment {
    pub fn new(repeat_id: impl Into<String>, index: usize) -> Self {
        Self {
            repeat_id: repeat_id.into(),
            index,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.repeat_id, self.index)
    }
}

/// Ordered segments from the root scope down to one repeat instance
pub type RepeatPath = Vec<PathSegment>;

/// Render a path as `exp[0].bullets[2]`
pub fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(PathSegment::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// The value object visible at `path`
///
/// Missing or non-list entries read as empty lists and an out-of-range index
/// yields the empty scope.
pub fn resolve_scope<'a>(values: &'a ValueObject, path: &[PathSegment]) -> &'a ValueObject {
    let mut scope = values;
    for segment in path {
        let items = scope
            .get(&segment.repeat_id)
            .map(Value::as_items)
            .unwrap_or(&[]);
        match items.get(segment.index) {
            Some(item) => scope = item,
            None => return &EMPTY_SCOPE,
        }
    }
    scope
}

/// Replace the scope at `path` with `updater(current scope)`
///
/// Only the mappings along the path are rebuilt; everything else is carried
/// over unchanged. Missing lists are created and short lists padded with
/// empty entries so the written scope is always reachable afterwards.
pub fn write_at_scope<F>(values: &ValueObject, path: &[PathSegment], updater: F) -> ValueObject
where
    F: FnOnce(&ValueObject) -> ValueObject,
{
    let Some((segment, rest)) = path.split_first() else {
        return updater(values);
    };

    let mut items: Vec<ValueObject> = values
        .get(&segment.repeat_id)
        .map(|v| v.as_items().to_vec())
        .unwrap_or_default();
    if items.len() <= segment.index {
        items.resize_with(segment.index + 1, ValueObject::new);
    }
    let updated = write_at_scope(&items[segment.index], rest, updater);
    items[segment.index] = updated;

    let mut next = values.clone();
    next.insert(segment.repeat_id.clone(), Value::Items(items));
    next
}

/// Set one field value inside the scope at `path`
pub fn set_value(values: &ValueObject, path: &[PathSegment], field_id: &str, value: Value) -> ValueObject {
    tracing::debug!(path = %format_path(path), field = field_id, "writing value");
    write_at_scope(values, path, |scope| {
        let mut scope = scope.clone();
        scope.insert(field_id.to_string(), value);
        scope
    })
}

/// A fresh entry for a repeat whose item template is `item_template`
///
/// Every bound field starts as empty text and every nested repeat as an
/// empty list.
pub fn default_item(item_template: Option<&Node>) -> ValueObject {
    let mut item = ValueObject::new();
    if let Some(template) = item_template {
        collect_defaults(template, &mut item);
    }
    item
}

fn collect_defaults(node: &Node, item: &mut ValueObject) {
    match node {
        Node::TextLeaf(leaf) => {
            if let Some(field) = &leaf.bind_field {
                item.insert(field.clone(), Value::Text(String::new()));
            }
        }
        Node::Repeat(repeat) => {
            item.insert(repeat.id.clone(), Value::Items(vec![]));
        }
        _ => {
            for child in node.children() {
                collect_defaults(child, item);
            }
        }
    }
}

/// Edit the list stored under `repeat_id` in the scope at `path`
fn update_list<F>(values: &ValueObject, path: &[PathSegment], repeat_id: &str, edit: F) -> ValueObject
where
    F: FnOnce(&mut Vec<ValueObject>),
{
    write_at_scope(values, path, |scope| {
        let mut items = scope
            .get(repeat_id)
            .map(|v| v.as_items().to_vec())
            .unwrap_or_default();
        edit(&mut items);
        let mut scope = scope.clone();
        scope.insert(repeat_id.to_string(), Value::Items(items));
        scope
    })
}

/// Append a freshly defaulted entry to a repeat list
pub fn append_item(
    values: &ValueObject,
    path: &[PathSegment],
    repeat_id: &str,
    item_template: Option<&Node>,
) -> ValueObject {
    let item = default_item(item_template);
    tracing::debug!(path = %format_path(path), repeat = repeat_id, "appending item");
    update_list(values, path, repeat_id, |items| items.push(item))
}

/// Remove the entry at `index`; an out-of-range index changes nothing
pub fn remove_item(values: &ValueObject, path: &[PathSegment], repeat_id: &str, index: usize) -> ValueObject {
    if index >= resolve_list(values, path, repeat_id).len() {
        return values.clone();
    }
    tracing::debug!(path = %format_path(path), repeat = repeat_id, index, "removing item");
    update_list(values, path, repeat_id, |items| {
        items.remove(index);
    })
}

/// Swap an entry with its neighbour; moving past either end changes nothing
pub fn move_item(
    values: &ValueObject,
    path: &[PathSegment],
    repeat_id: &str,
    index: usize,
    direction: MoveDirection,
) -> ValueObject {
    let len = resolve_list(values, path, repeat_id).len();
    let target = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => index.checked_add(1).filter(|t| *t < len),
    };
    let Some(target) = target.filter(|_| index < len) else {
        return values.clone();
    };
    tracing::debug!(path = %format_path(path), repeat = repeat_id, from = index, to = target, "moving item");
    update_list(values, path, repeat_id, |items| items.swap(index, target))
}

/// Entries of the repeat `repeat_id` visible at `path`
pub fn resolve_list<'a>(values: &'a ValueObject, path: &[PathSegment], repeat_id: &str) -> &'a [ValueObject] {
    resolve_scope(values, path)
        .get(repeat_id)
        .map(Value::as_items)
        .unwrap_or(&[])
}
