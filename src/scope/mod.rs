//! Value scopes for templates with nested repeats
//!
//! Values live in a nested object that mirrors the repeat structure of the
//! layout: a repeat node's id maps to a list with one object per instance,
//! and fields inside the repeat are read from and written to that object.
//!
//! All operations return new value objects; the input is never modified.
//!
//! # Example
//!
//! ```rust
//! use blockprint::scope::{append_item, resolve_scope, set_value, PathSegment, Value, ValueObject};
//! use blockprint::tree::Node;
//!
//! let item = Node::leaf("role_leaf", Some("role"));
//! let values = append_item(&ValueObject::new(), &[], "exp", Some(&item));
//! let path = vec![PathSegment::new("exp", 0)];
//! let values = set_value(&values, &path, "role", Value::text("Engineer"));
//!
//! assert_eq!(resolve_scope(&values, &path)["role"], Value::text("Engineer"));
//! ```

mod resolver;
mod slots;
mod values;

pub use resolver::{
    append_item, default_item, format_path, move_item, remove_item, resolve_list, resolve_scope,
    set_value, write_at_scope, MoveDirection, PathSegment, RepeatPath,
};
pub use slots::{check_values, field_slots, FieldSlot, IssueKind, ValueIssue};
pub use values::{text_at, Value, ValueObject};
