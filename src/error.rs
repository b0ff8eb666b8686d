//! Error types for template mutations and value handling

use std::fmt;

use thiserror::Error;

/// The kind of entity an id refers to, used in not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Field,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Field => write!(f, "field"),
        }
    }
}

/// Errors raised by tree and registry mutations
///
/// Every public mutation validates before it changes anything, so receiving
/// one of these means the previous template value is still current.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed mutation request
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Reference to an id absent from the structure
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
}

impl EngineError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error for a node id
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Node,
            id: id.into(),
        }
    }

    /// Create a not-found error for a field id
    pub fn field_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Field,
            id: id.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// What an author was doing when an integrity warning came up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityAction {
    Rename,
    Removal,
    /// A binding points at a field the registry does not know
    Dangling,
}

impl fmt::Display for IntegrityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityAction::Rename => write!(f, "rename"),
            IntegrityAction::Removal => write!(f, "removal"),
            IntegrityAction::Dangling => write!(f, "dangling binding"),
        }
    }
}

/// Non-fatal signal that a field change touches live bindings
///
/// This is not an error: the host shows it to the author and the operation
/// proceeds once they accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    pub field_id: String,
    pub action: IntegrityAction,
    /// Node ids bound to the field, in depth-first order
    pub affected_nodes: Vec<String>,
}

impl IntegrityWarning {
    pub fn new(field_id: impl Into<String>, action: IntegrityAction, affected_nodes: Vec<String>) -> Self {
        Self {
            field_id: field_id.into(),
            action,
            affected_nodes,
        }
    }
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of field '{}' affects {} node(s): {}",
            self.action,
            self.field_id,
            self.affected_nodes.len(),
            self.affected_nodes.join(", ")
        )
    }
}
