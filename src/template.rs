//! Template documents: the unit hosts store and load
//!
//! A [`TemplateDocument`] owns its field registry and layout tree together
//! so that field renames and removals always rewrite bindings in the same
//! step. Every editing method returns a new document and leaves `self`
//! untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bindings::{check_in_use, dangling_bindings, rewrite_bindings};
use crate::error::{EngineError, IntegrityAction, IntegrityWarning};
use crate::fields::{Field, FieldRegistry};
use crate::scope::ValueObject;
use crate::style::Theme;
use crate::tree::{LayoutTree, Node, NodePatch};

/// The template schema version this crate reads and writes
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from loading or saving documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("invalid template: {0}")]
    Invalid(#[from] EngineError),
}

/// Reject documents written for a schema this crate does not understand
pub fn ensure_supported_schema(version: u32) -> Result<(), DocumentError> {
    if version != SCHEMA_VERSION {
        return Err(DocumentError::UnsupportedSchema {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Paper size
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Custom {
        #[serde(rename = "widthMm", alias = "width_mm")]
        width_mm: f64,
        #[serde(rename = "heightMm", alias = "height_mm")]
        height_mm: f64,
    },
}

impl PageSize {
    /// Width and height in millimetres
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

/// Page margins in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(15.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub margins: Margins,
}

/// Options for [`TemplateDocument::remove_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveField {
    /// Clear bindings to the field instead of asking for confirmation
    pub cascade: bool,
}

/// Result of a field removal request
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRemoval {
    /// The field is gone; `cleared` lists the nodes that lost their binding
    Removed {
        template: Box<TemplateDocument>,
        cleared: Vec<String>,
    },
    /// The field is still bound; nothing changed
    NeedsConfirmation(IntegrityWarning),
}

/// A template: page setup, theme, fields and layout
///
/// Serialized with camelCase keys; the snake_case spellings load as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    pub id: String,
    #[serde(alias = "schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    fields: FieldRegistry,
    #[serde(default)]
    layout: LayoutTree,
}

impl TemplateDocument {
    /// An empty template with default page and theme
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_version: SCHEMA_VERSION,
            page: Page::default(),
            theme: Theme::default(),
            fields: FieldRegistry::new(),
            layout: LayoutTree::new(),
        }
    }

    /// Assemble a template from parts, checking tree invariants
    pub fn from_parts(
        id: impl Into<String>,
        fields: FieldRegistry,
        root: Node,
    ) -> Result<Self, EngineError> {
        let mut doc = Self::new(id);
        doc.fields = fields;
        doc.layout = LayoutTree::from_root(root)?;
        Ok(doc)
    }

    /// Parse a JSON document, checking schema version and structure
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        let doc: TemplateDocument = serde_json::from_str(content)?;
        doc.check_loaded()?;
        Ok(doc)
    }

    /// Checks every freshly deserialized document must pass before use
    pub fn check_loaded(&self) -> Result<(), DocumentError> {
        ensure_supported_schema(self.schema_version)?;
        self.layout.validate()?;
        if let Some(key) = self.fields.mismatched_keys().first() {
            return Err(EngineError::validation(format!(
                "field stored under '{}' has a different id",
                key
            ))
            .into());
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    pub fn root(&self) -> &Node {
        &self.layout.root
    }

    fn with_layout(&self, layout: LayoutTree) -> Self {
        Self {
            layout,
            ..self.clone()
        }
    }

    // Layout editing

    /// Insert a subtree; bindings in it must name existing fields
    pub fn insert_child(&self, parent_id: &str, node: Node, index: Option<usize>) -> Result<Self, EngineError> {
        for field in node.descendants().filter_map(Node::bind_field) {
            self.require_field(field)?;
        }
        Ok(self.with_layout(self.layout.insert_child(parent_id, node, index)?))
    }

    pub fn remove_node(&self, node_id: &str) -> Result<Self, EngineError> {
        Ok(self.with_layout(self.layout.remove_node(node_id)?))
    }

    pub fn move_node(&self, node_id: &str, new_parent_id: &str, index: usize) -> Result<Self, EngineError> {
        Ok(self.with_layout(self.layout.move_node(node_id, new_parent_id, index)?))
    }

    /// Patch a node; a patch that binds a field requires the field to exist
    pub fn update_node_attributes(&self, node_id: &str, patch: NodePatch) -> Result<Self, EngineError> {
        if let NodePatch::Leaf(leaf) = &patch {
            if let Some(Some(field)) = &leaf.bind_field {
                self.require_field(field)?;
            }
        }
        Ok(self.with_layout(self.layout.update_node_attributes(node_id, patch)?))
    }

    /// Bind a leaf to a field, or clear its binding with `None`
    pub fn bind_leaf(&self, node_id: &str, field_id: Option<&str>) -> Result<Self, EngineError> {
        self.update_node_attributes(node_id, NodePatch::bind(field_id))
    }

    fn require_field(&self, field_id: &str) -> Result<(), EngineError> {
        if !self.fields.contains(field_id) {
            return Err(EngineError::field_not_found(field_id));
        }
        Ok(())
    }

    // Field editing

    /// Create or edit a field
    ///
    /// Editing a field under a new id is a rename: bindings follow it and
    /// the returned warning lists the rebound nodes.
    pub fn upsert_field(
        &self,
        field: Field,
        editing: Option<&str>,
    ) -> Result<(Self, Option<IntegrityWarning>), EngineError> {
        let mut next = self.clone();
        next.fields.upsert_field(field.clone(), editing)?;

        let warning = match editing {
            Some(old_id) if old_id != field.id => {
                next.rebind(old_id, Some(&field.id), IntegrityAction::Rename)
            }
            _ => None,
        };
        Ok((next, warning))
    }

    /// Rename a field and rebind every leaf bound to it
    pub fn rename_field(&self, old_id: &str, new_id: &str) -> Result<(Self, Option<IntegrityWarning>), EngineError> {
        let mut next = self.clone();
        next.fields.rename_field(old_id, new_id)?;
        if old_id == new_id {
            return Ok((next, None));
        }
        let warning = next.rebind(old_id, Some(new_id), IntegrityAction::Rename);
        Ok((next, warning))
    }

    /// Nodes bound to `field_id`, in depth-first order
    pub fn check_in_use(&self, field_id: &str) -> Vec<String> {
        check_in_use(&self.layout.root, field_id)
    }

    /// Remove a field
    ///
    /// Without `cascade`, a field that is still bound is left in place and
    /// a warning comes back for the host to confirm. With `cascade` the field
    /// is removed and its bindings cleared. Unknown ids remove nothing.
    pub fn remove_field(&self, field_id: &str, options: RemoveField) -> FieldRemoval {
        let affected = self.check_in_use(field_id);
        if !affected.is_empty() && !options.cascade {
            let warning = IntegrityWarning::new(field_id, IntegrityAction::Removal, affected);
            tracing::warn!(field = field_id, "{}", warning);
            return FieldRemoval::NeedsConfirmation(warning);
        }

        let mut next = self.clone();
        next.fields.remove_field(field_id);
        if !affected.is_empty() {
            next.layout.root = rewrite_bindings(&next.layout.root, field_id, None);
        }
        FieldRemoval::Removed {
            template: Box::new(next),
            cleared: affected,
        }
    }

    fn rebind(&mut self, old_id: &str, new_id: Option<&str>, action: IntegrityAction) -> Option<IntegrityWarning> {
        let affected = check_in_use(&self.layout.root, old_id);
        if affected.is_empty() {
            return None;
        }
        self.layout.root = rewrite_bindings(&self.layout.root, old_id, new_id);
        let warning = IntegrityWarning::new(old_id, action, affected);
        tracing::warn!(field = old_id, "{}", warning);
        Some(warning)
    }

    /// Bindings that point at unknown fields, grouped by field
    pub fn validate(&self) -> Vec<IntegrityWarning> {
        let mut warnings: Vec<IntegrityWarning> = Vec::new();
        for (node, field) in dangling_bindings(&self.layout, &self.fields) {
            match warnings.iter_mut().find(|w| w.field_id == field) {
                Some(warning) => warning.affected_nodes.push(node.to_string()),
                None => warnings.push(IntegrityWarning::new(
                    field,
                    IntegrityAction::Dangling,
                    vec![node.to_string()],
                )),
            }
        }
        warnings
    }
}

/// Parse a value object from JSON
pub fn parse_values(content: &str) -> Result<ValueObject, DocumentError> {
    Ok(serde_json::from_str(content)?)
}

/// Read a value object from a JSON file
pub fn load_values(path: &Path) -> Result<ValueObject, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    parse_values(&content)
}
