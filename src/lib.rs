//! Blockprint - template documents with bindable fields and HTML rendering
//!
//! This library provides the document model behind a template editor: a
//! layout tree of typed blocks, a registry of named fields that leaf blocks
//! bind to, repeat blocks with nested value scopes, theme-driven styling,
//! and a deterministic HTML renderer shared by preview and export.
//!
//! # Example
//!
//! ```rust
//! use blockprint::{render, Field, Node, TemplateDocument, Value, ValueObject};
//!
//! let template = TemplateDocument::new("card")
//!     .upsert_field(Field::new("full_name", "Full Name"), None)
//!     .unwrap()
//!     .0
//!     .insert_child("root", Node::leaf("name", Some("full_name")), None)
//!     .unwrap();
//!
//! let mut values = ValueObject::new();
//! values.insert("full_name".to_string(), Value::text("Ada Lovelace"));
//!
//! let doc = render(&template, &values);
//! assert!(doc.markup.contains("Ada Lovelace"));
//! ```

pub mod bindings;
pub mod error;
pub mod fields;
pub mod renderer;
pub mod scope;
pub mod store;
pub mod style;
pub mod template;
pub mod tree;

pub use error::{EngineError, IntegrityAction, IntegrityWarning};
pub use fields::{Field, FieldRegistry, InputKind};
pub use renderer::{render_markup, MarkupConfig, RenderMode, RenderedDocument};
pub use scope::{Value, ValueObject};
pub use style::{Theme, ThemeError};
pub use template::{DocumentError, FieldRemoval, RemoveField, TemplateDocument};
pub use tree::{LayoutTree, Node, NodePatch};

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Whether repeats expand or render as placeholders
    pub mode: RenderMode,
    /// HTML output configuration
    pub markup: MarkupConfig,
    /// Theme to use instead of the template's own
    pub theme: Option<Theme>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render mode
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the markup configuration
    pub fn with_markup(mut self, config: MarkupConfig) -> Self {
        self.markup = config;
        self
    }

    /// Override the template's theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// Render a filled document with default configuration
///
/// Repeats expand once per entry in `values`.
pub fn render(template: &TemplateDocument, values: &ValueObject) -> RenderedDocument {
    render_with_config(template, values, &RenderConfig::new().with_mode(RenderMode::Fill))
}

/// Render the editing preview of a template
///
/// # Example
///
/// ```rust
/// use blockprint::{render_preview, Node, TemplateDocument};
///
/// let template = TemplateDocument::new("t")
///     .insert_child("root", Node::repeat("exp", Some(Node::leaf("role", None))), None)
///     .unwrap();
///
/// let doc = render_preview(&template);
/// assert!(doc.markup.contains("bp-repeat-placeholder"));
/// ```
pub fn render_preview(template: &TemplateDocument) -> RenderedDocument {
    render_with_config(template, &ValueObject::new(), &RenderConfig::new())
}

/// Render with custom configuration
///
/// # Example
///
/// ```rust
/// use blockprint::{render_with_config, MarkupConfig, RenderConfig, TemplateDocument, ValueObject};
///
/// let config = RenderConfig::new()
///     .with_markup(MarkupConfig::default().with_standalone(false).with_class_prefix("cv-"));
///
/// let doc = render_with_config(&TemplateDocument::new("t"), &ValueObject::new(), &config);
/// assert!(doc.markup.starts_with(r#"<div class="cv-page""#));
/// ```
pub fn render_with_config(template: &TemplateDocument, values: &ValueObject, config: &RenderConfig) -> RenderedDocument {
    let theme = config.theme.as_ref().unwrap_or(&template.theme);
    render_markup(template, values, theme, config.mode, &config.markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ROOT_ID;

    fn template() -> TemplateDocument {
        let mut fields = FieldRegistry::new();
        fields
            .upsert_field(Field::new("role", "Role").with_placeholder("Your role"), None)
            .unwrap();
        let root = Node::section(
            ROOT_ID,
            vec![Node::repeat("exp", Some(Node::leaf("role_leaf", Some("role"))))],
        );
        TemplateDocument::from_parts("t", fields, root).unwrap()
    }

    fn values() -> ValueObject {
        serde_json::from_str(r#"{"exp": [{"role": "Engineer"}, {"role": ""}]}"#).unwrap()
    }

    #[test]
    fn test_render_expands_repeats() {
        let doc = render(&template(), &values());
        assert!(doc.markup.contains("Engineer"));
        assert!(doc.markup.contains(">Your role</span>"));
        assert!(!doc.markup.contains("bp-repeat-placeholder"));
    }

    #[test]
    fn test_preview_keeps_placeholder() {
        let doc = render_preview(&template());
        assert!(doc.markup.contains("bp-repeat-placeholder"));
        assert!(!doc.markup.contains("Your role"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render(&template(), &values());
        let second = render(&template(), &values());
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_theme_override() {
        let mut theme = Theme::default();
        theme.colors.insert("primary".to_string(), "#000000".to_string());
        let config = RenderConfig::new().with_theme(theme);
        let doc = render_with_config(&template(), &values(), &config);
        assert!(doc.stylesheet.contains("--bp-primary: #000000;"));
    }
}
