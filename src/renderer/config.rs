//! Render mode and HTML output options

/// Class prefix used unless the host picks its own
pub const DEFAULT_CLASS_PREFIX: &str = "bp-";

/// Which surface the output is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Template editing canvas: repeats render as placeholder blocks
    #[default]
    Preview,
    /// Filled document: repeats expand once per list entry
    Fill,
}

/// How the HTML for a page is emitted
///
/// The stylesheet and the markup share `class_prefix`, so a host embedding
/// several documents on one page can keep their classes apart.
#[derive(Debug, Clone)]
pub struct MarkupConfig {
    /// Emit `<!DOCTYPE html>` with the stylesheet inlined in `<head>`;
    /// otherwise only the page `<div>`
    pub standalone: bool,

    /// One element per line, nested elements indented
    pub pretty_print: bool,

    /// Prepended to every class the renderer emits; `None` leaves class
    /// names bare
    pub class_prefix: Option<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some(DEFAULT_CLASS_PREFIX.to_string()),
        }
    }
}

impl MarkupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Bare class names such as `section` and `leaf-text`
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub(crate) fn prefix(&self) -> &str {
        self.class_prefix.as_deref().unwrap_or_default()
    }
}
