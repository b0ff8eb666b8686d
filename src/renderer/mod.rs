//! HTML renderer for template documents
//!
//! This module walks a template's layout with a value object and produces
//! markup plus the stylesheet that goes with it. The editing preview and the
//! exported document both come from [`render_markup`]; only the
//! [`RenderMode`] differs.

pub mod config;
mod css;
mod markup;

pub use config::{MarkupConfig, RenderMode};
pub use css::build_stylesheet;
pub use markup::{MarkupBuilder, SAMPLE_TEXT};

use crate::scope::ValueObject;
use crate::style::Theme;
use crate::template::TemplateDocument;

use markup::{escape_xml, TreeWriter};

/// Output of a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// The page markup, or a full HTML document when standalone
    pub markup: String,
    pub stylesheet: String,
}

/// Render a template with the given values, theme and mode
///
/// Identical inputs produce byte-identical output. Bindings that resolve to
/// nothing fall back to placeholder text instead of failing.
pub fn render_markup(
    template: &TemplateDocument,
    values: &ValueObject,
    theme: &Theme,
    mode: RenderMode,
    config: &MarkupConfig,
) -> RenderedDocument {
    let stylesheet = build_stylesheet(&template.page, theme, config);
    let page = TreeWriter::new(template, theme, mode, config.clone()).write_page(values);

    let markup = if config.standalone {
        wrap_document(&template.id, &page, &stylesheet, config.pretty_print)
    } else {
        page
    };

    tracing::debug!(
        template = %template.id,
        mode = ?mode,
        bytes = markup.len(),
        "rendered template"
    );

    RenderedDocument { markup, stylesheet }
}

fn wrap_document(title: &str, page: &str, stylesheet: &str, pretty: bool) -> String {
    let nl = if pretty { "\n" } else { "" };
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>");
    html.push_str(nl);
    html.push_str("<html>");
    html.push_str(nl);
    html.push_str("<head>");
    html.push_str(nl);
    html.push_str(r#"<meta charset="utf-8">"#);
    html.push_str(nl);
    html.push_str(&format!("<title>{}</title>", escape_xml(title)));
    html.push_str(nl);
    html.push_str("<style>\n");
    html.push_str(stylesheet);
    html.push_str("</style>");
    html.push_str(nl);
    html.push_str("</head>");
    html.push_str(nl);
    html.push_str("<body>");
    html.push_str(nl);
    html.push_str(page);
    html.push_str(nl);
    html.push_str("</body>");
    html.push_str(nl);
    html.push_str("</html>");
    html.push_str(nl);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;

    #[test]
    fn test_standalone_wraps_page() {
        let template = TemplateDocument::new("cv <draft>");
        let doc = render_markup(
            &template,
            &ValueObject::new(),
            &template.theme,
            RenderMode::Preview,
            &MarkupConfig::default(),
        );
        assert!(doc.markup.starts_with("<!DOCTYPE html>\n<html>\n"));
        assert!(doc.markup.contains("<title>cv &lt;draft&gt;</title>"));
        assert!(doc.markup.contains(&doc.stylesheet));
        assert!(doc.markup.ends_with("</html>\n"));
    }

    #[test]
    fn test_fragment_is_page_only() {
        let template = TemplateDocument::new("t");
        let config = MarkupConfig::default().with_standalone(false);
        let doc = render_markup(&template, &ValueObject::new(), &template.theme, RenderMode::Preview, &config);
        assert!(doc.markup.starts_with(r#"<div class="bp-page" data-template="t">"#));
        assert!(!doc.markup.contains("<style>"));
    }

    #[test]
    fn test_theme_override_changes_output() {
        let template = TemplateDocument::new("t")
            .insert_child("root", Node::leaf("l", None), None)
            .unwrap();
        let config = MarkupConfig::default().with_standalone(false);
        let theme = template.theme.clone().with_base_font_size(20.0);
        let base = render_markup(&template, &ValueObject::new(), &template.theme, RenderMode::Preview, &config);
        let big = render_markup(&template, &ValueObject::new(), &theme, RenderMode::Preview, &config);
        assert!(base.markup.contains("font-size: 11px"));
        assert!(big.markup.contains("font-size: 20px"));
    }
}
