//! HTML generation from a template tree and its values

use crate::fields::{Field, InputKind};
use crate::scope::{Value, ValueObject};
use crate::style::{resolve_style, ResolvedStyle, Theme};
use crate::template::TemplateDocument;
use crate::tree::{FlexNode, LeafKind, LeafNode, Node, RepeatNode, SectionNode};

use super::css::css_value;
use super::{MarkupConfig, RenderMode};

/// Text shown by a leaf that has neither a value nor a field to describe it
pub const SAMPLE_TEXT: &str = "Sample text";

/// Build HTML elements incrementally
pub struct MarkupBuilder {
    config: MarkupConfig,
    lines: Vec<String>,
    indent: usize,
}

impl MarkupBuilder {
    /// Create a new builder
    pub fn new(config: MarkupConfig) -> Self {
        Self {
            config,
            lines: vec![],
            indent: 0,
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, classes: &[&str]) -> String {
        let prefix = self.config.prefix();
        classes
            .iter()
            .map(|c| format!("{}{}", prefix, c))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn start_tag(&self, tag: &str, node_id: Option<&str>, classes: &[&str], attrs: &str) -> String {
        let id_attr = node_id
            .map(|id| format!(r#" data-node="{}""#, escape_xml(id)))
            .unwrap_or_default();
        format!(
            r#"<{}{} class="{}"{}>"#,
            tag,
            id_attr,
            self.class_list(classes),
            attrs
        )
    }

    /// Open an element; `attrs` is pre-formatted attribute text
    pub fn open(&mut self, tag: &str, node_id: Option<&str>, classes: &[&str], attrs: &str) {
        let line = format!("{}{}", self.indent_str(), self.start_tag(tag, node_id, classes, attrs));
        self.lines.push(line);
        self.indent += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        let line = format!("{}</{}>", self.indent_str(), tag);
        self.lines.push(line);
    }

    /// An element on a single line; `inner` must already be escaped
    pub fn element(&mut self, tag: &str, node_id: Option<&str>, classes: &[&str], attrs: &str, inner: &str) {
        let line = format!(
            "{}{}{}</{}>",
            self.indent_str(),
            self.start_tag(tag, node_id, classes, attrs),
            inner,
            tag
        );
        self.lines.push(line);
    }

    /// A void element such as `<hr>`
    pub fn void(&mut self, tag: &str, classes: &[&str]) {
        let line = format!(
            r#"{}<{} class="{}">"#,
            self.indent_str(),
            tag,
            self.class_list(classes)
        );
        self.lines.push(line);
    }

    /// Build the final markup
    pub fn build(self) -> String {
        self.lines.join(self.newline())
    }
}

/// Walks the layout and feeds a [`MarkupBuilder`]
pub(crate) struct TreeWriter<'a> {
    template: &'a TemplateDocument,
    theme: &'a Theme,
    mode: RenderMode,
    builder: MarkupBuilder,
}

impl<'a> TreeWriter<'a> {
    pub(crate) fn new(template: &'a TemplateDocument, theme: &'a Theme, mode: RenderMode, config: MarkupConfig) -> Self {
        Self {
            template,
            theme,
            mode,
            builder: MarkupBuilder::new(config),
        }
    }

    /// Render the page container and the whole layout under it
    pub(crate) fn write_page(mut self, values: &ValueObject) -> String {
        let attrs = format!(r#" data-template="{}""#, escape_xml(&self.template.id));
        self.builder.open("div", None, &["page"], &attrs);
        let template = self.template;
        self.write_node(template.root(), values);
        self.builder.close("div");
        self.builder.build()
    }

    fn write_node(&mut self, node: &Node, scope: &ValueObject) {
        match node {
            Node::Section(section) => self.write_section(node, section, scope),
            Node::Row(flex) => self.write_flex(node, flex, "row", scope),
            Node::Column(flex) => self.write_flex(node, flex, "column", scope),
            Node::TextLeaf(leaf) => self.write_leaf(node, leaf, scope),
            Node::Repeat(repeat) => self.write_repeat(repeat, scope),
        }
    }

    fn write_section(&mut self, node: &Node, section: &SectionNode, scope: &ValueObject) {
        self.builder.open("section", Some(&section.id), &["section"], "");

        let title = section.title.as_deref().unwrap_or_default();
        if section.show_title && !title.trim().is_empty() {
            let style = resolve_style(self.theme, node);
            let inner = self.with_icon(section.icon.as_deref(), &style, escape_xml(title));
            self.builder
                .element("h2", None, &["section-title"], &format_styles(&style), &inner);
            if section.divider {
                self.builder.void("hr", &["divider"]);
            }
        }

        for child in &section.children {
            self.write_node(child, scope);
        }

        if section.bottom_rule {
            self.builder.void("hr", &["rule"]);
        }
        self.builder.close("section");
    }

    fn write_flex(&mut self, node: &Node, flex: &FlexNode, kind: &str, scope: &ValueObject) {
        let style = resolve_style(self.theme, node);
        self.builder
            .open("div", Some(&flex.id), &[kind], &format_styles(&style));
        for child in &flex.children {
            self.write_node(child, scope);
        }
        self.builder.close("div");
    }

    fn write_leaf(&mut self, node: &Node, leaf: &LeafNode, scope: &ValueObject) {
        let style = resolve_style(self.theme, node);
        let field = leaf
            .bind_field
            .as_deref()
            .and_then(|id| self.template.fields().get(id));
        let value = leaf
            .bind_field
            .as_deref()
            .and_then(|id| scope.get(id))
            .filter(|value| !value.entries().is_empty());

        let kind_class = match leaf.kind {
            LeafKind::Text => "leaf-text",
            LeafKind::Bullets => "leaf-bullets",
            LeafKind::Chips => "leaf-chips",
        };
        let content = match value {
            Some(value) => {
                let input_kind = field.map(|f| f.input_kind).unwrap_or_default();
                self.value_html(leaf.kind, input_kind, value)
            }
            None => format!(
                r#"<span class="{}">{}</span>"#,
                self.builder.class_list(&["placeholder"]),
                escape_xml(fallback_text(field))
            ),
        };
        let inner = self.with_icon(leaf.icon.as_deref(), &style, content);
        self.builder.element(
            "div",
            Some(&leaf.id),
            &["leaf", kind_class],
            &format_styles(&style),
            &inner,
        );
    }

    fn value_html(&self, kind: LeafKind, input_kind: InputKind, value: &Value) -> String {
        // list fields on plain leaves take the field's list style
        let kind = match kind {
            LeafKind::Text if input_kind == InputKind::ListChips => LeafKind::Chips,
            LeafKind::Text if input_kind.is_list() => LeafKind::Bullets,
            _ => kind,
        };
        match kind {
            LeafKind::Bullets => {
                let items: String = value
                    .entries()
                    .into_iter()
                    .map(|entry| format!("<li>{}</li>", escape_xml(entry)))
                    .collect();
                format!(
                    r#"<ul class="{}">{}</ul>"#,
                    self.builder.class_list(&["bullets"]),
                    items
                )
            }
            LeafKind::Chips => {
                let chip_class = self.builder.class_list(&["chip"]);
                let chips: String = value
                    .entries()
                    .into_iter()
                    .map(|entry| format!(r#"<span class="{}">{}</span>"#, chip_class, escape_xml(entry)))
                    .collect();
                format!(
                    r#"<span class="{}">{}</span>"#,
                    self.builder.class_list(&["chips"]),
                    chips
                )
            }
            LeafKind::Text => match value {
                Value::Text(text) => text_html(input_kind, text),
                _ => escape_xml(&value.entries().join(", ")),
            },
        }
    }

    fn with_icon(&self, icon: Option<&str>, style: &ResolvedStyle, content: String) -> String {
        match icon {
            Some(icon) if !icon.is_empty() => format!(
                r#"<span class="{}">{}</span>{}{}"#,
                self.builder.class_list(&["icon"]),
                escape_xml(icon),
                escape_xml(style.icon_separator.as_deref().unwrap_or_default()),
                content
            ),
            _ => content,
        }
    }

    fn write_repeat(&mut self, repeat: &RepeatNode, scope: &ValueObject) {
        if self.mode == RenderMode::Preview {
            let label = repeat.label.as_deref().unwrap_or(&repeat.id);
            self.builder.element(
                "div",
                Some(&repeat.id),
                &["repeat", "repeat-placeholder"],
                "",
                &escape_xml(label),
            );
            return;
        }

        self.builder.open("div", Some(&repeat.id), &["repeat"], "");
        if let Some(template) = repeat.item.as_deref() {
            let instance_class = if bound_leaf_count(template) <= 1 {
                "inline"
            } else {
                "card"
            };
            let items = scope.get(&repeat.id).map(Value::as_items).unwrap_or(&[]);
            for (index, item) in items.iter().enumerate() {
                let attrs = format!(r#" data-index="{}""#, index);
                self.builder
                    .open("div", None, &["repeat-item", instance_class], &attrs);
                self.write_node(template, item);
                self.builder.close("div");
            }
        }
        self.builder.close("div");
    }
}

fn bound_leaf_count(template: &Node) -> usize {
    template
        .descendants()
        .filter(|node| node.bind_field().is_some())
        .count()
}

/// Placeholder, then label, then the generic sample text
fn fallback_text(field: Option<&Field>) -> &str {
    let Some(field) = field else {
        return SAMPLE_TEXT;
    };
    if !field.placeholder.trim().is_empty() {
        &field.placeholder
    } else if !field.label.trim().is_empty() {
        &field.label
    } else {
        SAMPLE_TEXT
    }
}

fn text_html(input_kind: InputKind, text: &str) -> String {
    let text = text.trim();
    match input_kind {
        InputKind::Multiline => text
            .lines()
            .map(|line| escape_xml(line.trim_end()))
            .collect::<Vec<_>>()
            .join("<br>"),
        InputKind::Email => format!(
            r#"<a href="mailto:{}">{}</a>"#,
            escape_xml(text),
            escape_xml(text)
        ),
        InputKind::Phone => {
            let dial: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            format!(r#"<a href="tel:{}">{}</a>"#, dial, escape_xml(text))
        }
        InputKind::Url => {
            let lower = text.to_ascii_lowercase();
            let href = if lower.starts_with("http://") || lower.starts_with("https://") {
                text.to_string()
            } else {
                format!("https://{}", text)
            };
            format!(r#"<a href="{}">{}</a>"#, escape_xml(&href), escape_xml(text))
        }
        _ => escape_xml(text),
    }
}

/// Inline style attribute for a resolved style, or "" when it is empty
pub(crate) fn format_styles(style: &ResolvedStyle) -> String {
    let mut parts = vec![];
    if let Some(family) = &style.font_family {
        parts.push(format!("font-family: {}", css_value(family)));
    }
    if let Some(size) = style.font_size {
        parts.push(format!("font-size: {}px", size));
    }
    if let Some(weight) = style.font_weight {
        parts.push(format!("font-weight: {}", weight));
    }
    if style.italic {
        parts.push("font-style: italic".to_string());
    }
    if let Some(color) = &style.color {
        parts.push(format!("color: {}", css_value(color)));
    }
    if let Some(align) = style.text_align {
        parts.push(format!("text-align: {}", align.as_css()));
    }
    if let Some(align) = &style.align_items {
        parts.push(format!("align-items: {}", css_value(align)));
    }
    if let Some(justify) = &style.justify_content {
        parts.push(format!("justify-content: {}", css_value(justify)));
    }
    if let Some(gap) = style.gap {
        parts.push(format!("gap: {}px", gap));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!(r#" style="{}""#, escape_xml(&parts.join("; ")))
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
