//! Stylesheet text accompanying the rendered markup

use crate::style::{font_px, SizeToken, SpacingToken, Theme};
use crate::template::Page;

use super::MarkupConfig;

/// Stylesheet for a page and theme
///
/// Theme colors become custom properties (`--bp-primary` and so on) in key
/// order, so the output is stable for a given theme.
pub fn build_stylesheet(page: &Page, theme: &Theme, config: &MarkupConfig) -> String {
    let p = config.prefix();
    let (width, height) = page.size.dimensions_mm();
    let m = &page.margins;
    let tight = theme.spacing.px(SpacingToken::Tight);
    let normal = theme.spacing.px(SpacingToken::Normal);

    let mut css = String::new();
    css.push_str(&format!(
        "@page {{ size: {}mm {}mm; margin: 0; }}\n",
        width, height
    ));

    css.push_str(":root {\n");
    for (token, value) in &theme.colors {
        css.push_str(&format!(
            "  --{}{}: {};\n",
            p,
            css_ident(token),
            css_value(value)
        ));
    }
    css.push_str(&format!("  --{}font-heading: {};\n", p, css_value(&theme.fonts.heading)));
    css.push_str(&format!("  --{}font-body: {};\n", p, css_value(&theme.fonts.body)));
    css.push_str("}\n");

    css.push_str(&format!(
        ".{p}page {{ box-sizing: border-box; width: {w}mm; min-height: {h}mm; padding: {}mm {}mm {}mm {}mm; \
         font-family: var(--{p}font-body); font-size: {}px; color: var(--{p}primary, #000); }}\n",
        m.top,
        m.right,
        m.bottom,
        m.left,
        font_px(theme, SizeToken::Body),
        p = p,
        w = width,
        h = height,
    ));
    css.push_str(&format!(
        ".{p}section {{ margin: 0 0 {}px 0; }}\n",
        theme.spacing.section,
        p = p
    ));
    css.push_str(&format!(".{p}section-title {{ margin: 0 0 {}px 0; }}\n", tight, p = p));
    css.push_str(&format!(
        ".{p}divider, .{p}rule {{ border: 0; border-top: 1px solid var(--{p}meta, #999); margin: {}px 0; }}\n",
        tight,
        p = p
    ));
    css.push_str(&format!(
        ".{p}row {{ display: flex; flex-direction: row; gap: {}px; }}\n",
        normal,
        p = p
    ));
    css.push_str(&format!(
        ".{p}column {{ display: flex; flex-direction: column; gap: {}px; }}\n",
        tight,
        p = p
    ));
    css.push_str(&format!(".{p}leaf {{ margin: 0; }}\n", p = p));
    css.push_str(&format!(
        ".{p}bullets {{ margin: 0; padding-left: 1.2em; }}\n",
        p = p
    ));
    css.push_str(&format!(
        ".{p}chips {{ display: flex; flex-wrap: wrap; gap: {}px; }}\n",
        tight,
        p = p
    ));
    css.push_str(&format!(
        ".{p}chip {{ padding: 1px 6px; border: 1px solid var(--{p}accent, currentColor); border-radius: 8px; }}\n",
        p = p
    ));
    css.push_str(&format!(
        ".{p}placeholder {{ color: var(--{p}meta, #999); font-style: italic; }}\n",
        p = p
    ));
    css.push_str(&format!(
        ".{p}repeat-placeholder {{ padding: {}px; border: 1px dashed var(--{p}meta, #999); color: var(--{p}meta, #999); }}\n",
        normal,
        p = p
    ));
    css.push_str(&format!(
        ".{p}card {{ margin: 0 0 {}px 0; }}\n",
        normal,
        p = p
    ));
    css.push_str(&format!(
        ".{p}inline {{ display: inline-block; margin: 0 {}px 0 0; }}\n",
        normal,
        p = p
    ));
    css.push_str(&format!(
        "@media print {{ .{p}page {{ width: auto; min-height: auto; }} }}\n",
        p = p
    ));
    css
}

/// Keep token names usable as custom property names
fn css_ident(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Drop characters that would end a declaration or the style element
pub(crate) fn css_value(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Margins, PageSize};

    #[test]
    fn test_page_rule_uses_dimensions() {
        let page = Page {
            size: PageSize::Letter,
            margins: Margins::uniform(10.0),
        };
        let css = build_stylesheet(&page, &Theme::default(), &MarkupConfig::default());
        assert!(css.starts_with("@page { size: 215.9mm 279.4mm; margin: 0; }\n"));
        assert!(css.contains("padding: 10mm 10mm 10mm 10mm;"));
    }

    #[test]
    fn test_colors_in_key_order() {
        let css = build_stylesheet(&Page::default(), &Theme::default(), &MarkupConfig::default());
        let accent = css.find("--bp-accent: #2f6fde;").unwrap();
        let meta = css.find("--bp-meta:").unwrap();
        let primary = css.find("--bp-primary:").unwrap();
        assert!(accent < meta && meta < primary);
    }

    #[test]
    fn test_hostile_theme_values_sanitized() {
        let mut theme = Theme::default();
        theme
            .colors
            .insert("bad name".to_string(), "red; } </style>".to_string());
        let css = build_stylesheet(&Page::default(), &theme, &MarkupConfig::default());
        assert!(css.contains("--bp-bad-name: red  /style;"));
        assert!(!css.contains("</style>"));
    }

    #[test]
    fn test_prefix_applies_to_classes() {
        let config = MarkupConfig::default().with_class_prefix("cv-");
        let css = build_stylesheet(&Page::default(), &Theme::default(), &config);
        assert!(css.contains(".cv-section {"));
        assert!(!css.contains(".bp-"));
    }
}
