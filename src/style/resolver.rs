//! Resolution of node style tokens against a theme

use crate::tree::Node;

use super::theme::Theme;
use super::tokens::{SizeToken, TextAlign};

/// Weight for body text when a leaf sets none
pub const DEFAULT_BODY_WEIGHT: u16 = 400;
/// Weight for section titles
pub const DEFAULT_TITLE_WEIGHT: u16 = 700;
/// Text between an icon and the value it decorates
pub const DEFAULT_ICON_SEPARATOR: &str = " ";

/// Concrete style values ready for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedStyle {
    pub font_family: Option<String>,
    /// Font size in whole pixels
    pub font_size: Option<u32>,
    pub font_weight: Option<u16>,
    pub italic: bool,
    pub color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub align_items: Option<String>,
    pub justify_content: Option<String>,
    /// Gap between flex children in pixels
    pub gap: Option<f64>,
    pub icon_separator: Option<String>,
}

/// Pixel size for a size token: base size times the token's scale, rounded
///
/// Negative bases and factors count as zero.
pub fn font_px(theme: &Theme, token: SizeToken) -> u32 {
    let base = theme.base_font_size.max(0.0);
    let factor = theme.font_scale.factor(token).max(0.0);
    (base * factor).round() as u32
}

/// Resolve the style of one node
///
/// For sections the result describes the title. Rows and columns only carry
/// their flex settings; repeats resolve to the empty style.
pub fn resolve_style(theme: &Theme, node: &Node) -> ResolvedStyle {
    match node {
        Node::TextLeaf(leaf) => ResolvedStyle {
            font_family: Some(theme.fonts.body.clone()),
            font_size: Some(font_px(theme, leaf.size.unwrap_or(SizeToken::Body))),
            font_weight: Some(leaf.weight.unwrap_or(DEFAULT_BODY_WEIGHT)),
            italic: leaf.italic,
            color: leaf
                .color
                .and_then(|token| theme.color(token))
                .map(str::to_string),
            text_align: Some(leaf.align.unwrap_or_default()),
            icon_separator: Some(
                leaf.separator
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ICON_SEPARATOR.to_string()),
            ),
            ..Default::default()
        },
        Node::Section(section) => ResolvedStyle {
            font_family: Some(theme.fonts.heading.clone()),
            font_size: Some(font_px(theme, section.title_size.unwrap_or(SizeToken::Heading))),
            font_weight: Some(DEFAULT_TITLE_WEIGHT),
            color: section
                .title_color
                .and_then(|token| theme.color(token))
                .map(str::to_string),
            text_align: Some(section.align.unwrap_or_default()),
            icon_separator: Some(DEFAULT_ICON_SEPARATOR.to_string()),
            ..Default::default()
        },
        Node::Row(flex) | Node::Column(flex) => ResolvedStyle {
            align_items: flex.align.clone(),
            justify_content: flex.justify.clone(),
            gap: flex.gap.map(|token| theme.spacing.px(token)),
            ..Default::default()
        },
        Node::Repeat(_) => ResolvedStyle::default(),
    }
}
