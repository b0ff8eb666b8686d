//! Style tokens, themes and style resolution
//!
//! Nodes carry symbolic size and color tokens. A [`Theme`] maps them to
//! concrete values, so a single base-size edit rescales the whole document.

mod resolver;
mod theme;
mod tokens;

pub use resolver::{
    font_px, resolve_style, ResolvedStyle, DEFAULT_BODY_WEIGHT, DEFAULT_ICON_SEPARATOR,
    DEFAULT_TITLE_WEIGHT,
};
pub use theme::{FontScale, Fonts, Spacing, Theme, ThemeError};
pub use tokens::{ColorToken, SizeToken, SpacingToken, TextAlign};
