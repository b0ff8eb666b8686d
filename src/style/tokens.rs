//! Symbolic style tokens carried by template nodes
//!
//! Nodes never store concrete pixel sizes or colors. They store tokens that
//! the theme maps to concrete values at render time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Typographic size token, scaled from the theme's base font size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeToken {
    Display,
    Heading,
    Body,
    Meta,
}

impl SizeToken {
    pub const ALL: [SizeToken; 4] = [
        SizeToken::Display,
        SizeToken::Heading,
        SizeToken::Body,
        SizeToken::Meta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeToken::Display => "display",
            SizeToken::Heading => "heading",
            SizeToken::Body => "body",
            SizeToken::Meta => "meta",
        }
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color token, looked up in the theme's color table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Primary,
    Secondary,
    Accent,
    Meta,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Primary => "primary",
            ColorToken::Secondary => "secondary",
            ColorToken::Accent => "accent",
            ColorToken::Meta => "meta",
        }
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Spacing token for gaps between container children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingToken {
    None,
    Tight,
    Normal,
    Loose,
}
