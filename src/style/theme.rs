//! Template theme: fonts, base size, color table and scale tokens
//!
//! A theme travels inside every template document. Hosts can also keep
//! themes as TOML files and apply one at render time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tokens::{ColorToken, SizeToken, SpacingToken};

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Font families used by the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            heading: "Georgia, serif".to_string(),
            body: "Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

/// Multipliers applied to the base font size, one per size token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontScale {
    pub display: f64,
    pub heading: f64,
    pub body: f64,
    pub meta: f64,
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            display: 2.0,
            heading: 1.35,
            body: 1.0,
            meta: 0.85,
        }
    }
}

impl FontScale {
    pub fn factor(&self, token: SizeToken) -> f64 {
        match token {
            SizeToken::Display => self.display,
            SizeToken::Heading => self.heading,
            SizeToken::Body => self.body,
            SizeToken::Meta => self.meta,
        }
    }
}

/// Spacing scale in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub tight: f64,
    pub normal: f64,
    pub loose: f64,
    /// Vertical space between consecutive sections
    pub section: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            tight: 4.0,
            normal: 8.0,
            loose: 16.0,
            section: 18.0,
        }
    }
}

impl Spacing {
    pub fn px(&self, token: SpacingToken) -> f64 {
        match token {
            SpacingToken::None => 0.0,
            SpacingToken::Tight => self.tight,
            SpacingToken::Normal => self.normal,
            SpacingToken::Loose => self.loose,
        }
    }
}

/// Document theme
///
/// Keys are camelCase on the wire; snake_case spellings are accepted too,
/// which is what hand-written TOML themes tend to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub fonts: Fonts,
    #[serde(default = "default_base_font_size", alias = "base_font_size")]
    pub base_font_size: f64,
    /// Color mappings: token name -> CSS color
    #[serde(default = "default_colors")]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default, alias = "font_scale")]
    pub font_scale: FontScale,
}

fn default_base_font_size() -> f64 {
    11.0
}

fn default_colors() -> BTreeMap<String, String> {
    [
        ("primary", "#1f2933"),
        ("secondary", "#52606d"),
        ("accent", "#2f6fde"),
        ("meta", "#7b8794"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fonts: Fonts::default(),
            base_font_size: default_base_font_size(),
            colors: default_colors(),
            spacing: Spacing::default(),
            font_scale: FontScale::default(),
        }
    }
}

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a theme from a TOML string; omitted keys take default values
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve a color token to a concrete value
    ///
    /// Returns None if the token is not defined in this theme.
    pub fn color(&self, token: ColorToken) -> Option<&str> {
        self.colors.get(token.as_str()).map(|s| s.as_str())
    }

    /// Builder-style base size override
    pub fn with_base_font_size(mut self, size: f64) -> Self {
        self.base_font_size = size;
        self
    }
}
