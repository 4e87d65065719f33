//! Visual themes and the registry that resolves them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Body text gray.
    pub const DARK_GRAY: Color = Color::rgb(60, 60, 60);
    /// Secondary text gray.
    pub const MID_GRAY: Color = Color::rgb(120, 120, 120);
    /// Fill gray for monochrome headers.
    pub const LIGHT_GRAY: Color = Color::rgb(220, 220, 220);
    /// Table stripe fill.
    pub const STRIPE: Color = Color::rgb(245, 245, 245);

    /// Create a color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Luma-weighted gray of this color.
    pub fn to_gray(&self) -> Self {
        let luma = (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32)
            .round()
            .clamp(0.0, 255.0) as u8;
        Self::rgb(luma, luma, luma)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// How covers and page headers are styled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverStyle {
    /// Solid color-block banner
    #[default]
    Banner,
    /// Thin rule, no fills
    Rule,
}

/// A set of visual parameters selecting decorator styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Registry name
    pub name: String,

    /// Primary (brand) color
    pub primary: Color,

    /// Secondary (accent) color
    pub secondary: Color,

    /// Render without color
    #[serde(default)]
    pub monochrome: bool,

    /// Cover and header style
    #[serde(default)]
    pub cover_style: CoverStyle,
}

impl Theme {
    /// Create a banner-style color theme.
    pub fn new(name: impl Into<String>, primary: Color, secondary: Color) -> Self {
        Self {
            name: name.into(),
            primary,
            secondary,
            monochrome: false,
            cover_style: CoverStyle::Banner,
        }
    }

    /// Set the cover style.
    pub fn with_cover_style(mut self, style: CoverStyle) -> Self {
        self.cover_style = style;
        self
    }

    /// Render in grayscale.
    pub fn monochrome(mut self) -> Self {
        self.monochrome = true;
        self
    }

    /// Primary color as actually drawn.
    pub fn ink(&self) -> Color {
        if self.monochrome {
            self.primary.to_gray()
        } else {
            self.primary
        }
    }

    /// Secondary color as actually drawn.
    pub fn accent(&self) -> Color {
        if self.monochrome {
            self.secondary.to_gray()
        } else {
            self.secondary
        }
    }

    /// The built-in default theme.
    pub fn classic() -> Self {
        Theme::new("classic", Color::rgb(0x1F, 0x3A, 0x5F), Color::rgb(0xC8, 0x96, 0x2E))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Named themes available to render requests.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in themes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Theme::classic());
        registry.register(Theme::new(
            "modern",
            Color::rgb(0x0F, 0x76, 0x6E),
            Color::rgb(0x14, 0xB8, 0xA6),
        ));
        registry.register(
            Theme::new("minimal", Color::rgb(0x33, 0x41, 0x55), Color::rgb(0x64, 0x74, 0x8B))
                .with_cover_style(CoverStyle::Rule),
        );
        registry.register(
            Theme::new("monochrome", Color::BLACK, Color::MID_GRAY)
                .with_cover_style(CoverStyle::Rule)
                .monochrome(),
        );
        registry
    }

    /// Add or replace a theme.
    pub fn register(&mut self, theme: Theme) {
        self.themes.insert(theme.name.to_ascii_lowercase(), theme);
    }

    /// Resolve a theme by name (case-insensitive).
    pub fn resolve(&self, name: &str) -> Result<&Theme> {
        self.themes
            .get(&name.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::InvalidTheme(name.to_string()))
    }

    /// Registered theme names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
