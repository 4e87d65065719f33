//! Fixed-width glyph estimation.
//!
//! No font files are read; every character of a face is assumed to have the
//! same advance, and estimates err on the wide side.

use crate::model::{FontFace, PaintContext};
use serde::{Deserialize, Serialize};

/// Millimeters per typographic point.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// Average advance per face, as a fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    /// Regular and italic sans
    pub sans: f64,
    /// Bold and bold italic sans
    pub sans_bold: f64,
    /// Monospaced
    pub mono: f64,
    /// Line height as a multiple of the font size
    pub leading: f64,
}

impl GlyphMetrics {
    /// Advance factor of a face.
    pub fn factor(&self, font: FontFace) -> f64 {
        match font {
            FontFace::Sans | FontFace::SansItalic => self.sans,
            FontFace::SansBold | FontFace::SansBoldItalic => self.sans_bold,
            FontFace::Mono => self.mono,
        }
    }

    /// Width of one glyph in mm.
    pub fn glyph_width(&self, paint: &PaintContext) -> f64 {
        paint.size * PT_TO_MM * self.factor(paint.font)
    }

    /// Width of a string in mm.
    pub fn measure(&self, text: &str, paint: &PaintContext) -> f64 {
        text.chars().count() as f64 * self.glyph_width(paint)
    }

    /// Line advance for a font size in mm.
    pub fn line_height(&self, size: f64) -> f64 {
        size * PT_TO_MM * self.leading
    }

    /// Baseline offset from the top of a line box in mm.
    pub fn ascent(&self, size: f64) -> f64 {
        size * PT_TO_MM
    }
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            sans: 0.5,
            sans_bold: 0.55,
            mono: 0.6,
            leading: 1.45,
        }
    }
}
