//! Output pages and their draw instructions.
//!
//! Coordinates are millimeters from the top-left corner of the page; `y` of a
//! text command is its baseline. Font sizes are points.

use super::{Color, Resource, TextStyle};
use serde::{Deserialize, Serialize};

/// A4 width in millimeters.
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 height in millimeters.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Font faces the backend is expected to provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFace {
    /// Proportional sans serif
    #[default]
    Sans,
    /// Bold sans serif
    SansBold,
    /// Italic sans serif
    SansItalic,
    /// Bold italic sans serif
    SansBoldItalic,
    /// Monospaced
    Mono,
}

impl FontFace {
    /// Face for a run style on top of this face.
    pub fn styled(self, style: TextStyle) -> Self {
        if style.code {
            return FontFace::Mono;
        }
        let bold = style.bold || matches!(self, FontFace::SansBold | FontFace::SansBoldItalic);
        let italic =
            style.italic || matches!(self, FontFace::SansItalic | FontFace::SansBoldItalic);
        match (bold, italic) {
            (false, false) => FontFace::Sans,
            (true, false) => FontFace::SansBold,
            (false, true) => FontFace::SansItalic,
            (true, true) => FontFace::SansBoldItalic,
        }
    }
}

/// Font, size and color of a single draw operation.
///
/// A value, not ambient state: deriving a styled context leaves the base
/// untouched, so sibling blocks never see each other's styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintContext {
    /// Font face
    pub font: FontFace,
    /// Font size in points
    pub size: f64,
    /// Fill color
    pub color: Color,
}

impl PaintContext {
    /// Create a context.
    pub fn new(font: FontFace, size: f64, color: Color) -> Self {
        Self { font, size, color }
    }

    /// Same context with a run style applied.
    pub fn with_style(&self, style: TextStyle) -> Self {
        Self {
            font: self.font.styled(style),
            ..*self
        }
    }

    /// Same context with another font.
    pub fn with_font(&self, font: FontFace) -> Self {
        Self { font, ..*self }
    }

    /// Same context with another size.
    pub fn with_size(&self, size: f64) -> Self {
        Self { size, ..*self }
    }

    /// Same context with another color.
    pub fn with_color(&self, color: Color) -> Self {
        Self { color, ..*self }
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new(FontFace::Sans, 10.0, Color::DARK_GRAY)
    }
}

/// Horizontal anchor of a text command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// `x` is the left edge
    #[default]
    Left,
    /// `x` is the center
    Center,
    /// `x` is the right edge
    Right,
}

/// One draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Draw a string
    Text {
        /// Anchor x
        x: f64,
        /// Baseline y
        y: f64,
        /// Text (Latin-1 only)
        text: String,
        /// Anchor
        align: Align,
        /// Paint
        paint: PaintContext,
    },
    /// Fill a rectangle
    Rect {
        /// Left
        x: f64,
        /// Top
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
        /// Fill color
        fill: Color,
    },
    /// Stroke a line
    Line {
        /// Start x
        x1: f64,
        /// Start y
        y1: f64,
        /// End x
        x2: f64,
        /// End y
        y2: f64,
        /// Stroke width in mm
        width: f64,
        /// Stroke color
        color: Color,
    },
    /// Place an image
    Image {
        /// Left
        x: f64,
        /// Top
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
        /// Image bytes
        resource: Resource,
    },
}

impl DrawCommand {
    /// Text of a text command.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Check if this command places an image.
    pub fn is_image(&self) -> bool {
        matches!(self, DrawCommand::Image { .. })
    }
}

/// Role of a page in the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Cover page
    Cover,
    /// Table of contents
    Contents,
    /// Section content
    Section,
    /// Pricing summary
    Pricing,
    /// Signature block
    Signatures,
    /// Audit / metadata page
    Audit,
}

impl PageKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PageKind::Cover => "cover",
            PageKind::Contents => "contents",
            PageKind::Section => "section",
            PageKind::Pricing => "pricing",
            PageKind::Signatures => "signatures",
            PageKind::Audit => "audit",
        }
    }
}

/// One finished output page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBuffer {
    /// Page number (1-indexed)
    pub number: usize,

    /// Page role
    pub kind: PageKind,

    /// Page width in mm
    pub width: f64,

    /// Page height in mm
    pub height: f64,

    /// Header text drawn by the decorator
    pub header: Option<String>,

    /// Header/footer commands
    pub furniture: Vec<DrawCommand>,

    /// Body commands
    pub content: Vec<DrawCommand>,
}

impl PageBuffer {
    /// Create an empty page.
    pub fn new(number: usize, kind: PageKind, width: f64, height: f64) -> Self {
        Self {
            number,
            kind,
            width,
            height,
            header: None,
            furniture: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Create an empty A4 page.
    pub fn a4(number: usize, kind: PageKind) -> Self {
        Self::new(number, kind, A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    /// All commands, furniture first.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.furniture.iter().chain(self.content.iter())
    }

    /// Text of every text command in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands().filter_map(DrawCommand::text)
    }

    /// Body text joined with spaces.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(DrawCommand::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the page has no body commands.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_styled() {
        assert_eq!(FontFace::Sans.styled(TextStyle::BOLD), FontFace::SansBold);
        assert_eq!(
            FontFace::SansBold.styled(TextStyle::ITALIC),
            FontFace::SansBoldItalic
        );
        assert_eq!(FontFace::SansBold.styled(TextStyle::CODE), FontFace::Mono);
        assert_eq!(FontFace::SansItalic.styled(TextStyle::PLAIN), FontFace::SansItalic);
    }

    #[test]
    fn test_paint_context_is_a_value() {
        let base = PaintContext::default();
        let bold = base.with_style(TextStyle::BOLD);
        assert_eq!(bold.font, FontFace::SansBold);
        assert_eq!(base.font, FontFace::Sans);

        let small = base.with_size(8.0).with_color(Color::MID_GRAY);
        assert_eq!(small.size, 8.0);
        assert_eq!(base.size, 10.0);
        assert_eq!(small.font, base.font);
    }

    #[test]
    fn test_page_a4() {
        let page = PageBuffer::a4(1, PageKind::Cover);
        assert_eq!(page.width, 210.0);
        assert_eq!(page.height, 297.0);
        assert!(page.is_empty());
    }
}
