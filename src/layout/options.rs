//! Page geometry and typography settings.

use super::GlyphMetrics;
use crate::model::{A4_HEIGHT_MM, A4_WIDTH_MM, MAX_HEADING_LEVEL};

/// Geometry, typography and table constants used by the layout stage.
///
/// All lengths are millimeters, font sizes are points.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Page width
    pub page_width: f64,

    /// Page height
    pub page_height: f64,

    /// Left margin
    pub margin_left: f64,

    /// Right margin
    pub margin_right: f64,

    /// Top margin
    pub margin_top: f64,

    /// Bottom margin
    pub margin_bottom: f64,

    /// Body text size
    pub body_size: f64,

    /// Heading sizes for levels 1..=4
    pub heading_sizes: [f64; MAX_HEADING_LEVEL as usize],

    /// Space after a paragraph or list item
    pub paragraph_gap: f64,

    /// Indent of list items and quotes
    pub list_indent: f64,

    /// Table text size
    pub table_font_size: f64,

    /// Horizontal space reserved around a table
    pub table_padding: f64,

    /// Maximum width of an auto-sized column
    pub table_column_cap: f64,

    /// Inner padding of a table cell
    pub cell_padding: f64,

    /// Height of one table row
    pub table_row_height: f64,

    /// Glyph width estimation
    pub metrics: GlyphMetrics,
}

impl LayoutOptions {
    /// Create A4 options with the default typography.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set all four margins.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin_left = margin;
        self.margin_right = margin;
        self.margin_top = margin;
        self.margin_bottom = margin;
        self
    }

    /// Set the body text size.
    pub fn with_body_size(mut self, size: f64) -> Self {
        self.body_size = size;
        self
    }

    /// Set the table text size.
    pub fn with_table_font_size(mut self, size: f64) -> Self {
        self.table_font_size = size;
        self
    }

    /// Set the glyph metrics.
    pub fn with_metrics(mut self, metrics: GlyphMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Left edge of the printable area.
    pub fn content_left(&self) -> f64 {
        self.margin_left
    }

    /// Right edge of the printable area.
    pub fn content_right(&self) -> f64 {
        self.page_width - self.margin_right
    }

    /// Lowest y content may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    /// Font size for a heading level; out-of-range levels clamp.
    pub fn heading_size(&self, level: u8) -> f64 {
        let idx = level.clamp(1, MAX_HEADING_LEVEL) as usize - 1;
        self.heading_sizes[idx]
    }

    /// Line advance of body text.
    pub fn body_line_height(&self) -> f64 {
        self.metrics.line_height(self.body_size)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin_left: 20.0,
            margin_right: 20.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            body_size: 10.0,
            heading_sizes: [18.0, 15.0, 13.0, 11.0],
            paragraph_gap: 2.0,
            list_indent: 6.0,
            table_font_size: 9.0,
            table_padding: 4.0,
            table_column_cap: 60.0,
            cell_padding: 2.0,
            table_row_height: 7.0,
            metrics: GlyphMetrics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_defaults() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.content_width(), 170.0);
        assert_eq!(opts.bottom_limit(), 277.0);
        assert_eq!(opts.content_right(), 190.0);
    }

    #[test]
    fn test_heading_ladder_clamps() {
        let opts = LayoutOptions::new();
        assert_eq!(opts.heading_size(1), 18.0);
        assert_eq!(opts.heading_size(3), 13.0);
        assert_eq!(opts.heading_size(9), 11.0);
        assert_eq!(opts.heading_size(0), 18.0);
    }

    #[test]
    fn test_builder() {
        let opts = LayoutOptions::new().with_margin(10.0).with_body_size(12.0);
        assert_eq!(opts.content_width(), 190.0);
        assert_eq!(opts.body_size, 12.0);
    }
}
