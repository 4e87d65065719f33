//! Drawing position within the current page.

use super::LayoutOptions;

/// Position and printable bounds of the page being laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    /// Zero-based index of the current page
    pub page_index: usize,
    /// Left edge of the content column
    pub x: f64,
    /// Top of the next line box
    pub y: f64,
    /// Width of the content column
    pub width: f64,
    /// Lowest y content may reach
    pub bottom: f64,
}

impl PageCursor {
    /// Cursor at the top-left of the printable area of the first page.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            page_index: 0,
            x: options.content_left(),
            y: options.margin_top,
            width: options.content_width(),
            bottom: options.bottom_limit(),
        }
    }

    /// Space left above the bottom margin.
    pub fn remaining(&self) -> f64 {
        (self.bottom - self.y).max(0.0)
    }

    /// Check if `height` more millimeters fit on this page.
    pub fn fits(&self, height: f64) -> bool {
        self.y + height <= self.bottom + 1e-9
    }

    /// Move down.
    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    /// Check if the cursor is inside the printable area.
    pub fn in_bounds(&self) -> bool {
        self.y <= self.bottom + 1e-9
    }
}
