//! Command recorder for the pages of one render pass.

use crate::markup::normalize;
use crate::model::{Align, Color, DrawCommand, PageBuffer, PageKind, PaintContext, Resource};

/// Target list of a draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// Body content
    #[default]
    Content,
    /// Header and footer furniture
    Furniture,
}

/// Records draw commands page by page.
///
/// With drawing disabled the canvas still opens and closes pages, so a dry run
/// produces the same page sequence with empty command lists.
#[derive(Debug)]
pub struct Canvas {
    width: f64,
    height: f64,
    drawing: bool,
    layer: Layer,
    pages: Vec<PageBuffer>,
    current: Option<PageBuffer>,
    command_count: usize,
}

impl Canvas {
    /// Create a canvas for pages of the given size in mm.
    pub fn new(width: f64, height: f64, drawing: bool) -> Self {
        Self {
            width,
            height,
            drawing,
            layer: Layer::Content,
            pages: Vec::new(),
            current: None,
            command_count: 0,
        }
    }

    /// Check if commands are recorded.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Page width in mm.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in mm.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of the open page, or of the next page if none is open.
    pub fn page_number(&self) -> usize {
        match &self.current {
            Some(page) => page.number,
            None => self.pages.len() + 1,
        }
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    /// Close the open page (if any) and open a new one.
    pub fn begin_page(&mut self, kind: PageKind) -> usize {
        self.show_page();
        let number = self.pages.len() + 1;
        self.current = Some(PageBuffer::new(number, kind, self.width, self.height));
        number
    }

    /// Close the open page.
    pub fn show_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
    }

    /// Record the header text of the open page.
    pub fn set_header(&mut self, header: Option<String>) {
        if let Some(page) = self.current.as_mut() {
            page.header = header;
        }
    }

    /// Run `f` with commands routed to `layer`, restoring the previous layer.
    pub fn with_layer<R>(&mut self, layer: Layer, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let saved = self.layer;
        self.layer = layer;
        let result = f(self);
        self.layer = saved;
        result
    }

    fn push(&mut self, command: DrawCommand) {
        if !self.drawing {
            return;
        }
        let layer = self.layer;
        if let Some(page) = self.current.as_mut() {
            match layer {
                Layer::Content => page.content.push(command),
                Layer::Furniture => page.furniture.push(command),
            }
            self.command_count += 1;
        }
    }

    /// Draw left-aligned text at a baseline.
    pub fn text(&mut self, x: f64, y: f64, text: &str, paint: PaintContext) {
        self.text_aligned(x, y, text, Align::Left, paint);
    }

    /// Draw text anchored by `align`. Text is normalized to Latin-1.
    pub fn text_aligned(&mut self, x: f64, y: f64, text: &str, align: Align, paint: PaintContext) {
        if !self.drawing || text.is_empty() {
            return;
        }
        self.push(DrawCommand::Text {
            x,
            y,
            text: normalize(text),
            align,
            paint,
        });
    }

    /// Fill a rectangle.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Color) {
        self.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    /// Stroke a line.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    /// Stroke the outline of a rectangle.
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let stroke = 0.2;
        self.line(x, y, x + width, y, stroke, color);
        self.line(x + width, y, x + width, y + height, stroke, color);
        self.line(x + width, y + height, x, y + height, stroke, color);
        self.line(x, y + height, x, y, stroke, color);
    }

    /// Place an image.
    pub fn image(&mut self, x: f64, y: f64, width: f64, height: f64, resource: &Resource) {
        if !self.drawing {
            return;
        }
        self.push(DrawCommand::Image {
            x,
            y,
            width,
            height,
            resource: resource.clone(),
        });
    }

    /// Number of commands recorded.
    pub fn command_count(&self) -> usize {
        self.command_count
    }

    /// Close the open page and return every page.
    pub fn finish(mut self) -> Vec<PageBuffer> {
        self.show_page();
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_and_pages() {
        let mut canvas = Canvas::new(210.0, 297.0, true);
        canvas.begin_page(PageKind::Section);
        canvas.with_layer(Layer::Furniture, |c| {
            c.text(20.0, 10.0, "Header", PaintContext::default());
        });
        canvas.text(20.0, 30.0, "Body", PaintContext::default());
        canvas.begin_page(PageKind::Section);
        assert_eq!(canvas.page_count(), 2);

        let pages = canvas.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].furniture.len(), 1);
        assert_eq!(pages[0].content.len(), 1);
        assert!(pages[1].is_empty());
        assert_eq!(pages[1].number, 2);
    }

    #[test]
    fn test_dry_run_records_nothing() {
        let mut canvas = Canvas::new(210.0, 297.0, false);
        canvas.begin_page(PageKind::Cover);
        canvas.text(0.0, 0.0, "x", PaintContext::default());
        canvas.rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        assert_eq!(canvas.command_count(), 0);
        assert_eq!(canvas.finish().len(), 1);
    }

    #[test]
    fn test_text_is_normalized() {
        let mut canvas = Canvas::new(210.0, 297.0, true);
        canvas.begin_page(PageKind::Section);
        canvas.text(0.0, 0.0, "\u{2022} a \u{2014} b", PaintContext::default());
        let pages = canvas.finish();
        assert_eq!(pages[0].content[0].text(), Some("- a - b"));
    }
}
