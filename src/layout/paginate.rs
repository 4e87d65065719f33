//! Page breaking and page furniture.

use super::{Canvas, Layer, LayoutOptions, PageCursor};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::model::{Color, PageBuffer, PageKind};
use crate::render::LayoutStats;

/// Colors a decorator hands to the block renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Body text
    pub ink: Color,
    /// Headings
    pub heading: Color,
    /// Quote bars, markers and highlights
    pub accent: Color,
    /// Secondary text (captions, metadata)
    pub muted: Color,
    /// Table header fill
    pub header_fill: Color,
    /// Table header text
    pub header_text: Color,
    /// Alternate table row fill
    pub stripe: Color,
    /// Rules and borders
    pub rule: Color,
}

/// What a decorator needs to draw a page's furniture.
#[derive(Debug, Clone, Copy)]
pub struct PageChrome<'a> {
    /// 1-based page number
    pub number: usize,
    /// Total pages, once known
    pub total: Option<usize>,
    /// Page role
    pub kind: PageKind,
    /// Header text (section title, possibly marked as continued)
    pub header: Option<&'a str>,
}

impl PageChrome<'_> {
    /// Footer label: `Page N of M`, or `Page N` before the total is known.
    pub fn footer_label(&self) -> String {
        match self.total {
            Some(total) => format!("Page {} of {}", self.number, total),
            None => format!("Page {}", self.number),
        }
    }
}

/// Theme-specific drawing of page furniture and title treatments.
///
/// Called by the [`Paginator`] whenever a page starts; implementations must
/// draw the same geometry whether or not the canvas is recording.
pub trait PageDecorator {
    /// Decorator name for logs.
    fn name(&self) -> &'static str;

    /// Colors for block content.
    fn palette(&self) -> Palette;

    /// Draw header and footer; returns the y where content starts.
    fn decorate(
        &self,
        canvas: &mut Canvas,
        chrome: &PageChrome<'_>,
        options: &LayoutOptions,
    ) -> f64;

    /// Draw the cover title treatment; returns the y below it.
    fn cover(
        &self,
        canvas: &mut Canvas,
        options: &LayoutOptions,
        title: &str,
        subtitle: &str,
    ) -> f64;

    /// Draw a page title at `y`; returns the height used.
    fn page_title(&self, canvas: &mut Canvas, options: &LayoutOptions, y: f64, title: &str) -> f64;
}

/// Pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// Content has been drawn on the current page
    LayingOut,
    /// A page just started; nothing drawn since
    JustBroke,
}

/// Drives the cursor across pages, breaking when content would cross the
/// bottom margin.
pub struct Paginator<'a> {
    canvas: Canvas,
    cursor: PageCursor,
    options: &'a LayoutOptions,
    decorator: &'a dyn PageDecorator,
    cancel: &'a CancellationToken,
    state: PaginationState,
    kind: PageKind,
    title: Option<String>,
    total_pages: Option<usize>,
    stats: LayoutStats,
}

impl<'a> Paginator<'a> {
    /// Create a paginator; `drawing == false` makes it a dry run.
    pub fn new(
        options: &'a LayoutOptions,
        decorator: &'a dyn PageDecorator,
        cancel: &'a CancellationToken,
        drawing: bool,
    ) -> Self {
        Self {
            canvas: Canvas::new(options.page_width, options.page_height, drawing),
            cursor: PageCursor::new(options),
            options,
            decorator,
            cancel,
            state: PaginationState::JustBroke,
            kind: PageKind::Cover,
            title: None,
            total_pages: None,
            stats: LayoutStats::new(),
        }
    }

    /// Set the page total shown in footers.
    pub fn with_total_pages(mut self, total: Option<usize>) -> Self {
        self.total_pages = total;
        self
    }

    fn open_page(&mut self, kind: PageKind) -> Result<usize> {
        if self.cancel.is_cancelled() {
            let done = self.canvas.page_count();
            log::info!("Render cancelled after {} pages", done);
            return Err(Error::Cancelled(done));
        }
        let number = self.canvas.begin_page(kind);
        self.kind = kind;
        self.cursor.page_index = number - 1;
        self.state = PaginationState::JustBroke;
        self.stats.add_page();
        Ok(number)
    }

    /// Start a decorated page whose header shows `title`.
    ///
    /// The title also becomes the running title for continuation pages.
    pub fn start_page(&mut self, kind: PageKind, title: Option<&str>) -> Result<()> {
        self.title = title.map(str::to_string);
        let header = self.title.clone();
        self.start_decorated(kind, header)
    }

    fn start_decorated(&mut self, kind: PageKind, header: Option<String>) -> Result<()> {
        let number = self.open_page(kind)?;
        let chrome = PageChrome {
            number,
            total: self.total_pages,
            kind,
            header: header.as_deref(),
        };
        let decorator = self.decorator;
        let options = self.options;
        let top = self
            .canvas
            .with_layer(Layer::Furniture, |c| decorator.decorate(c, &chrome, options));
        self.canvas.set_header(header);
        self.cursor.y = top;
        Ok(())
    }

    /// Start an undecorated page (the cover).
    pub fn start_bare_page(&mut self, kind: PageKind) -> Result<()> {
        self.title = None;
        self.open_page(kind)?;
        self.cursor.y = self.options.margin_top;
        Ok(())
    }

    /// Break to a new page if `required` more millimeters do not fit.
    ///
    /// Returns whether a break was taken. A page that has had nothing drawn
    /// on it is never broken again; oversize content is drawn from its top.
    pub fn check_page_break(&mut self, required: f64) -> Result<bool> {
        if self.cursor.fits(required) {
            return Ok(false);
        }
        if self.state == PaginationState::JustBroke {
            log::debug!(
                "{:.1}mm does not fit on an empty page {}; drawing anyway",
                required,
                self.canvas.page_number()
            );
            return Ok(false);
        }

        log::debug!(
            "Page break at y={:.1}mm (needs {:.1}mm) after page {}",
            self.cursor.y,
            required,
            self.canvas.page_number()
        );
        self.stats.add_page_break();
        let header = self.title.as_ref().map(|t| format!("{} (continued)", t));
        self.start_decorated(self.kind, header)?;
        Ok(true)
    }

    /// Move the cursor down after drawing, never past the bottom margin.
    pub fn advance(&mut self, dy: f64) {
        self.cursor.advance(dy);
        self.cursor.y = self.cursor.y.min(self.cursor.bottom);
        self.state = PaginationState::LayingOut;
    }

    /// Current state.
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Check if nothing has been drawn since the page started.
    pub fn at_page_top(&self) -> bool {
        self.state == PaginationState::JustBroke
    }

    /// The cursor.
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Set the cursor's y directly (for absolutely placed content).
    pub fn set_y(&mut self, y: f64) {
        self.cursor.y = y.min(self.cursor.bottom);
    }

    /// Check if this is the drawing pass rather than a dry run.
    pub fn is_drawing(&self) -> bool {
        self.canvas.is_drawing()
    }

    /// The canvas.
    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Layout settings.
    pub fn options(&self) -> &'a LayoutOptions {
        self.options
    }

    /// The page decorator.
    pub fn decorator(&self) -> &'a dyn PageDecorator {
        self.decorator
    }

    /// The decorator's palette.
    pub fn palette(&self) -> Palette {
        self.decorator.palette()
    }

    /// Number of the current page.
    pub fn page_number(&self) -> usize {
        self.canvas.page_number()
    }

    /// Statistics collected so far.
    pub fn stats_mut(&mut self) -> &mut LayoutStats {
        &mut self.stats
    }

    /// Close the last page and return the pages and statistics.
    pub fn finish(self) -> (Vec<PageBuffer>, LayoutStats) {
        (self.canvas.finish(), self.stats)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Decorator with a fixed 10mm header band and no colors.
    pub(crate) struct PlainDecorator;

    impl PageDecorator for PlainDecorator {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn palette(&self) -> Palette {
            Palette {
                ink: Color::BLACK,
                heading: Color::BLACK,
                accent: Color::MID_GRAY,
                muted: Color::MID_GRAY,
                header_fill: Color::LIGHT_GRAY,
                header_text: Color::BLACK,
                stripe: Color::STRIPE,
                rule: Color::LIGHT_GRAY,
            }
        }

        fn decorate(
            &self,
            canvas: &mut Canvas,
            chrome: &PageChrome<'_>,
            options: &LayoutOptions,
        ) -> f64 {
            if let Some(header) = chrome.header {
                canvas.text(options.margin_left, 12.0, header, Default::default());
            }
            options.margin_top + 10.0
        }

        fn cover(
            &self,
            _canvas: &mut Canvas,
            options: &LayoutOptions,
            _title: &str,
            _subtitle: &str,
        ) -> f64 {
            options.margin_top
        }

        fn page_title(
            &self,
            _canvas: &mut Canvas,
            _options: &LayoutOptions,
            _y: f64,
            _title: &str,
        ) -> f64 {
            10.0
        }
    }

    #[test]
    fn test_break_only_when_overflowing() {
        let options = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&options, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, Some("Scope")).unwrap();
        assert_eq!(p.cursor().y, 30.0);
        assert!(!p.check_page_break(100.0).unwrap());
        p.advance(240.0);
        assert!(p.check_page_break(10.0).unwrap());
        assert_eq!(p.page_number(), 2);
        assert_eq!(p.state(), PaginationState::JustBroke);

        let (pages, stats) = p.finish();
        assert_eq!(pages[1].header.as_deref(), Some("Scope (continued)"));
        assert_eq!(stats.page_breaks, 1);
        assert_eq!(stats.page_count, 2);
    }

    #[test]
    fn test_no_double_break_on_fresh_page() {
        let options = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&options, &PlainDecorator, &cancel, false);
        assert!(!p.is_drawing());
        p.start_page(PageKind::Section, None).unwrap();
        assert!(!p.check_page_break(1000.0).unwrap());
        assert_eq!(p.page_number(), 1);
    }

    #[test]
    fn test_advance_clamps_to_bottom() {
        let options = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&options, &PlainDecorator, &cancel, false);
        p.start_page(PageKind::Section, None).unwrap();
        p.advance(500.0);
        assert!(p.cursor().in_bounds());
    }

    #[test]
    fn test_cancel_checked_at_page_start() {
        let options = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&options, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, None).unwrap();
        cancel.cancel();
        let err = p.start_page(PageKind::Section, None).unwrap_err();
        assert!(matches!(err, Error::Cancelled(1)));
    }

    #[test]
    fn test_footer_label() {
        let chrome = PageChrome {
            number: 3,
            total: Some(7),
            kind: PageKind::Section,
            header: None,
        };
        assert_eq!(chrome.footer_label(), "Page 3 of 7");
    }
}
