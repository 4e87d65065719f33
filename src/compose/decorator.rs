//! Theme-specific page furniture.

use crate::layout::{wrap_text, Canvas, LayoutOptions, PageChrome, PageDecorator, Palette};
use crate::model::{Align, Color, CoverStyle, FontFace, PaintContext, Theme};

const HEADER_BAND: f64 = 12.0;
const FOOTER_SIZE: f64 = 8.0;
const COVER_TITLE_SIZE: f64 = 24.0;
const PAGE_TITLE_SIZE: f64 = 16.0;

/// Pick the decorator for a theme's cover style.
pub fn decorator_for(
    theme: &Theme,
    document_title: &str,
    company: Option<&str>,
) -> Box<dyn PageDecorator> {
    let labels = Labels {
        document_title: document_title.to_string(),
        company: company.map(str::to_string),
    };
    match theme.cover_style {
        CoverStyle::Banner => Box::new(BannerDecorator::new(theme.clone(), labels)),
        CoverStyle::Rule => Box::new(RuleDecorator::new(theme.clone(), labels)),
    }
}

/// Text repeated in every page's furniture.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    /// Document title, used when a page has no header of its own
    pub document_title: String,
    /// Issuing company
    pub company: Option<String>,
}

fn palette_for(theme: &Theme) -> Palette {
    let (header_fill, header_text) = if theme.monochrome {
        (Color::LIGHT_GRAY, Color::BLACK)
    } else {
        (theme.ink(), Color::WHITE)
    };
    Palette {
        ink: Color::DARK_GRAY,
        heading: theme.ink(),
        accent: theme.accent(),
        muted: Color::MID_GRAY,
        header_fill,
        header_text,
        stripe: Color::STRIPE,
        rule: Color::LIGHT_GRAY,
    }
}

fn draw_footer(
    canvas: &mut Canvas,
    chrome: &PageChrome<'_>,
    options: &LayoutOptions,
    labels: &Labels,
    align_center: bool,
) {
    let rule_y = options.page_height - options.margin_bottom + 4.0;
    let baseline = rule_y + 5.0;
    let paint = PaintContext::new(FontFace::Sans, FOOTER_SIZE, Color::MID_GRAY);

    canvas.line(
        options.content_left(),
        rule_y,
        options.content_right(),
        rule_y,
        0.2,
        Color::LIGHT_GRAY,
    );
    if align_center {
        let center = options.content_left() + options.content_width() / 2.0;
        canvas.text_aligned(center, baseline, &chrome.footer_label(), Align::Center, paint);
    } else {
        canvas.text(options.content_left(), baseline, &labels.document_title, paint);
        canvas.text_aligned(
            options.content_right(),
            baseline,
            &chrome.footer_label(),
            Align::Right,
            paint,
        );
    }
}

/// Title lines wrapped to the content width.
fn title_lines(title: &str, paint: &PaintContext, options: &LayoutOptions) -> Vec<String> {
    wrap_text(title, paint, options.content_width(), &options.metrics)
}

/// Color-block banners across the top of every page.
#[derive(Debug, Clone)]
pub struct BannerDecorator {
    theme: Theme,
    labels: Labels,
}

impl BannerDecorator {
    /// Create a banner decorator.
    pub fn new(theme: Theme, labels: Labels) -> Self {
        Self { theme, labels }
    }
}

impl PageDecorator for BannerDecorator {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn palette(&self) -> Palette {
        palette_for(&self.theme)
    }

    fn decorate(
        &self,
        canvas: &mut Canvas,
        chrome: &PageChrome<'_>,
        options: &LayoutOptions,
    ) -> f64 {
        let palette = self.palette();
        let band_text = PaintContext::new(FontFace::SansBold, 9.0, palette.header_text);
        let baseline = HEADER_BAND / 2.0 + 1.5;

        canvas.rect(0.0, 0.0, options.page_width, HEADER_BAND, palette.header_fill);
        let header = chrome.header.unwrap_or(self.labels.document_title.as_str());
        canvas.text(options.content_left(), baseline, header, band_text);
        if let Some(company) = &self.labels.company {
            canvas.text_aligned(
                options.content_right(),
                baseline,
                company,
                Align::Right,
                band_text.with_font(FontFace::Sans),
            );
        }

        draw_footer(canvas, chrome, options, &self.labels, false);
        options.margin_top + 8.0
    }

    fn cover(
        &self,
        canvas: &mut Canvas,
        options: &LayoutOptions,
        title: &str,
        subtitle: &str,
    ) -> f64 {
        let palette = self.palette();
        let paint = PaintContext::new(FontFace::SansBold, COVER_TITLE_SIZE, palette.header_text);
        let lines = title_lines(title, &paint, options);
        let line_height = options.metrics.line_height(COVER_TITLE_SIZE);
        let band_height = 70.0 + line_height * lines.len().saturating_sub(1) as f64;

        canvas.rect(0.0, 0.0, options.page_width, band_height, palette.header_fill);
        canvas.rect(0.0, band_height, options.page_width, 2.0, palette.accent);

        let subtitle_paint = PaintContext::new(FontFace::Sans, 11.0, palette.header_text);
        canvas.text(options.content_left(), 35.0, &subtitle.to_uppercase(), subtitle_paint);

        let mut y = 35.0 + line_height;
        for line in &lines {
            canvas.text(options.content_left(), y, line, paint);
            y += line_height;
        }

        band_height + 15.0
    }

    fn page_title(&self, canvas: &mut Canvas, options: &LayoutOptions, y: f64, title: &str) -> f64 {
        let palette = self.palette();
        let paint = PaintContext::new(FontFace::SansBold, PAGE_TITLE_SIZE, palette.heading);
        let line_height = options.metrics.line_height(PAGE_TITLE_SIZE);
        let ascent = options.metrics.ascent(PAGE_TITLE_SIZE);
        let lines = title_lines(title, &paint, options);

        let mut top = y;
        for line in &lines {
            canvas.text(options.content_left(), top + ascent, line, paint);
            top += line_height;
        }
        canvas.rect(options.content_left(), top + 1.0, 30.0, 1.2, palette.accent);
        top + 6.0 - y
    }
}

/// Thin rules and no fills; used by the minimal and monochrome themes.
#[derive(Debug, Clone)]
pub struct RuleDecorator {
    theme: Theme,
    labels: Labels,
}

impl RuleDecorator {
    /// Create a rule decorator.
    pub fn new(theme: Theme, labels: Labels) -> Self {
        Self { theme, labels }
    }
}

impl PageDecorator for RuleDecorator {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn palette(&self) -> Palette {
        palette_for(&self.theme)
    }

    fn decorate(
        &self,
        canvas: &mut Canvas,
        chrome: &PageChrome<'_>,
        options: &LayoutOptions,
    ) -> f64 {
        let palette = self.palette();
        let paint = PaintContext::new(FontFace::Sans, FOOTER_SIZE, palette.muted);
        let baseline = options.margin_top - 6.0;
        let rule_y = options.margin_top - 3.0;

        let header = chrome.header.unwrap_or(self.labels.document_title.as_str());
        canvas.text(options.content_left(), baseline, header, paint);
        if let Some(company) = &self.labels.company {
            canvas.text_aligned(options.content_right(), baseline, company, Align::Right, paint);
        }
        canvas.line(
            options.content_left(),
            rule_y,
            options.content_right(),
            rule_y,
            0.3,
            palette.heading,
        );

        draw_footer(canvas, chrome, options, &self.labels, true);
        options.margin_top + 4.0
    }

    fn cover(
        &self,
        canvas: &mut Canvas,
        options: &LayoutOptions,
        title: &str,
        subtitle: &str,
    ) -> f64 {
        let palette = self.palette();
        let paint = PaintContext::new(FontFace::SansBold, COVER_TITLE_SIZE, palette.heading);
        let line_height = options.metrics.line_height(COVER_TITLE_SIZE);
        let left = options.content_left();
        let right = options.content_right();

        let mut y = options.margin_top + 40.0;
        canvas.line(left, y, right, y, 0.6, palette.heading);
        y += 10.0;

        let subtitle_paint = PaintContext::new(FontFace::Sans, 11.0, palette.muted);
        canvas.text(left, y, &subtitle.to_uppercase(), subtitle_paint);
        y += line_height;

        for line in title_lines(title, &paint, options) {
            canvas.text(left, y, &line, paint);
            y += line_height;
        }

        canvas.line(left, y, right, y, 0.3, palette.rule);
        y + 15.0
    }

    fn page_title(&self, canvas: &mut Canvas, options: &LayoutOptions, y: f64, title: &str) -> f64 {
        let palette = self.palette();
        let paint = PaintContext::new(FontFace::SansBold, PAGE_TITLE_SIZE, palette.heading);
        let line_height = options.metrics.line_height(PAGE_TITLE_SIZE);
        let ascent = options.metrics.ascent(PAGE_TITLE_SIZE);

        let mut top = y;
        for line in title_lines(title, &paint, options) {
            canvas.text(options.content_left(), top + ascent, &line, paint);
            top += line_height;
        }
        canvas.line(
            options.content_left(),
            top + 1.0,
            options.content_right(),
            top + 1.0,
            0.2,
            palette.rule,
        );
        top + 5.0 - y
    }
}
