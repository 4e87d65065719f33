//! Plain text rendering: the glyph stream of each page.

use super::RenderedDocument;
use crate::layout::GlyphMetrics;
use crate::model::{Align, DrawCommand, PageBuffer};

/// Texts on the same baseline within this distance share a line.
const BASELINE_TOLERANCE: f64 = 0.5;

/// Convert a rendered document to plain text, one block per page.
///
/// Text commands (furniture included) are grouped by baseline and read left
/// to right, so the output follows the page top to bottom.
pub fn to_text(doc: &RenderedDocument) -> String {
    to_text_with_metrics(doc, &GlyphMetrics::default())
}

/// [`to_text`] for documents laid out with custom glyph metrics.
///
/// The metrics place each text's extent on its line: texts that abut are
/// joined directly (`Name` and `,` of `**Name**,`), others with a space.
pub fn to_text_with_metrics(doc: &RenderedDocument, metrics: &GlyphMetrics) -> String {
    let mut output = String::new();
    for page in &doc.pages {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("--- Page {} ({}) ---\n", page.number, page.kind.label()));
        for line in page_lines(page, metrics) {
            output.push_str(&line);
            output.push('\n');
        }
    }
    output
}

/// One text command with its horizontal extent.
struct Placed<'a> {
    y: f64,
    left: f64,
    right: f64,
    glyph: f64,
    text: &'a str,
}

fn placed<'a>(cmd: &'a DrawCommand, metrics: &GlyphMetrics) -> Option<Placed<'a>> {
    let DrawCommand::Text {
        x,
        y,
        text,
        align,
        paint,
    } = cmd
    else {
        return None;
    };
    let width = metrics.measure(text, paint);
    let left = match align {
        Align::Left => *x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    Some(Placed {
        y: *y,
        left,
        right: left + width,
        glyph: metrics.glyph_width(paint),
        text,
    })
}

fn page_lines(page: &PageBuffer, metrics: &GlyphMetrics) -> Vec<String> {
    let mut texts: Vec<Placed<'_>> = page
        .commands()
        .filter_map(|cmd| placed(cmd, metrics))
        .collect();
    texts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.left.total_cmp(&b.left)));

    let mut lines: Vec<String> = Vec::new();
    let mut baseline = f64::NEG_INFINITY;
    let mut right = f64::NEG_INFINITY;
    for item in texts {
        match lines.last_mut() {
            Some(line) if (item.y - baseline).abs() <= BASELINE_TOLERANCE => {
                let abuts = item.left - right < item.glyph / 2.0;
                if !abuts && !line.ends_with(' ') && !item.text.starts_with(' ') {
                    line.push(' ');
                }
                line.push_str(item.text);
            }
            _ => {
                lines.push(item.text.to_string());
                baseline = item.y;
            }
        }
        right = item.right;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, FontFace, PageKind, PaintContext};
    use crate::render::LayoutStats;

    fn text(x: f64, y: f64, s: &str) -> DrawCommand {
        DrawCommand::Text {
            x,
            y,
            text: s.to_string(),
            align: Align::Left,
            paint: PaintContext::new(FontFace::Sans, 10.0, Color::BLACK),
        }
    }

    #[test]
    fn test_to_text_orders_by_baseline() {
        let mut page = PageBuffer::a4(1, PageKind::Section);
        page.content.push(text(40.0, 50.0, "world"));
        page.content.push(text(20.0, 50.0, "Hello"));
        page.content.push(text(20.0, 40.0, "Title"));
        page.furniture.push(text(20.0, 290.0, "Page 1 of 1"));

        let doc = RenderedDocument {
            title: "Doc".to_string(),
            theme: "classic".to_string(),
            pages: vec![page],
            outline: Vec::new(),
            stats: LayoutStats::new(),
        };
        let result = to_text(&doc);

        assert_eq!(
            result,
            "--- Page 1 (section) ---\nTitle\nHello world\nPage 1 of 1\n"
        );
    }

    #[test]
    fn test_to_text_joins_abutting_runs() {
        let metrics = GlyphMetrics::default();
        let plain = PaintContext::new(FontFace::Sans, 10.0, Color::BLACK);
        let bold = plain.with_font(FontFace::SansBold);
        let name_x = 20.0 + metrics.measure("Dear ", &plain);
        let comma_x = name_x + metrics.measure("Name", &bold);

        let mut page = PageBuffer::a4(1, PageKind::Section);
        let runs = [(20.0, "Dear ", plain), (name_x, "Name", bold), (comma_x, ",", plain)];
        for (x, s, paint) in runs {
            page.content.push(DrawCommand::Text {
                x,
                y: 50.0,
                text: s.to_string(),
                align: Align::Left,
                paint,
            });
        }
        page.content.push(text(150.0, 50.0, "far"));

        let lines = page_lines(&page, &metrics);
        assert_eq!(lines, vec!["Dear Name, far".to_string()]);
    }
}
