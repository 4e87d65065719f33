//! Block rendering: places classified blocks at the cursor.

use super::table::{column_widths, layout_table};
use super::{wrap_runs, Canvas, Paginator, WrappedLine};
use crate::error::Result;
use crate::model::{Align, Block, Color, FontFace, PaintContext, Table, TextRun, TextStyle};

/// Draw every block in order, breaking pages as needed.
pub fn render_blocks(p: &mut Paginator<'_>, blocks: &[Block]) -> Result<()> {
    for block in blocks {
        render_block(p, block)?;
    }
    Ok(())
}

/// Draw one block.
pub fn render_block(p: &mut Paginator<'_>, block: &Block) -> Result<()> {
    debug_assert!(p.cursor().in_bounds() || p.at_page_top());

    match block {
        Block::Heading { level, text } => render_heading(p, *level, text),
        Block::Paragraph { runs } => {
            p.stats_mut().add_paragraph();
            let paint = body_paint(p);
            render_runs(p, runs, paint, 0.0)?;
            p.advance(p.options().paragraph_gap);
            Ok(())
        }
        Block::BulletItem { runs } => render_list_item(p, "-", runs),
        Block::NumberedItem { index, runs } => render_list_item(p, &format!("{}.", index), runs),
        Block::Blockquote { text } => render_quote(p, text),
        Block::Rule => render_rule(p),
        Block::Table(table) => render_table(p, table),
        Block::Spacer => {
            if !p.at_page_top() {
                let gap = p.options().body_line_height() * 0.5;
                p.advance(gap);
            }
            Ok(())
        }
    }
}

fn body_paint(p: &Paginator<'_>) -> PaintContext {
    PaintContext::new(FontFace::Sans, p.options().body_size, p.palette().ink)
}

/// Draw wrapped lines at `indent` from the column edge.
///
/// Each line is guarded by a page break check. `on_line` receives the line
/// index, the column's left edge, the line top and its baseline, and may
/// draw decorations such as list markers.
fn draw_lines(
    p: &mut Paginator<'_>,
    lines: &[WrappedLine],
    paint: PaintContext,
    indent: f64,
    mut on_line: impl FnMut(&mut Canvas, usize, f64, f64, f64),
) -> Result<()> {
    let metrics = p.options().metrics;
    let line_height = metrics.line_height(paint.size);
    let ascent = metrics.ascent(paint.size);

    for (i, line) in lines.iter().enumerate() {
        p.check_page_break(line_height)?;
        let top = p.cursor().y;
        let baseline = top + ascent;
        let left = p.cursor().x;
        let mut x = left + indent;

        let canvas = p.canvas();
        on_line(canvas, i, left, top, baseline);
        for segment in &line.segments {
            let seg_paint = paint.with_style(segment.style);
            canvas.text(x, baseline, &segment.text, seg_paint);
            x += metrics.measure(&segment.text, &seg_paint);
        }
        p.stats_mut().count_text(&line.text());
        p.advance(line_height);
    }
    Ok(())
}

fn render_runs(
    p: &mut Paginator<'_>,
    runs: &[TextRun],
    paint: PaintContext,
    indent: f64,
) -> Result<()> {
    let width = p.cursor().width - indent;
    let lines = wrap_runs(runs, &paint, width, &p.options().metrics);
    draw_lines(p, &lines, paint, indent, |_, _, _, _, _| {})
}

fn render_heading(p: &mut Paginator<'_>, level: u8, text: &str) -> Result<()> {
    let options = p.options();
    let size = options.heading_size(level);
    let paint = PaintContext::new(FontFace::SansBold, size, p.palette().heading);
    let line_height = options.metrics.line_height(size);
    let space_before = if p.at_page_top() { 0.0 } else { line_height * 0.4 };

    // Keep the heading with at least one body line.
    let keep = space_before + line_height + options.body_line_height();
    if !p.check_page_break(keep)? && space_before > 0.0 {
        p.advance(space_before);
    }

    let lines = wrap_runs(&[TextRun::new(text)], &paint, p.cursor().width, &options.metrics);
    draw_lines(p, &lines, paint, 0.0, |_, _, _, _, _| {})?;
    p.stats_mut().add_heading();
    p.advance(options.paragraph_gap);
    Ok(())
}

fn render_list_item(p: &mut Paginator<'_>, marker: &str, runs: &[TextRun]) -> Result<()> {
    let options = p.options();
    let paint = body_paint(p);
    let indent = options.list_indent;
    let accent = p.palette().accent;
    let width = p.cursor().width - indent;
    let lines = wrap_runs(runs, &paint, width, &options.metrics);
    draw_lines(p, &lines, paint, indent, |canvas, i, left, _top, baseline| {
        if i == 0 {
            let marker_paint = paint.with_color(accent);
            canvas.text_aligned(left + indent - 1.5, baseline, marker, Align::Right, marker_paint);
        }
    })?;
    p.stats_mut().add_list_item();
    p.advance(options.paragraph_gap * 0.5);
    Ok(())
}

fn render_quote(p: &mut Paginator<'_>, text: &str) -> Result<()> {
    let options = p.options();
    let palette = p.palette();
    let paint = PaintContext::new(FontFace::Sans, options.body_size, palette.muted)
        .with_style(TextStyle::ITALIC);
    let indent = options.list_indent;
    let line_height = options.metrics.line_height(paint.size);
    let lines = wrap_runs(
        &[TextRun::new(text)],
        &paint,
        p.cursor().width - indent,
        &options.metrics,
    );

    draw_lines(p, &lines, paint, indent, |canvas, _, left, top, _| {
        canvas.rect(left + 1.0, top, 1.0, line_height, palette.accent);
    })?;
    p.stats_mut().add_paragraph();
    p.advance(options.paragraph_gap);
    Ok(())
}

fn render_rule(p: &mut Paginator<'_>) -> Result<()> {
    let space = p.options().body_line_height();
    p.check_page_break(space)?;
    let y = p.cursor().y + space / 2.0;
    let x = p.cursor().x;
    let width = p.cursor().width;
    let color: Color = p.palette().rule;
    p.canvas().line(x, y, x + width, y, 0.3, color);
    p.stats_mut().add_horizontal_rule();
    p.advance(space);
    Ok(())
}

fn render_table(p: &mut Paginator<'_>, table: &Table) -> Result<()> {
    let columns = table.header().map(|h| h.cells.len()).unwrap_or(0).max(1);
    let widths = column_widths(p.cursor().width, columns, p.options());
    layout_table(p, &table.rows, &widths, &[])?;
    p.stats_mut().add_table();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::layout::paginate::tests::PlainDecorator;
    use crate::layout::LayoutOptions;
    use crate::markup::classify_text;
    use crate::model::{DrawCommand, PageBuffer, PageKind};

    fn render(content: &str) -> Vec<PageBuffer> {
        let opts = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&opts, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, Some("Section")).unwrap();
        render_blocks(&mut p, &classify_text(content)).unwrap();
        p.finish().0
    }

    #[test]
    fn test_bold_run_has_no_asterisks() {
        let pages = render("Dear **Name**, welcome.");
        let texts: Vec<_> = pages[0].content.iter().filter_map(|c| c.text()).collect();
        assert!(texts.iter().all(|t| !t.contains('*')));
        let bold = pages[0].content.iter().find_map(|c| match c {
            DrawCommand::Text { text, paint, .. } if text == "Name" => Some(paint.font),
            _ => None,
        });
        assert_eq!(bold, Some(FontFace::SansBold));
    }

    #[test]
    fn test_lines_stay_in_column() {
        let opts = LayoutOptions::default();
        let content = "word ".repeat(400) + "\n- " + &"item ".repeat(100);
        let pages = render(&content);
        for page in &pages {
            for cmd in &page.content {
                if let DrawCommand::Text { x, y, text, paint, align } = cmd {
                    assert!(*y <= opts.bottom_limit() + 1e-6);
                    if *align == Align::Left {
                        let right = x + opts.metrics.measure(text, paint);
                        assert!(right <= opts.content_right() + 1e-6, "{right}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_long_paragraph_continues() {
        let pages = render(&"lorem ipsum dolor sit amet ".repeat(600));
        assert!(pages.len() > 1);
        assert_eq!(pages[1].header.as_deref(), Some("Section (continued)"));
    }

    #[test]
    fn test_list_marker_drawn() {
        let pages = render("1. first\n- second");
        let texts: Vec<_> = pages[0].content.iter().filter_map(|c| c.text()).collect();
        assert!(texts.contains(&"1."));
        assert!(texts.contains(&"-"));
        assert!(texts.contains(&"first"));
    }

    #[test]
    fn test_rule_and_quote() {
        let pages = render("> quoted\n---");
        assert!(pages[0]
            .content
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { .. })));
        assert!(pages[0].content.iter().any(|c| c.text() == Some("quoted")));
    }

    #[test]
    fn test_content_tables_counted_once() {
        let opts = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&opts, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, None).unwrap();
        let blocks = classify_text("| A | B |\n|---|---|\n| 1 | 2 |\n\n| C |\n| 3 |");
        render_blocks(&mut p, &blocks).unwrap();

        let (_, stats) = p.finish();
        assert_eq!(stats.table_count, 2);
    }
}
