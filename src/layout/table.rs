//! Fixed-width table layout.

use super::{LayoutOptions, Paginator};
use crate::error::Result;
use crate::model::{Align, FontFace, PaintContext, TableRow};

/// Equal column widths: `min((max_width - padding) / n, cap)`.
pub fn column_widths(max_width: f64, column_count: usize, options: &LayoutOptions) -> Vec<f64> {
    if column_count == 0 {
        return Vec::new();
    }
    let width = ((max_width - options.table_padding) / column_count as f64)
        .min(options.table_column_cap)
        .max(0.0);
    vec![width; column_count]
}

/// Column widths proportional to `weights`, filling `max_width - padding`.
pub fn weighted_widths(max_width: f64, weights: &[f64], options: &LayoutOptions) -> Vec<f64> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return column_widths(max_width, weights.len(), options);
    }
    let usable = (max_width - options.table_padding).max(0.0);
    weights
        .iter()
        .map(|w| usable * w.max(0.0) / total)
        .collect()
}

/// Cut `text` to the character budget of a column, ending it with `..`.
///
/// The budget is `floor((col_width - 2 * padding) / glyph_width)`. Text within
/// budget is returned unchanged; longer text becomes exactly `budget`
/// characters, or just `..` when the budget is below two.
pub fn truncate_cell(text: &str, col_width: f64, glyph_width: f64, padding: f64) -> String {
    let budget = if glyph_width > 0.0 {
        ((col_width - 2.0 * padding) / glyph_width).floor().max(0.0) as usize
    } else {
        usize::MAX
    };

    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget < 2 {
        return "..".to_string();
    }

    let mut out: String = text.chars().take(budget - 2).collect();
    out.push_str("..");
    out
}

/// Draw a table at the cursor; returns the cursor y below it.
///
/// The first row is the header. Rows are padded or cut to `widths.len()`
/// columns; the header is repeated at the top of every continuation page.
pub fn layout_table(
    p: &mut Paginator<'_>,
    rows: &[TableRow],
    widths: &[f64],
    aligns: &[Align],
) -> Result<f64> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(p.cursor().y);
    };
    if widths.is_empty() {
        return Ok(p.cursor().y);
    }

    let options = p.options();
    let row_height = options.table_row_height;
    let first_block = if body.is_empty() { row_height } else { 2.0 * row_height };

    p.check_page_break(first_block)?;
    draw_row(p, header, widths, aligns, RowRole::Header)?;

    for (i, row) in body.iter().enumerate() {
        if p.check_page_break(row_height)? {
            log::debug!("Repeating table header on page {}", p.page_number());
            draw_row(p, header, widths, aligns, RowRole::Header)?;
        }
        let role = if i % 2 == 1 { RowRole::Striped } else { RowRole::Body };
        draw_row(p, row, widths, aligns, role)?;
    }

    p.advance(options.paragraph_gap);
    Ok(p.cursor().y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowRole {
    Header,
    Body,
    Striped,
}

fn draw_row(
    p: &mut Paginator<'_>,
    row: &TableRow,
    widths: &[f64],
    aligns: &[Align],
    role: RowRole,
) -> Result<()> {
    let options = p.options();
    let palette = p.palette();
    let metrics = options.metrics;
    let height = options.table_row_height;
    let pad = options.cell_padding;
    let left = p.cursor().x;
    let top = p.cursor().y;
    let table_width: f64 = widths.iter().sum();

    let paint = match role {
        RowRole::Header => PaintContext::new(
            FontFace::SansBold,
            options.table_font_size,
            palette.header_text,
        ),
        RowRole::Body | RowRole::Striped => {
            PaintContext::new(FontFace::Sans, options.table_font_size, palette.ink)
        }
    };
    let glyph = metrics.glyph_width(&paint);
    let baseline = top + (height + metrics.ascent(paint.size) * 0.7) / 2.0;

    let cells = row.fit_to(widths.len());
    let mut truncated = 0;
    {
        let canvas = p.canvas();
        match role {
            RowRole::Header => canvas.rect(left, top, table_width, height, palette.header_fill),
            RowRole::Striped => canvas.rect(left, top, table_width, height, palette.stripe),
            RowRole::Body => {}
        }

        let mut x = left;
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            let text = truncate_cell(cell, *width, glyph, pad);
            if text != *cell {
                truncated += 1;
            }
            let align = aligns.get(i).copied().unwrap_or_default();
            let anchor = match align {
                Align::Left => x + pad,
                Align::Center => x + width / 2.0,
                Align::Right => x + width - pad,
            };
            canvas.text_aligned(anchor, baseline, &text, align, paint);
            x += width;
        }

        canvas.line(left, top + height, left + table_width, top + height, 0.2, palette.rule);
    }

    let stats = p.stats_mut();
    for _ in 0..truncated {
        stats.add_truncated_cell();
    }
    for cell in &cells {
        stats.count_text(cell);
    }
    p.advance(height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::layout::paginate::tests::PlainDecorator;
    use crate::model::PageKind;

    #[test]
    fn test_column_widths_capped() {
        let opts = LayoutOptions::default();
        assert_eq!(column_widths(170.0, 2, &opts), vec![60.0, 60.0]);
        let five = column_widths(170.0, 5, &opts);
        assert!((five[0] - 33.2).abs() < 1e-9);
        assert!(five.iter().sum::<f64>() <= 170.0);
        assert!(column_widths(170.0, 0, &opts).is_empty());
    }

    #[test]
    fn test_weighted_widths_fill_usable() {
        let opts = LayoutOptions::default();
        let widths = weighted_widths(170.0, &[0.4, 0.12, 0.18, 0.12, 0.18], &opts);
        assert!((widths.iter().sum::<f64>() - 166.0).abs() < 1e-9);
        assert!(widths[0] > widths[1]);
    }

    #[test]
    fn test_truncate_cell() {
        // budget = floor((20 - 4) / 2) = 8
        assert_eq!(truncate_cell("short", 20.0, 2.0, 2.0), "short");
        assert_eq!(truncate_cell("exactly8", 20.0, 2.0, 2.0), "exactly8");
        let cut = truncate_cell("much longer text", 20.0, 2.0, 2.0);
        assert_eq!(cut, "much l..");
        assert_eq!(cut.chars().count(), 8);
        // budget = floor((6 - 4) / 2) = 1
        assert_eq!(truncate_cell("abc", 6.0, 2.0, 2.0), "..");
    }

    #[test]
    fn test_header_repeats_on_continuation() {
        let opts = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&opts, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, Some("Data")).unwrap();

        let mut rows = vec![TableRow::from_strings(["Name", "Value"])];
        for i in 0..60 {
            rows.push(TableRow::from_strings([format!("row {i}"), i.to_string()]));
        }
        let widths = column_widths(opts.content_width(), 2, &opts);
        layout_table(&mut p, &rows, &widths, &[]).unwrap();

        let (pages, stats) = p.finish();
        assert!(pages.len() >= 2);
        assert_eq!(stats.table_count, 0);
        for page in &pages {
            let first_body_text = page.content.iter().find_map(|c| c.text());
            assert_eq!(first_body_text, Some("Name"));
            for cmd in &page.content {
                if let crate::model::DrawCommand::Text { y, .. } = cmd {
                    assert!(*y <= opts.bottom_limit());
                }
            }
        }
    }

    #[test]
    fn test_ragged_rows_padded() {
        let opts = LayoutOptions::default();
        let cancel = CancellationToken::new();
        let mut p = Paginator::new(&opts, &PlainDecorator, &cancel, true);
        p.start_page(PageKind::Section, None).unwrap();
        let rows = vec![
            TableRow::from_strings(["A", "B", "C"]),
            TableRow::from_strings(["1"]),
            TableRow::from_strings(["1", "2", "3", "4"]),
        ];
        let widths = column_widths(opts.content_width(), 3, &opts);
        layout_table(&mut p, &rows, &widths, &[]).unwrap();
        let (pages, _) = p.finish();
        let texts: Vec<_> = pages[0].content.iter().filter_map(|c| c.text()).collect();
        assert_eq!(texts, vec!["A", "B", "C", "1", "1", "2", "3"]);
    }
}
