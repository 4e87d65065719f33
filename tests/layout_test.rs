//! Integration tests for layout invariants: column bounds, page bottoms,
//! tables, the table of contents and theming.

use chrono::{TimeZone, Utc};
use quire::layout::{column_widths, truncate_cell};
use quire::{
    render_with_options, Align, CancellationToken, Color, DocumentRenderRequest, DrawCommand,
    Error, LayoutOptions, PageBuffer, PageKind, PricingItem, RenderOptions, RenderedDocument,
    Section, Signature,
};

fn options() -> RenderOptions {
    RenderOptions::new().with_generated_at(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
}

fn long_request() -> DocumentRenderRequest {
    let mut content = String::from("# Overview\n\n");
    for i in 0..40 {
        content.push_str(&format!(
            "Paragraph {} explains **deliverables** and *timelines* with `code` samples.\n",
            i
        ));
        if i % 7 == 0 {
            content.push_str(
                "- a bullet that is long enough to wrap onto a second line of the column\n",
            );
            content.push_str("> a quoted remark\n\n---\n");
        }
    }
    content.push_str("| Phase | Weeks | Owner |\n|---|---|---|\n");
    for i in 0..30 {
        content.push_str(&format!("| Phase {} | {} | Team {} |\n", i, i % 5 + 1, i % 3));
    }
    content.push_str(&"Supercalifragilisticexpialidocious".repeat(8));

    let mut request = DocumentRenderRequest::new("Implementation Plan");
    request.add_section(Section::new("plan", "Plan", content).with_order(1));
    request.add_section(Section::new("next", "Next Steps", "Sign and return.").with_order(2));
    request
}

fn render(request: &DocumentRenderRequest) -> RenderedDocument {
    render_with_options(request, &options()).unwrap()
}

// ==================== Column and Page Bounds ====================

fn assert_inside_content_area(page: &PageBuffer, layout: &LayoutOptions) {
    for cmd in &page.content {
        if let DrawCommand::Text {
            x,
            y,
            text,
            align,
            paint,
        } = cmd
        {
            assert!(*y <= layout.bottom_limit() + 1e-6, "{text:?} at y={y}");
            assert!(*y >= layout.margin_top, "{text:?} at y={y}");
            if *align == Align::Left {
                let right = x + layout.metrics.measure(text, paint);
                assert!(
                    right <= layout.content_right() + 1e-6,
                    "{text:?} ends at {right}"
                );
                assert!(*x >= layout.content_left() - 1e-6);
            }
        }
    }
}

#[test]
fn test_section_text_stays_inside_content_area() {
    let layout = LayoutOptions::default();
    let doc = render(&long_request());

    for page in doc.pages_of(PageKind::Section) {
        assert_inside_content_area(page, &layout);
    }
}

#[test]
fn test_signature_text_stays_inside_content_area() {
    let layout = LayoutOptions::default();
    let mut request = DocumentRenderRequest::new("Master Services Agreement");
    request.add_signature(
        Signature::pending("Maximiliana Alexandrina Konstantinopoulou-Vanderbilt of Westphalia")
            .with_role("Vice President of Strategic Partnerships and Enterprise Alliances")
            .with_email("maximiliana.konstantinopoulou@enterprise-alliances.example.com")
            .with_origin(
                "2001:0db8:85a3:0000:0000:8a2e:0370:7334",
                "San Francisco, California, United States of America",
            ),
    );
    let long_location = "Location ".repeat(40);
    request.add_signature(Signature::pending("Ana").with_origin("10.0.0.1", long_location));

    let doc = render(&request);
    let pages: Vec<_> = doc.pages_of(PageKind::Signatures).collect();
    assert!(!pages.is_empty());
    for page in &pages {
        assert_inside_content_area(page, &layout);
    }

    let texts: Vec<&str> = pages.iter().flat_map(|p| p.texts()).collect();
    assert!(texts.iter().any(|t| t.starts_with("Location: San Francisco")));
    assert!(texts.iter().any(|t| t.contains("America")));
    assert!(texts.iter().any(|t| t.starts_with("Vice President") && t.ends_with("...")));
}

#[test]
fn test_overlong_word_is_truncated_with_ellipsis() {
    let doc = render(&long_request());
    let truncated = doc
        .pages
        .iter()
        .flat_map(|p| p.texts())
        .find(|t| t.starts_with("Supercalifragilistic"))
        .unwrap();
    assert!(truncated.ends_with("..."));
}

// ==================== Tables ====================

#[test]
fn test_table_header_repeats_after_break() {
    let mut content = String::from("| Item | Detail |\n|---|---|\n");
    for i in 0..80 {
        content.push_str(&format!("| row {} | detail {} |\n", i, i));
    }
    let mut request = DocumentRenderRequest::new("Inventory");
    request.add_section(Section::new("items", "Items", content));
    request.add_item(PricingItem::new("Audit", 1, 500.0));

    let doc = render(&request);
    let pages: Vec<_> = doc.pages_of(PageKind::Section).collect();
    assert!(pages.len() >= 2);
    for page in &pages {
        assert!(page.content.iter().any(|c| c.text() == Some("Item")));
    }
    // Pricing and audit tables are page furniture, not content tables.
    assert!(doc.pages_of(PageKind::Pricing).next().is_some());
    assert_eq!(doc.stats.table_count, 1);
}

#[test]
fn test_column_widths_fit() {
    let layout = LayoutOptions::default();
    for n in 1..=8 {
        let widths = column_widths(layout.content_width(), n, &layout);
        let sum: f64 = widths.iter().sum();
        assert!(sum <= layout.content_width());
        assert!(widths.iter().all(|w| *w <= layout.table_column_cap));
    }
}

#[test]
fn test_truncated_cells_end_with_marker() {
    let texts = ["short", "a considerably longer cell value than fits"];
    for text in texts {
        let cut = truncate_cell(text, 30.0, 1.6, 2.0);
        let budget = ((30.0 - 4.0) / 1.6f64).floor() as usize;
        if text.chars().count() > budget {
            assert!(cut.ends_with(".."));
            assert_eq!(cut.chars().count(), budget);
        } else {
            assert_eq!(cut, text);
        }
    }
}

// ==================== Table of Contents ====================

#[test]
fn test_contents_page_numbers_are_exact() {
    let doc = render(&long_request());
    let plan = &doc.outline[0];
    let next = &doc.outline[1];
    assert_eq!(plan.title, "Plan");
    assert_eq!(next.title, "Next Steps");
    assert!(next.page > plan.page + 1, "plan section should span pages");

    for entry in &doc.outline {
        let page = doc.page(entry.page).unwrap();
        assert_eq!(page.kind, entry.kind);
        assert_eq!(page.header.as_deref(), Some(entry.title.as_str()));
    }

    let contents = doc.pages_of(PageKind::Contents).next().unwrap();
    let numbers: Vec<&str> = contents
        .content
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, align, .. } if *align == Align::Right => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = doc.outline.iter().map(|e| e.page.to_string()).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_long_contents_spans_pages() {
    let mut request = DocumentRenderRequest::new("Handbook");
    for i in 0..70 {
        let section = Section::new(format!("s{}", i), format!("Chapter {}", i), "Text.");
        request.add_section(section.with_order(i));
    }

    let doc = render(&request);
    let contents: Vec<_> = doc.pages_of(PageKind::Contents).collect();
    assert!(contents.len() >= 2);
    assert_eq!(doc.outline[0].page, 1 + contents.len() + 1);
    assert_eq!(doc.page(doc.outline[69].page).unwrap().header.as_deref(), Some("Chapter 69"));
}

// ==================== Themes ====================

#[test]
fn test_monochrome_theme_draws_only_grays() {
    let mut request = long_request();
    request.theme = "monochrome".to_string();
    let doc = render(&request);

    let is_gray = |c: &Color| c.r == c.g && c.g == c.b;
    for page in &doc.pages {
        for cmd in page.commands() {
            let ok = match cmd {
                DrawCommand::Text { paint, .. } => is_gray(&paint.color),
                DrawCommand::Rect { fill, .. } => is_gray(fill),
                DrawCommand::Line { color, .. } => is_gray(color),
                DrawCommand::Image { .. } => true,
            };
            assert!(ok, "colored command on page {}: {:?}", page.number, cmd);
        }
    }
}

#[test]
fn test_themes_share_page_sequence() {
    for theme in ["classic", "modern", "minimal", "monochrome"] {
        let mut request = long_request();
        request.theme = theme.to_string();
        let doc = render(&request);
        assert_eq!(doc.theme, theme);

        let kinds: Vec<PageKind> = doc.pages.iter().map(|p| p.kind).collect();
        assert_eq!(kinds[0], PageKind::Cover);
        assert_eq!(kinds[1], PageKind::Contents);
        assert_eq!(kinds.last(), Some(&PageKind::Audit));
        let titles: Vec<&str> = doc.outline.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Plan", "Next Steps", "Document Details"]);
    }
}

#[test]
fn test_unknown_theme_is_fatal() {
    let mut request = long_request();
    request.theme = "sparkle".to_string();
    let result = render_with_options(&request, &options());
    assert!(matches!(result, Err(Error::InvalidTheme(name)) if name == "sparkle"));
}

// ==================== Cancellation ====================

#[test]
fn test_cancelled_render_returns_no_pages() {
    let token = CancellationToken::new();
    let options = options().with_cancellation(token.clone());
    token.cancel();

    let result = render_with_options(&long_request(), &options);
    assert!(matches!(result, Err(Error::Cancelled(_))));
}
