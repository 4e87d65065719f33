//! Page types of a composed document.

use super::format::{format_currency, format_date, format_datetime};
use crate::error::Result;
use crate::layout::{
    fit_text, layout_table, render_blocks, weighted_widths, wrap_text, Paginator,
};
use crate::markup::classify_text;
use crate::model::{
    Align, Block, Contact, DocumentRenderRequest, FontFace, ImageAsset, PageKind, PaintContext,
    Section, Signature, TableRow, TextRun, TextStyle,
};
use crate::render::TocEntry;
use chrono::{DateTime, Utc};

/// Column weights of the pricing table.
const PRICING_WEIGHTS: [f64; 5] = [0.4, 0.1, 0.14, 0.18, 0.18];

/// Column weights of the audit table.
const AUDIT_WEIGHTS: [f64; 2] = [0.35, 0.65];

const SIGNATURE_BLOCK: f64 = 48.0;
const SIGNATURE_BOX_WIDTH: f64 = 70.0;
const SIGNATURE_BOX_HEIGHT: f64 = 22.0;
const SIGNATURE_META_GAP: f64 = 10.0;
const SIGNATURE_META_LEADING: f64 = 5.0;
/// Meta lines that fit between the box top and the block bottom.
const SIGNATURE_META_LINES: usize = 5;

const REQUIRED_PLACEHOLDER: &str = "[Required section not completed]";
const EMPTY_PLACEHOLDER: &str = "No content provided.";

/// Request data shared by every page routine.
pub struct PageContext<'a> {
    /// The (normalized) request
    pub request: &'a DocumentRenderRequest,
    /// Render timestamp; stands in for missing dates
    pub generated_at: DateTime<Utc>,
    /// Theme name for the audit page
    pub theme_name: &'a str,
}

fn body(p: &Paginator<'_>) -> PaintContext {
    PaintContext::new(FontFace::Sans, p.options().body_size, p.palette().ink)
}

fn muted(p: &Paginator<'_>, size: f64) -> PaintContext {
    body(p).with_size(size).with_color(p.palette().muted)
}

/// Wrap and draw single-style text, one page break check per line.
fn write_lines(p: &mut Paginator<'_>, text: &str, paint: PaintContext, indent: f64) -> Result<()> {
    let metrics = p.options().metrics;
    let line_height = metrics.line_height(paint.size);
    let ascent = metrics.ascent(paint.size);
    let width = p.cursor().width - indent;

    for line in wrap_text(text, &paint, width, &metrics) {
        p.check_page_break(line_height)?;
        let x = p.cursor().x + indent;
        let baseline = p.cursor().y + ascent;
        p.canvas().text(x, baseline, &line, paint);
        p.advance(line_height);
    }
    Ok(())
}

fn gap(p: &mut Paginator<'_>, height: f64) {
    if !p.at_page_top() {
        p.advance(height);
    }
}

fn page_title(p: &mut Paginator<'_>, title: &str) {
    let options = p.options();
    let decorator = p.decorator();
    let y = p.cursor().y;
    let height = decorator.page_title(p.canvas(), options, y, title);
    p.advance(height);
}

/// Draw an image, or a captioned box when the bytes are missing.
fn place_image(
    p: &mut Paginator<'_>,
    asset: Option<&ImageAsset>,
    (x, y, width, height): (f64, f64, f64, f64),
    caption: &str,
) {
    match asset.and_then(ImageAsset::resource) {
        Some(resource) => {
            p.canvas().image(x, y, width, height, resource);
            p.stats_mut().add_image();
        }
        None => {
            if let (Some(ImageAsset::Unavailable { reason }), true) = (asset, p.is_drawing()) {
                log::debug!("Drawing placeholder for unavailable image: {}", reason);
            }
            let paint = muted(p, 8.0);
            let rule = p.palette().rule;
            let baseline = y + height / 2.0 + 1.0;
            let canvas = p.canvas();
            canvas.stroke_rect(x, y, width, height, rule);
            canvas.text_aligned(x + width / 2.0, baseline, caption, Align::Center, paint);
            p.stats_mut().add_placeholder();
        }
    }
}

fn contact_block(
    p: &mut Paginator<'_>,
    label: &str,
    name: &str,
    contact: Option<&Contact>,
) -> Result<()> {
    let label_paint = muted(p, 9.0).with_font(FontFace::SansBold);
    let name_paint = PaintContext::new(FontFace::SansBold, 14.0, p.palette().heading);
    let detail_paint = muted(p, 10.0);

    write_lines(p, label, label_paint, 0.0)?;
    write_lines(p, name, name_paint, 0.0)?;
    if let Some(contact) = contact {
        for line in contact.detail_lines() {
            write_lines(p, line, detail_paint, 0.0)?;
        }
    }
    gap(p, 6.0);
    Ok(())
}

/// Cover page: title treatment, parties and key dates.
pub fn cover(p: &mut Paginator<'_>, ctx: &PageContext<'_>) -> Result<()> {
    let request = ctx.request;
    let info = &request.document;
    p.start_bare_page(PageKind::Cover)?;

    let options = p.options();
    let decorator = p.decorator();
    let top = decorator.cover(p.canvas(), options, &info.title, info.type_label());
    p.set_y(top);

    if let Some(company) = &request.company {
        if let Some(logo) = &company.logo {
            let frame = (options.content_right() - 40.0, top, 40.0, 16.0);
            place_image(p, Some(logo), frame, "Logo unavailable");
        }
    }

    if let Some(service) = info.service_type.as_deref().filter(|s| !s.trim().is_empty()) {
        let paint = muted(p, 12.0);
        write_lines(p, service, paint, 0.0)?;
        gap(p, 6.0);
    }

    contact_block(p, "PREPARED FOR", request.client_name(), request.client.as_ref())?;
    if let Some(company) = &request.company {
        contact_block(p, "PREPARED BY", &company.name, Some(company))?;
    }

    let paint = body(p);
    let created = info.created_at.unwrap_or(ctx.generated_at);
    write_lines(p, &format!("Date: {}", format_date(&created)), paint, 0.0)?;
    if let Some(expires) = &info.expires_at {
        write_lines(p, &format!("Valid until: {}", format_date(expires)), paint, 0.0)?;
    }
    if let Some(id) = info.id.as_deref() {
        write_lines(p, &format!("Reference: {}", id), paint, 0.0)?;
    }
    let version = format!("Version {} - {}", info.version, info.status.label());
    let paint = muted(p, 9.0);
    write_lines(p, &version, paint, 0.0)?;
    Ok(())
}

/// Table of contents; `entries` carry the page numbers to print.
pub fn contents(p: &mut Paginator<'_>, entries: &[TocEntry]) -> Result<()> {
    p.start_page(PageKind::Contents, Some("Contents"))?;
    page_title(p, "Table of Contents");

    let paint = body(p);
    let metrics = p.options().metrics;
    let line_height = metrics.line_height(paint.size);
    let ascent = metrics.ascent(paint.size);
    let number_column = 20.0;
    let title_width = p.cursor().width - number_column;

    for entry in entries {
        let lines = wrap_text(&entry.title, &paint, title_width, &metrics);
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            p.check_page_break(line_height)?;
            let x = p.cursor().x;
            let baseline = p.cursor().y + ascent;
            let right = x + p.cursor().width;
            let canvas = p.canvas();
            canvas.text(x, baseline, line, paint);
            if i == last {
                canvas.text_aligned(right, baseline, &entry.page.to_string(), Align::Right, paint);
            }
            p.advance(line_height);
        }
        p.advance(p.options().paragraph_gap);
    }
    Ok(())
}

fn placeholder(section: &Section) -> Block {
    let text = if section.required {
        REQUIRED_PLACEHOLDER
    } else {
        EMPTY_PLACEHOLDER
    };
    Block::paragraph(vec![TextRun::italic(text)])
}

/// Blocks of a section, or a placeholder when it has no usable content.
pub fn section_blocks(section: &Section) -> Vec<Block> {
    let blocks = classify_text(&section.content);
    if blocks.is_empty() {
        vec![placeholder(section)]
    } else {
        blocks
    }
}

/// One section, starting on a fresh page.
pub fn section(p: &mut Paginator<'_>, section: &Section) -> Result<()> {
    p.start_page(PageKind::Section, Some(&section.title))?;
    page_title(p, &section.title);
    let blocks = section_blocks(section);
    if section.required && p.is_drawing() && blocks == [placeholder(section)] {
        log::warn!("Required section '{}' is empty", section.key);
    }
    render_blocks(p, &blocks)
}

/// Pricing table and totals.
pub fn pricing(p: &mut Paginator<'_>, ctx: &PageContext<'_>) -> Result<()> {
    let request = ctx.request;
    let totals = request.resolved_totals();
    let currency = totals.currency.as_str();

    p.start_page(PageKind::Pricing, Some("Pricing"))?;
    page_title(p, "Pricing Summary");

    let header = ["Description", "Qty", "Unit", "Unit price", "Total"];
    let mut rows = vec![TableRow::from_strings(header)];
    for item in &request.pricing {
        rows.push(TableRow::from_strings([
            item.label().to_string(),
            item.quantity.to_string(),
            item.unit.label().to_string(),
            format_currency(item.unit_price.max(0.0), currency),
            format_currency(item.line_total(), currency),
        ]));
    }
    let widths = weighted_widths(p.cursor().width, &PRICING_WEIGHTS, p.options());
    let aligns = [Align::Left, Align::Right, Align::Left, Align::Right, Align::Right];
    layout_table(p, &rows, &widths, &aligns)?;

    let mut lines = vec![("Subtotal", format_currency(totals.subtotal, currency), false)];
    if totals.discount > 0.0 {
        lines.push(("Discount", format_currency(-totals.discount, currency), false));
    }
    if totals.tax > 0.0 {
        lines.push(("Tax", format_currency(totals.tax, currency), false));
    }
    lines.push(("Total", format_currency(totals.total, currency), true));

    let base = body(p);
    let heading = p.palette().heading;
    let rule = p.palette().rule;
    let metrics = p.options().metrics;
    let line_height = metrics.line_height(base.size) + 1.0;
    let ascent = metrics.ascent(base.size);

    for (label, value, strong) in lines {
        p.check_page_break(line_height)?;
        let right = p.cursor().x + p.cursor().width;
        let top = p.cursor().y;
        let paint = if strong {
            base.with_font(FontFace::SansBold).with_color(heading)
        } else {
            base
        };
        let canvas = p.canvas();
        if strong {
            canvas.line(right - 80.0, top, right, top, 0.3, rule);
        }
        canvas.text_aligned(right - 45.0, top + ascent + 0.5, label, Align::Right, paint);
        canvas.text_aligned(right, top + ascent + 0.5, &value, Align::Right, paint);
        p.advance(line_height);
    }
    Ok(())
}

fn signature_block(p: &mut Paginator<'_>, signature: &Signature) -> Result<()> {
    p.check_page_break(SIGNATURE_BLOCK)?;
    let x = p.cursor().x;
    let width = p.cursor().width;
    let top = p.cursor().y;
    let metrics = p.options().metrics;
    let palette = p.palette();
    let name_paint = PaintContext::new(FontFace::SansBold, 11.0, palette.heading);
    let detail_paint = muted(p, 9.0);

    let details: Vec<&str> = [signature.role.as_deref(), signature.email.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let name = if signature.name.trim().is_empty() {
        "Signer"
    } else {
        signature.name.as_str()
    };

    let name = fit_text(name, &name_paint, width, &metrics);
    let canvas = p.canvas();
    canvas.text(x, top + 5.0, &name, name_paint);
    if !details.is_empty() {
        let line = fit_text(&details.join(" | "), &detail_paint, width, &metrics);
        canvas.text(x, top + 10.0, &line, detail_paint);
    }

    let frame = (x, top + 13.0, SIGNATURE_BOX_WIDTH, SIGNATURE_BOX_HEIGHT);
    let status_y = top + 13.0 + SIGNATURE_BOX_HEIGHT + 5.0;
    match &signature.completion {
        None => {
            let line_y = frame.1 + frame.3;
            let canvas = p.canvas();
            canvas.line(x, line_y, x + SIGNATURE_BOX_WIDTH, line_y, 0.3, palette.rule);
            let pending = detail_paint.with_style(TextStyle::ITALIC);
            canvas.text(x, status_y, "Pending signature", pending);
        }
        Some(completion) => {
            place_image(p, Some(&completion.image), frame, "Signature image unavailable");
            let signed = format!("Signed on {}", format_datetime(&completion.signed_at));
            let signed = fit_text(&signed, &detail_paint, width, &metrics);
            p.canvas().text(x, status_y, &signed, detail_paint);
        }
    }

    let meta_x = x + SIGNATURE_BOX_WIDTH + SIGNATURE_META_GAP;
    let meta_width = x + width - meta_x;
    let mut meta: Vec<String> = Vec::new();
    if let Some(ip) = signature.ip_address.as_deref() {
        let text = format!("IP address: {}", ip);
        meta.extend(wrap_text(&text, &detail_paint, meta_width, &metrics));
    }
    if let Some(location) = signature.location.as_deref() {
        let text = format!("Location: {}", location);
        meta.extend(wrap_text(&text, &detail_paint, meta_width, &metrics));
    }
    if meta.len() > SIGNATURE_META_LINES {
        meta.truncate(SIGNATURE_META_LINES);
        if let Some(last) = meta.last_mut() {
            *last = fit_text(&format!("{} ...", last), &detail_paint, meta_width, &metrics);
        }
    }

    let canvas = p.canvas();
    for (i, line) in meta.iter().enumerate() {
        let y = top + 20.0 + i as f64 * SIGNATURE_META_LEADING;
        canvas.text(meta_x, y, line, detail_paint);
    }

    p.advance(SIGNATURE_BLOCK);
    Ok(())
}

/// Signature page(s), one block per signer.
pub fn signatures(p: &mut Paginator<'_>, ctx: &PageContext<'_>) -> Result<()> {
    let request = ctx.request;
    p.start_page(PageKind::Signatures, Some("Signatures"))?;
    page_title(p, "Signatures");

    let intro = format!(
        "By signing below, the parties accept the terms of this {}.",
        request.document.type_label().to_lowercase()
    );
    let paint = body(p);
    write_lines(p, &intro, paint, 0.0)?;
    gap(p, 6.0);

    for signature in &request.signatures {
        signature_block(p, signature)?;
    }
    Ok(())
}

fn audit_rows(ctx: &PageContext<'_>) -> Vec<TableRow> {
    let request = ctx.request;
    let info = &request.document;
    let or_none = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).unwrap_or("-").to_string();
    let date_or_none = |d: Option<&DateTime<Utc>>| {
        d.map(format_datetime).unwrap_or_else(|| "-".to_string())
    };

    let mut rows = vec![
        TableRow::from_strings(["Field", "Value"]),
        TableRow::from_strings(["Document ID".to_string(), or_none(info.id.as_deref())]),
        TableRow::from_strings(["Title".to_string(), info.title.clone()]),
        TableRow::from_strings(["Type".to_string(), info.type_label().to_string()]),
        TableRow::from_strings(["Service".to_string(), or_none(info.service_type.as_deref())]),
        TableRow::from_strings(["Status".to_string(), info.status.label().to_string()]),
        TableRow::from_strings(["Version".to_string(), info.version.to_string()]),
        TableRow::from_strings(["Created".to_string(), date_or_none(info.created_at.as_ref())]),
        TableRow::from_strings(["Expires".to_string(), date_or_none(info.expires_at.as_ref())]),
        TableRow::from_strings(["Sections".to_string(), request.sections.len().to_string()]),
    ];

    if !request.pricing.is_empty() {
        let totals = request.resolved_totals();
        rows.push(TableRow::from_strings([
            "Total".to_string(),
            format_currency(totals.total, &totals.currency),
        ]));
    }
    if !request.signatures.is_empty() {
        let signed = request.signatures.iter().filter(|s| s.is_signed()).count();
        rows.push(TableRow::from_strings([
            "Signatures".to_string(),
            format!("{} of {} signed", signed, request.signatures.len()),
        ]));
    }
    rows.push(TableRow::from_strings(["Theme".to_string(), ctx.theme_name.to_string()]));
    rows.push(TableRow::from_strings([
        "Generated".to_string(),
        format_datetime(&ctx.generated_at),
    ]));
    rows
}

/// Audit / metadata page.
pub fn audit(p: &mut Paginator<'_>, ctx: &PageContext<'_>) -> Result<()> {
    p.start_page(PageKind::Audit, Some("Document Details"))?;
    page_title(p, "Document Details");

    let widths = weighted_widths(p.cursor().width, &AUDIT_WEIGHTS, p.options());
    layout_table(p, &audit_rows(ctx), &widths, &[])?;

    let request = ctx.request;
    if request.signatures.is_empty() {
        return Ok(());
    }

    gap(p, 4.0);
    let heading = PaintContext::new(FontFace::SansBold, 11.0, p.palette().heading);
    write_lines(p, "Signature trail", heading, 0.0)?;
    let paint = muted(p, 9.0);
    for signature in &request.signatures {
        let mut line = match signature.signed_at() {
            Some(at) => format!("{}: signed {}", signature.name, format_datetime(&at)),
            None => format!("{}: pending", signature.name),
        };
        let origin: Vec<&str> = [signature.ip_address.as_deref(), signature.location.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !origin.is_empty() {
            line.push_str(&format!(" ({})", origin.join(", ")));
        }
        write_lines(p, &line, paint, 0.0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_placeholders() {
        let empty = Section::new("a", "A", "   ");
        assert_eq!(
            section_blocks(&empty),
            vec![Block::paragraph(vec![TextRun::italic(EMPTY_PLACEHOLDER)])]
        );

        let required = Section::new("b", "B", "").required();
        assert_eq!(
            section_blocks(&required)[0].plain_text(),
            "[Required section not completed]"
        );

        let separators_only = Section::new("c", "C", "|---|---|");
        assert_eq!(section_blocks(&separators_only).len(), 1);
    }

    #[test]
    fn test_audit_rows() {
        let mut request = DocumentRenderRequest::new("Deal");
        request.add_signature(Signature::pending("Ana"));
        let ctx = PageContext {
            request: &request,
            generated_at: chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 1, 2, 3, 4, 0).unwrap(),
            theme_name: "classic",
        };
        let rows = audit_rows(&ctx);
        let find = |field: &str| {
            rows.iter()
                .find(|r| r.cells[0] == field)
                .map(|r| r.cells[1].clone())
        };
        assert_eq!(find("Title").as_deref(), Some("Deal"));
        assert_eq!(find("Document ID").as_deref(), Some("-"));
        assert_eq!(find("Signatures").as_deref(), Some("0 of 1 signed"));
        assert_eq!(find("Generated").as_deref(), Some("January 2, 2025 at 03:04 UTC"));
        assert!(find("Total").is_none());
    }
}
