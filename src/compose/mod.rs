//! Document composition: page sequence, two-pass layout and theming.
//!
//! A render lays the document out twice with identical logic. The first pass
//! records nothing but page numbers; the second draws, using the first pass's
//! outline for the table of contents and its page count for the footers.

mod decorator;
mod format;
mod pages;

pub use decorator::{decorator_for, BannerDecorator, Labels, RuleDecorator};
pub use format::{format_currency, format_date, format_datetime};
pub use pages::section_blocks;

use crate::error::Result;
use crate::layout::{PageDecorator, Paginator};
use crate::markup::normalize;
use crate::model::{Contact, DocumentRenderRequest, PageBuffer, PageKind, Theme, ThemeRegistry};
use crate::render::{LayoutStats, RenderOptions, RenderedDocument, TocEntry};
use pages::PageContext;

const UNTITLED_DOCUMENT: &str = "Untitled document";
const PRICING_TITLE: &str = "Pricing";
const SIGNATURES_TITLE: &str = "Signatures";
const AUDIT_TITLE: &str = "Document Details";

/// Layout pass reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// Dry run counting pages
    Measuring,
    /// Drawing pass
    Drawing,
}

/// Lays out render requests with a theme registry and options.
pub struct Composer<'a> {
    registry: &'a ThemeRegistry,
    options: &'a RenderOptions,
}

struct Pass {
    pages: Vec<PageBuffer>,
    stats: LayoutStats,
    outline: Vec<TocEntry>,
}

impl<'a> Composer<'a> {
    /// Create a composer.
    pub fn new(registry: &'a ThemeRegistry, options: &'a RenderOptions) -> Self {
        Self { registry, options }
    }

    /// Theme for a request: the override, or the registry entry it names.
    pub fn resolve_theme(&self, request: &DocumentRenderRequest) -> Result<Theme> {
        match &self.options.theme {
            Some(theme) => Ok(theme.clone()),
            None => self.registry.resolve(&request.theme).cloned(),
        }
    }

    /// Lay out a request.
    pub fn compose(&self, request: &DocumentRenderRequest) -> Result<RenderedDocument> {
        self.compose_with_progress(request, |_, _| {})
    }

    /// Lay out a request, reporting the page count after each pass.
    pub fn compose_with_progress(
        &self,
        request: &DocumentRenderRequest,
        mut progress: impl FnMut(RenderPhase, usize),
    ) -> Result<RenderedDocument> {
        let theme = self.resolve_theme(request)?;
        let request = normalize_request(request);
        let company = request.company.as_ref().map(|c| c.name.as_str());
        let decorator = decorator_for(&theme, &request.document.title, company);
        log::debug!(
            "Composing '{}' with theme '{}' ({} decorator)",
            request.document.title,
            theme.name,
            decorator.name()
        );

        let ctx = PageContext {
            request: &request,
            generated_at: self.options.timestamp(),
            theme_name: &theme.name,
        };

        let planned = planned_outline(&request, self.options);
        let measured = self.run_pass(&ctx, decorator.as_ref(), &planned, None, false)?;
        let total = measured.pages.len();
        progress(RenderPhase::Measuring, total);

        let drawn = self.run_pass(&ctx, decorator.as_ref(), &measured.outline, Some(total), true)?;
        progress(RenderPhase::Drawing, drawn.pages.len());
        if drawn.outline != measured.outline || drawn.pages.len() != total {
            log::warn!(
                "Layout passes disagree: {} pages measured, {} drawn",
                total,
                drawn.pages.len()
            );
        }

        let selection = &self.options.page_selection;
        let pages: Vec<PageBuffer> = drawn
            .pages
            .into_iter()
            .filter(|page| selection.includes(page.number))
            .collect();

        log::info!(
            "Rendered '{}': {} pages, {} page breaks, {} placeholders",
            request.document.title,
            drawn.stats.page_count,
            drawn.stats.page_breaks,
            drawn.stats.placeholder_count
        );

        Ok(RenderedDocument {
            title: request.document.title.clone(),
            theme: theme.name.clone(),
            pages,
            outline: drawn.outline,
            stats: drawn.stats,
        })
    }

    fn run_pass(
        &self,
        ctx: &PageContext<'_>,
        decorator: &dyn PageDecorator,
        toc: &[TocEntry],
        total: Option<usize>,
        drawing: bool,
    ) -> Result<Pass> {
        let request = ctx.request;
        let options = self.options;
        let mut p = Paginator::new(&options.layout, decorator, &options.cancel, drawing)
            .with_total_pages(total);
        let mut outline = Vec::with_capacity(toc.len());

        pages::cover(&mut p, ctx)?;
        if options.include_contents {
            pages::contents(&mut p, toc)?;
        }

        for section in request.ordered_sections() {
            outline.push(next_entry(&p, &section.title, PageKind::Section));
            pages::section(&mut p, section)?;
        }

        if !request.pricing.is_empty() {
            outline.push(next_entry(&p, PRICING_TITLE, PageKind::Pricing));
            pages::pricing(&mut p, ctx)?;
        }

        if !request.signatures.is_empty() {
            outline.push(next_entry(&p, SIGNATURES_TITLE, PageKind::Signatures));
            pages::signatures(&mut p, ctx)?;
        }

        if options.include_audit {
            outline.push(next_entry(&p, AUDIT_TITLE, PageKind::Audit));
            pages::audit(&mut p, ctx)?;
        }

        let (pages, stats) = p.finish();
        Ok(Pass {
            pages,
            stats,
            outline,
        })
    }
}

/// Entries the contents page lists, before their pages are known.
fn planned_outline(request: &DocumentRenderRequest, options: &RenderOptions) -> Vec<TocEntry> {
    let mut entries: Vec<TocEntry> = request
        .ordered_sections()
        .into_iter()
        .map(|s| TocEntry::new(s.title.clone(), 0, PageKind::Section))
        .collect();
    if !request.pricing.is_empty() {
        entries.push(TocEntry::new(PRICING_TITLE, 0, PageKind::Pricing));
    }
    if !request.signatures.is_empty() {
        entries.push(TocEntry::new(SIGNATURES_TITLE, 0, PageKind::Signatures));
    }
    if options.include_audit {
        entries.push(TocEntry::new(AUDIT_TITLE, 0, PageKind::Audit));
    }
    entries
}

/// Entry for a part that starts on the next page.
fn next_entry(p: &Paginator<'_>, title: &str, kind: PageKind) -> TocEntry {
    TocEntry::new(title, p.page_number() + 1, kind)
}

fn normalize_field(value: &Option<String>) -> Option<String> {
    value.as_deref().map(normalize)
}

fn normalize_contact(contact: &Contact) -> Contact {
    Contact {
        name: normalize(&contact.name),
        email: normalize_field(&contact.email),
        phone: normalize_field(&contact.phone),
        address: normalize_field(&contact.address),
        logo: contact.logo.clone(),
    }
}

/// Copy of a request with every string reduced to Latin-1 and empty titles
/// replaced, so that measuring and drawing see the same text.
fn normalize_request(request: &DocumentRenderRequest) -> DocumentRenderRequest {
    let mut out = request.clone();

    let info = &mut out.document;
    info.title = normalize(&info.title).trim().to_string();
    if info.title.is_empty() {
        info.title = UNTITLED_DOCUMENT.to_string();
    }
    info.id = normalize_field(&info.id);
    info.document_type = normalize_field(&info.document_type);
    info.service_type = normalize_field(&info.service_type);

    for section in &mut out.sections {
        section.title = normalize(&section.title).trim().to_string();
        if section.title.is_empty() {
            section.title = normalize(&section.key);
        }
        if section.title.is_empty() {
            section.title = "Untitled section".to_string();
        }
        section.content = normalize(&section.content);
    }

    for item in &mut out.pricing {
        item.description = normalize(&item.description);
    }
    if let Some(totals) = &mut out.totals {
        totals.currency = normalize(&totals.currency);
    }

    for signature in &mut out.signatures {
        signature.name = normalize(&signature.name);
        signature.email = normalize_field(&signature.email);
        signature.role = normalize_field(&signature.role);
        signature.ip_address = normalize_field(&signature.ip_address);
        signature.location = normalize_field(&signature.location);
    }

    out.company = request.company.as_ref().map(normalize_contact);
    out.client = request.client.as_ref().map(normalize_contact);
    out
}
