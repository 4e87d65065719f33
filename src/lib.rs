//! # quire
//!
//! Typesetting and pagination engine for business documents.
//!
//! This library takes a structured render request (titled sections of
//! lightly marked-up text, pricing items, signers, company and client
//! details) and lays it out into fixed-size pages of draw commands: A4,
//! 20 mm margins, coordinates in millimeters from the top-left corner.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quire::{render, DocumentRenderRequest, Section};
//!
//! fn main() -> quire::Result<()> {
//!     let mut request = DocumentRenderRequest::new("Website Proposal");
//!     request.add_section(Section::new("intro", "Introduction", "Dear **Client**, ..."));
//!
//!     let doc = render(&request)?;
//!     println!("{} pages", doc.page_count());
//!     println!("{}", quire::render::to_text(&doc));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Light markup**: headings, lists, quotes, rules, pipe tables, inline
//!   bold/italic/code
//! - **Pagination**: page breaks with repeating headers, footers and
//!   `(continued)` titles
//! - **Exact table of contents**: a dry run fixes every page number before
//!   drawing
//! - **Themes**: color banner or minimal rule styling, monochrome output
//! - **Degrades instead of failing**: missing images, empty sections and
//!   unrepresentable characters become placeholders or substitutes

pub mod assets;
pub mod cancel;
pub mod compose;
pub mod error;
pub mod layout;
pub mod markup;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use assets::AssetLoader;
pub use cancel::CancellationToken;
pub use compose::{format_currency, format_date, Composer, RenderPhase};
pub use error::{Error, Result};
pub use layout::{GlyphMetrics, LayoutOptions, PageDecorator, Paginator};
pub use markup::{classify, classify_text, normalize, parse_runs};
pub use model::{
    Align, Block, Color, Contact, CoverStyle, DocumentInfo, DocumentRenderRequest, DocumentStatus,
    DrawCommand, FontFace, ImageAsset, PageBuffer, PageKind, PaintContext, PricingItem,
    PricingTotals, Resource, Section, Signature, SignatureCompletion, Table, TableRow, TextRun,
    TextStyle, Theme, ThemeRegistry, UnitKind,
};
pub use render::{
    JsonFormat, LayoutStats, PageSelection, RenderOptions, RenderedDocument, TocEntry,
};

use std::path::Path;

/// Render a request with the built-in themes and default options.
///
/// # Example
///
/// ```no_run
/// use quire::{render, DocumentRenderRequest};
///
/// let doc = render(&DocumentRenderRequest::new("Quote")).unwrap();
/// assert_eq!(doc.page(1).unwrap().kind, quire::PageKind::Cover);
/// ```
pub fn render(request: &DocumentRenderRequest) -> Result<RenderedDocument> {
    render_with_options(request, &RenderOptions::default())
}

/// Render a request with custom options.
///
/// # Example
///
/// ```no_run
/// use quire::{render_with_options, DocumentRenderRequest, RenderOptions};
///
/// let options = RenderOptions::new().with_audit(false);
/// let doc = render_with_options(&DocumentRenderRequest::new("Quote"), &options).unwrap();
/// ```
pub fn render_with_options(
    request: &DocumentRenderRequest,
    options: &RenderOptions,
) -> Result<RenderedDocument> {
    let registry = ThemeRegistry::builtin();
    Composer::new(&registry, options).compose(request)
}

/// Render a request given as JSON.
pub fn render_json(json: &str) -> Result<RenderedDocument> {
    let request = DocumentRenderRequest::from_json(json)?;
    render(&request)
}

/// Read a request file, load its linked assets and render it.
///
/// # Example
///
/// ```no_run
/// let doc = quire::render_file("proposal.json").unwrap();
/// println!("{}", quire::render::to_text(&doc));
/// ```
pub fn render_file<P: AsRef<Path>>(path: P) -> Result<RenderedDocument> {
    Quire::new().render_file(path)
}

/// Builder for rendering documents.
///
/// # Example
///
/// ```no_run
/// use quire::{DocumentRenderRequest, Quire};
///
/// let doc = Quire::new()
///     .with_theme_name("minimal")?
///     .without_audit()
///     .render(&DocumentRenderRequest::new("Service Agreement"))?;
/// # Ok::<(), quire::Error>(())
/// ```
pub struct Quire {
    registry: ThemeRegistry,
    options: RenderOptions,
}

impl Quire {
    /// Create a builder with the built-in themes.
    pub fn new() -> Self {
        Self {
            registry: ThemeRegistry::builtin(),
            options: RenderOptions::default(),
        }
    }

    /// Register an additional theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.registry.register(theme);
        self
    }

    /// Use a registered theme regardless of the request's choice.
    pub fn with_theme_name(mut self, name: &str) -> Result<Self> {
        let theme = self.registry.resolve(name)?.clone();
        self.options = self.options.with_theme(theme);
        Ok(self)
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Leave out the table of contents.
    pub fn without_contents(mut self) -> Self {
        self.options = self.options.with_contents(false);
        self
    }

    /// Leave out the audit page.
    pub fn without_audit(mut self) -> Self {
        self.options = self.options.with_audit(false);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Use a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.options = self.options.with_cancellation(token);
        self
    }

    /// Registered theme names.
    pub fn theme_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// The render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a request.
    pub fn render(&self, request: &DocumentRenderRequest) -> Result<RenderedDocument> {
        Composer::new(&self.registry, &self.options).compose(request)
    }

    /// Read a request file, load its linked assets and render it.
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<RenderedDocument> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut request = DocumentRenderRequest::from_json(&json)?;
        AssetLoader::for_request_file(path).resolve_request(&mut request);
        self.render(&request)
    }
}

impl Default for Quire {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quire_builder() {
        let quire = Quire::new().without_contents().without_audit();
        assert!(!quire.options().include_contents);
        assert!(!quire.options().include_audit);
        assert!(quire.options().theme.is_none());
    }

    #[test]
    fn test_quire_builder_theme_name() {
        let quire = Quire::new().with_theme_name("Minimal").unwrap();
        assert_eq!(quire.options().theme.as_ref().map(|t| t.name.as_str()), Some("minimal"));

        assert!(matches!(
            Quire::new().with_theme_name("neon"),
            Err(Error::InvalidTheme(_))
        ));
    }

    #[test]
    fn test_quire_builder_custom_theme() {
        let theme = Theme::new("brand", Color::rgb(0x80, 0x00, 0x20), Color::rgb(0xD4, 0xAF, 0x37));
        let quire = Quire::new().with_theme(theme);
        assert!(quire.theme_names().contains(&"brand"));

        let mut request = DocumentRenderRequest::new("Quote");
        request.theme = "brand".to_string();
        let doc = quire.render(&request).unwrap();
        assert_eq!(doc.theme, "brand");
    }

    #[test]
    fn test_render_json() {
        let json = r#"{
            "document": {"title": "Quote"},
            "sections": [{"key": "intro", "title": "Intro", "content": "Hello"}]
        }"#;
        let doc = render_json(json).unwrap();
        assert_eq!(doc.title, "Quote");
        assert_eq!(doc.outline[0].title, "Intro");
    }

    #[test]
    fn test_render_json_invalid() {
        assert!(matches!(render_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_render_file_missing() {
        let result = render_file("/nonexistent/request.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
