//! Data model shared by every stage of the engine.
//!
//! Input side: the render request and its records. Intermediate: classified
//! blocks and runs. Output side: pages of draw commands.

mod block;
mod document;
mod page;
mod paragraph;
mod resource;
mod table;
mod theme;

pub use block::{Block, MAX_HEADING_LEVEL};
pub use document::{
    Contact, DocumentInfo, DocumentRenderRequest, DocumentStatus, PricingItem, PricingTotals,
    Section, Signature, SignatureCompletion, UnitKind,
};
pub use page::{
    Align, DrawCommand, FontFace, PageBuffer, PageKind, PaintContext, A4_HEIGHT_MM, A4_WIDTH_MM,
};
pub use paragraph::{plain_text, TextRun, TextStyle};
pub use resource::{ImageAsset, Resource};
pub use table::{Table, TableRow};
pub use theme::{Color, CoverStyle, Theme, ThemeRegistry};
