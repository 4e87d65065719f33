//! Render options and output formats for laid-out documents.

mod json;
mod options;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, RenderOptions};
pub use result::{LayoutStats, RenderedDocument, TocEntry};
pub use text::{to_text, to_text_with_metrics};
