//! Layout: measuring, wrapping and placing blocks onto pages.
//!
//! The stage is stateless between calls. A [`Paginator`] owns the cursor and
//! the pages of one pass; block routines ask it for room with
//! [`Paginator::check_page_break`] before drawing.

mod canvas;
mod cursor;
mod flow;
mod metrics;
mod options;
mod paginate;
mod table;
mod wrap;

pub use canvas::{Canvas, Layer};
pub use cursor::PageCursor;
pub use flow::{render_block, render_blocks};
pub use metrics::{GlyphMetrics, PT_TO_MM};
pub use options::LayoutOptions;
pub use paginate::{PageChrome, PageDecorator, PaginationState, Paginator, Palette};
pub use table::{column_widths, layout_table, truncate_cell, weighted_widths};
pub use wrap::{fit_text, wrap_runs, wrap_text, Segment, WrappedLine};
