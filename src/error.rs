//! Error types for the quire engine.

use std::io;
use thiserror::Error;

/// Result type alias for quire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can reach a caller.
///
/// Layout itself never fails on content: malformed markup, missing assets and
/// absent optional data all degrade to placeholders. What remains are
/// configuration faults detected before the first page is drawn, explicit
/// cancellation, and I/O at the asset/serialization boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading request files or assets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested theme is not registered.
    #[error("Unknown theme: {0}")]
    InvalidTheme(String),

    /// A theme color could not be parsed.
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// The render was cancelled between pages.
    #[error("Render cancelled after {0} pages")]
    Cancelled(usize),

    /// An asset could not be loaded.
    #[error("Asset error: {0}")]
    Asset(String),

    /// Error while serializing rendered output.
    #[error("Rendering error: {0}")]
    Render(String),
}
