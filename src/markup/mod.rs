//! Section markup: normalization, inline styles and block classification.
//!
//! This stage is pure. It turns a raw content string into [`Block`]s and
//! never looks at pages or geometry.
//!
//! [`Block`]: crate::model::Block

mod classify;
mod inline;
mod normalize;

pub use classify::{classify, classify_text};
pub use inline::parse_runs;
pub use normalize::{normalize, normalize_opt};
