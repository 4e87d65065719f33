//! Classified content blocks.

use super::{paragraph::plain_text, Table, TextRun};
use serde::{Deserialize, Serialize};

/// Deepest heading level; deeper markup clamps to it.
pub const MAX_HEADING_LEVEL: u8 = 4;

/// A typed unit of layout derived from a section's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading (level 1..=4)
    Heading {
        /// Heading level
        level: u8,
        /// Heading text
        text: String,
    },

    /// A paragraph of styled runs
    Paragraph {
        /// Inline runs
        runs: Vec<TextRun>,
    },

    /// An unordered list item
    BulletItem {
        /// Inline runs
        runs: Vec<TextRun>,
    },

    /// An ordered list item
    NumberedItem {
        /// Item number as written in the source
        index: u32,
        /// Inline runs
        runs: Vec<TextRun>,
    },

    /// A quoted passage
    Blockquote {
        /// Quote text
        text: String,
    },

    /// A horizontal rule / separator
    Rule,

    /// A pipe-delimited table
    Table(Table),

    /// Vertical space from a blank source line
    Spacer,
}

impl Block {
    /// Create a heading, clamping the level into `1..=MAX_HEADING_LEVEL`.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, MAX_HEADING_LEVEL),
            text: text.into(),
        }
    }

    /// Create a paragraph from runs.
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Block::Paragraph { runs }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { text, .. } | Block::Blockquote { text } => text.clone(),
            Block::Paragraph { runs }
            | Block::BulletItem { runs }
            | Block::NumberedItem { runs, .. } => plain_text(runs),
            Block::Table(t) => t.plain_text(),
            Block::Rule | Block::Spacer => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_clamps_level() {
        assert_eq!(
            Block::heading(9, "Deep"),
            Block::Heading {
                level: 4,
                text: "Deep".to_string()
            }
        );
        assert!(Block::heading(0, "Zero").is_heading());
    }

    #[test]
    fn test_block_plain_text() {
        let block = Block::NumberedItem {
            index: 2,
            runs: vec![TextRun::new("Ship "), TextRun::bold("it")],
        };
        assert_eq!(block.plain_text(), "Ship it");
        assert_eq!(Block::Rule.plain_text(), "");
    }
}
