//! Rendered document with outline and statistics.

use crate::model::{PageBuffer, PageKind};
use serde::{Deserialize, Serialize};

/// Output of a render: pages plus the navigation outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Document title
    pub title: String,

    /// Name of the theme used
    pub theme: String,

    /// Pages in order
    pub pages: Vec<PageBuffer>,

    /// Table of contents entries with their start pages
    pub outline: Vec<TocEntry>,

    /// Layout statistics
    pub stats: LayoutStats,
}

impl RenderedDocument {
    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by its 1-based number.
    pub fn page(&self, number: usize) -> Option<&PageBuffer> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Pages of one kind.
    pub fn pages_of(&self, kind: PageKind) -> impl Iterator<Item = &PageBuffer> {
        self.pages.iter().filter(move |p| p.kind == kind)
    }
}

/// One table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Entry title
    pub title: String,

    /// 1-based page the entry starts on
    pub page: usize,

    /// Kind of the entry's first page
    pub kind: PageKind,
}

impl TocEntry {
    /// Create an entry.
    pub fn new(title: impl Into<String>, page: usize, kind: PageKind) -> Self {
        Self {
            title: title.into(),
            page,
            kind,
        }
    }
}

/// Statistics collected during layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Total number of pages
    pub page_count: u32,

    /// Pages started because content overflowed
    pub page_breaks: u32,

    /// Number of headings drawn
    pub heading_count: u32,

    /// Number of paragraphs drawn
    pub paragraph_count: u32,

    /// Number of list items drawn
    pub list_item_count: u32,

    /// Number of tables drawn
    pub table_count: u32,

    /// Number of horizontal rules drawn
    pub horizontal_rule_count: u32,

    /// Number of images placed
    pub image_count: u32,

    /// Images replaced by a placeholder
    pub placeholder_count: u32,

    /// Table cells cut to fit their column
    pub truncated_cells: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl LayoutStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Increment overflow break count.
    pub fn add_page_break(&mut self) {
        self.page_breaks += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment list item count.
    pub fn add_list_item(&mut self) {
        self.list_item_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment horizontal rule count.
    pub fn add_horizontal_rule(&mut self) {
        self.horizontal_rule_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment placeholder count.
    pub fn add_placeholder(&mut self) {
        self.placeholder_count += 1;
    }

    /// Increment truncated cell count.
    pub fn add_truncated_cell(&mut self) {
        self.truncated_cells += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;
        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_stats_count_text() {
        let mut stats = LayoutStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_page_lookup() {
        let doc = RenderedDocument {
            title: "T".to_string(),
            theme: "classic".to_string(),
            pages: vec![
                PageBuffer::a4(1, PageKind::Cover),
                PageBuffer::a4(2, PageKind::Section),
            ],
            outline: vec![TocEntry::new("Intro", 2, PageKind::Section)],
            stats: LayoutStats::default(),
        };
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(2).map(|p| p.kind), Some(PageKind::Section));
        assert!(doc.page(0).is_none());
        assert_eq!(doc.pages_of(PageKind::Cover).count(), 1);
    }
}
