//! Render options and configuration.

use crate::cancel::CancellationToken;
use crate::layout::LayoutOptions;
use crate::model::Theme;
use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page geometry and typography
    pub layout: LayoutOptions,

    /// Theme to use instead of the one named in the request
    pub theme: Option<Theme>,

    /// Timestamp used for "generated" lines and missing dates (default: now)
    pub generated_at: Option<DateTime<Utc>>,

    /// Cancellation flag checked whenever a page starts
    pub cancel: CancellationToken,

    /// Include the table of contents
    pub include_contents: bool,

    /// Include the audit / metadata page
    pub include_audit: bool,

    /// Pages kept in the output
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Override the request's theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Fix the generation timestamp.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Use a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_contents(mut self, include: bool) -> Self {
        self.include_contents = include;
        self
    }

    /// Enable or disable the audit page.
    pub fn with_audit(mut self, include: bool) -> Self {
        self.include_audit = include;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Generation timestamp, defaulting to now.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            theme: None,
            generated_at: None,
            cancel: CancellationToken::new(),
            include_contents: true,
            include_audit: true,
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Keep all pages
    #[default]
    All,
    /// Keep a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<usize>),
    /// Keep several ranges; sorted, disjoint and non-adjacent
    Ranges(Vec<RangeInclusive<usize>>),
}

impl PageSelection {
    /// Selection from arbitrary ranges, sorted and merged.
    pub fn from_ranges(ranges: impl IntoIterator<Item = RangeInclusive<usize>>) -> Self {
        let mut ranges: Vec<_> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        ranges.sort_by_key(|r| *r.start());

        let mut merged: Vec<RangeInclusive<usize>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }

        match merged.len() {
            1 => PageSelection::Range(merged.remove(0)),
            _ => PageSelection::Ranges(merged),
        }
    }

    /// Check if a page number should be included.
    pub fn includes(&self, page: usize) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Ranges(ranges) => {
                let idx = ranges.partition_point(|r| *r.end() < page);
                ranges.get(idx).is_some_and(|r| r.contains(&page))
            }
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    ///
    /// Pages are 1-indexed; `all` or an empty string selects everything.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        let ranges = s
            .split(',')
            .map(parse_span)
            .collect::<Result<Vec<_>, String>>()?;
        Ok(Self::from_ranges(ranges))
    }
}

/// One `N` or `N-M` item of a page list.
fn parse_span(part: &str) -> Result<RangeInclusive<usize>, String> {
    let page = |text: &str| -> Result<usize, String> {
        match text.trim().parse::<usize>() {
            Ok(0) => Err("Pages start at 1".to_string()),
            Ok(n) => Ok(n),
            Err(_) => Err(format!("Invalid page number '{}'", text.trim())),
        }
    };

    match part.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(format!("Invalid page range {}-{}", start, end));
            }
            Ok(start..=end)
        }
        None => page(part).map(|n| n..=n),
    }
}
