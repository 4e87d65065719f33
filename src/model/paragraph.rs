//! Run-level text types.

use serde::{Deserialize, Serialize};

/// A run of text with one style-flag combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a run with an explicit style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::BOLD)
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::ITALIC)
    }

    /// Create an inline code run.
    pub fn code(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::CODE)
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Monospaced inline code
    pub code: bool,
}

impl TextStyle {
    /// No styling.
    pub const PLAIN: TextStyle = TextStyle {
        bold: false,
        italic: false,
        code: false,
    };

    /// Bold only.
    pub const BOLD: TextStyle = TextStyle {
        bold: true,
        italic: false,
        code: false,
    };

    /// Italic only.
    pub const ITALIC: TextStyle = TextStyle {
        bold: false,
        italic: true,
        code: false,
    };

    /// Code only.
    pub const CODE: TextStyle = TextStyle {
        bold: false,
        italic: false,
        code: true,
    };

    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.code
    }
}

/// Concatenate the text of a slice of runs.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let runs = vec![
            TextRun::new("Hello "),
            TextRun::bold("world"),
            TextRun::new("!"),
        ];

        assert_eq!(plain_text(&runs), "Hello world!");
    }

    #[test]
    fn test_text_style() {
        let style = TextStyle::default();
        assert!(!style.has_styling());
        assert_eq!(style, TextStyle::PLAIN);

        assert!(TextStyle::BOLD.has_styling());
        assert!(TextRun::code("x").style.code);
    }
}
