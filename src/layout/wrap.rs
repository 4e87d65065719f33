//! Greedy word wrap across styled runs.

use super::GlyphMetrics;
use crate::model::{PaintContext, TextRun, TextStyle};

const EPSILON: f64 = 1e-9;

/// A piece of a wrapped line in one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Text of the piece
    pub text: String,
    /// Run style
    pub style: TextStyle,
}

/// One output line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrappedLine {
    /// Styled pieces left to right
    pub segments: Vec<Segment>,
    /// Measured width in mm
    pub width: f64,
}

impl WrappedLine {
    /// Check if the line has no text.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Line text without styling.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn push_piece(&mut self, text: &str, style: TextStyle, width: f64) {
        match self.segments.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                style,
            }),
        }
        self.width += width;
    }
}

/// A whitespace-free token; may span several runs (`**bold**ly`).
#[derive(Debug, Default)]
struct Word {
    pieces: Vec<(String, TextStyle)>,
}

impl Word {
    fn push_char(&mut self, ch: char, style: TextStyle) {
        match self.pieces.last_mut() {
            Some((text, s)) if *s == style => text.push(ch),
            _ => self.pieces.push((ch.to_string(), style)),
        }
    }

    fn push_str(&mut self, text: String, style: TextStyle) {
        if !text.is_empty() {
            self.pieces.push((text, style));
        }
    }

    fn width(&self, base: &PaintContext, metrics: &GlyphMetrics) -> f64 {
        self.pieces
            .iter()
            .map(|(text, style)| metrics.measure(text, &base.with_style(*style)))
            .sum()
    }
}

fn split_words(runs: &[TextRun]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();

    for run in runs {
        for ch in run.text.chars() {
            if ch.is_whitespace() {
                if !current.pieces.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                current.push_char(ch, run.style);
            }
        }
    }
    if !current.pieces.is_empty() {
        words.push(current);
    }

    words
}

/// Cut a word that is wider than the column, ending it with `...`.
fn truncate_word(word: Word, base: &PaintContext, max_width: f64, metrics: &GlyphMetrics) -> Word {
    let mut out = Word::default();
    let mut used = 0.0;

    for (text, style) in word.pieces {
        let glyph = metrics.glyph_width(&base.with_style(style));
        let ellipsis = 3.0 * glyph;
        let mut kept = String::new();

        for ch in text.chars() {
            if used + glyph + ellipsis > max_width + EPSILON {
                out.push_str(kept, style);
                if used + ellipsis <= max_width + EPSILON {
                    out.push_str("...".to_string(), style);
                }
                return out;
            }
            kept.push(ch);
            used += glyph;
        }
        out.push_str(kept, style);
    }

    out
}

/// Wrap styled runs into lines no wider than `max_width`.
///
/// Breaks only at whitespace. Runs keep their style across line breaks; the
/// space between two words takes the style of the preceding word.
pub fn wrap_runs(
    runs: &[TextRun],
    base: &PaintContext,
    max_width: f64,
    metrics: &GlyphMetrics,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut line = WrappedLine::default();

    for mut word in split_words(runs) {
        let mut width = word.width(base, metrics);
        if width > max_width + EPSILON {
            log::debug!("Truncating word wider than {:.1}mm", max_width);
            word = truncate_word(word, base, max_width, metrics);
            width = word.width(base, metrics);
        }

        if let Some(last) = line.segments.last() {
            let space_paint = base.with_style(last.style);
            let space = metrics.measure(" ", &space_paint);
            if line.width + space + width <= max_width + EPSILON {
                let style = last.style;
                line.push_piece(" ", style, space);
            } else {
                lines.push(std::mem::take(&mut line));
            }
        }

        for (text, style) in &word.pieces {
            let w = metrics.measure(text, &base.with_style(*style));
            line.push_piece(text, *style, w);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// Wrap single-style text into line strings.
pub fn wrap_text(
    text: &str,
    paint: &PaintContext,
    max_width: f64,
    metrics: &GlyphMetrics,
) -> Vec<String> {
    wrap_runs(&[TextRun::new(text)], paint, max_width, metrics)
        .iter()
        .map(WrappedLine::text)
        .collect()
}

/// Cut single-style text to one line no wider than `max_width`, ending
/// it with `...` when anything was dropped.
pub fn fit_text(
    text: &str,
    paint: &PaintContext,
    max_width: f64,
    metrics: &GlyphMetrics,
) -> String {
    if metrics.measure(text, paint) <= max_width + EPSILON {
        return text.to_string();
    }
    let glyph = metrics.glyph_width(paint);
    let budget = ((max_width + EPSILON) / glyph).floor() as usize;
    if budget < 3 {
        return text.chars().take(budget).collect();
    }
    let kept: String = text.chars().take(budget - 3).collect();
    format!("{}...", kept.trim_end())
}
