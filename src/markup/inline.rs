//! Inline emphasis markup (`**bold**`, `*italic*`, `` `code` ``).

use crate::model::{TextRun, TextStyle};
use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiter patterns in tie-break priority order, with their delimiter char.
static PATTERNS: Lazy<[(Regex, char, TextStyle); 3]> = Lazy::new(|| {
    [
        (Regex::new(r"\*\*(.+?)\*\*").unwrap(), '*', TextStyle::BOLD),
        (Regex::new(r"\*(.+?)\*").unwrap(), '*', TextStyle::ITALIC),
        (Regex::new(r"`(.+?)`").unwrap(), '`', TextStyle::CODE),
    ]
});

struct Match {
    start: usize,
    end: usize,
    content_start: usize,
    content_end: usize,
    style: TextStyle,
}

/// First match of a pattern at or after `pos` whose content is not made of
/// delimiters only (`****` stays literal).
fn find_styled(pattern: &(Regex, char, TextStyle), line: &str, mut pos: usize) -> Option<Match> {
    let (re, delimiter, style) = pattern;
    while pos < line.len() {
        let caps = re.captures_at(line, pos)?;
        let (whole, content) = (caps.get(0)?, caps.get(1)?);
        if content.as_str().chars().any(|c| c != *delimiter) {
            return Some(Match {
                start: whole.start(),
                end: whole.end(),
                content_start: content.start(),
                content_end: content.end(),
                style: *style,
            });
        }
        // Delimiters are ASCII, so one byte on is a char boundary.
        pos = whole.start() + 1;
    }
    None
}

/// Earliest styled span at or after `pos`; ties go to the earlier pattern.
fn next_match(line: &str, pos: usize) -> Option<Match> {
    let mut best: Option<Match> = None;
    for pattern in PATTERNS.iter() {
        let Some(found) = find_styled(pattern, line, pos) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| found.start < b.start) {
            best = Some(found);
        }
    }
    best
}

fn push_run(runs: &mut Vec<TextRun>, text: &str, style: TextStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.style == style && !style.has_styling() {
            last.text.push_str(text);
            return;
        }
    }
    runs.push(TextRun::styled(text, style));
}

/// Split one line into styled runs.
///
/// Malformed or unterminated markup is kept as literal plain text, so the
/// concatenated runs plus the consumed delimiters always reproduce `line`.
pub fn parse_runs(line: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        match next_match(line, pos) {
            Some(m) => {
                push_run(&mut runs, &line[pos..m.start], TextStyle::PLAIN);
                push_run(&mut runs, &line[m.content_start..m.content_end], m.style);
                pos = m.end;
            }
            None => {
                push_run(&mut runs, &line[pos..], TextStyle::PLAIN);
                break;
            }
        }
    }

    runs
}
