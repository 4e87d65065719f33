//! Line classification of section markup into [`Block`]s.

use super::inline::parse_runs;
use crate::model::{plain_text, Block, Table, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s+(.*)$").unwrap());
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[.)]\s+(.*)$").unwrap());
static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|[\s\-:|]+\|$").unwrap());

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Block(Block),
    Blank,
    TableRow(TableRow),
    TableSeparator,
}

fn is_table_line(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// Inline markup reduced to its text, for blocks that carry plain strings.
fn strip_inline(text: &str) -> String {
    plain_text(&parse_runs(text))
}

fn classify_line(raw: &str) -> LineKind {
    let line = raw.trim();

    if line.is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = HEADING.captures(line) {
        let level = caps[1].len().min(u8::MAX as usize) as u8;
        return LineKind::Block(Block::heading(level, strip_inline(caps[2].trim())));
    }

    if RULE.is_match(line) {
        return LineKind::Block(Block::Rule);
    }

    if let Some(quote) = line.strip_prefix("> ") {
        return LineKind::Block(Block::Blockquote {
            text: strip_inline(quote.trim()),
        });
    }

    if let Some(caps) = BULLET.captures(line) {
        return LineKind::Block(Block::BulletItem {
            runs: parse_runs(&caps[1]),
        });
    }

    if let Some(caps) = NUMBERED.captures(line) {
        // Absurdly long digit runs still render; the index just saturates.
        let index = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        return LineKind::Block(Block::NumberedItem {
            index,
            runs: parse_runs(&caps[2]),
        });
    }

    if is_table_line(line) {
        if TABLE_SEPARATOR.is_match(line) {
            return LineKind::TableSeparator;
        }
        return LineKind::TableRow(TableRow::parse(line));
    }

    LineKind::Block(Block::paragraph(parse_runs(line)))
}

/// Classify section lines into blocks.
///
/// Consecutive table rows form one table with separator rows removed;
/// consecutive blank lines collapse into one spacer, and spacers at the
/// start or end of the content are dropped.
pub fn classify(lines: &[&str]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut table: Option<Table> = None;

    for raw in lines {
        let block = match classify_line(raw) {
            LineKind::TableRow(row) => {
                table.get_or_insert_with(Table::new).add_row(row);
                continue;
            }
            // Only meaningful inside a table; a lone separator is dropped.
            LineKind::TableSeparator => continue,
            LineKind::Blank => None,
            LineKind::Block(block) => Some(block),
        };

        if let Some(t) = table.take() {
            blocks.push(Block::Table(t));
        }

        match block {
            Some(block) => blocks.push(block),
            None => {
                if !matches!(blocks.last(), None | Some(Block::Spacer)) {
                    blocks.push(Block::Spacer);
                }
            }
        }
    }

    if let Some(t) = table.take() {
        blocks.push(Block::Table(t));
    }

    while matches!(blocks.last(), Some(Block::Spacer)) {
        blocks.pop();
    }

    blocks
}

/// Classify a whole content string.
pub fn classify_text(content: &str) -> Vec<Block> {
    let lines: Vec<&str> = content.lines().collect();
    classify(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextRun, TextStyle};

    #[test]
    fn test_headings_and_clamp() {
        let blocks = classify(&["# One", "#### Four", "###### Six"]);
        assert_eq!(
            blocks,
            vec![
                Block::heading(1, "One"),
                Block::heading(4, "Four"),
                Block::heading(4, "Six"),
            ]
        );
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        let blocks = classify(&["#hashtag"]);
        assert_eq!(blocks, vec![Block::paragraph(vec![TextRun::new("#hashtag")])]);
    }

    #[test]
    fn test_rule_before_bullet_and_italic() {
        assert_eq!(classify(&["---"]), vec![Block::Rule]);
        assert_eq!(classify(&["***"]), vec![Block::Rule]);
        assert_eq!(classify(&["___"]), vec![Block::Rule]);
    }

    #[test]
    fn test_lists_and_quote() {
        let blocks = classify(&["- first", "* second", "2) third", "> wise **words**"]);
        assert_eq!(blocks[0], Block::BulletItem { runs: vec![TextRun::new("first")] });
        assert_eq!(blocks[1], Block::BulletItem { runs: vec![TextRun::new("second")] });
        assert_eq!(
            blocks[2],
            Block::NumberedItem {
                index: 2,
                runs: vec![TextRun::new("third")]
            }
        );
        assert_eq!(
            blocks[3],
            Block::Blockquote {
                text: "wise words".to_string()
            }
        );
    }

    #[test]
    fn test_bold_bullet_keeps_runs() {
        let blocks = classify(&["- **Key**: value"]);
        let Block::BulletItem { runs } = &blocks[0] else {
            panic!("expected bullet");
        };
        assert_eq!(runs[0].style, TextStyle::BOLD);
        assert_eq!(runs[1].text, ": value");
    }

    #[test]
    fn test_table_collects_rows_and_skips_separator() {
        let blocks = classify(&["| A | B |", "|---|:-:|", "| 1 | 2 |", "after"]);
        assert_eq!(blocks.len(), 2);
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells, vec!["1", "2"]);
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
    }

    #[test]
    fn test_lone_separator_dropped() {
        assert!(classify(&["|---|---|"]).is_empty());
    }

    #[test]
    fn test_blank_lines_collapse_and_trim() {
        let blocks = classify(&["", "a", "", "", "b", ""]);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1], Block::Spacer);
    }

    #[test]
    fn test_classify_text_per_line_paragraphs() {
        let blocks = classify_text("line one\nline two");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| matches!(b, Block::Paragraph { .. })));
    }
}
