use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Paragraphs and tables detected in a block of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewContent {
    pub text_boxes: Vec<TextBox>,
    pub tables: Vec<Vec<Vec<Cell>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBox {
    pub content: String,
    pub formatting: Formatting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub content: String,
    pub formatting: Formatting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_header: bool,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

static PARAGRAPH_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Dashed borders, or runs of newline-terminated `| ... |` rows
static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[|+][-+]*[|+]|(?:\s*\|[^|\n]+\|\s*\n)+").unwrap());

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(.*?)_").unwrap());
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s").unwrap());

/// Split `content` into text boxes and tables
pub fn parse_content(content: &str) -> PreviewContent {
    PreviewContent {
        text_boxes: split_text_boxes(content),
        tables: extract_tables(content),
    }
}

fn split_text_boxes(content: &str) -> Vec<TextBox> {
    PARAGRAPH_BREAK_RE
        .split(content)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| TextBox {
            content: segment.trim().to_string(),
            formatting: detect_formatting(segment),
        })
        .collect()
}

fn extract_tables(content: &str) -> Vec<Vec<Vec<Cell>>> {
    TABLE_RE
        .find_iter(content)
        .map(|m| parse_table(m.as_str()))
        .collect()
}

fn parse_table(region: &str) -> Vec<Vec<Cell>> {
    region
        .split('\n')
        .filter(|row| !row.trim().is_empty())
        .map(|row| {
            row.split('|')
                .filter(|cell| !cell.trim().is_empty())
                .map(|cell| Cell {
                    content: cell.trim().to_string(),
                    formatting: detect_formatting(cell),
                })
                .collect()
        })
        .collect()
}

fn detect_formatting(text: &str) -> Formatting {
    Formatting {
        is_bold: BOLD_RE.is_match(text),
        is_italic: ITALIC_RE.is_match(text),
        is_header: HEADER_RE.is_match(text),
        alignment: detect_alignment(text),
    }
}

fn detect_alignment(text: &str) -> Alignment {
    let text = text.trim();

    if text.starts_with(':') && text.ends_with(':') {
        Alignment::Center
    } else if text.ends_with(':') {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(content: &str) -> TextBox {
        TextBox {
            content: content.to_string(),
            formatting: Formatting::default(),
        }
    }

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let preview = parse_content("Para one.\n\nPara two.");

        assert_eq!(preview.text_boxes, vec![plain("Para one."), plain("Para two.")]);
        assert!(preview.tables.is_empty());
    }

    #[test]
    fn whitespace_only_lines_separate_paragraphs() {
        let preview = parse_content("  first  \n   \t \nsecond\n\n\n\n");

        assert_eq!(preview.text_boxes, vec![plain("first"), plain("second")]);
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert_eq!(parse_content(""), PreviewContent::default());
        assert_eq!(parse_content("\n\n  \n"), PreviewContent::default());
    }

    #[test]
    fn detects_formatting_flags() {
        let preview = parse_content("# IN THE HIGH COURT\n\n**Petitioner** v. _Respondent_");

        let header = preview.text_boxes[0].formatting;
        assert!(header.is_header);
        assert!(!header.is_bold);

        let parties = preview.text_boxes[1].formatting;
        assert!(parties.is_bold);
        assert!(parties.is_italic);
        assert!(!parties.is_header);
    }

    #[test]
    fn header_marker_needs_trailing_space() {
        let preview = parse_content("#hashtag");

        assert!(!preview.text_boxes[0].formatting.is_header);
    }

    #[test]
    fn classifies_alignment() {
        assert_eq!(detect_alignment(":ORDER:"), Alignment::Center);
        assert_eq!(detect_alignment("  Prayer:  "), Alignment::Right);
        assert_eq!(detect_alignment(":note"), Alignment::Left);
        assert_eq!(detect_alignment("Plain"), Alignment::Left);
    }

    #[test]
    fn groups_single_column_rows_into_one_table() {
        let preview = parse_content("| Item |\n| **Desk** |\n");

        assert_eq!(preview.tables.len(), 1);
        let rows = &preview.tables[0];
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].content, "Item");
        assert_eq!(rows[1][0].content, "**Desk**");
        assert!(rows[1][0].formatting.is_bold);
    }

    #[test]
    fn multi_column_rows_keep_only_trailing_cell() {
        // Inner pipes end the row pattern early
        let preview = parse_content("| Item | Qty |\n");

        assert_eq!(preview.tables.len(), 1);
        assert_eq!(preview.tables[0].len(), 1);
        assert_eq!(preview.tables[0][0].len(), 1);
        assert_eq!(preview.tables[0][0][0].content, "Qty");
    }

    #[test]
    fn border_rows_are_separate_regions() {
        let preview = parse_content("+---+\n");

        // A dashed border is matched on its own and holds no cells
        assert_eq!(preview.tables.len(), 1);
        assert_eq!(preview.tables[0], vec![vec![Cell {
            content: "+---+".to_string(),
            formatting: Formatting::default(),
        }]]);
    }

    #[test]
    fn table_without_trailing_newline_is_missed() {
        // Rows only count once a newline closes them
        let preview = parse_content("| a | b |");

        assert!(preview.tables.is_empty());
        assert_eq!(preview.text_boxes.len(), 1);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(parse_content(":Title:")).unwrap();

        assert_eq!(json["textBoxes"][0]["formatting"]["alignment"], "center");
        assert_eq!(json["textBoxes"][0]["formatting"]["isBold"], false);
        assert!(json["tables"].as_array().unwrap().is_empty());
    }
}
