//! Table reconstruction from box-drawing glyphs.
//!
//! The hypertext rendering replaces tables with images; the plain-glyph
//! rendering draws them with `┌ │ └` frames. This module cuts the framed
//! blocks out of the plain text and turns each into an HTML table.

use super::html_escape;

/// Split plain-glyph text into framed blocks, `┌` line through `┘` line.
///
/// A block that never closes is dropped.
pub fn box_blocks(plain: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in plain.lines() {
        if let Some(block) = current.as_mut() {
            block.push(line);
            if line.contains('┘') {
                blocks.extend(current.take());
            }
        } else if line.trim_start().starts_with('┌') {
            if line.contains('┘') {
                blocks.push(vec![line]);
            } else {
                current = Some(vec![line]);
            }
        }
    }

    blocks
}

/// Build an HTML table from one framed block.
///
/// The block's second line is the header row; other `│` rows are data rows.
/// Separator lines (`├`, `╞`, ...) are skipped. A block without rows yields
/// an empty table.
pub fn build_table(block: &[&str]) -> String {
    let (header, rows) = table_cells(block);
    let mut html = String::from("<table class='add'>");

    if !header.is_empty() {
        push_row(&mut html, &header, "th");
    }
    for row in &rows {
        push_row(&mut html, row, "td");
    }

    html.push_str("</table>");
    html
}

fn push_row(html: &mut String, cells: &[String], tag: &str) {
    html.push_str("<tr>");
    for cell in cells {
        html.push_str(&format!("<{tag} class='add'>{}</{tag}>", html_escape(cell)));
    }
    html.push_str("</tr>");
}

/// Header cells and data rows of a framed block.
fn table_cells(block: &[&str]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = Vec::new();
    let mut rows = Vec::new();

    for (index, line) in block.iter().enumerate() {
        let line = line.trim();
        if !line.starts_with('│') {
            continue;
        }
        let cells: Vec<String> = line
            .split('│')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if index == 1 {
            header = cells;
        } else {
            rows.push(cells);
        }
    }

    (header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "┌──┬──┐\n│ A│ B│\n│ 1│ 2│\n└──┴──┘";

    #[test]
    fn test_header_and_data_rows() {
        let blocks = box_blocks(SIMPLE);
        assert_eq!(blocks.len(), 1);

        let (header, rows) = table_cells(&blocks[0]);
        assert_eq!(header, vec!["A", "B"]);
        assert_eq!(rows, vec![vec!["1", "2"]]);

        assert_eq!(
            build_table(&blocks[0]),
            "<table class='add'><tr><th class='add'>A</th><th class='add'>B</th></tr>\
             <tr><td class='add'>1</td><td class='add'>2</td></tr></table>"
        );
    }

    #[test]
    fn test_separator_lines_are_skipped() {
        let block = [
            "       ┌─────┬─────┐",
            "       │ Key │ Use │",
            "       ├─────┼─────┤",
            "       │ -a  │ all │",
            "       └─────┴─────┘",
        ];
        let (header, rows) = table_cells(&block);
        assert_eq!(header, vec!["Key", "Use"]);
        assert_eq!(rows, vec![vec!["-a", "all"]]);
        assert_eq!(build_table(&block).matches("<tr>").count(), 2);
    }

    #[test]
    fn test_block_without_rows_is_empty_shell() {
        let block = ["┌──┐", "└──┘"];
        assert_eq!(build_table(&block), "<table class='add'></table>");
    }

    #[test]
    fn test_cells_are_escaped() {
        let block = ["┌─────┐", "│ a<b │", "└─────┘"];
        assert!(build_table(&block).contains("a&lt;b"));
    }

    #[test]
    fn test_box_blocks_ignores_surrounding_text() {
        let plain = "NAME\n  tool - does things\n\n       ┌──┐\n       │ A│\n       └──┘\ntext\n       ┌──┐\n       │ B│\n       └──┘\n";
        let blocks = box_blocks(plain);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1][1].trim(), "│ B│");
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let plain = "┌──┐\n│ A│\n";
        assert!(box_blocks(plain).is_empty());
    }
}
