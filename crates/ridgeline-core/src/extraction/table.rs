//! Locate table blocks in linearized page text.
//!
//! pdftotext output loses the column structure of the vendor's tables, but
//! each table still starts at a recognizable label and ends before the next
//! section label. These helpers cut the text between those markers.

use regex::Regex;

use crate::parsing::values::parse_number;

/// Return the text from the first `start` match up to (not including) the
/// first `end` match after it, or to the end of `text`.
pub fn block_between<'a>(text: &'a str, start: &Regex, end: &Regex) -> Option<&'a str> {
    let m = start.find(text)?;
    let stop = end
        .find_at(text, m.end())
        .map(|e| e.start())
        .unwrap_or(text.len());
    Some(&text[m.start()..stop])
}

/// Like [`block_between`], but the block must contain `through` before it may
/// end, so a terminator appearing inside the table header is not taken as the
/// end of the table.
pub fn block_through<'a>(
    text: &'a str,
    start: &Regex,
    through: &Regex,
    end: &Regex,
) -> Option<&'a str> {
    let m = start.find(text)?;
    let t = through.find_at(text, m.end())?;
    let stop = end
        .find_at(text, t.end())
        .map(|e| e.start())
        .unwrap_or(text.len());
    Some(&text[m.start()..stop])
}

/// Parse a fixed-width row made only of numeric cells.
///
/// Returns `None` when any cell is not a number (header rows, captions) or
/// when the row has fewer than `min_cells` cells.
pub fn numeric_row(line: &str, min_cells: usize) -> Option<Vec<f64>> {
    let cells: Vec<&str> = line.split_whitespace().collect();
    if cells.len() < min_cells {
        return None;
    }
    cells.iter().map(|c| parse_number(c)).collect()
}

/// Find numeric rows in a table block, keyed by the integer in their first cell.
pub fn keyed_numeric_rows(block: &str, min_cells: usize) -> Vec<(u32, Vec<f64>)> {
    block
        .lines()
        .filter_map(|line| numeric_row(line, min_cells))
        .filter_map(|cells| {
            let key = *cells.first()?;
            if key.fract() != 0.0 || key < 0.0 {
                return None;
            }
            Some((key as u32, cells[1..].to_vec()))
        })
        .collect()
}
