//! Pitch tables: roof pitch, area and share of roof per column.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::PitchBreakdown;
use crate::parsing::values::parse_number;

/// Where a pitch table is being looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchScope {
    /// Whole document: the table must follow an "Areas per Pitch" label.
    Document,
    /// One structure's span: the table stands on its own.
    Structure,
}

static DOCUMENT_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Areas?\s+per\s+Pitch.*?Roof\s+Pitches?\s+([\d/\s]+)\s*Area\s*\(sq\s*ft\)\s*([\d.,\s]+)\s*%\s*of\s*Roof\s*([\d.%\s]+)",
    )
    .expect("pitch table pattern is a valid regex")
});

static STRUCTURE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Roof\s+Pitches?\s+([\d/\s]+)\s*Area\s*\(sq\s*ft\)\s*([\d.,\s]+)\s*%\s*of\s*Roof\s*([\d.%\s]+)",
    )
    .expect("pitch table pattern is a valid regex")
});

static PITCH_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+/\d+").expect("valid regex"));
static AREA_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.?\d*").expect("valid regex"));
static PERCENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.]+").expect("valid regex"));

/// Parse the "area per pitch" table found in `text`.
///
/// Returns an empty list when no table is present.
pub fn parse_pitch_table(text: &str, scope: PitchScope) -> Vec<PitchBreakdown> {
    let re = match scope {
        PitchScope::Document => &*DOCUMENT_TABLE,
        PitchScope::Structure => &*STRUCTURE_TABLE,
    };
    let Some(caps) = re.captures(text) else {
        return Vec::new();
    };
    let row = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
    parse_rows(row(1), row(2), row(3))
}

/// Zip the three table rows into breakdown entries.
///
/// The result is truncated to the shortest row. An entry whose area or
/// percent does not convert is skipped on its own.
pub fn parse_rows(pitch_row: &str, area_row: &str, percent_row: &str) -> Vec<PitchBreakdown> {
    let pitches = PITCH_TOKEN.find_iter(pitch_row).map(|m| m.as_str());
    let areas = AREA_TOKEN.find_iter(area_row).map(|m| m.as_str());
    let percents = PERCENT_TOKEN.find_iter(percent_row).map(|m| m.as_str());

    pitches
        .zip(areas)
        .zip(percents)
        .filter_map(|((pitch, area), percent)| {
            Some(PitchBreakdown {
                pitch: pitch.to_string(),
                area_sqft: parse_number(area)?,
                percent_of_roof: parse_number(percent)?,
            })
        })
        .collect()
}

/// Rise component of a "rise/run" pitch, e.g. 14 for "14/12".
pub fn pitch_numerator(pitch: &str) -> Option<u32> {
    pitch.split('/').next()?.trim().parse().ok()
}

/// Number of distinct pitch ratios in a breakdown.
pub fn distinct_pitches(pitches: &[PitchBreakdown]) -> usize {
    let mut seen: Vec<&str> = pitches.iter().map(|p| p.pitch.as_str()).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
