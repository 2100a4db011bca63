//! Waste table extraction and suggested-column disambiguation.
//!
//! A waste table lists one column per waste percentage (percent, area,
//! squares) and prints "Suggested" under the column the vendor recommends.
//! Once the page is linearized that alignment is lost, so the suggested
//! column is recovered by an ordered list of [`Strategy`] values: the first
//! one that names a percent present in the table wins.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::extraction::table::block_through;
use crate::extraction::Word;
use crate::model::{PitchBreakdown, WasteCalculation};
use crate::parsing::pitch::distinct_pitches;
use crate::parsing::values::{parse_count, parse_number};

/// Heuristic column for steep roofs (any pitch of 12/12 or more).
const LATE_COLUMN: usize = 6;
/// Heuristic column for roofs with two pitches, or several with one of 10/12+.
const MID_LATE_COLUMN: usize = 5;
/// Heuristic column for everything else.
const LOW_MIDDLE_COLUMN: usize = 3;

/// Largest vertical distance between "Suggested" and its percent header.
const MAX_RISE: f32 = 150.0;
/// Horizontal distance below which a percent header shares the label's column.
const MAX_COLUMN_OFFSET: f32 = 60.0;

static WASTE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Waste\s*%\s*([\d%\s]+)\s*Area\s*\(Sq\s*ft\)\s*([\d,.\s]+)\s*Squares\s*\*?\s*([\d.\s]+)",
    )
    .expect("waste table pattern is a valid regex")
});

static TABLE_START: LazyLock<Regex> = LazyLock::new(|| ci(r"Waste\s*%"));
static TABLE_THROUGH: LazyLock<Regex> = LazyLock::new(|| ci(r"Squares"));
static TABLE_END: LazyLock<Regex> = LazyLock::new(|| {
    ci(r"Roof\s+Pitches|Structure\s+\d+|All\s+Structures|REPORT|PAGE")
});
static SUGGESTED_LABEL: LazyLock<Regex> = LazyLock::new(|| ci(r"Suggested"));
static PERCENT_MENTION: LazyLock<Regex> = LazyLock::new(|| ci(r"(\d+)\s*%"));
static PERCENT_WORD: LazyLock<Regex> = LazyLock::new(|| ci(r"^(\d{1,2})%$"));

static DIGITS: LazyLock<Regex> = LazyLock::new(|| ci(r"\d+"));
static AREA_TOKEN: LazyLock<Regex> = LazyLock::new(|| ci(r"[\d,]+(?:\.\d+)?"));
static SQUARES_TOKEN: LazyLock<Regex> = LazyLock::new(|| ci(r"[\d.]+"));

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("waste pattern is a valid regex")
}

/// One way of deciding which percent column the vendor suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Percent header positioned directly above the "Suggested" word on the page.
    Geometry,
    /// Percent mention closest to "Suggested" in the linearized table text.
    TextAdjacency,
    /// Column chosen from the roof's pitch complexity.
    Heuristic,
}

impl Strategy {
    /// Evaluation order; the first confident result wins.
    pub const ALL: [Strategy; 3] = [
        Strategy::Geometry,
        Strategy::TextAdjacency,
        Strategy::Heuristic,
    ];

    pub fn resolve(self, ctx: &WasteContext<'_>) -> Option<u32> {
        match self {
            Strategy::Geometry => ctx.words.and_then(suggested_by_geometry),
            Strategy::TextAdjacency => suggested_by_adjacency(ctx.table_text),
            Strategy::Heuristic => {
                heuristic_index(ctx.percents, ctx.pitches).map(|i| ctx.percents[i])
            }
        }
    }
}

/// Everything the strategies may look at for one table.
#[derive(Debug, Clone, Copy)]
pub struct WasteContext<'a> {
    /// Table text from "Waste %" to the next section label.
    pub table_text: &'a str,
    /// Words of the page holding the table, when available.
    pub words: Option<&'a [Word]>,
    /// Already-parsed pitch breakdown for the same scope.
    pub pitches: &'a [PitchBreakdown],
    /// Percent columns in table order.
    pub percents: &'a [u32],
}

/// How the suggested column of one table was decided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WasteDecision {
    pub columns: usize,
    pub strategy: Option<Strategy>,
    pub suggested_percent: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WasteTable {
    pub calculations: Vec<WasteCalculation>,
    pub decision: WasteDecision,
}

impl WasteTable {
    pub fn suggested(&self) -> Option<&WasteCalculation> {
        self.calculations.iter().find(|c| c.is_suggested)
    }
}

/// Parse the first waste table in `text` and flag its suggested column.
///
/// `words` enables the geometry strategy and should only be given for the
/// page the table was printed on. Without any percent columns the result is
/// empty, never an error.
pub fn parse_waste_table(
    text: &str,
    words: Option<&[Word]>,
    pitches: &[PitchBreakdown],
) -> WasteTable {
    let Some(caps) = WASTE_TABLE.captures(text) else {
        return WasteTable::default();
    };
    let (Some(whole), Some(pct_row), Some(area_row), Some(sq_row)) =
        (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
    else {
        return WasteTable::default();
    };

    let percents: Vec<u32> = DIGITS
        .find_iter(pct_row.as_str())
        .filter_map(|m| parse_count(m.as_str()))
        .collect();
    let areas = AREA_TOKEN.find_iter(area_row.as_str()).map(|m| m.as_str());
    let squares = SQUARES_TOKEN.find_iter(sq_row.as_str()).map(|m| m.as_str());

    let mut calculations: Vec<WasteCalculation> = percents
        .iter()
        .zip(areas)
        .zip(squares)
        .filter_map(|((&waste_percent, area), sq)| {
            Some(WasteCalculation {
                waste_percent,
                area_sqft: parse_number(area)?,
                squares: parse_number(sq)?,
                is_suggested: false,
            })
        })
        .collect();

    let table_text = block_through(
        &text[whole.start()..],
        &TABLE_START,
        &TABLE_THROUGH,
        &TABLE_END,
    )
    .unwrap_or(whole.as_str());

    let ctx = WasteContext {
        table_text,
        words,
        pitches,
        percents: &percents,
    };

    let mut decision = WasteDecision {
        columns: percents.len(),
        ..WasteDecision::default()
    };

    for strategy in Strategy::ALL {
        let Some(percent) = strategy.resolve(&ctx) else {
            continue;
        };
        match calculations.iter_mut().find(|c| c.waste_percent == percent) {
            Some(column) => {
                column.is_suggested = true;
                decision.strategy = Some(strategy);
                decision.suggested_percent = Some(percent);
                tracing::debug!(?strategy, percent, "suggested waste column resolved");
                break;
            }
            None => {
                tracing::debug!(?strategy, percent, "suggested percent not among table columns");
            }
        }
    }

    WasteTable {
        calculations,
        decision,
    }
}

/// Find the percent header printed above the "Suggested" word.
///
/// Candidates are `NN%` words strictly above the label and at most
/// [`MAX_RISE`] units higher, whose horizontal center lies within
/// [`MAX_COLUMN_OFFSET`] of the label's center. The horizontally closest wins.
pub fn suggested_by_geometry(words: &[Word]) -> Option<u32> {
    let label = words
        .iter()
        .find(|w| w.text.eq_ignore_ascii_case("suggested"))?;
    let label_x = label.center_x();

    words
        .iter()
        .filter(|w| w.top < label.top && label.top - w.top <= MAX_RISE)
        .filter_map(|w| {
            let caps = PERCENT_WORD.captures(&w.text)?;
            let percent = parse_count(caps.get(1)?.as_str())?;
            let offset = (w.center_x() - label_x).abs();
            (offset < MAX_COLUMN_OFFSET).then_some((percent, offset))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(percent, _)| percent)
}

/// Pick the percent mention closest (in characters) to the "Suggested" label.
pub fn suggested_by_adjacency(table_text: &str) -> Option<u32> {
    let label = SUGGESTED_LABEL.find(table_text)?.start();
    PERCENT_MENTION
        .captures_iter(table_text)
        .filter_map(|c| {
            let m = c.get(0)?;
            Some((parse_count(c.get(1)?.as_str())?, m.start().abs_diff(label)))
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(percent, _)| percent)
}

/// Column index suggested by the roof's pitch complexity.
///
/// These positions approximate the vendor's choice for its standard column
/// set (0, 3, 8, 13, 16, 18, 20, 23, 28). Tables whose last column exceeds
/// 50% belong to very small structures, where the vendor suggests the last
/// column.
pub fn heuristic_index(percents: &[u32], pitches: &[PitchBreakdown]) -> Option<usize> {
    let last = percents.len().checked_sub(1)?;
    let numerators: Vec<u32> = pitches.iter().filter_map(|p| p.numerator()).collect();
    let distinct = distinct_pitches(pitches);

    let index = if numerators.iter().any(|&n| n >= 12) {
        LATE_COLUMN
    } else if distinct >= 2 && numerators.iter().any(|&n| n >= 10) {
        MID_LATE_COLUMN
    } else if distinct == 2 {
        MID_LATE_COLUMN
    } else {
        LOW_MIDDLE_COLUMN
    };

    if percents[last] > 50 {
        return Some(last);
    }
    Some(index.min(last))
}
