//! Multi-structure segmentation.
//!
//! Reports covering several buildings repeat the per-roof tables once per
//! structure and add a "Measurements by Structure" summary near the end.
//! Each structure gets its own span of text, delimited by the section
//! headers, and is parsed with the same extractors as the whole document.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::corpus::{Corpus, PageWords};
use crate::extraction::table::{block_between, keyed_numeric_rows};
use crate::extraction::Word;
use crate::model::{Complexity, PitchBreakdown, Structure, StructureMeasurements};
use crate::parsing::fields::{self, Field};
use crate::parsing::pitch::{distinct_pitches, parse_pitch_table, PitchScope};
use crate::parsing::waste::{parse_waste_table, WasteDecision};

/// Cells in a summary row: number, area, then eight linear measures.
const SUMMARY_CELLS: usize = 10;

static SUMMARY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| ci(r"REPORT\s+SUMMARY\s*\n\s*Structure\s*#?\s*(\d+)"));
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| ci(r"Structure\s*#?\s*(\d+)\s*\n\s*Areas\s+per\s+Pitch"));
static ALL_STRUCTURES: LazyLock<Regex> =
    LazyLock::new(|| ci(r"All\s+Structures\s*\n\s*Areas\s+per\s+Pitch"));
static SUMMARY_START: LazyLock<Regex> =
    LazyLock::new(|| ci(r"Measurements\s+by\s+Structure"));
static SUMMARY_END: LazyLock<Regex> = LazyLock::new(|| ci(r"All\s+values|Online"));

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("structure pattern is a valid regex")
}

/// Text belonging to one structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureSpan<'a> {
    pub number: u32,
    pub text: &'a str,
}

/// One row of the "Measurements by Structure" table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub area_sqft: f64,
    pub ridges_ft: f64,
    pub hips_ft: f64,
    pub valleys_ft: f64,
    pub rakes_ft: f64,
    pub eaves_ft: f64,
    pub flashing_ft: f64,
    pub step_flashing_ft: f64,
}

impl SummaryRow {
    fn from_cells(cells: &[f64]) -> Option<Self> {
        // the trailing parapets column has no counterpart in the model
        let &[area_sqft, ridges_ft, hips_ft, valleys_ft, rakes_ft, eaves_ft, flashing_ft, step_flashing_ft, _parapets, ..] =
            cells
        else {
            return None;
        };
        Some(SummaryRow {
            area_sqft,
            ridges_ft,
            hips_ft,
            valleys_ft,
            rakes_ft,
            eaves_ft,
            flashing_ft,
            step_flashing_ft,
        })
    }

    fn measurements(&self, drip_edge_ft: Option<f64>) -> StructureMeasurements {
        StructureMeasurements {
            ridges_ft: self.ridges_ft,
            hips_ft: self.hips_ft,
            valleys_ft: self.valleys_ft,
            rakes_ft: self.rakes_ft,
            eaves_ft: self.eaves_ft,
            flashing_ft: self.flashing_ft,
            step_flashing_ft: self.step_flashing_ft,
            drip_edge_ft: drip_edge_ft.unwrap_or(self.eaves_ft + self.rakes_ft),
        }
    }
}

/// A parsed structure together with how its waste suggestion was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    pub structure: Structure,
    pub waste: WasteDecision,
}

/// Split `text` into per-structure spans.
///
/// "REPORT SUMMARY / Structure #N" headers are preferred; "Structure #N /
/// Areas per Pitch" headers are only used when there are none. The last
/// span stops at the trailing "All Structures" section when one follows it.
pub fn find_spans(text: &str) -> Vec<StructureSpan<'_>> {
    let mut headers = find_headers(&SUMMARY_HEADER, text);
    if headers.is_empty() {
        headers = find_headers(&SECTION_HEADER, text);
    }

    let mut spans = Vec::with_capacity(headers.len());
    for (i, &(start, number)) in headers.iter().enumerate() {
        let end = match headers.get(i + 1) {
            Some(&(next, _)) => next,
            None => ALL_STRUCTURES
                .find_at(text, start)
                .map(|m| m.start())
                .filter(|&pos| pos > start)
                .unwrap_or(text.len()),
        };
        spans.push(StructureSpan {
            number,
            text: &text[start..end],
        });
    }
    spans
}

fn find_headers(re: &Regex, text: &str) -> Vec<(usize, u32)> {
    re.captures_iter(text)
        .filter_map(|c| {
            let start = c.get(0)?.start();
            let number = c.get(1)?.as_str().parse().ok()?;
            Some((start, number))
        })
        .collect()
}

/// Rows of the "Measurements by Structure" table, keyed by structure number.
/// When a number repeats, its first row is kept.
pub fn parse_summary_table(text: &str) -> HashMap<u32, SummaryRow> {
    let mut rows = HashMap::new();
    let Some(block) = block_between(text, &SUMMARY_START, &SUMMARY_END) else {
        return rows;
    };
    for (number, cells) in keyed_numeric_rows(block, SUMMARY_CELLS) {
        if let Some(row) = SummaryRow::from_cells(&cells) {
            rows.entry(number).or_insert(row);
        }
    }
    rows
}

/// Roof complexity from the structure's pitch mix.
pub fn complexity(pitches: &[PitchBreakdown]) -> Complexity {
    if pitches.iter().any(|p| p.numerator().is_some_and(|n| n >= 12)) {
        Complexity::Complex
    } else if distinct_pitches(pitches) > 2 {
        Complexity::Normal
    } else {
        Complexity::Simple
    }
}

/// PDF page index (0-based) of the first page that names structure
/// `number` and carries its waste table with the "Suggested" marker.
pub fn geometry_page(corpus: &Corpus, number: u32) -> Option<usize> {
    let mention = Regex::new(&format!(r"(?i)\bStructure[\s:#\-]*{number}\b")).ok()?;
    corpus
        .pages()
        .iter()
        .find(|page| {
            let lower = page.text.to_lowercase();
            mention.is_match(&page.text) && lower.contains("waste") && lower.contains("suggested")
        })
        .map(|page| page.page_index())
}

/// Parse every structure in the corpus.
///
/// Structure numbers are kept as printed. Word positions are requested only
/// for the page holding each structure's waste table, and only when
/// `use_geometry` is set.
pub fn parse_structures(
    corpus: &Corpus,
    words: &mut PageWords<'_>,
    use_geometry: bool,
) -> Vec<ParsedStructure> {
    let text = corpus.text();
    let spans = find_spans(text);
    if spans.is_empty() {
        return Vec::new();
    }
    let summary = parse_summary_table(text);
    tracing::debug!(
        structures = spans.len(),
        summary_rows = summary.len(),
        "segmented structures"
    );

    spans
        .iter()
        .map(|span| {
            let page_words = if use_geometry {
                geometry_page(corpus, span.number).and_then(|i| words.words(i))
            } else {
                None
            };
            parse_structure(span, summary.get(&span.number), page_words)
        })
        .collect()
}

fn parse_structure(
    span: &StructureSpan<'_>,
    summary: Option<&SummaryRow>,
    page_words: Option<&[Word]>,
) -> ParsedStructure {
    let pitch_breakdown = parse_pitch_table(span.text, PitchScope::Structure);
    let waste = parse_waste_table(span.text, page_words, &pitch_breakdown);

    let (total_area_sqft, measurements) = match summary {
        Some(row) => (
            row.area_sqft,
            row.measurements(fields::number(Field::DripEdge, span.text)),
        ),
        None => (
            fields::number(Field::TotalArea, span.text).unwrap_or(0.0),
            fields::linear_measurements(span.text),
        ),
    };

    let structure = Structure {
        structure_number: span.number,
        total_area_sqft,
        total_facets: fields::integer(Field::TotalFacets, span.text).unwrap_or(0),
        predominant_pitch: fields::text(Field::PredominantPitch, span.text),
        complexity: complexity(&pitch_breakdown),
        measurements,
        suggested_waste: waste.suggested().cloned(),
        all_waste_calculations: waste.calculations,
        pitch_breakdown,
    };

    ParsedStructure {
        structure,
        waste: waste.decision,
    }
}
