pub mod fields;
pub mod header;
pub mod openings;
pub mod pitch;
pub mod structures;
pub mod values;
pub mod waste;

use crate::corpus::{Corpus, PageWords};
use crate::model::Report;
use crate::trace::{build_waste_decision, build_warnings, TraceBundle, TraceScope};
use crate::{ParseOptions, ParsedReport};
use pitch::PitchScope;

/// Assemble a report from the document corpus.
///
/// Each extractor runs once over the full text. The document-level waste
/// table never uses word positions; those are reserved for structure pages.
pub fn assemble_report(
    corpus: &Corpus,
    words: &mut PageWords<'_>,
    options: &ParseOptions,
) -> ParsedReport {
    let text = corpus.text();

    let pitch_breakdown = pitch::parse_pitch_table(text, PitchScope::Document);
    let waste = waste::parse_waste_table(text, None, &pitch_breakdown);

    let parsed_structures = if options.segment_structures {
        structures::parse_structures(corpus, words, options.use_geometry)
    } else {
        Vec::new()
    };

    let mut trace = TraceBundle::default();
    trace
        .decisions
        .push(build_waste_decision(TraceScope::Document, &waste.decision));
    for parsed in &parsed_structures {
        let scope = TraceScope::Structure {
            number: parsed.structure.structure_number,
        };
        trace.decisions.push(build_waste_decision(scope, &parsed.waste));
    }

    let report = Report {
        property: header::parse_property(text),
        report_info: header::parse_report_info(text),
        roof_measurements: fields::parse_roof(text),
        wall_measurements: fields::parse_walls(text),
        pitch_breakdown,
        suggested_waste: waste.suggested().cloned(),
        all_waste_calculations: waste.calculations,
        windows_doors: openings::parse_openings(text),
        structures: parsed_structures.into_iter().map(|p| p.structure).collect(),
    };
    trace.warnings = build_warnings(&report);

    tracing::debug!(
        pages = corpus.page_count(),
        structures = report.structures.len(),
        openings = report.windows_doors.len(),
        waste_columns = report.all_waste_calculations.len(),
        "assembled report"
    );

    ParsedReport { report, trace }
}
