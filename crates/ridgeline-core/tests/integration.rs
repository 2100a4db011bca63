//! Integration tests for the parse_pdf() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent and word boxes
//! without invoking pdftotext, so these tests run without poppler-utils.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ridgeline_core::envelope::Envelope;
use ridgeline_core::error::RidgelineError;
use ridgeline_core::extraction::{split_pages, PageContent, PdfExtractor, Word, WordSource};
use ridgeline_core::model::{Complexity, Direction, Report};
use ridgeline_core::parsing::waste::Strategy;
use ridgeline_core::trace::TraceScope;
use ridgeline_core::{parse_pdf, parse_text, ParseOptions};

struct MockExtractor {
    pages: Vec<PageContent>,
    words: HashMap<usize, Vec<Word>>,
    fail_words: bool,
    opens: AtomicUsize,
    requested: Mutex<Vec<usize>>,
}

impl MockExtractor {
    fn new(pages: Vec<PageContent>) -> Self {
        MockExtractor {
            pages,
            words: HashMap::new(),
            fail_words: false,
            opens: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn with_words(mut self, page_index: usize, words: Vec<Word>) -> Self {
        self.words.insert(page_index, words);
        self
    }

    fn failing_words(mut self) -> Self {
        self.fail_words = true;
        self
    }

    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn requested(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, RidgelineError> {
        Ok(self.pages.clone())
    }

    fn open_words<'a>(
        &'a self,
        _pdf_bytes: &[u8],
    ) -> Result<Box<dyn WordSource + 'a>, RidgelineError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockWords { extractor: self }))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MockWords<'a> {
    extractor: &'a MockExtractor,
}

impl WordSource for MockWords<'_> {
    fn page_words(&mut self, page_index: usize) -> Result<Vec<Word>, RidgelineError> {
        self.extractor.requested.lock().unwrap().push(page_index);
        if self.extractor.fail_words {
            return Err(RidgelineError::PdftotextFailed {
                code: 1,
                stderr: "Syntax Error: Couldn't read xref table".into(),
            });
        }
        Ok(self
            .extractor
            .words
            .get(&page_index)
            .cloned()
            .unwrap_or_default())
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

fn word(text: &str, x0: f32, x1: f32, top: f32) -> Word {
    Word {
        text: text.into(),
        x0,
        x1,
        top,
    }
}

fn cover_page() -> PageContent {
    page(
        1,
        &[
            "PREMIUM REPORT                                  03/14/2024",
            "1234 Maple Grove Ln, Springfield, IL 62704",
            "Report: 40123456",
            "Prepared for",
            "Contact: Jane Roofer          Page 1",
            "Company: Acme Roofing LLC",
            "Latitude = 39.7817",
            "Longitude = -89.6501",
        ],
    )
}

fn single_structure_pages() -> Vec<PageContent> {
    vec![
        cover_page(),
        page(
            2,
            &[
                "Total Roof Area = 3,245 sq ft",
                "Total Roof Facets = 14",
                "Predominant Pitch = 6/12",
                "Number of Stories >1",
                "Ridges = 62 ft (4 Ridges)",
                "Hips = 44 ft (6 Hips)",
                "Valleys = 31 ft (3 Valleys)",
                "Rakes† = 90 ft (8 Rakes)",
                "Eaves/Starter‡ = 180 ft (12 Eaves)",
                "Drip Edge (Eaves + Rakes) = 265 ft (20 Lengths)",
                "Flashing = 12 ft (2 Lengths)",
                "Step flashing = 17 ft (5 Lengths)",
                "Estimated Attic = 2,100 sq ft",
                "Areas per Pitch",
                "Roof Pitches     4/12      6/12",
                "Area (sq ft)     1,245     2,000",
                "% of Roof        38.4%     61.6%",
                "Waste %      0%     3%     8%     13%    16%    18%    20%    23%    28%",
                "Area (Sq ft) 3,245  3,342  3,505  3,667  3,764  3,829  3,894  3,991  4,154",
                "Squares *    32.67  33.67  35.33  37.00  38.00  38.67  39.00  40.00  41.67",
            ],
        ),
        page(
            3,
            &[
                "Total Wall Area = 2,400 sq ft",
                "Total Wall Facets = 12",
                "Total Siding Area = 2,000 sq ft",
                "Total Masonry Area = 400 sq ft",
                "WINDOW AND DOOR DIAGRAM",
                "South",
                "B1   20   18   4 x 5",
                "A1   15   16   3 x 5",
                "A1   99   99   9 x 9",
                "NORTH ELEVATION",
                "Window & Door",
                "Count",
                "A   120.5   3",
                "Note: wall areas are approximate",
                "Z1   10   13   2 x 5",
            ],
        ),
    ]
}

fn multi_structure_pages() -> Vec<PageContent> {
    vec![
        cover_page(),
        page(
            2,
            &[
                "REPORT SUMMARY",
                "Structure #1",
                "Total Roof Area = 2,000 sq ft",
                "Total Roof Facets = 8",
                "Predominant Pitch = 6/12",
                "Ridges = 40 ft",
                "Rakes = 30 ft",
                "Eaves = 70 ft",
                "Roof Pitches   6/12   8/12",
                "Area (sq ft)   1500   500",
                "% of Roof      75%    25%",
                "Waste %        0%     3%     8%     13%    16%    18%    20%",
                "Area (Sq ft)   2,000  2,060  2,160  2,260  2,320  2,360  2,400",
                "Squares *      20.00  20.67  21.67  22.67  23.33  23.67  24.00",
                "Measured                            Suggested",
            ],
        ),
        page(
            3,
            &[
                "REPORT SUMMARY",
                "Structure #2",
                "Total Roof Area = 600 sq ft",
                "Predominant Pitch = 12/12",
                "Roof Pitches   12/12",
                "Area (sq ft)   600",
                "% of Roof      100%",
                "Waste %        0%     10%    15%    20%",
                "Area (Sq ft)   600    660    690    720",
                "Squares *      6.00   6.67   7.00   7.33",
                "Measured              Suggested",
            ],
        ),
        page(
            4,
            &[
                "All Structures",
                "Areas per Pitch",
                "Roof Pitches   6/12   8/12   12/12",
                "Area (sq ft)   1500   500    600",
                "% of Roof      57.7%  19.2%  23.1%",
                "Measurements by Structure",
                "Structure  Area   Ridges  Hips  Valleys  Rakes  Eaves  Flashing  Step  Parapets",
                "1          2,000  40      0     0        30     70     0         0     0",
                "2          600    10      5     0        20     40     0         0     0",
                "All values rounded to the nearest foot",
            ],
        ),
    ]
}

fn multi_structure_words(extractor: MockExtractor) -> MockExtractor {
    extractor
        .with_words(
            1,
            vec![
                word("13%", 300.0, 318.0, 400.0),
                word("16%", 340.0, 358.0, 400.0),
                word("Measured", 60.0, 104.0, 460.0),
                word("Suggested", 286.0, 332.0, 460.0),
            ],
        )
        .with_words(
            2,
            vec![
                word("10%", 200.0, 218.0, 300.0),
                word("15%", 240.0, 258.0, 300.0),
                word("Suggested", 226.0, 272.0, 360.0),
            ],
        )
}

// ---------------------------------------------------------------------------
// Test 1: Single-structure report, every top-level section
// ---------------------------------------------------------------------------
#[test]
fn single_structure_report() {
    let extractor = MockExtractor::new(single_structure_pages());
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();
    let report = &parsed.report;

    assert_eq!(
        report.property.address.as_deref(),
        Some("1234 Maple Grove Ln, Springfield, IL 62704")
    );
    assert_eq!(report.property.latitude, Some(39.7817));
    assert_eq!(report.property.longitude, Some(-89.6501));
    assert_eq!(report.report_info.report_number.as_deref(), Some("40123456"));
    assert_eq!(report.report_info.report_date.as_deref(), Some("03/14/2024"));
    assert_eq!(
        report.report_info.prepared_for_contact.as_deref(),
        Some("Jane Roofer")
    );
    assert_eq!(
        report.report_info.prepared_for_company.as_deref(),
        Some("Acme Roofing LLC")
    );

    let roof = &report.roof_measurements;
    assert_eq!(roof.total_area_sqft, 3245.0);
    assert_eq!(roof.total_facets, 14);
    assert_eq!(roof.predominant_pitch.as_deref(), Some("6/12"));
    assert_eq!(roof.num_stories.as_deref(), Some("1"));
    assert_eq!(roof.hips_ft, 44.0);
    assert_eq!(roof.flashing_ft, 12.0);
    assert_eq!(roof.step_flashing_ft, 17.0);
    // explicit drip edge wins over eaves + rakes (270)
    assert_eq!(roof.drip_edge_ft, 265.0);
    assert_eq!(roof.estimated_attic_sqft, Some(2100.0));

    let walls = report.wall_measurements.as_ref().unwrap();
    assert_eq!(walls.total_wall_area_sqft, 2400.0);
    assert_eq!(walls.total_masonry_area_sqft, 400.0);

    assert_eq!(report.pitch_breakdown.len(), 2);
    assert_eq!(report.pitch_breakdown[0].area_sqft, 1245.0);

    // two distinct pitches, no "Suggested" marker: heuristic column 5
    assert_eq!(report.all_waste_calculations.len(), 9);
    let suggested = report.suggested_waste.as_ref().unwrap();
    assert_eq!(suggested.waste_percent, 18);
    assert_eq!(suggested.squares, 38.67);
    assert!(suggested.is_suggested);

    assert!(report.structures.is_empty());
    assert_eq!(extractor.opens(), 0);
}

// ---------------------------------------------------------------------------
// Test 2: Windows and doors resolve to walls, duplicates dropped
// ---------------------------------------------------------------------------
#[test]
fn windows_and_doors() {
    let extractor = MockExtractor::new(single_structure_pages());
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();
    let openings = &parsed.report.windows_doors;

    let labels: Vec<&str> = openings.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["B1", "A1", "Z1"]);

    let a1 = &openings[1];
    assert_eq!(a1.area_sqft, 15.0);
    // elevation table beats the diagram listing
    assert_eq!(a1.wall_direction, Direction::North);
    assert_eq!(openings[0].wall_direction, Direction::South);
    assert_eq!(openings[2].wall_direction, Direction::Unknown);
}

// ---------------------------------------------------------------------------
// Test 3: Multi-structure report, geometry on structure pages
// ---------------------------------------------------------------------------
#[test]
fn multi_structure_with_geometry() {
    let extractor = multi_structure_words(MockExtractor::new(multi_structure_pages()));
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();
    let report = &parsed.report;

    assert_eq!(report.structures.len(), 2);
    assert_eq!(extractor.opens(), 1);
    assert_eq!(extractor.requested(), vec![1, 2]);

    let s1 = &report.structures[0];
    assert_eq!(s1.structure_number, 1);
    assert_eq!(s1.total_area_sqft, 2000.0);
    assert_eq!(s1.total_facets, 8);
    assert_eq!(s1.complexity, Complexity::Simple);
    assert_eq!(s1.measurements.drip_edge_ft, 100.0);
    assert_eq!(s1.suggested_waste.as_ref().map(|w| w.waste_percent), Some(13));

    let s2 = &report.structures[1];
    assert_eq!(s2.structure_number, 2);
    assert_eq!(s2.complexity, Complexity::Complex);
    assert_eq!(s2.measurements.hips_ft, 5.0);
    assert_eq!(s2.measurements.drip_edge_ft, 60.0);
    assert_eq!(s2.suggested_waste.as_ref().map(|w| w.waste_percent), Some(15));

    // document-level pitch table comes from the "All Structures" section
    assert_eq!(report.pitch_breakdown.len(), 3);

    let d1 = parsed
        .trace
        .decision(TraceScope::Structure { number: 1 })
        .unwrap();
    assert_eq!(d1.strategy, Some(Strategy::Geometry));
    let doc = parsed.trace.decision(TraceScope::Document).unwrap();
    assert_ne!(doc.strategy, Some(Strategy::Geometry));
}

// ---------------------------------------------------------------------------
// Test 4: Word lookup failure falls through to text adjacency
// ---------------------------------------------------------------------------
#[test]
fn word_failure_falls_through() {
    let extractor =
        multi_structure_words(MockExtractor::new(multi_structure_pages())).failing_words();
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();

    for number in [1, 2] {
        let decision = parsed
            .trace
            .decision(TraceScope::Structure { number })
            .unwrap();
        assert_eq!(decision.strategy, Some(Strategy::TextAdjacency));
    }
    // last column in the linearized text is nearest to "Suggested"
    let s1 = &parsed.report.structures[0];
    assert_eq!(s1.suggested_waste.as_ref().map(|w| w.waste_percent), Some(20));
}

// ---------------------------------------------------------------------------
// Test 5: Options switch off segmentation and geometry
// ---------------------------------------------------------------------------
#[test]
fn options_disable_segmentation_and_geometry() {
    let extractor = multi_structure_words(MockExtractor::new(multi_structure_pages()));
    let options = ParseOptions {
        segment_structures: false,
        ..ParseOptions::default()
    };
    let parsed = parse_pdf(&[], &extractor, &options).unwrap();
    assert!(parsed.report.structures.is_empty());
    assert_eq!(extractor.opens(), 0);

    let options = ParseOptions {
        use_geometry: false,
        ..ParseOptions::default()
    };
    let parsed = parse_pdf(&[], &extractor, &options).unwrap();
    assert_eq!(parsed.report.structures.len(), 2);
    assert_eq!(extractor.opens(), 0);
}

// ---------------------------------------------------------------------------
// Test 6: Blank document is the one hard failure
// ---------------------------------------------------------------------------
#[test]
fn blank_document_fails() {
    let extractor = MockExtractor::new(vec![page(1, &["", "   "]), page(2, &[])]);
    let result = parse_pdf(&[], &extractor, &ParseOptions::default());
    assert!(matches!(result, Err(RidgelineError::NoText { .. })));

    let envelope = Envelope::from(result);
    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("parse_failed"));
    assert_eq!(envelope.status(), 500);
}

// ---------------------------------------------------------------------------
// Test 7: Absent sections are empty, not errors
// ---------------------------------------------------------------------------
#[test]
fn sparse_document_yields_defaults() {
    let extractor = MockExtractor::new(vec![page(1, &["Some unrelated letter"])]);
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();
    let report = &parsed.report;

    assert!(report.property.address.is_none());
    assert!(report.wall_measurements.is_none());
    assert!(report.pitch_breakdown.is_empty());
    assert!(report.all_waste_calculations.is_empty());
    assert!(report.suggested_waste.is_none());
    assert!(report.windows_doors.is_empty());
    assert_eq!(report.roof_measurements.total_area_sqft, 0.0);
    assert!(!parsed.trace.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Test 8: JSON round trip keeps every value and order
// ---------------------------------------------------------------------------
#[test]
fn json_round_trip() {
    let extractor = multi_structure_words(MockExtractor::new(multi_structure_pages()));
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();

    let json = serde_json::to_string_pretty(&parsed.report).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, parsed.report);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["structures"][1]["complexity"], "Complex");
    assert_eq!(value["windows_doors"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test 9: Pre-extracted text parses like the PDF path without geometry
// ---------------------------------------------------------------------------
#[test]
fn text_input_matches_pdf_without_geometry() {
    let pages = multi_structure_pages();
    let text = pages
        .iter()
        .map(|p| p.text())
        .collect::<Vec<_>>()
        .join("\x0c");

    let from_text = parse_text(&text, &ParseOptions::default()).unwrap();

    let extractor = MockExtractor::new(pages);
    let options = ParseOptions {
        use_geometry: false,
        ..ParseOptions::default()
    };
    let from_pdf = parse_pdf(&[], &extractor, &options).unwrap();

    assert_eq!(from_text.report, from_pdf.report);
}

// ---------------------------------------------------------------------------
// Test 10: Blank pages do not shift word lookups off the PDF page
// ---------------------------------------------------------------------------
#[test]
fn geometry_uses_pdf_page_after_blank_page() {
    let structure_page = multi_structure_pages()[1].text();
    let text = format!("{}\x0c\x0c{structure_page}\x0c", cover_page().text());
    let pages = split_pages(&text);
    assert_eq!(
        pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
        vec![1, 3]
    );

    let extractor = MockExtractor::new(pages).with_words(
        2,
        vec![
            word("13%", 300.0, 318.0, 400.0),
            word("16%", 340.0, 358.0, 400.0),
            word("Suggested", 286.0, 332.0, 460.0),
        ],
    );
    let parsed = parse_pdf(&[], &extractor, &ParseOptions::default()).unwrap();

    assert_eq!(extractor.requested(), vec![2]);
    let decision = parsed
        .trace
        .decision(TraceScope::Structure { number: 1 })
        .unwrap();
    assert_eq!(decision.strategy, Some(Strategy::Geometry));
    let s1 = &parsed.report.structures[0];
    assert_eq!(s1.suggested_waste.as_ref().map(|w| w.waste_percent), Some(13));
}
