pub mod corpus;
pub mod envelope;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod trace;

use serde::{Deserialize, Serialize};

use corpus::{Corpus, PageWords};
use error::RidgelineError;
use extraction::{split_pages, PageContent, PdfExtractor};
use model::Report;
use trace::TraceBundle;

/// Switches for the parts of the pipeline that differ between report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Split multi-structure reports into per-structure sections.
    pub segment_structures: bool,
    /// Allow word positions to disambiguate structure waste tables.
    pub use_geometry: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            segment_structures: true,
            use_geometry: true,
        }
    }
}

/// A report together with the decisions taken while building it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub report: Report,
    pub trace: TraceBundle,
}

/// Main API entry point: extract a measurement report from PDF bytes.
///
/// The document is reopened for word positions only if a structure's waste
/// table needs them, and released before this returns.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ParseOptions,
) -> Result<ParsedReport, RidgelineError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted page text"
    );

    let mut words = if options.segment_structures && options.use_geometry {
        PageWords::new(move || extractor.open_words(pdf_bytes))
    } else {
        PageWords::unavailable()
    };
    parse_pages(&pages, &mut words, options)
}

/// Parse already-extracted pages, with word positions from `words`.
pub fn parse_pages(
    pages: &[PageContent],
    words: &mut PageWords<'_>,
    options: &ParseOptions,
) -> Result<ParsedReport, RidgelineError> {
    let corpus = Corpus::from_pages(pages)?;
    Ok(parsing::assemble_report(&corpus, words, options))
}

/// Parse form-feed separated text, e.g. saved `pdftotext` output.
/// Word positions are not available for this input.
pub fn parse_text(text: &str, options: &ParseOptions) -> Result<ParsedReport, RidgelineError> {
    let pages = split_pages(text);
    parse_pages(&pages, &mut PageWords::unavailable(), options)
}
