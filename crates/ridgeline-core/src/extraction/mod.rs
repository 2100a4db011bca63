pub mod pdftotext;
pub mod table;

use serde::Serialize;

use crate::error::RidgelineError;

/// A single word with its bounding box, in page units (origin top-left).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    pub top: f32,
}

impl Word {
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, RidgelineError>;

    /// Reopen the document for word-position queries.
    ///
    /// The returned source owns whatever handle the backend needs and
    /// releases it when dropped.
    fn open_words<'a>(
        &'a self,
        pdf_bytes: &[u8],
    ) -> Result<Box<dyn WordSource + 'a>, RidgelineError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Per-page word positions of an opened document.
pub trait WordSource {
    /// Words on the page at `page_index` (0-based), in reading order.
    fn page_words(&mut self, page_index: usize) -> Result<Vec<Word>, RidgelineError>;
}

/// Split form-feed separated text (pdftotext's page separator) into pages.
///
/// Empty pages are dropped, except the first one.
pub fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}
