use std::collections::HashMap;

use crate::error::RidgelineError;
use crate::extraction::{PageContent, Word, WordSource};

/// Text of one extracted page, with its 1-based page number in the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPage {
    pub page_number: usize,
    pub text: String,
}

impl CorpusPage {
    /// 0-based index of this page in the source document.
    pub fn page_index(&self) -> usize {
        self.page_number.saturating_sub(1)
    }
}

/// Linearized text of a whole document, kept both per page and joined.
///
/// Extraction may drop blank pages, so positions in [`Corpus::pages`] are
/// not PDF page indices; use [`CorpusPage::page_index`] for word lookups.
#[derive(Debug, Clone)]
pub struct Corpus {
    pages: Vec<CorpusPage>,
    text: String,
}

impl Corpus {
    /// Build the corpus from extracted pages.
    ///
    /// Fails when every page is blank, since nothing downstream can be
    /// extracted from an empty document.
    pub fn from_pages(pages: &[PageContent]) -> Result<Self, RidgelineError> {
        let pages: Vec<CorpusPage> = pages
            .iter()
            .map(|p| CorpusPage {
                page_number: p.page_number,
                text: p.text(),
            })
            .collect();
        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(RidgelineError::NoText {
                stage: "text extraction",
            });
        }
        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Corpus { pages, text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pages(&self) -> &[CorpusPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

type Opener<'a> = Box<dyn FnOnce() -> Result<Box<dyn WordSource + 'a>, RidgelineError> + 'a>;

enum SourceState<'a> {
    Pending(Opener<'a>),
    Open(Box<dyn WordSource + 'a>),
    Unavailable,
}

/// On-demand word positions, per 0-based page index.
///
/// The underlying document is opened on the first request only, and each
/// page is queried at most once. Failures are logged and cached as "no
/// words"; they are never retried and never surface as errors. The opened
/// source is dropped together with this value.
pub struct PageWords<'a> {
    state: SourceState<'a>,
    cache: HashMap<usize, Option<Vec<Word>>>,
}

impl<'a> PageWords<'a> {
    pub fn new<F>(open: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn WordSource + 'a>, RidgelineError> + 'a,
    {
        PageWords {
            state: SourceState::Pending(Box::new(open)),
            cache: HashMap::new(),
        }
    }

    /// Word access over an already-open source.
    pub fn from_source(source: Box<dyn WordSource + 'a>) -> Self {
        PageWords {
            state: SourceState::Open(source),
            cache: HashMap::new(),
        }
    }

    /// No word positions at all, e.g. for pre-extracted text input.
    pub fn unavailable() -> Self {
        PageWords {
            state: SourceState::Unavailable,
            cache: HashMap::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SourceState::Open(_))
    }

    pub fn words(&mut self, page_index: usize) -> Option<&[Word]> {
        if !self.cache.contains_key(&page_index) {
            let fetched = self.fetch(page_index);
            self.cache.insert(page_index, fetched);
        }
        self.cache.get(&page_index).and_then(|w| w.as_deref())
    }

    fn fetch(&mut self, page_index: usize) -> Option<Vec<Word>> {
        let state = std::mem::replace(&mut self.state, SourceState::Unavailable);
        self.state = match state {
            SourceState::Pending(open) => match open() {
                Ok(source) => SourceState::Open(source),
                Err(e) => {
                    tracing::warn!(error = %e, "could not reopen document for word positions");
                    SourceState::Unavailable
                }
            },
            other => other,
        };

        let SourceState::Open(source) = &mut self.state else {
            return None;
        };
        match source.page_words(page_index) {
            Ok(words) => Some(words),
            Err(e) => {
                tracing::warn!(error = %e, page = page_index + 1, "word lookup failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for PageWords<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageWords")
            .field("open", &self.is_open())
            .field("cached_pages", &self.cache.len())
            .finish()
    }
}
