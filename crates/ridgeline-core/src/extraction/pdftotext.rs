use crate::error::RidgelineError;
use crate::extraction::{split_pages, PageContent, PdfExtractor, Word, WordSource};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

/// Environment variable overriding the pdftotext executable.
pub const BINARY_ENV: &str = "RIDGELINE_PDFTOTEXT";

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Run pdftotext with `-layout` so table rows stay on one line.
    pub layout: bool,
    /// pdftotext executable to invoke.
    pub binary: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            layout: true,
            binary: PathBuf::from("pdftotext"),
        }
    }
}

impl ExtractorConfig {
    /// Defaults, with the executable taken from `RIDGELINE_PDFTOTEXT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(binary) = std::env::var_os(BINARY_ENV).filter(|v| !v.is_empty()) {
            config.binary = PathBuf::from(binary);
        }
        config
    }
}

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Page text comes from `pdftotext [-layout]`; word boxes from
/// `pdftotext -bbox`, one page at a time.
pub struct PdftotextExtractor {
    config: ExtractorConfig,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        PdftotextExtractor { config }
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, RidgelineError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;

        let mut cmd = Command::new(&self.config.binary);
        if self.config.layout {
            cmd.arg("-layout");
        }
        cmd.arg(tmpfile.path()).arg("-"); // output to stdout
        let output = run(cmd, "pdftotext")?;

        let text = String::from_utf8_lossy(&output.stdout);
        let pages = split_pages(&text);
        tracing::debug!(pages = pages.len(), layout = self.config.layout, "extracted page text");
        Ok(pages)
    }

    fn open_words<'a>(
        &'a self,
        pdf_bytes: &[u8],
    ) -> Result<Box<dyn WordSource + 'a>, RidgelineError> {
        let file = write_temp_pdf(pdf_bytes)?;
        Ok(Box::new(PdftotextDocument {
            file,
            binary: &self.config.binary,
        }))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// A document reopened for word queries. The temp copy is deleted on drop.
pub struct PdftotextDocument<'a> {
    file: NamedTempFile,
    binary: &'a Path,
}

impl WordSource for PdftotextDocument<'_> {
    fn page_words(&mut self, page_index: usize) -> Result<Vec<Word>, RidgelineError> {
        let page = (page_index + 1).to_string();
        let mut cmd = Command::new(self.binary);
        cmd.arg("-bbox")
            .args(["-f", &page, "-l", &page])
            .arg(self.file.path())
            .arg("-");
        let output = run(cmd, "pdftotext -bbox")?;

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_words(&xml)
    }
}

fn write_temp_pdf(pdf_bytes: &[u8]) -> Result<NamedTempFile, RidgelineError> {
    let mut tmpfile =
        NamedTempFile::new().map_err(|e| RidgelineError::Extraction(e.to_string()))?;
    tmpfile
        .write_all(pdf_bytes)
        .map_err(|e| RidgelineError::Extraction(e.to_string()))?;
    Ok(tmpfile)
}

fn run(mut cmd: Command, what: &str) -> Result<Output, RidgelineError> {
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RidgelineError::PdftotextNotFound
        } else {
            RidgelineError::Extraction(format!("{what} failed: {e}"))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(RidgelineError::PdftotextFailed { code, stderr });
    }

    Ok(output)
}

/// Parse the XHTML written by `pdftotext -bbox` into words.
fn parse_bbox_words(xml: &str) -> Result<Vec<Word>, RidgelineError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut words = Vec::new();
    let mut open_word: Option<(f32, f32, f32)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"word" => {
                open_word = word_box(&e)?;
            }
            Ok(Event::Text(t)) => {
                if let Some((x0, x1, top)) = open_word.take() {
                    let text = t
                        .unescape()
                        .map_err(|e| RidgelineError::Extraction(format!("invalid bbox text: {e}")))?;
                    let text = text.trim();
                    if !text.is_empty() {
                        words.push(Word {
                            text: text.to_string(),
                            x0,
                            x1,
                            top,
                        });
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"word" => {
                open_word = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RidgelineError::Extraction(format!(
                    "invalid bbox output at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(words)
}

fn word_box(tag: &BytesStart<'_>) -> Result<Option<(f32, f32, f32)>, RidgelineError> {
    let mut x_min = None;
    let mut x_max = None;
    let mut y_min = None;

    for attr in tag.attributes() {
        let attr =
            attr.map_err(|e| RidgelineError::Extraction(format!("invalid bbox attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| RidgelineError::Extraction(format!("invalid bbox attribute: {e}")))?;
        let parsed = value.trim().parse::<f32>().ok();
        match attr.key.as_ref() {
            b"xMin" => x_min = parsed,
            b"xMax" => x_max = parsed,
            b"yMin" => y_min = parsed,
            _ => {}
        }
    }

    Ok(match (x_min, x_max, y_min) {
        (Some(x0), Some(x1), Some(top)) => Some((x0, x1, top)),
        _ => None,
    })
}
