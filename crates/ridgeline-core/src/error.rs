#[derive(Debug, thiserror::Error)]
pub enum RidgelineError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no text content found in document during {stage}")]
    NoText { stage: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RidgelineError {
    /// Stable machine-readable code for the failing stage, used in
    /// response envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            RidgelineError::Extraction(_)
            | RidgelineError::PdftotextNotFound
            | RidgelineError::PdftotextFailed { .. } => "extraction_failed",
            RidgelineError::NoText { .. } => "parse_failed",
            RidgelineError::Io(_) => "io_failed",
            RidgelineError::Json(_) => "encoding_failed",
        }
    }
}
