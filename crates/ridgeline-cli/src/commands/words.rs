use ridgeline_core::error::RidgelineError;
use ridgeline_core::extraction::pdftotext::{ExtractorConfig, PdftotextExtractor};
use ridgeline_core::extraction::PdfExtractor;
use std::path::PathBuf;

pub fn run(pdf_file: PathBuf, page: usize, output_format: &str) -> Result<(), RidgelineError> {
    if page == 0 {
        return Err(RidgelineError::Extraction(
            "page numbers start at 1".into(),
        ));
    }

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::with_config(ExtractorConfig::from_env());
    let mut document = extractor.open_words(&pdf_bytes)?;
    let words = document.page_words(page - 1)?;

    match output_format {
        "json" => println!("{}", serde_json::to_string_pretty(&words)?),
        _ => {
            println!("{:>8} {:>8} {:>8} {:>8}  text", "x0", "x1", "center", "top");
            for w in &words {
                println!(
                    "{:>8.1} {:>8.1} {:>8.1} {:>8.1}  {}",
                    w.x0,
                    w.x1,
                    w.center_x(),
                    w.top,
                    w.text
                );
            }
            eprintln!("{} word(s) on page {page}", words.len());
        }
    }

    Ok(())
}
