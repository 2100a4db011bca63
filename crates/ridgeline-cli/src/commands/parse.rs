use ridgeline_core::error::RidgelineError;
use ridgeline_core::extraction::pdftotext::{ExtractorConfig, PdftotextExtractor};
use ridgeline_core::{ParseOptions, ParsedReport};
use std::path::{Path, PathBuf};

use crate::output;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
    pub envelope: bool,
    pub segment_structures: bool,
    pub use_geometry: bool,
    pub layout: bool,
    pub trace: bool,
}

pub fn run(args: ParseArgs) -> Result<(), RidgelineError> {
    let options = ParseOptions {
        segment_structures: args.segment_structures,
        use_geometry: args.use_geometry,
    };

    let result = parse_file(&args.input_file, args.layout, &options);

    // With an envelope, failures are reported in-band as JSON.
    if args.envelope {
        return output::json::print_envelope(result, args.trace);
    }
    let parsed = result?;

    match args.output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = output::json::render(&parsed, args.trace)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} structure(s), {} waste column(s), written to {}",
                parsed.report.structures.len(),
                parsed.report.all_waste_calculations.len(),
                path.display()
            );
            for w in &parsed.trace.warnings {
                eprintln!("  warning: {}", w.message);
            }
        }
        None => match args.output_format.as_str() {
            "json" => output::json::print(&parsed, args.trace)?,
            _ => output::table::print(&parsed, args.trace),
        },
    }

    Ok(())
}

fn parse_file(
    path: &Path,
    layout: bool,
    options: &ParseOptions,
) -> Result<ParsedReport, RidgelineError> {
    let is_text = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    if is_text {
        let text = std::fs::read_to_string(path)?;
        return ridgeline_core::parse_text(&text, options);
    }

    let pdf_bytes = std::fs::read(path)?;
    let config = ExtractorConfig {
        layout,
        ..ExtractorConfig::from_env()
    };
    let extractor = PdftotextExtractor::with_config(config);
    ridgeline_core::parse_pdf(&pdf_bytes, &extractor, options)
}
