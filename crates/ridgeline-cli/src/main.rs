mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the log filter, e.g. `ridgeline_core=debug`.
const LOG_ENV: &str = "RIDGELINE_LOG";

#[derive(Parser)]
#[command(
    name = "ridgeline",
    version,
    about = "Extract roof, wall and window measurements from aerial measurement reports"
)]
struct Cli {
    /// Log pipeline decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a measurement report (PDF, or saved pdftotext output as .txt)
    Parse {
        /// Path to PDF or .txt file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the parsed report to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Wrap JSON output in a {success, data} envelope
        #[arg(long)]
        envelope: bool,

        /// Do not split multi-structure reports
        #[arg(long)]
        no_structures: bool,

        /// Do not use word positions for waste suggestions
        #[arg(long)]
        no_geometry: bool,

        /// Extract text without pdftotext's -layout mode
        #[arg(long)]
        raw: bool,

        /// Include the decision trace
        #[arg(long)]
        trace: bool,
    },
    /// Print the word boxes of one PDF page
    Words {
        /// Path to PDF file
        input_file: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
            envelope,
            no_structures,
            no_geometry,
            raw,
            trace,
        } => commands::parse::run(commands::parse::ParseArgs {
            input_file,
            output_format: output,
            output_file: out,
            envelope,
            segment_structures: !no_structures,
            use_geometry: !no_geometry,
            layout: !raw,
            trace,
        }),
        Commands::Words {
            input_file,
            page,
            output,
        } => commands::words::run(input_file, page, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
