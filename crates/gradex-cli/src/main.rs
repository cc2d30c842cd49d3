mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "gradex",
    version,
    about = "Extract subject grades from university transcript PDFs"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract grade records from a transcript (PDF or .txt text dump)
    Parse {
        /// Path to PDF or text file
        input_file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Write the result as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Custom JSON pattern file
        #[arg(short, long, value_name = "FILE")]
        patterns: Option<PathBuf>,

        /// Lines a subject row may look ahead for its grade columns (1-8)
        #[arg(long, value_name = "N")]
        lookahead: Option<usize>,

        /// Use pdftotext reading-order mode instead of -layout
        #[arg(long)]
        raw: bool,

        /// Include the step-by-step pipeline trace in JSON output
        #[arg(long)]
        trace: bool,
    },
    /// Show how every line of a transcript is classified
    Inspect {
        /// Path to PDF or text file
        input_file: PathBuf,

        /// Custom JSON pattern file
        #[arg(short, long, value_name = "FILE")]
        patterns: Option<PathBuf>,

        /// Use pdftotext reading-order mode instead of -layout
        #[arg(long)]
        raw: bool,
    },
    /// Inspect and validate line pattern sets
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },
}

#[derive(Subcommand)]
enum PatternsAction {
    /// Print the built-in pattern set as JSON
    Show,
    /// Validate a custom pattern file
    Validate {
        /// Path to JSON pattern file
        file: PathBuf,
    },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            out,
            patterns,
            lookahead,
            raw,
            trace,
        } => commands::parse::run(commands::parse::ParseArgs {
            input_file,
            output,
            out,
            patterns,
            lookahead,
            raw,
            trace,
        }),
        Commands::Inspect {
            input_file,
            patterns,
            raw,
        } => commands::inspect::run(&input_file, patterns.as_deref(), raw),
        Commands::Patterns { action } => match action {
            PatternsAction::Show => commands::patterns::show(),
            PatternsAction::Validate { file } => commands::patterns::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
