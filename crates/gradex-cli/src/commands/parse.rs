use gradex_core::error::ExtractionError;
use gradex_core::GradeExtractor;
use std::path::PathBuf;

use crate::output;
use crate::OutputFormat;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub output: OutputFormat,
    pub out: Option<PathBuf>,
    pub patterns: Option<PathBuf>,
    pub lookahead: Option<usize>,
    pub raw: bool,
    pub trace: bool,
}

pub fn run(args: ParseArgs) -> Result<(), ExtractionError> {
    let config = super::load_config(args.patterns.as_deref(), args.lookahead)?;
    let extractor = GradeExtractor::with_config(config);
    let backend = super::backend(args.raw);

    let (transcript, bundle) = if args.trace {
        let (transcript, bundle) =
            extractor.extract_from_path_traced(&args.input_file, &backend)?;
        (transcript, Some(bundle))
    } else {
        (extractor.extract_from_path(&args.input_file, &backend)?, None)
    };
    let trace = bundle.as_ref();

    match &args.out {
        Some(path) => {
            // Always write JSON when saving to file
            std::fs::write(path, output::json::render(&transcript, trace)?)?;
            eprintln!(
                "Extracted {} record(s), written to {}",
                transcript.records.len(),
                path.display()
            );
        }
        None => match args.output {
            OutputFormat::Json => println!("{}", output::json::render(&transcript, trace)?),
            OutputFormat::Table => print!("{}", output::table::format_records(&transcript)),
        },
    }

    eprint!("{}", output::table::format_diagnostics(&transcript));
    Ok(())
}
