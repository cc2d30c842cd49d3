use gradex_core::error::ExtractionError;
use gradex_core::GradeExtractor;
use std::path::Path;

use crate::output;

pub fn run(input_file: &Path, patterns: Option<&Path>, raw: bool) -> Result<(), ExtractionError> {
    let config = super::load_config(patterns, None)?;
    let extractor = GradeExtractor::with_config(config);
    let lines = extractor.read_lines(input_file, &super::backend(raw))?;

    let rows: Vec<_> = lines
        .iter()
        .map(|line| (line, extractor.classify_line(&line.text)))
        .collect();
    print!("{}", output::table::format_line_kinds(&rows));

    let merged = extractor
        .combine(&lines)
        .iter()
        .filter(|r| r.is_merged())
        .count();
    println!(
        "\n{} line(s), {} multi-line record(s) at lookahead {}",
        lines.len(),
        merged,
        extractor.config().lookahead()
    );
    Ok(())
}
