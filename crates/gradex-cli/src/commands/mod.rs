pub mod inspect;
pub mod parse;
pub mod patterns;

use gradex_core::config::ExtractorConfig;
use gradex_core::error::ExtractionError;
use gradex_core::extraction::pdftotext::PdftotextExtractor;
use gradex_core::patterns::load_patterns;
use gradex_core::patterns::schema::PatternSetDef;
use std::path::Path;

/// Build the extractor configuration from an optional pattern file and
/// command-line overrides.
pub fn load_config(
    patterns: Option<&Path>,
    lookahead: Option<usize>,
) -> Result<ExtractorConfig, ExtractionError> {
    let mut set = match patterns {
        Some(path) => load_patterns(path)?,
        None => PatternSetDef::default(),
    };
    if lookahead.is_some() {
        set.lookahead = lookahead;
    }
    ExtractorConfig::from_pattern_set(&set)
}

/// The pdftotext backend, in layout mode unless `raw` is set.
pub fn backend(raw: bool) -> PdftotextExtractor {
    if raw {
        PdftotextExtractor::raw()
    } else {
        PdftotextExtractor::new()
    }
}
