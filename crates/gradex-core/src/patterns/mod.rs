pub mod builtin;
pub mod schema;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use regex::Regex;
use schema::{ListMode, PatternSetDef};
use std::path::Path;

/// Load a pattern set from a JSON file.
pub fn load_patterns(path: &Path) -> Result<PatternSetDef, ExtractionError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExtractionError::PatternLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_patterns(&content, path)
}

/// Parse a pattern set from a JSON string.
pub fn parse_patterns(json: &str, source: &Path) -> Result<PatternSetDef, ExtractionError> {
    let set: PatternSetDef = serde_json::from_str(json).map_err(|e| ExtractionError::PatternLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_patterns(&set)?;
    Ok(set)
}

/// Parse a pattern set from a JSON string (no file path context).
pub fn parse_patterns_str(json: &str) -> Result<PatternSetDef, ExtractionError> {
    let set: PatternSetDef = serde_json::from_str(json).map_err(ExtractionError::Json)?;
    validate_patterns(&set)?;
    Ok(set)
}

/// Validate that every pattern compiles and carries its required capture
/// groups, and that the scalar knobs are in range.
pub fn validate_patterns(set: &PatternSetDef) -> Result<(), ExtractionError> {
    ExtractorConfig::from_pattern_set(set).map(|_| ())
}

/// Non-fatal problems in a valid pattern set.
pub fn pattern_warnings(set: &PatternSetDef) -> Vec<String> {
    let mut warnings = Vec::new();
    if set.boilerplate_mode == ListMode::Replace {
        match set.boilerplate {
            None => warnings
                .push("boilerplate_mode is 'replace' but no boilerplate list is given".into()),
            Some(ref list) if list.is_empty() => {
                warnings.push("empty boilerplate list disables page-furniture filtering".into())
            }
            Some(_) => {}
        }
    }
    if let Some(ref pattern) = set.semester_marker {
        if !has_capture_group(pattern, "start") {
            warnings.push(
                "semester_marker has no 'start' group; semesters cannot be ordered".into(),
            );
        }
    }
    warnings
}

/// Whether `pattern` compiles and defines the named capture group, in
/// either `(?P<name>..)` or `(?<name>..)` form.
pub fn has_capture_group(pattern: &str, name: &str) -> bool {
    Regex::new(pattern).is_ok_and(|re| re.capture_names().flatten().any(|n| n == name))
}
