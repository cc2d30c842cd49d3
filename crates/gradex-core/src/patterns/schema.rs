use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a list of patterns in a pattern file combines with the built-in list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    Extend,
    Replace,
}

/// A set of line-classification patterns and tuning knobs, as stored on disk.
///
/// Every field is optional; anything left out falls back to the built-in
/// default. Regexes use the `regex` crate syntax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSetDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subject code at the start of a line. Must capture `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
    /// Grade columns at the end of a line. Must capture `units`, `time`,
    /// `day` and `grade`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_tail: Option<String>,
    /// Semester header. May capture `term` and `start` for ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boilerplate: Option<Vec<String>>,
    #[serde(default)]
    pub boilerplate_mode: ListMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookahead: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_continuation_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grade: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_source_lines: Option<bool>,
}
