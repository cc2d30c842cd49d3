use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ExtractionError;
use crate::patterns::builtin;
use crate::patterns::schema::{ListMode, PatternSetDef};

/// Controls how a list of patterns is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T> ListOverride<T> {
    /// Resolve this override against the given defaults, borrowing from both.
    pub fn resolve<'a>(&'a self, defaults: &'a [T]) -> Vec<&'a T> {
        match self {
            ListOverride::Default => defaults.iter().collect(),
            ListOverride::Replace(v) => v.iter().collect(),
            ListOverride::Extend(v) => defaults.iter().chain(v.iter()).collect(),
        }
    }
}

/// Configuration for grade extraction.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ExtractorConfigBuilder`] to construct with string patterns, or
/// [`ExtractorConfig::from_pattern_set`] for a pattern file.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub(crate) subject_code_re: Option<Regex>,
    pub(crate) grade_tail_re: Option<Regex>,
    pub(crate) semester_re: Option<Regex>,
    pub(crate) footer_re: Option<Regex>,
    pub(crate) numeric_token_re: Option<Regex>,
    pub(crate) boilerplate: ListOverride<Regex>,
    /// How many lines after a subject line recombination may examine.
    pub(crate) lookahead: usize,
    /// Longest line (in chars) still treated as a wrapped name fragment.
    pub(crate) max_continuation_len: usize,
    /// Grades above this are not genuine entries.
    pub(crate) max_grade: Decimal,
    pub(crate) keep_source_lines: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            subject_code_re: None,
            grade_tail_re: None,
            semester_re: None,
            footer_re: None,
            numeric_token_re: None,
            boilerplate: ListOverride::Default,
            lookahead: builtin::LOOKAHEAD,
            max_continuation_len: builtin::MAX_CONTINUATION_LEN,
            max_grade: builtin::max_grade(),
            keep_source_lines: true,
        }
    }
}

impl ExtractorConfig {
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn max_continuation_len(&self) -> usize {
        self.max_continuation_len
    }

    pub fn max_grade(&self) -> Decimal {
        self.max_grade
    }

    pub fn keep_source_lines(&self) -> bool {
        self.keep_source_lines
    }

    /// Compile a pattern set loaded from disk.
    pub fn from_pattern_set(set: &PatternSetDef) -> Result<Self, ExtractionError> {
        let mut builder = ExtractorConfigBuilder::new();
        if let Some(p) = &set.subject_code {
            builder = builder.subject_code_regex(p);
        }
        if let Some(p) = &set.grade_tail {
            builder = builder.grade_tail_regex(p);
        }
        if let Some(p) = &set.semester_marker {
            builder = builder.semester_regex(p);
        }
        if let Some(p) = &set.footer {
            builder = builder.footer_regex(p);
        }
        if let Some(p) = &set.numeric_token {
            builder = builder.numeric_token_regex(p);
        }
        if let Some(list) = &set.boilerplate {
            builder = match set.boilerplate_mode {
                ListMode::Replace => builder.set_boilerplate_patterns(list.clone()),
                ListMode::Extend => list
                    .iter()
                    .fold(builder, |b, p| b.add_boilerplate_pattern(p.clone())),
            };
        }
        if let Some(n) = set.lookahead {
            builder = builder.lookahead(n);
        }
        if let Some(n) = set.max_continuation_len {
            builder = builder.max_continuation_len(n);
        }
        if let Some(g) = set.max_grade {
            builder = builder.max_grade(g);
        }
        if let Some(keep) = set.keep_source_lines {
            builder = builder.keep_source_lines(keep);
        }
        builder.build()
    }
}

/// Builder for [`ExtractorConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast if any pattern is invalid or lacks a required capture group.
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    subject_code_re: Option<String>,
    grade_tail_re: Option<String>,
    semester_re: Option<String>,
    footer_re: Option<String>,
    numeric_token_re: Option<String>,
    boilerplate: ListOverride<String>,
    lookahead: Option<usize>,
    max_continuation_len: Option<usize>,
    max_grade: Option<Decimal>,
    keep_source_lines: Option<bool>,
}

impl ExtractorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Line patterns ──

    pub fn subject_code_regex(mut self, pattern: &str) -> Self {
        self.subject_code_re = Some(pattern.to_string());
        self
    }

    pub fn grade_tail_regex(mut self, pattern: &str) -> Self {
        self.grade_tail_re = Some(pattern.to_string());
        self
    }

    pub fn semester_regex(mut self, pattern: &str) -> Self {
        self.semester_re = Some(pattern.to_string());
        self
    }

    pub fn footer_regex(mut self, pattern: &str) -> Self {
        self.footer_re = Some(pattern.to_string());
        self
    }

    pub fn numeric_token_regex(mut self, pattern: &str) -> Self {
        self.numeric_token_re = Some(pattern.to_string());
        self
    }

    // ── Boilerplate patterns ──

    pub fn set_boilerplate_patterns(mut self, patterns: Vec<String>) -> Self {
        self.boilerplate = ListOverride::Replace(patterns);
        self
    }

    pub fn add_boilerplate_pattern(mut self, pattern: String) -> Self {
        match &mut self.boilerplate {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(pattern),
            ListOverride::Default => self.boilerplate = ListOverride::Extend(vec![pattern]),
        }
        self
    }

    // ── Scalars ──

    pub fn lookahead(mut self, n: usize) -> Self {
        self.lookahead = Some(n);
        self
    }

    pub fn max_continuation_len(mut self, n: usize) -> Self {
        self.max_continuation_len = Some(n);
        self
    }

    pub fn max_grade(mut self, grade: Decimal) -> Self {
        self.max_grade = Some(grade);
        self
    }

    pub fn keep_source_lines(mut self, keep: bool) -> Self {
        self.keep_source_lines = Some(keep);
        self
    }

    /// Compile all string patterns and produce an [`ExtractorConfig`].
    pub fn build(self) -> Result<ExtractorConfig, ExtractionError> {
        let compile = |name: &str,
                       opt: Option<String>,
                       groups: &[&str]|
         -> Result<Option<Regex>, ExtractionError> {
            opt.map(|p| compile_with_groups(name, &p, groups)).transpose()
        };

        let compile_list =
            |list: ListOverride<String>| -> Result<ListOverride<Regex>, ExtractionError> {
            let all = |patterns: Vec<String>| -> Result<Vec<Regex>, ExtractionError> {
                patterns
                    .iter()
                    .map(|p| compile_with_groups("boilerplate", p, &[]))
                    .collect()
            };
            match list {
                ListOverride::Default => Ok(ListOverride::Default),
                ListOverride::Replace(v) => Ok(ListOverride::Replace(all(v)?)),
                ListOverride::Extend(v) => Ok(ListOverride::Extend(all(v)?)),
            }
        };

        let lookahead = self.lookahead.unwrap_or(builtin::LOOKAHEAD);
        if !(1..=builtin::MAX_LOOKAHEAD).contains(&lookahead) {
            return Err(ExtractionError::PatternInvalid(format!(
                "lookahead must be between 1 and {}, got {}",
                builtin::MAX_LOOKAHEAD,
                lookahead
            )));
        }

        let max_continuation_len = self
            .max_continuation_len
            .unwrap_or(builtin::MAX_CONTINUATION_LEN);
        if max_continuation_len == 0 {
            return Err(ExtractionError::PatternInvalid(
                "max_continuation_len must be positive".into(),
            ));
        }

        let max_grade = self.max_grade.unwrap_or_else(builtin::max_grade);
        if max_grade.is_sign_negative() {
            return Err(ExtractionError::PatternInvalid(format!(
                "max_grade must not be negative, got {max_grade}"
            )));
        }

        Ok(ExtractorConfig {
            subject_code_re: compile("subject_code", self.subject_code_re, &["code"])?,
            grade_tail_re: compile(
                "grade_tail",
                self.grade_tail_re,
                &["units", "time", "day", "grade"],
            )?,
            semester_re: compile("semester_marker", self.semester_re, &[])?,
            footer_re: compile("footer", self.footer_re, &[])?,
            numeric_token_re: compile("numeric_token", self.numeric_token_re, &[])?,
            boilerplate: compile_list(self.boilerplate)?,
            lookahead,
            max_continuation_len,
            max_grade,
            keep_source_lines: self.keep_source_lines.unwrap_or(true),
        })
    }
}

fn compile_with_groups(
    name: &str,
    pattern: &str,
    groups: &[&str],
) -> Result<Regex, ExtractionError> {
    let re = Regex::new(pattern)
        .map_err(|e| ExtractionError::PatternInvalid(format!("{name}: {e}")))?;
    for group in groups {
        if !re.capture_names().flatten().any(|n| n == *group) {
            return Err(ExtractionError::PatternInvalid(format!(
                "{name}: missing named capture group '{group}'"
            )));
        }
    }
    Ok(re)
}
