use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

use crate::config::ExtractorConfig;
use crate::model::{SemesterMarker, Term};
use crate::parsing::values::collapse_whitespace;
use crate::patterns::builtin;

static SUBJECT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(builtin::SUBJECT_CODE).expect("builtin subject code pattern"));
static GRADE_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(builtin::GRADE_TAIL).expect("builtin grade tail pattern"));
static SEMESTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(builtin::SEMESTER_MARKER).expect("builtin semester pattern"));
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(builtin::FOOTER).expect("builtin footer pattern"));
static NUMERIC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(builtin::NUMERIC_TOKEN).expect("builtin numeric token pattern"));
static BOILERPLATE_RE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    builtin::BOILERPLATE
        .iter()
        .map(|p| Regex::new(p).expect("builtin boilerplate pattern"))
        .collect()
});

/// What a single line (or combined record) looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    /// `1st Semester SY 2024-2025`
    SemesterMarker(SemesterMarker),
    /// `Total Units 21`
    Footer,
    /// Page numbers, column headers, legends, student-info fields.
    Boilerplate,
    /// Starts with a subject code. `complete` when it already ends in the
    /// grade columns.
    SubjectHeader { code: String, complete: bool },
    /// Nothing but `<units> <time> <day> <grade>`.
    GradeRow,
    /// A name fragment followed by the grade columns.
    ContinuationRow,
    /// A lone short number, e.g. the `1` of `NSTP 1`.
    NumericToken,
    /// A short all-caps fragment of a wrapped subject name.
    ContinuationWord,
    Unrecognized,
}

impl LineKind {
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::SemesterMarker(_) => "semester_marker",
            LineKind::Footer => "footer",
            LineKind::Boilerplate => "boilerplate",
            LineKind::SubjectHeader { .. } => "subject_header",
            LineKind::GradeRow => "grade_row",
            LineKind::ContinuationRow => "continuation_row",
            LineKind::NumericToken => "numeric_token",
            LineKind::ContinuationWord => "continuation_word",
            LineKind::Unrecognized => "unrecognized",
        }
    }
}

/// A named predicate+extractor, tried in priority order by [`LinePatterns::classify`].
pub struct LineClassifier {
    pub name: &'static str,
    classify: fn(&LinePatterns<'_>, &str) -> Option<LineKind>,
}

/// Classifiers in priority order. The first one that matches wins.
static CLASSIFIERS: &[LineClassifier] = &[
    LineClassifier {
        name: "semester_marker",
        classify: semester_marker,
    },
    LineClassifier {
        name: "footer",
        classify: footer,
    },
    LineClassifier {
        name: "boilerplate",
        classify: boilerplate,
    },
    LineClassifier {
        name: "subject_header",
        classify: subject_header,
    },
    LineClassifier {
        name: "grade_row",
        classify: grade_row,
    },
    LineClassifier {
        name: "continuation_row",
        classify: continuation_row,
    },
    LineClassifier {
        name: "numeric_token",
        classify: numeric_token,
    },
    LineClassifier {
        name: "continuation_word",
        classify: continuation_word,
    },
];

pub fn classifier_names() -> impl Iterator<Item = &'static str> {
    CLASSIFIERS.iter().map(|c| c.name)
}

/// The resolved pattern set for one extraction run: configured overrides
/// where present, built-in defaults otherwise.
pub struct LinePatterns<'a> {
    subject_code: &'a Regex,
    grade_tail: &'a Regex,
    semester: &'a Regex,
    footer: &'a Regex,
    numeric_token: &'a Regex,
    boilerplate: Vec<&'a Regex>,
    max_continuation_len: usize,
}

impl<'a> LinePatterns<'a> {
    pub fn new(config: &'a ExtractorConfig) -> Self {
        Self {
            subject_code: config.subject_code_re.as_ref().unwrap_or(&*SUBJECT_CODE_RE),
            grade_tail: config.grade_tail_re.as_ref().unwrap_or(&*GRADE_TAIL_RE),
            semester: config.semester_re.as_ref().unwrap_or(&*SEMESTER_RE),
            footer: config.footer_re.as_ref().unwrap_or(&*FOOTER_RE),
            numeric_token: config.numeric_token_re.as_ref().unwrap_or(&*NUMERIC_TOKEN_RE),
            boilerplate: config.boilerplate.resolve(BOILERPLATE_RE.as_slice()),
            max_continuation_len: config.max_continuation_len,
        }
    }

    /// Classify a line by trying each classifier in priority order.
    pub fn classify(&self, line: &str) -> LineKind {
        CLASSIFIERS
            .iter()
            .find_map(|c| (c.classify)(self, line))
            .unwrap_or(LineKind::Unrecognized)
    }

    /// Subject code at the start of `line`, with the byte offset where the
    /// rest of the row begins. An empty `code` capture is no code at all.
    pub fn subject_code<'t>(&self, line: &'t str) -> Option<(&'t str, usize)> {
        let caps = self.subject_code.captures(line)?;
        let code = caps.name("code").filter(|m| !m.as_str().is_empty())?;
        Some((code.as_str(), code.end()))
    }

    /// Grade columns at the end of `text`.
    pub fn grade_tail<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.grade_tail.captures(text)
    }

    pub fn has_grade_tail(&self, text: &str) -> bool {
        self.grade_tail.is_match(text)
    }
}

fn semester_marker(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    let caps = p.semester.captures(line)?;
    let whole = caps.get(0)?;
    let term = caps
        .name("term")
        .and_then(|m| Term::from_str_loose(&m.as_str().replace('-', "")));
    let start_year = caps.name("start").and_then(|m| m.as_str().parse().ok());
    Some(LineKind::SemesterMarker(SemesterMarker {
        label: collapse_whitespace(whole.as_str()),
        term,
        start_year,
    }))
}

fn footer(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    p.footer.is_match(line).then_some(LineKind::Footer)
}

fn boilerplate(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    p.boilerplate
        .iter()
        .any(|re| re.is_match(line))
        .then_some(LineKind::Boilerplate)
}

fn subject_header(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    let (code, rest_start) = p.subject_code(line)?;
    Some(LineKind::SubjectHeader {
        code: code.to_string(),
        complete: p.has_grade_tail(&line[rest_start..]),
    })
}

fn grade_row(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    let caps = p.grade_tail(line)?;
    (caps.get(0)?.start() == 0).then_some(LineKind::GradeRow)
}

fn continuation_row(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    p.has_grade_tail(line).then_some(LineKind::ContinuationRow)
}

fn numeric_token(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    p.numeric_token.is_match(line).then_some(LineKind::NumericToken)
}

fn continuation_word(p: &LinePatterns<'_>, line: &str) -> Option<LineKind> {
    let short = line.chars().count() <= p.max_continuation_len;
    let has_letter = line.chars().any(char::is_alphabetic);
    let no_lowercase = !line.chars().any(char::is_lowercase);
    (short && has_letter && no_lowercase).then_some(LineKind::ContinuationWord)
}
