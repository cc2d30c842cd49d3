use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, non-empty line of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLine {
    /// 1-based position in the extracted text, counting blank lines.
    pub number: usize,
    pub text: String,
}

/// One logical transcript row, built from one or more normalized lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub text: String,
    pub first_line: usize,
    pub last_line: usize,
    /// The physical lines that were merged, in order.
    pub source_lines: Vec<String>,
    /// True when the record ends in the grade columns.
    pub complete: bool,
}

impl CombinedRecord {
    pub fn single(line: &NormalizedLine) -> Self {
        CombinedRecord {
            text: line.text.clone(),
            first_line: line.number,
            last_line: line.number,
            source_lines: vec![line.text.clone()],
            complete: false,
        }
    }

    /// Number of normalized lines this record consumed.
    pub fn line_count(&self) -> usize {
        self.source_lines.len()
    }

    pub fn is_merged(&self) -> bool {
        self.source_lines.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    First,
    Second,
    Summer,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::First => write!(f, "1st Semester"),
            Term::Second => write!(f, "2nd Semester"),
            Term::Summer => write!(f, "Summer"),
        }
    }
}

impl Term {
    pub fn from_str_loose(s: &str) -> Option<Term> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "1st" | "first" => Some(Term::First),
            "2nd" | "second" => Some(Term::Second),
            "summer" | "midyear" | "mid-year" => Some(Term::Summer),
            _ => None,
        }
    }
}

/// A semester header such as "1st Semester SY 2024-2025".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterMarker {
    pub label: String,
    pub term: Option<Term>,
    pub start_year: Option<u16>,
}

impl SemesterMarker {
    /// Chronological key, available when both the school year and the term
    /// were recognized.
    pub fn sort_key(&self) -> Option<(u16, Term)> {
        Some((self.start_year?, self.term?))
    }
}

impl fmt::Display for SemesterMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// One subject row extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub subject_code: String,
    pub subject_name: String,
    pub units: Decimal,
    /// `0.00` means the course is ongoing and has no grade yet.
    pub grade: Decimal,
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl GradeRecord {
    pub fn is_ongoing(&self) -> bool {
        self.grade.is_zero()
    }

    /// Whether the subject looks like a National Service Training Program
    /// course. Consumers exclude these from honor GWA.
    pub fn is_nstp(&self) -> bool {
        let upper = self.subject_name.to_uppercase();
        upper.contains("NSTP") || upper.contains("NATIONAL SERVICE TRAINING")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparsedCandidate {
    pub line_number: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Normalized (non-empty) lines fed to recombination.
    pub lines_total: usize,
    /// Lines recognized as non-data: markers, footers, headers, stray text.
    pub lines_skipped: usize,
    /// Records that were merged from more than one line.
    pub records_combined: usize,
    pub unparsed_candidates: Vec<UnparsedCandidate>,
    pub semester_markers: usize,
    /// Lines that ended up inside an emitted grade record.
    pub lines_emitted: usize,
    /// Lines that ended up inside an unparsed candidate.
    pub lines_unparsed: usize,
}

impl Diagnostics {
    /// Fraction of subject-like rows that parsed, or `None` when the
    /// document had no subject-like rows at all.
    pub fn match_rate(&self, records_emitted: usize) -> Option<f64> {
        let candidates = records_emitted + self.unparsed_candidates.len();
        if candidates == 0 {
            None
        } else {
            Some(records_emitted as f64 / candidates as f64)
        }
    }

    pub fn summary(&self, records_emitted: usize) -> String {
        let candidates = records_emitted + self.unparsed_candidates.len();
        let mut s = format!("{records_emitted} of {candidates} candidate rows extracted");
        if !self.unparsed_candidates.is_empty() {
            s.push_str(&format!(
                "; review {} unparsed line(s)",
                self.unparsed_candidates.len()
            ));
        }
        s
    }
}

/// Extractor output: grade records in document order plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTranscript {
    pub records: Vec<GradeRecord>,
    pub diagnostics: Diagnostics,
}

impl ParsedTranscript {
    pub fn summary(&self) -> String {
        self.diagnostics.summary(self.records.len())
    }

    pub fn match_rate(&self) -> Option<f64> {
        self.diagnostics.match_rate(self.records.len())
    }
}
