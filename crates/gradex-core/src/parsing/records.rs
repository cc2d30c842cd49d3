use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{CombinedRecord, Diagnostics, GradeRecord, SemesterMarker, UnparsedCandidate};
use crate::parsing::classify::{LineKind, LinePatterns};
use crate::parsing::values::{collapse_whitespace, parse_decimal};
use crate::trace::{emit, TraceSink, TraceStepType};

/// Why a subject-like record could not become a [`GradeRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("no subject code")]
    MissingCode,
    #[error("no grade columns")]
    NoGradeColumns,
    #[error("no subject name")]
    MissingName,
    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("grade {grade} is outside the grading scale (max {max})")]
    GradeOutOfScale { grade: Decimal, max: Decimal },
    #[error("grade columns without a subject code")]
    Orphan,
    #[error("name fragment after a complete subject row")]
    TrailingFragment,
}

/// Fields of one fully-parsed subject row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRow {
    pub code: String,
    pub name: String,
    pub units: Decimal,
    pub grade: Decimal,
}

/// Split `<code> <name...> <units> <time> <day> <grade>` into its fields.
///
/// The grade columns are anchored at the end of the text and the name is
/// whatever sits between them and the code, with whitespace runs collapsed.
pub fn parse_subject_row(
    text: &str,
    patterns: &LinePatterns<'_>,
    max_grade: Decimal,
) -> Result<SubjectRow, RowError> {
    let (code, rest_start) = patterns.subject_code(text).ok_or(RowError::MissingCode)?;
    let rest = &text[rest_start..];
    let tail = patterns.grade_tail(rest).ok_or(RowError::NoGradeColumns)?;
    let tail_start = tail.get(0).map_or(rest.len(), |m| m.start());

    let name = collapse_whitespace(&rest[..tail_start]);
    if name.is_empty() {
        return Err(RowError::MissingName);
    }

    let number = |field: &'static str| -> Result<Decimal, RowError> {
        let raw = tail.name(field).map_or("", |m| m.as_str());
        parse_decimal(raw).map_err(|_| RowError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
    };
    let units = number("units")?;
    let grade = number("grade")?;
    if grade.is_sign_negative() || grade > max_grade {
        return Err(RowError::GradeOutOfScale {
            grade,
            max: max_grade,
        });
    }

    Ok(SubjectRow {
        code: code.to_string(),
        name,
        units,
        grade,
    })
}

/// Accumulator threaded through the record scan.
#[derive(Debug, Default)]
pub struct ScanState {
    pub semester: Option<SemesterMarker>,
    pub records: Vec<GradeRecord>,
    pub diagnostics: Diagnostics,
    /// Set while the records just scanned end in an emitted subject row,
    /// possibly followed by name fragments.
    after_row: bool,
}

impl ScanState {
    fn skip(&mut self, record: &CombinedRecord, sink: &mut dyn TraceSink, what: &str) {
        self.diagnostics.lines_skipped += record.line_count();
        emit(sink, TraceStepType::Skip, record.first_line, || {
            format!("{what}: {}", record.text)
        });
    }

    fn unparsed(&mut self, record: &CombinedRecord, sink: &mut dyn TraceSink, err: RowError) {
        tracing::warn!(
            line = record.first_line,
            reason = %err,
            text = %record.text,
            "unparsed candidate"
        );
        emit(sink, TraceStepType::Unparsed, record.first_line, || {
            format!("{err}: {}", record.text)
        });
        self.diagnostics.lines_unparsed += record.line_count();
        self.diagnostics.unparsed_candidates.push(UnparsedCandidate {
            line_number: record.first_line,
            text: record.text.clone(),
            reason: err.to_string(),
        });
    }

    /// Fold one combined record into the state.
    pub fn step(
        mut self,
        record: CombinedRecord,
        patterns: &LinePatterns<'_>,
        max_grade: Decimal,
        keep_source_lines: bool,
        sink: &mut dyn TraceSink,
    ) -> Self {
        if record.is_merged() {
            self.diagnostics.records_combined += 1;
        }

        let after_row = std::mem::take(&mut self.after_row);
        match patterns.classify(&record.text) {
            LineKind::SemesterMarker(marker) => {
                tracing::debug!(line = record.first_line, semester = %marker, "semester change");
                emit(sink, TraceStepType::SemesterChange, record.first_line, || {
                    marker.label.clone()
                });
                self.diagnostics.semester_markers += 1;
                self.diagnostics.lines_skipped += record.line_count();
                self.semester = Some(marker);
            }
            LineKind::SubjectHeader { .. } => {
                match parse_subject_row(&record.text, patterns, max_grade) {
                    Ok(row) => {
                        emit(sink, TraceStepType::Emit, record.first_line, || {
                            format!(
                                "{} {} units={} grade={}",
                                row.code, row.name, row.units, row.grade
                            )
                        });
                        self.diagnostics.lines_emitted += record.line_count();
                        self.records.push(GradeRecord {
                            subject_code: row.code,
                            subject_name: row.name,
                            units: row.units,
                            grade: row.grade,
                            semester: self.semester.as_ref().map(|m| m.label.clone()),
                            source_line: keep_source_lines.then(|| record.source_lines.join("\n")),
                        });
                        self.after_row = true;
                    }
                    Err(err) => self.unparsed(&record, sink, err),
                }
            }
            LineKind::GradeRow | LineKind::ContinuationRow => {
                self.unparsed(&record, sink, RowError::Orphan)
            }
            // A wrapped name line that landed below an already-complete row
            LineKind::ContinuationWord if after_row => {
                self.unparsed(&record, sink, RowError::TrailingFragment);
                self.after_row = true;
            }
            other => self.skip(&record, sink, other.name()),
        }
        self
    }
}

/// Run the semester-tracking scan over combined records.
pub fn scan_records<I>(
    records: I,
    patterns: &LinePatterns<'_>,
    max_grade: Decimal,
    keep_source_lines: bool,
    sink: &mut dyn TraceSink,
) -> ScanState
where
    I: IntoIterator<Item = CombinedRecord>,
{
    records.into_iter().fold(ScanState::default(), |state, record| {
        state.step(record, patterns, max_grade, keep_source_lines, &mut *sink)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::model::NormalizedLine;
    use crate::trace::{NoopSink, TraceBundle};
    use rust_decimal_macros::dec;

    fn single(number: usize, text: &str) -> CombinedRecord {
        CombinedRecord::single(&NormalizedLine {
            number,
            text: text.into(),
        })
    }

    fn complete(number: usize, text: &str) -> CombinedRecord {
        CombinedRecord {
            complete: true,
            ..single(number, text)
        }
    }

    fn row(text: &str) -> Result<SubjectRow, RowError> {
        let config = ExtractorConfig::default();
        parse_subject_row(text, &LinePatterns::new(&config), dec!(5.00))
    }

    #[test]
    fn test_parse_tab_row() {
        let r = row("CS74\tHUMAN COMPUTER INTERACTION\t3.00\t08:00AM-11:00AM\tSat\t1.75").unwrap();
        assert_eq!(r.code, "CS74");
        assert_eq!(r.name, "HUMAN COMPUTER INTERACTION");
        assert_eq!(r.units, dec!(3.00));
        assert_eq!(r.grade, dec!(1.75));
    }

    #[test]
    fn test_parse_space_row_collapses_name() {
        let r = row("MATH21   CALCULUS    I   5.0   07:30 AM - 09:00 AM   MWF   2,25").unwrap();
        assert_eq!(r.name, "CALCULUS I");
        assert_eq!(r.units, dec!(5.0));
        assert_eq!(r.grade, dec!(2.25));
    }

    #[test]
    fn test_zero_grade_kept() {
        let r = row("CS101\tDATA STRUCTURES\t3\tTBA\tTBA\t0.00").unwrap();
        assert_eq!(r.grade, Decimal::ZERO);
    }

    #[test]
    fn test_row_errors() {
        assert_eq!(row("CS99\tORPHAN NAME"), Err(RowError::NoGradeColumns));
        assert_eq!(row("lowercase\t3\tTBA\tTBA\t1.00"), Err(RowError::MissingCode));
        assert_eq!(row("CS99\t3.00\t08:00AM-11:00AM\tSat\t1.00"), Err(RowError::MissingName));
        assert!(matches!(
            row("CS99\tBAD\t3.00\t08:00AM-11:00AM\tSat\t7.00"),
            Err(RowError::GradeOutOfScale { .. })
        ));
    }

    #[test]
    fn test_scan_tracks_semester_and_accounts_lines() {
        let config = ExtractorConfig::default();
        let patterns = LinePatterns::new(&config);
        let merged = CombinedRecord {
            text: "CS27\tNSTP 1\tNATIONAL SERVICE 1\t3.00\t08:00AM-11:00AM\tSat\t1.00".into(),
            first_line: 3,
            last_line: 5,
            source_lines: vec![
                "CS27\tNSTP 1\tNATIONAL SERVICE".into(),
                "1".into(),
                "3.00\t08:00AM-11:00AM\tSat\t1.00".into(),
            ],
            complete: true,
        };
        let input = vec![
            single(1, "Page 1 of 2"),
            single(2, "1st Semester SY 2023-2024"),
            merged,
            single(6, "3.00\t08:00AM-11:00AM\tSat\t1.50"),
            single(7, "2nd Semester SY 2023-2024"),
            complete(8, "CS74\tHCI\t3.00\t08:00AM-11:00AM\tSat\t0.00"),
            single(9, "Total Units 6"),
        ];
        let mut sink = NoopSink;
        let state = scan_records(input, &patterns, dec!(5.00), true, &mut sink);

        assert_eq!(state.records.len(), 2);
        assert_eq!(state.records[0].semester.as_deref(), Some("1st Semester SY 2023-2024"));
        assert_eq!(state.records[1].semester.as_deref(), Some("2nd Semester SY 2023-2024"));
        assert_eq!(state.records[0].source_line.as_deref().map(|s| s.lines().count()), Some(3));

        let d = &state.diagnostics;
        assert_eq!(d.records_combined, 1);
        assert_eq!(d.semester_markers, 2);
        assert_eq!(d.lines_emitted, 4);
        assert_eq!(d.lines_unparsed, 1);
        assert_eq!(d.lines_skipped, 4);
        assert_eq!(d.unparsed_candidates[0].line_number, 6);
        assert_eq!(d.unparsed_candidates[0].reason, "grade columns without a subject code");
        assert_eq!(state.semester.map(|m| m.label), Some("2nd Semester SY 2023-2024".into()));
    }

    #[test]
    fn test_empty_code_capture_is_orphan() {
        let config = crate::config::ExtractorConfigBuilder::new()
            .subject_code_regex(r"^(?P<code>[A-Z]*)\d*(?:[\t ]|$)")
            .build()
            .unwrap();
        let patterns = LinePatterns::new(&config);
        assert_eq!(
            parse_subject_row("101\tINTRO\t3\tTBA\tTBA\t1.00", &patterns, dec!(5.00)),
            Err(RowError::MissingCode)
        );

        let mut sink = NoopSink;
        let state = scan_records(
            vec![complete(1, "101\tINTRO\t3\tTBA\tTBA\t1.00")],
            &patterns,
            dec!(5.00),
            true,
            &mut sink,
        );
        assert!(state.records.is_empty());
        assert_eq!(state.diagnostics.lines_unparsed, 1);
        assert_eq!(
            state.diagnostics.unparsed_candidates[0].reason,
            "grade columns without a subject code"
        );
    }

    #[test]
    fn test_fragment_after_complete_row_is_reported() {
        let config = ExtractorConfig::default();
        let patterns = LinePatterns::new(&config);
        let mut sink = NoopSink;
        let state = scan_records(
            vec![
                complete(1, "CS74  HUMAN COMPUTER  3.00  08:00AM-11:00AM  Sat  1.75"),
                single(2, "INTERACTION"),
                single(3, "AND DESIGN"),
                single(4, "Total Units 3"),
                single(5, "STRAY"),
            ],
            &patterns,
            dec!(5.00),
            true,
            &mut sink,
        );

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].subject_name, "HUMAN COMPUTER");
        let d = &state.diagnostics;
        let reported: Vec<(usize, &str)> = d
            .unparsed_candidates
            .iter()
            .map(|c| (c.line_number, c.reason.as_str()))
            .collect();
        assert_eq!(
            reported,
            vec![
                (2, "name fragment after a complete subject row"),
                (3, "name fragment after a complete subject row"),
            ]
        );
        // the footer breaks the run, so the last word is ordinary noise
        assert_eq!(d.lines_skipped, 2);
        assert_eq!(d.lines_emitted + d.lines_unparsed + d.lines_skipped, 5);
    }

    #[test]
    fn test_source_lines_dropped_when_disabled() {
        let config = ExtractorConfig::default();
        let patterns = LinePatterns::new(&config);
        let mut sink = NoopSink;
        let state = scan_records(
            vec![complete(1, "CS74\tHCI\t3\tTBA\tTBA\t1.00")],
            &patterns,
            dec!(5.00),
            false,
            &mut sink,
        );
        assert_eq!(state.records[0].source_line, None);
        assert_eq!(state.records[0].semester, None);
    }

    #[test]
    fn test_trace_events_for_each_outcome() {
        let config = ExtractorConfig::default();
        let patterns = LinePatterns::new(&config);
        let mut bundle = TraceBundle::default();
        scan_records(
            vec![
                single(1, "Summer SY 2024-2025"),
                complete(2, "CS74\tHCI\t3\tTBA\tTBA\t1.00"),
                single(3, "CS75\tNO GRADE"),
                single(4, "Juan dela Cruz"),
            ],
            &patterns,
            dec!(5.00),
            true,
            &mut bundle,
        );
        let kinds: Vec<TraceStepType> = bundle.events.iter().map(|e| e.step_type).collect();
        assert_eq!(
            kinds,
            vec![
                TraceStepType::SemesterChange,
                TraceStepType::Emit,
                TraceStepType::Unparsed,
                TraceStepType::Skip,
            ]
        );
    }
}
