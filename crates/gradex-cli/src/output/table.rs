use gradex_core::model::{NormalizedLine, ParsedTranscript};
use gradex_core::parsing::classify::LineKind;
use std::fmt::Write;

/// Grade records grouped under their semester headings.
pub fn format_records(transcript: &ParsedTranscript) -> String {
    let mut out = String::new();
    if transcript.records.is_empty() {
        out.push_str("No grade records found.\n");
        return out;
    }

    let code_w = column_width(transcript.records.iter().map(|r| r.subject_code.len()), 4);
    let name_w = column_width(transcript.records.iter().map(|r| r.subject_name.len()), 7)
        .min(48);

    let mut current: Option<Option<&str>> = None;
    for r in &transcript.records {
        let semester = r.semester.as_deref();
        if current != Some(semester) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "=== {} ===\n", semester.unwrap_or("(no semester)"));
            let _ = writeln!(
                out,
                "  {:<code_w$}  {:<name_w$}  {:>5}  {:>5}",
                "Code", "Subject", "Units", "Grade"
            );
            current = Some(semester);
        }
        let ongoing = if r.is_ongoing() { "  (ongoing)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<code_w$}  {:<name_w$}  {:>5}  {:>5}{ongoing}",
            r.subject_code,
            truncate(&r.subject_name, name_w),
            r.units.to_string(),
            r.grade.to_string(),
        );
    }
    out
}

/// Summary line plus every unparsed candidate, for stderr.
pub fn format_diagnostics(transcript: &ParsedTranscript) -> String {
    let d = &transcript.diagnostics;
    let mut out = String::new();
    let _ = writeln!(out, "{}", transcript.summary());
    let _ = writeln!(
        out,
        "  {} line(s): {} in records, {} unparsed, {} skipped; {} multi-line record(s), {} semester marker(s)",
        d.lines_total,
        d.lines_emitted,
        d.lines_unparsed,
        d.lines_skipped,
        d.records_combined,
        d.semester_markers
    );
    for c in &d.unparsed_candidates {
        let _ = writeln!(
            out,
            "  unparsed line {}: {} [{}]",
            c.line_number,
            c.text.replace('\t', " | "),
            c.reason
        );
    }
    out
}

/// One row per normalized line with its classification.
pub fn format_line_kinds(rows: &[(&NormalizedLine, LineKind)]) -> String {
    let mut out = String::new();
    let num_w = column_width(rows.iter().map(|(l, _)| l.number.to_string().len()), 4);
    for (line, kind) in rows {
        let detail = match kind {
            LineKind::SemesterMarker(m) => match m.sort_key() {
                Some((year, term)) => format!(" [{term} {year}]"),
                None => String::new(),
            },
            LineKind::SubjectHeader { code, complete } => {
                format!(" [{code}{}]", if *complete { "" } else { ", open" })
            }
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{:>num_w$}  {:<17}  {}{detail}",
            line.number,
            kind.name(),
            line.text.replace('\t', " | ")
        );
    }
    out
}

fn column_width(lens: impl Iterator<Item = usize>, min: usize) -> usize {
    lens.max().unwrap_or(0).max(min)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
