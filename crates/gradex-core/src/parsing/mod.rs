pub mod classify;
pub mod combine;
pub mod normalize;
pub mod records;
pub mod values;

use crate::config::ExtractorConfig;
use crate::model::{NormalizedLine, ParsedTranscript};
use crate::trace::{emit, TraceSink, TraceStepType};
use classify::LinePatterns;
use combine::Recombiner;
use records::scan_records;

/// Recombine normalized lines and scan them into grade records.
///
/// Never fails: lines that look like data but do not parse are reported in
/// the diagnostics instead.
pub fn parse_transcript(
    lines: &[NormalizedLine],
    config: &ExtractorConfig,
    sink: &mut dyn TraceSink,
) -> ParsedTranscript {
    let patterns = LinePatterns::new(config);

    if sink.enabled() || tracing::enabled!(tracing::Level::TRACE) {
        for line in lines {
            let kind = patterns.classify(&line.text);
            tracing::trace!(
                line = line.number,
                kind = kind.name(),
                text = %line.text,
                "classified"
            );
            emit(sink, TraceStepType::Classify, line.number, || {
                format!("{}: {}", kind.name(), line.text)
            });
        }
    }

    let combined: Vec<_> = Recombiner::new(lines, &patterns, config.lookahead)
        .inspect(|record| {
            if record.is_merged() {
                emit(&mut *sink, TraceStepType::Combine, record.first_line, || {
                    format!(
                        "lines {}-{} -> {}",
                        record.first_line, record.last_line, record.text
                    )
                });
            }
        })
        .collect();
    tracing::debug!(
        lines = lines.len(),
        records = combined.len(),
        "recombined lines"
    );

    let state = scan_records(
        combined,
        &patterns,
        config.max_grade,
        config.keep_source_lines,
        sink,
    );

    let mut diagnostics = state.diagnostics;
    diagnostics.lines_total = lines.len();
    debug_assert_eq!(
        diagnostics.lines_total,
        diagnostics.lines_emitted + diagnostics.lines_unparsed + diagnostics.lines_skipped
    );

    let transcript = ParsedTranscript {
        records: state.records,
        diagnostics,
    };
    tracing::info!(
        records = transcript.records.len(),
        unparsed = transcript.diagnostics.unparsed_candidates.len(),
        semesters = transcript.diagnostics.semester_markers,
        "{}",
        transcript.summary()
    );
    transcript
}
