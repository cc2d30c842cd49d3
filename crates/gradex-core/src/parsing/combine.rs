use crate::model::{CombinedRecord, NormalizedLine};
use crate::parsing::classify::{LineKind, LinePatterns};

/// Forward-only position over the normalized lines.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [NormalizedLine],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [NormalizedLine]) -> Self {
        Self { lines, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// The line `offset` positions past the current one, without consuming.
    fn peek(&self, offset: usize) -> Option<&'a NormalizedLine> {
        self.lines.get(self.pos + offset)
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.lines.len());
    }
}

/// What a line following an open subject header does to it.
enum Absorb {
    /// Joined, and the record is now complete.
    Finish(&'static str),
    /// Joined, keep looking.
    Continue(&'static str),
    /// Not part of this record.
    Stop,
}

fn absorb_rule(kind: &LineKind) -> Absorb {
    match kind {
        LineKind::GradeRow => Absorb::Finish("\t"),
        LineKind::ContinuationRow => Absorb::Finish(" "),
        LineKind::NumericToken | LineKind::ContinuationWord => Absorb::Continue(" "),
        _ => Absorb::Stop,
    }
}

fn append(record: &mut CombinedRecord, line: &NormalizedLine, sep: &str) {
    record.text.push_str(sep);
    record.text.push_str(&line.text);
    record.last_line = line.number;
    record.source_lines.push(line.text.clone());
}

/// Consume the next logical record from `cursor`.
///
/// Only a subject header without grade columns opens a combination; it then
/// absorbs at most `lookahead` following lines. Everything else is returned
/// as a single-line record.
pub fn next_record(
    cursor: &mut LineCursor<'_>,
    patterns: &LinePatterns<'_>,
    lookahead: usize,
) -> Option<CombinedRecord> {
    let first = cursor.peek(0)?;
    let mut record = CombinedRecord::single(first);

    match patterns.classify(&first.text) {
        LineKind::SubjectHeader { complete: true, .. } => {
            record.complete = true;
            cursor.advance(1);
        }
        LineKind::SubjectHeader {
            complete: false, ..
        } => {
            let mut consumed = 1;
            while consumed <= lookahead {
                let Some(line) = cursor.peek(consumed) else {
                    break;
                };
                match absorb_rule(&patterns.classify(&line.text)) {
                    Absorb::Finish(sep) => {
                        append(&mut record, line, sep);
                        record.complete = true;
                        consumed += 1;
                        break;
                    }
                    Absorb::Continue(sep) => {
                        append(&mut record, line, sep);
                        consumed += 1;
                    }
                    Absorb::Stop => break,
                }
            }
            cursor.advance(consumed);
        }
        _ => cursor.advance(1),
    }

    Some(record)
}

/// Iterator adapter over [`next_record`].
pub struct Recombiner<'a, 'p> {
    cursor: LineCursor<'a>,
    patterns: &'p LinePatterns<'p>,
    lookahead: usize,
}

impl<'a, 'p> Recombiner<'a, 'p> {
    pub fn new(lines: &'a [NormalizedLine], patterns: &'p LinePatterns<'p>, lookahead: usize) -> Self {
        Self {
            cursor: LineCursor::new(lines),
            patterns,
            lookahead,
        }
    }
}

impl Iterator for Recombiner<'_, '_> {
    type Item = CombinedRecord;

    fn next(&mut self) -> Option<CombinedRecord> {
        next_record(&mut self.cursor, self.patterns, self.lookahead)
    }
}

/// Recombine a full line sequence.
pub fn combine_lines(
    lines: &[NormalizedLine],
    patterns: &LinePatterns<'_>,
    lookahead: usize,
) -> Vec<CombinedRecord> {
    Recombiner::new(lines, patterns, lookahead).collect()
}
