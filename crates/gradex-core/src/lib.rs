pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod patterns;
pub mod trace;

use std::path::Path;

use config::ExtractorConfig;
use error::ExtractionError;
use extraction::{read_input, PdfExtractor};
use model::{CombinedRecord, NormalizedLine, ParsedTranscript};
use parsing::classify::{LineKind, LinePatterns};
use trace::{NoopSink, TraceBundle, TraceSink};

/// Grade extraction pipeline bound to one configuration.
///
/// Stateless between calls; a single extractor can process any number of
/// transcripts, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct GradeExtractor {
    config: ExtractorConfig,
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GradeExtractor>();
};

impl GradeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    // ── Individual stages ──

    /// Read a transcript from disk into normalized lines. `.txt` files are
    /// taken as already-extracted text; anything else goes through `backend`.
    pub fn read_lines(
        &self,
        path: &Path,
        backend: &dyn PdfExtractor,
    ) -> Result<Vec<NormalizedLine>, ExtractionError> {
        let bytes = read_input(path)?;
        if is_text_dump(path) {
            tracing::debug!(path = %path.display(), "reading text dump");
            return Ok(self.normalize(&String::from_utf8_lossy(&bytes)));
        }
        self.pdf_lines(&bytes, backend)
    }

    fn pdf_lines(
        &self,
        pdf_bytes: &[u8],
        backend: &dyn PdfExtractor,
    ) -> Result<Vec<NormalizedLine>, ExtractionError> {
        let pages = backend.extract_pages(pdf_bytes)?;
        let lines = parsing::normalize::normalize_pages(&pages);
        tracing::debug!(
            backend = backend.backend_name(),
            pages = pages.len(),
            lines = lines.len(),
            "normalized extracted text"
        );
        Ok(lines)
    }

    pub fn normalize(&self, text: &str) -> Vec<NormalizedLine> {
        parsing::normalize::normalize_text(text)
    }

    pub fn classify_line(&self, line: &str) -> LineKind {
        LinePatterns::new(&self.config).classify(line)
    }

    pub fn combine(&self, lines: &[NormalizedLine]) -> Vec<CombinedRecord> {
        let patterns = LinePatterns::new(&self.config);
        parsing::combine::combine_lines(lines, &patterns, self.config.lookahead)
    }

    pub fn parse_records(
        &self,
        lines: &[NormalizedLine],
        sink: &mut dyn TraceSink,
    ) -> ParsedTranscript {
        parsing::parse_transcript(lines, &self.config, sink)
    }

    // ── Pipelines ──

    /// Run all stages over already-extracted text.
    pub fn extract_from_text(&self, text: &str) -> ParsedTranscript {
        self.parse_records(&self.normalize(text), &mut NoopSink)
    }

    /// Same as [`extract_from_text`](Self::extract_from_text), also
    /// returning every pipeline decision.
    pub fn extract_from_text_traced(&self, text: &str) -> (ParsedTranscript, TraceBundle) {
        let mut bundle = TraceBundle::default();
        let transcript = self.parse_records(&self.normalize(text), &mut bundle);
        (transcript, bundle)
    }

    /// Extract text from PDF bytes with `backend`, then parse it.
    pub fn extract_from_pdf(
        &self,
        pdf_bytes: &[u8],
        backend: &dyn PdfExtractor,
    ) -> Result<ParsedTranscript, ExtractionError> {
        let lines = self.pdf_lines(pdf_bytes, backend)?;
        Ok(self.parse_records(&lines, &mut NoopSink))
    }

    /// Read a transcript from disk. `.txt` files are taken as already
    /// extracted text; anything else goes through `backend`.
    pub fn extract_from_path(
        &self,
        path: &Path,
        backend: &dyn PdfExtractor,
    ) -> Result<ParsedTranscript, ExtractionError> {
        let lines = self.read_lines(path, backend)?;
        Ok(self.parse_records(&lines, &mut NoopSink))
    }

    pub fn extract_from_path_traced(
        &self,
        path: &Path,
        backend: &dyn PdfExtractor,
    ) -> Result<(ParsedTranscript, TraceBundle), ExtractionError> {
        let lines = self.read_lines(path, backend)?;
        let mut bundle = TraceBundle::default();
        let transcript = self.parse_records(&lines, &mut bundle);
        Ok((transcript, bundle))
    }
}

/// Whether `path` names a plain-text transcript dump rather than a PDF.
pub fn is_text_dump(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Extract grades from PDF bytes with the default configuration.
pub fn extract_grades(
    pdf_bytes: &[u8],
    backend: &dyn PdfExtractor,
) -> Result<ParsedTranscript, ExtractionError> {
    GradeExtractor::new().extract_from_pdf(pdf_bytes, backend)
}

/// Extract grades from a file with the default configuration.
pub fn extract_grades_from_path(
    path: &Path,
    backend: &dyn PdfExtractor,
) -> Result<ParsedTranscript, ExtractionError> {
    GradeExtractor::new().extract_from_path(path, backend)
}

/// Extract grades from already-extracted text with the default configuration.
pub fn extract_grades_from_text(text: &str) -> ParsedTranscript {
    GradeExtractor::new().extract_from_text(text)
}
