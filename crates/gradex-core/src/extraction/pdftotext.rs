use crate::error::ExtractionError;
use crate::extraction::{ensure_text, split_pages, PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// By default runs `pdftotext -layout`, which keeps each transcript row on
/// one line with its columns separated by runs of spaces. [`raw`](Self::raw)
/// drops `-layout` and returns text in content-stream order instead.
pub struct PdftotextExtractor {
    layout: bool,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor { layout: true }
    }

    pub fn raw() -> Self {
        PdftotextExtractor { layout: false }
    }

    pub fn is_layout(&self) -> bool {
        self.layout
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn command_args(&self, pdf_path: &std::path::Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = Vec::new();
        if self.layout {
            args.push("-layout".into());
        }
        args.push("-enc".into());
        args.push("UTF-8".into());
        args.push(pdf_path.as_os_str().to_owned());
        args.push("-".into()); // output to stdout
        args
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
        // pdftotext reads from a path, so stage the bytes in a temp file.
        let mut tmpfile = tempfile::NamedTempFile::new()?;
        tmpfile.write_all(pdf_bytes)?;
        tmpfile.flush()?;

        let output = Command::new("pdftotext")
            .args(self.command_args(tmpfile.path()))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::PdftotextNotFound
                } else {
                    ExtractionError::PdfParseFailure(format!("pdftotext failed to start: {e}"))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(code, stderr = %stderr.trim(), "pdftotext rejected the document");
            return Err(ExtractionError::PdfParseFailure(format!(
                "pdftotext exited with code {code}: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let pages = split_pages(&text);
        ensure_text(&pages, self.backend_name())?;

        tracing::debug!(
            pages = pages.len(),
            layout = self.layout,
            "pdftotext extracted text"
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}
