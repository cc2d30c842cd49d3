pub mod pdftotext;

use crate::error::ExtractionError;
use std::path::Path;

/// Text extracted from a single page of a PDF.
///
/// Lines are kept exactly as the backend produced them: no trimming, tabs
/// and column padding intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    pub fn has_text(&self) -> bool {
        self.lines.iter().any(|l| !l.trim().is_empty())
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Read an input file, reporting any failure as [`ExtractionError::UnreadableFile`].
pub fn read_input(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    std::fs::read(path).map_err(|source| ExtractionError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Split extracted text into pages on form feeds (`\x0c`), the page
/// separator pdftotext emits.
pub fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

/// Fail when a backend returned pages but none of them carry any text,
/// which is what a scanned (image-only) transcript looks like.
pub(crate) fn ensure_text(pages: &[PageContent], backend: &str) -> Result<(), ExtractionError> {
    if pages.iter().any(PageContent::has_text) {
        Ok(())
    } else {
        Err(ExtractionError::PdfParseFailure(format!(
            "{backend} returned no text content (image-only or empty PDF)"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        let pages = split_pages("Page one\n\tCS74\n\x0cPage two\n");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines, vec!["Page one", "\tCS74"]);
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn test_split_pages_drops_trailing_empty_page() {
        let pages = split_pages("only page\n\x0c");
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_ensure_text_rejects_blank_pages() {
        let pages = split_pages("   \n\t\n\x0c\n");
        assert!(matches!(
            ensure_text(&pages, "pdftotext"),
            Err(ExtractionError::PdfParseFailure(_))
        ));
        assert!(ensure_text(&split_pages("CS74"), "pdftotext").is_ok());
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/nonexistent/transcript.pdf")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnreadableFile { .. }));
    }
}
