use crate::extraction::PageContent;
use crate::model::NormalizedLine;

/// Trim every line, drop the ones that end up empty and number the rest.
///
/// Numbers are the 1-based physical line positions in the extracted text,
/// so diagnostics can point back at the original. The returned sequence is
/// dense: index `i + 1` is always the next non-empty line after index `i`.
pub fn normalize_text(text: &str) -> Vec<NormalizedLine> {
    normalize_iter(text.lines())
}

/// Same as [`normalize_text`] for text already split into pages. Numbering
/// runs on across page boundaries.
pub fn normalize_pages(pages: &[PageContent]) -> Vec<NormalizedLine> {
    normalize_iter(pages.iter().flat_map(|p| p.lines.iter().map(|s| s.as_str())))
}

fn normalize_iter<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<NormalizedLine> {
    lines
        .enumerate()
        .filter_map(|(i, raw)| {
            let text = clean_line(raw);
            if text.is_empty() {
                None
            } else {
                Some(NormalizedLine { number: i + 1, text })
            }
        })
        .collect()
}

/// Remove PDF artifacts and surrounding whitespace from one raw line.
/// Interior tabs are column separators and are kept.
fn clean_line(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{0}' | '\u{FEFF}' | '\u{200B}' => {}
            '\u{A0}' | '\u{2007}' | '\u{202F}' => s.push(' '),
            _ => s.push(c),
        }
    }
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_dropped_and_numbered() {
        let lines = normalize_text("  Header  \n\n\t\nCS74\tHCI\n   \nTotal Units 3\n");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Header", "CS74\tHCI", "Total Units 3"]);
        let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 4, 6]);
    }

    #[test]
    fn test_interior_tabs_kept() {
        let lines = normalize_text("\t3.00\t08:00AM-11:00AM\tSat\t1.00\t");
        assert_eq!(lines[0].text, "3.00\t08:00AM-11:00AM\tSat\t1.00");
    }

    #[test]
    fn test_artifacts_removed() {
        let lines = normalize_text("\u{FEFF}CS74\u{A0}HCI\u{0}\r\n\u{200B}\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "CS74 HCI");
    }

    #[test]
    fn test_pages_numbered_continuously() {
        let pages = vec![
            PageContent {
                page_number: 1,
                lines: vec!["a".into(), "".into()],
            },
            PageContent {
                page_number: 2,
                lines: vec!["b".into()],
            },
        ];
        let lines = normalize_pages(&pages);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn test_no_line_is_blank() {
        let lines = normalize_text(" \n\u{A0}\n\u{FEFF}\nx\n\t \t");
        assert!(lines.iter().all(|l| !l.text.trim().is_empty()));
        assert_eq!(lines.len(), 1);
    }
}
