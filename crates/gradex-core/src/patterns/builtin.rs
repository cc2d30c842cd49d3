use rust_decimal::Decimal;

use crate::patterns::schema::{ListMode, PatternSetDef};

/// Subject code such as `CS74` or `MATH101A` at the start of a line.
pub const SUBJECT_CODE: &str = r"^(?P<code>[A-Z]{2,6}\d{1,4}[A-Z]?)(?:[\t ]|$)";

/// `<units> <time-range> <day> <grade>` at the end of a line, tab or space
/// separated. Also matches a whole line holding only those columns.
pub const GRADE_TAIL: &str = r"(?i)(?:^|[\t ]+)(?P<units>\d{1,2}(?:[.,]\d{1,2})?)[\t ]+(?P<time>\d{1,2}:\d{2}[\t ]*(?:[AP]M)?[\t ]*-[\t ]*\d{1,2}:\d{2}[\t ]*(?:[AP]M)?|TBA)[\t ]+(?P<day>[A-Z]{1,8})[\t ]+(?P<grade>\d[.,]\d{1,2})$";

/// `1st Semester SY 2024-2025`, `Summer 2023-2024`, `Second Semester, A.Y. 2022-2023`.
pub const SEMESTER_MARKER: &str = r"(?i)^(?P<term>1st|2nd|first|second|summer|mid-?year)[\t ]+(?:(?:semester|sem\.?|term)[\t ]*,?[\t ]*)?(?:(?:s\.?y\.?|a\.?y\.?|school[\t ]+year)[\t ]*:?[\t ]*)?(?P<start>\d{4})[\t ]*-[\t ]*(?P<end>\d{4})";

pub const FOOTER: &str = r"(?i)^total[\t ]+(?:units|credits?|load)\b";

/// A lone short number, e.g. the `1` of a wrapped `NSTP 1`.
pub const NUMERIC_TOKEN: &str = r"^\d{1,2}$";

/// Page furniture, column headers, legends and student-info fields.
pub const BOILERPLATE: &[&str] = &[
    r"(?i)^page[\t ]+\d+(?:[\t ]+of[\t ]+\d+)?$",
    r"(?i)^(?:subject[\t ]+)?code\b.*\b(?:description|title|units|grade)\b",
    r"(?i)^(?:notes?|legend|remarks)\b",
    r"(?i)^grading[\t ]+system\b",
    r"(?i)nothing[\t ]+follows",
    r"(?i)^(?:student[\t ]+(?:name|no\.?|number|id)|name|course|program|year[\t ]+level|date[\t ]+printed)[\t ]*:",
    r"(?i)^(?:gwa|general[\t ]+weighted[\t ]+average)\b",
];

pub const LOOKAHEAD: usize = 3;
pub const MAX_LOOKAHEAD: usize = 8;
pub const MAX_CONTINUATION_LEN: usize = 40;

/// Worst passing-or-failing grade on the 1.00-5.00 scale.
pub fn max_grade() -> Decimal {
    Decimal::new(500, 2)
}

/// The built-in pattern set with every field filled in.
pub fn default_set() -> PatternSetDef {
    PatternSetDef {
        name: Some("default".into()),
        description: Some("Registrar transcript layout (tab or space separated columns)".into()),
        subject_code: Some(SUBJECT_CODE.into()),
        grade_tail: Some(GRADE_TAIL.into()),
        semester_marker: Some(SEMESTER_MARKER.into()),
        footer: Some(FOOTER.into()),
        numeric_token: Some(NUMERIC_TOKEN.into()),
        boilerplate: Some(BOILERPLATE.iter().map(|s| s.to_string()).collect()),
        boilerplate_mode: ListMode::Replace,
        lookahead: Some(LOOKAHEAD),
        max_continuation_len: Some(MAX_CONTINUATION_LEN),
        max_grade: Some(max_grade()),
        keep_source_lines: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_builtin_patterns_compile() {
        for p in [SUBJECT_CODE, GRADE_TAIL, SEMESTER_MARKER, FOOTER, NUMERIC_TOKEN] {
            assert!(Regex::new(p).is_ok(), "pattern failed: {p}");
        }
        for p in BOILERPLATE {
            assert!(Regex::new(p).is_ok(), "pattern failed: {p}");
        }
    }

    #[test]
    fn test_default_set_is_complete() {
        let set = default_set();
        assert!(set.subject_code.is_some());
        assert!(set.grade_tail.is_some());
        assert_eq!(set.lookahead, Some(3));
        assert_eq!(set.boilerplate_mode, ListMode::Replace);
        assert_eq!(set.boilerplate.map(|b| b.len()), Some(BOILERPLATE.len()));
    }

    #[test]
    fn test_grade_tail_tab_and_space_variants() {
        let re = Regex::new(GRADE_TAIL).unwrap();
        assert!(re.is_match("3.00\t08:00AM-11:00AM\tSat\t1.00"));
        assert!(re.is_match("3.00   08:00 AM - 11:00 AM   MWF   2.25"));
        assert!(re.is_match("CS74\tHUMAN COMPUTER INTERACTION\t3\tTBA\tTBA\t0.00"));
        assert!(!re.is_match("HUMAN COMPUTER INTERACTION"));
    }
}
