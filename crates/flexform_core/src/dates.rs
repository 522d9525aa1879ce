use chrono::NaiveDate;

/// Three-letter month tokens as they appear in the legacy spreadsheet
/// export (e.g. `01OCT25`).
const MONTHS: [(&str, u32); 12] = [
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

/// Fallback formats tried after the `DDMMMYY` rewrite fails.
const KNOWN_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Normalizes a date-like spreadsheet cell.
///
/// The 7-character `DDMMMYY` pattern (`01OCT25`) becomes `2025-10-01`;
/// anything else is tried against a short list of common formats. `None`
/// means the caller should store a null and count a warning -- a bad date is
/// never fatal.
pub fn normalize(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_ddmmmyy(trimmed) {
        return Some(date);
    }

    KNOWN_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

fn parse_ddmmmyy(value: &str) -> Option<NaiveDate> {
    if value.len() != 7 {
        return None;
    }
    let day: u32 = value.get(0..2)?.parse().ok()?;
    let month_token = value.get(2..5)?.to_ascii_uppercase();
    let year: i32 = value.get(5..7)?.parse().ok()?;

    let month = MONTHS
        .iter()
        .find(|(token, _)| *token == month_token)
        .map(|(_, number)| *number)?;

    // Two-digit years in the legacy sheet are all post-2000.
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddmmmyy_rewrites_to_iso() {
        assert_eq!(
            normalize("01OCT25"),
            NaiveDate::from_ymd_opt(2025, 10, 1)
        );
        assert_eq!(
            normalize("17jan24"),
            NaiveDate::from_ymd_opt(2024, 1, 17)
        );
    }

    #[test]
    fn iso_and_slash_formats_pass_through() {
        assert_eq!(
            normalize("2025-10-01"),
            NaiveDate::from_ymd_opt(2025, 10, 1)
        );
        assert_eq!(
            normalize("10/01/2025"),
            NaiveDate::from_ymd_opt(2025, 10, 1)
        );
    }

    #[test]
    fn garbage_is_none_not_an_error() {
        assert_eq!(normalize("not-a-date"), None);
        assert_eq!(normalize("99XYZ25"), None);
        assert_eq!(normalize(""), None);
    }
}
