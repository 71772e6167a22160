//! Date formatting for Logseq pages
//!
//! Timestamps are displayed in Logseq's ordinal form, e.g. `Apr 3rd, 2024`,
//! so that journal queries over the `mtime` property line up with what the
//! renderer writes.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Timestamp format used by the remote library
pub(crate) const MTIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Format a date in ordinal display form, e.g. `Apr 3rd, 2024`
pub fn display_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%b"),
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%Y")
    )
}

/// Convert a raw remote timestamp into display form
pub fn format_mtime(mtime: &str) -> Result<String, chrono::ParseError> {
    let parsed = NaiveDateTime::parse_from_str(mtime, MTIME_FORMAT)?;
    Ok(display_date(parsed.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(24), "th");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_display_date() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        assert_eq!(display_date(date), "Apr 3rd, 2024");

        let date = NaiveDate::from_ymd_opt(2023, 12, 21).unwrap();
        assert_eq!(display_date(date), "Dec 21st, 2023");

        let date = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        assert_eq!(display_date(date), "Jan 11th, 2024");
    }

    #[test]
    fn test_format_mtime() {
        assert_eq!(
            format_mtime("2024-04-03T10:15:00Z").unwrap(),
            "Apr 3rd, 2024"
        );
    }

    #[test]
    fn test_format_mtime_rejects_garbage() {
        assert!(format_mtime("yesterday").is_err());
        assert!(format_mtime("2024-04-03").is_err());
    }
}
