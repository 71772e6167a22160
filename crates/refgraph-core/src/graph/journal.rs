//! Journal page backfill
//!
//! Creates one journal page per day, counting back from today. Each page
//! holds a single Logseq query that surfaces every document entry whose
//! `mtime` property matches that day. Existing journal pages are never
//! touched, so user edits survive re-runs.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Days, Duration, Local, NaiveDate};
use tracing::debug;

use crate::graph::date::display_date;

/// Create missing journal pages for the last `n_days` days
///
/// Returns how many pages were actually created.
pub fn backfill_journal_pages(graph_dir: &Path, n_days: u32) -> Result<usize> {
    let journals_dir = graph_dir.join("journals");
    fs::create_dir_all(&journals_dir)
        .with_context(|| format!("Failed to create journals directory {:?}", journals_dir))?;

    let today = Local::now().date_naive();

    // Validate the whole span before writing anything
    let span = Days::new(u64::from(n_days.saturating_sub(1)));
    if today.checked_sub_days(span).is_none() {
        bail!(
            "Cannot backfill {} days of journal pages, the span starts before the supported date range",
            n_days
        );
    }

    let mut created = 0;
    for offset in 0..n_days {
        let date = today - Duration::days(offset as i64);
        if write_journal_page(&journals_dir, date)? {
            created += 1;
        }
    }

    debug!(created, total = n_days, "journal backfill finished");
    Ok(created)
}

/// Write the journal page for one day unless it already exists
fn write_journal_page(journals_dir: &Path, date: NaiveDate) -> Result<bool> {
    let path = journals_dir.join(format!("{}.md", date.format("%Y_%m_%d")));
    if path.exists() {
        return Ok(false);
    }

    fs::write(&path, journal_query(date))
        .with_context(|| format!("Failed to write journal page {:?}", path))?;
    Ok(true)
}

/// The query block placed on each journal page
fn journal_query(date: NaiveDate) -> String {
    format!(
        "{{{{query (and (property mtime <% {} %>))}}}}",
        display_date(date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_journal_query_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        assert_eq!(
            journal_query(date),
            "{{query (and (property mtime <% Apr 3rd, 2024 %>))}}"
        );
    }

    #[test]
    fn test_backfill_creates_one_page_per_day() {
        let temp = TempDir::new().unwrap();

        let created = backfill_journal_pages(temp.path(), 5).unwrap();
        assert_eq!(created, 5);

        let journals_dir = temp.path().join("journals");
        let count = fs::read_dir(&journals_dir).unwrap().count();
        assert_eq!(count, 5);

        let today = Local::now().date_naive();
        let todays_page = journals_dir.join(format!("{}.md", today.format("%Y_%m_%d")));
        assert!(todays_page.exists());
        assert_eq!(fs::read_to_string(&todays_page).unwrap(), journal_query(today));
    }

    #[test]
    fn test_backfill_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let journals_dir = temp.path().join("journals");
        fs::create_dir_all(&journals_dir).unwrap();

        let today = Local::now().date_naive();
        let todays_page = journals_dir.join(format!("{}.md", today.format("%Y_%m_%d")));
        fs::write(&todays_page, "user edits").unwrap();

        let created = backfill_journal_pages(temp.path(), 3).unwrap();
        assert_eq!(created, 2);
        assert_eq!(fs::read_to_string(&todays_page).unwrap(), "user edits");
    }

    #[test]
    fn test_backfill_is_idempotent() {
        let temp = TempDir::new().unwrap();

        assert_eq!(backfill_journal_pages(temp.path(), 4).unwrap(), 4);
        assert_eq!(backfill_journal_pages(temp.path(), 4).unwrap(), 0);
    }

    #[test]
    fn test_backfill_zero_days() {
        let temp = TempDir::new().unwrap();

        assert_eq!(backfill_journal_pages(temp.path(), 0).unwrap(), 0);
        assert!(temp.path().join("journals").exists());
    }

    #[test]
    fn test_backfill_rejects_spans_before_the_calendar() {
        let temp = TempDir::new().unwrap();

        assert!(backfill_journal_pages(temp.path(), u32::MAX).is_err());
        // The range check runs before any page is written
        let journals_dir = temp.path().join("journals");
        assert_eq!(fs::read_dir(&journals_dir).unwrap().count(), 0);
    }
}
