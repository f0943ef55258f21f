use crate::Result;
use chrono::{Days, Months, NaiveDate};
use core::fmt::{Display, Formatter, Result as FmtResult};
use ohno::{IntoAppError, app_err};
use serde::Serialize;

/// An inclusive range of days for which download counts are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(app_err!("window start {start} is after window end {end}"));
        }

        Ok(Self { start, end })
    }

    /// The window from `start` to one month before `today`.
    ///
    /// Month arithmetic clamps to the end of the shorter month, so March 31 maps to
    /// the last day of February.
    pub fn ending_month_before(start: NaiveDate, today: NaiveDate) -> Result<Self> {
        let end = today
            .checked_sub_months(Months::new(1))
            .into_app_err_with(|| format!("computing the month before {today}"))?;
        Self::new(start, end)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        (self.start..=self.end).contains(&day)
    }

    /// Split into consecutive windows of at most `max_days` days each.
    #[must_use]
    pub fn split(&self, max_days: u32) -> Vec<Self> {
        let span = Days::new(u64::from(max_days.max(1)) - 1);

        let mut chunks = Vec::new();
        let mut next_start = Some(self.start);
        while let Some(chunk_start) = next_start.filter(|d| *d <= self.end) {
            let chunk_end = chunk_start.checked_add_days(span).map_or(self.end, |d| d.min(self.end));
            chunks.push(Self {
                start: chunk_start,
                end: chunk_end,
            });
            next_start = chunk_end.succ_opt();
        }

        chunks
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(DateWindow::new(day(2024, 2, 1), day(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_new_accepts_single_day() {
        let window = DateWindow::new(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(window.num_days(), 1);
    }

    #[test]
    fn test_ending_month_before() {
        let window = DateWindow::ending_month_before(day(2015, 1, 1), day(2024, 6, 15)).unwrap();
        assert_eq!(window.start(), day(2015, 1, 1));
        assert_eq!(window.end(), day(2024, 5, 15));
    }

    #[test]
    fn test_ending_month_before_clamps_to_month_end() {
        let window = DateWindow::ending_month_before(day(2015, 1, 1), day(2024, 3, 31)).unwrap();
        assert_eq!(window.end(), day(2024, 2, 29));
    }

    #[test]
    fn test_ending_month_before_start_too_late() {
        assert!(DateWindow::ending_month_before(day(2024, 6, 1), day(2024, 6, 15)).is_err());
    }

    #[test]
    fn test_contains() {
        let window = DateWindow::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert!(window.contains(day(2024, 1, 1)));
        assert!(window.contains(day(2024, 1, 31)));
        assert!(!window.contains(day(2023, 12, 31)));
        assert!(!window.contains(day(2024, 2, 1)));
    }

    #[test]
    fn test_display_uses_range_syntax() {
        let window = DateWindow::new(day(2015, 1, 1), day(2024, 5, 15)).unwrap();
        assert_eq!(window.to_string(), "2015-01-01:2024-05-15");
    }

    #[test]
    fn test_split_short_window_is_single_chunk() {
        let window = DateWindow::new(day(2024, 1, 1), day(2024, 1, 10)).unwrap();
        assert_eq!(window.split(540), vec![window]);
    }

    #[test]
    fn test_split_covers_window_without_gaps_or_overlap() {
        let window = DateWindow::new(day(2015, 1, 1), day(2024, 5, 15)).unwrap();
        let chunks = window.split(540);

        assert!(chunks.len() > 1);
        assert_eq!(chunks.first().unwrap().start(), window.start());
        assert_eq!(chunks.last().unwrap().end(), window.end());

        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end().succ_opt().unwrap(), pair[1].start());
        }

        for chunk in &chunks {
            assert!(chunk.num_days() <= 540);
        }

        let total: i64 = chunks.iter().map(DateWindow::num_days).sum();
        assert_eq!(total, window.num_days());
    }

    #[test]
    fn test_split_exact_multiple() {
        let window = DateWindow::new(day(2024, 1, 1), day(2024, 1, 20)).unwrap();
        let chunks = window.split(10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].end(), day(2024, 1, 10));
        assert_eq!(chunks[1].start(), day(2024, 1, 11));
    }
}
