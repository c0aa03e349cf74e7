use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::time_interval::{days_in_month, shift_month};

/// Inclusive calendar-month window used for every monthly aggregate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Returns the window covering the calendar month that contains `anchor`.
    pub fn containing(anchor: NaiveDate) -> Self {
        let start = anchor.with_day(1).unwrap_or(anchor);
        let last_day = days_in_month(anchor.year(), anchor.month());
        let end = anchor.with_day(last_day).unwrap_or(anchor);
        Self { start, end }
    }

    /// Both ends are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The full calendar month before this one.
    pub fn previous(&self) -> Self {
        Self::containing(shift_month(self.start, -1))
    }

    pub fn next(&self) -> Self {
        Self::containing(shift_month(self.start, 1))
    }

    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn containing_spans_whole_month() {
        let window = MonthWindow::containing(date(2024, 2, 17));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
        assert!(window.contains(date(2024, 2, 1)));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 3, 1)));
        assert!(!window.contains(date(2024, 1, 31)));
    }

    #[test]
    fn previous_from_month_end_is_full_prior_month() {
        let march = MonthWindow::containing(date(2023, 3, 31));
        let february = march.previous();
        assert_eq!(february.start, date(2023, 2, 1));
        assert_eq!(february.end, date(2023, 2, 28));
    }

    #[test]
    fn january_rolls_back_into_december() {
        let january = MonthWindow::containing(date(2025, 1, 5));
        let december = january.previous();
        assert_eq!(december.label(), "2024-12");
        assert_eq!(december.next(), january);
    }
}
