use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub fn monthly() -> Self {
        Self {
            every: 1,
            unit: TimeUnit::Month,
        }
    }

    /// One step forward from `from`, or `None` when the result leaves the calendar range.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        let every = i64::from(self.every);
        match self.unit {
            TimeUnit::Day => from.checked_add_signed(Duration::days(every)),
            TimeUnit::Week => from.checked_add_signed(Duration::weeks(every)),
            TimeUnit::Month => checked_shift_month(from, every),
            TimeUnit::Year => checked_shift_month(from, every * 12),
        }
    }

    /// First occurrence of the series anchored at `anchor` that falls strictly after `after`.
    ///
    /// Occurrences are computed from the anchor, so month-end anchors do not drift after a
    /// short month. Returns `None` for a zero-length interval or when the date is out of range.
    pub fn first_after(&self, anchor: NaiveDate, after: NaiveDate) -> Option<NaiveDate> {
        if anchor > after {
            return Some(anchor);
        }
        let every = i64::from(self.every);
        if every == 0 {
            return None;
        }
        match self.unit {
            TimeUnit::Day => first_after_linear(anchor, after, every),
            TimeUnit::Week => first_after_linear(anchor, after, every * 7),
            TimeUnit::Month => first_after_months(anchor, after, every),
            TimeUnit::Year => first_after_months(anchor, after, every * 12),
        }
    }

    pub fn label(&self) -> String {
        match (self.every, &self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {:?}{}", n, unit, if n > 1 { "s" } else { "" }),
        }
    }
}

fn first_after_linear(
    anchor: NaiveDate,
    after: NaiveDate,
    interval_days: i64,
) -> Option<NaiveDate> {
    let diff = (after - anchor).num_days();
    let steps = diff.div_euclid(interval_days) + 1;
    anchor.checked_add_signed(Duration::days(steps.checked_mul(interval_days)?))
}

fn first_after_months(
    anchor: NaiveDate,
    after: NaiveDate,
    interval_months: i64,
) -> Option<NaiveDate> {
    let diff = month_index(after) - month_index(anchor);
    let steps = diff.div_euclid(interval_months);
    let candidate = checked_shift_month(anchor, steps.checked_mul(interval_months)?)?;
    if candidate > after {
        return Some(candidate);
    }
    checked_shift_month(anchor, (steps + 1).checked_mul(interval_months)?)
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Moves `date` by whole calendar months, clamping the day to the target month length.
pub fn checked_shift_month(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let index = month_index(date).checked_add(months)?;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Like [`checked_shift_month`], keeping `date` when the shift leaves the calendar range.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    checked_shift_month(date, i64::from(months)).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year.saturating_add(1) } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last_current| last_current.day())
        .unwrap_or(28)
}
