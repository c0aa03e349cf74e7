use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::CategoryRef, time_interval::TimeInterval};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    /// Non-negative magnitude; direction comes from `kind`.
    pub amount: f64,
    /// ISO-8601 date (`2024-03-05`) or date-time (`2024-03-05T10:00:00Z`).
    pub date: String,
    pub category: CategoryRef,
    pub kind: TransactionKind,
    #[serde(default)]
    pub is_essential: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        category: CategoryRef,
        kind: TransactionKind,
        date: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date: date.into(),
            category,
            kind,
            is_essential: false,
            recurrence: None,
            notes: None,
        }
    }

    pub fn expense(category: CategoryRef, date: NaiveDate, amount: f64) -> Self {
        Self::new(category, TransactionKind::Expense, date.to_string(), amount)
    }

    pub fn essential(mut self) -> Self {
        self.is_essential = true;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Calendar date of the transaction, or `None` when `date` does not parse.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Amount usable in aggregates: finite and non-negative.
    pub fn countable_amount(&self) -> Option<f64> {
        (self.amount.is_finite() && self.amount >= 0.0).then_some(self.amount)
    }

    pub fn category_id(&self) -> &str {
        &self.category.id
    }

    pub fn is_savings(&self) -> bool {
        self.category.is_savings()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
    Savings,
    Investment,
    DebtPayment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub interval: TimeInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            interval,
            end: None,
        }
    }

    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// First occurrence strictly after `after` for a series that began on `start`.
    ///
    /// `None` means the series has ended, or the next date cannot be represented.
    pub fn next_due(&self, start: NaiveDate, after: NaiveDate) -> Option<NaiveDate> {
        let candidate = self.interval.first_after(start, after)?;
        match self.end {
            Some(end) if candidate > end => None,
            _ => Some(candidate),
        }
    }

    pub fn label(&self) -> String {
        match self.end {
            Some(end) => format!("{} until {}", self.interval.label(), end),
            None => self.interval.label(),
        }
    }
}

pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}
