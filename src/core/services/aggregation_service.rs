//! Sums transactions into per-category calendar-month totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::ledger::{category::Category, period::MonthWindow, transaction::Transaction};

pub struct AggregationService;

impl AggregationService {
    /// Total spend for `category_id` in the calendar month containing `anchor`.
    ///
    /// Returns 0 when nothing matches. Transactions with malformed dates or amounts
    /// are skipped.
    pub fn category_total(
        transactions: &[Transaction],
        category_id: &str,
        anchor: NaiveDate,
    ) -> f64 {
        debug_assert!(!category_id.is_empty(), "category id must not be empty");
        Self::window_total(transactions, MonthWindow::containing(anchor), |txn| {
            txn.category_id() == category_id
        })
    }

    /// Sums every countable transaction inside `window` accepted by `predicate`.
    pub fn window_total<F>(transactions: &[Transaction], window: MonthWindow, predicate: F) -> f64
    where
        F: Fn(&Transaction) -> bool,
    {
        transactions
            .iter()
            .filter(|txn| predicate(txn))
            .filter_map(|txn| {
                let date = txn.parsed_date();
                let amount = txn.countable_amount();
                match (date, amount) {
                    (Some(date), Some(amount)) if window.contains(date) => Some(amount),
                    (None, _) | (_, None) => {
                        debug!(transaction = %txn.id, "skipping malformed transaction");
                        None
                    }
                    _ => None,
                }
            })
            .sum()
    }

    /// Month totals for every supplied category, including categories with no spend.
    pub fn monthly_spending_by_category<'a, I>(
        transactions: &[Transaction],
        categories: I,
        anchor: NaiveDate,
    ) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let window = MonthWindow::containing(anchor);
        let mut totals: BTreeMap<String, f64> = categories
            .into_iter()
            .map(|category| (category.id.clone(), 0.0))
            .collect();
        for txn in transactions {
            let Some(total) = totals.get_mut(txn.category_id()) else {
                continue;
            };
            if let (Some(date), Some(amount)) = (txn.parsed_date(), txn.countable_amount()) {
                if window.contains(date) {
                    *total += amount;
                }
            }
        }
        totals
    }

    /// Sum of every countable transaction across the full history accepted by `predicate`.
    pub fn lifetime_total<F>(transactions: &[Transaction], predicate: F) -> f64
    where
        F: Fn(&Transaction) -> bool,
    {
        transactions
            .iter()
            .filter(|txn| predicate(txn) && txn.parsed_date().is_some())
            .filter_map(Transaction::countable_amount)
            .sum()
    }
}
