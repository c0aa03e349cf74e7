#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budget_insight::ledger::{Category, CategoryKind, Ledger, Transaction, TransactionKind};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated base directory for config tests.
pub fn temp_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Small builder over [`Ledger`] used by the integration suites.
pub struct LedgerBuilder {
    ledger: Ledger,
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self {
            ledger: Ledger::default(),
        }
    }

    pub fn seeded() -> Self {
        Self {
            ledger: Ledger::with_default_categories(),
        }
    }

    pub fn category(mut self, id: &str, kind: CategoryKind) -> Self {
        self.ledger.add_category(Category::new(id, id, kind));
        self
    }

    pub fn expense(self, category: &str, on: NaiveDate, amount: f64) -> Self {
        self.push(category, TransactionKind::Expense, &on.to_string(), amount, false)
    }

    pub fn essential(self, category: &str, on: NaiveDate, amount: f64) -> Self {
        self.push(category, TransactionKind::Expense, &on.to_string(), amount, true)
    }

    pub fn saving(self, category: &str, on: NaiveDate, amount: f64) -> Self {
        self.push(category, TransactionKind::Savings, &on.to_string(), amount, false)
    }

    pub fn raw(self, category: &str, raw_date: &str, amount: f64) -> Self {
        self.push(category, TransactionKind::Expense, raw_date, amount, false)
    }

    fn push(
        mut self,
        category: &str,
        kind: TransactionKind,
        raw_date: &str,
        amount: f64,
        essential: bool,
    ) -> Self {
        let reference = self
            .ledger
            .category(category)
            .unwrap_or_else(|| panic!("unknown category `{category}`"))
            .reference();
        let mut txn = Transaction::new(reference, kind, raw_date, amount);
        txn.is_essential = essential;
        self.ledger.add_transaction(txn);
        self
    }

    pub fn build(self) -> Ledger {
        self.ledger
    }
}
