use serde::{Deserialize, Serialize};

use super::{category::Category, transaction::Transaction};

/// Consistent snapshot of the category taxonomy and the transactions tagged with it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Ledger seeded with the default taxonomy and no history.
    pub fn with_default_categories() -> Self {
        Self::new(super::category::default_categories(), Vec::new())
    }

    pub fn add_category(&mut self, category: Category) -> String {
        let id = category.id.clone();
        self.categories.push(category);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> uuid::Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Categories the engine evaluates; archived entries and duplicate ids are skipped.
    pub fn active_categories(&self) -> impl Iterator<Item = &Category> {
        let mut seen = std::collections::HashSet::new();
        self.categories
            .iter()
            .filter(move |category| !category.archived && seen.insert(category.id.as_str()))
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
