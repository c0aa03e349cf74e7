//! Ledger domain models consumed by the insight engine.

pub mod budget;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod time_interval;
pub mod transaction;

pub use budget::{Allocation, BudgetConfig, BudgetRule, CustomAllocation, SavingsGoal};
pub use category::{default_categories, Category, CategoryKind, CategoryRef};
pub use ledger::Ledger;
pub use period::MonthWindow;
pub use time_interval::{TimeInterval, TimeUnit};
pub use transaction::{Recurrence, Transaction, TransactionKind};
