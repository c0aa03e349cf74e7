#![doc(test(attr(deny(warnings))))]

//! Budget Insight turns a ledger snapshot and a budgeting rule into allocation
//! targets, monthly category totals and dashboard insights.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod utils;

pub use crate::core::services::{
    AggregationService, BudgetService, InsightService, InsightSnapshot, ServiceError,
    ServiceResult,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Insight tracing initialized.");
    });
}
