pub mod aggregation_service;
pub mod budget_service;
pub mod insight_service;

pub use aggregation_service::AggregationService;
pub use budget_service::BudgetService;
pub use insight_service::{
    CategoryLimitStatus, GoalProgress, InsightService, InsightSnapshot, LimitStatus, NewSpending,
    SpendingAnomalies, UnusualSpending,
};

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// A custom rule was selected without any percentage entries.
    #[error("no allocation available for the `{0}` budget rule")]
    AllocationUnavailable(String),
}
