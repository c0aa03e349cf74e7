//! Derives dashboard insights from a ledger snapshot and the budget configuration.
//!
//! Every computation here is a pure function of its arguments. Missing data degrades
//! to neutral values; the only hard failure is a custom rule with nothing to allocate.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InsightSettings;
use crate::errors::EngineError;
use crate::ledger::{
    budget::{Allocation, BudgetConfig},
    period::MonthWindow,
    Ledger,
};
use crate::utils::Clock;

use super::{AggregationService, BudgetService, ServiceError, ServiceResult};

/// Category whose spend grew faster than the configured threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnusualSpending {
    pub category_id: String,
    /// Current-month total.
    pub amount: f64,
    pub previous_amount: f64,
    /// Growth as a fraction, `0.30` meaning 30%.
    pub percentage_increase: f64,
}

/// Spend in a category that had nothing the month before.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSpending {
    pub category_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpendingAnomalies {
    pub unusual: Vec<UnusualSpending>,
    pub new_spending: Vec<NewSpending>,
}

impl SpendingAnomalies {
    pub fn is_empty(&self) -> bool {
        self.unusual.is_empty() && self.new_spending.is_empty()
    }
}

/// Terms of the guilt-free balance for the evaluated month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GuiltFreeBreakdown {
    pub monthly_income: f64,
    pub essential_expenses: f64,
    pub savings_contribution: f64,
    pub planned_savings: f64,
    pub balance: f64,
}

impl GuiltFreeBreakdown {
    pub fn new(
        monthly_income: f64,
        essential_expenses: f64,
        savings_contribution: f64,
        planned_savings: f64,
    ) -> Self {
        Self {
            monthly_income,
            essential_expenses,
            savings_contribution,
            planned_savings,
            balance: monthly_income - essential_expenses - savings_contribution - planned_savings,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.balance < 0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    UnderLimit,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryLimitStatus {
    pub category_id: String,
    pub name: String,
    pub limit: f64,
    pub spent: f64,
    pub percent_used: f64,
    pub warning_threshold: u8,
    pub status: LimitStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalProgress {
    pub target: f64,
    pub current_amount: f64,
    pub remaining: f64,
    pub percent_complete: f64,
    pub deadline: NaiveDate,
    /// Whole calendar months between the evaluation month and the deadline month.
    pub months_remaining: u32,
    pub required_monthly: f64,
    pub projected_monthly_savings: f64,
    pub on_track: bool,
}

/// Derived dashboard state. Recomputed on every read and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightSnapshot {
    pub as_of: NaiveDate,
    pub allocation: Allocation,
    pub guilt_free: GuiltFreeBreakdown,
    pub guilt_free_balance: f64,
    pub monthly_spending_by_category: BTreeMap<String, f64>,
    pub unusual_spending: Vec<UnusualSpending>,
    pub new_spending: Vec<NewSpending>,
    pub projection_months: u32,
    pub projected_savings: f64,
    pub category_limits: Vec<CategoryLimitStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_progress: Option<GoalProgress>,
}

impl InsightSnapshot {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Orchestrates the resolver and aggregator into insight values.
#[derive(Debug, Clone, Default)]
pub struct InsightService {
    settings: InsightSettings,
}

impl InsightService {
    /// Builds a service over validated settings; a NaN or negative threshold is rejected.
    pub fn new(settings: InsightSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &InsightSettings {
        &self.settings
    }

    /// Discretionary money left in the month containing `as_of`.
    pub fn guilt_free_balance(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        as_of: NaiveDate,
    ) -> f64 {
        let allocation = BudgetService::resolve(config);
        self.guilt_free_breakdown(ledger, config, allocation.as_ref(), as_of)
            .balance
    }

    pub fn guilt_free_breakdown(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        allocation: Option<&Allocation>,
        as_of: NaiveDate,
    ) -> GuiltFreeBreakdown {
        let window = MonthWindow::containing(as_of);
        let essential_expenses =
            AggregationService::window_total(&ledger.transactions, window, |txn| txn.is_essential);
        let savings_contribution =
            AggregationService::window_total(&ledger.transactions, window, |txn| txn.is_savings());
        let planned_savings = allocation
            .map(BudgetService::planned_savings)
            .unwrap_or(0.0);
        GuiltFreeBreakdown::new(
            config.effective_income(),
            essential_expenses,
            savings_contribution,
            planned_savings,
        )
    }

    /// Compares each active category's month against the previous calendar month.
    pub fn unusual_spending(&self, ledger: &Ledger, as_of: NaiveDate) -> SpendingAnomalies {
        let current_window = MonthWindow::containing(as_of);
        let previous_window = current_window.previous();
        let threshold = self.settings.unusual_spending_threshold;
        let mut anomalies = SpendingAnomalies::default();

        for category in ledger.active_categories() {
            let in_category = |txn: &crate::ledger::Transaction| txn.category_id() == category.id;
            let current =
                AggregationService::window_total(&ledger.transactions, current_window, in_category);
            let previous = AggregationService::window_total(
                &ledger.transactions,
                previous_window,
                in_category,
            );

            if previous <= 0.0 {
                if current > 0.0 && current >= self.settings.new_spending_floor {
                    anomalies.new_spending.push(NewSpending {
                        category_id: category.id.clone(),
                        amount: current,
                    });
                }
                continue;
            }

            let increase = (current - previous) / previous;
            if increase > threshold {
                anomalies.unusual.push(UnusualSpending {
                    category_id: category.id.clone(),
                    amount: current,
                    previous_amount: previous,
                    percentage_increase: increase,
                });
            }
        }

        debug!(
            unusual = anomalies.unusual.len(),
            new_spending = anomalies.new_spending.len(),
            month = %current_window.label(),
            "evaluated month-over-month spending"
        );
        anomalies
    }

    /// Non-savings history spread over the normalization window.
    pub fn average_monthly_expenses(&self, ledger: &Ledger) -> f64 {
        let months = self.settings.expense_normalization_months.max(1) as f64;
        AggregationService::lifetime_total(&ledger.transactions, |txn| !txn.is_savings()) / months
    }

    pub fn projected_monthly_savings(&self, ledger: &Ledger, config: &BudgetConfig) -> f64 {
        config.effective_income() - self.average_monthly_expenses(ledger)
    }

    /// Savings balance extrapolated `months_ahead` months; negative means a shortfall.
    pub fn projected_savings(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        months_ahead: u32,
    ) -> f64 {
        config.current_savings()
            + self.projected_monthly_savings(ledger, config) * months_ahead as f64
    }

    /// Usage of every active category that declares a monthly limit.
    pub fn category_limits(&self, ledger: &Ledger, as_of: NaiveDate) -> Vec<CategoryLimitStatus> {
        let window = MonthWindow::containing(as_of);
        ledger
            .active_categories()
            .filter_map(|category| {
                let limit = category
                    .monthly_limit
                    .filter(|limit| limit.is_finite() && *limit > 0.0)?;
                let spent = AggregationService::window_total(&ledger.transactions, window, |txn| {
                    txn.category_id() == category.id
                });
                let percent_used = spent / limit * 100.0;
                let warning_threshold = category.effective_warning_threshold();
                let status = if spent > limit {
                    LimitStatus::Exceeded
                } else if percent_used >= warning_threshold as f64 {
                    LimitStatus::Warning
                } else {
                    LimitStatus::UnderLimit
                };
                Some(CategoryLimitStatus {
                    category_id: category.id.clone(),
                    name: category.name.clone(),
                    limit,
                    spent,
                    percent_used,
                    warning_threshold,
                    status,
                })
            })
            .collect()
    }

    pub fn goal_progress(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        as_of: NaiveDate,
    ) -> Option<GoalProgress> {
        let goal = config.savings_goal.as_ref()?;
        let current_amount = config.current_savings();
        let remaining = (goal.target - current_amount).max(0.0);
        let percent_complete = if goal.target > 0.0 {
            (current_amount / goal.target * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };
        let month_index = |date: NaiveDate| date.year() * 12 + date.month0() as i32;
        let months_remaining = (month_index(goal.deadline) - month_index(as_of)).max(0) as u32;
        let required_monthly = if months_remaining > 0 {
            remaining / months_remaining as f64
        } else {
            remaining
        };
        let projected_monthly_savings = self.projected_monthly_savings(ledger, config);
        Some(GoalProgress {
            target: goal.target,
            current_amount,
            remaining,
            percent_complete,
            deadline: goal.deadline,
            months_remaining,
            required_monthly,
            projected_monthly_savings,
            on_track: remaining <= 0.0 || projected_monthly_savings >= required_monthly,
        })
    }

    /// Full dashboard snapshot for the month containing `as_of`.
    pub fn snapshot(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        as_of: NaiveDate,
    ) -> ServiceResult<InsightSnapshot> {
        let Some(allocation) = BudgetService::resolve(config) else {
            warn!(
                rule = config.rule.label(),
                "insights unavailable: budget rule has no allocation"
            );
            return Err(ServiceError::AllocationUnavailable(
                config.rule.label().to_string(),
            ));
        };

        let guilt_free = self.guilt_free_breakdown(ledger, config, Some(&allocation), as_of);
        let anomalies = self.unusual_spending(ledger, as_of);
        let projection_months = self.settings.projection_months;
        let snapshot = InsightSnapshot {
            as_of,
            guilt_free_balance: guilt_free.balance,
            guilt_free,
            monthly_spending_by_category: AggregationService::monthly_spending_by_category(
                &ledger.transactions,
                ledger.active_categories(),
                as_of,
            ),
            unusual_spending: anomalies.unusual,
            new_spending: anomalies.new_spending,
            projection_months,
            projected_savings: self.projected_savings(ledger, config, projection_months),
            category_limits: self.category_limits(ledger, as_of),
            goal_progress: self.goal_progress(ledger, config, as_of),
            allocation,
        };
        debug!(
            as_of = %as_of,
            balance = snapshot.guilt_free_balance,
            "computed insight snapshot"
        );
        Ok(snapshot)
    }

    pub fn snapshot_now(
        &self,
        ledger: &Ledger,
        config: &BudgetConfig,
        clock: &dyn Clock,
    ) -> ServiceResult<InsightSnapshot> {
        self.snapshot(ledger, config, clock.today())
    }
}
