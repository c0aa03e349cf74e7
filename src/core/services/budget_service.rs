//! Resolves budgeting rules into target allocations.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::errors::EngineError;
use crate::ledger::budget::{Allocation, BudgetConfig, BudgetRule, CustomAllocation};

/// Stateless budgeting utilities that map a rule and income onto target amounts.
pub struct BudgetService;

impl BudgetService {
    /// Resolves the configured rule against the configured income.
    pub fn resolve(config: &BudgetConfig) -> Option<Allocation> {
        Self::resolve_allocation(config.effective_income(), &config.rule)
    }

    /// Translates `monthly_income` into per-bucket targets.
    ///
    /// Returns `None` for a custom rule without percentage entries; callers should treat
    /// that as "insights unavailable" rather than as a zero budget.
    pub fn resolve_allocation(monthly_income: f64, rule: &BudgetRule) -> Option<Allocation> {
        let income = if monthly_income.is_finite() && monthly_income > 0.0 {
            monthly_income
        } else {
            0.0
        };

        let targets: BTreeMap<String, f64> = match rule {
            BudgetRule::FiftyThirtyTwenty
            | BudgetRule::SeventyTwentyTen
            | BudgetRule::FifteenSixtyFiveTwenty => rule
                .fixed_split()?
                .iter()
                .map(|(bucket, fraction)| (bucket.to_string(), income * fraction))
                .collect(),
            BudgetRule::Custom { allocations } => {
                if allocations.is_empty() {
                    warn!("custom budget rule has no allocations; nothing to resolve");
                    return None;
                }
                let total = Self::custom_total(allocations);
                if total > 100.0 {
                    warn!(total, "custom budget rule allocates more than 100% of income");
                }
                let mut targets = BTreeMap::new();
                for entry in allocations {
                    let share = if entry.percentage.is_finite() {
                        entry.percentage.max(0.0)
                    } else {
                        0.0
                    };
                    *targets.entry(entry.category_id.clone()).or_insert(0.0) +=
                        income * (share / 100.0);
                }
                targets
            }
        };

        debug!(rule = rule.label(), income, "resolved budget allocation");
        Some(Allocation {
            rule: rule.label().to_string(),
            targets,
        })
    }

    /// Savings amount the allocation sets aside: its `savings` target, or 0 without one.
    pub fn planned_savings(allocation: &Allocation) -> f64 {
        allocation.savings().unwrap_or(0.0)
    }

    /// Strict check for onboarding flows; the resolver itself never rejects a rule.
    pub fn validate_rule(rule: &BudgetRule) -> Result<(), EngineError> {
        let BudgetRule::Custom { allocations } = rule else {
            return Ok(());
        };
        if allocations.is_empty() {
            return Err(EngineError::InvalidInput(
                "custom rule needs at least one category percentage".into(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in allocations {
            if entry.category_id.trim().is_empty() {
                return Err(EngineError::InvalidInput(
                    "custom rule entry is missing a category id".into(),
                ));
            }
            if !entry.percentage.is_finite() || entry.percentage < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "percentage for `{}` must be a non-negative number",
                    entry.category_id
                )));
            }
            if !seen.insert(entry.category_id.as_str()) {
                return Err(EngineError::InvalidInput(format!(
                    "category `{}` appears more than once",
                    entry.category_id
                )));
            }
        }
        let total = Self::custom_total(allocations);
        if total > 100.0 + 1e-9 {
            return Err(EngineError::InvalidInput(format!(
                "custom percentages add up to {total:.2}%, above 100%"
            )));
        }
        Ok(())
    }

    fn custom_total(allocations: &[CustomAllocation]) -> f64 {
        allocations
            .iter()
            .map(|entry| entry.percentage)
            .filter(|percentage| percentage.is_finite() && *percentage > 0.0)
            .sum()
    }
}
