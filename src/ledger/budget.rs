use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bucket keys produced by the fixed budgeting rules.
pub mod bucket {
    pub const NEEDS: &str = "needs";
    pub const WANTS: &str = "wants";
    pub const SAVINGS: &str = "savings";
    pub const EXPENSES: &str = "expenses";
    pub const DEBT_OR_DONATION: &str = "debt_or_donation";
}

/// Closed set of income-splitting policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "name")]
pub enum BudgetRule {
    #[default]
    #[serde(rename = "50/30/20")]
    FiftyThirtyTwenty,
    #[serde(rename = "70/20/10")]
    SeventyTwentyTen,
    #[serde(rename = "15/65/20")]
    FifteenSixtyFiveTwenty,
    #[serde(rename = "custom")]
    Custom {
        #[serde(default)]
        allocations: Vec<CustomAllocation>,
    },
}

impl BudgetRule {
    pub fn custom(allocations: Vec<CustomAllocation>) -> Self {
        Self::Custom { allocations }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetRule::FiftyThirtyTwenty => "50/30/20",
            BudgetRule::SeventyTwentyTen => "70/20/10",
            BudgetRule::FifteenSixtyFiveTwenty => "15/65/20",
            BudgetRule::Custom { .. } => "custom",
        }
    }

    /// Fixed `(bucket, fraction)` splits; `None` for a custom rule.
    pub fn fixed_split(&self) -> Option<&'static [(&'static str, f64)]> {
        match self {
            BudgetRule::FiftyThirtyTwenty => Some(&[
                (bucket::NEEDS, 0.50),
                (bucket::WANTS, 0.30),
                (bucket::SAVINGS, 0.20),
            ]),
            BudgetRule::SeventyTwentyTen => Some(&[
                (bucket::EXPENSES, 0.70),
                (bucket::SAVINGS, 0.20),
                (bucket::DEBT_OR_DONATION, 0.10),
            ]),
            BudgetRule::FifteenSixtyFiveTwenty => Some(&[
                (bucket::WANTS, 0.15),
                (bucket::NEEDS, 0.65),
                (bucket::SAVINGS, 0.20),
            ]),
            BudgetRule::Custom { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomAllocation {
    pub category_id: String,
    /// Share of monthly income, 0-100.
    pub percentage: f64,
}

impl CustomAllocation {
    pub fn new(category_id: impl Into<String>, percentage: f64) -> Self {
        Self {
            category_id: category_id.into(),
            percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub target: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub current_amount: f64,
}

/// User budgeting preferences; always read as the latest snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BudgetConfig {
    pub rule: BudgetRule,
    pub monthly_income: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_goal: Option<SavingsGoal>,
}

impl BudgetConfig {
    pub fn new(rule: BudgetRule, monthly_income: f64) -> Self {
        Self {
            rule,
            monthly_income,
            savings_goal: None,
        }
    }

    pub fn with_savings_goal(mut self, goal: SavingsGoal) -> Self {
        self.savings_goal = Some(goal);
        self
    }

    /// Income clamped to a usable non-negative value.
    pub fn effective_income(&self) -> f64 {
        if self.monthly_income.is_finite() && self.monthly_income > 0.0 {
            self.monthly_income
        } else {
            0.0
        }
    }

    pub fn current_savings(&self) -> f64 {
        self.savings_goal
            .as_ref()
            .map(|goal| goal.current_amount)
            .filter(|amount| amount.is_finite())
            .unwrap_or(0.0)
    }
}

/// Target amounts keyed by bucket name (fixed rules) or category id (custom rule).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Allocation {
    pub rule: String,
    pub targets: BTreeMap<String, f64>,
}

impl Allocation {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.targets.get(key).copied()
    }

    pub fn savings(&self) -> Option<f64> {
        self.get(bucket::SAVINGS)
    }

    pub fn total(&self) -> f64 {
        self.targets.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_deserialize_from_named_tags() {
        let config: BudgetConfig =
            serde_json::from_str(r#"{"rule":{"name":"70/20/10"},"monthly_income":4000}"#)
                .unwrap();
        assert_eq!(config.rule, BudgetRule::SeventyTwentyTen);
        assert!(config.savings_goal.is_none());
    }

    #[test]
    fn custom_rule_without_list_deserializes_empty() {
        let config: BudgetConfig =
            serde_json::from_str(r#"{"rule":{"name":"custom"},"monthly_income":3000}"#).unwrap();
        assert_eq!(config.rule, BudgetRule::custom(Vec::new()));
        assert_eq!(config.rule.label(), "custom");
        assert!(config.rule.fixed_split().is_none());
    }

    #[test]
    fn default_rule_is_fifty_thirty_twenty() {
        assert_eq!(BudgetRule::default(), BudgetRule::FiftyThirtyTwenty);
        assert_eq!(BudgetConfig::default().rule.label(), "50/30/20");
    }

    #[test]
    fn fixed_splits_cover_whole_income() {
        for rule in [
            BudgetRule::FiftyThirtyTwenty,
            BudgetRule::SeventyTwentyTen,
            BudgetRule::FifteenSixtyFiveTwenty,
        ] {
            let total: f64 = rule.fixed_split().unwrap().iter().map(|(_, f)| f).sum();
            assert!((total - 1.0).abs() < 1e-12, "{} sums to {total}", rule.label());
        }
    }

    #[test]
    fn effective_income_ignores_negative_values() {
        let mut config = BudgetConfig::new(BudgetRule::default(), -10.0);
        assert_eq!(config.effective_income(), 0.0);
        config.monthly_income = f64::INFINITY;
        assert_eq!(config.effective_income(), 0.0);
        config.monthly_income = 2500.0;
        assert_eq!(config.effective_income(), 2500.0);
        assert_eq!(config.current_savings(), 0.0);
    }
}
