use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Warning threshold applied when a category with a limit does not define one.
pub const DEFAULT_WARNING_THRESHOLD: u8 = 80;

/// Categorises ledger activity for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<f64>,
    /// Percent of `monthly_limit` (0-100) at which spending starts to warn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_threshold: Option<u8>,
    #[serde(default)]
    pub archived: bool,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            color: String::new(),
            kind,
            budget_percentage: None,
            monthly_limit: None,
            warning_threshold: None,
            archived: false,
        }
    }

    pub fn with_style(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = icon.into();
        self.color = color.into();
        self
    }

    pub fn with_limit(mut self, monthly_limit: f64, warning_threshold: Option<u8>) -> Self {
        self.monthly_limit = Some(monthly_limit);
        self.warning_threshold = warning_threshold.map(|value| value.min(100));
        self
    }

    pub fn with_budget_percentage(mut self, percentage: f64) -> Self {
        self.budget_percentage = Some(percentage);
        self
    }

    pub fn effective_warning_threshold(&self) -> u8 {
        self.warning_threshold
            .unwrap_or(DEFAULT_WARNING_THRESHOLD)
            .min(100)
    }

    /// Lightweight reference suitable for embedding in a transaction.
    pub fn reference(&self) -> CategoryRef {
        CategoryRef {
            id: self.id.clone(),
            kind: self.kind.clone(),
        }
    }
}

/// Classification used to route a category into budget-rule buckets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Need,
    Want,
    Savings,
    Custom,
}

/// Denormalized category copy carried by a transaction; `id` and `kind` are authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CategoryRef {
    pub id: String,
    pub kind: CategoryKind,
}

impl CategoryRef {
    pub fn new(id: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn is_savings(&self) -> bool {
        matches!(self.kind, CategoryKind::Savings)
    }
}

static DEFAULT_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category::new("housing", "Housing", CategoryKind::Need).with_style("🏠", "#4F46E5"),
        Category::new("groceries", "Groceries", CategoryKind::Need).with_style("🛒", "#16A34A"),
        Category::new("utilities", "Utilities", CategoryKind::Need).with_style("💡", "#F59E0B"),
        Category::new("transport", "Transport", CategoryKind::Need).with_style("🚌", "#0EA5E9"),
        Category::new("health", "Health", CategoryKind::Need).with_style("💊", "#EF4444"),
        Category::new("dining", "Dining Out", CategoryKind::Want).with_style("🍽", "#F97316"),
        Category::new("entertainment", "Entertainment", CategoryKind::Want)
            .with_style("🎬", "#A855F7"),
        Category::new("shopping", "Shopping", CategoryKind::Want).with_style("🛍", "#EC4899"),
        Category::new("travel", "Travel", CategoryKind::Want).with_style("✈", "#14B8A6"),
        Category::new("emergency_fund", "Emergency Fund", CategoryKind::Savings)
            .with_style("🛟", "#22C55E"),
        Category::new("investments", "Investments", CategoryKind::Savings)
            .with_style("📈", "#84CC16"),
    ]
});

/// Seed taxonomy installed when a store is first initialised.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_taxonomy_has_unique_ids() {
        let categories = default_categories();
        let ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), categories.len());
        assert!(categories
            .iter()
            .any(|c| matches!(c.kind, CategoryKind::Savings)));
        assert!(categories.iter().all(|c| !c.archived));
    }

    #[test]
    fn warning_threshold_defaults_and_clamps() {
        let plain = Category::new("pets", "Pets", CategoryKind::Custom).with_limit(100.0, None);
        assert_eq!(plain.effective_warning_threshold(), DEFAULT_WARNING_THRESHOLD);
        let strict =
            Category::new("pets", "Pets", CategoryKind::Custom).with_limit(100.0, Some(150));
        assert_eq!(strict.effective_warning_threshold(), 100);
    }

    #[test]
    fn deserializes_without_optional_metadata() {
        let json = r#"{"id":"gym","name":"Gym","kind":"want"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.kind, CategoryKind::Want);
        assert!(category.monthly_limit.is_none());
        assert!(!category.archived);
    }
}
