mod common;

use std::fs;

use budget_insight::{
    config::{Config, ConfigManager, InsightSettings},
    errors::EngineError,
    ledger::{BudgetConfig, BudgetRule, CategoryKind},
    InsightService,
};
use common::{date, temp_base_dir, LedgerBuilder};

#[test]
fn loaded_settings_drive_the_engine() {
    let base = temp_base_dir();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("manager");
    let mut config = Config::default();
    config.insights = InsightSettings::default().with_threshold(0.10);
    config.insights.projection_months = 3;
    manager.save(&config).expect("save config");

    let reloaded = ConfigManager::with_base_dir(base)
        .expect("manager")
        .load()
        .expect("load config");
    let service = InsightService::new(reloaded.insights).expect("loaded settings are valid");

    let ledger = LedgerBuilder::new()
        .category("fuel", CategoryKind::Need)
        .expense("fuel", date(2024, 5, 3), 100.0)
        .expense("fuel", date(2024, 6, 3), 115.0)
        .build();
    let snapshot = service
        .snapshot(
            &ledger,
            &BudgetConfig::new(BudgetRule::FiftyThirtyTwenty, 1000.0),
            date(2024, 6, 30),
        )
        .expect("snapshot");
    assert_eq!(snapshot.unusual_spending.len(), 1);
    assert_eq!(snapshot.projection_months, 3);
}

#[test]
fn corrupt_config_reports_serialization_error() {
    let base = temp_base_dir();
    let manager = ConfigManager::with_base_dir(base).expect("manager");
    fs::write(manager.path(), "{ not json").expect("write corrupt file");
    assert!(matches!(manager.load(), Err(EngineError::Serde(_))));
}

#[test]
fn saving_invalid_settings_is_refused() {
    let base = temp_base_dir();
    let manager = ConfigManager::with_base_dir(base).expect("manager");
    let mut config = Config::default();
    config.insights.new_spending_floor = f64::NAN;
    assert!(matches!(
        manager.save(&config),
        Err(EngineError::InvalidInput(_))
    ));
    assert!(!manager.path().exists());
}
