use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::EngineError,
    utils::{ensure_dir, PathResolver},
};

const TMP_SUFFIX: &str = "tmp";

/// Tuning knobs for the insight engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightSettings {
    /// Month-over-month growth (as a fraction) a category must strictly exceed to be flagged.
    #[serde(default = "InsightSettings::default_threshold")]
    pub unusual_spending_threshold: f64,
    /// Minimum amount for a category with no prior-month spend to be reported as new spending.
    #[serde(default = "InsightSettings::default_new_spending_floor")]
    pub new_spending_floor: f64,
    #[serde(default = "InsightSettings::default_projection_months")]
    pub projection_months: u32,
    /// Divisor applied to the full history when averaging monthly expenses.
    #[serde(default = "InsightSettings::default_normalization_months")]
    pub expense_normalization_months: u32,
}

impl InsightSettings {
    pub fn default_threshold() -> f64 {
        0.20
    }

    pub fn default_new_spending_floor() -> f64 {
        25.0
    }

    pub fn default_projection_months() -> u32 {
        12
    }

    pub fn default_normalization_months() -> u32 {
        12
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.unusual_spending_threshold = threshold;
        self
    }

    pub fn with_new_spending_floor(mut self, floor: f64) -> Self {
        self.new_spending_floor = floor;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.unusual_spending_threshold.is_finite() || self.unusual_spending_threshold < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "unusual spending threshold must be a non-negative number, got {}",
                self.unusual_spending_threshold
            )));
        }
        if !self.new_spending_floor.is_finite() || self.new_spending_floor < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "new spending floor must be a non-negative number, got {}",
                self.new_spending_floor
            )));
        }
        if self.expense_normalization_months == 0 {
            return Err(EngineError::InvalidInput(
                "expense normalization window must cover at least one month".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            unusual_spending_threshold: Self::default_threshold(),
            new_spending_floor: Self::default_new_spending_floor(),
            projection_months: Self::default_projection_months(),
            expense_normalization_months: Self::default_normalization_months(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub insights: InsightSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            insights: InsightSettings::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.insights.validate()
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, EngineError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, EngineError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, EngineError> {
        ensure_dir(&base)?;
        let config_root = PathResolver::config_dir_in(&base);
        ensure_dir(&config_root)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Loads the stored config, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, EngineError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), EngineError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.insights.unusual_spending_threshold, 0.20);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.insights = config.insights.with_threshold(0.5).with_new_spending_floor(10.0);
        manager.save(&config).unwrap();
        assert!(manager.path().exists());
        assert!(!tmp_path(manager.path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(
            manager.path(),
            r#"{"locale":"pt-PT","currency":"EUR","insights":{"projection_months":6}}"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.insights.projection_months, 6);
        assert_eq!(config.insights.new_spending_floor, 25.0);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = InsightSettings::default().with_threshold(-0.1);
        assert!(matches!(
            settings.validate(),
            Err(EngineError::InvalidInput(_))
        ));
        let mut zero_window = InsightSettings::default();
        zero_window.expense_normalization_months = 0;
        assert!(zero_window.validate().is_err());
    }
}
