//! Serializable run configuration (TOML).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chanlab_core::domain::{Ladder, ReentryMode, StrategyConfig};

/// Configuration for a single `run` invocation, loaded from a TOML file.
///
/// ```toml
/// data = "data/btc.json"
/// output_dir = "results"
///
/// [strategy]
/// ladder = "linear"
/// sell_start = 46.0
/// buy_threshold = 14.0
/// reentry_mode = "instant"
/// start_date = "2018-01-01"
/// start_weight = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the channel JSON artifact.
    pub data: PathBuf,

    /// Where to write report/equity artifacts. No artifacts when absent.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub strategy: StrategySection,
}

/// Strategy parameters as they appear in the TOML file. Every field has the
/// upstream dashboard's default, so a minimal config needs only `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    pub ladder: Ladder,
    pub sell_start: f64,
    pub buy_threshold: f64,
    pub reentry_mode: ReentryMode,
    pub start_date: NaiveDate,
    pub start_weight: f64,
}

impl Default for StrategySection {
    fn default() -> Self {
        let core = StrategyConfig::default();
        Self {
            ladder: core.ladder,
            sell_start: core.sell_start,
            buy_threshold: core.buy_threshold,
            reentry_mode: core.reentry_mode,
            start_date: core.start_date,
            start_weight: core.start_weight,
        }
    }
}

impl StrategySection {
    /// Converts to the core config and validates it.
    pub fn to_core(&self) -> Result<StrategyConfig> {
        let config = StrategyConfig {
            ladder: self.ladder,
            sell_start: self.sell_start,
            buy_threshold: self.buy_threshold,
            reentry_mode: self.reentry_mode,
            start_date: self.start_date,
            start_weight: self.start_weight,
        };
        config.validate()?;
        Ok(config)
    }
}

impl RunConfig {
    /// Reads and parses a TOML config file.
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: RunConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.strategy.to_core()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_dashboard_defaults() {
        let config: RunConfig = toml::from_str("data = \"data/btc.json\"").unwrap();
        assert_eq!(config.strategy.sell_start, 46.0);
        assert_eq!(config.strategy.ladder, Ladder::Linear);
        assert_eq!(config.strategy.reentry_mode, ReentryMode::Instant);
        assert!(config.output_dir.is_none());
        assert!(config.strategy.to_core().is_ok());
    }

    #[test]
    fn full_toml_round_trips() {
        let toml_src = r#"
            data = "data/btc.json"
            output_dir = "results"

            [strategy]
            ladder = "aggressive"
            sell_start = 52.0
            buy_threshold = 18.0
            reentry_mode = "wait"
            start_date = "2019-06-01"
            start_weight = 0.8
        "#;
        let config: RunConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.strategy.ladder, Ladder::Aggressive);
        assert_eq!(config.strategy.reentry_mode, ReentryMode::Wait);
        let core = config.strategy.to_core().unwrap();
        assert_eq!(core.start_weight, 0.8);
        assert_eq!(
            core.start_date,
            NaiveDate::from_ymd_opt(2019, 6, 1).unwrap()
        );
    }

    #[test]
    fn invalid_strategy_section_is_rejected() {
        let toml_src = r#"
            data = "data/btc.json"

            [strategy]
            reentry_mode = "wait"
            sell_start = 46.0
            buy_threshold = 60.0
        "#;
        let config: RunConfig = toml::from_str(toml_src).unwrap();
        assert!(config.strategy.to_core().is_err());
    }
}
