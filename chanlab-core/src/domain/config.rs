//! Strategy configuration — ladder shape, thresholds, re-entry mode — and
//! its deterministic run fingerprint.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape of the sell ladder above the sell-start threshold.
///
/// All three shapes are 1.0 at the threshold and 0.0 at the channel peak;
/// they differ in how fast exposure is shed in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ladder {
    /// Concave `1 - x²`: retains exposure longer.
    Soft,
    /// Proportional `1 - x`.
    Linear,
    /// Convex `(1 - x)²`: sheds exposure fast near the threshold.
    Aggressive,
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ladder::Soft => "soft",
            Ladder::Linear => "linear",
            Ladder::Aggressive => "aggressive",
        };
        f.write_str(name)
    }
}

impl FromStr for Ladder {
    type Err = String;

    /// Accepts the canonical names plus the `g0`/`g1`/`g2` tags used by the
    /// upstream channel artifact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" | "g0" => Ok(Ladder::Soft),
            "linear" | "g1" => Ok(Ladder::Linear),
            "aggressive" | "g2" => Ok(Ladder::Aggressive),
            other => Err(format!(
                "unknown ladder '{other}' (expected soft, linear, or aggressive)"
            )),
        }
    }
}

/// How exposure returns toward full weight once the ratio falls below the
/// sell-start threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReentryMode {
    /// Back to 100% on the first day below the threshold.
    Instant,
    /// Frozen until the ratio drops to the buy threshold, then 100%.
    Wait,
    /// Eased toward 100% as the ratio falls from the threshold to 0.
    Gradual,
}

impl fmt::Display for ReentryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReentryMode::Instant => "instant",
            ReentryMode::Wait => "wait",
            ReentryMode::Gradual => "gradual",
        };
        f.write_str(name)
    }
}

impl FromStr for ReentryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instant" => Ok(ReentryMode::Instant),
            "wait" => Ok(ReentryMode::Wait),
            "gradual" => Ok(ReentryMode::Gradual),
            other => Err(format!(
                "unknown re-entry mode '{other}' (expected instant, wait, or gradual)"
            )),
        }
    }
}

/// Configuration rejected before any simulation runs.
///
/// Invalid values are reported, never silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sell_start must be strictly between 0 and 100 (got {0})")]
    SellStartOutOfRange(f64),

    #[error("wait mode requires buy_threshold ({buy_threshold}) below sell_start ({sell_start})")]
    BuyThresholdAboveSellStart {
        buy_threshold: f64,
        sell_start: f64,
    },

    #[error("buy_threshold must be non-negative (got {0})")]
    BuyThresholdNegative(f64),

    #[error("start_weight must be within [0, 1] (got {0})")]
    StartWeightOutOfRange(f64),
}

/// Full strategy configuration for one backtest invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub ladder: Ladder,
    /// Ratio threshold where the sell regime begins, strictly inside (0, 100).
    pub sell_start: f64,
    /// Ratio at which wait-mode re-entry returns to 100%. Only meaningful
    /// when `reentry_mode` is `Wait`.
    pub buy_threshold: f64,
    pub reentry_mode: ReentryMode,
    pub start_date: NaiveDate,
    /// Exposure weight in force on the start date, in [0, 1].
    pub start_weight: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ladder: Ladder::Linear,
            sell_start: 46.0,
            buy_threshold: 14.0,
            reentry_mode: ReentryMode::Instant,
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            start_weight: 1.0,
        }
    }
}

impl StrategyConfig {
    /// Checks the configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sell_start.is_finite() || self.sell_start <= 0.0 || self.sell_start >= 100.0 {
            return Err(ConfigError::SellStartOutOfRange(self.sell_start));
        }
        if !self.start_weight.is_finite() || !(0.0..=1.0).contains(&self.start_weight) {
            return Err(ConfigError::StartWeightOutOfRange(self.start_weight));
        }
        if self.reentry_mode == ReentryMode::Wait {
            if !self.buy_threshold.is_finite() || self.buy_threshold < 0.0 {
                return Err(ConfigError::BuyThresholdNegative(self.buy_threshold));
            }
            if self.buy_threshold >= self.sell_start {
                return Err(ConfigError::BuyThresholdAboveSellStart {
                    buy_threshold: self.buy_threshold,
                    sell_start: self.sell_start,
                });
            }
        }
        Ok(())
    }

    /// Deterministic identity for this configuration.
    ///
    /// Canonical serialization: struct fields serialize in declaration order,
    /// so the JSON is stable and the hash reproducible across runs.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("StrategyConfig must serialize");
        RunId::from_bytes(json.as_bytes())
    }
}

/// Short hex identifier derived from a configuration hash. Used to name
/// artifacts and deduplicate sweep entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = blake3::hash(bytes);
        Self(hash.to_hex()[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
