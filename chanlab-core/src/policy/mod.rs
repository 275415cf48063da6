//! Rebalance policy — the per-day decision combining the sell ladder with
//! hysteresis and a re-entry mode.
//!
//! The only state carried across days is the previous weight. In the sell
//! regime (`ratio >= sell_start`) the weight may only fall: the target is
//! `min(previous, ladder)`, so a local pullback that stays above the
//! threshold never buys back in. Below the threshold the configured
//! re-entry mode decides how exposure returns toward 100%.

pub mod ladder;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{ReentryMode, StrategyConfig};
use crate::policy::ladder::ladder_weight;

/// Weight deltas at or below this are classified as holds.
pub const WEIGHT_EPSILON: f64 = 1e-12;

/// Classified outcome of one policy step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Hold,
    Increase,
    Decrease,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Hold => "HOLD",
            Action::Increase => "INCREASE",
            Action::Decrease => "DECREASE",
        };
        f.write_str(name)
    }
}

/// New weight and classified action for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub weight: f64,
    pub action: Action,
}

/// One policy transition.
///
/// A non-finite ratio leaves the weight unchanged and holds — bad data is
/// never traded on. The returned weight is always clamped to `[0, 1]`.
pub fn step_weight(prev_weight: f64, ratio: f64, config: &StrategyConfig) -> StepResult {
    let prev = prev_weight.clamp(0.0, 1.0);
    if !ratio.is_finite() {
        return StepResult {
            weight: prev,
            action: Action::Hold,
        };
    }

    let target = if ratio >= config.sell_start {
        // Sell regime: exposure may only fall.
        prev.min(ladder_weight(ratio, config.sell_start, config.ladder))
    } else {
        match config.reentry_mode {
            ReentryMode::Instant => 1.0,
            ReentryMode::Wait => {
                if ratio <= config.buy_threshold {
                    1.0
                } else {
                    prev
                }
            }
            ReentryMode::Gradual => {
                let denom = config.sell_start.max(1e-9);
                let f = ((config.sell_start - ratio) / denom).clamp(0.0, 1.0);
                prev + (1.0 - prev) * f * f
            }
        }
    };
    let target = target.clamp(0.0, 1.0);

    let delta = target - prev;
    if delta.abs() <= WEIGHT_EPSILON {
        StepResult {
            weight: prev,
            action: Action::Hold,
        }
    } else if delta > 0.0 {
        StepResult {
            weight: target,
            action: Action::Increase,
        }
    } else {
        StepResult {
            weight: target,
            action: Action::Decrease,
        }
    }
}

/// The single piece of state carried across days of one backtest run.
///
/// Created at the configured start date with the start weight, stepped once
/// per day, and discarded with the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureState {
    weight: f64,
}

impl ExposureState {
    pub fn new(start_weight: f64) -> Self {
        Self {
            weight: start_weight.clamp(0.0, 1.0),
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Advances the state by one day and returns the classified step.
    pub fn step(&mut self, ratio: f64, config: &StrategyConfig) -> StepResult {
        let result = step_weight(self.weight, ratio, config);
        self.weight = result.weight;
        result
    }
}
