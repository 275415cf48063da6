//! Parameter sweeps — replay a grid of strategy configs in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use chanlab_core::backtest::run_backtest;
use chanlab_core::domain::{ChannelSeries, Ladder, ReentryMode, StrategyConfig};
use chanlab_core::stats::max_drawdown;

/// The parameter grid. Every combination of the listed values is replayed;
/// combinations that fail validation are skipped silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    pub sell_starts: Vec<f64>,
    pub ladders: Vec<Ladder>,
    pub reentry_modes: Vec<ReentryMode>,
    /// Only applied to wait-mode combinations; other modes ignore the
    /// threshold, so varying it would just duplicate runs.
    pub buy_thresholds: Vec<f64>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            sell_starts: vec![40.0, 46.0, 52.0],
            ladders: vec![Ladder::Soft, Ladder::Linear, Ladder::Aggressive],
            reentry_modes: vec![
                ReentryMode::Instant,
                ReentryMode::Wait,
                ReentryMode::Gradual,
            ],
            buy_thresholds: vec![14.0],
        }
    }
}

impl SweepGrid {
    /// Expands the grid into validated configs, carrying `base` for the
    /// fields the grid does not vary.
    pub fn generate_configs(&self, base: &StrategyConfig) -> Vec<StrategyConfig> {
        let mut configs = Vec::new();
        for &sell_start in &self.sell_starts {
            for &ladder in &self.ladders {
                for &reentry_mode in &self.reentry_modes {
                    let thresholds: &[f64] = if reentry_mode == ReentryMode::Wait {
                        &self.buy_thresholds
                    } else {
                        std::slice::from_ref(&base.buy_threshold)
                    };
                    for &buy_threshold in thresholds {
                        let config = StrategyConfig {
                            ladder,
                            sell_start,
                            buy_threshold,
                            reentry_mode,
                            ..base.clone()
                        };
                        if config.validate().is_ok() {
                            configs.push(config);
                        }
                    }
                }
            }
        }
        configs
    }
}

/// One row of sweep output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub run_id: String,
    pub ladder: Ladder,
    pub sell_start: f64,
    pub buy_threshold: f64,
    pub reentry_mode: ReentryMode,
    pub strategy_return: f64,
    pub hold_return: f64,
    pub performance_delta: f64,
    pub strategy_max_drawdown: f64,
}

/// Replays every grid combination over `series` and returns rows sorted by
/// performance delta, best first. Configs whose replay fails (for example a
/// start date past the data) are dropped.
pub fn run_sweep(series: &ChannelSeries, base: &StrategyConfig, grid: &SweepGrid) -> Vec<SweepRow> {
    let configs = grid.generate_configs(base);

    let mut rows: Vec<SweepRow> = configs
        .par_iter()
        .filter_map(|config| {
            let report = run_backtest(series, config).ok()?;
            let strategy_return = report.strategy_return();
            let hold_return = report.hold_return();
            Some(SweepRow {
                run_id: config.run_id().to_string(),
                ladder: config.ladder,
                sell_start: config.sell_start,
                buy_threshold: config.buy_threshold,
                reentry_mode: config.reentry_mode,
                strategy_return,
                hold_return,
                performance_delta: strategy_return - hold_return,
                strategy_max_drawdown: max_drawdown(&report.strategy_equity),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.performance_delta
            .partial_cmp(&a.performance_delta)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
