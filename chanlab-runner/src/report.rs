//! Comparison report — policy vs hold-only baseline for one run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chanlab_core::backtest::BacktestReport;
use chanlab_core::domain::StrategyConfig;
use chanlab_core::policy::Action;
use chanlab_core::stats::{max_drawdown, RatioBand};

/// Summary of the most recent rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub date: NaiveDate,
    pub ratio: f64,
    pub weight: f64,
    pub action: Action,
}

/// Everything a reporting surface needs from one backtest run.
///
/// Pure assembly over the core's outputs; the equity curves themselves are
/// exported separately and discarded with the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub run_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,

    pub strategy_return: f64,
    pub hold_return: f64,
    /// Strategy return minus hold return: the policy's added value.
    pub performance_delta: f64,

    pub strategy_max_drawdown: f64,
    pub hold_max_drawdown: f64,

    pub final_weight: f64,
    /// Mean ± 1 std of the ratio over the replayed window.
    pub ratio_band: RatioBand,
    pub last_change: Option<ChangeSummary>,
}

impl ComparisonReport {
    pub fn from_backtest(report: &BacktestReport, config: &StrategyConfig) -> Self {
        let strategy_return = report.strategy_return();
        let hold_return = report.hold_return();
        let ratio_band = RatioBand::from_ratios(report.weights.iter().map(|w| w.ratio));

        Self {
            run_id: config.run_id().to_string(),
            start_date: report.weights.first().map(|w| w.date).unwrap_or_default(),
            end_date: report.weights.last().map(|w| w.date).unwrap_or_default(),
            days: report.len(),
            strategy_return,
            hold_return,
            performance_delta: strategy_return - hold_return,
            strategy_max_drawdown: max_drawdown(&report.strategy_equity),
            hold_max_drawdown: max_drawdown(&report.hold_equity),
            final_weight: report.final_weight(),
            ratio_band,
            last_change: report.last_change.map(|e| ChangeSummary {
                date: e.date,
                ratio: e.ratio,
                weight: e.weight,
                action: e.action,
            }),
        }
    }
}
