//! Backtest engine — replays the rebalance policy across a channel series
//! and produces comparable equity curves for the policy and the hold-only
//! baseline.
//!
//! Ordering contract: the policy decides from the day's ratio, and the
//! one-day return `price[i+1] / price[i]` is realized with the weight that
//! was in force on day `i`. Decision and return are never computed from the
//! same instant's state inconsistently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ChannelSeries, ConfigError, StrategyConfig};
use crate::policy::{Action, ExposureState};

/// Conditions that abort a backtest before or during setup. Aborted runs
/// return no partial equity curves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no channel data at or after {start_date}")]
    NoDataInRange { start_date: NaiveDate },

    #[error("insufficient data: fewer than two points at or after {start_date}")]
    InsufficientData { start_date: NaiveDate },
}

/// One day of the exposure-weight trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub ratio: f64,
    pub weight: f64,
}

/// The most recent day on which the policy changed its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub date: NaiveDate,
    pub ratio: f64,
    pub weight: f64,
    pub action: Action,
}

/// Output of one backtest run.
///
/// `weights`, `hold_equity`, and `strategy_equity` are index-aligned and
/// equally long. Both equity curves start at 1.0. A non-finite or
/// non-positive price stops the replay and truncates all three series at
/// that point — invalid data is never forward-filled into the curves.
///
/// Owned by the caller for the duration of one run; nothing here feeds back
/// into policy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub weights: Vec<WeightPoint>,
    pub hold_equity: Vec<f64>,
    pub strategy_equity: Vec<f64>,
    pub last_change: Option<ChangeEvent>,
}

impl BacktestReport {
    /// Number of replayed days.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Total return of the hold-only baseline, as a fraction.
    pub fn hold_return(&self) -> f64 {
        self.hold_equity.last().copied().unwrap_or(1.0) - 1.0
    }

    /// Total return of the policy, as a fraction.
    pub fn strategy_return(&self) -> f64 {
        self.strategy_equity.last().copied().unwrap_or(1.0) - 1.0
    }

    /// Weight in force on the final replayed day.
    pub fn final_weight(&self) -> f64 {
        self.weights.last().map(|w| w.weight).unwrap_or(0.0)
    }
}

/// Replays the policy from the configured start date to the end of the
/// series (or the first unusable price).
///
/// Deterministic and side-effect free: identical inputs yield bit-identical
/// reports, and concurrent runs over a shared `&ChannelSeries` are safe.
pub fn run_backtest(
    series: &ChannelSeries,
    config: &StrategyConfig,
) -> Result<BacktestReport, BacktestError> {
    config.validate()?;

    let start = series
        .first_at_or_after(config.start_date)
        .ok_or(BacktestError::NoDataInRange {
            start_date: config.start_date,
        })?;
    let points = &series.points()[start..];
    if points.len() < 2 {
        return Err(BacktestError::InsufficientData {
            start_date: config.start_date,
        });
    }

    let mut state = ExposureState::new(config.start_weight);
    let mut weights = Vec::with_capacity(points.len());
    let mut hold_equity = Vec::with_capacity(points.len());
    let mut strategy_equity = Vec::with_capacity(points.len());
    let mut last_change = None;

    hold_equity.push(1.0);
    strategy_equity.push(1.0);

    let first = &points[0];
    let step = state.step(first.ratio, config);
    if step.action != Action::Hold {
        last_change = Some(ChangeEvent {
            date: first.date,
            ratio: first.ratio,
            weight: step.weight,
            action: step.action,
        });
    }
    weights.push(WeightPoint {
        date: first.date,
        ratio: first.ratio,
        weight: step.weight,
    });

    for i in 0..points.len() - 1 {
        let today = &points[i];
        let next = &points[i + 1];
        if !today.has_usable_price() || !next.has_usable_price() {
            // Stop the replay here; all series stay truncated consistently.
            break;
        }
        let ret = next.price / today.price;

        // The return is realized with the weight in force today.
        let weight_in_force = weights[i].weight;
        hold_equity.push(hold_equity[i] * ret);
        strategy_equity.push(strategy_equity[i] * (weight_in_force * ret + (1.0 - weight_in_force)));

        let step = state.step(next.ratio, config);
        if step.action != Action::Hold {
            last_change = Some(ChangeEvent {
                date: next.date,
                ratio: next.ratio,
                weight: step.weight,
                action: step.action,
            });
        }
        weights.push(WeightPoint {
            date: next.date,
            ratio: next.ratio,
            weight: step.weight,
        });
    }

    Ok(BacktestReport {
        weights,
        hold_equity,
        strategy_equity,
        last_change,
    })
}
