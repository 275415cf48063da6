//! End-to-end replay scenarios: the canonical ratio path
//! `[30, 40, 46, 60, 80, 46, 30]` with `sell_start = 46` and the linear
//! ladder, exercised under each re-entry mode.

use chrono::NaiveDate;
use chanlab_core::backtest::{run_backtest, BacktestError};
use chanlab_core::domain::{ChannelPoint, ChannelSeries, Ladder, ReentryMode, StrategyConfig};
use chanlab_core::policy::Action;

const RATIOS: [f64; 7] = [30.0, 40.0, 46.0, 60.0, 80.0, 46.0, 30.0];

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn canonical_series() -> ChannelSeries {
    let points = RATIOS
        .iter()
        .enumerate()
        .map(|(i, &ratio)| ChannelPoint {
            date: day(i as u32 + 1),
            price: 100.0 + i as f64, // strictly valid prices, shape irrelevant here
            ratio,
        })
        .collect();
    ChannelSeries::new(points).unwrap()
}

fn config(reentry_mode: ReentryMode) -> StrategyConfig {
    StrategyConfig {
        ladder: Ladder::Linear,
        sell_start: 46.0,
        buy_threshold: 20.0,
        reentry_mode,
        start_date: day(1),
        start_weight: 1.0,
    }
}

/// Linear ladder value for the canonical threshold: `1 - (r - 46) / 54`.
fn linear(ratio: f64) -> f64 {
    1.0 - (ratio - 46.0) / 54.0
}

#[test]
fn instant_mode_weight_trajectory() {
    let report = run_backtest(&canonical_series(), &config(ReentryMode::Instant)).unwrap();

    let weights: Vec<f64> = report.weights.iter().map(|w| w.weight).collect();
    let expected = [
        1.0,          // 30: below threshold, already full
        1.0,          // 40
        1.0,          // 46: regime boundary, ladder still 1.0
        linear(60.0), // 0.7407...
        linear(80.0), // 0.3703...
        linear(80.0), // 46 is still >= sell_start: hysteresis holds the floor
        1.0,          // 30: instant re-entry
    ];
    assert_eq!(weights.len(), expected.len());
    for (i, (&got, &want)) in weights.iter().zip(expected.iter()).enumerate() {
        assert!(
            (got - want).abs() < 1e-9,
            "weight[{i}]: got {got}, want {want}"
        );
    }
}

#[test]
fn instant_mode_change_events() {
    let series = canonical_series();
    let report = run_backtest(&series, &config(ReentryMode::Instant)).unwrap();

    // Decreases on days 3 and 4 (ratio 60 then 80), re-entry on day 6
    // (ratio 30). Day 5's ratio of 46 sits exactly on the threshold, so the
    // sell regime's hysteresis keeps the weight frozen there.
    let last = report.last_change.expect("policy traded during the window");
    assert_eq!(last.date, day(7));
    assert_eq!(last.action, Action::Increase);
    assert_eq!(last.weight, 1.0);
    assert_eq!(last.ratio, 30.0);
}

#[test]
fn wait_mode_stays_frozen_above_buy_threshold() {
    let report = run_backtest(&canonical_series(), &config(ReentryMode::Wait)).unwrap();

    let weights: Vec<f64> = report.weights.iter().map(|w| w.weight).collect();
    let floor = linear(80.0);
    // After the deepest sell (index 4), the ratio never reaches the buy
    // threshold of 20, so the weight stays at the last sell-regime value.
    for (i, &w) in weights.iter().enumerate().skip(4) {
        assert!(
            (w - floor).abs() < 1e-9,
            "weight[{i}] should stay frozen at {floor}, got {w}"
        );
    }

    // The last trade on record is therefore the second decrease.
    let last = report.last_change.unwrap();
    assert_eq!(last.action, Action::Decrease);
    assert_eq!(last.date, day(5));
}

#[test]
fn wait_mode_reenters_at_buy_threshold() {
    let mut ratios = RATIOS.to_vec();
    ratios.push(18.0); // below the buy threshold of 20
    let points = ratios
        .iter()
        .enumerate()
        .map(|(i, &ratio)| ChannelPoint {
            date: day(i as u32 + 1),
            price: 100.0,
            ratio,
        })
        .collect();
    let series = ChannelSeries::new(points).unwrap();

    let report = run_backtest(&series, &config(ReentryMode::Wait)).unwrap();
    let last = report.last_change.unwrap();
    assert_eq!(last.action, Action::Increase);
    assert_eq!(last.weight, 1.0);
    assert_eq!(last.ratio, 18.0);
}

#[test]
fn gradual_mode_climbs_as_ratio_falls() {
    let report = run_backtest(&canonical_series(), &config(ReentryMode::Gradual)).unwrap();
    let weights: Vec<f64> = report.weights.iter().map(|w| w.weight).collect();

    // Index 6 (ratio 30) is the only day below the threshold; weight must
    // have risen above the sell-regime floor but not reached 1.0.
    let floor = linear(80.0);
    assert!(weights[6] > floor);
    assert!(weights[6] < 1.0);
}

#[test]
fn strategy_beats_hold_on_a_round_trip() {
    // Prices rise into the sell regime and collapse back: the policy that
    // lightened up near the top must end above the hold-only baseline.
    let path = [
        (100.0, 30.0),
        (130.0, 50.0),
        (170.0, 75.0),
        (200.0, 95.0),
        (120.0, 55.0),
        (80.0, 25.0),
    ];
    let points = path
        .iter()
        .enumerate()
        .map(|(i, &(price, ratio))| ChannelPoint {
            date: day(i as u32 + 1),
            price,
            ratio,
        })
        .collect();
    let series = ChannelSeries::new(points).unwrap();
    let report = run_backtest(&series, &config(ReentryMode::Instant)).unwrap();

    assert!(report.strategy_return() > report.hold_return());
    assert!(report.strategy_equity.iter().all(|v| v.is_finite()));
}

#[test]
fn range_errors_return_no_partial_curves() {
    let series = canonical_series();
    let cfg = StrategyConfig {
        start_date: day(7),
        ..config(ReentryMode::Instant)
    };
    assert!(matches!(
        run_backtest(&series, &cfg),
        Err(BacktestError::InsufficientData { .. })
    ));

    let cfg = StrategyConfig {
        start_date: day(20),
        ..config(ReentryMode::Instant)
    };
    assert!(matches!(
        run_backtest(&series, &cfg),
        Err(BacktestError::NoDataInRange { .. })
    ));
}
