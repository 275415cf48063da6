//! End-to-end runner pipeline: channel artifact on disk through to exported
//! report and equity curve.

use std::fs;

use chrono::NaiveDate;

use chanlab_core::backtest::run_backtest;
use chanlab_core::domain::{Ladder, ReentryMode, StrategyConfig};
use chanlab_runner::report::ComparisonReport;
use chanlab_runner::sweep::SweepGrid;
use chanlab_runner::{load_channel_file, run_sweep, save_artifacts};

/// Writes a minimal but well-formed channel artifact covering one
/// boom-and-bust cycle.
fn write_channel_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let dates: Vec<String> = (1..=10).map(|d| format!("2024-01-{d:02}")).collect();
    let prices = [
        100.0, 130.0, 180.0, 250.0, 320.0, 240.0, 160.0, 110.0, 80.0, 120.0,
    ];
    let ratios = [20.0, 35.0, 55.0, 75.0, 90.0, 70.0, 45.0, 25.0, 10.0, 30.0];
    let n = dates.len();

    let json = serde_json::json!({
        "meta": {
            "start": dates[0],
            "end": dates[n - 1],
            "updated_utc": "2024-01-10T12:00:00+00:00",
        },
        "series": {
            "date": dates,
            "price": prices,
            "fair": vec![1.0; n],
            "log10_r": vec![0.0; n],
            "ratio": ratios,
        },
        "extended": {
            "date": (1..=12).map(|d| format!("2024-01-{d:02}")).collect::<Vec<_>>(),
            "fair": vec![1.0; n + 2],
            "peak_line_price": vec![350.0; n + 2],
            "trough_line_price": vec![60.0; n + 2],
            "peak_line_log10": vec![0.5; n + 2],
            "trough_line_log10": vec![-0.5; n + 2],
        },
    });

    let path = dir.join("channel.json");
    fs::write(&path, json.to_string()).unwrap();
    path
}

#[test]
fn load_backtest_report_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = write_channel_fixture(dir.path());

    let channel = load_channel_file(&data_path).unwrap();
    assert_eq!(channel.series.len(), 10);
    assert_eq!(channel.last_price, 120.0);
    let bounds = channel.current_bounds.unwrap();
    assert_eq!(bounds.trough, 60.0);
    assert_eq!(bounds.peak, 350.0);

    let config = StrategyConfig {
        ladder: Ladder::Linear,
        sell_start: 46.0,
        reentry_mode: ReentryMode::Instant,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ..StrategyConfig::default()
    };
    let backtest = run_backtest(&channel.series, &config).unwrap();
    assert_eq!(backtest.len(), 10);
    // Day 5 peak at ratio 90 must have shed most exposure.
    assert!(backtest.weights[4].weight < 0.25);
    // Final day sits below the threshold again, back to full weight.
    assert_eq!(backtest.final_weight(), 1.0);

    let report = ComparisonReport::from_backtest(&backtest, &config);
    assert_eq!(report.days, 10);
    assert_eq!(
        report.end_date,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    );

    let out_dir = dir.path().join("results");
    let saved = save_artifacts(&report, &backtest, &out_dir).unwrap();
    assert!(saved.report_path.ends_with(format!(
        "report_{}.json",
        config.run_id()
    )));

    let reread: ComparisonReport =
        serde_json::from_str(&fs::read_to_string(&saved.report_path).unwrap()).unwrap();
    assert_eq!(reread, report);

    let csv = fs::read_to_string(&saved.equity_path).unwrap();
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn sweep_over_loaded_channel_ranks_configs() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = write_channel_fixture(dir.path());
    let channel = load_channel_file(&data_path).unwrap();

    let base = StrategyConfig {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ..StrategyConfig::default()
    };
    let rows = run_sweep(&channel.series, &base, &SweepGrid::default());
    assert_eq!(rows.len(), 27);
    for pair in rows.windows(2) {
        assert!(pair[0].performance_delta >= pair[1].performance_delta);
    }
    // Every row replays the same price path, so hold return is shared.
    for row in &rows {
        assert!((row.hold_return - rows[0].hold_return).abs() < 1e-12);
    }
}

#[test]
fn start_date_past_data_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = write_channel_fixture(dir.path());
    let channel = load_channel_file(&data_path).unwrap();

    let config = StrategyConfig {
        start_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        ..StrategyConfig::default()
    };
    assert!(run_backtest(&channel.series, &config).is_err());
}
