//! Artifact export — JSON report and CSV equity curves.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use chanlab_core::backtest::BacktestReport;

use crate::report::ComparisonReport;

/// Paths of everything written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedArtifacts {
    pub report_path: PathBuf,
    pub equity_path: PathBuf,
}

/// Writes `report_<run_id>.json` and `equity_<run_id>.csv` under
/// `output_dir`, creating the directory if needed.
pub fn save_artifacts(
    report: &ComparisonReport,
    backtest: &BacktestReport,
    output_dir: &Path,
) -> Result<SavedArtifacts> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let report_path = output_dir.join(format!("report_{}.json", report.run_id));
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    fs::write(&report_path, json)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    let equity_path = output_dir.join(format!("equity_{}.csv", report.run_id));
    write_equity_csv(&equity_path, backtest)?;

    Ok(SavedArtifacts {
        report_path,
        equity_path,
    })
}

/// One row per replayed day: date, ratio, weight, both equity curves.
pub fn write_equity_csv(path: &Path, backtest: &BacktestReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writer.write_record(["date", "ratio", "weight", "hold_equity", "strategy_equity"])?;

    for (i, point) in backtest.weights.iter().enumerate() {
        writer.write_record([
            point.date.to_string(),
            format!("{:.4}", point.ratio),
            format!("{:.6}", point.weight),
            format!("{:.6}", backtest.hold_equity[i]),
            format!("{:.6}", backtest.strategy_equity[i]),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
