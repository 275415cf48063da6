//! ChanLab CLI — backtest, sweep, and trigger commands.
//!
//! Commands:
//! - `run` — replay the rebalance policy over a channel artifact, from a
//!   TOML config file or inline flags
//! - `sweep` — replay a parameter grid in parallel and rank the results
//! - `triggers` — project the next actionable price levels from the latest
//!   channel bounds

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chanlab_core::backtest::run_backtest;
use chanlab_core::domain::{Ladder, ReentryMode, StrategyConfig};
use chanlab_core::policy::ladder::ladder_hints;
use chanlab_core::triggers::next_triggers;
use chanlab_runner::report::ComparisonReport;
use chanlab_runner::sweep::SweepGrid;
use chanlab_runner::{
    effective_price, load_channel_file, run_sweep, save_artifacts, LoadedChannel, RunConfig,
    StaticPrice,
};

#[derive(Parser)]
#[command(
    name = "chanlab",
    about = "ChanLab CLI — channel-position rebalancing backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the policy over a channel artifact and report vs hold.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the channel JSON artifact (instead of --config).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Ladder shape: soft, linear, aggressive.
        #[arg(long, default_value = "linear")]
        ladder: String,

        /// Ratio threshold where selling begins, in (0, 100).
        #[arg(long, default_value_t = 46.0)]
        sell_start: f64,

        /// Wait-mode re-entry ratio.
        #[arg(long, default_value_t = 14.0)]
        buy_threshold: f64,

        /// Re-entry mode: instant, wait, gradual.
        #[arg(long, default_value = "instant")]
        reentry: String,

        /// Backtest start date (YYYY-MM-DD).
        #[arg(long, default_value = "2018-01-01")]
        start: String,

        /// Exposure weight in force on the start date, in [0, 1].
        #[arg(long, default_value_t = 1.0)]
        start_weight: f64,

        /// Output directory for report JSON and equity CSV.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the comparison report as JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a parameter grid in parallel and print the ranking.
    Sweep {
        /// Path to the channel JSON artifact.
        #[arg(long)]
        data: PathBuf,

        /// Sell-start thresholds to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = vec![40.0, 46.0, 52.0])]
        sell_starts: Vec<f64>,

        /// Ladder shapes to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = vec!["soft".to_string(), "linear".to_string(), "aggressive".to_string()])]
        ladders: Vec<String>,

        /// Re-entry modes to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = vec!["instant".to_string(), "wait".to_string(), "gradual".to_string()])]
        modes: Vec<String>,

        /// Wait-mode buy thresholds to sweep.
        #[arg(long, value_delimiter = ',', default_values_t = vec![14.0])]
        buy_thresholds: Vec<f64>,

        /// Backtest start date (YYYY-MM-DD).
        #[arg(long, default_value = "2018-01-01")]
        start: String,

        /// Number of top rows to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Print the ranked rows as JSON instead of the table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Project the next sell/buy trigger prices from the latest bounds.
    Triggers {
        /// Path to the channel JSON artifact.
        #[arg(long)]
        data: PathBuf,

        /// Ladder shape: soft, linear, aggressive.
        #[arg(long, default_value = "linear")]
        ladder: String,

        /// Ratio threshold where selling begins, in (0, 100).
        #[arg(long, default_value_t = 46.0)]
        sell_start: f64,

        /// Wait-mode re-entry ratio.
        #[arg(long, default_value_t = 14.0)]
        buy_threshold: f64,

        /// Re-entry mode: instant, wait, gradual.
        #[arg(long, default_value = "instant")]
        reentry: String,

        /// Spot price override. Defaults to the artifact's last close.
        #[arg(long)]
        price: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            ladder,
            sell_start,
            buy_threshold,
            reentry,
            start,
            start_weight,
            output_dir,
            json,
        } => run_cmd(
            config,
            data,
            &ladder,
            sell_start,
            buy_threshold,
            &reentry,
            &start,
            start_weight,
            output_dir,
            json,
        ),
        Commands::Sweep {
            data,
            sell_starts,
            ladders,
            modes,
            buy_thresholds,
            start,
            top,
            json,
        } => sweep_cmd(
            &data,
            sell_starts,
            &ladders,
            &modes,
            buy_thresholds,
            &start,
            top,
            json,
        ),
        Commands::Triggers {
            data,
            ladder,
            sell_start,
            buy_threshold,
            reentry,
            price,
        } => triggers_cmd(&data, &ladder, sell_start, buy_threshold, &reentry, price),
    }
}

fn parse_strategy(
    ladder: &str,
    sell_start: f64,
    buy_threshold: f64,
    reentry: &str,
    start: &str,
    start_weight: f64,
) -> Result<StrategyConfig> {
    let ladder: Ladder = ladder.parse().map_err(anyhow::Error::msg)?;
    let reentry_mode: ReentryMode = reentry.parse().map_err(anyhow::Error::msg)?;
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid start date '{start}'"))?;

    let config = StrategyConfig {
        ladder,
        sell_start,
        buy_threshold,
        reentry_mode,
        start_date,
        start_weight,
    };
    config.validate()?;
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
    ladder: &str,
    sell_start: f64,
    buy_threshold: f64,
    reentry: &str,
    start: &str,
    start_weight: f64,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if config_path.is_some() && data.is_some() {
        bail!("--config and --data are mutually exclusive");
    }

    let (data_path, config, output_dir) = if let Some(path) = config_path {
        let run_config = RunConfig::from_toml_path(&path)?;
        let strategy = run_config.strategy.to_core()?;
        (run_config.data, strategy, run_config.output_dir)
    } else if let Some(path) = data {
        let strategy =
            parse_strategy(ladder, sell_start, buy_threshold, reentry, start, start_weight)?;
        (path, strategy, output_dir)
    } else {
        bail!("one of --config or --data is required");
    };

    let channel = load_channel_file(&data_path)?;
    let backtest = run_backtest(&channel.series, &config)?;
    let report = ComparisonReport::from_backtest(&backtest, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, &config);
    }

    if let Some(dir) = output_dir {
        let saved = save_artifacts(&report, &backtest, &dir)?;
        println!("Report saved to:  {}", saved.report_path.display());
        println!("Equity saved to:  {}", saved.equity_path.display());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sweep_cmd(
    data: &PathBuf,
    sell_starts: Vec<f64>,
    ladders: &[String],
    modes: &[String],
    buy_thresholds: Vec<f64>,
    start: &str,
    top: usize,
    json: bool,
) -> Result<()> {
    let channel = load_channel_file(data)?;

    let ladders: Vec<Ladder> = ladders
        .iter()
        .map(|s| s.parse::<Ladder>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;
    let reentry_modes: Vec<ReentryMode> = modes
        .iter()
        .map(|s| s.parse::<ReentryMode>().map_err(anyhow::Error::msg))
        .collect::<Result<_>>()?;
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid start date '{start}'"))?;

    let base = StrategyConfig {
        start_date,
        ..StrategyConfig::default()
    };
    let grid = SweepGrid {
        sell_starts,
        ladders,
        reentry_modes,
        buy_thresholds,
    };

    let rows = run_sweep(&channel.series, &base, &grid);
    if rows.is_empty() {
        bail!("no valid grid combination could be replayed");
    }

    if json {
        let top_rows: Vec<_> = rows.iter().take(top).collect();
        println!("{}", serde_json::to_string_pretty(&top_rows)?);
        return Ok(());
    }

    println!("Sweep over {} configurations", rows.len());
    println!();
    println!(
        "{:<18} {:<12} {:>6} {:>8} {:<8} {:>9} {:>9} {:>8}",
        "Run", "Ladder", "Sell@", "Buy@", "Re-entry", "Return%", "Delta%", "MaxDD%"
    );
    println!("{}", "-".repeat(84));
    for row in rows.iter().take(top) {
        println!(
            "{:<18} {:<12} {:>6.1} {:>8.1} {:<8} {:>9.2} {:>9.2} {:>8.2}",
            row.run_id,
            row.ladder.to_string(),
            row.sell_start,
            row.buy_threshold,
            row.reentry_mode.to_string(),
            row.strategy_return * 100.0,
            row.performance_delta * 100.0,
            row.strategy_max_drawdown * 100.0,
        );
    }
    println!();
    println!("Hold return: {:.2}%", rows[0].hold_return * 100.0);

    Ok(())
}

fn triggers_cmd(
    data: &PathBuf,
    ladder: &str,
    sell_start: f64,
    buy_threshold: f64,
    reentry: &str,
    price: Option<f64>,
) -> Result<()> {
    let channel = load_channel_file(data)?;
    let config = parse_strategy(ladder, sell_start, buy_threshold, reentry, "2018-01-01", 1.0)?;

    let Some(bounds) = channel.current_bounds else {
        bail!("channel artifact carries no usable trough/peak bounds");
    };

    let spot_source = price.map(StaticPrice::new);
    let spot = effective_price(
        &channel,
        spot_source
            .as_ref()
            .map(|s| s as &dyn chanlab_runner::LivePriceSource),
    );

    print_triggers(&channel, &config, spot);
    println!();

    let outlook = next_triggers(channel.last_ratio, &bounds, &config);
    println!("--- Triggers ---");
    print_trigger_line(&outlook.sell_note, outlook.next_sell.price);
    if let Some(buy) = &outlook.next_buy {
        print_trigger_line(&outlook.buy_note, buy.price);
    } else {
        println!("{}", outlook.buy_note);
    }

    let hints = ladder_hints(config.sell_start, config.ladder);
    println!();
    println!("--- Ladder ({}) ---", config.ladder);
    println!("@ ratio 50%: {:>5.1}% exposure", hints.w50);
    println!("@ ratio 70%: {:>5.1}% exposure", hints.w70);
    println!("@ ratio 90%: {:>5.1}% exposure", hints.w90);

    Ok(())
}

fn print_trigger_line(note: &str, price: Option<f64>) {
    match price {
        Some(p) => println!("{note} (~{p:.0})"),
        None => println!("{note} (price unavailable)"),
    }
}

fn print_triggers(channel: &LoadedChannel, config: &StrategyConfig, spot: f64) {
    println!();
    println!("=== Channel Status ===");
    println!("Updated:        {}", channel.updated_utc);
    println!("Spot price:     {spot:.2}");
    println!("Channel ratio:  {:.1}%", channel.last_ratio);
    println!(
        "Regime:         {}",
        if channel.last_ratio >= config.sell_start {
            "SELL"
        } else {
            "ACCUMULATE"
        }
    );
}

fn print_summary(report: &ComparisonReport, config: &StrategyConfig) {
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", report.run_id);
    println!(
        "Period:         {} to {} ({} days)",
        report.start_date, report.end_date, report.days
    );
    println!(
        "Strategy:       {} ladder, sell@{:.1}, {} re-entry",
        config.ladder, config.sell_start, config.reentry_mode
    );
    println!();
    println!("--- Performance ---");
    println!("Strategy Return: {:>8.2}%", report.strategy_return * 100.0);
    println!("Hold Return:     {:>8.2}%", report.hold_return * 100.0);
    println!("Delta:           {:>8.2}%", report.performance_delta * 100.0);
    println!(
        "Strategy MaxDD:  {:>8.2}%",
        report.strategy_max_drawdown * 100.0
    );
    println!("Hold MaxDD:      {:>8.2}%", report.hold_max_drawdown * 100.0);
    println!("Final Weight:    {:>8.1}%", report.final_weight * 100.0);
    println!(
        "Ratio band:      {:.1}% ± ({:.1}%, {:.1}%)",
        report.ratio_band.mean, report.ratio_band.lower, report.ratio_band.upper
    );
    if let Some(change) = &report.last_change {
        println!();
        println!(
            "Last change:     {} on {} @ ratio {:.1}% → weight {:.1}%",
            change.action,
            change.date,
            change.ratio,
            change.weight * 100.0
        );
    }
    println!();
}
