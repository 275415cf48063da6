//! ChanLab Runner — orchestration around the core engine.
//!
//! - Loading the channel JSON artifact produced by the external refresh job
//! - TOML run configuration
//! - Comparison reporting (policy vs hold-only baseline)
//! - Artifact export (JSON report + CSV equity curves)
//! - Parallel parameter sweeps
//! - Boundary traits for the external live-price feed

pub mod config;
pub mod data_loader;
pub mod export;
pub mod feed;
pub mod report;
pub mod sweep;

pub use config::RunConfig;
pub use data_loader::{load_channel_file, ChannelFileError, LoadedChannel};
pub use export::{save_artifacts, SavedArtifacts};
pub use feed::{
    effective_price, refresh_if_stale, LivePriceSource, PriceSnapshot, RefreshTrigger, StaticPrice,
};
pub use report::ComparisonReport;
pub use sweep::{run_sweep, SweepGrid, SweepRow};
