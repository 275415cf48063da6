//! Domain types: channel points, bounds, the validated series, and strategy
//! configuration.

pub mod config;
pub mod point;
pub mod series;

pub use config::{ConfigError, Ladder, ReentryMode, RunId, StrategyConfig};
pub use point::{ChannelBounds, ChannelPoint};
pub use series::{ChannelSeries, SeriesError};
