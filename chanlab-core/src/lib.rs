//! ChanLab Core — channel-position rebalancing engine.
//!
//! This crate contains the heart of the advisor:
//! - Domain types (channel points, bounds, series, strategy configuration)
//! - Sell-ladder function mapping channel ratio to target exposure
//! - Rebalance policy state machine (hysteresis + re-entry modes)
//! - Day-by-day backtest replay producing policy vs hold equity curves
//! - Statistics (Welford mean/std, max drawdown, distribution banding)
//! - Trigger/price projector for "what price triggers the next action"
//!
//! The core is synchronous, does no I/O, and is deterministic: identical
//! inputs produce bit-identical outputs. All state is scoped to one backtest
//! invocation, so concurrent runs over a shared series need no locking.

pub mod backtest;
pub mod domain;
pub mod policy;
pub mod stats;
pub mod triggers;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the runner shares across rayon workers
    /// is Send + Sync. If any type fails this check, the build breaks
    /// immediately instead of at the first parallel sweep.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::ChannelPoint>();
        require_sync::<domain::ChannelPoint>();
        require_send::<domain::ChannelSeries>();
        require_sync::<domain::ChannelSeries>();
        require_send::<domain::ChannelBounds>();
        require_sync::<domain::ChannelBounds>();
        require_send::<domain::StrategyConfig>();
        require_sync::<domain::StrategyConfig>();
        require_send::<domain::RunId>();
        require_sync::<domain::RunId>();

        require_send::<policy::ExposureState>();
        require_sync::<policy::ExposureState>();
        require_send::<policy::StepResult>();
        require_sync::<policy::StepResult>();

        require_send::<backtest::BacktestReport>();
        require_sync::<backtest::BacktestReport>();
        require_send::<backtest::BacktestError>();
        require_sync::<backtest::BacktestError>();

        require_send::<stats::RatioBand>();
        require_sync::<stats::RatioBand>();
        require_send::<triggers::TriggerOutlook>();
        require_sync::<triggers::TriggerOutlook>();
    }
}
