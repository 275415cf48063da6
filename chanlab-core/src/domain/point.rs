//! ChannelPoint and ChannelBounds — the per-day market data units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of channel data: closing price and the asset's position inside
/// the channel.
///
/// `ratio` runs from 0 (at the trough line) to 100 (at the peak line). It is
/// supplied by the upstream channel-fitting job, not derived here; series
/// construction clamps it into `[0, 100]`.
///
/// Keeping date, price, and ratio in one record (instead of three parallel
/// arrays) removes the positional-index coupling the replay loop would
/// otherwise depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub ratio: f64,
}

impl ChannelPoint {
    /// Returns true if the price can back a one-day return computation.
    pub fn has_usable_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// The channel's lower ("trough") and upper ("peak") price levels for a
/// given date.
///
/// Invariant `peak > trough` is not assumed: any derivation that needs the
/// channel width goes through [`ChannelBounds::width`], which reports a
/// degenerate channel as unavailable instead of producing a negative width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBounds {
    pub trough: f64,
    pub peak: f64,
}

impl ChannelBounds {
    /// Channel width, or `None` when the bounds are degenerate
    /// (non-finite, or `peak <= trough`).
    pub fn width(&self) -> Option<f64> {
        let width = self.peak - self.trough;
        if width.is_finite() && width > 0.0 && self.trough.is_finite() {
            Some(width)
        } else {
            None
        }
    }
}
