//! Trigger/price projector — maps ratio thresholds back to estimated price
//! levels using the current day's channel bounds.
//!
//! Strictly a read-only projection for "what price triggers the next
//! action" answers; nothing here touches policy state.

use serde::{Deserialize, Serialize};

use crate::domain::{ChannelBounds, ReentryMode, StrategyConfig};

/// Price at a given channel ratio, or `None` when the channel is degenerate
/// (`peak - trough` non-finite or not positive).
pub fn price_for_ratio(ratio_pct: f64, bounds: &ChannelBounds) -> Option<f64> {
    if !ratio_pct.is_finite() {
        return None;
    }
    let width = bounds.width()?;
    Some(bounds.trough + ratio_pct / 100.0 * width)
}

/// A ratio threshold and its projected price (unavailable on a degenerate
/// channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub ratio: f64,
    pub price: Option<f64>,
}

/// The next actionable thresholds for the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerOutlook {
    /// Next ratio at which exposure is (further) reduced.
    pub next_sell: Trigger,
    /// Ratio at which wait-mode re-entry returns to 100%. `None` for the
    /// other modes, where re-entry has no single trigger ratio.
    pub next_buy: Option<Trigger>,
    pub sell_note: String,
    pub buy_note: String,
}

/// Projects the next sell and buy triggers from the current ratio and the
/// current day's channel bounds.
///
/// Below `sell_start` the next sell trigger is the threshold itself; inside
/// the sell regime it is the next whole-ratio rung above the current
/// position (capped at 100).
pub fn next_triggers(
    current_ratio: f64,
    bounds: &ChannelBounds,
    config: &StrategyConfig,
) -> TriggerOutlook {
    let in_sell_regime = current_ratio >= config.sell_start;

    let (next_sell, sell_note) = if in_sell_regime {
        let next_ratio = (current_ratio + 1.0).min(100.0);
        (
            Trigger {
                ratio: next_ratio,
                price: price_for_ratio(next_ratio, bounds),
            },
            format!("DOWN: lower exposure @ ratio {next_ratio:.1}%"),
        )
    } else {
        (
            Trigger {
                ratio: config.sell_start,
                price: price_for_ratio(config.sell_start, bounds),
            },
            format!("SELL begins @ ratio {:.1}%", config.sell_start),
        )
    };

    let (next_buy, buy_note) = match config.reentry_mode {
        ReentryMode::Wait => (
            Some(Trigger {
                ratio: config.buy_threshold,
                price: price_for_ratio(config.buy_threshold, bounds),
            }),
            format!("RE-ENTRY: 100% @ ratio {:.1}%", config.buy_threshold),
        ),
        ReentryMode::Gradual => (
            None,
            format!(
                "UP: higher exposure as ratio falls below {:.1}%",
                config.sell_start
            ),
        ),
        ReentryMode::Instant => (
            None,
            format!("BUY: below {:.1}% instantly 100%", config.sell_start),
        ),
    };

    TriggerOutlook {
        next_sell,
        next_buy,
        sell_note,
        buy_note,
    }
}
