//! Boundary traits for the live-price feed.
//!
//! Network fetching lives outside this workspace. The runner only defines
//! the seams: something that can produce a current price snapshot, and
//! something that can be poked to refresh the channel artifact. Callers wire
//! in real implementations; tests and offline runs use [`StaticPrice`].

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::data_loader::LoadedChannel;

/// A spot price observation from some external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    pub currency: String,
    pub source: String,
    pub unix_time: i64,
}

/// Source of current spot prices.
pub trait LivePriceSource {
    fn latest(&self) -> Result<PriceSnapshot>;
}

/// Handle for requesting a channel-artifact refresh from the external job.
pub trait RefreshTrigger {
    fn request_refresh(&self) -> Result<()>;
}

/// Fixed-price source for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticPrice {
    snapshot: PriceSnapshot,
}

impl StaticPrice {
    pub fn new(price: f64) -> Self {
        Self {
            snapshot: PriceSnapshot {
                price,
                currency: "USD".to_string(),
                source: "static".to_string(),
                unix_time: 0,
            },
        }
    }
}

impl LivePriceSource for StaticPrice {
    fn latest(&self) -> Result<PriceSnapshot> {
        Ok(self.snapshot.clone())
    }
}

/// Requests an artifact refresh when the channel's `updated_utc` timestamp
/// is older than `max_age` relative to `now`. An unreadable timestamp counts
/// as stale. Returns whether a refresh was requested.
pub fn refresh_if_stale(
    channel: &LoadedChannel,
    trigger: &dyn RefreshTrigger,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<bool> {
    let stale = match DateTime::parse_from_rfc3339(&channel.updated_utc) {
        Ok(updated) => now.signed_duration_since(updated.with_timezone(&Utc)) > max_age,
        Err(_) => true,
    };
    if stale {
        trigger.request_refresh()?;
    }
    Ok(stale)
}

/// Current price for trigger projection: the live snapshot when the source
/// yields a usable one, otherwise the channel's last close.
pub fn effective_price(channel: &LoadedChannel, source: Option<&dyn LivePriceSource>) -> f64 {
    if let Some(source) = source {
        if let Ok(snapshot) = source.latest() {
            if snapshot.price.is_finite() && snapshot.price > 0.0 {
                return snapshot.price;
            }
        }
    }
    channel.last_price
}
