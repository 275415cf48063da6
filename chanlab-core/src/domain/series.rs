//! ChannelSeries — the validated, ordered sequence of channel points.
//!
//! Construction is the validation boundary: dates must be strictly ascending
//! (which also enforces uniqueness), and finite ratios are clamped into
//! `[0, 100]`. Gaps between dates are tolerated — no uniform spacing is
//! required. Past this point the replay loop can trust ordering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ChannelPoint;

/// Errors raised while constructing a [`ChannelSeries`].
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("dates out of order at index {index}: {date} does not follow {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date at index {index}: {date}")]
    DuplicateDate { index: usize, date: NaiveDate },
}

/// Ordered channel history with ascending, unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSeries {
    points: Vec<ChannelPoint>,
}

impl ChannelSeries {
    /// Validates ordering and clamps finite ratios into `[0, 100]`.
    ///
    /// Non-finite ratios are kept as-is; the policy treats them as
    /// untradable data and holds.
    pub fn new(mut points: Vec<ChannelPoint>) -> Result<Self, SeriesError> {
        for i in 1..points.len() {
            let previous = points[i - 1].date;
            let date = points[i].date;
            if date == previous {
                return Err(SeriesError::DuplicateDate { index: i, date });
            }
            if date < previous {
                return Err(SeriesError::OutOfOrder {
                    index: i,
                    previous,
                    date,
                });
            }
        }
        for p in &mut points {
            if p.ratio.is_finite() {
                p.ratio = p.ratio.clamp(0.0, 100.0);
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ChannelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&ChannelPoint> {
        self.points.last()
    }

    /// Index of the first point dated at or after `date`.
    ///
    /// Binary search is valid because construction guarantees ascending order.
    pub fn first_at_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.date < date);
        if idx < self.points.len() {
            Some(idx)
        } else {
            None
        }
    }
}
