//! Channel artifact loading.
//!
//! The external refresh job fits the fair-value curve, detects peaks and
//! troughs, and writes one JSON artifact with columnar series plus extended
//! channel-line projections. This module is the boundary: it parses that
//! artifact, validates column alignment, and converts it into the core's
//! per-day record series. The fitting itself never happens here.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chanlab_core::domain::{ChannelBounds, ChannelPoint, ChannelSeries, SeriesError};

/// Errors raised while loading a channel artifact.
#[derive(Debug, Error)]
pub enum ChannelFileError {
    #[error("failed to read channel file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse channel file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("column '{column}' has {actual} entries, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unparseable date '{value}' at index {index}")]
    BadDate { value: String, index: usize },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Artifact metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub start: String,
    pub end: String,
    pub updated_utc: String,
}

/// Historical price and channel-position columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesColumns {
    pub date: Vec<String>,
    pub price: Vec<f64>,
    pub fair: Vec<f64>,
    pub log10_r: Vec<f64>,
    pub ratio: Vec<f64>,
}

/// Extended channel-line projections (run past the end of the history).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedColumns {
    pub date: Vec<String>,
    pub fair: Vec<f64>,
    pub peak_line_price: Vec<f64>,
    pub trough_line_price: Vec<f64>,
    pub peak_line_log10: Vec<f64>,
    pub trough_line_log10: Vec<f64>,
}

/// The raw channel artifact as written by the refresh job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelFile {
    pub meta: ChannelMeta,
    pub series: SeriesColumns,
    pub extended: ExtendedColumns,
}

/// Channel data after validation and conversion for the engine.
#[derive(Debug, Clone)]
pub struct LoadedChannel {
    pub series: ChannelSeries,
    /// Trough/peak levels for the latest historical day, when the extended
    /// projections cover it.
    pub current_bounds: Option<ChannelBounds>,
    pub last_price: f64,
    pub last_ratio: f64,
    pub updated_utc: String,
}

impl ChannelFile {
    /// Validates column alignment and converts into engine types.
    pub fn into_channel(self) -> Result<LoadedChannel, ChannelFileError> {
        let n = self.series.date.len();
        check_len("price", n, self.series.price.len())?;
        check_len("ratio", n, self.series.ratio.len())?;
        check_len("fair", n, self.series.fair.len())?;
        check_len("log10_r", n, self.series.log10_r.len())?;

        let mut points = Vec::with_capacity(n);
        for (i, date_str) in self.series.date.iter().enumerate() {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
                ChannelFileError::BadDate {
                    value: date_str.clone(),
                    index: i,
                }
            })?;
            points.push(ChannelPoint {
                date,
                price: self.series.price[i],
                ratio: self.series.ratio[i],
            });
        }
        let series = ChannelSeries::new(points)?;

        // The extended lines are indexed like the historical series and then
        // continue into the future; the last historical index carries today's
        // bounds.
        let current_bounds = if n > 0
            && n <= self.extended.trough_line_price.len()
            && n <= self.extended.peak_line_price.len()
        {
            Some(ChannelBounds {
                trough: self.extended.trough_line_price[n - 1],
                peak: self.extended.peak_line_price[n - 1],
            })
        } else {
            None
        };

        let last_price = self.series.price.last().copied().unwrap_or(0.0);
        let last_ratio = self.series.ratio.last().copied().unwrap_or(0.0);

        Ok(LoadedChannel {
            series,
            current_bounds,
            last_price,
            last_ratio,
            updated_utc: self.meta.updated_utc,
        })
    }
}

fn check_len(
    column: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ChannelFileError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ChannelFileError::ColumnLengthMismatch {
            column,
            expected,
            actual,
        })
    }
}

/// Reads and converts a channel artifact from disk.
pub fn load_channel_file(path: &Path) -> Result<LoadedChannel, ChannelFileError> {
    let raw = fs::read_to_string(path)?;
    let file: ChannelFile = serde_json::from_str(&raw)?;
    file.into_channel()
}
