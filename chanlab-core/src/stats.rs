//! Statistics — pure functions over equity curves and ratio sub-series.
//!
//! Everything here is reporting-side: nothing feeds back into the policy.

use serde::{Deserialize, Serialize};

/// One-pass sample statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
}

/// Welford's online mean and sample standard deviation.
///
/// Non-finite entries are skipped; `std` is 0 with fewer than 2 valid
/// samples.
pub fn mean_std<I>(values: I) -> SampleStats
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for v in values {
        if !v.is_finite() {
            continue;
        }
        count += 1;
        let delta = v - mean;
        mean += delta / count as f64;
        m2 += delta * (v - mean);
    }

    let variance = if count > 1 {
        m2 / (count - 1) as f64
    } else {
        0.0
    };
    SampleStats {
        count,
        mean,
        std: variance.max(0.0).sqrt(),
    }
}

/// Maximum drawdown as a negative fraction (e.g., -0.25 = 25% drawdown).
///
/// Running-peak tracking; drawdown at each step is `value/peak - 1` when the
/// peak is positive. Returns 0.0 for a curve that never falls below its
/// peak. Non-finite entries are skipped, not zero-filled.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0;

    for &v in values {
        if !v.is_finite() {
            continue;
        }
        if v > peak {
            peak = v;
        }
        let dd = if peak > 0.0 { v / peak - 1.0 } else { 0.0 };
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Mean ± one standard deviation of a ratio sub-series, clamped to the
/// channel's `[0, 100]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioBand {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl RatioBand {
    pub fn from_ratios<I>(ratios: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let stats = mean_std(ratios);
        Self {
            mean: stats.mean,
            lower: (stats.mean - stats.std).clamp(0.0, 100.0),
            upper: (stats.mean + stats.std).clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_std_known_values() {
        let s = mean_std([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert!((s.std - 1.5811388300841898).abs() < 1e-9);
    }

    #[test]
    fn mean_std_constant_series() {
        let s = mean_std([50.0, 50.0, 50.0]);
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 50.0);
        assert_eq!(s.std, 0.0);
    }

    #[test]
    fn mean_std_skips_non_finite() {
        let s = mean_std([1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(s.count, 2);
        assert!((s.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mean_std_single_sample_has_zero_std() {
        let s = mean_std([7.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.std, 0.0);
    }

    #[test]
    fn max_drawdown_monotone_increase_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 1.1, 1.2, 1.3]), 0.0);
    }

    #[test]
    fn max_drawdown_half() {
        assert!((max_drawdown(&[1.0, 0.5, 1.0]) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_tracks_worst() {
        let dd = max_drawdown(&[1.0, 1.5, 1.2, 1.8, 0.9]);
        assert!((dd - (0.9 / 1.8 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_skips_non_finite() {
        let dd = max_drawdown(&[1.0, f64::NAN, 0.5, 1.0]);
        assert!((dd - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_empty_is_zero() {
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn ratio_band_clamped_to_channel() {
        // Tight to the trough: mean - std would go negative.
        let band = RatioBand::from_ratios([0.0, 2.0, 4.0]);
        assert!(band.lower >= 0.0);
        assert!(band.upper > band.lower);

        let band = RatioBand::from_ratios([96.0, 98.0, 100.0]);
        assert!(band.upper <= 100.0);
    }

    #[test]
    fn ratio_band_of_constants_collapses() {
        let band = RatioBand::from_ratios([50.0, 50.0, 50.0]);
        assert_eq!(band.mean, 50.0);
        assert_eq!(band.lower, 50.0);
        assert_eq!(band.upper, 50.0);
    }
}
