//! The sell ladder — a pure mapping from channel ratio to target weight.

use crate::domain::Ladder;

/// Target exposure weight for a given channel ratio, in `[0, 1]`.
///
/// Below `sell_start` the ladder is flat at 1.0; at the channel peak (ratio
/// 100) it reaches 0.0. In between, the ratio is normalized to
/// `x = (ratio - sell_start) / (100 - sell_start)` and the shape applied.
/// The peak and a degenerate width are checked before the threshold, so a
/// `sell_start >= 100` yields 0.0 everywhere instead of full exposure.
///
/// Stateless and monotonically non-increasing in `ratio` on
/// `[sell_start, 100]` for every variant. A non-finite ratio maps to 1.0;
/// the fail-safe hold for bad data lives in [`crate::policy::step_weight`],
/// which is the only caller on the replay path.
pub fn ladder_weight(ratio: f64, sell_start: f64, ladder: Ladder) -> f64 {
    if !ratio.is_finite() {
        return 1.0;
    }
    if ratio >= 100.0 {
        return 0.0;
    }

    let width = 100.0 - sell_start;
    if width <= 0.0 {
        // Degenerate sell_start >= 100: the entire channel sits above the
        // threshold and the width must never be divided by.
        return 0.0;
    }
    if ratio <= sell_start {
        return 1.0;
    }

    let x = ((ratio - sell_start) / width).clamp(0.0, 1.0);
    match ladder {
        Ladder::Soft => (1.0 - x * x).clamp(0.0, 1.0),
        Ladder::Linear => (1.0 - x).clamp(0.0, 1.0),
        Ladder::Aggressive => {
            let base = (1.0 - x).clamp(0.0, 1.0);
            base * base
        }
    }
}

/// Ladder weights at reference ratios 50/70/90, as percentages.
///
/// Display-surface helper: lets a control panel show what the configured
/// ladder would do at familiar points without replaying anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderHints {
    pub w50: f64,
    pub w70: f64,
    pub w90: f64,
}

pub fn ladder_hints(sell_start: f64, ladder: Ladder) -> LadderHints {
    LadderHints {
        w50: ladder_weight(50.0, sell_start, ladder) * 100.0,
        w70: ladder_weight(70.0, sell_start, ladder) * 100.0,
        w90: ladder_weight(90.0, sell_start, ladder) * 100.0,
    }
}
