//! Polarization of a sentiment distribution.
//!
//! With `p` and `n` the positive and negative fractions of the sample:
//!
//! ```text
//! polarization = (p + n) * (1 - |p - n|)
//! ```
//!
//! The result is in `[0, 1]`: zero when every post is neutral, `1.0` when the
//! sample splits evenly between positive and negative with nothing neutral,
//! and unchanged when the two sides are swapped.

use crate::stats::Statistics;

/// Polarization for the bucket counts in `stats`, or `None` for an empty sample.
pub fn compute(stats: &Statistics) -> Option<f64> {
    if stats.total_posts == 0 {
        return None;
    }

    let total = stats.total_posts as f64;
    let positive = stats.positive_posts as f64 / total;
    let negative = stats.negative_posts as f64 / total;

    Some(((positive + negative) * (1.0 - (positive - negative).abs())).clamp(0.0, 1.0))
}

/// `stats` with its polarization score filled in.
pub fn apply(mut stats: Statistics) -> Statistics {
    stats.polarization_score = compute(&stats);
    stats
}
