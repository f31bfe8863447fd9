//! Win-probability estimates used as the calibration objective.
//!
//! An outcome drawn from 0-based bucket `i` lies in `[i, i + 1)`, so it beats
//! an integer threshold `X` exactly when `i >= X`.

use crate::weights::exp_gamma_weights;

/// Probability that an outcome beats the integer `threshold`.
///
/// This is the tail sum of `weights` from 0-based index `threshold` onwards.
/// A threshold at or past the last bucket can never be beaten.
pub fn win_probability(weights: &[f64], threshold: usize) -> f64 {
    weights.iter().skip(threshold).sum()
}

/// Average of [`win_probability`] over every threshold `X` in `1..=N`.
///
/// Runs in O(N): walking the buckets from the top, the running tail sum is
/// the win probability for the threshold at the current index.
pub fn average_win_probability(weights: &[f64]) -> f64 {
    let n = weights.len();
    if n == 0 {
        return 0.0;
    }

    // Threshold N contributes an empty tail.
    let (_, total) = weights
        .iter()
        .skip(1)
        .rev()
        .fold((0.0, 0.0), |(tail, total), &w| {
            let tail = tail + w;
            (tail, total + tail)
        });

    total / n as f64
}

/// Build the weights for `(gamma, n)` and return their average win probability.
pub fn average_win_probability_for(gamma: f64, n: usize) -> f64 {
    average_win_probability(&exp_gamma_weights(gamma, n))
}
