//! Inverse-CDF sampling over a cumulative table.

use rand::Rng;

/// Smallest bucket index whose cumulative value is at least `r`.
///
/// Draws past the last entry (possible when rounding leaves the table's tail
/// a hair below 1.0) land in the last bucket.
#[inline]
pub fn lower_bound(cumulative: &[f64], r: f64) -> usize {
    let last = cumulative.len().saturating_sub(1);
    cumulative.partition_point(|&c| r > c).min(last)
}

/// Map a bucket draw `r` and a jitter draw, both in `[0, 1)`, to an outcome
/// in `[0, N]`.
///
/// The jitter spreads the outcome uniformly over the selected bucket's unit
/// interval. The result never exceeds `N`.
pub fn outcome(cumulative: &[f64], r: f64, jitter: f64) -> f64 {
    let n = cumulative.len() as f64;
    let value = lower_bound(cumulative, r) as f64 + jitter;
    if value > n {
        tracing::debug!(value, n, "outcome clamped to partition size");
        return n;
    }
    value
}

/// Draw one outcome using two independent uniform draws from `rng`.
#[inline]
pub fn sample<R: Rng + ?Sized>(cumulative: &[f64], rng: &mut R) -> f64 {
    let r: f64 = rng.gen();
    let jitter: f64 = rng.gen();
    outcome(cumulative, r, jitter)
}
