/// Build the normalized exponential weight vector for `n` buckets.
///
/// Bucket `i` (1-based) sits at `x = i / n` and gets weight
/// `exp(gamma * (x - 0.5))`, scaled so the vector sums to 1. Positive `gamma`
/// favors the high buckets, negative `gamma` the low ones, and `gamma == 0`
/// yields the uniform distribution.
///
/// Every exponent is shifted by the largest one before `exp`, so the biggest
/// unnormalized weight is exactly 1 and nothing overflows for any finite
/// `gamma`. The shift cancels out in the normalization.
pub fn exp_gamma_weights(gamma: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let n_f = n as f64;
    // Top bucket carries the largest exponent for gamma >= 0, the first bucket otherwise.
    let offset = if gamma >= 0.0 {
        gamma * 0.5
    } else {
        gamma * (1.0 / n_f - 0.5)
    };

    let mut weights: Vec<f64> = (1..=n)
        .map(|i| {
            let x = i as f64 / n_f;
            (gamma * (x - 0.5) - offset).exp()
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Running prefix sum of `weights`. The last entry is 1.0 up to rounding.
pub fn cumulative(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |acc, &w| {
            *acc += w;
            Some(*acc)
        })
        .collect()
}
