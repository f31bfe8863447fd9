use crate::error::{Error, Result};
use crate::estimator::average_win_probability_for;

/// Default iteration budget for the bisection.
pub const DEFAULT_MAX_ITERATIONS: usize = 60;
/// Hard upper limit on the iteration budget.
pub const MAX_ITERATIONS_LIMIT: usize = 100;
/// Absolute tolerance on the average win probability.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Default gamma search bracket.
pub const DEFAULT_BRACKET: (f64, f64) = (-200.0, 200.0);

/// Tuning knobs for [`Calibrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratorConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            lower: DEFAULT_BRACKET.0,
            upper: DEFAULT_BRACKET.1,
        }
    }
}

/// Outcome of a gamma search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationReport {
    /// Best gamma found.
    pub gamma: f64,
    /// Average win probability at `gamma`.
    pub achieved: f64,
    /// Number of objective evaluations spent in the bisection.
    pub iterations: usize,
    /// Whether `achieved` landed within tolerance of the target.
    pub converged: bool,
}

/// Bisection search for the gamma that hits a target average win probability.
///
/// The average win probability is strictly increasing in gamma: a larger
/// gamma shifts mass toward the high buckets, which beat more thresholds.
/// That monotonicity is what makes bisection valid here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calibrator {
    config: CalibratorConfig,
}

impl Calibrator {
    pub fn new(config: CalibratorConfig) -> Result<Self> {
        if config.max_iterations == 0 || config.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(Error::InvalidIterations(config.max_iterations));
        }
        if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
            return Err(Error::InvalidTolerance(config.tolerance));
        }
        if !(config.lower.is_finite() && config.upper.is_finite() && config.lower < config.upper) {
            return Err(Error::InvalidBracket {
                lower: config.lower,
                upper: config.upper,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Search for the gamma whose average win probability over `n` buckets
    /// matches `target`.
    ///
    /// Returns early once the estimate is within tolerance. When the budget
    /// runs out first, the midpoint of the final bracket is returned with
    /// `converged == false`; that is a best effort, not an error.
    pub fn solve(&self, target: f64, n: usize) -> CalibrationReport {
        let (mut lo, mut hi) = (self.config.lower, self.config.upper);

        for i in 0..self.config.max_iterations {
            let mid = (lo + hi) / 2.0;
            let p = average_win_probability_for(mid, n);

            if (p - target).abs() < self.config.tolerance {
                tracing::debug!(
                    rtp = target,
                    gamma = mid,
                    achieved = p,
                    iterations = i + 1,
                    "calibration converged"
                );
                return CalibrationReport {
                    gamma: mid,
                    achieved: p,
                    iterations: i + 1,
                    converged: true,
                };
            }

            if p < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let gamma = (lo + hi) / 2.0;
        let achieved = average_win_probability_for(gamma, n);
        tracing::warn!(
            rtp = target,
            gamma,
            achieved,
            error = (achieved - target).abs(),
            iterations = self.config.max_iterations,
            "calibration did not reach tolerance, using final bracket midpoint"
        );

        CalibrationReport {
            gamma,
            achieved,
            iterations: self.config.max_iterations,
            converged: false,
        }
    }
}
