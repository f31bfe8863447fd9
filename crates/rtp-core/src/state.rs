use crate::calibrate::{CalibrationReport, Calibrator, CalibratorConfig};
use crate::error::{Error, Result};
use crate::estimator;
use crate::sampler;
use crate::weights::{cumulative, exp_gamma_weights};
use rand::Rng;

/// Immutable bundle produced by calibration: weights, cumulative table and
/// the search report for one `(target, N)` pair.
///
/// Sampling only reads the tables, so one instance can be shared behind an
/// `Arc` by any number of concurrent callers, each bringing its own RNG.
#[derive(Debug, Clone)]
pub struct CalibratedState {
    target: f64,
    report: CalibrationReport,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl CalibratedState {
    /// Calibrate for `target` over `partition_size` buckets with the default
    /// search settings.
    pub fn initialize(target: f64, partition_size: usize) -> Result<Self> {
        Self::initialize_with(target, partition_size, CalibratorConfig::default())
    }

    /// Calibrate with explicit search settings.
    ///
    /// Fails when `target` is outside `(0, 1]`, when `partition_size` is zero,
    /// or when `config` is invalid. Failing to reach the tolerance is not an
    /// error; see [`CalibrationReport::converged`].
    pub fn initialize_with(
        target: f64,
        partition_size: usize,
        config: CalibratorConfig,
    ) -> Result<Self> {
        // Written so NaN is rejected too.
        if !(target > 0.0 && target <= 1.0) {
            return Err(Error::InvalidTarget(target));
        }
        if partition_size == 0 {
            return Err(Error::InvalidPartitionSize);
        }

        let report = Calibrator::new(config)?.solve(target, partition_size);
        let weights = exp_gamma_weights(report.gamma, partition_size);
        let cumulative = cumulative(&weights);

        tracing::info!(
            rtp = target,
            gamma = report.gamma,
            achieved = report.achieved,
            iterations = report.iterations,
            converged = report.converged,
            partition_size,
            "generator calibrated"
        );

        Ok(Self {
            target,
            report,
            weights,
            cumulative,
        })
    }

    /// Draw one outcome in `[0, N]`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sampler::sample(&self.cumulative, rng)
    }

    /// Probability that an outcome beats the integer `threshold`.
    pub fn win_probability(&self, threshold: usize) -> f64 {
        estimator::win_probability(&self.weights, threshold)
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn gamma(&self) -> f64 {
        self.report.gamma
    }

    pub fn partition_size(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn report(&self) -> &CalibrationReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn rejects_targets_outside_unit_interval() {
        for target in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let err = CalibratedState::initialize(target, 100).unwrap_err();
            assert!(matches!(err, Error::InvalidTarget(_)), "target {target}");
        }
    }

    #[test]
    fn rejects_empty_partition() {
        assert_eq!(
            CalibratedState::initialize(0.5, 0).unwrap_err(),
            Error::InvalidPartitionSize
        );
    }

    #[test]
    fn surfaces_calibrator_config_errors() {
        let config = CalibratorConfig {
            max_iterations: 500,
            ..CalibratorConfig::default()
        };
        assert_eq!(
            CalibratedState::initialize_with(0.5, 100, config).unwrap_err(),
            Error::InvalidIterations(500)
        );
    }

    #[test]
    fn full_target_is_accepted_best_effort() {
        let state = CalibratedState::initialize(1.0, 1_000).unwrap();
        assert!(!state.report().converged);
        assert!(state.report().achieved > 0.99);
    }

    #[test]
    fn tables_match_the_report() {
        let state = CalibratedState::initialize(0.8, 2_000).unwrap();
        assert_eq!(state.partition_size(), 2_000);
        assert_eq!(state.weights(), exp_gamma_weights(state.gamma(), 2_000).as_slice());
        assert_eq!(state.cumulative().len(), 2_000);
        assert!((state.cumulative()[1_999] - 1.0).abs() < 1e-9);
        assert!(state.weights().windows(2).all(|w| w[0] <= w[1]));
        assert!(state.win_probability(1) > state.win_probability(1_000));
    }

    #[test]
    fn initialize_is_deterministic() {
        let a = CalibratedState::initialize(0.42, 10_000).unwrap();
        let b = CalibratedState::initialize(0.42, 10_000).unwrap();
        assert_eq!(a.gamma(), b.gamma());
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.cumulative(), b.cumulative());
    }

    #[test]
    fn samples_stay_in_range() {
        for target in [0.05, 0.5, 0.99] {
            let state = CalibratedState::initialize(target, 10_000).unwrap();
            let mut rng = StdRng::seed_from_u64(99);
            let outside = (0..100_000)
                .map(|_| state.sample(&mut rng))
                .filter(|v| !(0.0..=10_000.0).contains(v))
                .count();
            assert_eq!(outside, 0);
        }
    }

    #[test]
    fn state_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CalibratedState>();

        let state = Arc::new(CalibratedState::initialize(0.6, 1_000).unwrap());
        std::thread::scope(|s| {
            for seed in 0..4u64 {
                let state = Arc::clone(&state);
                s.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    for _ in 0..10_000 {
                        let v = state.sample(&mut rng);
                        assert!((0.0..=1_000.0).contains(&v));
                    }
                });
            }
        });
    }
}
