//! Outcome generator whose long-run win rate converges to a target RTP.
//!
//! The outcome space `[0, N]` is split into `N` unit buckets. Each bucket gets
//! a weight from an exponential family `exp(gamma * x)`; [`calibrate`] solves
//! for the `gamma` whose average win probability against a uniform integer
//! threshold in `[1, N]` matches the target, and [`sampler`] draws continuous
//! outcomes from the resulting distribution by inverse CDF.
//!
//! ```
//! use rand::SeedableRng;
//!
//! let state = rtp_core::CalibratedState::initialize(0.5, 1_000)?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let outcome = state.sample(&mut rng);
//! assert!((0.0..=1_000.0).contains(&outcome));
//! # Ok::<(), rtp_core::Error>(())
//! ```

pub mod calibrate;
pub mod error;
pub mod estimator;
pub mod sampler;
pub mod state;
pub mod weights;

pub use calibrate::{CalibrationReport, Calibrator, CalibratorConfig};
pub use error::{Error, Result};
pub use state::CalibratedState;
