/// Configuration errors raised while building a calibrated generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Returned when the target rate is NaN or outside `(0, 1]`.
    #[error("invalid target rate: {0} must be in (0, 1.0]")]
    InvalidTarget(f64),

    /// Returned when the partition size is zero.
    #[error("invalid partition size: must be at least 1")]
    InvalidPartitionSize,

    /// Returned when the calibrator iteration budget is outside `1..=100`.
    #[error("invalid iteration budget: {0} must be in 1..=100")]
    InvalidIterations(usize),

    /// Returned when the convergence tolerance is not a positive finite number.
    #[error("invalid tolerance: {0} must be positive and finite")]
    InvalidTolerance(f64),

    /// Returned when the gamma search bracket is empty or not finite.
    #[error("invalid gamma bracket: lower ({lower}) must be less than upper ({upper})")]
    InvalidBracket {
        /// Lower end of the bracket.
        lower: f64,
        /// Upper end of the bracket.
        upper: f64,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
