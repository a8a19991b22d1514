/// Errors returned by the optimizer.
///
/// Validation errors ([`DimensionMismatch`](Error::DimensionMismatch),
/// [`UnknownParameter`](Error::UnknownParameter),
/// [`InvalidBounds`](Error::InvalidBounds), [`NonFinite`](Error::NonFinite))
/// are raised by the call that caused them and never leave partial state
/// behind. [`Objective`](Error::Objective) carries the objective's own error
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a point vector does not have one entry per parameter.
    #[error("dimension mismatch: expected {expected} values but got {got}")]
    DimensionMismatch {
        /// Number of parameters in the space.
        expected: usize,
        /// Length of the offending vector.
        got: usize,
    },

    /// Returned when a named parameter is not part of the space, or when a
    /// parameter of the space is missing from a mapping.
    #[error("unknown parameter '{name}': {reason}")]
    UnknownParameter {
        /// The offending parameter name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds for '{name}': low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The parameter whose bounds were rejected.
        name: String,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a coordinate or target is NaN or infinite.
    #[error("non-finite {what}")]
    NonFinite {
        /// What was non-finite (a coordinate or the target).
        what: &'static str,
    },

    /// Returned when the surrogate could not be fitted even after adding jitter.
    #[error("surrogate fit failed: {0}")]
    SurrogateFit(String),

    /// Returned when the objective function fails. The source error is
    /// passed through unchanged.
    #[error("objective evaluation failed: {0}")]
    Objective(#[source] Box<dyn core::error::Error + Send + Sync>),

    /// Returned when reading or writing a log file fails.
    #[cfg(feature = "journal")]
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized `Result` type for optimizer operations.
pub type Result<T> = core::result::Result<T, Error>;
