//! The [`Objective`] trait defines what gets maximized.
//!
//! Closures of the form `FnMut(&Params) -> Result<f64, E>` implement it
//! directly:
//!
//! ```
//! use bayes_opt::{BayesianOptimization, Params};
//!
//! let objective = |p: &Params| Ok::<_, String>(-(p["x"] - 1.0).powi(2));
//! let mut optimizer = BayesianOptimization::new(objective, [("x", (-3.0, 3.0))]).unwrap();
//! # let _ = &mut optimizer;
//! ```
//!
//! Implement the trait on a struct when the objective carries state of its
//! own, such as a counter or a handle to an external system.

use crate::types::Params;

/// An expensive, unknown function to maximize.
///
/// Evaluations are assumed deterministic: registering the same point twice
/// keeps the first result.
pub trait Objective {
    /// The error type returned by [`evaluate`](Objective::evaluate).
    ///
    /// Failures are passed to the caller unchanged inside
    /// [`Error::Objective`](crate::Error::Objective); the optimizer never
    /// retries or skips them.
    type Error: Into<Box<dyn core::error::Error + Send + Sync>>;

    /// Evaluate the function at `params`.
    ///
    /// `params` iterates in the space's canonical (sorted) key order.
    ///
    /// # Errors
    ///
    /// Any error of type [`Self::Error`].
    fn evaluate(&mut self, params: &Params) -> Result<f64, Self::Error>;
}

impl<F, E> Objective for F
where
    F: FnMut(&Params) -> Result<f64, E>,
    E: Into<Box<dyn core::error::Error + Send + Sync>>,
{
    type Error = E;

    fn evaluate(&mut self, params: &Params) -> Result<f64, E> {
        self(params)
    }
}
