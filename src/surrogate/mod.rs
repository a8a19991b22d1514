//! Probabilistic regression models the optimizer fits to its observations.
//!
//! A [`Surrogate`] turns the observations made so far into a predictive
//! mean and standard deviation at any point. The standard deviation is what
//! lets the acquisition function value unexplored regions, so it must stay
//! large away from the data and shrink toward zero at observed points.
//!
//! [`GaussianProcess`] is the default. Plug in a different model with
//! [`OptimizerBuilder::surrogate`](crate::OptimizerBuilder::surrogate).

mod gp;
mod kernel;

pub use gp::{GaussianProcess, GaussianProcessBuilder, LengthScale};

use crate::error::Result;
use crate::types::Observation;

/// A regression model with predictive uncertainty.
pub trait Surrogate {
    /// Refit the model on the full set of observations.
    ///
    /// Must be deterministic for a given set of observations and must
    /// accept zero observations (falling back to the prior).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SurrogateFit`](crate::Error::SurrogateFit) when the
    /// model cannot be fitted even after regularization.
    fn fit(&mut self, observations: &[Observation]) -> Result<()>;

    /// Predictive `(mean, std)` at `point`, with `std >= 0`.
    fn predict(&self, point: &[f64]) -> (f64, f64);
}
