//! Acquisition functions: how promising is a point, given the surrogate?
//!
//! Every strategy scores a candidate from the surrogate's predictive mean
//! and standard deviation and the best target observed so far. Higher is
//! better. The strategy and its parameter are fixed when the optimizer is
//! built and only change through
//! [`set_acquisition`](crate::BayesianOptimization::set_acquisition).
//!
//! | Strategy | Score | Parameter |
//! |----------|-------|-----------|
//! | [`UpperConfidenceBound`](Acquisition::UpperConfidenceBound) | `μ + κσ` | larger `kappa` explores more |
//! | [`ExpectedImprovement`](Acquisition::ExpectedImprovement) | `(μ - f* - ξ)Φ(z) + σφ(z)` | larger `xi` explores more |
//! | [`ProbabilityOfImprovement`](Acquisition::ProbabilityOfImprovement) | `Φ(z)` | larger `xi` explores more |
//!
//! with `z = (μ - f* - ξ) / σ`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::surrogate::Surrogate;

/// Default exploration weight for UCB.
pub const DEFAULT_KAPPA: f64 = 2.576;
/// Default improvement margin for EI and PoI.
pub const DEFAULT_XI: f64 = 0.0;

/// The acquisition strategy together with its parameter.
///
/// # Examples
///
/// ```
/// use bayes_opt::Acquisition;
///
/// let ucb = Acquisition::ucb(2.0);
/// assert_eq!(ucb.score_prediction(1.0, 0.5, 0.0), 2.0);
///
/// // No uncertainty, no expected improvement.
/// assert_eq!(Acquisition::ei(0.0).score_prediction(3.0, 0.0, 1.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Acquisition {
    /// `mean + kappa * std`.
    UpperConfidenceBound {
        /// Exploration weight.
        kappa: f64,
    },
    /// Expected amount by which a point beats `best + xi`.
    ExpectedImprovement {
        /// Improvement margin.
        xi: f64,
    },
    /// Probability that a point beats `best + xi`.
    ProbabilityOfImprovement {
        /// Improvement margin.
        xi: f64,
    },
}

impl Acquisition {
    /// Upper confidence bound with the given `kappa`.
    #[must_use]
    pub fn ucb(kappa: f64) -> Self {
        Self::UpperConfidenceBound { kappa }
    }

    /// Expected improvement with the given `xi`.
    #[must_use]
    pub fn ei(xi: f64) -> Self {
        Self::ExpectedImprovement { xi }
    }

    /// Probability of improvement with the given `xi`.
    #[must_use]
    pub fn poi(xi: f64) -> Self {
        Self::ProbabilityOfImprovement { xi }
    }

    /// Score `point` under `surrogate`. Higher is better.
    pub fn score(&self, point: &[f64], surrogate: &dyn Surrogate, best_target: f64) -> f64 {
        let (mean, std) = surrogate.predict(point);
        self.score_prediction(mean, std, best_target)
    }

    /// Score a prediction `(mean, std)` directly.
    ///
    /// EI and PoI return exactly `0.0` when `std == 0`.
    #[must_use]
    pub fn score_prediction(&self, mean: f64, std: f64, best_target: f64) -> f64 {
        match *self {
            Self::UpperConfidenceBound { kappa } => mean + kappa * std,
            Self::ExpectedImprovement { xi } => {
                if std <= 0.0 {
                    return 0.0;
                }
                let improvement = mean - best_target - xi;
                let z = improvement / std;
                improvement * norm_cdf(z) + std * norm_pdf(z)
            }
            Self::ProbabilityOfImprovement { xi } => {
                if std <= 0.0 {
                    return 0.0;
                }
                norm_cdf((mean - best_target - xi) / std)
            }
        }
    }

    /// The UCB exploration weight, if this is UCB.
    #[must_use]
    pub fn kappa(&self) -> Option<f64> {
        match *self {
            Self::UpperConfidenceBound { kappa } => Some(kappa),
            _ => None,
        }
    }

    /// Multiply the UCB `kappa` by `factor`. Other strategies are unchanged.
    pub(crate) fn decay_kappa(&mut self, factor: f64) {
        if let Self::UpperConfidenceBound { kappa } = self {
            *kappa *= factor;
        }
    }
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::ucb(DEFAULT_KAPPA)
    }
}

/// Shrinks the UCB `kappa` as the run progresses, shifting from exploration
/// to exploitation.
///
/// Before each surrogate-guided step a counter is incremented; once it
/// exceeds `delay`, `kappa` is multiplied by `factor`.
///
/// # Examples
///
/// ```
/// use bayes_opt::KappaDecay;
///
/// // Leave kappa alone for 5 steps, then shrink it by 5% per step.
/// let decay = KappaDecay::new(0.95, 5);
/// # let _ = decay;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KappaDecay {
    /// Multiplier applied to `kappa` per step.
    pub factor: f64,
    /// Steps to wait before decaying.
    pub delay: usize,
}

impl KappaDecay {
    /// Creates a decay schedule.
    #[must_use]
    pub fn new(factor: f64, delay: usize) -> Self {
        Self { factor, delay }
    }

    /// Apply the schedule for step number `step` (1-based).
    pub(crate) fn apply(&self, acquisition: &mut Acquisition, step: usize) {
        if self.factor < 1.0 && step > self.delay {
            acquisition.decay_kappa(self.factor);
        }
    }
}

// ---------------------------------------------------------------------------
// Normal distribution helpers
// ---------------------------------------------------------------------------

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Abramowitz-Stegun 26.2.17 rational approximation).
fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * abs_x);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782 + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let cdf = 1.0 - norm_pdf(abs_x) * poly;

    if x >= 0.0 { cdf } else { 1.0 - cdf }
}
