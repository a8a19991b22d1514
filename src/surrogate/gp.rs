//! Gaussian-process regression with a Matérn 5/2 kernel.
//!
//! Targets are standardized (zero mean, unit variance) before fitting and
//! predictions are mapped back to the original scale, so the kernel can
//! keep a unit signal variance. Inputs are rescaled per dimension so the
//! training points span `[0, 1]`; length scales are in those units.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `noise_variance` | 1e-6 | Observation noise added to the kernel diagonal |
//! | `length_scale` | [`LengthScale::Auto`] | Kernel length scale, fixed or picked by marginal likelihood |
//! | `max_fit_attempts` | 5 | Cholesky attempts, each with ten times more jitter |

use nalgebra::{Cholesky, DVector, Dyn};

use super::Surrogate;
use super::kernel::{kernel_matrix, kernel_vector};
use crate::error::{Error, Result};
use crate::types::Observation;

/// Default observation noise variance.
const DEFAULT_NOISE_VAR: f64 = 1e-6;
/// Default number of Cholesky attempts before giving up.
const DEFAULT_MAX_FIT_ATTEMPTS: usize = 5;
/// Jitter used when the configured noise is zero and the first attempt fails.
const MIN_JITTER: f64 = 1e-10;
/// Number of candidates in the automatic length-scale grid.
const LENGTH_SCALE_GRID: usize = 33;
/// log10 of the smallest and largest grid length scales.
const LOG10_LENGTH_SCALE_RANGE: (f64, f64) = (-2.0, 2.0);
/// Below this sample std the targets are treated as constant.
const MIN_TARGET_STD: f64 = 1e-10;
/// Below this spread a dimension is shifted but not rescaled.
const MIN_INPUT_RANGE: f64 = 1e-12;

/// How the kernel length scale is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LengthScale {
    /// Always use this length scale.
    Fixed(f64),
    /// Pick the length scale with the highest log marginal likelihood from
    /// a log-spaced grid over `[0.01, 100]`, in rescaled input units.
    #[default]
    Auto,
}

/// Gaussian-process surrogate.
///
/// # Examples
///
/// ```
/// use bayes_opt::surrogate::{GaussianProcess, Surrogate};
/// use bayes_opt::Observation;
///
/// let mut gp = GaussianProcess::new();
/// gp.fit(&[
///     Observation { point: vec![0.0], target: 1.0 },
///     Observation { point: vec![1.0], target: 3.0 },
/// ])
/// .unwrap();
///
/// let (mean, std) = gp.predict(&[0.0]);
/// assert!((mean - 1.0).abs() < 1e-2);
/// assert!(std < 1e-2);
/// ```
#[derive(Clone, Debug)]
pub struct GaussianProcess {
    noise_variance: f64,
    length_scale: LengthScale,
    max_fit_attempts: usize,
    model: Option<FittedModel>,
}

/// A fitted GP model ready for predictions.
#[derive(Clone, Debug)]
struct FittedModel {
    /// Cholesky factor L of K + σ²I.
    cholesky: Cholesky<f64, Dyn>,
    /// α = (K + σ²I)^{-1} y.
    alpha: DVector<f64>,
    /// Training inputs, rescaled by `scaling`.
    x_train: Vec<Vec<f64>>,
    scaling: InputScaling,
    length_scale: f64,
    y_mean: f64,
    y_std: f64,
}

/// Per-dimension affine map taking the training inputs onto `[0, 1]`.
#[derive(Clone, Debug)]
struct InputScaling {
    offset: Vec<f64>,
    scale: Vec<f64>,
}

impl InputScaling {
    fn from_training(points: &[&[f64]]) -> Self {
        let dim = points.first().copied().map_or(0, <[f64]>::len);
        let mut offset = vec![f64::INFINITY; dim];
        let mut upper = vec![f64::NEG_INFINITY; dim];
        for point in points {
            for ((lo, hi), &x) in offset.iter_mut().zip(upper.iter_mut()).zip(point.iter()) {
                *lo = lo.min(x);
                *hi = hi.max(x);
            }
        }
        let scale = offset
            .iter()
            .zip(&upper)
            .map(|(&lo, &hi)| if hi - lo > MIN_INPUT_RANGE { hi - lo } else { 1.0 })
            .collect();
        Self { offset, scale }
    }

    fn apply(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(self.offset.iter().zip(&self.scale))
            .map(|(&x, (&lo, &s))| (x - lo) / s)
            .collect()
    }
}

impl GaussianProcess {
    /// Creates an unfitted GP with default settings.
    #[must_use]
    pub fn new() -> Self {
        GaussianProcessBuilder::new().build()
    }

    /// Creates a builder for configuring a `GaussianProcess`.
    #[must_use]
    pub fn builder() -> GaussianProcessBuilder {
        GaussianProcessBuilder::new()
    }

    /// The length scale of the current fit, if any, in rescaled input units.
    #[must_use]
    pub fn fitted_length_scale(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.length_scale)
    }

    fn choose_length_scale(&self, x: &[Vec<f64>], y: &DVector<f64>) -> f64 {
        match self.length_scale {
            LengthScale::Fixed(l) => l,
            LengthScale::Auto if x.len() < 2 => 1.0,
            LengthScale::Auto => {
                let (lo, hi) = LOG10_LENGTH_SCALE_RANGE;
                let mut best = (f64::NEG_INFINITY, 1.0);
                for i in 0..LENGTH_SCALE_GRID {
                    #[allow(clippy::cast_precision_loss)]
                    let exponent = lo + (hi - lo) * i as f64 / (LENGTH_SCALE_GRID - 1) as f64;
                    let l = 10f64.powf(exponent);
                    let Some((cholesky, _)) =
                        factorize(x, l, self.noise_variance, self.max_fit_attempts)
                    else {
                        continue;
                    };
                    let lml = log_marginal_likelihood(&cholesky, y);
                    if lml.is_finite() && lml > best.0 {
                        best = (lml, l);
                    }
                }
                best.1
            }
        }
    }
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl Surrogate for GaussianProcess {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, observations: &[Observation]) -> Result<()> {
        let n = observations.len();
        if n == 0 {
            self.model = None;
            return Ok(());
        }
        if observations.iter().any(|o| !o.target.is_finite()) {
            return Err(Error::SurrogateFit("non-finite target in training data".into()));
        }

        // Standardize y
        let y_mean = observations.iter().map(|o| o.target).sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            observations
                .iter()
                .map(|o| (o.target - y_mean).powi(2))
                .sum::<f64>()
                / (n - 1) as f64
        } else {
            1.0
        };
        // Constant targets keep the prior scale so the std away from data
        // stays meaningful.
        let y_std = if y_var.sqrt() < MIN_TARGET_STD { 1.0 } else { y_var.sqrt() };
        let y = DVector::from_iterator(n, observations.iter().map(|o| (o.target - y_mean) / y_std));

        let points: Vec<&[f64]> = observations.iter().map(|o| o.point.as_slice()).collect();
        let scaling = InputScaling::from_training(&points);
        let x_train: Vec<Vec<f64>> = points.iter().map(|p| scaling.apply(p)).collect();

        let length_scale = self.choose_length_scale(&x_train, &y);
        let Some((cholesky, _jitter)) =
            factorize(&x_train, length_scale, self.noise_variance, self.max_fit_attempts)
        else {
            return Err(Error::SurrogateFit(format!(
                "covariance not positive definite after {} attempts",
                self.max_fit_attempts.max(1)
            )));
        };
        trace_debug!(n, length_scale, jitter = _jitter, "surrogate fitted");

        let alpha = cholesky.solve(&y);
        self.model = Some(FittedModel {
            cholesky,
            alpha,
            x_train,
            scaling,
            length_scale,
            y_mean,
            y_std,
        });
        Ok(())
    }

    fn predict(&self, point: &[f64]) -> (f64, f64) {
        let Some(model) = &self.model else {
            return (0.0, 1.0);
        };
        let point = model.scaling.apply(point);
        let k_star = kernel_vector(&point, &model.x_train, model.length_scale);

        // Mean: k*^T α
        let mean = k_star.dot(&model.alpha);

        // Variance: k(x*, x*) - k*^T (K + σ²I)^{-1} k*
        let v = model.cholesky.solve(&k_star);
        let var = (1.0 - k_star.dot(&v)).max(0.0);

        (model.y_mean + model.y_std * mean, model.y_std * var.sqrt())
    }
}

/// Cholesky-factorize `K + jitter·I`, growing the jitter tenfold on each
/// failed attempt.
fn factorize(
    x: &[Vec<f64>],
    length_scale: f64,
    noise_var: f64,
    max_attempts: usize,
) -> Option<(Cholesky<f64, Dyn>, f64)> {
    let mut jitter = noise_var;
    for _attempt in 0..max_attempts.max(1) {
        if let Some(cholesky) = Cholesky::new(kernel_matrix(x, length_scale, jitter)) {
            return Some((cholesky, jitter));
        }
        trace_debug!(attempt = _attempt, jitter, "cholesky failed, retrying with more jitter");
        jitter = if jitter > 0.0 { jitter * 10.0 } else { MIN_JITTER };
    }
    None
}

/// `log p(y | X) = -½ yᵀα - Σ log Lᵢᵢ - n/2 log 2π`
#[allow(clippy::cast_precision_loss)]
fn log_marginal_likelihood(cholesky: &Cholesky<f64, Dyn>, y: &DVector<f64>) -> f64 {
    let alpha = cholesky.solve(y);
    let log_det_half: f64 = cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let n = y.len() as f64;
    -0.5 * y.dot(&alpha) - log_det_half - 0.5 * n * (2.0 * core::f64::consts::PI).ln()
}

/// Builder for configuring a [`GaussianProcess`].
///
/// All options have sensible defaults:
/// - `noise_variance`: 1e-6
/// - `length_scale`: [`LengthScale::Auto`]
/// - `max_fit_attempts`: 5
#[derive(Debug, Clone, Default)]
pub struct GaussianProcessBuilder {
    noise_variance: Option<f64>,
    length_scale: Option<LengthScale>,
    max_fit_attempts: Option<usize>,
}

impl GaussianProcessBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the observation noise variance added to the kernel diagonal.
    ///
    /// Larger values make the GP smoother and tolerate noisy objectives.
    ///
    /// Default: 1e-6 (near-noiseless).
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = Some(v);
        self
    }

    /// Sets how the kernel length scale is chosen.
    ///
    /// Default: [`LengthScale::Auto`].
    #[must_use]
    pub fn length_scale(mut self, length_scale: LengthScale) -> Self {
        self.length_scale = Some(length_scale);
        self
    }

    /// Sets how many Cholesky factorizations are tried, each with ten times
    /// the previous jitter, before the fit fails.
    ///
    /// Default: 5.
    #[must_use]
    pub fn max_fit_attempts(mut self, n: usize) -> Self {
        self.max_fit_attempts = Some(n);
        self
    }

    /// Builds the configured [`GaussianProcess`].
    #[must_use]
    pub fn build(self) -> GaussianProcess {
        GaussianProcess {
            noise_variance: self.noise_variance.unwrap_or(DEFAULT_NOISE_VAR).max(0.0),
            length_scale: self.length_scale.unwrap_or_default(),
            max_fit_attempts: self.max_fit_attempts.unwrap_or(DEFAULT_MAX_FIT_ATTEMPTS),
            model: None,
        }
    }
}
