//! Maximizing the acquisition surface over the box.
//!
//! The acquisition function is cheap to evaluate but non-convex, so the
//! search combines global random sampling with local refinement:
//!
//! 1. **Warm-up**: `n_warmup` uniform random points are scored and the
//!    best one is kept.
//! 2. **Local search**: projected gradient ascent (central finite
//!    differences, backtracking step) is started from each caller-supplied
//!    seed, from the warm-up winner, and from `n_restarts` fresh random
//!    points.
//! 3. The best point found anywhere is returned, projected onto the box.
//!
//! Ties keep the first point found, so a fixed RNG seed gives a fixed
//! answer. Non-finite scores are treated as `-inf`.

use crate::rng_util;

/// Default number of random warm-up points.
const DEFAULT_N_WARMUP: usize = 10_000;
/// Default number of random local-search starts.
const DEFAULT_N_RESTARTS: usize = 10;
/// Default iteration cap for each local search.
const DEFAULT_MAX_LOCAL_ITER: usize = 50;

/// Finite-difference step, as a fraction of each dimension's width.
const FD_STEP: f64 = 1e-6;
/// Initial and largest line-search step, as a fraction of each width.
const INITIAL_STEP: f64 = 0.1;
const MAX_STEP: f64 = 0.5;
/// Line search gives up below this step.
const MIN_STEP: f64 = 1e-10;
/// Relative score change below which a local search has converged.
const SCORE_TOL: f64 = 1e-9;

/// The best point found by [`AcquisitionOptimizer::maximize`].
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionMaximum {
    /// Location of the maximum, inside the box.
    pub point: Vec<f64>,
    /// Acquisition value there.
    pub score: f64,
}

/// Multi-start maximizer for acquisition functions.
///
/// # Examples
///
/// ```
/// use bayes_opt::AcquisitionOptimizer;
///
/// let optimizer = AcquisitionOptimizer::builder().n_warmup(200).n_restarts(3).build();
/// let mut rng = fastrand::Rng::with_seed(1);
///
/// let best = optimizer
///     .maximize(|x| -(x[0] - 0.3).powi(2), &[(0.0, 1.0)], &[], &mut rng)
///     .unwrap();
/// assert!((best.point[0] - 0.3).abs() < 1e-3);
/// ```
#[derive(Clone, Debug)]
pub struct AcquisitionOptimizer {
    n_warmup: usize,
    n_restarts: usize,
    max_local_iter: usize,
}

impl AcquisitionOptimizer {
    /// Creates an optimizer with default settings.
    #[must_use]
    pub fn new() -> Self {
        AcquisitionOptimizerBuilder::new().build()
    }

    /// Creates a builder for configuring an `AcquisitionOptimizer`.
    #[must_use]
    pub fn builder() -> AcquisitionOptimizerBuilder {
        AcquisitionOptimizerBuilder::new()
    }

    /// Find the point of `bounds` where `score` is largest.
    ///
    /// `seeds` are extra local-search starting points (typically the best
    /// observation so far); they are projected onto the box first.
    /// Returns `None` when `bounds` is empty, or when there is no point to
    /// score: no warm-up samples, no restarts and no seed of the right
    /// dimension.
    pub fn maximize<F>(
        &self,
        score: F,
        bounds: &[(f64, f64)],
        seeds: &[Vec<f64>],
        rng: &mut fastrand::Rng,
    ) -> Option<AcquisitionMaximum>
    where
        F: Fn(&[f64]) -> f64,
    {
        if bounds.is_empty() {
            return None;
        }
        let eval = |x: &[f64]| {
            let s = score(x);
            if s.is_finite() { s } else { f64::NEG_INFINITY }
        };

        let mut best: Option<AcquisitionMaximum> = None;

        // Warm-up: pure random search
        let mut warmup_best: Option<AcquisitionMaximum> = None;
        for _ in 0..self.n_warmup {
            let x = rng_util::uniform_point(rng, bounds);
            let s = eval(&x);
            keep_better(&mut warmup_best, x, s);
        }
        if let Some(w) = &warmup_best {
            keep_better(&mut best, w.point.clone(), w.score);
        }

        // Local searches: seeds, then the warm-up winner, then random restarts
        let mut starts: Vec<Vec<f64>> = seeds
            .iter()
            .filter(|s| s.len() == bounds.len())
            .map(|s| {
                let mut s = s.clone();
                rng_util::clip_in_place(&mut s, bounds);
                s
            })
            .collect();
        if let Some(w) = warmup_best {
            starts.push(w.point);
        }
        starts.extend((0..self.n_restarts).map(|_| rng_util::uniform_point(rng, bounds)));

        for start in starts {
            let (x, s) = local_search(&eval, start, bounds, self.max_local_iter);
            keep_better(&mut best, x, s);
        }

        best.map(|mut b| {
            rng_util::clip_in_place(&mut b.point, bounds);
            b
        })
    }
}

impl Default for AcquisitionOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `best` only on a strict improvement so ties keep the earlier point.
fn keep_better(best: &mut Option<AcquisitionMaximum>, point: Vec<f64>, score: f64) {
    if best.as_ref().is_none_or(|b| score > b.score) {
        *best = Some(AcquisitionMaximum { point, score });
    }
}

/// Projected gradient ascent from `start`.
fn local_search<F>(eval: &F, start: Vec<f64>, bounds: &[(f64, f64)], max_iter: usize) -> (Vec<f64>, f64)
where
    F: Fn(&[f64]) -> f64,
{
    let widths: Vec<f64> = bounds.iter().map(|&(lo, hi)| hi - lo).collect();
    let mut x = start;
    rng_util::clip_in_place(&mut x, bounds);
    let mut fx = eval(&x);
    if !fx.is_finite() {
        return (x, fx);
    }

    let mut step = INITIAL_STEP;
    for _ in 0..max_iter {
        let grad = scaled_gradient(eval, &x, bounds, &widths);
        let norm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        if !norm.is_finite() || norm == 0.0 {
            break;
        }

        let mut accepted = None;
        while step >= MIN_STEP {
            let mut candidate: Vec<f64> = x
                .iter()
                .zip(&grad)
                .zip(&widths)
                .map(|((&xi, &gi), &wi)| xi + step * wi * gi / norm)
                .collect();
            rng_util::clip_in_place(&mut candidate, bounds);
            let fc = eval(&candidate);
            if fc > fx {
                accepted = Some((candidate, fc));
                break;
            }
            step *= 0.5;
        }

        let Some((candidate, fc)) = accepted else {
            break;
        };
        let gain = fc - fx;
        x = candidate;
        fx = fc;
        step = (step * 2.0).min(MAX_STEP);
        if gain <= SCORE_TOL * (1.0 + fx.abs()) {
            break;
        }
    }

    (x, fx)
}

/// Central-difference gradient in width-normalized coordinates.
///
/// Differences are one-sided at the bounds, and components that point out
/// of the box from a bound are zeroed.
fn scaled_gradient<F>(eval: &F, x: &[f64], bounds: &[(f64, f64)], widths: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut grad = vec![0.0; x.len()];
    let mut probe = x.to_vec();
    for i in 0..x.len() {
        let (lo, hi) = bounds[i];
        if widths[i] <= 0.0 {
            continue;
        }
        let h = FD_STEP * widths[i];
        let forward = (x[i] + h).min(hi);
        let backward = (x[i] - h).max(lo);
        if forward <= backward {
            continue;
        }

        probe[i] = forward;
        let f_forward = eval(&probe);
        probe[i] = backward;
        let f_backward = eval(&probe);
        probe[i] = x[i];

        let g = (f_forward - f_backward) / ((forward - backward) / widths[i]);
        let pushes_out = (x[i] >= hi && g > 0.0) || (x[i] <= lo && g < 0.0);
        grad[i] = if g.is_finite() && !pushes_out { g } else { 0.0 };
    }
    grad
}

/// Builder for configuring an [`AcquisitionOptimizer`].
///
/// All options have sensible defaults:
/// - `n_warmup`: 10 000
/// - `n_restarts`: 10
/// - `max_local_iter`: 50
#[derive(Debug, Clone, Default)]
pub struct AcquisitionOptimizerBuilder {
    n_warmup: Option<usize>,
    n_restarts: Option<usize>,
    max_local_iter: Option<usize>,
}

impl AcquisitionOptimizerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of random points scored before local search.
    ///
    /// Default: 10 000.
    #[must_use]
    pub fn n_warmup(mut self, n: usize) -> Self {
        self.n_warmup = Some(n);
        self
    }

    /// Sets the number of random local-search starts.
    ///
    /// Default: 10.
    #[must_use]
    pub fn n_restarts(mut self, n: usize) -> Self {
        self.n_restarts = Some(n);
        self
    }

    /// Sets the iteration cap for each local search.
    ///
    /// Default: 50.
    #[must_use]
    pub fn max_local_iter(mut self, n: usize) -> Self {
        self.max_local_iter = Some(n);
        self
    }

    /// Builds the configured [`AcquisitionOptimizer`].
    #[must_use]
    pub fn build(self) -> AcquisitionOptimizer {
        AcquisitionOptimizer {
            n_warmup: self.n_warmup.unwrap_or(DEFAULT_N_WARMUP),
            n_restarts: self.n_restarts.unwrap_or(DEFAULT_N_RESTARTS),
            max_local_iter: self.max_local_iter.unwrap_or(DEFAULT_MAX_LOCAL_ITER),
        }
    }
}
