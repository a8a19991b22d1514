//! Sequential domain reduction: shrink the box around the incumbent.
//!
//! After each surrogate-guided step the bounds are re-centered on the best
//! point found so far and their width is contracted. The contraction rate
//! adapts per dimension: when the incumbent keeps moving in the same
//! direction (panning) the box shrinks slowly, when it oscillates back and
//! forth the box shrinks faster.
//!
//! For dimension `i` with current width `rᵢ`:
//!
//! ```text
//! dᵢ  = clamp(2 (x*ᵢ − x*ᵢ_prev) / rᵢ, −1, 1)
//! ĉᵢ  = sign(dᵢ·dᵢ_prev) √|dᵢ·dᵢ_prev|
//! γᵢ  = ½ (γ_pan (1 + ĉᵢ) + γ_osc (1 − ĉᵢ))
//! λᵢ  = η + |dᵢ| (γᵢ − η)
//! rᵢ ← λᵢ rᵢ,  bounds = x*ᵢ ± rᵢ / 2
//! ```
//!
//! The new bounds are widened to at least `minimum_window` and clipped to
//! the bounds the reduction started from. If the space's bounds no longer
//! match the last ones produced here, they were set from outside: the
//! reduction restarts with them as the new outer limit.

use crate::space::ParameterSpace;

/// Default shrinkage parameter for oscillation.
const DEFAULT_GAMMA_OSC: f64 = 0.7;
/// Default shrinkage parameter for panning.
const DEFAULT_GAMMA_PAN: f64 = 1.0;
/// Default zoom parameter.
const DEFAULT_ETA: f64 = 0.9;

/// Bounds transformer that contracts the search box around the incumbent.
///
/// # Examples
///
/// ```
/// use bayes_opt::{BayesianOptimization, DomainReduction, Params};
///
/// let objective = |p: &Params| Ok::<_, String>(-(p["x"] - 1.0).powi(2));
/// let optimizer = BayesianOptimization::builder(objective, [("x", (-10.0, 10.0))])
///     .domain_reduction(DomainReduction::new().minimum_window(0.5))
///     .build()
///     .unwrap();
/// # let _ = optimizer;
/// ```
#[derive(Clone, Debug)]
pub struct DomainReduction {
    rates: Rates,
    minimum_window: f64,
    state: Option<ReductionState>,
}

#[derive(Clone, Copy, Debug)]
struct Rates {
    gamma_osc: f64,
    gamma_pan: f64,
    eta: f64,
}

impl Rates {
    /// Multiply each width by its contraction rate λᵢ.
    fn contract(self, widths: &mut [f64], current_d: &[f64], previous_d: &[f64]) {
        for ((r, &d), &d_prev) in widths.iter_mut().zip(current_d).zip(previous_d) {
            let c = d * d_prev;
            let c_hat = if c == 0.0 { 0.0 } else { c.abs().sqrt() * c.signum() };
            let gamma = 0.5 * (self.gamma_pan * (1.0 + c_hat) + self.gamma_osc * (1.0 - c_hat));
            *r *= self.eta + d.abs() * (gamma - self.eta);
        }
    }
}

#[derive(Clone, Debug)]
struct ReductionState {
    original: Vec<(f64, f64)>,
    widths: Vec<f64>,
    current_optimal: Vec<f64>,
    current_d: Vec<f64>,
    /// Bounds returned by the last step.
    applied: Vec<(f64, f64)>,
}

impl ReductionState {
    /// Start from the center of `bounds` with one contraction already applied.
    fn new(bounds: &[(f64, f64)], rates: Rates) -> Self {
        let mut widths: Vec<f64> = bounds.iter().map(|&(lo, hi)| hi - lo).collect();
        let current_d = vec![0.0; bounds.len()];
        rates.contract(&mut widths, &current_d, &current_d);
        Self {
            original: bounds.to_vec(),
            widths,
            current_optimal: bounds.iter().map(|&(lo, hi)| 0.5 * (lo + hi)).collect(),
            current_d,
            applied: bounds.to_vec(),
        }
    }

    fn step(&mut self, incumbent: Vec<f64>, rates: Rates) {
        let previous_d = core::mem::take(&mut self.current_d);
        self.current_d = incumbent
            .iter()
            .zip(&self.current_optimal)
            .zip(&self.widths)
            .map(|((&now, &before), &r)| {
                // The window can be wider than r (minimum window) or the
                // incumbent can be a probe outside it.
                if r > 0.0 { (2.0 * (now - before) / r).clamp(-1.0, 1.0) } else { 0.0 }
            })
            .collect();
        self.current_optimal = incumbent;
        rates.contract(&mut self.widths, &self.current_d, &previous_d);
    }

    fn bounds(&self, minimum_window: f64) -> Vec<(f64, f64)> {
        self.current_optimal
            .iter()
            .zip(&self.widths)
            .zip(&self.original)
            .map(|((&center, &r), &(orig_lo, orig_hi))| {
                let half = 0.5 * r.max(minimum_window);
                let lo = (center - half).max(orig_lo);
                let hi = (center + half).min(orig_hi);
                if lo <= hi { (lo, hi) } else { (orig_lo, orig_hi) }
            })
            .collect()
    }
}

impl DomainReduction {
    /// Creates a transformer with `gamma_osc = 0.7`, `gamma_pan = 1.0`,
    /// `eta = 0.9` and no minimum window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rates: Rates {
                gamma_osc: DEFAULT_GAMMA_OSC,
                gamma_pan: DEFAULT_GAMMA_PAN,
                eta: DEFAULT_ETA,
            },
            minimum_window: 0.0,
            state: None,
        }
    }

    /// Sets the shrinkage parameter applied while oscillating.
    #[must_use]
    pub fn gamma_osc(mut self, v: f64) -> Self {
        self.rates.gamma_osc = v;
        self
    }

    /// Sets the shrinkage parameter applied while panning.
    #[must_use]
    pub fn gamma_pan(mut self, v: f64) -> Self {
        self.rates.gamma_pan = v;
        self
    }

    /// Sets the zoom parameter.
    #[must_use]
    pub fn eta(mut self, v: f64) -> Self {
        self.rates.eta = v;
        self
    }

    /// Sets the smallest width any dimension may shrink to.
    #[must_use]
    pub fn minimum_window(mut self, v: f64) -> Self {
        self.minimum_window = v.max(0.0);
        self
    }

    /// Compute the next bounds from the space's incumbent, in canonical
    /// order, or `None` when the space has no observations yet.
    ///
    /// The first call records the space's current bounds as the outer limit.
    /// Bounds changed by anything else since the previous call replace that
    /// limit and restart the contraction.
    pub(crate) fn transform(&mut self, space: &ParameterSpace) -> Option<Vec<(f64, f64)>> {
        let incumbent = space.max()?.point.clone();
        let rates = self.rates;
        if self.state.as_ref().is_some_and(|s| s.applied != space.bounds()) {
            trace_debug!(bounds = ?space.bounds(), "bounds changed externally, restarting reduction");
            self.state = None;
        }
        let state = self
            .state
            .get_or_insert_with(|| ReductionState::new(space.bounds(), rates));
        state.step(incumbent, rates);
        let bounds = state.bounds(self.minimum_window);
        state.applied.clone_from(&bounds);
        Some(bounds)
    }
}

impl Default for DomainReduction {
    fn default() -> Self {
        Self::new()
    }
}
