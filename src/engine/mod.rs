//! The optimization loop.
//!
//! [`BayesianOptimization`] owns the objective, the parameter space, the
//! surrogate and the acquisition function. Each call to
//! [`maximize`](BayesianOptimization::maximize) evaluates random initial
//! points (on a cold start), then every lazily queued probe, then `n_iter`
//! points proposed by maximizing the acquisition function over the
//! surrogate's posterior.

mod builder;

use std::collections::VecDeque;

pub use self::builder::OptimizerBuilder;
use crate::acq_optimizer::AcquisitionOptimizer;
use crate::acquisition::{Acquisition, KappaDecay};
use crate::domain_reduction::DomainReduction;
use crate::error::{Error, Result};
use crate::objective::Objective;
use crate::observer::{Dispatcher, Event, Observer, SubscriptionId};
use crate::space::ParameterSpace;
use crate::surrogate::Surrogate;
use crate::types::{Candidate, Evaluation, InitPolicy, Observation, Params, Phase};

/// How many random draws `suggest` makes to replace a proposal that
/// duplicates a registered point.
const MAX_DUPLICATE_REDRAWS: usize = 16;

/// Sequential Bayesian optimizer.
///
/// # Examples
///
/// ```
/// use bayes_opt::{AcquisitionOptimizer, BayesianOptimization, Params};
///
/// let objective = |p: &Params| Ok::<_, String>(-p["x"].powi(2) - (p["y"] - 1.0).powi(2) + 1.0);
/// let mut optimizer = BayesianOptimization::builder(objective, [("x", (2.0, 4.0)), ("y", (-3.0, 3.0))])
///     .seed(1)
///     .acquisition_optimizer(AcquisitionOptimizer::builder().n_warmup(500).n_restarts(2).build())
///     .build()
///     .unwrap();
///
/// optimizer.maximize(2, 3).unwrap();
///
/// assert_eq!(optimizer.observations().len(), 5);
/// let best = optimizer.max().unwrap();
/// assert!(optimizer.observations().iter().all(|o| o.target <= best.target));
/// ```
pub struct BayesianOptimization<F> {
    objective: F,
    space: ParameterSpace,
    surrogate: Box<dyn Surrogate>,
    acquisition: Acquisition,
    acq_optimizer: AcquisitionOptimizer,
    kappa_decay: Option<KappaDecay>,
    domain_reduction: Option<DomainReduction>,
    init_policy: InitPolicy,
    rng: fastrand::Rng,
    /// Points queued by lazy probes, evaluated FIFO by `maximize`.
    queue: VecDeque<Vec<f64>>,
    observers: Dispatcher<F>,
    phase: Phase,
    /// Surrogate-guided steps taken so far, across `maximize` calls.
    steps: usize,
}

impl<F> BayesianOptimization<F> {
    /// Create an optimizer with default settings.
    ///
    /// `bounds` maps each parameter name to its `(low, high)` interval.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBounds`] if any bound is non-finite or inverted.
    pub fn new<I, K>(objective: F, bounds: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, (f64, f64))>,
        K: Into<String>,
    {
        Self::builder(objective, bounds).build()
    }

    /// Return a builder for configuring an optimizer.
    #[must_use]
    pub fn builder<I, K>(objective: F, bounds: I) -> OptimizerBuilder<F>
    where
        I: IntoIterator<Item = (K, (f64, f64))>,
        K: Into<String>,
    {
        let bounds = bounds
            .into_iter()
            .map(|(name, bound)| (name.into(), bound))
            .collect();
        OptimizerBuilder::new(objective, bounds)
    }

    /// The parameter space and everything registered in it.
    #[must_use]
    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    /// The best observation so far, or `None` if nothing is registered.
    #[must_use]
    pub fn max(&self) -> Option<&Observation> {
        self.space.max()
    }

    /// The best observation keyed by parameter name.
    #[must_use]
    pub fn best(&self) -> Option<Evaluation> {
        self.space.max().map(|o| self.evaluation(o))
    }

    /// All observations in registration order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        self.space.observations()
    }

    /// All observations keyed by parameter name, in registration order.
    #[must_use]
    pub fn res(&self) -> Vec<Evaluation> {
        self.space
            .observations()
            .iter()
            .map(|o| self.evaluation(o))
            .collect()
    }

    /// The active acquisition function, including any kappa decay applied
    /// so far.
    #[must_use]
    pub fn acquisition(&self) -> Acquisition {
        self.acquisition
    }

    /// Replace the acquisition function for subsequent suggestions.
    pub fn set_acquisition(&mut self, acquisition: Acquisition) {
        self.acquisition = acquisition;
    }

    /// Current phase of `maximize`; [`Phase::Idle`] outside of it.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of lazily probed points not yet evaluated.
    #[must_use]
    pub fn n_pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of subscriptions.
    #[must_use]
    pub fn n_observers(&self) -> usize {
        self.observers.len()
    }

    /// Change the bounds of some or all parameters.
    ///
    /// Future random samples and suggestions use the new bounds. Existing
    /// observations and queued probes are untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownParameter`] if a name is not in the space.
    /// - [`Error::InvalidBounds`] if a bound is non-finite or inverted.
    ///
    /// Nothing changes on error.
    pub fn set_bounds<I, K>(&mut self, bounds: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, (f64, f64))>,
        K: Into<String>,
    {
        self.space.set_bounds(bounds)?;
        trace_debug!(bounds = ?self.space.bounds(), "bounds updated");
        Ok(())
    }

    /// Subscribe a closure to one event kind.
    ///
    /// Observers for the same event run in subscription order.
    pub fn subscribe(
        &mut self,
        event: Event,
        callback: impl FnMut(Event, &Self) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(&[event], Box::new(callback))
    }

    /// Subscribe an observer to every event kind.
    pub fn subscribe_all(&mut self, observer: impl Observer<F> + 'static) -> SubscriptionId {
        self.observers.subscribe(&Event::ALL, Box::new(observer))
    }

    /// Remove a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Propose the next point to evaluate.
    ///
    /// On an empty space this is a uniform random sample. Otherwise the
    /// surrogate is fit to every observation and the acquisition function is
    /// maximized within the current bounds. A proposal that coincides with a
    /// registered point is replaced by a random sample.
    ///
    /// # Errors
    ///
    /// [`Error::SurrogateFit`] if the surrogate cannot be fit.
    pub fn suggest(&mut self) -> Result<Params> {
        let point = self.next_point()?;
        self.space.to_params(&point)
    }

    /// Record an externally obtained evaluation and notify observers.
    ///
    /// Registering a point that already exists is a no-op that fires no
    /// event.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] or [`Error::UnknownParameter`] if the
    ///   candidate does not match the space.
    /// - [`Error::NonFinite`] if a coordinate or the target is NaN or
    ///   infinite.
    pub fn register(&mut self, candidate: impl Into<Candidate>, target: f64) -> Result<()> {
        let point = self.space.to_point(candidate)?;
        self.record(point, target)
    }

    /// Load observations from JSONL logs written by a
    /// [`JournalLogger`](crate::JournalLogger).
    ///
    /// Returns the number of records read. No events are fired.
    ///
    /// # Errors
    ///
    /// See [`load_logs`](crate::load_logs).
    #[cfg(feature = "journal")]
    pub fn load_logs<I, P>(&mut self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<std::path::Path>,
    {
        crate::journal::load_logs(&mut self.space, paths)
    }

    fn evaluation(&self, observation: &Observation) -> Evaluation {
        Evaluation {
            target: observation.target,
            params: self
                .space
                .keys()
                .iter()
                .cloned()
                .zip(observation.point.iter().copied())
                .collect(),
        }
    }

    fn next_point(&mut self) -> Result<Vec<f64>> {
        let Some(best) = self.space.max() else {
            return Ok(self.space.random_sample(&mut self.rng));
        };
        let best_target = best.target;
        let seeds = vec![best.point.clone()];

        self.surrogate.fit(self.space.observations())?;

        let acquisition = self.acquisition;
        let surrogate = &*self.surrogate;
        let found = self.acq_optimizer.maximize(
            |x| acquisition.score(x, surrogate, best_target),
            self.space.bounds(),
            &seeds,
            &mut self.rng,
        );

        let mut point = match found {
            Some(maximum) => maximum.point,
            None => self.space.random_sample(&mut self.rng),
        };
        let mut redraws = 0;
        while self.space.contains(&point) && redraws < MAX_DUPLICATE_REDRAWS {
            trace_debug!("suggestion duplicates an observation, sampling at random");
            point = self.space.random_sample(&mut self.rng);
            redraws += 1;
        }
        Ok(point)
    }

    fn record(&mut self, point: Vec<f64>, target: f64) -> Result<()> {
        let before = self.space.len();
        let previous_best = self.space.max().map(|o| o.target);
        self.space.register(point, target)?;
        if self.space.len() == before {
            return Ok(());
        }

        trace_debug!(n = self.space.len(), target, "observation registered");
        if previous_best.is_none_or(|best| target > best) {
            trace_info!(target, "new best value found");
        }
        self.dispatch(Event::OptimizationStep);
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            trace_debug!(from = ?self.phase, to = ?phase, "phase changed");
            self.phase = phase;
        }
    }

    fn dispatch(&mut self, event: Event) {
        let mut observers = self.observers.detach();
        observers.dispatch(event, self);
        // Subscriptions made while dispatching are impossible: observers only
        // get a shared reference.
        self.observers = observers;
    }

    fn reduce_domain(&mut self) -> Result<()> {
        let Some(reduction) = &mut self.domain_reduction else {
            return Ok(());
        };
        let Some(bounds) = reduction.transform(&self.space) else {
            return Ok(());
        };
        let named: Vec<(String, (f64, f64))> = self.space.keys().iter().cloned().zip(bounds).collect();
        self.set_bounds(named)
    }
}

impl<F: Objective> BayesianOptimization<F> {
    /// Evaluate a point now, or queue it for the next `maximize` call.
    ///
    /// With `lazy = false` the objective runs immediately and the result is
    /// registered. With `lazy = true` the point is validated and appended to
    /// a FIFO queue; it is evaluated at the start of the next `maximize`,
    /// before any surrogate-guided step. Points outside the current bounds
    /// are accepted.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] or [`Error::UnknownParameter`] if the
    ///   candidate does not match the space.
    /// - [`Error::Objective`] if the objective fails (eager probes only).
    /// - [`Error::NonFinite`] if the objective returns NaN or infinity.
    pub fn probe(&mut self, candidate: impl Into<Candidate>, lazy: bool) -> Result<()> {
        let point = self.space.to_point(candidate)?;
        if lazy {
            trace_debug!(pending = self.queue.len() + 1, "probe queued");
            self.queue.push_back(point);
            Ok(())
        } else {
            self.evaluate(point)
        }
    }

    /// Run the optimization loop.
    ///
    /// 1. If the space was empty when the call began (or the
    ///    [`InitPolicy`] is [`Always`](InitPolicy::Always)), evaluate
    ///    `init_points` uniform random points. A cold start with nothing
    ///    queued always evaluates at least one.
    /// 2. Evaluate every queued probe, in insertion order.
    /// 3. Run `n_iter` surrogate-guided steps, each followed by kappa decay
    ///    and domain reduction when configured.
    ///
    /// Observers receive [`Event::OptimizationStart`] first, one
    /// [`Event::OptimizationStep`] per new observation, and
    /// [`Event::OptimizationEnd`] on success.
    ///
    /// # Errors
    ///
    /// The first error from the objective, the surrogate or registration.
    /// Observations made before the error stay registered; a queued probe
    /// whose evaluation failed stays queued.
    pub fn maximize(&mut self, init_points: usize, n_iter: usize) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("maximize", init_points, n_iter).entered();

        self.dispatch(Event::OptimizationStart);
        let result = self.run(init_points, n_iter);
        self.set_phase(Phase::Idle);
        result?;

        trace_info!(
            n_observations = self.space.len(),
            best = self.space.max().map(|o| o.target),
            "optimization finished"
        );
        self.dispatch(Event::OptimizationEnd);
        Ok(())
    }

    fn run(&mut self, init_points: usize, n_iter: usize) -> Result<()> {
        let cold = self.space.is_empty();
        let mut n_random = match self.init_policy {
            InitPolicy::ColdStartOnly if !cold => 0,
            _ => init_points,
        };
        if cold && self.queue.is_empty() {
            n_random = n_random.max(1);
        }

        self.set_phase(Phase::Initializing);
        for _ in 0..n_random {
            let point = self.space.random_sample(&mut self.rng);
            self.evaluate(point)?;
        }

        self.set_phase(Phase::Probing);
        while let Some(point) = self.queue.front().cloned() {
            self.evaluate(point)?;
            self.queue.pop_front();
        }

        self.set_phase(Phase::Exploiting);
        for _ in 0..n_iter {
            self.steps += 1;
            if let Some(decay) = self.kappa_decay {
                decay.apply(&mut self.acquisition, self.steps);
            }
            let point = self.next_point()?;
            self.evaluate(point)?;
            self.reduce_domain()?;
        }
        Ok(())
    }

    fn evaluate(&mut self, point: Vec<f64>) -> Result<()> {
        let params = self.space.to_params(&point)?;
        let target = self
            .objective
            .evaluate(&params)
            .map_err(|e| Error::Objective(e.into()))?;
        self.record(point, target)
    }
}

impl<F> core::fmt::Debug for BayesianOptimization<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BayesianOptimization")
            .field("space", &self.space)
            .field("acquisition", &self.acquisition)
            .field("phase", &self.phase)
            .field("pending", &self.queue.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
