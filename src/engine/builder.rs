use std::collections::VecDeque;

use crate::acq_optimizer::AcquisitionOptimizer;
use crate::acquisition::{Acquisition, KappaDecay};
use crate::domain_reduction::DomainReduction;
use crate::error::Result;
use crate::observer::Dispatcher;
use crate::space::ParameterSpace;
use crate::surrogate::{GaussianProcess, Surrogate};
use crate::types::{InitPolicy, Phase};

use super::BayesianOptimization;

/// A builder for constructing [`BayesianOptimization`] instances.
///
/// Created via [`BayesianOptimization::builder()`].
///
/// # Defaults
///
/// - Acquisition: [`Acquisition::ucb`] with `kappa = 2.576`
/// - Surrogate: [`GaussianProcess::new()`]
/// - Acquisition optimizer: [`AcquisitionOptimizer::new()`]
/// - Init policy: [`InitPolicy::ColdStartOnly`]
/// - Seed: random
/// - No kappa decay, no domain reduction
///
/// # Examples
///
/// ```
/// use bayes_opt::{Acquisition, BayesianOptimization, Params};
///
/// let objective = |p: &Params| Ok::<_, String>(-p["x"].powi(2));
/// let optimizer = BayesianOptimization::builder(objective, [("x", (-1.0, 1.0))])
///     .seed(7)
///     .acquisition(Acquisition::ei(0.01))
///     .build()
///     .unwrap();
/// assert_eq!(optimizer.acquisition(), Acquisition::ei(0.01));
/// ```
pub struct OptimizerBuilder<F> {
    objective: F,
    bounds: Vec<(String, (f64, f64))>,
    seed: Option<u64>,
    acquisition: Acquisition,
    surrogate: Option<Box<dyn Surrogate>>,
    acq_optimizer: Option<AcquisitionOptimizer>,
    init_policy: InitPolicy,
    kappa_decay: Option<KappaDecay>,
    domain_reduction: Option<DomainReduction>,
}

impl<F> OptimizerBuilder<F> {
    pub(super) fn new(objective: F, bounds: Vec<(String, (f64, f64))>) -> Self {
        Self {
            objective,
            bounds,
            seed: None,
            acquisition: Acquisition::default(),
            surrogate: None,
            acq_optimizer: None,
            init_policy: InitPolicy::default(),
            kappa_decay: None,
            domain_reduction: None,
        }
    }

    /// Seed the random number generator used for initial points and the
    /// acquisition optimizer's random starts.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the acquisition function.
    #[must_use]
    pub fn acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Replace the default Gaussian process with another surrogate.
    #[must_use]
    pub fn surrogate(mut self, surrogate: impl Surrogate + 'static) -> Self {
        self.surrogate = Some(Box::new(surrogate));
        self
    }

    /// Configure how the acquisition function is maximized.
    #[must_use]
    pub fn acquisition_optimizer(mut self, optimizer: AcquisitionOptimizer) -> Self {
        self.acq_optimizer = Some(optimizer);
        self
    }

    /// Set when `maximize` draws its random initial points.
    #[must_use]
    pub fn init_policy(mut self, policy: InitPolicy) -> Self {
        self.init_policy = policy;
        self
    }

    /// Multiply the UCB `kappa` by a factor after every surrogate-guided
    /// step.
    #[must_use]
    pub fn kappa_decay(mut self, decay: KappaDecay) -> Self {
        self.kappa_decay = Some(decay);
        self
    }

    /// Contract the bounds around the incumbent after every
    /// surrogate-guided step.
    #[must_use]
    pub fn domain_reduction(mut self, reduction: DomainReduction) -> Self {
        self.domain_reduction = Some(reduction);
        self
    }

    /// Build the optimizer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBounds`](crate::Error::InvalidBounds) if any bound is
    /// non-finite or inverted.
    pub fn build(self) -> Result<BayesianOptimization<F>> {
        let space = ParameterSpace::new(self.bounds)?;
        Ok(BayesianOptimization {
            objective: self.objective,
            space,
            surrogate: self
                .surrogate
                .unwrap_or_else(|| Box::new(GaussianProcess::new())),
            acquisition: self.acquisition,
            acq_optimizer: self.acq_optimizer.unwrap_or_default(),
            kappa_decay: self.kappa_decay,
            domain_reduction: self.domain_reduction,
            init_policy: self.init_policy,
            rng: self
                .seed
                .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
            queue: VecDeque::new(),
            observers: Dispatcher::default(),
            phase: Phase::Idle,
            steps: 0,
        })
    }
}
