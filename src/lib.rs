#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Sequential Bayesian optimization of expensive black-box functions.
//!
//! Given a function you can only sample, over a box of continuous
//! parameters, the optimizer proposes where to evaluate next so that the
//! **maximum** is found in few evaluations. A Gaussian process models the
//! function from the observations so far; an acquisition function turns the
//! model's mean and uncertainty into a score; the point with the best score
//! is evaluated next.
//!
//! # Getting Started
//!
//! ```
//! use bayes_opt::prelude::*;
//!
//! let objective = |p: &Params| Ok::<_, String>(-p["x"].powi(2) - (p["y"] - 1.0).powi(2) + 1.0);
//!
//! let mut optimizer = BayesianOptimization::builder(objective, [("x", (2.0, 4.0)), ("y", (-3.0, 3.0))])
//!     .seed(42)
//!     .acquisition_optimizer(AcquisitionOptimizer::builder().n_warmup(500).n_restarts(2).build())
//!     .build()
//!     .unwrap();
//!
//! optimizer.maximize(2, 3).unwrap();
//!
//! let best = optimizer.best().unwrap();
//! println!("x = {:.3}, y = {:.3}, f = {:.3}", best.params["x"], best.params["y"], best.target);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`BayesianOptimization`] | Drive the loop: initial random points, queued probes, surrogate-guided steps. |
//! | [`ParameterSpace`] | Named bounds plus the deduplicated registry of observations. |
//! | [`Surrogate`](surrogate::Surrogate) | Posterior model of the objective; [`GaussianProcess`](surrogate::GaussianProcess) by default. |
//! | [`Acquisition`] | UCB, expected improvement or probability of improvement. |
//! | [`AcquisitionOptimizer`] | Finds the acquisition maximum inside the bounds. |
//! | [`Observer`] | Receives [`Event`]s, e.g. the [`JournalLogger`]. |
//!
//! # Ask and tell
//!
//! When the objective runs elsewhere, drive the loop by hand with
//! [`suggest`](BayesianOptimization::suggest) and
//! [`register`](BayesianOptimization::register):
//!
//! ```
//! use bayes_opt::{BayesianOptimization, AcquisitionOptimizer, Params};
//!
//! let mut optimizer = BayesianOptimization::builder(|_: &Params| Ok::<_, String>(0.0), [("x", (0.0, 1.0))])
//!     .seed(3)
//!     .acquisition_optimizer(AcquisitionOptimizer::builder().n_warmup(200).n_restarts(1).build())
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..4 {
//!     let params = optimizer.suggest().unwrap();
//!     let value = -(params["x"] - 0.3).powi(2);
//!     optimizer.register(&params, value).unwrap();
//! }
//! assert_eq!(optimizer.observations().len(), 4);
//! ```
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on the plain data types | off |
//! | `journal` | [`JournalLogger`] and [`load_logs`]: JSONL persistence with file locking (enables `serde`) | on |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key optimization points | on |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(all(feature = "tracing", feature = "journal"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(all(not(feature = "tracing"), feature = "journal"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

mod acq_optimizer;
mod acquisition;
mod domain_reduction;
mod engine;
mod error;
#[cfg(feature = "journal")]
mod journal;
pub mod objective;
pub mod observer;
mod rng_util;
mod space;
pub mod surrogate;
mod types;

pub use acq_optimizer::{AcquisitionMaximum, AcquisitionOptimizer, AcquisitionOptimizerBuilder};
pub use acquisition::{Acquisition, DEFAULT_KAPPA, DEFAULT_XI, KappaDecay};
pub use domain_reduction::DomainReduction;
pub use engine::{BayesianOptimization, OptimizerBuilder};
pub use error::{Error, Result};
#[cfg(feature = "journal")]
pub use journal::{JournalLogger, load_logs};
pub use objective::Objective;
pub use observer::{Event, Observer, SubscriptionId};
pub use space::ParameterSpace;
pub use types::{Candidate, Evaluation, InitPolicy, Observation, Params, Phase};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use bayes_opt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acq_optimizer::AcquisitionOptimizer;
    pub use crate::acquisition::{Acquisition, KappaDecay};
    pub use crate::domain_reduction::DomainReduction;
    pub use crate::engine::BayesianOptimization;
    pub use crate::error::{Error, Result};
    #[cfg(feature = "journal")]
    pub use crate::journal::JournalLogger;
    pub use crate::objective::Objective;
    pub use crate::observer::{Event, Observer};
    pub use crate::space::ParameterSpace;
    pub use crate::surrogate::{GaussianProcess, LengthScale, Surrogate};
    pub use crate::types::{InitPolicy, Params, Phase};
}
