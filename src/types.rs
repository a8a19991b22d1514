//! Core types shared across the library.

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named parameter values.
///
/// A `BTreeMap` iterates its keys in lexicographic order, which is the
/// canonical order used by every point vector in a
/// [`ParameterSpace`](crate::ParameterSpace).
pub type Params = BTreeMap<String, f64>;

/// A registered evaluation: a point of the space and the objective value
/// observed there.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Coordinates in canonical (sorted key) order.
    pub point: Vec<f64>,
    /// The objective value.
    pub target: f64,
}

/// An observation with its coordinates keyed by parameter name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// The objective value.
    pub target: f64,
    /// Parameter values by name.
    pub params: Params,
}

/// A candidate point, given either positionally or by name.
///
/// Most APIs accept `impl Into<Candidate>`, so plain vectors, arrays,
/// slices and name→value maps can be passed directly.
///
/// # Examples
///
/// ```
/// use bayes_opt::{Candidate, Params};
///
/// let by_position: Candidate = vec![1.0, 2.0].into();
/// let by_name: Candidate = Params::from([("x".to_string(), 1.0)]).into();
/// # let _ = (by_position, by_name);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Candidate {
    /// Coordinates in canonical (sorted key) order.
    Point(Vec<f64>),
    /// Values keyed by parameter name, in any order.
    Params(Params),
}

impl From<Vec<f64>> for Candidate {
    fn from(point: Vec<f64>) -> Self {
        Candidate::Point(point)
    }
}

impl From<&[f64]> for Candidate {
    fn from(point: &[f64]) -> Self {
        Candidate::Point(point.to_vec())
    }
}

impl From<&Vec<f64>> for Candidate {
    fn from(point: &Vec<f64>) -> Self {
        Candidate::Point(point.clone())
    }
}

impl<const N: usize> From<[f64; N]> for Candidate {
    fn from(point: [f64; N]) -> Self {
        Candidate::Point(point.to_vec())
    }
}

impl From<Params> for Candidate {
    fn from(params: Params) -> Self {
        Candidate::Params(params)
    }
}

impl From<&Params> for Candidate {
    fn from(params: &Params) -> Self {
        Candidate::Params(params.clone())
    }
}

impl From<HashMap<String, f64>> for Candidate {
    fn from(params: HashMap<String, f64>) -> Self {
        Candidate::Params(params.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, f64); N]> for Candidate {
    fn from(params: [(&str, f64); N]) -> Self {
        Candidate::Params(
            params
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

/// Where the engine currently is inside [`maximize`](crate::BayesianOptimization::maximize).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Not inside `maximize`.
    Idle,
    /// Evaluating random points to seed a cold space.
    Initializing,
    /// Draining the lazy probe queue.
    Probing,
    /// Evaluating points proposed by the surrogate.
    Exploiting,
}

/// Whether `maximize` evaluates its random initial points on a space that
/// already holds observations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitPolicy {
    /// Random initial points are only drawn when the space is empty at the
    /// start of the call. Resumed sessions go straight to the queue and the
    /// surrogate.
    #[default]
    ColdStartOnly,
    /// Random initial points are drawn on every call.
    Always,
}
