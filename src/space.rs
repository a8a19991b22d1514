//! The bounded search box and the registry of observations.
//!
//! A [`ParameterSpace`] fixes its parameter names at construction and
//! sorts them lexicographically; every point vector handed in or out of
//! the space uses that order. Observations are deduplicated on the exact
//! bit pattern of their coordinates, and the best observation is tracked
//! as registrations happen.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::rng_util;
use crate::types::{Candidate, Observation, Params};

/// Bit-exact identity of a point.
type PointKey = Vec<u64>;

fn point_key(point: &[f64]) -> PointKey {
    point.iter().map(|x| x.to_bits()).collect()
}

/// The search box together with every observation made in it.
///
/// # Examples
///
/// ```
/// use bayes_opt::ParameterSpace;
///
/// let mut space = ParameterSpace::new([("y", (-3.0, 3.0)), ("x", (2.0, 4.0))]).unwrap();
/// assert_eq!(space.keys(), ["x", "y"]);
///
/// space.register([3.0, 1.0], -8.0).unwrap();
/// space.register([("y", 0.0), ("x", 2.0)], -4.0).unwrap();
///
/// assert_eq!(space.len(), 2);
/// assert_eq!(space.max().unwrap().target, -4.0);
/// ```
#[derive(Clone, Debug)]
pub struct ParameterSpace {
    keys: Vec<String>,
    bounds: Vec<(f64, f64)>,
    observations: Vec<Observation>,
    index: HashMap<PointKey, usize>,
    best: Option<usize>,
}

impl ParameterSpace {
    /// Creates a space from `(name, (lower, upper))` pairs.
    ///
    /// Names are sorted; a name given twice keeps its last bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] if any lower bound exceeds its upper
    /// bound or either is not finite.
    pub fn new<I, K>(bounds: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, (f64, f64))>,
        K: Into<String>,
    {
        let mut sorted = BTreeMap::new();
        for (name, (low, high)) in bounds {
            let name = name.into();
            validate_bounds(&name, low, high)?;
            sorted.insert(name, (low, high));
        }

        let (keys, bounds) = sorted.into_iter().unzip();
        Ok(Self {
            keys,
            bounds,
            observations: Vec::new(),
            index: HashMap::new(),
            best: None,
        })
    }

    /// Parameter names in canonical order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Current bounds in canonical order.
    #[must_use]
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Current bounds keyed by name.
    #[must_use]
    pub fn bounds_map(&self) -> BTreeMap<String, (f64, f64)> {
        self.keys.iter().cloned().zip(self.bounds.iter().copied()).collect()
    }

    /// Number of parameters.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.keys.len()
    }

    /// Number of registered observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Converts a positional or named candidate into a canonical point.
    ///
    /// Named candidates may list their keys in any order but must name
    /// exactly the parameters of this space.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if a vector has the wrong length.
    /// - [`Error::UnknownParameter`] if a mapping has a key outside the
    ///   space or lacks one of its keys.
    pub fn to_point(&self, candidate: impl Into<Candidate>) -> Result<Vec<f64>> {
        match candidate.into() {
            Candidate::Point(point) => {
                if point.len() != self.dim() {
                    return Err(Error::DimensionMismatch {
                        expected: self.dim(),
                        got: point.len(),
                    });
                }
                Ok(point)
            }
            Candidate::Params(params) => {
                if let Some(extra) = params.keys().find(|k| self.position(k).is_none()) {
                    return Err(Error::UnknownParameter {
                        name: extra.clone(),
                        reason: "not a parameter of this space",
                    });
                }
                self.keys
                    .iter()
                    .map(|key| {
                        params.get(key).copied().ok_or_else(|| Error::UnknownParameter {
                            name: key.clone(),
                            reason: "missing from the given parameters",
                        })
                    })
                    .collect()
            }
        }
    }

    /// Converts a canonical point into named parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `point` has the wrong length.
    pub fn to_params(&self, point: &[f64]) -> Result<Params> {
        if point.len() != self.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                got: point.len(),
            });
        }
        Ok(self.keys.iter().cloned().zip(point.iter().copied()).collect())
    }

    /// Whether exactly this point has already been registered.
    #[must_use]
    pub fn contains(&self, point: &[f64]) -> bool {
        self.index.contains_key(&point_key(point))
    }

    /// Records the objective value at a point.
    ///
    /// Registering a point that is already present is a no-op: the stored
    /// observation keeps its original target and is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] / [`Error::UnknownParameter`] if the
    ///   candidate does not fit the space (see [`to_point`](Self::to_point)).
    /// - [`Error::NonFinite`] if a coordinate or the target is NaN or
    ///   infinite.
    pub fn register(&mut self, candidate: impl Into<Candidate>, target: f64) -> Result<&Observation> {
        let point = self.to_point(candidate)?;
        if point.iter().any(|x| !x.is_finite()) {
            return Err(Error::NonFinite { what: "coordinate" });
        }
        if !target.is_finite() {
            return Err(Error::NonFinite { what: "target" });
        }

        let key = point_key(&point);
        if let Some(&existing) = self.index.get(&key) {
            trace_debug!(index = existing, "duplicate point ignored");
            return Ok(&self.observations[existing]);
        }

        let idx = self.observations.len();
        self.observations.push(Observation { point, target });
        self.index.insert(key, idx);

        let improved = self
            .best
            .is_none_or(|best| target > self.observations[best].target);
        if improved {
            self.best = Some(idx);
        }

        Ok(&self.observations[idx])
    }

    /// Draws one point uniformly from the current bounds.
    pub fn random_sample(&self, rng: &mut fastrand::Rng) -> Vec<f64> {
        rng_util::uniform_point(rng, &self.bounds)
    }

    /// Projects a point onto the current bounds.
    #[must_use]
    pub fn clip(&self, point: &[f64]) -> Vec<f64> {
        let mut clipped = point.to_vec();
        rng_util::clip_in_place(&mut clipped, &self.bounds);
        clipped
    }

    /// Updates the bounds of the named parameters; others keep theirs.
    ///
    /// The update is all-or-nothing: every entry is validated before any
    /// bound changes. Registered observations are kept even if they now lie
    /// outside the box.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownParameter`] if a name is not in the space.
    /// - [`Error::InvalidBounds`] if a lower bound exceeds its upper bound.
    pub fn set_bounds<I, K>(&mut self, bounds: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, (f64, f64))>,
        K: Into<String>,
    {
        let mut updates = Vec::new();
        for (name, (low, high)) in bounds {
            let name = name.into();
            let Some(pos) = self.position(&name) else {
                return Err(Error::UnknownParameter {
                    name,
                    reason: "not a parameter of this space",
                });
            };
            validate_bounds(&name, low, high)?;
            updates.push((pos, (low, high)));
        }

        for (pos, bound) in updates {
            self.bounds[pos] = bound;
        }
        Ok(())
    }

    /// The observation with the greatest target, or `None` if empty.
    ///
    /// Ties go to the observation registered first.
    #[must_use]
    pub fn max(&self) -> Option<&Observation> {
        self.best.map(|idx| &self.observations[idx])
    }

    /// All observations in registration order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterator over registered points in registration order.
    pub fn points(&self) -> impl Iterator<Item = &[f64]> {
        self.observations.iter().map(|o| o.point.as_slice())
    }

    /// Registered targets in registration order.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.target).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.keys.binary_search_by(|k| k.as_str().cmp(name)).ok()
    }
}

fn validate_bounds(name: &str, low: f64, high: f64) -> Result<()> {
    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(Error::InvalidBounds {
            name: name.to_string(),
            low,
            high,
        });
    }
    Ok(())
}
