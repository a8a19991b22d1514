use core::error::Error as _;
use core::fmt;

use bayes_opt::{BayesianOptimization, Error, Objective, Params, Phase};

use super::fast_acq_optimizer;

#[test]
fn objective_error_aborts_and_keeps_prior_observations() {
    let mut calls = 0;
    let objective = move |p: &Params| {
        calls += 1;
        if calls == 3 {
            Err("boom".to_string())
        } else {
            Ok(p["x"])
        }
    };
    let mut optimizer = BayesianOptimization::builder(objective, [("x", (0.0, 1.0))])
        .seed(2)
        .acquisition_optimizer(fast_acq_optimizer())
        .build()
        .unwrap();

    let err = optimizer.maximize(2, 5).unwrap_err();
    assert!(matches!(err, Error::Objective(_)));
    assert_eq!(err.to_string(), "objective evaluation failed: boom");
    assert_eq!(err.source().unwrap().to_string(), "boom");

    assert_eq!(optimizer.observations().len(), 2);
    assert_eq!(optimizer.phase(), Phase::Idle);
}

#[derive(Debug)]
struct Unreachable;

impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("simulation host unreachable")
    }
}

impl core::error::Error for Unreachable {}

struct Simulation {
    runs: usize,
    budget: usize,
}

impl Objective for Simulation {
    type Error = Unreachable;

    fn evaluate(&mut self, params: &Params) -> Result<f64, Unreachable> {
        if self.runs == self.budget {
            return Err(Unreachable);
        }
        self.runs += 1;
        Ok(-(params["a"] - 0.5).abs())
    }
}

#[test]
fn struct_objective_error_is_passed_through() {
    let simulation = Simulation { runs: 0, budget: 1 };
    let mut optimizer = BayesianOptimization::builder(simulation, [("a", (0.0, 1.0))])
        .seed(4)
        .acquisition_optimizer(fast_acq_optimizer())
        .build()
        .unwrap();

    let err = optimizer.maximize(3, 0).unwrap_err();
    assert!(err.source().unwrap().is::<Unreachable>());
    assert_eq!(optimizer.observations().len(), 1);
}

#[test]
fn non_finite_objective_value_is_rejected() {
    let objective = |_: &Params| Ok::<_, String>(f64::NAN);
    let mut optimizer = BayesianOptimization::new(objective, [("x", (0.0, 1.0))]).unwrap();

    let err = optimizer.probe([0.5], false).unwrap_err();
    assert!(matches!(err, Error::NonFinite { .. }));
    assert!(optimizer.observations().is_empty());
}

#[test]
fn build_rejects_bad_bounds() {
    let objective = |_: &Params| Ok::<_, String>(0.0);
    let err = BayesianOptimization::new(objective, [("x", (1.0, 0.0))]).unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { .. }));

    let err = BayesianOptimization::new(objective, [("x", (0.0, f64::INFINITY))]).unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { .. }));
}
