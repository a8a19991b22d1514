use bayes_opt::{BayesianOptimization, InitPolicy, Params, Phase};

use super::{fast_acq_optimizer, peak_builder};

#[test]
fn end_to_end_registers_every_evaluation() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.maximize(2, 3).unwrap();

    let observations = optimizer.observations();
    assert_eq!(observations.len(), 5);

    let best = optimizer.max().unwrap();
    let greatest = observations
        .iter()
        .map(|o| o.target)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(best.target, greatest);

    for o in observations {
        assert!((2.0..=4.0).contains(&o.point[0]));
        assert!((-3.0..=3.0).contains(&o.point[1]));
    }
    assert_eq!(optimizer.phase(), Phase::Idle);
}

#[test]
fn best_is_keyed_by_name() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.maximize(3, 0).unwrap();

    let best = optimizer.best().unwrap();
    assert_eq!(best.params.keys().collect::<Vec<_>>(), ["x", "y"]);
    assert_eq!(best.target, optimizer.max().unwrap().target);
    assert_eq!(optimizer.res().len(), 3);
}

#[test]
fn cold_start_without_init_points_draws_one() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.maximize(0, 0).unwrap();
    assert_eq!(optimizer.observations().len(), 1);
}

#[test]
fn resumed_run_skips_init_points_by_default() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.maximize(2, 0).unwrap();
    optimizer.maximize(3, 0).unwrap();
    assert_eq!(optimizer.observations().len(), 2);

    optimizer.maximize(3, 1).unwrap();
    assert_eq!(optimizer.observations().len(), 3);
}

#[test]
fn always_policy_draws_init_points_every_call() {
    let mut optimizer = peak_builder().init_policy(InitPolicy::Always).build().unwrap();
    optimizer.maximize(2, 0).unwrap();
    optimizer.maximize(3, 0).unwrap();
    assert_eq!(optimizer.observations().len(), 5);
}

#[test]
fn same_seed_same_run() {
    let mut a = peak_builder().build().unwrap();
    let mut b = peak_builder().build().unwrap();
    a.maximize(2, 2).unwrap();
    b.maximize(2, 2).unwrap();
    assert_eq!(a.observations(), b.observations());
}

#[test]
fn guided_steps_close_in_on_a_smooth_maximum() {
    let objective = |p: &Params| Ok::<_, String>(-(p["x"] - 0.3).powi(2));
    let mut optimizer = BayesianOptimization::builder(objective, [("x", (0.0, 1.0))])
        .seed(11)
        .acquisition_optimizer(fast_acq_optimizer())
        .build()
        .unwrap();
    optimizer.maximize(2, 10).unwrap();

    let best = optimizer.best().unwrap();
    assert!((best.params["x"] - 0.3).abs() < 0.1, "best x {}", best.params["x"]);
}

#[test]
fn wide_box_converges_like_the_unit_box() {
    let objective = |p: &Params| Ok::<_, String>(-((p["x"] - 3000.0) / 1e4).powi(2));
    let mut optimizer = BayesianOptimization::builder(objective, [("x", (0.0, 1e4))])
        .seed(11)
        .acquisition_optimizer(fast_acq_optimizer())
        .build()
        .unwrap();
    optimizer.maximize(2, 10).unwrap();

    let best = optimizer.best().unwrap();
    assert!((best.params["x"] - 3000.0).abs() < 1000.0, "best x {}", best.params["x"]);
}
