use bayes_opt::{BayesianOptimization, Error, Params};

use super::{fast_acq_optimizer, peak_builder};

#[test]
fn lazy_probe_waits_for_maximize() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.probe([3.0, 0.5], true).unwrap();

    assert!(optimizer.observations().is_empty());
    assert_eq!(optimizer.n_pending(), 1);

    optimizer.maximize(0, 0).unwrap();
    assert_eq!(optimizer.n_pending(), 0);
    assert_eq!(optimizer.observations().len(), 1);
    assert_eq!(optimizer.observations()[0].point, vec![3.0, 0.5]);
}

#[test]
fn eager_probe_registers_immediately() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.probe([2.0, 1.0], false).unwrap();

    let max = optimizer.max().unwrap();
    assert_eq!(max.point, vec![2.0, 1.0]);
    assert_eq!(max.target, -3.0);
}

#[test]
fn queue_drains_in_insertion_order_before_guided_steps() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.probe([2.5, 0.0], true).unwrap();
    optimizer.probe([3.5, 2.0], true).unwrap();
    optimizer.probe([2.0, -1.0], true).unwrap();

    optimizer.maximize(0, 2).unwrap();

    let points: Vec<_> = optimizer
        .observations()
        .iter()
        .map(|o| o.point.clone())
        .collect();
    assert_eq!(points.len(), 5);
    assert_eq!(points[..3], [vec![2.5, 0.0], vec![3.5, 2.0], vec![2.0, -1.0]]);
}

#[test]
fn probe_by_name_uses_canonical_order() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.probe([("y", 1.0), ("x", 3.0)], false).unwrap();
    assert_eq!(optimizer.observations()[0].point, vec![3.0, 1.0]);
}

#[test]
fn probe_outside_bounds_is_allowed() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.probe([0.0, 1.0], false).unwrap();
    assert_eq!(optimizer.max().unwrap().target, 1.0);
}

#[test]
fn invalid_probe_is_rejected_before_queueing() {
    let mut optimizer = peak_builder().build().unwrap();

    let err = optimizer.probe([1.0, 2.0, 3.0], true).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 3 }));

    let err = optimizer.probe([("x", 3.0), ("z", 0.0)], true).unwrap_err();
    assert!(matches!(err, Error::UnknownParameter { .. }));

    assert_eq!(optimizer.n_pending(), 0);
}

#[test]
fn failed_queued_probe_stays_queued() {
    let mut fail = true;
    let objective = move |p: &Params| {
        if fail {
            fail = false;
            Err("transient".to_string())
        } else {
            Ok(p["x"])
        }
    };
    let mut optimizer = BayesianOptimization::builder(objective, [("x", (0.0, 1.0))])
        .seed(5)
        .acquisition_optimizer(fast_acq_optimizer())
        .build()
        .unwrap();

    optimizer.probe([0.25], true).unwrap();
    assert!(optimizer.maximize(0, 0).is_err());
    assert_eq!(optimizer.n_pending(), 1);
    assert!(optimizer.observations().is_empty());

    optimizer.maximize(0, 0).unwrap();
    assert_eq!(optimizer.n_pending(), 0);
    assert_eq!(optimizer.observations()[0].target, 0.25);
}
