use bayes_opt::{Acquisition, DomainReduction, Error, KappaDecay};

use super::peak_builder;

#[test]
fn set_bounds_restricts_future_points() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.set_bounds([("x", (3.0, 3.5))]).unwrap();
    optimizer.maximize(3, 2).unwrap();

    for o in optimizer.observations() {
        assert!((3.0..=3.5).contains(&o.point[0]), "x = {}", o.point[0]);
        assert!((-3.0..=3.0).contains(&o.point[1]), "y = {}", o.point[1]);
    }
}

#[test]
fn set_bounds_keeps_observations_outside_new_box() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.register([4.0, 3.0], -19.0).unwrap();
    optimizer.set_bounds([("x", (2.0, 2.5))]).unwrap();

    assert_eq!(optimizer.observations().len(), 1);
    assert_eq!(optimizer.space().bounds(), [(2.0, 2.5), (-3.0, 3.0)]);
}

#[test]
fn bad_bounds_update_changes_nothing() {
    let mut optimizer = peak_builder().build().unwrap();

    let err = optimizer
        .set_bounds([("x", (2.0, 3.0)), ("z", (0.0, 1.0))])
        .unwrap_err();
    assert!(matches!(err, Error::UnknownParameter { .. }));

    let err = optimizer
        .set_bounds([("x", (2.0, 3.0)), ("y", (1.0, -1.0))])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBounds { .. }));

    assert_eq!(optimizer.space().bounds(), [(2.0, 4.0), (-3.0, 3.0)]);
}

#[test]
fn kappa_decays_once_per_guided_step() {
    let mut optimizer = peak_builder()
        .acquisition(Acquisition::ucb(2.0))
        .kappa_decay(KappaDecay::new(0.5, 0))
        .build()
        .unwrap();
    optimizer.maximize(1, 3).unwrap();
    assert_eq!(optimizer.acquisition().kappa(), Some(0.25));
}

#[test]
fn kappa_decay_waits_for_delay() {
    let mut optimizer = peak_builder()
        .acquisition(Acquisition::ucb(2.0))
        .kappa_decay(KappaDecay::new(0.5, 2))
        .build()
        .unwrap();
    optimizer.maximize(1, 2).unwrap();
    assert_eq!(optimizer.acquisition().kappa(), Some(2.0));

    optimizer.maximize(0, 1).unwrap();
    assert_eq!(optimizer.acquisition().kappa(), Some(1.0));
}

#[test]
fn domain_reduction_keeps_bounds_around_incumbent() {
    let mut optimizer = peak_builder()
        .domain_reduction(DomainReduction::new().minimum_window(0.1))
        .build()
        .unwrap();
    optimizer.maximize(3, 4).unwrap();

    let best = optimizer.max().unwrap().point.clone();
    let bounds = optimizer.space().bounds();
    let original = [(2.0, 4.0), (-3.0, 3.0)];
    for i in 0..2 {
        let (lo, hi) = bounds[i];
        assert!(lo >= original[i].0 && hi <= original[i].1);
        assert!(hi - lo >= 0.1 - 1e-12);
        assert!(lo <= best[i] && best[i] <= hi);
    }
    assert!(bounds != original);
}

#[test]
fn domain_reduction_respects_later_set_bounds() {
    let mut optimizer = peak_builder()
        .domain_reduction(DomainReduction::new())
        .build()
        .unwrap();
    optimizer.maximize(3, 2).unwrap();

    optimizer.set_bounds([("x", (3.0, 3.5)), ("y", (-1.0, 1.0))]).unwrap();
    optimizer.maximize(0, 3).unwrap();

    for o in &optimizer.observations()[5..] {
        assert!((3.0..=3.5).contains(&o.point[0]), "x = {}", o.point[0]);
        assert!((-1.0..=1.0).contains(&o.point[1]), "y = {}", o.point[1]);
    }
    for (&(lo, hi), (user_lo, user_hi)) in optimizer.space().bounds().iter().zip([(3.0, 3.5), (-1.0, 1.0)]) {
        assert!(lo >= user_lo && hi <= user_hi, "({lo}, {hi})");
    }
}
