use bayes_opt::{Acquisition, Error};

use super::{peak, peak_builder};

#[test]
fn suggest_on_empty_space_is_in_bounds_and_unregistered() {
    let mut optimizer = peak_builder().build().unwrap();
    let params = optimizer.suggest().unwrap();

    assert!((2.0..=4.0).contains(&params["x"]));
    assert!((-3.0..=3.0).contains(&params["y"]));
    assert!(optimizer.observations().is_empty());
}

#[test]
fn suggest_register_loop() {
    let mut optimizer = peak_builder().build().unwrap();
    for _ in 0..6 {
        let params = optimizer.suggest().unwrap();
        let value = peak(&params).unwrap();
        optimizer.register(&params, value).unwrap();
    }
    assert_eq!(optimizer.observations().len(), 6);
}

#[test]
fn suggestions_never_repeat_registered_points() {
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.register([2.0, 1.0], -3.0).unwrap();
    optimizer.register([4.0, 1.0], -15.0).unwrap();

    for _ in 0..3 {
        let params = optimizer.suggest().unwrap();
        let point = optimizer.space().to_point(&params).unwrap();
        assert!(!optimizer.space().contains(&point));
        optimizer.register(&params, peak(&params).unwrap()).unwrap();
    }
}

#[test]
fn register_validates_candidates() {
    let mut optimizer = peak_builder().build().unwrap();

    let err = optimizer.register([1.0], 0.0).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 1 }));

    let err = optimizer.register([("x", 3.0)], 0.0).unwrap_err();
    assert!(matches!(err, Error::UnknownParameter { ref name, .. } if name == "y"));

    let err = optimizer.register([3.0, 0.0], f64::INFINITY).unwrap_err();
    assert!(matches!(err, Error::NonFinite { .. }));

    assert!(optimizer.observations().is_empty());
}

#[test]
fn acquisition_can_be_swapped() {
    let mut optimizer = peak_builder().build().unwrap();
    assert_eq!(optimizer.acquisition(), Acquisition::ucb(2.576));

    optimizer.set_acquisition(Acquisition::poi(0.1));
    assert_eq!(optimizer.acquisition(), Acquisition::poi(0.1));

    optimizer.maximize(2, 2).unwrap();
    assert_eq!(optimizer.observations().len(), 4);
}
