use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bayes_opt::{BayesianOptimization, Event, Observer, Params, Phase};

use super::peak_builder;

struct Recorder(Rc<RefCell<Vec<Event>>>);

impl<F> Observer<F> for Recorder {
    fn update(&mut self, event: Event, _: &BayesianOptimization<F>) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn events_bracket_every_registration() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut optimizer = peak_builder().build().unwrap();
    optimizer.subscribe_all(Recorder(Rc::clone(&events)));

    optimizer.maximize(2, 1).unwrap();

    assert_eq!(
        *events.borrow(),
        [
            Event::OptimizationStart,
            Event::OptimizationStep,
            Event::OptimizationStep,
            Event::OptimizationStep,
            Event::OptimizationEnd,
        ]
    );
}

#[test]
fn observers_run_in_subscription_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut optimizer = peak_builder().build().unwrap();

    let first = Rc::clone(&log);
    optimizer.subscribe(Event::OptimizationStep, move |_, _| first.borrow_mut().push("first"));
    let second = Rc::clone(&log);
    optimizer.subscribe(Event::OptimizationStep, move |_, _| second.borrow_mut().push("second"));

    optimizer.maximize(2, 0).unwrap();
    assert_eq!(*log.borrow(), ["first", "second", "first", "second"]);
}

#[test]
fn step_observer_sees_the_new_observation() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut optimizer = peak_builder().build().unwrap();

    let sink = Rc::clone(&seen);
    optimizer.subscribe(Event::OptimizationStep, move |_, opt| {
        let latest = opt.observations().last().unwrap();
        sink.borrow_mut().push((opt.observations().len(), latest.target));
    });

    optimizer.maximize(3, 0).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    for (i, &(len, target)) in seen.iter().enumerate() {
        assert_eq!(len, i + 1);
        assert_eq!(target, optimizer.observations()[i].target);
    }
}

#[test]
fn observers_see_the_current_phase() {
    let phases = Rc::new(RefCell::new(Vec::new()));
    let mut optimizer = peak_builder().build().unwrap();

    let sink = Rc::clone(&phases);
    optimizer.subscribe_all(move |event: Event, opt: &BayesianOptimization<super::Peak>| {
        sink.borrow_mut().push((event, opt.phase()));
    });

    optimizer.probe([3.0, 0.0], true).unwrap();
    optimizer.maximize(0, 1).unwrap();

    assert_eq!(
        *phases.borrow(),
        [
            (Event::OptimizationStart, Phase::Idle),
            (Event::OptimizationStep, Phase::Probing),
            (Event::OptimizationStep, Phase::Exploiting),
            (Event::OptimizationEnd, Phase::Idle),
        ]
    );
}

#[test]
fn unsubscribe_stops_notifications() {
    let count = Rc::new(Cell::new(0));
    let mut optimizer = peak_builder().build().unwrap();

    let counter = Rc::clone(&count);
    let id = optimizer.subscribe(Event::OptimizationStep, move |_, _| counter.set(counter.get() + 1));
    assert_eq!(optimizer.n_observers(), 1);

    optimizer.maximize(1, 0).unwrap();
    assert_eq!(count.get(), 1);

    assert!(optimizer.unsubscribe(id));
    assert!(!optimizer.unsubscribe(id));
    assert_eq!(optimizer.n_observers(), 0);

    optimizer.probe([3.0, 2.0], false).unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn register_fires_step_only_for_new_points() {
    let count = Rc::new(Cell::new(0));
    let objective = |_: &Params| Ok::<_, String>(0.0);
    let mut optimizer = BayesianOptimization::new(objective, [("x", (0.0, 1.0))]).unwrap();

    let counter = Rc::clone(&count);
    optimizer.subscribe(Event::OptimizationStep, move |_, _| counter.set(counter.get() + 1));

    optimizer.register([0.5], 1.0).unwrap();
    optimizer.register([0.5], 2.0).unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(optimizer.max().unwrap().target, 1.0);
}

#[test]
fn end_is_not_fired_on_error() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let objective = |_: &Params| Err::<f64, _>("down".to_string());
    let mut optimizer = BayesianOptimization::new(objective, [("x", (0.0, 1.0))]).unwrap();
    optimizer.subscribe_all(Recorder(Rc::clone(&events)));

    assert!(optimizer.maximize(1, 0).is_err());
    assert_eq!(*events.borrow(), [Event::OptimizationStart]);
}

#[test]
fn observers_count_themselves_while_notified() {
    let counts = Rc::new(RefCell::new(Vec::new()));
    let mut optimizer = peak_builder().build().unwrap();

    let sink = Rc::clone(&counts);
    optimizer.subscribe(Event::OptimizationStep, move |_, opt| sink.borrow_mut().push(opt.n_observers()));
    optimizer.subscribe_all(Recorder(Rc::new(RefCell::new(Vec::new()))));

    optimizer.maximize(2, 0).unwrap();
    assert_eq!(*counts.borrow(), [2, 2]);
    assert_eq!(optimizer.n_observers(), 2);
}
