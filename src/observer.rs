//! Event notification for side-effecting consumers (loggers, progress bars).
//!
//! Observers are called synchronously, in subscription order, with the
//! event kind and a shared reference to the optimizer. The event carries no
//! payload; observers read whatever they need through the optimizer's
//! accessors, e.g. the last entry of
//! [`observations`](crate::BayesianOptimization::observations).

use crate::engine::BayesianOptimization;

/// What just happened inside the optimizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// `maximize` has started.
    OptimizationStart,
    /// A new observation has been registered.
    OptimizationStep,
    /// `maximize` has finished successfully.
    OptimizationEnd,
}

impl Event {
    /// Every event kind.
    pub const ALL: [Event; 3] = [
        Event::OptimizationStart,
        Event::OptimizationStep,
        Event::OptimizationEnd,
    ];
}

/// Receives optimizer events.
///
/// Closures `FnMut(Event, &BayesianOptimization<F>)` implement this trait.
pub trait Observer<F> {
    /// Handle `event` fired by `optimizer`.
    fn update(&mut self, event: Event, optimizer: &BayesianOptimization<F>);
}

impl<F, C> Observer<F> for C
where
    C: FnMut(Event, &BayesianOptimization<F>),
{
    fn update(&mut self, event: Event, optimizer: &BayesianOptimization<F>) {
        self(event, optimizer);
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<F> {
    id: SubscriptionId,
    events: Vec<Event>,
    observer: Box<dyn Observer<F>>,
}

/// Ordered list of subscriptions.
pub(crate) struct Dispatcher<F> {
    next_id: u64,
    subscriptions: Vec<Subscription<F>>,
    /// Subscriptions currently moved out by [`Dispatcher::detach`].
    detached: usize,
}

impl<F> Default for Dispatcher<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscriptions: Vec::new(),
            detached: 0,
        }
    }
}

impl<F> Dispatcher<F> {
    pub(crate) fn subscribe(&mut self, events: &[Event], observer: Box<dyn Observer<F>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            events: events.to_vec(),
            observer,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.subscriptions.len() + self.detached
    }

    /// Move the subscriptions out, leaving a placeholder that still counts
    /// them. Put the result back once dispatching is done.
    pub(crate) fn detach(&mut self) -> Self {
        let placeholder = Self {
            next_id: self.next_id,
            subscriptions: Vec::new(),
            detached: self.len(),
        };
        core::mem::replace(self, placeholder)
    }

    pub(crate) fn dispatch(&mut self, event: Event, optimizer: &BayesianOptimization<F>) {
        for subscription in &mut self.subscriptions {
            if subscription.events.contains(&event) {
                subscription.observer.update(event, optimizer);
            }
        }
    }
}
