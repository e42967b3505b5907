//! Synchronous listener registry.
//!
//! DESIGN
//! ======
//! Listeners receive a borrowed snapshot that the notifier built for this
//! notification alone, so no listener can mutate service state through it.
//! The listener list is copied before dispatch, which lets a listener
//! subscribe or unsubscribe while being notified.

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<S> = Rc<dyn Fn(&S)>;

struct Registry<S> {
    next_id: u64,
    listeners: Vec<(u64, Listener<S>)>,
}

/// Ordered set of callbacks invoked with a state snapshot.
pub struct Observers<S> {
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self { registry: Rc::new(RefCell::new(Registry { next_id: 0, listeners: Vec::new() })) }
    }
}

impl<S: 'static> Observers<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It stays registered until the returned handle's
    /// `unsubscribe` is called; dropping the handle keeps it registered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<Registry<S>>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().listeners.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    /// Invoke every listener in registration order.
    pub fn notify(&self, snapshot: &S) {
        let listeners: Vec<Listener<S>> =
            self.registry.borrow().listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Observers::subscribe`].
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
