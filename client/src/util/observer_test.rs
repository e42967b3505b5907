use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn notify_reaches_listeners_in_registration_order() {
    let observers = Observers::<u32>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let a = seen.clone();
    let b = seen.clone();
    let _first = observers.subscribe(move |v| a.borrow_mut().push(("a", *v)));
    let _second = observers.subscribe(move |v| b.borrow_mut().push(("b", *v)));

    observers.notify(&7);

    assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let observers = Observers::<u32>::new();
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    let sub = observers.subscribe(move |_| *c.borrow_mut() += 1);

    observers.notify(&1);
    sub.unsubscribe();
    observers.notify(&2);

    assert_eq!(*count.borrow(), 1);
    assert!(observers.is_empty());
}

#[test]
fn dropping_handle_keeps_listener() {
    let observers = Observers::<u32>::new();
    let count = Rc::new(RefCell::new(0));
    let c = count.clone();
    drop(observers.subscribe(move |_| *c.borrow_mut() += 1));

    observers.notify(&1);

    assert_eq!(*count.borrow(), 1);
    assert_eq!(observers.len(), 1);
}

#[test]
fn unsubscribe_after_registry_dropped_is_noop() {
    let observers = Observers::<u32>::new();
    let sub = observers.subscribe(|_| {});
    drop(observers);
    sub.unsubscribe();
}
