//! Minimal change-notification primitive shared by every state holder.
//!
//! Composite holders forward the notifications of their children with
//! [`Observable::bubble_to`], so one observer registered on a page model sees
//! changes happening at any depth below it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Observer = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
struct ObservableInner {
    observers: RefCell<Vec<(ObserverId, Observer)>>,
    next_id: Cell<u64>,
}

/// Cloning an `Observable` yields another handle on the same observer list
#[derive(Clone, Default)]
pub struct Observable {
    inner: Rc<ObservableInner>,
}

impl Observable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`, called on every [`Observable::notify`]
    pub fn observe(&self, observer: impl Fn() + 'static) -> ObserverId {
        let id = ObserverId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        id
    }

    pub fn unobserve(&self, id: ObserverId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(observer_id, _)| *observer_id != id);
    }

    /// Call every observer registered at the time of the call
    pub fn notify(&self) {
        // Snapshot: observers may subscribe or unsubscribe while being called
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();

        for observer in observers {
            observer();
        }
    }

    /// Forward every notification of `self` to `parent`.
    ///
    /// Only a weak link to the parent is kept: a parent dropped before its
    /// child silently stops receiving.
    pub fn bubble_to(&self, parent: &Observable) -> ObserverId {
        let parent: Weak<ObservableInner> = Rc::downgrade(&parent.inner);
        self.observe(move || {
            if let Some(inner) = parent.upgrade() {
                Observable { inner }.notify();
            }
        })
    }

    pub fn observers_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }
}

impl std::fmt::Debug for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observers_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(observable: &Observable) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        observable.observe(move || inner.set(inner.get() + 1));
        count
    }

    #[test]
    fn test_notify_calls_every_observer() {
        let observable = Observable::new();
        let first = counter(&observable);
        let second = counter(&observable);

        observable.notify();
        observable.notify();

        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn test_unobserve() {
        let observable = Observable::new();
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let id = observable.observe(move || inner.set(inner.get() + 1));

        observable.notify();
        observable.unobserve(id);
        observable.notify();

        assert_eq!(count.get(), 1);
        assert_eq!(observable.observers_count(), 0);
    }

    #[test]
    fn test_bubbling_through_several_levels() {
        let root = Observable::new();
        let middle = Observable::new();
        let leaf = Observable::new();
        middle.bubble_to(&root);
        leaf.bubble_to(&middle);

        let root_count = counter(&root);
        let middle_count = counter(&middle);

        leaf.notify();
        middle.notify();

        assert_eq!(middle_count.get(), 2);
        assert_eq!(root_count.get(), 2);
    }

    #[test]
    fn test_dropped_parent_is_ignored() {
        let child = Observable::new();
        {
            let parent = Observable::new();
            child.bubble_to(&parent);
        }

        child.notify();
        assert_eq!(child.observers_count(), 1);
    }
}
