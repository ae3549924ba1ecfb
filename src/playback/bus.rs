//! Synchronous multi-subscriber notification bus.
//!
//! Listeners are invoked in subscription order on the emitting thread. A
//! listener that panics aborts the rest of the emission.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Slots<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

/// Observer list for one engine.
pub struct NotificationBus<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

/// Handle returned by [`NotificationBus::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription<E> {
    id: u64,
    slots: Weak<RefCell<Slots<E>>>,
}

impl<E> Subscription<E> {
    /// Remove the listener. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(slots) = self.slots.upgrade() else {
            return false;
        };
        let mut slots = slots.borrow_mut();
        let before = slots.listeners.len();
        slots.listeners.retain(|(id, _)| *id != self.id);
        slots.listeners.len() != before
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl<E: 'static> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> NotificationBus<E> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<E>
    where
        F: FnMut(&E) + 'static,
    {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        let listener: Listener<E> = Rc::new(RefCell::new(listener));
        slots.listeners.push((id, listener));

        Subscription {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }

    /// Deliver `event` to every current listener in subscription order.
    ///
    /// Listeners subscribed during emission are first called on the next emit.
    /// Listeners unsubscribed during emission are not called again.
    pub fn emit(&self, event: &E) {
        let listeners: Vec<(u64, Listener<E>)> = self
            .slots
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            if !self.contains(id) {
                continue;
            }
            let mut listener = listener.borrow_mut();
            (*listener)(event);
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.slots
            .borrow()
            .listeners
            .iter()
            .any(|(current, _)| *current == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.slots.borrow().listeners.len()
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.slots.borrow_mut().listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_in_subscription_order() {
        let bus = NotificationBus::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&log);
        let _sa = bus.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&log);
        let _sb = bus.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        bus.emit(&1);
        bus.emit(&2);

        assert_eq!(
            *log.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let bus = NotificationBus::<u32>::new();
        let count = Rc::new(RefCell::new(0));

        let c = Rc::clone(&count);
        let sub = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.emit(&0);
        assert!(sub.unsubscribe());
        bus.emit(&0);

        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus = NotificationBus::<u32>::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_subscribe_during_emit() {
        let bus = Rc::new(NotificationBus::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = Rc::clone(&bus);
        let inner_seen = Rc::clone(&seen);
        let _outer = bus.subscribe(move |e| {
            if *e == 0 {
                let s = Rc::clone(&inner_seen);
                let _late = inner_bus.subscribe(move |e| s.borrow_mut().push(*e));
            }
        });

        bus.emit(&0);
        assert!(seen.borrow().is_empty());
        bus.emit(&1);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_unsubscribe_during_emit_skips_removed() {
        let bus = NotificationBus::<u32>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let pending: Rc<RefCell<Option<Subscription<u32>>>> = Rc::default();

        let a_calls = Rc::clone(&calls);
        let a_pending = Rc::clone(&pending);
        let _a = bus.subscribe(move |_| {
            a_calls.borrow_mut().push("a");
            if let Some(sub) = a_pending.borrow_mut().take() {
                assert!(sub.unsubscribe());
            }
        });
        let b_calls = Rc::clone(&calls);
        let b = bus.subscribe(move |_| b_calls.borrow_mut().push("b"));
        *pending.borrow_mut() = Some(b);

        bus.emit(&0);
        assert_eq!(*calls.borrow(), vec!["a"]);
        assert_eq!(bus.len(), 1);

        bus.emit(&1);
        assert_eq!(*calls.borrow(), vec!["a", "a"]);
    }

    #[test]
    fn test_clear() {
        let bus = NotificationBus::<u32>::new();
        let _a = bus.subscribe(|_| {});
        let _b = bus.subscribe(|_| {});
        assert_eq!(bus.len(), 2);
        bus.clear();
        assert!(bus.is_empty());
    }
}
