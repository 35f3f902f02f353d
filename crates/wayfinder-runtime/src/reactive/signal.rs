#![forbid(unsafe_code)]

//! Event broadcast without a retained value.
//!
//! Unlike [`super::Observable`], every [`Signal::emit`] reaches every live
//! subscriber, even when the payload equals the previous one. Viewport
//! resize and scroll notifications are delivered this way.
//!
//! A signal can also report demand: [`Signal::on_demand`] is told when the
//! first subscriber arrives and when the last one leaves, so the producer
//! behind it only runs while someone is listening.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::Subscription;

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;
type DemandHook = Rc<dyn Fn(bool)>;

struct Shared<E> {
    subscribers: RefCell<Vec<CallbackWeak<E>>>,
    live: Cell<usize>,
    demand: RefCell<Option<DemandHook>>,
}

impl<E> Shared<E> {
    fn notify_demand(&self, wanted: bool) {
        let hook = self.demand.borrow().clone();
        if let Some(hook) = hook {
            hook(wanted);
        }
    }

    fn release(&self) {
        let live = self.live.get().saturating_sub(1);
        self.live.set(live);
        if live == 0 {
            self.notify_demand(false);
        }
    }
}

/// Keeps one callback alive and tells the signal when it goes away.
struct Lease<E> {
    _callback: CallbackRc<E>,
    shared: Weak<Shared<E>>,
}

impl<E> Drop for Lease<E> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.release();
        }
    }
}

/// A shared event source. Clones share subscribers.
pub struct Signal<E> {
    shared: Rc<Shared<E>>,
}

/// Non-owning handle to a [`Signal`], for producers that must not keep it
/// alive.
pub struct WeakSignal<E> {
    shared: Weak<Shared<E>>,
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<E> Clone for WeakSignal<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            shared: Rc::new(Shared {
                subscribers: RefCell::new(Vec::new()),
                live: Cell::new(0),
                demand: RefCell::new(None),
            }),
        }
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("live", &self.shared.live.get())
            .field("has_demand_hook", &self.shared.demand.borrow().is_some())
            .finish()
    }
}

impl<E> std::fmt::Debug for WeakSignal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSignal")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl<E: 'static> Signal<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every subsequent event.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.shared
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&strong));
        let live = self.shared.live.get() + 1;
        self.shared.live.set(live);
        if live == 1 {
            self.shared.notify_demand(true);
        }
        Subscription::new(Box::new(Lease {
            _callback: strong,
            shared: Rc::downgrade(&self.shared),
        }))
    }

    /// Deliver `event` to every live subscriber in registration order.
    pub fn emit(&self, event: E) {
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subs = self.shared.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(&event);
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn live_subscribers(&self) -> usize {
        self.shared.live.get()
    }

    /// Call `hook(true)` when the first subscriber arrives and `hook(false)`
    /// when the last one leaves. Replaces any earlier hook; fires `true`
    /// right away if subscribers already exist.
    pub fn on_demand(&self, hook: impl Fn(bool) + 'static) {
        let hook: DemandHook = Rc::new(hook);
        self.shared.demand.replace(Some(Rc::clone(&hook)));
        if self.shared.live.get() > 0 {
            hook(true);
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakSignal<E> {
        WeakSignal {
            shared: Rc::downgrade(&self.shared),
        }
    }
}

impl<E: 'static> WeakSignal<E> {
    /// The signal, if any strong handle still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Signal<E>> {
        self.shared.upgrade().map(|shared| Signal { shared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demand_log(signal: &Signal<u8>) -> Rc<RefCell<Vec<bool>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        signal.on_demand(move |wanted| sink.borrow_mut().push(wanted));
        log
    }

    #[test]
    fn repeated_events_all_delivered() {
        let signal = Signal::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = Rc::clone(&count);
        let _sub = signal.subscribe(move |_: &()| count_clone.set(count_clone.get() + 1));

        signal.emit(());
        signal.emit(());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn dropped_subscription_is_not_live() {
        let signal: Signal<u8> = Signal::new();
        let sub = signal.subscribe(|_| {});
        assert_eq!(signal.live_subscribers(), 1);
        drop(sub);
        assert_eq!(signal.live_subscribers(), 0);
        signal.emit(1);
    }

    #[test]
    fn subscriber_may_unsubscribe_others_during_emit() {
        let signal: Signal<u8> = Signal::new();
        let victim = Rc::new(RefCell::new(Some(signal.subscribe(|_| {}))));
        let victim_clone = Rc::clone(&victim);
        let _killer = signal.subscribe(move |_| {
            victim_clone.borrow_mut().take();
        });
        signal.emit(0);
        assert_eq!(signal.live_subscribers(), 1);
    }

    #[test]
    fn demand_fires_on_first_and_last_subscriber_only() {
        let signal: Signal<u8> = Signal::new();
        let log = demand_log(&signal);

        let a = signal.subscribe(|_| {});
        let b = signal.subscribe(|_| {});
        assert_eq!(*log.borrow(), vec![true]);

        drop(a);
        assert_eq!(*log.borrow(), vec![true]);
        drop(b);
        assert_eq!(*log.borrow(), vec![true, false]);

        let _again = signal.subscribe(|_| {});
        assert_eq!(*log.borrow(), vec![true, false, true]);
    }

    #[test]
    fn late_demand_hook_sees_existing_subscribers() {
        let signal: Signal<u8> = Signal::new();
        let _sub = signal.subscribe(|_| {});
        let log = demand_log(&signal);
        assert_eq!(*log.borrow(), vec![true]);
    }

    #[test]
    fn weak_handle_emits_until_signal_dropped() {
        let signal: Signal<u8> = Signal::new();
        let weak = signal.downgrade();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let _sub = signal.subscribe(move |v| sink.set(*v));

        if let Some(strong) = weak.upgrade() {
            strong.emit(7);
        }
        assert_eq!(seen.get(), 7);

        drop(signal);
        assert!(weak.upgrade().is_none());
    }
}
