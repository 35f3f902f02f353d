#![forbid(unsafe_code)]

//! Retained value with change notification.
//!
//! An [`Observable`] is a [`Signal`] plus the last value sent through it:
//! writes that leave the value unchanged are dropped, every other write is
//! broadcast. The tour's step index and completion flag, and each
//! highlighter's page rectangle, are held this way so views can re-render
//! only on real changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace_span;

use super::{Signal, Subscription};

struct Slot<T> {
    current: RefCell<T>,
    changes: Cell<u64>,
    signal: Signal<T>,
}

/// Shared value handle. Clones observe and update the same slot.
///
/// # Invariants
///
/// 1. [`Observable::version`] counts value-changing writes exactly.
/// 2. Writing the current value again notifies nobody.
/// 3. The slot is not borrowed while subscribers run, so a subscriber may
///    read or write the value it is watching.
pub struct Observable<T> {
    slot: Rc<Slot<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("current", &*self.slot.current.borrow())
            .field("version", &self.slot.changes.get())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            slot: Rc::new(Slot {
                current: RefCell::new(initial),
                changes: Cell::new(0),
                signal: Signal::new(),
            }),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.slot.current.borrow().clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.current.borrow())
    }

    /// Store `value` and broadcast it, unless it equals the current value.
    pub fn set(&self, value: T) {
        if *self.slot.current.borrow() == value {
            return;
        }
        self.slot.current.replace(value.clone());
        let version = self.slot.changes.get() + 1;
        self.slot.changes.set(version);

        let _span = trace_span!("wayfinder.observable.changed", version).entered();
        self.slot.signal.emit(value);
    }

    /// Watch future changes. The current value is not replayed.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.slot.signal.subscribe(callback)
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.changes.get()
    }

    #[must_use]
    pub fn watchers(&self) -> usize {
        self.slot.signal.live_subscribers()
    }
}
