#![forbid(unsafe_code)]

//! Single-threaded change notification.
//!
//! - [`Observable`] holds a value and notifies subscribers when it changes.
//! - [`Signal`] broadcasts discrete events with no retained value.
//!
//! Both hand out [`Subscription`] guards; dropping a guard unsubscribes.

mod observable;
mod signal;

pub use observable::Observable;
pub use signal::{Signal, WeakSignal};

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the strong reference to the callback,
/// so the weak entry held by the source fails to upgrade and is pruned on
/// the next notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn new(guard: Box<dyn std::any::Any>) -> Self {
        Self { _guard: guard }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
