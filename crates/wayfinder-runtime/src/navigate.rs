#![forbid(unsafe_code)]

//! Tour-aware page navigation.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::progress::ProgressStore;

/// Host routing capability.
pub trait Navigator {
    /// Transition to `path`.
    fn navigate(&self, path: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Navigator that records the destination in the tour's progress before
/// handing off to the host router, so a reload can detect that the user is
/// not where the tour left them.
#[derive(Debug, Clone)]
pub struct TourNavigator<N> {
    store: ProgressStore,
    tour_id: String,
    inner: N,
}

impl<N: Navigator> TourNavigator<N> {
    pub fn new(store: ProgressStore, tour_id: impl Into<String>, inner: N) -> Self {
        Self {
            store,
            tour_id: tour_id.into(),
            inner,
        }
    }

    #[must_use]
    pub fn tour_id(&self) -> &str {
        &self.tour_id
    }
}

impl<N: Navigator> Navigator for TourNavigator<N> {
    fn navigate(&self, path: &str) {
        self.store.record_route(&self.tour_id, path);
        debug!(tour_id = %self.tour_id, path, "tour navigation");
        self.inner.navigate(path);
    }
}

/// Navigator that only remembers where it was sent. Useful for headless
/// hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visited: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path navigated to, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }

    /// The most recent destination.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.visited.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.borrow_mut().push(path.to_owned());
    }
}
