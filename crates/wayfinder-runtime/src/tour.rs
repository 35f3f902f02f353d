#![forbid(unsafe_code)]

//! Shared tour state.
//!
//! A [`Tour`] is mounted once per tour id and then cloned into every
//! component that reads or drives it (popup, highlighters, buttons). All
//! clones share the same step sequence, the same observable step/done
//! values, and the same [`ProgressStore`].
//!
//! # Mutation contract
//!
//! Every mutation writes through the progress store first and then
//! publishes the same value to the in-memory observables, so persisted and
//! rendered state never disagree after a handler returns.

use std::rc::Rc;

use tracing::{debug, info};
use wayfinder_core::{TourStep, last_step_index};

use crate::navigate::{Navigator, TourNavigator};
use crate::progress::ProgressStore;
use crate::reactive::{Observable, Subscription};

struct TourInner {
    id: String,
    steps: Vec<TourStep>,
    step: Observable<usize>,
    done: Observable<bool>,
    store: ProgressStore,
}

/// Cheap-clone handle to one mounted tour.
#[derive(Clone)]
pub struct Tour {
    inner: Rc<TourInner>,
}

impl std::fmt::Debug for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("id", &self.inner.id)
            .field("step", &self.step())
            .field("step_count", &self.step_count())
            .field("done", &self.is_done())
            .finish()
    }
}

impl Tour {
    /// Mount tour `id`, resuming from persisted progress or creating it.
    ///
    /// A persisted step beyond the end of `steps` (the sequence shrank since
    /// it was written) is clamped to the last step in memory.
    pub fn mount(id: impl Into<String>, steps: Vec<TourStep>, store: ProgressStore) -> Self {
        let id = id.into();
        let progress = store.init(&id);
        let step = progress.step.min(steps.len().saturating_sub(1));
        info!(
            tour_id = %id,
            step,
            step_count = steps.len(),
            done_tour = progress.done_tour,
            "tour mounted"
        );
        Self {
            inner: Rc::new(TourInner {
                id,
                steps,
                step: Observable::new(step),
                done: Observable::new(progress.done_tour),
                store,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn steps(&self) -> &[TourStep] {
        &self.inner.steps
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.inner.steps.len()
    }

    /// Index of the active step.
    #[must_use]
    pub fn step(&self) -> usize {
        self.inner.step.get()
    }

    /// The active step, if the sequence is non-empty.
    #[must_use]
    pub fn current_step(&self) -> Option<&TourStep> {
        self.inner.steps.get(self.step())
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.inner.done.get()
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.step() == 0
    }

    /// True when the active step is the final one. An empty tour has no
    /// last step.
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        last_step_index(self.step_count()) == Some(self.step())
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.is_first_step()
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.step_count() > 0 && !self.is_last_step()
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.inner.store
    }

    /// Advance one step. Advancing from the last step finishes the tour.
    pub fn next(&self) -> usize {
        let current = self.step();
        let finishing = self.is_last_step();
        let next = self
            .inner
            .store
            .advance(&self.inner.id, current, self.step_count());
        debug!(tour_id = %self.inner.id, from = current, to = next, "tour next");
        self.inner.step.set(next);
        if finishing {
            self.inner.done.set(true);
        }
        next
    }

    /// Go back one step, stopping at the first.
    pub fn back(&self) -> usize {
        let current = self.step();
        let prev = self.inner.store.retreat(&self.inner.id, current);
        debug!(tour_id = %self.inner.id, from = current, to = prev, "tour back");
        self.inner.step.set(prev);
        prev
    }

    /// Jump directly to `index` (clamped to the last step).
    pub fn jump_to(&self, index: usize) -> usize {
        let target = self
            .inner
            .store
            .jump(&self.inner.id, index, self.step_count());
        debug!(tour_id = %self.inner.id, to = target, "tour jump");
        self.inner.step.set(target);
        target
    }

    /// Mark the tour done. Highlights and popups hide immediately.
    pub fn finish(&self) {
        self.inner.store.finish(&self.inner.id);
        info!(tour_id = %self.inner.id, step = self.step(), "tour finished");
        self.inner.done.set(true);
    }

    /// Wrap a host navigator so every navigation records the route.
    pub fn navigator<N: Navigator>(&self, navigator: N) -> TourNavigator<N> {
        TourNavigator::new(self.inner.store.clone(), self.inner.id.clone(), navigator)
    }

    /// Observe step changes.
    pub fn subscribe_step(&self, callback: impl Fn(&usize) + 'static) -> Subscription {
        self.inner.step.subscribe(callback)
    }

    /// Observe completion changes.
    pub fn subscribe_done(&self, callback: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.done.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageBackend};
    use std::cell::RefCell;

    fn steps(n: usize) -> Vec<TourStep> {
        (0..n)
            .map(|i| TourStep::new(format!("Step {i}"), format!("Body {i}")))
            .collect()
    }

    fn mount(n: usize) -> (Rc<MemoryStorage>, Tour) {
        let backend = Rc::new(MemoryStorage::new());
        let tour = Tour::mount("intro", steps(n), ProgressStore::new(backend.clone()));
        (backend, tour)
    }

    #[test]
    fn mount_creates_progress() {
        let (backend, tour) = mount(3);
        assert_eq!(tour.step(), 0);
        assert!(!tour.is_done());
        assert!(backend.get("tour-intro").unwrap().is_some());
        assert_eq!(tour.current_step().unwrap().title, "Step 0");
    }

    #[test]
    fn mount_resumes_persisted_step() {
        let backend = Rc::new(MemoryStorage::new());
        backend
            .set("tour-intro", r#"{"step":2,"doneTour":false}"#)
            .unwrap();
        let tour = Tour::mount("intro", steps(4), ProgressStore::new(backend));
        assert_eq!(tour.step(), 2);
    }

    #[test]
    fn mount_clamps_stale_step() {
        let backend = Rc::new(MemoryStorage::new());
        backend
            .set("tour-intro", r#"{"step":9,"doneTour":false}"#)
            .unwrap();
        let tour = Tour::mount("intro", steps(3), ProgressStore::new(backend));
        assert_eq!(tour.step(), 2);
        assert!(tour.is_last_step());
    }

    #[test]
    fn next_and_back_persist_same_value() {
        let (_, tour) = mount(3);
        assert_eq!(tour.next(), 1);
        assert_eq!(tour.store().load("intro").unwrap().step, 1);
        assert_eq!(tour.back(), 0);
        assert_eq!(tour.store().load("intro").unwrap().step, 0);
        assert_eq!(tour.step(), 0);
    }

    #[test]
    fn boundaries() {
        let (_, tour) = mount(2);
        assert!(!tour.can_go_back());
        assert!(tour.can_go_next());
        tour.next();
        assert!(tour.can_go_back());
        assert!(!tour.can_go_next());
        assert!(tour.is_last_step());
    }

    #[test]
    fn next_from_last_finishes() {
        let (_, tour) = mount(2);
        tour.next();
        tour.next();
        assert_eq!(tour.step(), 1);
        assert!(tour.is_done());
        assert!(tour.store().load("intro").unwrap().done_tour);
    }

    #[test]
    fn finish_notifies_subscribers() {
        let (_, tour) = mount(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = tour.subscribe_done(move |done| seen_clone.borrow_mut().push(*done));
        tour.finish();
        tour.finish();
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn clones_share_state() {
        let (_, tour) = mount(3);
        let other = tour.clone();
        other.jump_to(2);
        assert_eq!(tour.step(), 2);
    }

    #[test]
    fn empty_tour_is_inert() {
        let (_, tour) = mount(0);
        assert!(tour.current_step().is_none());
        assert!(!tour.can_go_next());
        assert!(!tour.is_last_step());
        assert_eq!(tour.next(), 0);
        assert!(!tour.is_done());
    }
}
