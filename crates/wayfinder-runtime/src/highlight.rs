#![forbid(unsafe_code)]

//! Highlight geometry tracking.
//!
//! A [`Highlighter`] represents one tour step's target element. While that
//! step is active and the tour is not done it measures the element in page
//! coordinates, listens for viewport resize/scroll, and republishes the
//! rectangle on every change.
//!
//! # Invariants
//!
//! 1. A viewport subscription is held iff the highlighter is active.
//! 2. [`Highlighter::rect`] is `None` whenever the element is absent or the
//!    highlighter is inactive.
//! 3. Dropping the highlighter releases every subscription it holds.
//!
//! # Example
//!
//! ```ignore
//! let highlighter = Highlighter::new(&tour, 2, probe, viewport.clone());
//! highlighter.attach(element);
//! if let Some(frame) = highlighter.frame() {
//!     // draw frame.bands and frame.ring
//! }
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace_span};
use wayfinder_core::{HighlightFrame, PageRect};

use crate::reactive::{Observable, Subscription};
use crate::tour::Tour;
use crate::viewport::{ElementHandle, LayoutProbe, ViewportChange, ViewportSignal};

struct HighlightState {
    step: usize,
    probe: Rc<dyn LayoutProbe>,
    viewport: ViewportSignal,
    element: Option<Rc<dyn ElementHandle>>,
    listener: Option<Subscription>,
}

impl HighlightState {
    fn measure(&self) -> Option<PageRect> {
        let element = self.element.as_ref()?;
        let client = element.client_rect()?;
        Some(PageRect::from_client(client, self.probe.scroll_offset()))
    }
}

/// Tracks the page rectangle of one step's target element.
pub struct Highlighter {
    tour: Tour,
    state: Rc<RefCell<HighlightState>>,
    rect: Observable<Option<PageRect>>,
    _tour_subscriptions: [Subscription; 2],
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("step", &self.step())
            .field("active", &self.is_active())
            .field("rect", &self.rect())
            .finish()
    }
}

impl Highlighter {
    /// Create a highlighter for `step` of `tour` with no element attached.
    pub fn new(
        tour: &Tour,
        step: usize,
        probe: Rc<dyn LayoutProbe>,
        viewport: ViewportSignal,
    ) -> Self {
        let state = Rc::new(RefCell::new(HighlightState {
            step,
            probe,
            viewport,
            element: None,
            listener: None,
        }));
        let rect = Observable::new(None);

        let on_step = {
            let weak = Rc::downgrade(&state);
            let rect = rect.clone();
            let handle = tour.clone();
            tour.subscribe_step(move |_| sync(&weak, &rect, &handle))
        };
        let on_done = {
            let weak = Rc::downgrade(&state);
            let rect = rect.clone();
            let handle = tour.clone();
            tour.subscribe_done(move |_| sync(&weak, &rect, &handle))
        };

        let highlighter = Self {
            tour: tour.clone(),
            state,
            rect,
            _tour_subscriptions: [on_step, on_done],
        };
        highlighter.sync();
        highlighter
    }

    /// Attach (or replace) the target element.
    pub fn attach(&self, element: Rc<dyn ElementHandle>) {
        self.state.borrow_mut().element = Some(element);
        self.sync();
    }

    /// Forget the target element. The rectangle is cleared.
    pub fn detach(&self) {
        self.state.borrow_mut().element = None;
        self.rect.set(None);
    }

    /// Step index this highlighter represents.
    #[must_use]
    pub fn step(&self) -> usize {
        self.state.borrow().step
    }

    /// True while this highlighter's step is active and the tour is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        is_active(&self.tour, self.step())
    }

    /// True while a viewport subscription is held.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    /// Last published page rectangle.
    #[must_use]
    pub fn rect(&self) -> Option<PageRect> {
        self.rect.get()
    }

    /// Overlay geometry to draw, if any.
    #[must_use]
    pub fn frame(&self) -> Option<HighlightFrame> {
        if !self.is_active() {
            return None;
        }
        self.rect().map(HighlightFrame::around)
    }

    /// Re-measure now, outside of any viewport event.
    pub fn refresh(&self) {
        recompute(&self.state, &self.rect);
    }

    /// Observe rectangle changes.
    pub fn subscribe(&self, callback: impl Fn(&Option<PageRect>) + 'static) -> Subscription {
        self.rect.subscribe(callback)
    }

    fn sync(&self) {
        sync(&Rc::downgrade(&self.state), &self.rect, &self.tour);
    }
}

fn is_active(tour: &Tour, step: usize) -> bool {
    tour.step() == step && !tour.is_done()
}

/// Bring the listener and rectangle in line with the tour's current state.
fn sync(
    weak: &Weak<RefCell<HighlightState>>,
    rect: &Observable<Option<PageRect>>,
    tour: &Tour,
) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let step = state.borrow().step;

    if !is_active(tour, step) {
        let released = state.borrow_mut().listener.take();
        if released.is_some() {
            debug!(tour_id = tour.id(), step, "highlight deactivated");
        }
        drop(released);
        rect.set(None);
        return;
    }

    if state.borrow().listener.is_none() {
        let listener = {
            let weak = Rc::downgrade(&state);
            let rect = rect.clone();
            let viewport = state.borrow().viewport.clone();
            viewport.subscribe(move |change: &ViewportChange| {
                if let Some(state) = weak.upgrade() {
                    let _span = trace_span!("wayfinder.highlight.viewport", ?change).entered();
                    recompute(&state, &rect);
                }
            })
        };
        state.borrow_mut().listener = Some(listener);
        debug!(tour_id = tour.id(), step, "highlight activated");
    }
    recompute(&state, rect);
}

fn recompute(state: &RefCell<HighlightState>, rect: &Observable<Option<PageRect>>) {
    let measured = state.borrow().measure();
    rect.set(measured);
}
