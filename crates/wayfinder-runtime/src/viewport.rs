#![forbid(unsafe_code)]

//! Rendering-collaborator seams for highlight measurement.
//!
//! - [`ElementHandle`]: live geometry of one rendered element.
//! - [`LayoutProbe`]: document scroll offset and viewport size.
//! - [`ViewportSignal`]: resize/scroll notifications.
//! - [`ViewportSource`]: the platform listeners that feed the signal.
//!
//! Browser hosts implement these over the DOM; headless hosts and tests use
//! [`StaticElement`] and [`StaticLayout`].
//!
//! [`feed_on_demand`] keeps a source's listeners installed only while some
//! highlighter is subscribed, so a finished or idle tour leaves no listeners
//! behind.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;
use wayfinder_core::{ClientRect, ScrollOffset, ViewportSize};

use crate::reactive::{Signal, WeakSignal};

/// A layout-affecting viewport event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportChange {
    Resize,
    /// A scroll anywhere in the document, not only the window.
    Scroll,
}

/// Broadcast of viewport changes. Hosts emit, highlighters subscribe.
pub type ViewportSignal = Signal<ViewportChange>;

/// Installs the platform listeners that emit on a [`ViewportSignal`].
pub trait ViewportSource {
    /// Start emitting on `signal`. Dropping the returned guard removes the
    /// listeners. `None` when they could not be installed.
    fn listen(&self, signal: WeakSignal<ViewportChange>) -> Option<Box<dyn Any>>;
}

/// Attach `source` to `signal` while the signal has subscribers, and detach
/// it when the last one leaves.
pub fn feed_on_demand(signal: &ViewportSignal, source: Rc<dyn ViewportSource>) {
    let weak = signal.downgrade();
    let installed: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
    signal.on_demand(move |wanted| {
        if wanted {
            let guard = source.listen(weak.clone());
            trace!(attached = guard.is_some(), "viewport listeners requested");
            *installed.borrow_mut() = guard;
        } else {
            let released = installed.take();
            if released.is_some() {
                trace!("viewport listeners released");
            }
            drop(released);
        }
    });
}

/// Live handle to a rendered element.
pub trait ElementHandle {
    /// Viewport-relative bounding box, or `None` once the element is no
    /// longer attached.
    fn client_rect(&self) -> Option<ClientRect>;
}

/// Document-level layout metrics.
pub trait LayoutProbe {
    fn scroll_offset(&self) -> ScrollOffset;

    fn viewport_size(&self) -> ViewportSize;
}

/// Element with host-assigned geometry.
#[derive(Debug, Default)]
pub struct StaticElement {
    rect: Cell<Option<ClientRect>>,
}

impl StaticElement {
    #[must_use]
    pub fn new(rect: ClientRect) -> Self {
        Self {
            rect: Cell::new(Some(rect)),
        }
    }

    /// Move or resize the element.
    pub fn set_rect(&self, rect: ClientRect) {
        self.rect.set(Some(rect));
    }

    /// Simulate the element leaving the document.
    pub fn detach(&self) {
        self.rect.set(None);
    }
}

impl ElementHandle for StaticElement {
    fn client_rect(&self) -> Option<ClientRect> {
        self.rect.get()
    }
}

/// Layout metrics with host-assigned values.
#[derive(Debug)]
pub struct StaticLayout {
    scroll: Cell<ScrollOffset>,
    size: Cell<ViewportSize>,
}

impl StaticLayout {
    #[must_use]
    pub fn new(size: ViewportSize) -> Self {
        Self {
            scroll: Cell::new(ScrollOffset::default()),
            size: Cell::new(size),
        }
    }

    pub fn scroll_to(&self, scroll: ScrollOffset) {
        self.scroll.set(scroll);
    }

    pub fn resize(&self, size: ViewportSize) {
        self.size.set(size);
    }
}

impl Default for StaticLayout {
    fn default() -> Self {
        Self::new(ViewportSize::new(1280, 800))
    }
}

impl LayoutProbe for StaticLayout {
    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll.get()
    }

    fn viewport_size(&self) -> ViewportSize {
        self.size.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts installs and removals of its listener guard.
    #[derive(Default)]
    struct CountingSource {
        installs: Cell<u32>,
        removals: Rc<Cell<u32>>,
    }

    struct Installed(Rc<Cell<u32>>);

    impl Drop for Installed {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl ViewportSource for CountingSource {
        fn listen(&self, _signal: WeakSignal<ViewportChange>) -> Option<Box<dyn Any>> {
            self.installs.set(self.installs.get() + 1);
            Some(Box::new(Installed(Rc::clone(&self.removals))))
        }
    }

    #[test]
    fn listeners_follow_subscribers() {
        let signal = ViewportSignal::new();
        let source = Rc::new(CountingSource::default());
        feed_on_demand(&signal, source.clone());
        assert_eq!(source.installs.get(), 0);

        let first = signal.subscribe(|_| {});
        let second = signal.subscribe(|_| {});
        assert_eq!(source.installs.get(), 1);

        drop(first);
        assert_eq!(source.removals.get(), 0);
        drop(second);
        assert_eq!(source.removals.get(), 1);

        let _again = signal.subscribe(|_| {});
        assert_eq!(source.installs.get(), 2);
    }

    #[test]
    fn dropping_signal_removes_listeners() {
        let signal = ViewportSignal::new();
        let source = Rc::new(CountingSource::default());
        feed_on_demand(&signal, source.clone());
        let sub = signal.subscribe(|_| {});
        drop(signal);
        drop(sub);
        assert_eq!(source.removals.get(), 1);
    }

    #[test]
    fn resized_layout_reports_new_size() {
        let layout = StaticLayout::default();
        layout.resize(ViewportSize::new(320, 480));
        assert_eq!(layout.viewport_size(), ViewportSize::new(320, 480));
    }
}
