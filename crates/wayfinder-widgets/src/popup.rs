#![forbid(unsafe_code)]

//! Step popup.
//!
//! A [`TourPopup`] is bound to one step. It renders nothing unless that step
//! is active and the tour is still running. Without a custom body it shows
//! the default panel (title, content, back, and next or finish); with one it
//! only provides the positioned container and the host fills it.
//!
//! # Position
//!
//! Each coordinate resolves independently: an explicit [`TourPopup::at`]
//! value, then the step's own `left`/`top`, then `0`. When auto placement is
//! enabled and neither source names a coordinate, [`TourPopup::view_near`]
//! places the popup beside the highlighted rectangle instead.

use std::rc::Rc;

use wayfinder_core::{PageRect, ScrollOffset, ViewportSize};
use wayfinder_runtime::{PopupStyle, Tour};

use crate::buttons::{ButtonKind, ButtonView, ClickHandler, TourButton};
use crate::placement::{Side, place_beside, visible_area};
use crate::text::{Content, Title};

/// Popup origin in CSS pixels, page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupPosition {
    pub left: f64,
    pub top: f64,
}

impl PopupPosition {
    /// Inline CSS for the container.
    #[must_use]
    pub fn css(&self) -> String {
        format!("top: {}px; left: {}px;", self.top, self.left)
    }
}

/// Default panel contents.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub position: PopupPosition,
    pub title: String,
    pub content: String,
    pub back: ButtonView,
    /// Finish on the last step, next otherwise.
    pub primary: ButtonView,
    /// Set when the position came from auto placement.
    pub side: Option<Side>,
}

/// What the popup renders right now.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupView {
    Hidden,
    Panel(PanelView),
    /// Positioned container for a host-supplied body.
    Container {
        position: PopupPosition,
        side: Option<Side>,
    },
}

impl PopupView {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

#[derive(Default, Clone)]
struct Handlers {
    next: Option<ClickHandler>,
    back: Option<ClickHandler>,
    finish: Option<ClickHandler>,
}

/// Popup bound to one step of a [`Tour`].
#[derive(Clone)]
pub struct TourPopup {
    tour: Tour,
    passed_step: usize,
    left: Option<f64>,
    top: Option<f64>,
    custom_body: bool,
    auto_place: Option<PopupStyle>,
    handlers: Handlers,
}

impl std::fmt::Debug for TourPopup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourPopup")
            .field("passed_step", &self.passed_step)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("custom_body", &self.custom_body)
            .field("auto_place", &self.auto_place.is_some())
            .finish_non_exhaustive()
    }
}

impl TourPopup {
    pub fn new(tour: &Tour, passed_step: usize) -> Self {
        Self {
            tour: tour.clone(),
            passed_step,
            left: None,
            top: None,
            custom_body: false,
            auto_place: None,
            handlers: Handlers::default(),
        }
    }

    /// Pin the popup at explicit coordinates.
    #[must_use]
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// The host renders its own body inside the container.
    #[must_use]
    pub fn custom_body(mut self) -> Self {
        self.custom_body = true;
        self
    }

    /// Place the popup beside the highlight when no anchor is given.
    /// Ignored unless `style.auto_place` is set.
    #[must_use]
    pub fn auto_place(mut self, style: &PopupStyle) -> Self {
        self.auto_place = style.auto_place.then(|| style.clone());
        self
    }

    #[must_use]
    pub fn on_next(mut self, handler: impl Fn() + 'static) -> Self {
        self.handlers.next = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_back(mut self, handler: impl Fn() + 'static) -> Self {
        self.handlers.back = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_finish(mut self, handler: impl Fn() + 'static) -> Self {
        self.handlers.finish = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn passed_step(&self) -> usize {
        self.passed_step
    }

    /// True while the bound step is active and the tour is running.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.tour.is_done() && self.tour.step() == self.passed_step
    }

    /// The panel's button of `kind`, wired to this popup's handler.
    #[must_use]
    pub fn button(&self, kind: ButtonKind) -> TourButton {
        let handler = match kind {
            ButtonKind::Next => self.handlers.next.clone(),
            ButtonKind::Back => self.handlers.back.clone(),
            ButtonKind::Finish => self.handlers.finish.clone(),
        };
        TourButton::new(kind, &self.tour).with_handler(handler)
    }

    /// Kind of the panel's primary button for the active step.
    #[must_use]
    pub fn primary_kind(&self) -> ButtonKind {
        if self.tour.is_last_step() {
            ButtonKind::Finish
        } else {
            ButtonKind::Next
        }
    }

    /// Click a panel button. Returns `false` if the popup is hidden, the
    /// button is not on the panel, or it is disabled.
    pub fn click(&self, kind: ButtonKind) -> bool {
        if !self.is_visible() || self.custom_body {
            return false;
        }
        if kind != ButtonKind::Back && kind != self.primary_kind() {
            return false;
        }
        self.button(kind).click()
    }

    /// Render using explicit or step anchors only.
    #[must_use]
    pub fn view(&self) -> PopupView {
        self.render(self.anchored_position(), None)
    }

    /// Render next to `target`, auto-placing when enabled and unanchored.
    #[must_use]
    pub fn view_near(
        &self,
        target: PageRect,
        scroll: ScrollOffset,
        viewport: ViewportSize,
    ) -> PopupView {
        match (&self.auto_place, self.has_anchor()) {
            (Some(style), false) => {
                let placement = place_beside(
                    target,
                    style.width,
                    style.height,
                    style.gap,
                    visible_area(scroll, viewport),
                );
                let position = PopupPosition {
                    left: f64::from(placement.left),
                    top: f64::from(placement.top),
                };
                self.render(position, Some(placement.side))
            }
            _ => self.view(),
        }
    }

    fn has_anchor(&self) -> bool {
        let step = self.tour.steps().get(self.passed_step);
        let step_left = step.and_then(|s| s.left);
        let step_top = step.and_then(|s| s.top);
        self.left.or(step_left).is_some() || self.top.or(step_top).is_some()
    }

    fn anchored_position(&self) -> PopupPosition {
        let step = self.tour.steps().get(self.passed_step);
        PopupPosition {
            left: self.left.or(step.and_then(|s| s.left)).unwrap_or(0.0),
            top: self.top.or(step.and_then(|s| s.top)).unwrap_or(0.0),
        }
    }

    fn render(&self, position: PopupPosition, side: Option<Side>) -> PopupView {
        if !self.is_visible() {
            return PopupView::Hidden;
        }
        if self.custom_body {
            return PopupView::Container { position, side };
        }
        PopupView::Panel(PanelView {
            position,
            title: Title::new(&self.tour).text().to_owned(),
            content: Content::new(&self.tour).text().to_owned(),
            back: self.button(ButtonKind::Back).view(),
            primary: self.button(self.primary_kind()).view(),
            side,
        })
    }
}
