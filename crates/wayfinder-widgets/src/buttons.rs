#![forbid(unsafe_code)]

//! Next / back / finish controls.
//!
//! Each button reads the shared [`Tour`] to decide whether it is enabled and,
//! when clicked, runs the host's handler first and then the tour operation.
//!
//! | Kind     | Disabled when          | Click                 |
//! |----------|------------------------|-----------------------|
//! | `Next`   | on the last step       | [`Tour::next`]        |
//! | `Back`   | on the first step      | [`Tour::back`]        |
//! | `Finish` | never                  | [`Tour::finish`]      |

use std::rc::Rc;

use wayfinder_runtime::Tour;

/// Host callback run before the tour operation.
pub type ClickHandler = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Next,
    Back,
    Finish,
}

impl ButtonKind {
    /// Default label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::Finish => "finish",
        }
    }
}

/// Render-ready snapshot of a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub kind: ButtonKind,
    pub label: String,
    pub disabled: bool,
}

/// A tour control bound to one [`Tour`].
#[derive(Clone)]
pub struct TourButton {
    kind: ButtonKind,
    tour: Tour,
    label: String,
    handler: Option<ClickHandler>,
}

impl std::fmt::Debug for TourButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TourButton")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl TourButton {
    pub fn new(kind: ButtonKind, tour: &Tour) -> Self {
        Self {
            kind,
            tour: tour.clone(),
            label: kind.label().to_owned(),
            handler: None,
        }
    }

    pub fn next(tour: &Tour) -> Self {
        Self::new(ButtonKind::Next, tour)
    }

    pub fn back(tour: &Tour) -> Self {
        Self::new(ButtonKind::Back, tour)
    }

    pub fn finish(tour: &Tour) -> Self {
        Self::new(ButtonKind::Finish, tour)
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn on_click(mut self, handler: impl Fn() + 'static) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub(crate) fn with_handler(mut self, handler: Option<ClickHandler>) -> Self {
        self.handler = handler;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        match self.kind {
            ButtonKind::Next => !self.tour.can_go_next(),
            ButtonKind::Back => !self.tour.can_go_back(),
            ButtonKind::Finish => false,
        }
    }

    #[must_use]
    pub fn view(&self) -> ButtonView {
        ButtonView {
            kind: self.kind,
            label: self.label.clone(),
            disabled: self.is_disabled(),
        }
    }

    /// Activate the button. Returns `false` without side effects when the
    /// button is disabled.
    pub fn click(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        if let Some(handler) = &self.handler {
            handler();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            tour_id = self.tour.id(),
            button = self.kind.label(),
            step = self.tour.step(),
            "tour button clicked"
        );
        match self.kind {
            ButtonKind::Next => {
                self.tour.next();
            }
            ButtonKind::Back => {
                self.tour.back();
            }
            ButtonKind::Finish => self.tour.finish(),
        }
        true
    }
}
