#![forbid(unsafe_code)]

//! Current-step title and content.

use wayfinder_runtime::Tour;

/// Shown when the active step index has no step behind it.
pub const TITLE_FALLBACK: &str = "Title";
pub const CONTENT_FALLBACK: &str = "Content";

/// Title of the active step.
#[derive(Debug, Clone)]
pub struct Title {
    tour: Tour,
}

impl Title {
    pub fn new(tour: &Tour) -> Self {
        Self { tour: tour.clone() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.tour
            .current_step()
            .map_or(TITLE_FALLBACK, |step| step.title.as_str())
    }
}

/// Body text of the active step.
#[derive(Debug, Clone)]
pub struct Content {
    tour: Tour,
}

impl Content {
    pub fn new(tour: &Tour) -> Self {
        Self { tour: tour.clone() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.tour
            .current_step()
            .map_or(CONTENT_FALLBACK, |step| step.content.as_str())
    }
}
