#![forbid(unsafe_code)]

//! Resume-mismatch detection.
//!
//! When a tour is reloaded on a page other than the one it last navigated
//! to, the user is offered a choice: go back to where the tour left off, or
//! stay put. The guard only reads progress; route recording belongs to
//! [`crate::navigate::TourNavigator`].

use tracing::info;

use crate::navigate::Navigator;
use crate::progress::ProgressStore;

/// A detected mismatch between the persisted route and the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePrompt {
    pub route: String,
    pub current_path: String,
}

/// Decide whether to prompt for resume.
///
/// Fires only when a record exists, is not done, has a non-empty route, and
/// that route differs from `current_path`.
#[must_use]
pub fn detect_mismatch(store: &ProgressStore, id: &str, current_path: &str) -> Option<ResumePrompt> {
    let progress = store.load(id).ok()?;
    if progress.done_tour {
        return None;
    }
    let route = progress.route.filter(|route| !route.is_empty())?;
    if route == current_path {
        return None;
    }
    Some(ResumePrompt {
        route,
        current_path: current_path.to_owned(),
    })
}

/// Mount-time guard holding an open prompt until the user answers it.
#[derive(Debug, Clone, Default)]
pub struct ResumeGuard {
    prompt: Option<ResumePrompt>,
}

impl ResumeGuard {
    /// Run the mismatch check for tour `id` on `current_path`.
    pub fn on_mount(store: &ProgressStore, id: &str, current_path: &str) -> Self {
        let prompt = detect_mismatch(store, id, current_path);
        if let Some(prompt) = &prompt {
            info!(
                tour_id = id,
                route = %prompt.route,
                current_path,
                "tour resume mismatch"
            );
        }
        Self { prompt }
    }

    /// True while the prompt awaits an answer.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.prompt.is_some()
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&ResumePrompt> {
        self.prompt.as_ref()
    }

    /// Close the prompt and navigate to the persisted route.
    ///
    /// Pass the tour's [`crate::navigate::TourNavigator`] so the route is
    /// recorded again. Returns the route navigated to, if the prompt was
    /// open.
    pub fn resume(&mut self, navigator: &impl Navigator) -> Option<String> {
        let prompt = self.prompt.take()?;
        navigator.navigate(&prompt.route);
        Some(prompt.route)
    }

    /// Close the prompt and stay on the current page.
    pub fn discard(&mut self) {
        self.prompt = None;
    }
}
