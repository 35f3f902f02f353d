#![forbid(unsafe_code)]

//! Resume prompt dialog.
//!
//! Presentational side of [`ResumeGuard`]: fixed copy plus the two answers.

use wayfinder_runtime::{Navigator, ResumeGuard};

pub const HEADING: &str = "Tour";
pub const PROMPT: &str = "Do you want to pick up where you left off?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Resume,
    Exit,
}

impl ResumeChoice {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Exit => "exit",
        }
    }
}

/// Render-ready dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDialog {
    pub heading: &'static str,
    pub prompt: &'static str,
    pub choices: [ResumeChoice; 2],
    /// Page the tour would return to.
    pub route: String,
}

impl ResumeDialog {
    /// Dialog for an open guard, `None` once it has been answered.
    #[must_use]
    pub fn from_guard(guard: &ResumeGuard) -> Option<Self> {
        let prompt = guard.prompt()?;
        Some(Self {
            heading: HEADING,
            prompt: PROMPT,
            choices: [ResumeChoice::Resume, ResumeChoice::Exit],
            route: prompt.route.clone(),
        })
    }
}

/// Apply the user's answer. Returns the route navigated to on resume.
pub fn answer(
    guard: &mut ResumeGuard,
    choice: ResumeChoice,
    navigator: &impl Navigator,
) -> Option<String> {
    match choice {
        ResumeChoice::Resume => guard.resume(navigator),
        ResumeChoice::Exit => {
            guard.discard();
            None
        }
    }
}
