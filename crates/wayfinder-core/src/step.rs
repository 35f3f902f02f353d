#![forbid(unsafe_code)]

//! Tour step definitions.

use serde::{Deserialize, Serialize};

/// One stage of a tour.
///
/// Steps are supplied by the embedding application as an ordered sequence;
/// a step's index in that sequence is its identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TourStep {
    pub title: String,
    pub content: String,
    /// Preferred popup x position in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    /// Preferred popup y position in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
}

impl TourStep {
    /// Create a step with no anchor position.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            left: None,
            top: None,
        }
    }

    /// Anchor the popup for this step at `(left, top)`.
    #[must_use]
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.left = Some(left);
        self.top = Some(top);
        self
    }

    /// Parse a step sequence from a JSON array.
    pub fn parse_sequence(json: &str) -> serde_json::Result<Vec<TourStep>> {
        serde_json::from_str(json)
    }
}

/// Index of the final step of a sequence of `step_count` steps.
///
/// An empty sequence has no last step.
#[inline]
pub const fn last_step_index(step_count: usize) -> Option<usize> {
    step_count.checked_sub(1)
}
