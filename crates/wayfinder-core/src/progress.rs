#![forbid(unsafe_code)]

//! Persisted tour progress record.
//!
//! # Format
//!
//! ```json
//! { "step": 2, "doneTour": false, "route": "/settings" }
//! ```
//!
//! Fields this crate does not know about are carried in
//! [`TourProgress::extra`] and written back unchanged, so records shared
//! with other writers survive a read-modify-write cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-tour progress, one record per tour id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TourProgress {
    /// Index of the active step.
    #[serde(default)]
    pub step: usize,
    /// Set once the tour has been finished.
    #[serde(rename = "doneTour", default)]
    pub done_tour: bool,
    /// Last page path visited through tour-aware navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Unrecognised fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TourProgress {
    /// A fresh record positioned at `step`.
    #[must_use]
    pub fn at_step(step: usize) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    /// Parse a record. Anything other than a JSON object with well-typed
    /// known fields is rejected.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to the compact storage form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
