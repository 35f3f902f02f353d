#![forbid(unsafe_code)]

//! Tour presentation and persistence configuration.
//!
//! Every tunable used by the runtime and the widgets is grouped into one
//! [`TourConfig`] that can be loaded from JSON, or from TOML with the
//! `config` feature.
//!
//! ```toml
//! # wayfinder.toml
//! key_prefix = "acme-tour-"
//!
//! [overlay]
//! color = "rgba(0, 0, 0, 0.75)"
//!
//! [ring]
//! width = 2
//! ```
//!
//! # Defaults
//!
//! `TourConfig::default()` reproduces the stock look: a 60% black dim layer,
//! a 3px near-white focus ring with 6px corners, and the `tour-` key prefix.

use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{DEFAULT_KEY_PREFIX, ProgressStore};
use crate::storage::StorageBackend;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Prefix prepended to the tour id to form the storage key.
    pub key_prefix: String,
    /// Dimmed bands around the highlighted element.
    pub overlay: OverlayStyle,
    /// Focus ring drawn around the highlighted element.
    pub ring: RingStyle,
    /// Stacking of the highlighted element itself.
    pub target: TargetStyle,
    /// Popup placement.
    pub popup: PopupStyle,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            overlay: OverlayStyle::default(),
            ring: RingStyle::default(),
            target: TargetStyle::default(),
            popup: PopupStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// CSS color of the dim layer.
    pub color: String,
    pub z_index: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "rgba(0, 0, 0, 0.6)".to_owned(),
            z_index: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingStyle {
    /// Ring thickness in pixels.
    pub width: u32,
    pub color: String,
    /// Corner radius in pixels.
    pub radius: u32,
    pub z_index: i32,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            width: 3,
            color: "rgba(255, 255, 255, 0.9)".to_owned(),
            radius: 6,
            z_index: 72,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetStyle {
    /// Stacking context wrapping the target and its chrome.
    pub wrapper_z_index: i32,
    /// The target content, lifted above the dim layer.
    pub content_z_index: i32,
}

impl Default for TargetStyle {
    fn default() -> Self {
        Self {
            wrapper_z_index: 70,
            content_z_index: 71,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupStyle {
    /// Place the popup next to the highlighted element when the step has no
    /// explicit anchor.
    pub auto_place: bool,
    /// Gap between the highlighted element and an auto-placed popup.
    pub gap: i32,
    /// Assumed popup size for auto placement.
    pub width: i32,
    pub height: i32,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            auto_place: false,
            gap: 8,
            width: 320,
            height: 160,
        }
    }
}

impl TourConfig {
    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path.as_ref())?)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path.as_ref())?)
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.key_prefix.is_empty() {
            errors.push("key_prefix must not be empty".to_owned());
        }
        if self.overlay.color.trim().is_empty() {
            errors.push("overlay.color must not be empty".to_owned());
        }
        if self.ring.color.trim().is_empty() {
            errors.push("ring.color must not be empty".to_owned());
        }
        if self.target.content_z_index <= self.overlay.z_index {
            errors.push(format!(
                "target.content_z_index ({}) must be above overlay.z_index ({})",
                self.target.content_z_index, self.overlay.z_index
            ));
        }
        if self.popup.gap < 0 {
            errors.push(format!("popup.gap must be >= 0, got {}", self.popup.gap));
        }
        if self.popup.width <= 0 || self.popup.height <= 0 {
            errors.push(format!(
                "popup size must be positive, got {}x{}",
                self.popup.width, self.popup.height
            ));
        }
        errors
    }

    /// Progress store keyed with this config's prefix.
    pub fn progress_store(&self, backend: Rc<dyn StorageBackend>) -> ProgressStore {
        ProgressStore::with_prefix(backend, self.key_prefix.clone())
    }

    /// Like [`TourConfig::validate`], as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_look() {
        let config = TourConfig::default();
        assert_eq!(config.key_prefix, "tour-");
        assert_eq!(config.overlay.color, "rgba(0, 0, 0, 0.6)");
        assert_eq!(config.overlay.z_index, 60);
        assert_eq!(config.ring.width, 3);
        assert_eq!(config.ring.radius, 6);
        assert_eq!(config.ring.z_index, 72);
        assert_eq!(config.target.wrapper_z_index, 70);
        assert_eq!(config.target.content_z_index, 71);
        assert!(!config.popup.auto_place);
    }

    #[test]
    fn default_validates_clean() {
        assert!(TourConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_json_preserves_defaults() {
        let config =
            TourConfig::from_json_str(r#"{"key_prefix":"x-","ring":{"width":1}}"#).unwrap();
        assert_eq!(config.key_prefix, "x-");
        assert_eq!(config.ring.width, 1);
        assert_eq!(config.ring.radius, 6);
        assert_eq!(config.overlay, OverlayStyle::default());
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let mut config = TourConfig::default();
        config.key_prefix.clear();
        config.popup.gap = -1;
        config.target.content_z_index = 10;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(list)) if list.len() == 3
        ));
    }

    #[test]
    fn bad_json_is_a_json_error() {
        assert!(matches!(
            TourConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TourConfig::from_json_file(dir.path().join("none.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
