#![forbid(unsafe_code)]

//! Wayfinder Runtime
//!
//! Stateful half of the tour engine: persistence, change notification, and
//! viewport-driven highlight tracking.
//!
//! # Key Components
//!
//! - [`ProgressStore`] - read-modify-write access to the persisted per-tour record
//! - [`Tour`] - cheap-clone shared handle over step, done flag, and store
//! - [`Highlighter`] - page-rectangle tracking for one step's target element
//! - [`ResumeGuard`] - detects a reload on a page other than the recorded route
//! - [`TourNavigator`] - records the route before every tour-driven navigation
//! - [`TourConfig`] - style tokens and storage prefix
//!
//! # Role in Wayfinder
//! `wayfinder-runtime` sits between the pure data in `wayfinder-core` and
//! the view models in `wayfinder-widgets`. Hosts inject storage, layout,
//! viewport events, and routing through the traits in [`storage`],
//! [`viewport`], and [`navigate`].
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Observers run
//! synchronously in registration order.

pub mod config;
pub mod highlight;
pub mod navigate;
pub mod progress;
pub mod reactive;
pub mod resume;
pub mod storage;
pub mod tour;
pub mod viewport;

pub use config::{ConfigError, OverlayStyle, PopupStyle, RingStyle, TargetStyle, TourConfig};
pub use highlight::Highlighter;
pub use navigate::{Navigator, RecordingNavigator, TourNavigator};
pub use progress::{Absent, DEFAULT_KEY_PREFIX, ProgressStore};
pub use reactive::{Observable, Signal, Subscription, WeakSignal};
pub use resume::{ResumeGuard, ResumePrompt, detect_mismatch};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use tour::Tour;
pub use viewport::{
    ElementHandle, LayoutProbe, StaticElement, StaticLayout, ViewportChange, ViewportSignal,
    ViewportSource, feed_on_demand,
};
