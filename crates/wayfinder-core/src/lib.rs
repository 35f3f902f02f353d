#![forbid(unsafe_code)]

//! Wayfinder Core
//!
//! Plain data shared by every Wayfinder crate:
//!
//! - [`TourStep`] - one stage of a tour (title, content, optional anchor)
//! - [`TourProgress`] - the persisted per-tour record
//! - [`geometry`] - viewport/page rectangles and the four-band highlight cutout
//!
//! # Role in Wayfinder
//! `wayfinder-core` has no behaviour beyond pure computation. Persistence,
//! change notification, and event wiring live in `wayfinder-runtime`;
//! presentational view models live in `wayfinder-widgets`.

pub mod geometry;
pub mod progress;
pub mod step;

pub use geometry::{
    ClientRect, Extent, HighlightFrame, OverlayBand, OverlayBands, PageRect, ScrollOffset,
    ViewportSize, round_half_up,
};
pub use progress::TourProgress;
pub use step::{TourStep, last_step_index};
