#![forbid(unsafe_code)]

//! Wayfinder Widgets
//!
//! Framework-neutral view models for the visible parts of a tour. Each
//! widget reads a shared [`wayfinder_runtime::Tour`] and produces plain data
//! (text, button state, positions, CSS declarations) that a host renderer
//! turns into elements.
//!
//! - [`TourPopup`] - per-step popup, default panel or custom container
//! - [`TourButton`] - next / back / finish controls
//! - [`Title`] / [`Content`] - current step text
//! - [`HighlightChrome`] - dim bands, lifted content, focus ring
//! - [`ResumeDialog`] - resume-or-exit prompt

pub mod buttons;
pub mod chrome;
pub mod placement;
pub mod popup;
pub mod resume_dialog;
pub mod text;

pub use buttons::{ButtonKind, ButtonView, ClickHandler, TourButton};
pub use chrome::{BandSide, Declarations, HighlightChrome, Layer, LayerRole};
pub use placement::{Placement, Side, place_beside, visible_area};
pub use popup::{PanelView, PopupPosition, PopupView, TourPopup};
pub use resume_dialog::{ResumeChoice, ResumeDialog, answer};
pub use text::{CONTENT_FALLBACK, Content, TITLE_FALLBACK, Title};
