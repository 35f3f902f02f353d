#![forbid(unsafe_code)]

//! Browser bindings for Wayfinder.
//!
//! This crate provides [`WebTour`], a `wasm-bindgen`-exported handle that
//! mounts a tour against `localStorage`, measures DOM elements, listens for
//! window resize and capturing scroll, and routes through the History API.
//!
//! The DOM-free part lives in [`tour_core`] and is tested natively.

pub mod tour_core;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WebTour;

pub use tour_core::{HostBindings, HostNavigate, TourCore, WebError};
