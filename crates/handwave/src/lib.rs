//! Hand gesture recognition and gesture-to-action mapping.
//!
//! This crate turns a stream of per-frame hand landmarks (as produced by an external hand pose
//! model, 21 points per hand) into discrete, edge-triggered gesture events, and maps gesture names
//! to parameterized viewer actions using a per-lesson JSON configuration.
//!
//! The two halves are independent and only meet through gesture names:
//!
//! * [`detector::GestureDetector`] consumes [`landmark::HandFrame`]s and notifies listeners with
//!   [`event::GestureEvent`]s.
//! * [`mapper::GestureMapper`] looks up a gesture name in a [`config::GestureConfiguration`] and
//!   produces an [`mapper::ActionDescriptor`] for whatever renders the scene.
//!
//! [`event::GestureEvent::gesture_name`] bridges the two.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to the input image: X points to the right, Y points *down*
//! (so "up" means numerically smaller Y), both spanning `0.0..=1.0`. Z is depth relative to the
//! wrist and is unreliable for most models, which is why planar distances are the default.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: honored by [`init_logger!`] on top of its defaults.

use log::LevelFilter;

pub mod action;
pub mod classify;
pub mod config;
pub mod detector;
pub mod event;
pub mod filter;
pub mod geometry;
pub mod landmark;
pub mod mapper;
pub mod session;
pub mod source;
pub mod timer;

#[cfg(test)]
mod test;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and handwave will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` is applied on top.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
