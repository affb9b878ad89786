// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for parallax.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomContext`]: element table and claim registry shared by every
//!   positioner on one page
//! - [`DomLayout`]: [`LayoutProvider`] over the DOM and `data-parallax-*`
//!   attributes
//! - [`DomPresenter`]: writes positions, visibility and background positions
//! - [`RafLoop`] / [`FrameRequest`]: `requestAnimationFrame` tick sources
//! - [`ListenerHandle`]: event listener removed on drop
//! - [`ParallaxDriver`]: wires scroll, resize and load events to a positioner
//!
//! # Markup
//!
//! ```html
//! <div data-parallax-offset-parent="true" data-parallax-vertical-offset="40">
//!   <img src="cloud.png" data-parallax-ratio="0.5">
//! </div>
//! <section style="background-image: url(sky.jpg)"
//!          data-parallax-background-ratio="0.2"></section>
//! ```

#![no_std]

extern crate alloc;

mod driver;
mod elements;
mod layout;
mod listener;
mod presenter;
mod raf;

pub use driver::ParallaxDriver;
pub use elements::DomContext;
pub use layout::{DomLayout, ScrollTarget};
pub use listener::ListenerHandle;
pub use parallax_core::backend::Presenter;
pub use parallax_core::layout::LayoutProvider;
pub use presenter::{DisplayToggle, DomPresenter, Visibility, VisibilityFns};
pub use raf::{FrameRequest, RafLoop};

/// Returns the current time in milliseconds from `performance.now()`.
///
/// This is the clock `requestAnimationFrame` timestamps are measured on, so
/// events stamped with it line up with frame stamps.
#[must_use]
pub fn now() -> f64 {
    raf::performance_now()
}
