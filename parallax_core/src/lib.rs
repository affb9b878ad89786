// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data model and scroll-driven repositioning for parallax effects.
//!
//! `parallax_core` owns everything about a parallax page that does not touch
//! the DOM directly. It is `no_std` compatible (with `alloc`): page geometry
//! arrives through the [`LayoutProvider`](layout::LayoutProvider) trait and
//! results leave through the [`Presenter`](backend::Presenter) trait, so the
//! same positioner runs against a browser or an in-memory test page.
//!
//! # Architecture
//!
//! The crate is organized around a frame loop driven by scroll events:
//!
//! ```text
//!   scroll event ──► TickGate::request() ──► animation frame (once)
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   LayoutProvider::scroll() ──► Positioner::reposition() ──► ParallaxChanges
//!                                                                  │
//!                 ┌────────────────────────────────────────────────┘
//!                 ▼
//!   Presenter::apply()
//! ```
//!
//! **[`positioner`]**: Scans tagged elements into particle and background
//! records, repositions them from the scroll offset, and resets them.
//!
//! **[`layout`]**: The [`LayoutProvider`](layout::LayoutProvider) contract
//! and the typed per-element [`ElementDescriptor`](layout::ElementDescriptor).
//!
//! **[`claims`]**: Per-page ownership registry guaranteeing that an element
//! is tracked by at most one positioner.
//!
//! **[`config`]**: Per-positioner configuration.
//!
//! **[`dirty`]**: Change channels drained into
//! [`ParallaxChanges`](positioner::ParallaxChanges) after each reposition.
//!
//! **[`backend`]**: The [`Presenter`](backend::Presenter) trait that
//! platform backends implement to write changes back to the page.
//!
//! **[`tick`]**: Frame-rate limiter and frame stamps.
//!
//! **[`css`]**: Lenient numeric parsing of CSS and attribute values.
//!
//! **[`easing`]**: Penner easing table.
//!
//! **[`waypoint`]**: Scroll-offset crossing detector.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumentation, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-particle
//!   visibility events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod claims;
pub mod config;
pub mod css;
pub mod dirty;
pub mod easing;
pub mod layout;
pub mod positioner;
pub mod tick;
pub mod trace;
pub mod waypoint;

#[cfg(test)]
mod fake;
