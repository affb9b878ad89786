// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! A backend crate provides the following pieces:
//!
//! - **Layout provider**: Implements
//!   [`LayoutProvider`](crate::layout::LayoutProvider) to read element
//!   geometry, viewport size, and scroll offset from the page.
//!
//! - **Tick source**: Delivers [`FrameStamp`](crate::tick::FrameStamp)s on
//!   animation frames, coalescing scroll bursts with a
//!   [`TickGate`](crate::tick::TickGate). This is backend-specific and not
//!   abstracted by a trait because event binding differs fundamentally across
//!   platforms.
//!
//! - **Presenter**: Implements the [`Presenter`] trait to write changes back
//!   to the page.
//!
//! # Crate boundaries
//!
//! `parallax_core` owns the data model, scanning, repositioning, and this
//! contract module. Backend crates depend on `parallax_core` and provide
//! platform glue. Application code depends on both and wires them together.

use crate::positioner::{ParallaxChanges, Positioner, ResetSnapshot};

/// Writes positioner results to a platform-native page.
///
/// The DOM presenter and in-memory test pages both implement this trait.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(stamp: FrameStamp) {
///     gate.complete();
///     let scroll = layout.scroll();
///
///     // Recompute particle and background positions (memoized).
///     let changes = positioner.reposition(scroll);
///
///     // Present: write only what changed.
///     presenter.apply(&positioner, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`ParallaxChanges`], reading record state from
    /// `positioner` as needed.
    fn apply(&mut self, positioner: &Positioner, changes: &ParallaxChanges);

    /// Restores the original inline styles of every record in `snapshot` and
    /// makes hidden elements visible again.
    fn restore(&mut self, snapshot: &ResetSnapshot);
}
