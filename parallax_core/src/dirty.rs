// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-tracking channel constants.
//!
//! A reposition pass marks records in [`understory_dirty`] channels instead
//! of writing to the page directly. Each channel is keyed by the record's
//! index in the positioner (particle indices and background indices live in
//! separate channels, so the key spaces never mix).
//!
//! All channels are local-only: a particle moving never implies that another
//! particle moved, so no dependency edges are registered.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`Positioner::reposition`](crate::positioner::Positioner::reposition) call
//! drains all channels and surfaces the results as
//! [`ParallaxChanges`](crate::positioner::ParallaxChanges), which backends
//! [consume](crate::backend::Presenter::apply) to write only what changed.

use understory_dirty::Channel;

/// Particle position changed and must be written.
pub const POSITION: Channel = Channel::new(0);

/// Particle visibility flipped.
pub const VISIBILITY: Channel = Channel::new(1);

/// Background position changed and must be written.
pub const BACKGROUND: Channel = Channel::new(2);
