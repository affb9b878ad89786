// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-rate limiting for scroll-driven updates.
//!
//! Browsers can emit many scroll events per displayed frame. Repositioning
//! on each one wastes work that is never shown, so scroll handlers go
//! through a [`TickGate`]: the first request in a frame schedules an
//! animation frame, later requests are absorbed until that frame runs.

/// A frame opportunity delivered by a tick source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStamp {
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Frame timestamp in milliseconds (`DOMHighResTimeStamp` on the web).
    pub timestamp_ms: f64,
}

/// Coalesces update requests into at most one pending frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickGate {
    ticking: bool,
    requested: u64,
    coalesced: u64,
}

impl TickGate {
    /// Creates an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticking: false,
            requested: 0,
            coalesced: 0,
        }
    }

    /// Requests an update.
    ///
    /// Returns `true` if the caller must schedule a frame, `false` if one is
    /// already pending.
    pub fn request(&mut self) -> bool {
        self.requested += 1;
        if self.ticking {
            self.coalesced += 1;
            false
        } else {
            self.ticking = true;
            true
        }
    }

    /// Marks the pending frame as run, re-opening the gate.
    pub fn complete(&mut self) {
        self.ticking = false;
    }

    /// Returns whether a frame is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.ticking
    }

    /// Returns the total number of requests seen.
    #[must_use]
    pub const fn requested(&self) -> u64 {
        self.requested
    }

    /// Returns how many requests were absorbed by an already pending frame.
    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
