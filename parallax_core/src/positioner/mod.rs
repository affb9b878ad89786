// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parallax positioner.
//!
//! A [`Positioner`] tracks two kinds of records:
//!
//! - [`Particle`]s: elements whose box is moved with `left`/`top` or a
//!   transform.
//! - [`Background`]s: elements whose `background-position` is moved.
//!
//! # Lifecycle
//!
//! ```text
//!   Uninitialized ──scan/refresh──► Scanned ──reposition*──► Scanned
//!                                      │
//!                                    reset
//!                                      ▼
//!                                    Reset ──scan/refresh──► Scanned
//! ```
//!
//! [`scan`](Positioner::scan) records baseline geometry for every tagged
//! element that no other positioner owns. [`reposition`](Positioner::reposition)
//! recomputes positions from the scroll offset and reports what changed;
//! it is memoized on scroll offset and viewport, so repeated calls with the
//! same inputs report nothing. [`reset`](Positioner::reset) hands the records
//! back in a [`ResetSnapshot`] so a presenter can restore the page.

mod record;
mod reposition;
mod scan;

pub use record::{Axes, Background, BackgroundAxis, Particle};

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::backend::Presenter;
use crate::claims::{ClaimRegistry, PositionerId};
use crate::config::ParallaxConfig;
use crate::layout::{LayoutProvider, Viewport};

/// Where a positioner is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionerState {
    /// Created, nothing scanned yet.
    Uninitialized,
    /// Records are live and repositioned on demand.
    Scanned,
    /// Records were handed back; the page is restored.
    Reset,
}

/// The set of changes produced by a single
/// [`Positioner::reposition`] call.
///
/// Each list holds indices into [`Positioner::particles`] or
/// [`Positioner::backgrounds`]. Backends use these to write only what
/// changed.
#[derive(Clone, Debug, Default)]
pub struct ParallaxChanges {
    /// Visible particles whose position changed.
    pub moved: Vec<u32>,
    /// Particles that transitioned from visible to hidden.
    pub hidden: Vec<u32>,
    /// Particles that transitioned from hidden to visible.
    pub unhidden: Vec<u32>,
    /// Backgrounds whose position changed.
    pub backgrounds: Vec<u32>,
    /// Whether the pass was skipped because scroll and viewport were
    /// unchanged.
    pub memoized: bool,
}

impl ParallaxChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.moved.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.backgrounds.clear();
        self.memoized = false;
    }

    /// Returns whether nothing needs to be written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
            && self.hidden.is_empty()
            && self.unhidden.is_empty()
            && self.backgrounds.is_empty()
    }
}

/// Records handed back by [`Positioner::reset`].
#[derive(Clone, Debug, Default)]
pub struct ResetSnapshot {
    /// Particles that were tracked, with their original inline styles.
    pub particles: Vec<Particle>,
    /// Backgrounds that were tracked, with their original positions.
    pub backgrounds: Vec<Background>,
}

/// Counts reported by [`Positioner::scan`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Particles recorded.
    pub particles: u32,
    /// Backgrounds recorded.
    pub backgrounds: u32,
    /// Tagged elements skipped because another positioner owns them.
    pub skipped: u32,
}

/// Memo key: a reposition pass with the same key changes nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PassKey {
    scroll: Point,
    viewport: Viewport,
}

/// Scroll-driven parallax positioner for one scrolling element.
#[derive(Debug)]
pub struct Positioner {
    id: PositionerId,
    config: ParallaxConfig,
    state: PositionerState,

    // -- Records --
    pub(crate) particles: Vec<Particle>,
    pub(crate) backgrounds: Vec<Background>,

    // -- Cached inputs --
    pub(crate) viewport: Viewport,
    pub(crate) offsets: Vec2,
    last_pass: Option<PassKey>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
}

impl Positioner {
    /// Creates a positioner and registers its identity in `claims`.
    #[must_use]
    pub fn new(config: ParallaxConfig, claims: &mut ClaimRegistry) -> Self {
        let offsets = Vec2::new(
            config.horizontal_offset.resolve(),
            config.vertical_offset.resolve(),
        );
        Self {
            id: claims.register(),
            config,
            state: PositionerState::Uninitialized,
            particles: Vec::new(),
            backgrounds: Vec::new(),
            viewport: Viewport::default(),
            offsets,
            last_pass: None,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// Returns this positioner's identity.
    #[must_use]
    pub fn id(&self) -> PositionerId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ParallaxConfig {
        &self.config
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> PositionerState {
        self.state
    }

    /// Returns the enabled axes.
    #[must_use]
    pub fn axes(&self) -> Axes {
        Axes {
            horizontal: self.config.horizontal_scrolling,
            vertical: self.config.vertical_scrolling,
        }
    }

    /// Returns the tracked particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Returns the tracked backgrounds.
    #[must_use]
    pub fn backgrounds(&self) -> &[Background] {
        &self.backgrounds
    }

    /// Returns the particle at raw index `idx` (as found in
    /// [`ParallaxChanges`]).
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn particle_at(&self, idx: u32) -> &Particle {
        assert!(
            (idx as usize) < self.particles.len(),
            "particle index {idx} out of range (len {})",
            self.particles.len()
        );
        &self.particles[idx as usize]
    }

    /// Returns the background at raw index `idx` (as found in
    /// [`ParallaxChanges`]).
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn background_at(&self, idx: u32) -> &Background {
        assert!(
            (idx as usize) < self.backgrounds.len(),
            "background index {idx} out of range (len {})",
            self.backgrounds.len()
        );
        &self.backgrounds[idx as usize]
    }

    /// Returns the cached viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the resolved positioner-wide offsets.
    #[must_use]
    pub fn offsets(&self) -> Vec2 {
        self.offsets
    }

    /// Replaces the cached viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Reads and caches the viewport from `layout`.
    pub fn detect_viewport<L: LayoutProvider + ?Sized>(&mut self, layout: &L) -> Viewport {
        self.viewport = layout.viewport();
        self.viewport
    }

    /// Evaluates both configured offset sources.
    pub fn resolve_offsets(&mut self) -> Vec2 {
        self.offsets = Vec2::new(
            self.config.horizontal_offset.resolve(),
            self.config.vertical_offset.resolve(),
        );
        self.offsets
    }

    /// Re-evaluates only the dynamic offset sources.
    ///
    /// The new values apply to records created by the next scan.
    pub fn refresh_dynamic_offsets(&mut self) {
        if self.config.horizontal_offset.is_dynamic() {
            self.offsets.x = self.config.horizontal_offset.resolve();
        }
        if self.config.vertical_offset.is_dynamic() {
            self.offsets.y = self.config.vertical_offset.resolve();
        }
    }

    /// Forgets the memoized inputs so the next reposition runs in full.
    pub fn invalidate(&mut self) {
        self.last_pass = None;
    }

    /// Releases every claim and hands the records back for restoration.
    ///
    /// The positioner keeps its configuration and identity and can be
    /// scanned again.
    pub fn reset(&mut self, claims: &mut ClaimRegistry) -> ResetSnapshot {
        claims.release_all(self.id);
        self.state = PositionerState::Reset;
        self.last_pass = None;
        self.dirty = DirtyTracker::with_cycle_handling(CycleHandling::Error);
        ResetSnapshot {
            particles: core::mem::take(&mut self.particles),
            backgrounds: core::mem::take(&mut self.backgrounds),
        }
    }

    /// Rescans the page from a clean slate.
    ///
    /// Also brings a [`Reset`](PositionerState::Reset) positioner back into
    /// service, claiming and tracking the page's elements again.
    ///
    /// Restores any live records through `presenter`, scrolls to the origin
    /// so geometry is measured unscrolled, re-detects the viewport,
    /// re-evaluates offsets, scans, and scrolls back.
    pub fn refresh<L, P>(
        &mut self,
        layout: &mut L,
        presenter: &mut P,
        claims: &mut ClaimRegistry,
    ) -> ScanSummary
    where
        L: LayoutProvider + ?Sized,
        P: Presenter + ?Sized,
    {
        let saved_scroll = layout.scroll();
        if self.state == PositionerState::Scanned {
            let snapshot = self.reset(claims);
            presenter.restore(&snapshot);
        }

        layout.set_scroll(Point::ZERO);
        self.detect_viewport(layout);
        self.resolve_offsets();
        let summary = self.scan(layout, claims);
        layout.set_scroll(saved_scroll);
        summary
    }

    /// Handles a viewport resize.
    ///
    /// Re-detects the viewport and dynamic offsets; in responsive mode the
    /// page is also rescanned, and the scan summary is returned. Records keep
    /// the offsets they were scanned with until that rescan.
    ///
    /// Does nothing after [`reset`](Self::reset): a reset positioner only
    /// comes back through an explicit [`refresh`](Self::refresh).
    pub fn on_resize<L, P>(
        &mut self,
        layout: &mut L,
        presenter: &mut P,
        claims: &mut ClaimRegistry,
    ) -> Option<ScanSummary>
    where
        L: LayoutProvider + ?Sized,
        P: Presenter + ?Sized,
    {
        if self.state == PositionerState::Reset {
            return None;
        }
        self.detect_viewport(layout);
        self.refresh_dynamic_offsets();
        self.config
            .responsive
            .then(|| self.refresh(layout, presenter, claims))
    }

    pub(crate) fn set_state(&mut self, state: PositionerState) {
        self.state = state;
    }

    pub(crate) fn memo_matches(&mut self, scroll: Point) -> bool {
        let key = PassKey {
            scroll,
            viewport: self.viewport,
        };
        if self.last_pass == Some(key) {
            true
        } else {
            self.last_pass = Some(key);
            false
        }
    }
}
