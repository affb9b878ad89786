// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the positioner lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! drivers call after each positioner operation. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events carry timestamps in milliseconds as delivered by the tick source
//! (`performance.now()` on the web), so they can be correlated with browser
//! performance timelines.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`VisibilityChange`] events plus
//!   the corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use kurbo::Point;

use crate::claims::PositionerId;
#[cfg(feature = "trace-rich")]
use crate::layout::ElementId;
use crate::layout::Viewport;
use crate::positioner::{ParallaxChanges, ResetSnapshot, ScanSummary};
#[cfg(feature = "trace-rich")]
use crate::positioner::Positioner;
use crate::tick::FrameStamp;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanEvent {
    /// Which positioner scanned.
    pub positioner: PositionerId,
    /// When the scan finished.
    pub timestamp_ms: f64,
    /// Particles recorded.
    pub particles: u32,
    /// Backgrounds recorded.
    pub backgrounds: u32,
    /// Tagged elements owned by another positioner.
    pub skipped: u32,
}

impl ScanEvent {
    /// Creates a `ScanEvent` from a [`ScanSummary`].
    #[must_use]
    pub fn new(positioner: PositionerId, timestamp_ms: f64, summary: &ScanSummary) -> Self {
        Self {
            positioner,
            timestamp_ms,
            particles: summary.particles,
            backgrounds: summary.backgrounds,
            skipped: summary.skipped,
        }
    }
}

/// Emitted when the viewport is (re-)detected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportEvent {
    /// Which positioner detected it.
    pub positioner: PositionerId,
    /// When it was detected.
    pub timestamp_ms: f64,
    /// The detected viewport.
    pub viewport: Viewport,
}

/// Emitted after each reposition pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepositionEvent {
    /// Which positioner repositioned.
    pub positioner: PositionerId,
    /// Frame counter of the tick that drove the pass.
    pub frame_index: u64,
    /// Frame timestamp.
    pub timestamp_ms: f64,
    /// Scroll offset the pass was computed for.
    pub scroll: Point,
    /// Number of particles moved.
    pub moved: u32,
    /// Number of particles hidden.
    pub hidden: u32,
    /// Number of particles shown again.
    pub unhidden: u32,
    /// Number of backgrounds moved.
    pub backgrounds: u32,
    /// Whether the pass was skipped as unchanged.
    pub memoized: bool,
}

impl RepositionEvent {
    /// Creates a `RepositionEvent` from the frame and the pass result.
    #[must_use]
    pub fn new(
        positioner: PositionerId,
        stamp: &FrameStamp,
        scroll: Point,
        changes: &ParallaxChanges,
    ) -> Self {
        Self {
            positioner,
            frame_index: stamp.frame_index,
            timestamp_ms: stamp.timestamp_ms,
            scroll,
            moved: count(changes.moved.len()),
            hidden: count(changes.hidden.len()),
            unhidden: count(changes.unhidden.len()),
            backgrounds: count(changes.backgrounds.len()),
            memoized: changes.memoized,
        }
    }
}

/// Emitted after a reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResetEvent {
    /// Which positioner reset.
    pub positioner: PositionerId,
    /// When it reset.
    pub timestamp_ms: f64,
    /// Particles handed back for restoration.
    pub particles: u32,
    /// Backgrounds handed back for restoration.
    pub backgrounds: u32,
}

impl ResetEvent {
    /// Creates a `ResetEvent` from a [`ResetSnapshot`].
    #[must_use]
    pub fn new(positioner: PositionerId, timestamp_ms: f64, snapshot: &ResetSnapshot) -> Self {
        Self {
            positioner,
            timestamp_ms,
            particles: count(snapshot.particles.len()),
            backgrounds: count(snapshot.backgrounds.len()),
        }
    }
}

/// A per-particle visibility flip.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Index of the particle in its positioner.
    pub particle_index: u32,
    /// The particle's element.
    pub element: ElementId,
    /// `true` if the particle was hidden, `false` if shown.
    pub hidden: bool,
}

#[cfg(feature = "trace-rich")]
impl VisibilityChange {
    /// Collects the visibility flips of one reposition pass.
    #[must_use]
    pub fn collect(positioner: &Positioner, changes: &ParallaxChanges) -> Vec<Self> {
        let hidden = changes.hidden.iter().map(|&idx| (idx, true));
        let shown = changes.unhidden.iter().map(|&idx| (idx, false));
        hidden
            .chain(shown)
            .map(|(idx, hidden)| Self {
                particle_index: idx,
                element: positioner.particle_at(idx).element,
                hidden,
            })
            .collect()
    }
}

/// Saturates at `u32::MAX`.
fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from positioner drivers.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a scan.
    fn on_scan(&mut self, e: &ScanEvent) {
        _ = e;
    }

    /// Called when the viewport is detected.
    fn on_viewport(&mut self, e: &ViewportEvent) {
        _ = e;
    }

    /// Called after a reposition pass.
    fn on_reposition(&mut self, e: &RepositionEvent) {
        _ = e;
    }

    /// Called after a reset.
    fn on_reset(&mut self, e: &ResetEvent) {
        _ = e;
    }

    /// Called with per-pass visibility flips (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_visibility_changes(&mut self, frame_index: u64, changes: &[VisibilityChange]) {
        _ = (frame_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ScanEvent`].
    #[inline]
    pub fn scan(&mut self, e: &ScanEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scan(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewportEvent`].
    #[inline]
    pub fn viewport(&mut self, e: &ViewportEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_viewport(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RepositionEvent`].
    #[inline]
    pub fn reposition(&mut self, e: &RepositionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reposition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResetEvent`].
    #[inline]
    pub fn reset(&mut self, e: &ResetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits visibility flips (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn visibility_changes(&mut self, frame_index: u64, changes: &[VisibilityChange]) {
        if let Some(s) = &mut self.sink {
            s.on_visibility_changes(frame_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_saturate_at_u32_max() {
        assert_eq!(count(0), 0);
        assert_eq!(count(7), 7);
        assert_eq!(count(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(count(usize::MAX), u32::MAX);
    }

    #[test]
    fn reposition_event_counts_changes() {
        let changes = ParallaxChanges {
            moved: alloc::vec![0, 1, 2],
            hidden: alloc::vec![3],
            unhidden: alloc::vec![],
            backgrounds: alloc::vec![0],
            memoized: false,
        };
        let stamp = FrameStamp {
            frame_index: 9,
            timestamp_ms: 160.5,
        };
        let e = RepositionEvent::new(PositionerId(1), &stamp, Point::new(0.0, 40.0), &changes);
        assert_eq!(e.frame_index, 9);
        assert_eq!(e.moved, 3);
        assert_eq!(e.hidden, 1);
        assert_eq!(e.unhidden, 0);
        assert_eq!(e.backgrounds, 1);
        assert_eq!(e.timestamp_ms, 160.5);
    }

    #[test]
    fn scan_event_from_summary() {
        let summary = ScanSummary {
            particles: 4,
            backgrounds: 2,
            skipped: 1,
        };
        let e = ScanEvent::new(PositionerId(0), 12.0, &summary);
        assert_eq!((e.particles, e.backgrounds, e.skipped), (4, 2, 1));
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_scan(&ScanEvent::new(PositionerId(0), 0.0, &ScanSummary::default()));
        sink.on_reset(&ResetEvent::new(PositionerId(0), 0.0, &ResetSnapshot::default()));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.scan(&ScanEvent::new(PositionerId(0), 0.0, &ScanSummary::default()));
        tracer.viewport(&ViewportEvent {
            positioner: PositionerId(0),
            timestamp_ms: 0.0,
            viewport: Viewport::new(800.0, 600.0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            scans: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_scan(&mut self, e: &ScanEvent) {
                self.scans.push(e.particles);
            }
        }

        let mut sink = RecordingSink { scans: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        let summary = ScanSummary {
            particles: 3,
            ..ScanSummary::default()
        };
        tracer.scan(&ScanEvent::new(PositionerId(0), 1.0, &summary));
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.scans, &[3]);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn visibility_changes_collect_both_directions() {
        use crate::claims::ClaimRegistry;
        use crate::config::ParallaxConfig;
        use crate::fake::{FakeElement, FakePage};

        let mut page = FakePage::new(800.0, 600.0);
        let near = page.add(FakeElement::particle(1.0).at(Point::new(0.0, 100.0)));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut layout = page.layout();
        p.detect_viewport(&layout);
        p.scan(&mut layout, &mut claims);

        let changes = p.reposition(Point::new(0.0, 1000.0));
        let flips = VisibilityChange::collect(&p, &changes);
        assert_eq!(
            flips,
            [VisibilityChange {
                particle_index: 0,
                element: near,
                hidden: true
            }]
        );
    }
}
