// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use parallax_core::trace::{
    RepositionEvent, ResetEvent, ScanEvent, TraceSink, ViewportEvent, VisibilityChange,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Print memoized reposition passes too.
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints reposition passes skipped as unchanged.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_scan(&mut self, e: &ScanEvent) {
        let _ = writeln!(
            self.writer,
            "[scan] positioner={} at {:.1}ms particles={} backgrounds={} skipped={}",
            e.positioner.0, e.timestamp_ms, e.particles, e.backgrounds, e.skipped,
        );
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        let _ = writeln!(
            self.writer,
            "[viewport] positioner={} at {:.1}ms size={}x{} offset=({}, {})",
            e.positioner.0,
            e.timestamp_ms,
            e.viewport.size.width,
            e.viewport.size.height,
            e.viewport.offset.x,
            e.viewport.offset.y,
        );
    }

    fn on_reposition(&mut self, e: &RepositionEvent) {
        if e.memoized {
            if self.verbose {
                let _ = writeln!(
                    self.writer,
                    "[reposition] frame={} positioner={} unchanged",
                    e.frame_index, e.positioner.0,
                );
            }
            return;
        }
        let _ = writeln!(
            self.writer,
            "[reposition] frame={} positioner={} at {:.1}ms scroll=({}, {}) \
             moved={} hidden={} shown={} backgrounds={}",
            e.frame_index,
            e.positioner.0,
            e.timestamp_ms,
            e.scroll.x,
            e.scroll.y,
            e.moved,
            e.hidden,
            e.unhidden,
            e.backgrounds,
        );
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        let _ = writeln!(
            self.writer,
            "[reset] positioner={} at {:.1}ms particles={} backgrounds={}",
            e.positioner.0, e.timestamp_ms, e.particles, e.backgrounds,
        );
    }

    fn on_visibility_changes(&mut self, frame_index: u64, changes: &[VisibilityChange]) {
        if changes.is_empty() {
            return;
        }
        let hidden = changes.iter().filter(|c| c.hidden).count();
        let _ = writeln!(
            self.writer,
            "[visibility] frame={frame_index} hidden={hidden} shown={}",
            changes.len() - hidden,
        );
    }
}
