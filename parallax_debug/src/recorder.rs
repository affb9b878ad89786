// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. Floating-point fields are
//! stored as their IEEE-754 bit patterns. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_visibility_changes`](TraceSink::on_visibility_changes))
//! store only the hidden and shown counts.

use kurbo::{Point, Size};
use parallax_core::claims::PositionerId;
use parallax_core::layout::Viewport;
use parallax_core::trace::{
    RepositionEvent, ResetEvent, ScanEvent, TraceSink, ViewportEvent, VisibilityChange,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SCAN: u8 = 1;
const TAG_VIEWPORT: u8 = 2;
const TAG_REPOSITION: u8 = 3;
const TAG_RESET: u8 = 4;
const TAG_VISIBILITY_COUNTS: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }
}

impl TraceSink for RecorderSink {
    fn on_scan(&mut self, e: &ScanEvent) {
        self.write_u8(TAG_SCAN);
        self.write_u32(e.positioner.0);
        self.write_f64(e.timestamp_ms);
        self.write_u32(e.particles);
        self.write_u32(e.backgrounds);
        self.write_u32(e.skipped);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        self.write_u8(TAG_VIEWPORT);
        self.write_u32(e.positioner.0);
        self.write_f64(e.timestamp_ms);
        self.write_f64(e.viewport.size.width);
        self.write_f64(e.viewport.size.height);
        self.write_point(e.viewport.offset);
    }

    fn on_reposition(&mut self, e: &RepositionEvent) {
        self.write_u8(TAG_REPOSITION);
        self.write_u32(e.positioner.0);
        self.write_u64(e.frame_index);
        self.write_f64(e.timestamp_ms);
        self.write_point(e.scroll);
        self.write_u32(e.moved);
        self.write_u32(e.hidden);
        self.write_u32(e.unhidden);
        self.write_u32(e.backgrounds);
        self.write_u8(u8::from(e.memoized));
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        self.write_u8(TAG_RESET);
        self.write_u32(e.positioner.0);
        self.write_f64(e.timestamp_ms);
        self.write_u32(e.particles);
        self.write_u32(e.backgrounds);
    }

    fn on_visibility_changes(&mut self, frame_index: u64, changes: &[VisibilityChange]) {
        let hidden = changes.iter().filter(|c| c.hidden).count();
        self.write_u8(TAG_VISIBILITY_COUNTS);
        self.write_u64(frame_index);
        self.write_u32(capped(hidden));
        self.write_u32(capped(changes.len() - hidden));
    }
}

/// Saturates at `u32::MAX`.
fn capped(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`ScanEvent`].
    Scan(ScanEvent),
    /// A [`ViewportEvent`].
    Viewport(ViewportEvent),
    /// A [`RepositionEvent`].
    Reposition(RepositionEvent),
    /// A [`ResetEvent`].
    Reset(ResetEvent),
    /// Visibility-flip counts for a frame.
    VisibilityCounts {
        /// Frame counter.
        frame_index: u64,
        /// Particles hidden in the frame.
        hidden: u32,
        /// Particles shown again in the frame.
        shown: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_point(&mut self) -> Option<Point> {
        Some(Point::new(self.read_f64()?, self.read_f64()?))
    }

    fn decode_scan(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Scan(ScanEvent {
            positioner: PositionerId(self.read_u32()?),
            timestamp_ms: self.read_f64()?,
            particles: self.read_u32()?,
            backgrounds: self.read_u32()?,
            skipped: self.read_u32()?,
        }))
    }

    fn decode_viewport(&mut self) -> Option<RecordedEvent> {
        let positioner = PositionerId(self.read_u32()?);
        let timestamp_ms = self.read_f64()?;
        let size = Size::new(self.read_f64()?, self.read_f64()?);
        let offset = self.read_point()?;
        Some(RecordedEvent::Viewport(ViewportEvent {
            positioner,
            timestamp_ms,
            viewport: Viewport { size, offset },
        }))
    }

    fn decode_reposition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reposition(RepositionEvent {
            positioner: PositionerId(self.read_u32()?),
            frame_index: self.read_u64()?,
            timestamp_ms: self.read_f64()?,
            scroll: self.read_point()?,
            moved: self.read_u32()?,
            hidden: self.read_u32()?,
            unhidden: self.read_u32()?,
            backgrounds: self.read_u32()?,
            memoized: self.read_u8()? != 0,
        }))
    }

    fn decode_reset(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reset(ResetEvent {
            positioner: PositionerId(self.read_u32()?),
            timestamp_ms: self.read_f64()?,
            particles: self.read_u32()?,
            backgrounds: self.read_u32()?,
        }))
    }

    fn decode_visibility_counts(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let hidden = self.read_u32()?;
        let shown = self.read_u32()?;
        Some(RecordedEvent::VisibilityCounts {
            frame_index,
            hidden,
            shown,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SCAN => self.decode_scan(),
            TAG_VIEWPORT => self.decode_viewport(),
            TAG_REPOSITION => self.decode_reposition(),
            TAG_RESET => self.decode_reset(),
            TAG_VISIBILITY_COUNTS => self.decode_visibility_counts(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
