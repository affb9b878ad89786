// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each positioner is shown as its own process (`pid`). Reposition passes
//! appear as instant events plus a `Changes` counter track, so scroll bursts
//! and culling waves are visible at a glance.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Millisecond timestamps are converted to the format's microseconds.
/// Memoized reposition passes are skipped.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Scan(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Scan",
                    "cat": "Lifecycle",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": e.positioner.0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "particles": e.particles,
                        "backgrounds": e.backgrounds,
                        "skipped": e.skipped,
                    }
                }));
            }
            RecordedEvent::Viewport(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Viewport",
                    "cat": "Lifecycle",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": e.positioner.0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "width": e.viewport.size.width,
                        "height": e.viewport.size.height,
                        "offset_x": e.viewport.offset.x,
                        "offset_y": e.viewport.offset.y,
                    }
                }));
            }
            RecordedEvent::Reposition(e) => {
                if e.memoized {
                    continue;
                }
                let ts = ms_to_us(e.timestamp_ms);
                events.push(json!({
                    "ph": "i",
                    "name": "Reposition",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": e.positioner.0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "scroll_x": e.scroll.x,
                        "scroll_y": e.scroll.y,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "Changes",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": e.positioner.0,
                    "args": {
                        "moved": e.moved,
                        "hidden": e.hidden,
                        "shown": e.unhidden,
                        "backgrounds": e.backgrounds,
                    }
                }));
            }
            RecordedEvent::Reset(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Reset",
                    "cat": "Lifecycle",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": e.positioner.0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "particles": e.particles,
                        "backgrounds": e.backgrounds,
                    }
                }));
            }
            RecordedEvent::VisibilityCounts {
                frame_index,
                hidden,
                shown,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Visibility",
                    "cat": "Rich",
                    "ts": 0,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": frame_index,
                        "hidden": hidden,
                        "shown": shown,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ms_to_us(ms: f64) -> f64 {
    ms * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use kurbo::Point;
    use parallax_core::claims::PositionerId;
    use parallax_core::trace::{RepositionEvent, ScanEvent, TraceSink};

    fn reposition(frame_index: u64, memoized: bool) -> RepositionEvent {
        RepositionEvent {
            positioner: PositionerId(1),
            frame_index,
            timestamp_ms: 16.0,
            scroll: Point::new(0.0, 100.0),
            moved: 2,
            hidden: 0,
            unhidden: 1,
            backgrounds: 0,
            memoized,
        }
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_scan(&ScanEvent {
            positioner: PositionerId(1),
            timestamp_ms: 2.5,
            particles: 3,
            backgrounds: 1,
            skipped: 0,
        });
        rec.on_reposition(&reposition(0, false));

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3, "scan, reposition and its counter");

        assert_eq!(parsed[0]["name"], "Scan");
        assert_eq!(parsed[0]["ts"], 2500.0);
        assert_eq!(parsed[0]["pid"], 1);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Reposition");
        assert_eq!(parsed[1]["args"]["scroll_y"], 100.0);

        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[2]["args"]["moved"], 2);
        assert_eq!(parsed[2]["args"]["shown"], 1);
    }

    #[test]
    fn memoized_passes_are_skipped() {
        let mut rec = RecorderSink::new();
        rec.on_reposition(&reposition(0, true));
        rec.on_reposition(&reposition(1, false));

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["args"]["frame_index"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
