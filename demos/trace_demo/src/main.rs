// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll session that exercises the tracing and diagnostics
//! pipeline.
//!
//! Scrolls an in-memory page down and back up over 140 synthetic frames,
//! coalescing scroll events through a [`TickGate`], resizing the viewport
//! halfway, and resetting at the end. Events go to both a
//! [`PrettyPrintSink`](parallax_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](parallax_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file (`trace.json`, or the path given as
//! the first argument).

mod page;

use std::fs::File;
use std::io::BufWriter;

use kurbo::{Point, Size};
use parallax_core::backend::Presenter as _;
use parallax_core::claims::ClaimRegistry;
use parallax_core::config::ParallaxConfig;
use parallax_core::easing::Easing;
use parallax_core::layout::{LayoutProvider as _, Viewport};
use parallax_core::positioner::{ParallaxChanges, Positioner, ScanSummary};
use parallax_core::tick::{FrameStamp, TickGate};
use parallax_core::trace::{
    RepositionEvent, ResetEvent, ScanEvent, TraceSink, Tracer, ViewportEvent, VisibilityChange,
};
use parallax_core::waypoint::{Direction, Waypoints};
use parallax_debug::pretty::PrettyPrintSink;
use parallax_debug::recorder::RecorderSink;

use crate::page::Page;

const FRAME_COUNT: u32 = 140;
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frames spent scrolling down, then holding still.
const SCROLL_DOWN_FRAMES: u32 = 60;
const HOLD_FRAMES: u32 = 20;
const RESIZE_FRAME: u32 = 70;
const DEPTH: f64 = 2400.0;
const SECTION_HEIGHT: f64 = 1200.0;

/// Forwards every event to a pretty printer and a recorder.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Fanout {
    fn on_scan(&mut self, e: &ScanEvent) {
        self.pretty.on_scan(e);
        self.recorder.on_scan(e);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        self.pretty.on_viewport(e);
        self.recorder.on_viewport(e);
    }

    fn on_reposition(&mut self, e: &RepositionEvent) {
        self.pretty.on_reposition(e);
        self.recorder.on_reposition(e);
    }

    fn on_reset(&mut self, e: &ResetEvent) {
        self.pretty.on_reset(e);
        self.recorder.on_reset(e);
    }

    fn on_visibility_changes(&mut self, frame_index: u64, changes: &[VisibilityChange]) {
        self.pretty.on_visibility_changes(frame_index, changes);
        self.recorder.on_visibility_changes(frame_index, changes);
    }
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "trace.json".into());

    // -- page --------------------------------------------------------------
    let page = Page::new(Viewport::new(800.0, 600.0));
    let ratios = [0.5, 0.8, 1.2];
    for (row, &ratio) in (0..12_u32).zip(ratios.iter().cycle()) {
        let column = f64::from(row % 3);
        page.particle(
            Point::new(40.0 + column * 260.0, 200.0 + f64::from(row) * 300.0),
            Size::new(200.0, 120.0),
            ratio,
        );
    }
    let mut top = 0.0;
    for ratio in [0.3, 0.5, 0.7] {
        page.section(top, SECTION_HEIGHT, ratio);
        top += SECTION_HEIGHT;
    }

    let mut waypoints = Waypoints::new();
    let sections = [
        (waypoints.add(SECTION_HEIGHT), "second"),
        (waypoints.add(2.0 * SECTION_HEIGHT), "third"),
    ];

    // -- sinks -------------------------------------------------------------
    let mut sinks = Fanout {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())).verbose(true),
        recorder: RecorderSink::new(),
    };

    // -- positioner --------------------------------------------------------
    let mut layout = page.layout();
    let mut presenter = page.presenter();
    let mut claims = ClaimRegistry::new();
    let mut config = ParallaxConfig::vertical_only();
    config.responsive = true;
    let mut positioner = Positioner::new(config, &mut claims);
    let mut gate = TickGate::new();

    {
        let mut tracer = Tracer::new(&mut sinks);
        let summary = positioner.refresh(&mut layout, &mut presenter, &mut claims);
        trace_scan(&mut tracer, &positioner, 0.0, summary);
        waypoints.update(layout.scroll().y);

        // -- simulated session ---------------------------------------------
        let mut changes = ParallaxChanges::default();
        for frame in 0..FRAME_COUNT {
            let timestamp_ms = f64::from(frame) * FRAME_MS;
            let moving = !(SCROLL_DOWN_FRAMES..SCROLL_DOWN_FRAMES + HOLD_FRAMES).contains(&frame);

            // Scroll events arriving during this frame.
            let events = if moving {
                3
            } else {
                u32::from(frame % 5 == 0)
            };
            for _ in 0..events {
                gate.request();
            }
            page.set_scroll(Point::new(0.0, scroll_at(frame)));

            if frame == RESIZE_FRAME {
                page.set_viewport(Viewport::new(1024.0, 768.0));
                let rescan = positioner.on_resize(&mut layout, &mut presenter, &mut claims);
                if let Some(summary) = rescan {
                    trace_scan(&mut tracer, &positioner, timestamp_ms, summary);
                }
                gate.request();
            }

            if !gate.is_pending() {
                continue;
            }
            gate.complete();

            let stamp = FrameStamp {
                frame_index: u64::from(frame),
                timestamp_ms,
            };
            let scroll = layout.scroll();
            positioner.reposition_into(scroll, &mut changes);
            presenter.apply(&positioner, &changes);

            tracer.reposition(&RepositionEvent::new(
                positioner.id(),
                &stamp,
                scroll,
                &changes,
            ));
            tracer.visibility_changes(
                stamp.frame_index,
                &VisibilityChange::collect(&positioner, &changes),
            );

            for crossing in waypoints.update(scroll.y) {
                let Some((_, section)) = sections.iter().find(|(id, _)| *id == crossing.id) else {
                    continue;
                };
                let verb = match crossing.direction {
                    Direction::Forward => "entered",
                    Direction::Backward => "left",
                };
                println!("[waypoint] frame={frame} {verb} {section} section");
            }
        }

        // -- teardown ------------------------------------------------------
        println!("[page] hidden before reset: {}", page.hidden_count());
        let snapshot = positioner.reset(&mut claims);
        presenter.restore(&snapshot);
        tracer.reset(&ResetEvent::new(
            positioner.id(),
            f64::from(FRAME_COUNT) * FRAME_MS,
            &snapshot,
        ));
        println!("[page] restored to original styles: {}", page.is_pristine());
    }

    // -- export Chrome trace -----------------------------------------------
    let file = File::create(&path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    parallax_debug::chrome::export(sinks.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({FRAME_COUNT} frames, {} of {} scroll events coalesced)",
        gate.coalesced(),
        gate.requested(),
    );
}

/// Scroll offset for `frame`: ease down, hold, then bounce back to the top.
fn scroll_at(frame: u32) -> f64 {
    let down = f64::from(SCROLL_DOWN_FRAMES);
    if frame < SCROLL_DOWN_FRAMES {
        Easing::InOutCubic.apply(0.0, f64::from(frame), 0.0, DEPTH, down)
    } else if frame < SCROLL_DOWN_FRAMES + HOLD_FRAMES {
        DEPTH
    } else {
        let elapsed = f64::from(frame - SCROLL_DOWN_FRAMES - HOLD_FRAMES);
        let duration = f64::from(FRAME_COUNT - SCROLL_DOWN_FRAMES - HOLD_FRAMES - 1);
        Easing::OutBounce.apply(0.0, elapsed, DEPTH, -DEPTH, duration)
    }
}

fn trace_scan(
    tracer: &mut Tracer<'_>,
    positioner: &Positioner,
    timestamp_ms: f64,
    summary: ScanSummary,
) {
    tracer.viewport(&ViewportEvent {
        positioner: positioner.id(),
        timestamp_ms,
        viewport: positioner.viewport(),
    });
    tracer.scan(&ScanEvent::new(positioner.id(), timestamp_ms, &summary));
}
