// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a long page of parallax sections driven by `parallax_backend_web`.
//!
//! Builds four full-width sections whose gradient backgrounds drift at
//! different rates, scatters floating cards tagged with element ratios over
//! them, and pins a small status panel that counts reposition passes through
//! a [`TraceSink`].
//!
//! A second positioner drives a scrollable side panel, showing that each
//! scroll container gets its own positioner while sharing one
//! [`DomContext`].
//!
//! Build with: `wasm-pack build --target web demos/web_parallax`
//!
//! [`DomContext`]: parallax_backend_web::DomContext

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::format;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use parallax_backend_web::{DomContext, ParallaxDriver, ScrollTarget};
use parallax_core::config::{OffsetSource, ParallaxConfig};
use parallax_core::trace::{RepositionEvent, ScanEvent, TraceSink};

const SECTION_HEIGHT: f64 = 900.0;

/// Sections: (background ratio, gradient colors).
const SECTIONS: [(f64, &str, &str); 4] = [
    (0.2, "#1d2b53", "#7e2553"),
    (0.5, "#008751", "#29adff"),
    (0.8, "#ab5236", "#ffa300"),
    (0.35, "#5f574f", "#c2c3c7"),
];

/// Cards: (left %, top px, element ratio, color).
const CARDS: [(f64, f64, f64, &str); 8] = [
    (10.0, 300.0, 0.6, "rgba(255, 0, 77, 0.85)"),
    (60.0, 520.0, 1.3, "rgba(255, 236, 39, 0.85)"),
    (30.0, 1150.0, 0.8, "rgba(0, 228, 54, 0.85)"),
    (70.0, 1400.0, 1.6, "rgba(41, 173, 255, 0.85)"),
    (15.0, 2050.0, 0.5, "rgba(131, 118, 156, 0.85)"),
    (55.0, 2300.0, 1.1, "rgba(255, 119, 168, 0.85)"),
    (25.0, 2950.0, 0.7, "rgba(255, 204, 170, 0.85)"),
    (65.0, 3150.0, 1.4, "rgba(255, 241, 232, 0.85)"),
];

/// Writes frame counters into the status panel.
struct StatusSink {
    panel: HtmlElement,
    passes: u64,
    unchanged: u64,
    culled: u32,
}

impl StatusSink {
    fn render(&self) {
        self.panel.set_text_content(Some(&format!(
            "passes: {}  unchanged: {}  culled: {}",
            self.passes, self.unchanged, self.culled,
        )));
    }
}

impl TraceSink for StatusSink {
    fn on_scan(&mut self, e: &ScanEvent) {
        self.panel.set_text_content(Some(&format!(
            "scanned {} cards, {} sections",
            e.particles, e.backgrounds,
        )));
    }

    fn on_reposition(&mut self, e: &RepositionEvent) {
        self.passes += 1;
        if e.memoized {
            self.unchanged += 1;
        }
        self.culled = (self.culled + e.hidden).saturating_sub(e.unhidden);
        self.render();
    }
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;
    let style = body.style();
    style.set_property("margin", "0")?;
    style.set_property("font-family", "sans-serif")?;

    let mut top = 0.0;
    for (ratio, from, to) in SECTIONS {
        let section = create_div(&document)?;
        let s = section.style();
        s.set_property("height", &format!("{SECTION_HEIGHT}px"))?;
        s.set_property(
            "background-image",
            &format!("linear-gradient(180deg, {from}, {to}, {from})"),
        )?;
        s.set_property("background-size", "100% 200%")?;
        s.set_property("background-position", "50% 0px")?;
        section.set_attribute("data-parallax-background-ratio", &format!("{ratio}"))?;
        body.append_child(&section)?;
        top += SECTION_HEIGHT;
    }

    for (left, card_top, ratio, color) in CARDS {
        let card = create_div(&document)?;
        let s = card.style();
        s.set_property("position", "absolute")?;
        s.set_property("left", &format!("{left}%"))?;
        s.set_property("top", &format!("{card_top}px"))?;
        s.set_property("width", "180px")?;
        s.set_property("height", "120px")?;
        s.set_property("border-radius", "12px")?;
        s.set_property("background", color)?;
        card.set_attribute("data-parallax-ratio", &format!("{ratio}"))?;
        body.append_child(&card)?;
    }

    let panel = create_div(&document)?;
    let s = panel.style();
    s.set_property("position", "fixed")?;
    s.set_property("right", "16px")?;
    s.set_property("bottom", "16px")?;
    s.set_property("padding", "8px 12px")?;
    s.set_property("color", "#fff")?;
    s.set_property("background", "rgba(0, 0, 0, 0.6)")?;
    body.append_child(&panel)?;

    let side = create_side_panel(&document, top)?;
    body.append_child(&side)?;

    let context = DomContext::new();

    // The side panel lives inside the body, so it is attached first: its
    // rows are claimed here and the page positioner skips them.
    let mut side_config = ParallaxConfig::vertical_only();
    side_config.vertical_offset = OffsetSource::Fixed(40.0);
    let side_driver = ParallaxDriver::attach(&context, ScrollTarget::Element(side), side_config)?;

    let mut config = ParallaxConfig::vertical_only();
    config.responsive = true;
    let page = ParallaxDriver::attach(&context, ScrollTarget::Window, config)?;
    page.set_trace_sink(StatusSink {
        panel,
        passes: 0,
        unchanged: 0,
        culled: 0,
    });

    // Keep the drivers alive for the lifetime of the page.
    core::mem::forget(page);
    core::mem::forget(side_driver);

    Ok(())
}

fn create_div(document: &Document) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element("div")?.unchecked_into())
}

/// A fixed scrollable column with its own tagged rows.
fn create_side_panel(document: &Document, page_height: f64) -> Result<HtmlElement, JsValue> {
    let side = create_div(document)?;
    let s = side.style();
    s.set_property("position", "fixed")?;
    s.set_property("left", "16px")?;
    s.set_property("top", "16px")?;
    s.set_property("width", "160px")?;
    s.set_property("height", "320px")?;
    s.set_property("overflow-y", "scroll")?;
    s.set_property("background", "rgba(255, 255, 255, 0.15)")?;

    let inner = create_div(document)?;
    let s = inner.style();
    s.set_property("position", "relative")?;
    s.set_property("height", &format!("{}px", page_height / 2.0))?;
    side.append_child(&inner)?;

    let mut top = 40.0;
    for ratio in [0.4, 0.7, 1.2, 0.9, 1.5] {
        let row = create_div(document)?;
        let s = row.style();
        s.set_property("position", "absolute")?;
        s.set_property("left", "20px")?;
        s.set_property("top", &format!("{top}px"))?;
        s.set_property("width", "120px")?;
        s.set_property("height", "60px")?;
        s.set_property("background", "rgba(255, 255, 255, 0.7)")?;
        row.set_attribute("data-parallax-ratio", &format!("{ratio}"))?;
        inner.append_child(&row)?;
        top += 260.0;
    }

    Ok(side)
}
