// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` tick sources.
//!
//! Two shapes of frame delivery are needed:
//!
//! - [`FrameRequest`] schedules a single frame on demand. Scroll handlers call
//!   [`request`](FrameRequest::request) on every event; a [`TickGate`] makes
//!   sure only the first call per frame schedules a callback.
//! - [`RafLoop`] runs every frame until stopped. It drives positioners whose
//!   scroll property changes without emitting scroll events.
//!
//! Both deliver a [`FrameStamp`] carrying the callback's
//! [`DOMHighResTimeStamp`][mdn] in milliseconds.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use parallax_core::tick::{FrameStamp, TickGate};

// Direct global bindings instead of `web_sys::Window` methods; avoids
// fetching (and unwrapping) the Window/Performance objects on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Returns the next stamp from `counter`, advancing it.
fn next_stamp(counter: &Cell<u64>, timestamp_ms: f64) -> FrameStamp {
    let frame_index = counter.get();
    counter.set(frame_index + 1);
    FrameStamp {
        frame_index,
        timestamp_ms,
    }
}

// ---------------------------------------------------------------------------
// RafLoop
// ---------------------------------------------------------------------------

/// A `requestAnimationFrame` animation loop that emits [`FrameStamp`]s.
///
/// Create with [`RafLoop::new`], then call [`start`](Self::start) to begin
/// receiving callbacks. The loop re-registers itself each frame until
/// [`stop`](Self::stop) is called or the `RafLoop` is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Stored in its own `RefCell` so it can be set once in `start()` and
    /// referenced from inside itself without conflicting with `callback`.
    closure: RefCell<Option<RafClosure>>,

    /// The user-supplied callback.
    callback: RefCell<Box<dyn FnMut(FrameStamp)>>,

    /// Becomes `FrameStamp::frame_index`.
    frame_counter: Cell<u64>,

    running: Cell<bool>,

    /// The ID returned by the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl RafLoop {
    /// Creates a new `RafLoop` that is **not yet running**.
    pub fn new(callback: impl FnMut(FrameStamp) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Starts the animation loop.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
            return;
        }

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if !inner.running.get() {
                return;
            }

            // Re-register before the callback, so a frame that takes long
            // does not push the next one out.
            if let Some(ref closure) = *inner.closure.borrow() {
                let id = request_animation_frame(closure.as_ref().unchecked_ref());
                inner.raf_id.set(id);
            }

            let stamp = next_stamp(&inner.frame_counter, timestamp_ms);
            inner.callback.borrow_mut()(stamp);
        }) as Box<dyn FnMut(f64)>);

        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.inner.raf_id.set(id);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Stops the animation loop.
    ///
    /// The pending `requestAnimationFrame` callback is cancelled. Can be
    /// restarted by calling [`start`](Self::start) again.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // The closure holds an `Rc` to `inner`; dropping it breaks the cycle.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FrameRequest
// ---------------------------------------------------------------------------

/// An on-demand, coalescing `requestAnimationFrame` callback.
///
/// Cloning yields another handle to the same request; the pending frame (if
/// any) is cancelled when the last handle is dropped.
#[derive(Clone)]
pub struct FrameRequest {
    inner: Rc<FrameInner>,
}

struct FrameInner {
    /// Holds only a weak reference back to this struct, so handles can be
    /// cloned freely without forming a cycle.
    closure: RafClosure,
    callback: RefCell<Box<dyn FnMut(FrameStamp)>>,
    gate: Cell<TickGate>,
    frame_counter: Cell<u64>,
    raf_id: Cell<i32>,
}

impl FrameRequest {
    /// Creates an idle request that calls `callback` on each scheduled frame.
    pub fn new(callback: impl FnMut(FrameStamp) + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<FrameInner>| {
            let weak = weak.clone();
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut gate = inner.gate.get();
                gate.complete();
                inner.gate.set(gate);

                let stamp = next_stamp(&inner.frame_counter, timestamp_ms);
                inner.callback.borrow_mut()(stamp);
            }) as Box<dyn FnMut(f64)>);

            FrameInner {
                closure,
                callback: RefCell::new(Box::new(callback)),
                gate: Cell::new(TickGate::new()),
                frame_counter: Cell::new(0),
                raf_id: Cell::new(0),
            }
        });
        Self { inner }
    }

    /// Requests a frame.
    ///
    /// Returns `true` if this call scheduled one, `false` if a frame was
    /// already pending.
    pub fn request(&self) -> bool {
        let mut gate = self.inner.gate.get();
        let schedule = gate.request();
        self.inner.gate.set(gate);
        if schedule {
            let id = request_animation_frame(self.inner.closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
        }
        schedule
    }

    /// Cancels the pending frame, if any.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Returns whether a frame is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.gate.get().is_pending()
    }

    /// Returns the gate's request counters.
    #[must_use]
    pub fn gate(&self) -> TickGate {
        self.inner.gate.get()
    }
}

impl FrameInner {
    fn cancel(&self) {
        let mut gate = self.gate.get();
        if gate.is_pending() {
            cancel_animation_frame(self.raf_id.get());
            gate.complete();
            self.gate.set(gate);
        }
    }
}

impl Drop for FrameInner {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for FrameRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let gate = self.inner.gate.get();
        f.debug_struct("FrameRequest")
            .field("pending", &gate.is_pending())
            .field("requested", &gate.requested())
            .field("coalesced", &gate.coalesced())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_count_up_from_zero() {
        let counter = Cell::new(0);
        let a = next_stamp(&counter, 16.0);
        let b = next_stamp(&counter, 32.5);
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert_eq!(b.timestamp_ms, 32.5);
        assert_eq!(counter.get(), 2);
    }
}
