// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event wiring for one positioner.
//!
//! [`ParallaxDriver`] owns a [`Positioner`] together with its layout and
//! presenter and binds them to the page:
//!
//! - `scroll` on the scroll target requests a frame through a
//!   [`FrameRequest`], so bursts of scroll events reposition once per frame.
//!   Scroll properties that change silently run a [`RafLoop`] instead.
//! - `resize` on the window re-detects the viewport (and rescans in
//!   responsive mode).
//! - `load` on the window rescans in responsive mode, once images have
//!   their final size.
//!
//! Dropping the driver unbinds everything and releases its claims in the
//! shared [`DomContext`], but leaves styles as they are;
//! [`destroy`](ParallaxDriver::destroy) also restores the original styles.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use parallax_core::backend::Presenter as _;
use parallax_core::claims::PositionerId;
use parallax_core::config::ParallaxConfig;
use parallax_core::layout::{ElementId, LayoutProvider as _};
use parallax_core::positioner::{ParallaxChanges, Positioner, PositionerState, ScanSummary};
use parallax_core::tick::FrameStamp;
use parallax_core::trace::{
    RepositionEvent, ResetEvent, ScanEvent, TraceSink, Tracer, ViewportEvent,
};
use wasm_bindgen::JsValue;
use web_sys::EventTarget;

use crate::elements::DomContext;
use crate::layout::{DomLayout, ScrollTarget};
use crate::listener::ListenerHandle;
use crate::presenter::{DisplayToggle, DomPresenter, Visibility};
use crate::raf::{FrameRequest, RafLoop};

/// Everything a frame callback touches.
struct DriverState<V> {
    positioner: Positioner,
    layout: DomLayout,
    presenter: DomPresenter<V>,
    changes: ParallaxChanges,
    sink: Option<Box<dyn TraceSink>>,
}

impl<V: Visibility> DriverState<V> {
    fn tracer(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    fn on_frame(&mut self, stamp: FrameStamp) {
        let scroll = self.layout.scroll();
        self.positioner.reposition_into(scroll, &mut self.changes);
        if !self.changes.is_empty() {
            self.presenter.apply(&self.positioner, &self.changes);
        }

        let event = RepositionEvent::new(self.positioner.id(), &stamp, scroll, &self.changes);
        #[cfg(feature = "trace-rich")]
        let visibility = parallax_core::trace::VisibilityChange::collect(
            &self.positioner,
            &self.changes,
        );
        let mut tracer = self.tracer();
        tracer.reposition(&event);
        #[cfg(feature = "trace-rich")]
        tracer.visibility_changes(stamp.frame_index, &visibility);
    }

    fn refresh(&mut self, context: &DomContext) -> ScanSummary {
        let summary = {
            let mut claims = context.claims_mut();
            self.positioner
                .refresh(&mut self.layout, &mut self.presenter, &mut claims)
        };
        context.prune();
        self.trace_scan(summary);
        summary
    }

    fn on_resize(&mut self, context: &DomContext) {
        let rescanned = {
            let mut claims = context.claims_mut();
            self.positioner
                .on_resize(&mut self.layout, &mut self.presenter, &mut claims)
        };
        match rescanned {
            Some(summary) => self.trace_scan(summary),
            None => {
                let event = ViewportEvent {
                    positioner: self.positioner.id(),
                    timestamp_ms: crate::now(),
                    viewport: self.positioner.viewport(),
                };
                self.tracer().viewport(&event);
            }
        }
    }

    fn trace_scan(&mut self, summary: ScanSummary) {
        let id = self.positioner.id();
        let timestamp_ms = crate::now();
        let viewport = ViewportEvent {
            positioner: id,
            timestamp_ms,
            viewport: self.positioner.viewport(),
        };
        let scan = ScanEvent::new(id, timestamp_ms, &summary);
        let mut tracer = self.tracer();
        tracer.viewport(&viewport);
        tracer.scan(&scan);
    }

    fn destroy(&mut self, context: &DomContext) {
        let snapshot = self.positioner.reset(&mut context.claims_mut());
        self.presenter.restore(&snapshot);
        let event = ResetEvent::new(self.positioner.id(), crate::now(), &snapshot);
        self.tracer().reset(&event);
    }
}

/// A positioner bound to page events.
pub struct ParallaxDriver<V = DisplayToggle> {
    state: Rc<RefCell<DriverState<V>>>,
    context: DomContext,
    frame: Option<FrameRequest>,
    animation: Option<RafLoop>,
    listeners: Vec<ListenerHandle>,
}

impl<V> core::fmt::Debug for ParallaxDriver<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallaxDriver")
            .field("context", &self.context)
            .field("frame", &self.frame)
            .field("animation", &self.animation)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl ParallaxDriver {
    /// Attaches a positioner to `target` with the default `display: none`
    /// culling.
    ///
    /// # Errors
    ///
    /// Fails outside a browser document or when a listener cannot be added.
    pub fn attach(
        context: &DomContext,
        target: ScrollTarget,
        config: ParallaxConfig,
    ) -> Result<Self, JsValue> {
        let layout = DomLayout::new(context.clone(), target, config.scroll_property)?;
        let presenter = DomPresenter::new(context.clone());
        Self::new(config, layout, presenter)
    }
}

impl<V: Visibility + 'static> ParallaxDriver<V> {
    /// Creates the positioner, scans the page, and binds events.
    ///
    /// `layout` and `presenter` must share one [`DomContext`]; the layout's
    /// is used for claims.
    ///
    /// # Errors
    ///
    /// Propagates failures to add an event listener.
    pub fn new(
        config: ParallaxConfig,
        layout: DomLayout,
        presenter: DomPresenter<V>,
    ) -> Result<Self, JsValue> {
        let context = layout.context().clone();
        let positioner = Positioner::new(config, &mut context.claims_mut());
        let native_scroll = positioner.config().scroll_property.emits_scroll_events();
        let responsive = positioner.config().responsive;
        let scroll_target = layout.scroll_event_target();
        let window: EventTarget = layout.window().clone().into();

        let state = Rc::new(RefCell::new(DriverState {
            positioner,
            layout,
            presenter,
            changes: ParallaxChanges::default(),
            sink: None,
        }));
        state.borrow_mut().refresh(&context);

        let mut listeners = Vec::new();
        let (frame, animation) = if native_scroll {
            let frame = FrameRequest::new({
                let state = Rc::clone(&state);
                move |stamp| state.borrow_mut().on_frame(stamp)
            });
            listeners.push(ListenerHandle::listen(&scroll_target, "scroll", {
                let frame = frame.clone();
                move |_| {
                    frame.request();
                }
            })?);
            frame.request();
            (Some(frame), None)
        } else {
            let animation = RafLoop::new({
                let state = Rc::clone(&state);
                move |stamp| state.borrow_mut().on_frame(stamp)
            });
            animation.start();
            (None, Some(animation))
        };

        listeners.push(ListenerHandle::listen(&window, "resize", {
            let state = Rc::clone(&state);
            let context = context.clone();
            let frame = frame.clone();
            move |_| {
                state.borrow_mut().on_resize(&context);
                if let Some(frame) = &frame {
                    frame.request();
                }
            }
        })?);

        if responsive {
            listeners.push(ListenerHandle::listen(&window, "load", {
                let state = Rc::clone(&state);
                let context = context.clone();
                let frame = frame.clone();
                move |_| {
                    state.borrow_mut().refresh(&context);
                    if let Some(frame) = &frame {
                        frame.request();
                    }
                }
            })?);
        }

        Ok(Self {
            state,
            context,
            frame,
            animation,
            listeners,
        })
    }

    /// Routes lifecycle events to `sink`.
    ///
    /// Events are only delivered when `parallax_core` is built with the
    /// `trace` feature.
    pub fn set_trace_sink(&self, sink: impl TraceSink + 'static) {
        self.state.borrow_mut().sink = Some(Box::new(sink));
    }

    /// Rescans the page, e.g. after content was added.
    pub fn refresh(&self) -> ScanSummary {
        let summary = self.state.borrow_mut().refresh(&self.context);
        self.request_frame();
        summary
    }

    /// Schedules a reposition on the next animation frame.
    ///
    /// With a non-native scroll property the animation loop already runs
    /// every frame and this does nothing.
    pub fn request_frame(&self) {
        if let Some(frame) = &self.frame {
            frame.request();
        }
    }

    /// Returns the positioner's identity.
    #[must_use]
    pub fn positioner_id(&self) -> PositionerId {
        self.state.borrow().positioner.id()
    }

    /// Returns the positioner's lifecycle state.
    #[must_use]
    pub fn positioner_state(&self) -> PositionerState {
        self.state.borrow().positioner.state()
    }

    /// Returns the elements the positioner currently moves.
    #[must_use]
    pub fn tracked_elements(&self) -> Vec<ElementId> {
        self.state.borrow().positioner.tracked_elements()
    }

    /// Runs `f` with the positioner.
    pub fn with_positioner<R>(&self, f: impl FnOnce(&Positioner) -> R) -> R {
        f(&self.state.borrow().positioner)
    }

    /// Unbinds every listener, stops frame delivery, releases claims and
    /// restores the original styles.
    pub fn destroy(mut self) {
        self.listeners.clear();
        if let Some(frame) = self.frame.take() {
            frame.cancel();
        }
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.state.borrow_mut().destroy(&self.context);
    }
}

impl<V> Drop for ParallaxDriver<V> {
    fn drop(&mut self) {
        // Already released when `destroy` ran; skipped if a callback holds
        // the state.
        if let Ok(state) = self.state.try_borrow() {
            self.context.release_claims(state.positioner.id());
        }
    }
}
