// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event listener subscriptions.

use alloc::boxed::Box;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Event, EventTarget};

/// A DOM event listener that is removed when the handle is dropped.
pub struct ListenerHandle {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ListenerHandle {
    /// Adds `callback` as a listener for `event` on `target`.
    ///
    /// # Errors
    ///
    /// Propagates the exception thrown by `addEventListener`.
    pub fn listen(
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    /// Returns the event name.
    #[must_use]
    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
