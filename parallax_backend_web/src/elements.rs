// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-wide element table and claim registry.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{RefCell, RefMut};

use js_sys::{Object, WeakMap};
use parallax_core::claims::{ClaimRegistry, PositionerId, TrackKind};
use parallax_core::layout::ElementId;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// State shared by every positioner on one page.
///
/// Maps DOM elements to the [`ElementId`]s core code works with, and owns the
/// [`ClaimRegistry`] that keeps two positioners from moving the same element.
/// Cloning yields another handle to the same state.
///
/// Ids are stable for the lifetime of the context: an element seen again by a
/// later scan gets the id it was first given. The element-to-id direction is a
/// JS `WeakMap`, so a lookup is one call regardless of table size.
#[derive(Clone)]
pub struct DomContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    /// Indexed by id; `None` once pruned.
    elements: RefCell<Vec<Option<HtmlElement>>>,
    ids: WeakMap,
    claims: RefCell<ClaimRegistry>,
}

impl DomContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContextInner {
                elements: RefCell::new(Vec::new()),
                ids: WeakMap::new(),
                claims: RefCell::new(ClaimRegistry::new()),
            }),
        }
    }

    /// Returns the id of `element`, assigning the next free one if it has
    /// not been seen before.
    pub fn intern(&self, element: &HtmlElement) -> ElementId {
        let key: &Object = element.as_ref();
        if let Some(id) = id_from_js(&self.inner.ids.get(key)) {
            return id;
        }
        let mut elements = self.inner.elements.borrow_mut();
        let id = ElementId(u32::try_from(elements.len()).unwrap_or(u32::MAX));
        elements.push(Some(element.clone()));
        self.inner.ids.set(key, &JsValue::from(id.0));
        id
    }

    /// Returns the element behind `id`.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<HtmlElement> {
        self.inner
            .elements
            .borrow()
            .get(id.0 as usize)
            .cloned()
            .flatten()
    }

    /// Forgets elements that left the document and that no positioner
    /// claims.
    ///
    /// Their ids are not reused. Returns how many elements were dropped.
    pub fn prune(&self) -> usize {
        let claims = self.inner.claims.borrow();
        let mut elements = self.inner.elements.borrow_mut();
        let mut pruned = 0;
        for (idx, slot) in (0_u32..).zip(elements.iter_mut()) {
            let id = ElementId(idx);
            let detached = slot.as_ref().is_some_and(|el| !el.is_connected());
            if !detached || is_claimed(&claims, id) {
                continue;
            }
            if let Some(el) = slot.take() {
                let key: &Object = el.as_ref();
                self.inner.ids.delete(key);
                pruned += 1;
            }
        }
        pruned
    }

    /// Returns the number of ids handed out so far, pruned ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.elements.borrow().len()
    }

    /// Returns whether no element has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.elements.borrow().is_empty()
    }

    /// Borrows the claim registry.
    ///
    /// # Panics
    ///
    /// Panics if the registry is already borrowed, which only happens when a
    /// scan or reset re-enters the context.
    pub fn claims_mut(&self) -> RefMut<'_, ClaimRegistry> {
        self.inner.claims.borrow_mut()
    }

    /// Releases every claim held by `owner`.
    ///
    /// Returns `false`, leaving the claims in place, if the registry is
    /// borrowed. Never panics, so it is safe to call while unwinding.
    pub fn release_claims(&self, owner: PositionerId) -> bool {
        release_from(&self.inner.claims, owner)
    }
}

impl Default for DomContext {
    fn default() -> Self {
        Self::new()
    }
}

fn release_from(claims: &RefCell<ClaimRegistry>, owner: PositionerId) -> bool {
    let Ok(mut claims) = claims.try_borrow_mut() else {
        return false;
    };
    claims.release_all(owner);
    true
}

fn is_claimed(claims: &ClaimRegistry, id: ElementId) -> bool {
    claims.owner(id, TrackKind::Element).is_some()
        || claims.owner(id, TrackKind::Background).is_some()
}

/// Reads an id stored in the `WeakMap`; `undefined` and non-integral values
/// are not ids.
#[expect(
    clippy::cast_possible_truncation,
    reason = "only whole numbers in u32 range pass the guard"
)]
fn id_from_js(value: &JsValue) -> Option<ElementId> {
    let n = value.as_f64()?;
    (n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n)).then(|| ElementId(n as u32))
}

impl core::fmt::Debug for DomContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomContext")
            .field("elements_len", &self.len())
            .field("claims", &self.inner.claims)
            .finish_non_exhaustive()
    }
}
