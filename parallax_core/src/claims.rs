// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-page element ownership.
//!
//! Several positioners may share one page (for example a window-level
//! positioner and one inside a scrolling panel). Each element must be moved
//! by at most one of them, otherwise the two would fight over its position
//! every frame. The [`ClaimRegistry`] records which positioner owns each
//! element, separately for element and background tracking, since an element
//! may legitimately be a particle for one positioner while its background is
//! animated by another.
//!
//! The registry is plain data owned by the caller and passed explicitly to
//! the operations that need it.

use alloc::collections::BTreeMap;
use core::fmt;

use crate::layout::ElementId;

/// Identifies one positioner within a [`ClaimRegistry`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionerId(pub u32);

impl fmt::Debug for PositionerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionerId({})", self.0)
    }
}

/// Which aspect of an element a positioner tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrackKind {
    /// The element box itself is moved.
    Element,
    /// The element's background image is moved.
    Background,
}

/// Ownership registry shared by all positioners on one page.
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    owners: BTreeMap<(ElementId, TrackKind), PositionerId>,
    next_id: u32,
}

impl ClaimRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh positioner identity.
    pub fn register(&mut self) -> PositionerId {
        let id = PositionerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Claims `element` for `owner`.
    ///
    /// Returns `true` if the element was free or already owned by `owner`,
    /// and `false` if another positioner holds it.
    pub fn claim(&mut self, element: ElementId, kind: TrackKind, owner: PositionerId) -> bool {
        match self.owners.get(&(element, kind)) {
            Some(&current) => current == owner,
            None => {
                self.owners.insert((element, kind), owner);
                true
            }
        }
    }

    /// Releases `element` if (and only if) `owner` holds it.
    pub fn release(&mut self, element: ElementId, kind: TrackKind, owner: PositionerId) {
        if self.owners.get(&(element, kind)) == Some(&owner) {
            self.owners.remove(&(element, kind));
        }
    }

    /// Releases every claim held by `owner`.
    pub fn release_all(&mut self, owner: PositionerId) {
        self.owners.retain(|_, held_by| *held_by != owner);
    }

    /// Returns the current owner of `element`, if any.
    #[must_use]
    pub fn owner(&self, element: ElementId, kind: TrackKind) -> Option<PositionerId> {
        self.owners.get(&(element, kind)).copied()
    }

    /// Returns the number of claims held by `owner`.
    #[must_use]
    pub fn claimed_by(&self, owner: PositionerId) -> usize {
        self.owners.values().filter(|&&o| o == owner).count()
    }
}
