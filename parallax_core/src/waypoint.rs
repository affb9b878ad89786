// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-offset crossing detector.
//!
//! A waypoint is a scroll offset along one axis. Each [`Waypoints::update`]
//! compares the new scroll offset with the previous one and reports every
//! waypoint that was passed:
//!
//! - [`Direction::Forward`] when `previous < offset <= current`,
//! - [`Direction::Backward`] when `current < offset <= previous`.
//!
//! Crossings are reported in the order the scroll passed them: ascending
//! offsets when moving forward, descending when moving back. The first
//! update after construction only records a baseline.

use alloc::vec::Vec;
use core::fmt;

use crate::css::finite_or_zero;

/// Identifies a waypoint within its [`Waypoints`] set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaypointId(pub u32);

impl fmt::Debug for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaypointId({})", self.0)
    }
}

/// Scroll direction at a crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Scroll offset increased through the waypoint.
    Forward,
    /// Scroll offset decreased back through the waypoint.
    Backward,
}

/// One waypoint passed during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossing {
    /// The waypoint that was passed.
    pub id: WaypointId,
    /// Which way the scroll moved through it.
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    id: WaypointId,
    offset: f64,
    enabled: bool,
}

/// A set of waypoints on one axis.
#[derive(Clone, Debug, Default)]
pub struct Waypoints {
    entries: Vec<Entry>,
    next_id: u32,
    last: Option<f64>,
}

impl Waypoints {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a waypoint at `offset`. Non-finite offsets are treated as `0`.
    pub fn add(&mut self, offset: f64) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            offset: finite_or_zero(offset),
            enabled: true,
        });
        id
    }

    /// Removes a waypoint. Returns whether it existed.
    pub fn remove(&mut self, id: WaypointId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Moves a waypoint to a new offset, e.g. after a layout change.
    pub fn set_offset(&mut self, id: WaypointId, offset: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.offset = finite_or_zero(offset);
        }
    }

    /// Enables or disables a waypoint. Disabled waypoints never fire.
    pub fn set_enabled(&mut self, id: WaypointId, enabled: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.enabled = enabled;
        }
    }

    /// Returns the offset of a waypoint.
    #[must_use]
    pub fn offset(&self, id: WaypointId) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.offset)
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets the previous scroll offset; the next update is a baseline.
    pub fn rebase(&mut self) {
        self.last = None;
    }

    /// Records `scroll` and returns the waypoints passed since the previous
    /// update.
    pub fn update(&mut self, scroll: f64) -> Vec<Crossing> {
        let scroll = finite_or_zero(scroll);
        let Some(previous) = self.last.replace(scroll) else {
            return Vec::new();
        };

        let (direction, low, high) = if scroll > previous {
            (Direction::Forward, previous, scroll)
        } else if scroll < previous {
            (Direction::Backward, scroll, previous)
        } else {
            return Vec::new();
        };

        let mut passed: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.enabled && e.offset > low && e.offset <= high)
            .copied()
            .collect();
        passed.sort_by(|a, b| a.offset.total_cmp(&b.offset).then(a.id.cmp(&b.id)));
        if direction == Direction::Backward {
            passed.reverse();
        }
        passed
            .into_iter()
            .map(|e| Crossing {
                id: e.id,
                direction,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(crossings: &[Crossing]) -> Vec<u32> {
        crossings.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn first_update_is_a_baseline() {
        let mut w = Waypoints::new();
        w.add(100.0);
        assert!(w.update(500.0).is_empty());
    }

    #[test]
    fn crossings_in_both_directions() {
        let mut w = Waypoints::new();
        let a = w.add(100.0);
        w.update(0.0);

        let down = w.update(150.0);
        assert_eq!(
            down,
            [Crossing {
                id: a,
                direction: Direction::Forward
            }]
        );

        assert!(w.update(120.0).is_empty(), "still past the waypoint");

        let up = w.update(50.0);
        assert_eq!(
            up,
            [Crossing {
                id: a,
                direction: Direction::Backward
            }]
        );
    }

    #[test]
    fn landing_exactly_on_offset_counts_as_forward() {
        let mut w = Waypoints::new();
        w.add(100.0);
        w.update(0.0);
        assert_eq!(w.update(100.0).len(), 1);
        assert_eq!(w.update(99.0).len(), 1, "leaving it backward fires");
    }

    #[test]
    fn order_follows_scroll_direction() {
        let mut w = Waypoints::new();
        w.add(300.0);
        w.add(100.0);
        w.add(200.0);
        w.update(0.0);

        assert_eq!(ids(&w.update(400.0)), [1, 2, 0]);
        assert_eq!(ids(&w.update(0.0)), [0, 2, 1]);
    }

    #[test]
    fn removed_and_disabled_never_fire() {
        let mut w = Waypoints::new();
        let a = w.add(100.0);
        let b = w.add(200.0);
        w.update(0.0);

        assert!(w.remove(a));
        assert!(!w.remove(a));
        w.set_enabled(b, false);
        assert!(w.update(300.0).is_empty());
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn rebase_suppresses_the_next_jump() {
        let mut w = Waypoints::new();
        w.add(100.0);
        w.update(0.0);
        w.rebase();
        assert!(w.update(500.0).is_empty());
        assert_eq!(w.update(0.0).len(), 1);
    }
}
