// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioner configuration.

use alloc::rc::Rc;
use core::fmt;

/// How the scroll offset of the scrolling element is read.
///
/// Besides native scrolling, content can be "scrolled" by moving it with
/// `left`/`top`, margins, or a transform; the scroll offset is then the
/// negated displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollProperty {
    /// Native `scrollLeft` / `scrollTop` (driven by scroll events).
    #[default]
    Scroll,
    /// Negated `left` / `top` of the content element.
    Position,
    /// Negated `margin-left` / `margin-top` of the content element.
    Margin,
    /// Negated translation of the content element's transform.
    Transform,
}

impl ScrollProperty {
    /// Returns whether scroll events are emitted for this property.
    ///
    /// The other properties change silently, so backends poll them every
    /// animation frame instead.
    #[must_use]
    pub const fn emits_scroll_events(self) -> bool {
        matches!(self, Self::Scroll)
    }
}

/// How a particle's new position is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PositionProperty {
    /// Write `left` / `top` for each enabled axis.
    #[default]
    Position,
    /// Write a `translate3d` relative to the starting position.
    Transform,
}

/// Source of a positioner-wide offset.
#[derive(Clone)]
pub enum OffsetSource {
    /// A constant offset.
    Fixed(f64),
    /// An offset recomputed on every refresh and resize.
    Dynamic(Rc<dyn Fn() -> f64>),
}

impl OffsetSource {
    /// Creates a dynamic source from a callback.
    pub fn dynamic(f: impl Fn() -> f64 + 'static) -> Self {
        Self::Dynamic(Rc::new(f))
    }

    /// Evaluates the source, coercing non-finite results to `0`.
    #[must_use]
    pub fn resolve(&self) -> f64 {
        let value = match self {
            Self::Fixed(v) => *v,
            Self::Dynamic(f) => f(),
        };
        crate::css::finite_or_zero(value)
    }

    /// Returns whether the source must be re-evaluated on resize.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl Default for OffsetSource {
    fn default() -> Self {
        Self::Fixed(0.0)
    }
}

impl fmt::Debug for OffsetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Configuration for a [`Positioner`](crate::positioner::Positioner).
#[derive(Clone, Debug)]
pub struct ParallaxConfig {
    /// Reposition along the horizontal axis.
    pub horizontal_scrolling: bool,
    /// Reposition along the vertical axis.
    pub vertical_scrolling: bool,
    /// Offset added to the horizontal scroll for every element that does not
    /// override it.
    pub horizontal_offset: OffsetSource,
    /// Offset added to the vertical scroll for every element that does not
    /// override it.
    pub vertical_offset: OffsetSource,
    /// Rescan all elements on resize and window load.
    pub responsive: bool,
    /// Track elements tagged with an element ratio.
    pub parallax_elements: bool,
    /// Track elements tagged with a background ratio.
    pub parallax_backgrounds: bool,
    /// Hide particles whose projected box lies outside the viewport.
    pub hide_distant_elements: bool,
    /// How the scroll offset is read.
    pub scroll_property: ScrollProperty,
    /// How particle positions are written.
    pub position_property: PositionProperty,
}

impl ParallaxConfig {
    /// Both axes, every feature on, no offsets, native scrolling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            horizontal_scrolling: true,
            vertical_scrolling: true,
            horizontal_offset: OffsetSource::Fixed(0.0),
            vertical_offset: OffsetSource::Fixed(0.0),
            responsive: false,
            parallax_elements: true,
            parallax_backgrounds: true,
            hide_distant_elements: true,
            scroll_property: ScrollProperty::Scroll,
            position_property: PositionProperty::Position,
        }
    }

    /// Vertical-only parallax, the common case for long pages.
    #[must_use]
    pub const fn vertical_only() -> Self {
        let mut config = Self::new();
        config.horizontal_scrolling = false;
        config
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self::new()
    }
}
