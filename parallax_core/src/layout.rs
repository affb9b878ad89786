// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page geometry contract.
//!
//! The positioner never touches a document directly. Everything it needs to
//! know about the page (which elements are tagged, where they sit, how big
//! the viewport is, where it is scrolled to) is read through a
//! [`LayoutProvider`]. Backends implement it over the DOM; tests implement it
//! over an in-memory page.
//!
//! Per-element configuration is described by an [`ElementDescriptor`], a
//! typed view of what a page expresses with data attributes.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Size, Vec2};

use crate::claims::TrackKind;

/// An opaque reference to a page element.
///
/// Layout providers assign these and map them back to their own element
/// handles. Core code passes them through without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Typed per-element parallax settings.
///
/// `None` means "not specified"; offsets then fall back to the nearest
/// offset-parent ancestor and finally to the positioner-wide value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementDescriptor {
    /// Parallax ratio for the requested [`TrackKind`] (defaults to `1`).
    pub ratio: Option<f64>,
    /// Horizontal offset override.
    pub horizontal_offset: Option<f64>,
    /// Vertical offset override.
    pub vertical_offset: Option<f64>,
    /// Whether this element acts as the offset parent for tracked
    /// descendants.
    pub offset_parent: bool,
}

impl ElementDescriptor {
    /// Returns the ratio, defaulting to `1` and coercing non-finite values
    /// to `0`.
    #[must_use]
    pub fn ratio_or_default(&self) -> f64 {
        self.ratio.map_or(1.0, crate::css::finite_or_zero)
    }
}

/// Inline position styles captured before the positioner touches an element.
///
/// Empty strings mean "not set inline"; presenters restore them by removing
/// the property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlinePosition {
    /// Inline `left` value.
    pub left: String,
    /// Inline `top` value.
    pub top: String,
    /// Inline `transform` value.
    pub transform: String,
}

/// Computed `background-position` of an element, split per axis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackgroundPosition {
    /// Horizontal component (e.g. `"0%"`, `"12px"`, `"left"`).
    pub x: String,
    /// Vertical component.
    pub y: String,
}

impl BackgroundPosition {
    /// Creates a position from its two components.
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Viewport geometry of the element that frames the scrolling content.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Visible width and height.
    pub size: Size,
    /// Document offset of the viewport element (zero for the window).
    pub offset: Point,
}

impl Viewport {
    /// Creates a viewport at the document origin.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            offset: Point::ZERO,
        }
    }

    /// Returns the same viewport moved to `offset`.
    #[must_use]
    pub const fn with_offset(self, offset: Point) -> Self {
        Self {
            size: self.size,
            offset,
        }
    }
}

/// Read access to page geometry, plus scroll control.
///
/// Methods that may need to assign new [`ElementId`]s take `&mut self`.
/// Implementations should degrade instead of failing: a missing style or
/// unparsable value is reported as zero or an empty string.
pub trait LayoutProvider {
    /// Returns the elements carrying a ratio annotation for `kind`, in
    /// document order.
    fn tagged(&mut self, kind: TrackKind) -> Vec<ElementId>;

    /// Returns the typed settings of `element`. The ratio is the one that
    /// applies to `kind`.
    fn descriptor(&self, element: ElementId, kind: TrackKind) -> ElementDescriptor;

    /// Returns the border-box origin of `element` in document coordinates.
    fn offset(&self, element: ElementId) -> Point;

    /// Returns the position of `element` relative to its layout offset
    /// parent, excluding its own margin.
    fn position(&self, element: ElementId) -> Point;

    /// Returns the left and top margins of `element` (`auto` is zero).
    fn margin(&self, element: ElementId) -> Vec2;

    /// Returns the size of `element` including its margins.
    fn outer_size(&self, element: ElementId) -> Size;

    /// Returns whether `element` is fixed for `kind`: `position: fixed` for
    /// elements, `background-attachment: fixed` for backgrounds.
    fn is_fixed(&self, element: ElementId, kind: TrackKind) -> bool;

    /// Returns the ancestors of `element` up to and including the nearest one
    /// marked as an offset parent, nearest first.
    ///
    /// Returns an empty list when no ancestor is marked. Ancestors above the
    /// offset parent are never needed, so providers may stop walking there.
    fn offset_parent_path(&mut self, element: ElementId) -> Vec<ElementId>;

    /// Returns the inline position styles of `element`.
    fn inline_position(&self, element: ElementId) -> InlinePosition;

    /// Returns the computed background position of `element`.
    fn background_position(&self, element: ElementId) -> BackgroundPosition;

    /// Returns the current viewport geometry.
    fn viewport(&self) -> Viewport;

    /// Returns the current scroll offset of the scrolling element.
    fn scroll(&self) -> Point;

    /// Scrolls the scrolling element. Providers whose scroll offset is not
    /// writable ignore this.
    fn set_scroll(&mut self, scroll: Point);
}
