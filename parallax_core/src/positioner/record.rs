// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Particle and background records and their projection math.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Size, Vec2};

use crate::layout::{BackgroundPosition, ElementId, InlinePosition, Viewport};

/// Which axes a positioner moves along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Axes {
    /// Horizontal axis enabled.
    pub horizontal: bool,
    /// Vertical axis enabled.
    pub vertical: bool,
}

impl Axes {
    /// Both axes.
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };
}

/// Baseline inputs for one axis of the parallax formula.
#[derive(Clone, Copy, Debug)]
struct AxisInput {
    scroll: f64,
    offset: f64,
    viewport_offset: f64,
    start_position: f64,
    start_offset: f64,
    parent_offset: f64,
}

/// `(scroll + offset + viewportOffset + startPos - startOffset + parentOffset)
/// * -(ratio + fixedAdj - 1) + startPos`
fn particle_axis(input: AxisInput, ratio: f64, fixed: bool) -> f64 {
    let fixed_adj = if fixed { 1.0 } else { 0.0 };
    (input.scroll + input.offset + input.viewport_offset + input.start_position
        - input.start_offset
        + input.parent_offset)
        * -(ratio + fixed_adj - 1.0)
        + input.start_position
}

/// A tracked element whose box is moved.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// The tracked element.
    pub element: ElementId,
    /// Nearest ancestor marked as offset parent, if any.
    pub offset_parent: Option<ElementId>,
    /// Parallax ratio (`1` moves with the page, `0` stays put on screen).
    pub ratio: f64,
    /// Whether the element is `position: fixed`.
    pub fixed: bool,
    /// Horizontal and vertical offsets added to the scroll.
    pub offset: Vec2,
    /// Position relative to the layout offset parent at scan time.
    pub start_position: Point,
    /// Document offset (minus margin) at scan time.
    pub start_offset: Point,
    /// Accumulated ancestor positions below the offset parent.
    pub parent_offset: Vec2,
    /// Outer size including margins.
    pub size: Size,
    /// Inline styles to restore on reset.
    pub original: InlinePosition,
    pub(crate) hidden: bool,
    pub(crate) current: Point,
}

impl Particle {
    /// Returns whether the particle is currently hidden by distance culling.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns the last position handed to the presenter (the starting
    /// position before any move).
    #[must_use]
    pub fn position(&self) -> Point {
        self.current
    }

    /// Returns the translation of the current position from the start.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.current - self.start_position
    }

    /// Computes the position for `scroll`. Disabled axes keep the starting
    /// position.
    #[must_use]
    pub fn project(&self, scroll: Point, viewport: &Viewport, axes: Axes) -> Point {
        let x = if axes.horizontal {
            particle_axis(
                AxisInput {
                    scroll: scroll.x,
                    offset: self.offset.x,
                    viewport_offset: viewport.offset.x,
                    start_position: self.start_position.x,
                    start_offset: self.start_offset.x,
                    parent_offset: self.parent_offset.x,
                },
                self.ratio,
                self.fixed,
            )
        } else {
            self.start_position.x
        };
        let y = if axes.vertical {
            particle_axis(
                AxisInput {
                    scroll: scroll.y,
                    offset: self.offset.y,
                    viewport_offset: viewport.offset.y,
                    start_position: self.start_position.y,
                    start_offset: self.start_offset.y,
                    parent_offset: self.parent_offset.y,
                },
                self.ratio,
                self.fixed,
            )
        } else {
            self.start_position.y
        };
        Point::new(x, y)
    }

    /// Converts a projected position into a document offset.
    #[must_use]
    pub fn projected_offset(&self, position: Point) -> Point {
        position - self.start_position + self.start_offset.to_vec2()
    }

    /// Returns whether the particle at `position` intersects the viewport.
    ///
    /// Fixed particles are tested against the unscrolled viewport. Disabled
    /// axes always count as visible.
    #[must_use]
    pub fn is_visible(&self, position: Point, scroll: Point, viewport: &Viewport, axes: Axes) -> bool {
        let offset = self.projected_offset(position);
        let base = if self.fixed { Point::ZERO } else { scroll };
        let horizontal = !axes.horizontal
            || (offset.x + self.size.width > base.x
                && offset.x < base.x + viewport.size.width + viewport.offset.x);
        let vertical = !axes.vertical
            || (offset.y + self.size.height > base.y
                && offset.y < base.y + viewport.size.height + viewport.offset.y);
        horizontal && vertical
    }
}

/// One axis of a background position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundAxis {
    /// A computed pixel value.
    Px(f64),
    /// The original CSS value (axis disabled).
    Start,
}

/// A tracked element whose background image is moved.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    /// The tracked element.
    pub element: ElementId,
    /// Nearest ancestor marked as offset parent, if any.
    pub offset_parent: Option<ElementId>,
    /// Parallax ratio.
    pub ratio: f64,
    /// Whether the background is `background-attachment: fixed`.
    pub fixed: bool,
    /// Horizontal and vertical offsets added to the scroll.
    pub offset: Vec2,
    /// Position relative to the layout offset parent at scan time.
    pub start_position: Point,
    /// Document offset (minus margin and scan-time scroll).
    pub start_offset: Point,
    /// Accumulated ancestor positions below the offset parent.
    pub parent_offset: Vec2,
    /// Original CSS background position, restored on reset.
    pub start_value: BackgroundPosition,
    /// Numeric reading of [`start_value`](Self::start_value).
    pub start_background: Vec2,
    pub(crate) current: Option<(BackgroundAxis, BackgroundAxis)>,
}

impl Background {
    /// Computes the background position for `scroll`.
    #[must_use]
    pub fn project(
        &self,
        scroll: Point,
        viewport: &Viewport,
        axes: Axes,
    ) -> (BackgroundAxis, BackgroundAxis) {
        let fixed_adj = if self.fixed { 0.0 } else { 1.0 };
        let factor = fixed_adj - self.ratio;
        let x = if axes.horizontal {
            BackgroundAxis::Px(
                (scroll.x + self.offset.x - viewport.offset.x - self.start_offset.x
                    + self.parent_offset.x
                    - self.start_background.x)
                    * factor,
            )
        } else {
            BackgroundAxis::Start
        };
        let y = if axes.vertical {
            BackgroundAxis::Px(
                (scroll.y + self.offset.y - viewport.offset.y - self.start_offset.y
                    + self.parent_offset.y
                    - self.start_background.y)
                    * factor,
            )
        } else {
            BackgroundAxis::Start
        };
        (x, y)
    }

    /// Returns the last projected value, if the background has been
    /// repositioned since the scan.
    #[must_use]
    pub fn current(&self) -> Option<(BackgroundAxis, BackgroundAxis)> {
        self.current
    }

    /// Returns the CSS `background-position` value to write, or the original
    /// value if the background has not been repositioned yet.
    #[must_use]
    pub fn css_position(&self) -> String {
        match self.current {
            Some((x, y)) => format!("{} {}", self.axis_css(x, true), self.axis_css(y, false)),
            None => format!("{} {}", self.start_value.x, self.start_value.y),
        }
    }

    /// Returns the CSS value for one axis.
    #[must_use]
    pub fn axis_css(&self, axis: BackgroundAxis, horizontal: bool) -> String {
        match axis {
            BackgroundAxis::Px(v) => crate::css::px(v),
            BackgroundAxis::Start if horizontal => self.start_value.x.clone(),
            BackgroundAxis::Start => self.start_value.y.clone(),
        }
    }
}
