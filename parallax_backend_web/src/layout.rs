// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`LayoutProvider`] over the live DOM.
//!
//! Elements opt in with data attributes:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `data-parallax-ratio` | Element ratio (tracked as a particle) |
//! | `data-parallax-background-ratio` | Background ratio |
//! | `data-parallax-horizontal-offset` | Per-element horizontal offset |
//! | `data-parallax-vertical-offset` | Per-element vertical offset |
//! | `data-parallax-offset-parent` | `"true"` marks an offset parent |
//!
//! Particles are searched among the descendants of the content element.
//! Backgrounds additionally include the content element itself.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};
use parallax_core::claims::TrackKind;
use parallax_core::config::ScrollProperty;
use parallax_core::css;
use parallax_core::layout::{
    BackgroundPosition, ElementDescriptor, ElementId, InlinePosition, LayoutProvider, Viewport,
};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Element, EventTarget, HtmlElement, Window};

use crate::elements::DomContext;

const RATIO: &str = "data-parallax-ratio";
const BACKGROUND_RATIO: &str = "data-parallax-background-ratio";
const HORIZONTAL_OFFSET: &str = "data-parallax-horizontal-offset";
const VERTICAL_OFFSET: &str = "data-parallax-vertical-offset";
const OFFSET_PARENT: &str = "data-parallax-offset-parent";

/// Returns the attribute that tags an element for `kind`.
fn ratio_attribute(kind: TrackKind) -> &'static str {
    match kind {
        TrackKind::Element => RATIO,
        TrackKind::Background => BACKGROUND_RATIO,
    }
}

/// The element whose scroll offset drives a positioner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    /// The browser window; tagged elements are searched in `<body>`.
    Window,
    /// A scrolling (or script-moved) container.
    Element(HtmlElement),
}

/// Reads page geometry for one scroll target.
#[derive(Clone, Debug)]
pub struct DomLayout {
    context: DomContext,
    window: Window,
    target: ScrollTarget,
    /// Root of the tagged-element search, and the element whose position,
    /// margin or transform stands in for the scroll offset.
    content: HtmlElement,
    /// `None` measures the window.
    viewport_element: Option<HtmlElement>,
    scroll_property: ScrollProperty,
}

impl DomLayout {
    /// Creates a layout for `target`.
    ///
    /// With a non-native `scroll_property` the content is moved inside its
    /// parent, so the parent frames the viewport; otherwise the target
    /// itself does.
    ///
    /// # Errors
    ///
    /// Fails outside a browser document (no window, document or body).
    pub fn new(
        context: DomContext,
        target: ScrollTarget,
        scroll_property: ScrollProperty,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let (content, viewport_element) = match &target {
            ScrollTarget::Window => {
                let body = document
                    .body()
                    .ok_or_else(|| JsValue::from_str("no body"))?;
                (body, None)
            }
            ScrollTarget::Element(el) if scroll_property.emits_scroll_events() => {
                (el.clone(), Some(el.clone()))
            }
            ScrollTarget::Element(el) => {
                let frame = el
                    .parent_element()
                    .and_then(|p| p.dyn_into::<HtmlElement>().ok())
                    .unwrap_or_else(|| el.clone());
                (el.clone(), Some(frame))
            }
        };

        Ok(Self {
            context,
            window,
            target,
            content,
            viewport_element,
            scroll_property,
        })
    }

    /// Measures the viewport from `element` instead of the default.
    #[must_use]
    pub fn with_viewport_element(mut self, element: HtmlElement) -> Self {
        self.viewport_element = Some(element);
        self
    }

    /// Returns the shared page context.
    #[must_use]
    pub fn context(&self) -> &DomContext {
        &self.context
    }

    /// Returns the scroll target.
    #[must_use]
    pub fn target(&self) -> &ScrollTarget {
        &self.target
    }

    /// Returns the configured scroll property.
    #[must_use]
    pub fn scroll_property(&self) -> ScrollProperty {
        self.scroll_property
    }

    /// Returns where `scroll` events for this target are dispatched.
    #[must_use]
    pub fn scroll_event_target(&self) -> EventTarget {
        match &self.target {
            ScrollTarget::Window => self.window.clone().into(),
            ScrollTarget::Element(el) => el.clone().into(),
        }
    }

    /// Returns the window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    fn element(&self, id: ElementId) -> Option<HtmlElement> {
        self.context.element(id)
    }

    /// Reads one computed style property, or an empty string.
    fn computed(&self, el: &Element, property: &str) -> String {
        self.window
            .get_computed_style(el)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn computed_px(&self, el: &Element, property: &str) -> f64 {
        css::px_or_zero(&self.computed(el, property))
    }

    fn document_offset(&self, el: &Element) -> Point {
        let rect = el.get_bounding_client_rect();
        Point::new(
            rect.left() + self.window.scroll_x().unwrap_or(0.0),
            rect.top() + self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn window_size(&self) -> Size {
        self.window
            .document()
            .and_then(|d| d.document_element())
            .map_or(Size::ZERO, |root| {
                Size::new(f64::from(root.client_width()), f64::from(root.client_height()))
            })
    }

    fn descendants(&self, selector: &str, out: &mut Vec<ElementId>) {
        let Ok(list) = self.content.query_selector_all(selector) else {
            return;
        };
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                out.push(self.context.intern(&el));
            }
        }
    }
}

impl LayoutProvider for DomLayout {
    fn tagged(&mut self, kind: TrackKind) -> Vec<ElementId> {
        let attribute = ratio_attribute(kind);
        let mut found = Vec::new();
        if kind == TrackKind::Background && self.content.has_attribute(attribute) {
            found.push(self.context.intern(&self.content));
        }
        self.descendants(&format!("[{attribute}]"), &mut found);
        found
    }

    fn descriptor(&self, element: ElementId, kind: TrackKind) -> ElementDescriptor {
        let Some(el) = self.element(element) else {
            return ElementDescriptor::default();
        };
        let read = |name: &str| css::attribute_number(el.get_attribute(name).as_deref());
        ElementDescriptor {
            ratio: read(ratio_attribute(kind)),
            horizontal_offset: read(HORIZONTAL_OFFSET),
            vertical_offset: read(VERTICAL_OFFSET),
            offset_parent: is_true(el.get_attribute(OFFSET_PARENT).as_deref()),
        }
    }

    fn offset(&self, element: ElementId) -> Point {
        self.element(element)
            .map_or(Point::ZERO, |el| self.document_offset(&el))
    }

    fn position(&self, element: ElementId) -> Point {
        let Some(el) = self.element(element) else {
            return Point::ZERO;
        };
        let own = el.get_bounding_client_rect();
        let own = Point::new(own.left(), own.top());
        // `offsetLeft`/`offsetTop` round to whole pixels; rects keep fractions.
        let frame = el
            .offset_parent()
            .filter(|parent| !parent.tag_name().eq_ignore_ascii_case("body"));
        let outer = match frame {
            Some(parent) => {
                let rect = parent.get_bounding_client_rect();
                padding_box_offset(
                    own,
                    Point::new(rect.left(), rect.top()),
                    Vec2::new(
                        f64::from(parent.client_left()),
                        f64::from(parent.client_top()),
                    ),
                )
            }
            None => self.document_offset(&el),
        };
        outer - self.margin(element)
    }

    fn margin(&self, element: ElementId) -> Vec2 {
        self.element(element).map_or(Vec2::ZERO, |el| {
            Vec2::new(
                self.computed_px(&el, "margin-left"),
                self.computed_px(&el, "margin-top"),
            )
        })
    }

    fn outer_size(&self, element: ElementId) -> Size {
        self.element(element).map_or(Size::ZERO, |el| {
            let horizontal =
                self.computed_px(&el, "margin-left") + self.computed_px(&el, "margin-right");
            let vertical =
                self.computed_px(&el, "margin-top") + self.computed_px(&el, "margin-bottom");
            Size::new(
                f64::from(el.offset_width()) + horizontal,
                f64::from(el.offset_height()) + vertical,
            )
        })
    }

    fn is_fixed(&self, element: ElementId, kind: TrackKind) -> bool {
        let Some(el) = self.element(element) else {
            return false;
        };
        let property = match kind {
            TrackKind::Element => "position",
            TrackKind::Background => "background-attachment",
        };
        self.computed(&el, property) == "fixed"
    }

    fn offset_parent_path(&mut self, element: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut next = self.element(element).and_then(|el| el.parent_element());
        while let Some(parent) = next {
            next = parent.parent_element();
            let marked = is_true(parent.get_attribute(OFFSET_PARENT).as_deref());
            if let Ok(parent) = parent.dyn_into::<HtmlElement>() {
                path.push(parent);
            }
            if marked {
                return path.iter().map(|el| self.context.intern(el)).collect();
            }
        }
        Vec::new()
    }

    fn inline_position(&self, element: ElementId) -> InlinePosition {
        let Some(el) = self.element(element) else {
            return InlinePosition::default();
        };
        let style = el.style();
        let read = |name: &str| style.get_property_value(name).unwrap_or_default();
        InlinePosition {
            left: read("left"),
            top: read("top"),
            transform: read("transform"),
        }
    }

    fn background_position(&self, element: ElementId) -> BackgroundPosition {
        let Some(el) = self.element(element) else {
            return BackgroundPosition::default();
        };
        let x = self.computed(&el, "background-position-x");
        let y = self.computed(&el, "background-position-y");
        if x.is_empty() || y.is_empty() {
            split_background_position(&self.computed(&el, "background-position"))
        } else {
            BackgroundPosition::new(x, y)
        }
    }

    fn viewport(&self) -> Viewport {
        match &self.viewport_element {
            None => {
                let size = self.window_size();
                Viewport::new(size.width, size.height)
            }
            Some(el) => {
                let width = f64::from(el.client_width())
                    - self.computed_px(el, "padding-left")
                    - self.computed_px(el, "padding-right");
                let height = f64::from(el.client_height())
                    - self.computed_px(el, "padding-top")
                    - self.computed_px(el, "padding-bottom");
                Viewport::new(width.max(0.0), height.max(0.0))
                    .with_offset(self.document_offset(el))
            }
        }
    }

    fn scroll(&self) -> Point {
        match self.scroll_property {
            ScrollProperty::Scroll => match &self.target {
                ScrollTarget::Window => Point::new(
                    self.window.scroll_x().unwrap_or(0.0),
                    self.window.scroll_y().unwrap_or(0.0),
                ),
                ScrollTarget::Element(el) => {
                    Point::new(f64::from(el.scroll_left()), f64::from(el.scroll_top()))
                }
            },
            ScrollProperty::Position => Point::new(
                -self.computed_px(&self.content, "left"),
                -self.computed_px(&self.content, "top"),
            ),
            ScrollProperty::Margin => Point::new(
                -self.computed_px(&self.content, "margin-left"),
                -self.computed_px(&self.content, "margin-top"),
            ),
            ScrollProperty::Transform => {
                css::parse_translation(&self.computed(&self.content, "transform"))
                    .map_or(Point::ZERO, |t| Point::new(-t.x, -t.y))
            }
        }
    }

    fn set_scroll(&mut self, scroll: Point) {
        if !self.scroll_property.emits_scroll_events() {
            return;
        }
        match &self.target {
            ScrollTarget::Window => self.window.scroll_to_with_x_and_y(scroll.x, scroll.y),
            ScrollTarget::Element(el) => el.scroll_to_with_x_and_y(scroll.x, scroll.y),
        }
    }
}

/// Attribute booleans follow data-attribute conventions: only `"true"` is
/// true.
fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "true")
}

/// Offset of an element's border box from its frame's padding box, given
/// both boxes' viewport-relative corners and the frame's border widths.
fn padding_box_offset(own: Point, frame: Point, border: Vec2) -> Point {
    (own - frame - border).to_point()
}

/// Splits a shorthand `background-position` into its two components.
///
/// Only the first layer is used. A single keyword or length applies to the
/// horizontal axis and centers the vertical one.
fn split_background_position(value: &str) -> BackgroundPosition {
    let first_layer = value.split(',').next().unwrap_or_default();
    let mut parts = first_layer.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(x), Some(y)) => BackgroundPosition::new(x, y),
        (Some(x), None) => BackgroundPosition::new(x, "center"),
        _ => BackgroundPosition::new("0%", "0%"),
    }
}
