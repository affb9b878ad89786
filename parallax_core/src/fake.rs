// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory page for tests.
//!
//! [`FakePage`] holds a flat element table behind `Rc<RefCell<_>>` so that a
//! [`FakeLayout`] and a [`FakePresenter`] can be borrowed mutably at the same
//! time, as [`Positioner::refresh`] requires.
//!
//! Geometry model: each element has a layout position relative to its
//! parent. Inline `left`/`top` replace that position per axis and an inline
//! `translate3d` is added on top. The document offset is the parent's
//! offset plus position plus margin.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Size, Vec2};

use crate::backend::Presenter;
use crate::claims::TrackKind;
use crate::config::PositionProperty;
use crate::css;
use crate::layout::{
    BackgroundPosition, ElementDescriptor, ElementId, InlinePosition, LayoutProvider, Viewport,
};
use crate::positioner::{ParallaxChanges, Positioner, ResetSnapshot};

/// Builder and state for one element.
#[derive(Clone, Debug)]
pub(crate) struct FakeElement {
    pub(crate) parent: Option<ElementId>,
    pub(crate) base: Point,
    pub(crate) margin: Vec2,
    pub(crate) size: Size,
    pub(crate) descriptor: ElementDescriptor,
    pub(crate) background_ratio: Option<f64>,
    pub(crate) fixed: bool,
    pub(crate) inline: InlinePosition,
    pub(crate) background: BackgroundPosition,
    pub(crate) displayed: bool,
}

impl FakeElement {
    /// An untagged element.
    pub(crate) fn plain() -> Self {
        Self {
            parent: None,
            base: Point::ZERO,
            margin: Vec2::ZERO,
            size: Size::new(100.0, 50.0),
            descriptor: ElementDescriptor::default(),
            background_ratio: None,
            fixed: false,
            inline: InlinePosition::default(),
            background: BackgroundPosition::new("0%", "0%"),
            displayed: true,
        }
    }

    /// An element tagged with an element ratio.
    pub(crate) fn particle(ratio: f64) -> Self {
        let mut el = Self::plain();
        el.descriptor.ratio = Some(ratio);
        el
    }

    /// An element tagged with a background ratio.
    pub(crate) fn background(ratio: f64, x: &str, y: &str) -> Self {
        let mut el = Self::plain();
        el.background_ratio = Some(ratio);
        el.background = BackgroundPosition::new(x, y);
        el
    }

    pub(crate) fn at(mut self, position: Point) -> Self {
        self.base = position;
        self
    }

    pub(crate) fn with_margin(mut self, margin: Vec2) -> Self {
        self.margin = margin;
        self
    }

    pub(crate) fn sized(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub(crate) fn with_descriptor(mut self, descriptor: ElementDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub(crate) fn with_inline(mut self, inline: InlinePosition) -> Self {
        self.inline = inline;
        self
    }

    pub(crate) fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub(crate) fn child_of(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Debug)]
struct FakeDom {
    elements: Vec<FakeElement>,
    viewport: Viewport,
    scroll: Point,
    scroll_log: Vec<Point>,
    writes: usize,
}

impl FakeDom {
    fn el(&self, id: ElementId) -> &FakeElement {
        &self.elements[id.0 as usize]
    }

    fn position(&self, id: ElementId) -> Point {
        let el = self.el(id);
        let x = css::parse_leading_int(&el.inline.left).unwrap_or(el.base.x);
        let y = css::parse_leading_int(&el.inline.top).unwrap_or(el.base.y);
        Point::new(x, y) + translate3d(&el.inline.transform)
    }

    fn offset(&self, id: ElementId) -> Point {
        let el = self.el(id);
        let parent = el.parent.map_or(Point::ZERO, |p| self.offset(p));
        parent + self.position(id).to_vec2() + el.margin
    }
}

/// Reads the translation out of a `translate3d(xpx, ypx, 0)` inline value.
fn translate3d(transform: &str) -> Vec2 {
    let Some(body) = transform
        .strip_prefix("translate3d(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Vec2::ZERO;
    };
    let mut parts = body.split(',').map(|p| css::px_or_zero(p.trim()));
    Vec2::new(parts.next().unwrap_or(0.0), parts.next().unwrap_or(0.0))
}

/// An in-memory page.
#[derive(Debug)]
pub(crate) struct FakePage {
    dom: Rc<RefCell<FakeDom>>,
}

impl FakePage {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            dom: Rc::new(RefCell::new(FakeDom {
                elements: Vec::new(),
                viewport: Viewport::new(width, height),
                scroll: Point::ZERO,
                scroll_log: Vec::new(),
                writes: 0,
            })),
        }
    }

    pub(crate) fn add(&mut self, element: FakeElement) -> ElementId {
        let mut dom = self.dom.borrow_mut();
        let id = ElementId(u32::try_from(dom.elements.len()).expect("fits in u32"));
        dom.elements.push(element);
        id
    }

    pub(crate) fn layout(&self) -> FakeLayout {
        FakeLayout {
            dom: Rc::clone(&self.dom),
        }
    }

    pub(crate) fn presenter(&self) -> FakePresenter {
        FakePresenter {
            dom: Rc::clone(&self.dom),
        }
    }

    pub(crate) fn set_scroll(&mut self, scroll: Point) {
        self.dom.borrow_mut().scroll = scroll;
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.dom.borrow_mut().viewport = viewport;
    }

    pub(crate) fn element(&self, id: ElementId) -> FakeElement {
        self.dom.borrow().el(id).clone()
    }

    pub(crate) fn position(&self, id: ElementId) -> Point {
        self.dom.borrow().position(id)
    }

    pub(crate) fn scroll_log(&self) -> Vec<Point> {
        self.dom.borrow().scroll_log.clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.dom.borrow().writes
    }
}

/// [`LayoutProvider`] view of a [`FakePage`].
#[derive(Debug)]
pub(crate) struct FakeLayout {
    dom: Rc<RefCell<FakeDom>>,
}

impl LayoutProvider for FakeLayout {
    fn tagged(&mut self, kind: TrackKind) -> Vec<ElementId> {
        let dom = self.dom.borrow();
        (0_u32..)
            .zip(dom.elements.iter())
            .filter(|(_, el)| match kind {
                TrackKind::Element => el.descriptor.ratio.is_some(),
                TrackKind::Background => el.background_ratio.is_some(),
            })
            .map(|(idx, _)| ElementId(idx))
            .collect()
    }

    fn descriptor(&self, element: ElementId, kind: TrackKind) -> ElementDescriptor {
        let dom = self.dom.borrow();
        let el = dom.el(element);
        match kind {
            TrackKind::Element => el.descriptor,
            TrackKind::Background => ElementDescriptor {
                ratio: el.background_ratio,
                ..el.descriptor
            },
        }
    }

    fn offset(&self, element: ElementId) -> Point {
        self.dom.borrow().offset(element)
    }

    fn position(&self, element: ElementId) -> Point {
        self.dom.borrow().position(element)
    }

    fn margin(&self, element: ElementId) -> Vec2 {
        self.dom.borrow().el(element).margin
    }

    fn outer_size(&self, element: ElementId) -> Size {
        let dom = self.dom.borrow();
        let el = dom.el(element);
        Size::new(
            el.size.width + 2.0 * el.margin.x,
            el.size.height + 2.0 * el.margin.y,
        )
    }

    fn is_fixed(&self, element: ElementId, _kind: TrackKind) -> bool {
        self.dom.borrow().el(element).fixed
    }

    fn offset_parent_path(&mut self, element: ElementId) -> Vec<ElementId> {
        let dom = self.dom.borrow();
        let mut out = Vec::new();
        let mut cursor = dom.el(element).parent;
        while let Some(id) = cursor {
            out.push(id);
            if dom.el(id).descriptor.offset_parent {
                return out;
            }
            cursor = dom.el(id).parent;
        }
        Vec::new()
    }

    fn inline_position(&self, element: ElementId) -> InlinePosition {
        self.dom.borrow().el(element).inline.clone()
    }

    fn background_position(&self, element: ElementId) -> BackgroundPosition {
        self.dom.borrow().el(element).background.clone()
    }

    fn viewport(&self) -> Viewport {
        self.dom.borrow().viewport
    }

    fn scroll(&self) -> Point {
        self.dom.borrow().scroll
    }

    fn set_scroll(&mut self, scroll: Point) {
        let mut dom = self.dom.borrow_mut();
        dom.scroll = scroll;
        dom.scroll_log.push(scroll);
    }
}

/// [`Presenter`] view of a [`FakePage`], writing inline styles the way the
/// DOM presenter does.
#[derive(Debug)]
pub(crate) struct FakePresenter {
    dom: Rc<RefCell<FakeDom>>,
}

impl Presenter for FakePresenter {
    fn apply(&mut self, positioner: &Positioner, changes: &ParallaxChanges) {
        let mut dom = self.dom.borrow_mut();
        let axes = positioner.axes();
        for &idx in &changes.moved {
            let particle = positioner.particle_at(idx);
            let el = &mut dom.elements[particle.element.0 as usize];
            match positioner.config().position_property {
                PositionProperty::Position => {
                    if axes.horizontal {
                        el.inline.left = css::px(particle.position().x);
                    }
                    if axes.vertical {
                        el.inline.top = css::px(particle.position().y);
                    }
                }
                PositionProperty::Transform => {
                    let t = particle.translation();
                    el.inline.transform =
                        alloc::format!("translate3d({}, {}, 0)", css::px(t.x), css::px(t.y));
                }
            }
            dom.writes += 1;
        }
        for &idx in &changes.hidden {
            let element = positioner.particle_at(idx).element;
            dom.elements[element.0 as usize].displayed = false;
            dom.writes += 1;
        }
        for &idx in &changes.unhidden {
            let element = positioner.particle_at(idx).element;
            dom.elements[element.0 as usize].displayed = true;
            dom.writes += 1;
        }
        for &idx in &changes.backgrounds {
            let background = positioner.background_at(idx);
            let (x, y) = match background.current() {
                Some((x, y)) => (background.axis_css(x, true), background.axis_css(y, false)),
                None => (
                    background.start_value.x.clone(),
                    background.start_value.y.clone(),
                ),
            };
            dom.elements[background.element.0 as usize].background = BackgroundPosition::new(x, y);
            dom.writes += 1;
        }
    }

    fn restore(&mut self, snapshot: &ResetSnapshot) {
        let mut dom = self.dom.borrow_mut();
        for particle in &snapshot.particles {
            let el = &mut dom.elements[particle.element.0 as usize];
            el.inline = particle.original.clone();
            el.displayed = true;
        }
        for background in &snapshot.backgrounds {
            dom.elements[background.element.0 as usize].background = background.start_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimRegistry;
    use crate::config::ParallaxConfig;
    use crate::positioner::PositionerState;
    use alloc::string::String;

    fn drive(
        positioner: &mut Positioner,
        presenter: &mut FakePresenter,
        scroll: Point,
    ) -> ParallaxChanges {
        let changes = positioner.reposition(scroll);
        presenter.apply(positioner, &changes);
        changes
    }

    #[test]
    fn memoized_pass_writes_nothing() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        drive(&mut p, &mut presenter, Point::new(0.0, 40.0));
        let before = page.writes();
        let changes = drive(&mut p, &mut presenter, Point::new(0.0, 40.0));
        assert!(changes.memoized);
        assert_eq!(page.writes(), before, "no writes on an unchanged pass");
    }

    #[test]
    fn reset_restores_exact_originals() {
        let mut page = FakePage::new(800.0, 600.0);
        let original = InlinePosition {
            left: String::from("auto"),
            top: String::new(),
            transform: String::from("none"),
        };
        let el = page.add(
            FakeElement::particle(0.3)
                .at(Point::new(0.0, 100.0))
                .with_inline(original.clone()),
        );
        let bg = page.add(FakeElement::background(0.5, "50%", "10px"));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        for y in [10.0, 80.0, 900.0, 35.0] {
            drive(&mut p, &mut presenter, Point::new(0.0, y));
        }
        assert_ne!(page.element(el).inline, original);

        let snapshot = p.reset(&mut claims);
        presenter.restore(&snapshot);
        assert_eq!(page.element(el).inline, original);
        assert!(page.element(el).displayed);
        assert_eq!(page.element(bg).background, BackgroundPosition::new("50%", "10px"));
        assert_eq!(p.state(), PositionerState::Reset);
        assert_eq!(claims.claimed_by(p.id()), 0);
    }

    #[test]
    fn position_property_writes_left_top() {
        let mut page = FakePage::new(800.0, 600.0);
        let el = page.add(FakeElement::particle(0.5).at(Point::new(20.0, 200.0)));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::vertical_only(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        drive(&mut p, &mut presenter, Point::new(0.0, 100.0));
        assert_eq!(page.element(el).inline.top, "250px");
        assert_eq!(page.element(el).inline.left, "", "horizontal axis untouched");
    }

    #[test]
    fn transform_property_writes_translation() {
        let mut page = FakePage::new(800.0, 600.0);
        let el = page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let mut claims = ClaimRegistry::new();
        let config = ParallaxConfig {
            position_property: PositionProperty::Transform,
            ..ParallaxConfig::default()
        };
        let mut p = Positioner::new(config, &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        drive(&mut p, &mut presenter, Point::new(0.0, 100.0));
        assert_eq!(page.element(el).inline.transform, "translate3d(0px, 50px, 0)");
        assert_eq!(page.position(el), Point::new(0.0, 250.0));
    }

    #[test]
    fn refresh_measures_unscrolled_and_restores_scroll() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::background(0.5, "0px", "0px").at(Point::new(0.0, 700.0)));
        page.set_scroll(Point::new(0.0, 300.0));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();

        p.refresh(&mut page.layout(), &mut presenter, &mut claims);
        assert_eq!(page.scroll_log(), [Point::ZERO, Point::new(0.0, 300.0)]);
        assert_eq!(p.backgrounds()[0].start_offset, Point::new(0.0, 700.0));
    }

    #[test]
    fn refresh_after_moves_rescans_original_geometry() {
        let mut page = FakePage::new(800.0, 600.0);
        let el = page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        drive(&mut p, &mut presenter, Point::new(0.0, 100.0));
        assert_eq!(page.position(el), Point::new(0.0, 250.0));

        p.refresh(&mut page.layout(), &mut presenter, &mut claims);
        assert_eq!(p.particle_at(0).start_position, Point::new(0.0, 200.0));
        assert_eq!(claims.claimed_by(p.id()), 1);
    }

    #[test]
    fn resize_refreshes_only_when_responsive() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5));
        let mut claims = ClaimRegistry::new();
        let mut presenter = page.presenter();

        let mut still = Positioner::new(ParallaxConfig::default(), &mut claims);
        still.refresh(&mut page.layout(), &mut presenter, &mut claims);
        page.set_viewport(Viewport::new(400.0, 300.0));
        assert!(still.on_resize(&mut page.layout(), &mut presenter, &mut claims).is_none());
        assert_eq!(still.viewport(), Viewport::new(400.0, 300.0));

        let _ = still.reset(&mut claims);
        let config = ParallaxConfig {
            responsive: true,
            ..ParallaxConfig::default()
        };
        let mut responsive = Positioner::new(config, &mut claims);
        let summary = responsive.on_resize(&mut page.layout(), &mut presenter, &mut claims);
        assert_eq!(summary.map(|s| s.particles), Some(1));
    }

    #[test]
    fn hidden_particle_is_shown_on_restore() {
        let mut page = FakePage::new(800.0, 600.0);
        let el = page.add(FakeElement::particle(1.0).at(Point::new(0.0, 100.0)));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        drive(&mut p, &mut presenter, Point::new(0.0, 1000.0));
        assert!(!page.element(el).displayed);
        let snapshot = p.reset(&mut claims);
        presenter.restore(&snapshot);
        assert!(page.element(el).displayed);
    }

    #[test]
    fn fixed_particle_counter_scrolls() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(
            FakeElement::particle(1.0)
                .fixed()
                .sized(Size::new(100.0, 500.0)),
        );
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut presenter = page.presenter();
        p.refresh(&mut page.layout(), &mut presenter, &mut claims);

        let changes = drive(&mut p, &mut presenter, Point::new(0.0, 100.0));
        assert_eq!(changes.moved, [0]);
        assert_eq!(p.particle_at(0).position().y, -100.0);
    }
}
