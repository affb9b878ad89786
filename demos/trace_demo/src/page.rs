// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flat in-memory page: absolutely positioned boxes in one scrolling
//! document, no nesting.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use parallax_core::backend::Presenter;
use parallax_core::claims::TrackKind;
use parallax_core::config::PositionProperty;
use parallax_core::css;
use parallax_core::layout::{
    BackgroundPosition, ElementDescriptor, ElementId, InlinePosition, LayoutProvider, Viewport,
};
use parallax_core::positioner::{ParallaxChanges, Positioner, ResetSnapshot};

#[derive(Clone, Debug)]
struct Block {
    origin: Point,
    size: Size,
    ratio: Option<f64>,
    background_ratio: Option<f64>,
    inline: InlinePosition,
    background: BackgroundPosition,
    displayed: bool,
}

impl Block {
    /// Layout position: inline `left`/`top` win over the stylesheet origin.
    fn position(&self) -> Point {
        Point::new(
            css::parse_leading_int(&self.inline.left).unwrap_or(self.origin.x),
            css::parse_leading_int(&self.inline.top).unwrap_or(self.origin.y),
        )
    }
}

#[derive(Debug)]
struct PageState {
    blocks: Vec<Block>,
    viewport: Viewport,
    scroll: Point,
}

/// Shared page state with a layout and a presenter view.
#[derive(Clone, Debug)]
pub(crate) struct Page {
    state: Rc<RefCell<PageState>>,
}

impl Page {
    pub(crate) fn new(viewport: Viewport) -> Self {
        Self {
            state: Rc::new(RefCell::new(PageState {
                blocks: Vec::new(),
                viewport,
                scroll: Point::ZERO,
            })),
        }
    }

    fn push(&self, block: Block) -> ElementId {
        let mut state = self.state.borrow_mut();
        state.blocks.push(block);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the demo page holds a handful of blocks"
        )]
        let idx = (state.blocks.len() - 1) as u32;
        ElementId(idx)
    }

    /// Adds a box tagged with an element ratio.
    pub(crate) fn particle(&self, origin: Point, size: Size, ratio: f64) -> ElementId {
        self.push(Block {
            origin,
            size,
            ratio: Some(ratio),
            background_ratio: None,
            inline: InlinePosition::default(),
            background: BackgroundPosition::new("0%", "0%"),
            displayed: true,
        })
    }

    /// Adds a full-width section tagged with a background ratio.
    pub(crate) fn section(&self, top: f64, height: f64, ratio: f64) -> ElementId {
        let width = self.state.borrow().viewport.size.width;
        self.push(Block {
            origin: Point::new(0.0, top),
            size: Size::new(width, height),
            ratio: None,
            background_ratio: Some(ratio),
            inline: InlinePosition::default(),
            background: BackgroundPosition::new("50%", "0px"),
            displayed: true,
        })
    }

    pub(crate) fn set_scroll(&self, scroll: Point) {
        self.state.borrow_mut().scroll = scroll;
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Number of blocks currently hidden by culling.
    pub(crate) fn hidden_count(&self) -> usize {
        self.state
            .borrow()
            .blocks
            .iter()
            .filter(|b| !b.displayed)
            .count()
    }

    /// Returns whether every block is back at its stylesheet position.
    pub(crate) fn is_pristine(&self) -> bool {
        self.state.borrow().blocks.iter().all(|b| {
            b.displayed && b.inline == InlinePosition::default() && b.position() == b.origin
        })
    }

    pub(crate) fn layout(&self) -> PageLayout {
        PageLayout { page: self.clone() }
    }

    pub(crate) fn presenter(&self) -> PagePresenter {
        PagePresenter { page: self.clone() }
    }

    fn with_block<R>(&self, id: ElementId, default: R, f: impl FnOnce(&Block) -> R) -> R {
        self.state
            .borrow()
            .blocks
            .get(id.0 as usize)
            .map_or(default, f)
    }
}

/// [`LayoutProvider`] view of a [`Page`].
#[derive(Debug)]
pub(crate) struct PageLayout {
    page: Page,
}

impl LayoutProvider for PageLayout {
    fn tagged(&mut self, kind: TrackKind) -> Vec<ElementId> {
        let state = self.page.state.borrow();
        (0_u32..)
            .zip(&state.blocks)
            .filter(|(_, b)| match kind {
                TrackKind::Element => b.ratio.is_some(),
                TrackKind::Background => b.background_ratio.is_some(),
            })
            .map(|(idx, _)| ElementId(idx))
            .collect()
    }

    fn descriptor(&self, element: ElementId, kind: TrackKind) -> ElementDescriptor {
        self.page
            .with_block(element, ElementDescriptor::default(), |b| ElementDescriptor {
                ratio: match kind {
                    TrackKind::Element => b.ratio,
                    TrackKind::Background => b.background_ratio,
                },
                ..ElementDescriptor::default()
            })
    }

    fn offset(&self, element: ElementId) -> Point {
        self.page.with_block(element, Point::ZERO, Block::position)
    }

    fn position(&self, element: ElementId) -> Point {
        self.page.with_block(element, Point::ZERO, Block::position)
    }

    fn margin(&self, _element: ElementId) -> Vec2 {
        Vec2::ZERO
    }

    fn outer_size(&self, element: ElementId) -> Size {
        self.page.with_block(element, Size::ZERO, |b| b.size)
    }

    fn is_fixed(&self, _element: ElementId, _kind: TrackKind) -> bool {
        false
    }

    fn offset_parent_path(&mut self, _element: ElementId) -> Vec<ElementId> {
        Vec::new()
    }

    fn inline_position(&self, element: ElementId) -> InlinePosition {
        self.page
            .with_block(element, InlinePosition::default(), |b| b.inline.clone())
    }

    fn background_position(&self, element: ElementId) -> BackgroundPosition {
        self.page
            .with_block(element, BackgroundPosition::default(), |b| {
                b.background.clone()
            })
    }

    fn viewport(&self) -> Viewport {
        self.page.state.borrow().viewport
    }

    fn scroll(&self) -> Point {
        self.page.state.borrow().scroll
    }

    fn set_scroll(&mut self, scroll: Point) {
        self.page.set_scroll(scroll);
    }
}

/// [`Presenter`] view of a [`Page`].
#[derive(Debug)]
pub(crate) struct PagePresenter {
    page: Page,
}

impl Presenter for PagePresenter {
    fn apply(&mut self, positioner: &Positioner, changes: &ParallaxChanges) {
        let mut state = self.page.state.borrow_mut();
        let axes = positioner.axes();

        for &idx in &changes.hidden {
            let particle = positioner.particle_at(idx);
            state.blocks[particle.element.0 as usize].displayed = false;
        }
        for &idx in &changes.unhidden {
            let particle = positioner.particle_at(idx);
            state.blocks[particle.element.0 as usize].displayed = true;
        }
        for &idx in &changes.moved {
            let particle = positioner.particle_at(idx);
            let block = &mut state.blocks[particle.element.0 as usize];
            let position = particle.position();
            match positioner.config().position_property {
                PositionProperty::Position => {
                    if axes.horizontal {
                        block.inline.left = css::px(position.x);
                    }
                    if axes.vertical {
                        block.inline.top = css::px(position.y);
                    }
                }
                PositionProperty::Transform => {
                    let t = particle.translation();
                    block.inline.transform =
                        format!("translate3d({}, {}, 0)", css::px(t.x), css::px(t.y));
                }
            }
        }
        for &idx in &changes.backgrounds {
            let background = positioner.background_at(idx);
            if let Some((x, y)) = background.current() {
                state.blocks[background.element.0 as usize].background = BackgroundPosition::new(
                    background.axis_css(x, true),
                    background.axis_css(y, false),
                );
            }
        }
    }

    fn restore(&mut self, snapshot: &ResetSnapshot) {
        let mut state = self.page.state.borrow_mut();
        for particle in &snapshot.particles {
            let block = &mut state.blocks[particle.element.0 as usize];
            block.inline = particle.original.clone();
            block.displayed = true;
        }
        for background in &snapshot.backgrounds {
            state.blocks[background.element.0 as usize].background =
                background.start_value.clone();
        }
    }
}
