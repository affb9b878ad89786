// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanning tagged elements into records.
//!
//! Geometry is read as-is: callers that want unscrolled measurements go
//! through [`Positioner::refresh`], which scrolls to the origin first.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::record::{Background, Particle};
use super::{Positioner, PositionerState, ScanSummary};
use crate::claims::{ClaimRegistry, TrackKind};
use crate::css::{finite_or_zero, parse_leading_int};
use crate::layout::{ElementId, LayoutProvider};

/// Geometry shared by both record kinds.
struct Anchor {
    offset_parent: Option<ElementId>,
    parent_offset: Vec2,
    offset: Vec2,
}

impl Positioner {
    /// Records every tagged element that no other positioner owns.
    ///
    /// Any records from a previous scan are dropped (their claims released)
    /// without touching the page. The memo is cleared so the next
    /// [`reposition`](Self::reposition) runs in full.
    pub fn scan<L: LayoutProvider + ?Sized>(
        &mut self,
        layout: &mut L,
        claims: &mut ClaimRegistry,
    ) -> ScanSummary {
        claims.release_all(self.id());
        self.particles.clear();
        self.backgrounds.clear();
        self.dirty = DirtyTracker::with_cycle_handling(CycleHandling::Error);
        self.invalidate();

        let mut summary = ScanSummary::default();
        if self.config().parallax_elements {
            self.scan_particles(layout, claims, &mut summary);
        }
        if self.config().parallax_backgrounds {
            self.scan_backgrounds(layout, claims, &mut summary);
        }
        self.set_state(PositionerState::Scanned);
        summary
    }

    fn scan_particles<L: LayoutProvider + ?Sized>(
        &mut self,
        layout: &mut L,
        claims: &mut ClaimRegistry,
        summary: &mut ScanSummary,
    ) {
        for element in layout.tagged(TrackKind::Element) {
            if !claims.claim(element, TrackKind::Element, self.id()) {
                summary.skipped += 1;
                continue;
            }
            let descriptor = layout.descriptor(element, TrackKind::Element);
            let anchor = self.anchor(layout, element);
            let margin = layout.margin(element);
            let start_position = layout.position(element);
            let start_offset = layout.offset(element) - margin;

            self.particles.push(Particle {
                element,
                offset_parent: anchor.offset_parent,
                ratio: descriptor.ratio_or_default(),
                fixed: layout.is_fixed(element, TrackKind::Element),
                offset: anchor.offset,
                start_position,
                start_offset,
                parent_offset: anchor.parent_offset,
                size: layout.outer_size(element),
                original: layout.inline_position(element),
                hidden: false,
                current: start_position,
            });
            summary.particles += 1;
        }
    }

    fn scan_backgrounds<L: LayoutProvider + ?Sized>(
        &mut self,
        layout: &mut L,
        claims: &mut ClaimRegistry,
        summary: &mut ScanSummary,
    ) {
        let scroll = layout.scroll();
        for element in layout.tagged(TrackKind::Background) {
            if !claims.claim(element, TrackKind::Background, self.id()) {
                summary.skipped += 1;
                continue;
            }
            let descriptor = layout.descriptor(element, TrackKind::Background);
            let anchor = self.anchor(layout, element);
            let margin = layout.margin(element);
            let start_value = layout.background_position(element);
            let start_background = Vec2::new(
                parse_leading_int(&start_value.x).unwrap_or(0.0),
                parse_leading_int(&start_value.y).unwrap_or(0.0),
            );

            self.backgrounds.push(Background {
                element,
                offset_parent: anchor.offset_parent,
                ratio: descriptor.ratio_or_default(),
                fixed: layout.is_fixed(element, TrackKind::Background),
                offset: anchor.offset,
                start_position: layout.position(element),
                start_offset: layout.offset(element) - margin - scroll.to_vec2(),
                parent_offset: anchor.parent_offset,
                start_value,
                start_background,
                current: None,
            });
            summary.backgrounds += 1;
        }
    }

    /// Finds the offset parent of `element` and resolves its per-axis
    /// offsets.
    ///
    /// The parent offset is the sum of the positions of the ancestors below
    /// the offset parent.
    fn anchor<L: LayoutProvider + ?Sized>(&self, layout: &mut L, element: ElementId) -> Anchor {
        let path = layout.offset_parent_path(element);
        let mut found = None;
        if let Some((&parent, below)) = path.split_last() {
            let d = layout.descriptor(parent, TrackKind::Element);
            if d.offset_parent {
                let sum = below
                    .iter()
                    .fold(Vec2::ZERO, |sum, &a| sum + layout.position(a).to_vec2());
                found = Some((parent, d, sum));
            }
        }

        let own = layout.descriptor(element, TrackKind::Element);
        let global = self.offsets();
        let (offset_parent, parent_offset, parent_x, parent_y) = match found {
            Some((id, d, sum)) => (Some(id), sum, d.horizontal_offset, d.vertical_offset),
            None => (None, Vec2::ZERO, None, None),
        };
        let x = own.horizontal_offset.or(parent_x).unwrap_or(global.x);
        let y = own.vertical_offset.or(parent_y).unwrap_or(global.y);

        Anchor {
            offset_parent,
            parent_offset,
            offset: Vec2::new(finite_or_zero(x), finite_or_zero(y)),
        }
    }

    /// Returns the elements this positioner tracks, particles first.
    #[must_use]
    pub fn tracked_elements(&self) -> Vec<ElementId> {
        self.particles
            .iter()
            .map(|p| p.element)
            .chain(self.backgrounds.iter().map(|b| b.element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParallaxConfig;
    use crate::fake::{FakeElement, FakePage};
    use crate::layout::ElementDescriptor;

    #[test]
    fn scan_records_baseline_geometry() {
        let mut page = FakePage::new(800.0, 600.0);
        let el = page.add(
            FakeElement::particle(0.5)
                .at(Point::new(10.0, 300.0))
                .with_margin(Vec2::new(0.0, 20.0)),
        );
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);

        let summary = p.scan(&mut page.layout(), &mut claims);
        assert_eq!(summary.particles, 1);
        let rec = &p.particles()[0];
        assert_eq!(rec.element, el);
        assert_eq!(rec.ratio, 0.5);
        assert_eq!(rec.start_position, Point::new(10.0, 300.0));
        // Document offset is position plus margin; the margin is taken back out.
        assert_eq!(rec.start_offset, Point::new(10.0, 300.0));
        assert_eq!(rec.position(), rec.start_position);
        assert_eq!(p.state(), PositionerState::Scanned);
    }

    #[test]
    fn offsets_fall_back_through_offset_parent_to_global() {
        let mut page = FakePage::new(800.0, 600.0);
        let wrapper = page.add(
            FakeElement::plain()
                .at(Point::new(0.0, 1000.0))
                .with_descriptor(ElementDescriptor {
                    vertical_offset: Some(40.0),
                    offset_parent: true,
                    ..ElementDescriptor::default()
                }),
        );
        let inner = page.add(FakeElement::plain().at(Point::new(5.0, 50.0)).child_of(wrapper));
        let own = page.add(
            FakeElement::particle(0.5)
                .child_of(inner)
                .with_descriptor(ElementDescriptor {
                    ratio: Some(0.5),
                    horizontal_offset: Some(7.0),
                    ..ElementDescriptor::default()
                }),
        );
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        p.scan(&mut page.layout(), &mut claims);

        let rec = &p.particles()[0];
        assert_eq!(rec.element, own);
        assert_eq!(rec.offset_parent, Some(wrapper));
        assert_eq!(rec.offset, Vec2::new(7.0, 40.0), "own x, parent y");
        // Only the ancestors below the offset parent contribute.
        assert_eq!(rec.parent_offset, Vec2::new(5.0, 50.0));
    }

    #[test]
    fn nearest_offset_parent_wins() {
        let mut page = FakePage::new(800.0, 600.0);
        let marked = ElementDescriptor {
            offset_parent: true,
            ..ElementDescriptor::default()
        };
        let outer = page.add(
            FakeElement::plain()
                .at(Point::new(0.0, 2000.0))
                .with_descriptor(ElementDescriptor {
                    vertical_offset: Some(90.0),
                    ..marked
                }),
        );
        let middle = page.add(
            FakeElement::plain()
                .at(Point::new(0.0, 300.0))
                .child_of(outer)
                .with_descriptor(marked),
        );
        let inner = page.add(FakeElement::plain().at(Point::new(2.0, 20.0)).child_of(middle));
        page.add(FakeElement::particle(0.5).child_of(inner));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        p.scan(&mut page.layout(), &mut claims);

        let rec = &p.particles()[0];
        assert_eq!(rec.offset_parent, Some(middle));
        assert_eq!(rec.parent_offset, Vec2::new(2.0, 20.0));
        assert_eq!(rec.offset, Vec2::ZERO, "outer offsets are out of reach");
    }

    #[test]
    fn no_offset_parent_means_zero_parent_offset() {
        let mut page = FakePage::new(800.0, 600.0);
        let outer = page.add(FakeElement::plain().at(Point::new(3.0, 4.0)));
        page.add(FakeElement::particle(1.0).child_of(outer));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        p.scan(&mut page.layout(), &mut claims);

        assert_eq!(p.particles()[0].offset_parent, None);
        assert_eq!(p.particles()[0].parent_offset, Vec2::ZERO);
    }

    #[test]
    fn background_start_offset_subtracts_scan_scroll() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(
            FakeElement::background(0.5, "12px", "center")
                .at(Point::new(0.0, 900.0)),
        );
        page.set_scroll(Point::new(0.0, 100.0));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        p.scan(&mut page.layout(), &mut claims);

        let bg = &p.backgrounds()[0];
        assert_eq!(bg.start_offset, Point::new(0.0, 800.0));
        assert_eq!(bg.start_background, Vec2::new(12.0, 0.0), "unparsable is zero");
        assert_eq!(bg.current(), None);
    }

    #[test]
    fn second_positioner_skips_claimed_elements() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5));
        page.add(FakeElement::particle(0.8));
        let mut claims = ClaimRegistry::new();
        let mut first = Positioner::new(ParallaxConfig::default(), &mut claims);
        let mut second = Positioner::new(ParallaxConfig::default(), &mut claims);

        first.scan(&mut page.layout(), &mut claims);
        let summary = second.scan(&mut page.layout(), &mut claims);
        assert_eq!(summary.particles, 0);
        assert_eq!(summary.skipped, 2);

        let _ = first.reset(&mut claims);
        let summary = second.scan(&mut page.layout(), &mut claims);
        assert_eq!(summary.particles, 2, "claims released on reset");
    }

    #[test]
    fn disabled_kinds_are_not_scanned() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5));
        page.add(FakeElement::background(0.5, "0px", "0px"));
        let mut claims = ClaimRegistry::new();
        let config = ParallaxConfig {
            parallax_backgrounds: false,
            ..ParallaxConfig::default()
        };
        let mut p = Positioner::new(config, &mut claims);
        let summary = p.scan(&mut page.layout(), &mut claims);
        assert_eq!(summary.particles, 1);
        assert_eq!(summary.backgrounds, 0);
        assert_eq!(p.tracked_elements().len(), 1);
    }

    #[test]
    fn rescan_releases_previous_claims() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5));
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        p.scan(&mut page.layout(), &mut claims);
        let summary = p.scan(&mut page.layout(), &mut claims);
        assert_eq!(summary.particles, 1);
        assert_eq!(claims.claimed_by(p.id()), 1);
    }
}
