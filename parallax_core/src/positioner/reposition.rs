// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven repositioning and change tracking.
//!
//! Repositioning follows a mark-then-drain pattern:
//!
//! 1. **Particles**: Project each particle for the scroll offset. Culled
//!    particles that were visible are marked in **VISIBILITY**; visible ones
//!    that were hidden are marked in **VISIBILITY**, and visible ones whose
//!    position differs from the last written one are marked in **POSITION**.
//! 2. **Backgrounds**: Project each background and mark it in
//!    **BACKGROUND** if the value changed.
//! 3. **Drain**: Each channel is drained in deterministic order into
//!    [`ParallaxChanges`]; visibility marks are split by the record's final
//!    hidden flag.
//!
//! Hidden particles are not projected into `moved`: their last written
//! position is kept and they are moved again once they come back into view.

use alloc::vec::Vec;

use kurbo::Point;

use super::{ParallaxChanges, Positioner, PositionerState};
use crate::css::finite_or_zero;
use crate::dirty;

impl Positioner {
    /// Recomputes every record for `scroll` and returns what changed.
    ///
    /// Does nothing (and reports [`memoized`](ParallaxChanges::memoized))
    /// when `scroll` and the viewport are the same as in the previous pass.
    /// Before the first scan, and after a reset, returns no changes.
    pub fn reposition(&mut self, scroll: Point) -> ParallaxChanges {
        let mut changes = ParallaxChanges::default();
        self.reposition_into(scroll, &mut changes);
        changes
    }

    /// Like [`reposition`](Self::reposition), but reuses a caller-provided
    /// buffer to avoid allocation.
    pub fn reposition_into(&mut self, scroll: Point, changes: &mut ParallaxChanges) {
        changes.clear();
        if self.state() != PositionerState::Scanned {
            return;
        }

        let scroll = Point::new(finite_or_zero(scroll.x), finite_or_zero(scroll.y));
        if self.memo_matches(scroll) {
            changes.memoized = true;
            return;
        }

        let viewport = self.viewport;
        let axes = self.axes();
        let hide_distant = self.config().hide_distant_elements;

        for (idx, particle) in (0_u32..).zip(self.particles.iter_mut()) {
            let position = particle.project(scroll, &viewport, axes);
            let visible = !hide_distant || particle.is_visible(position, scroll, &viewport, axes);
            if visible {
                if particle.hidden {
                    particle.hidden = false;
                    self.dirty.mark(idx, dirty::VISIBILITY);
                }
                if position != particle.current {
                    particle.current = position;
                    self.dirty.mark(idx, dirty::POSITION);
                }
            } else if !particle.hidden {
                particle.hidden = true;
                self.dirty.mark(idx, dirty::VISIBILITY);
            }
        }

        for (idx, background) in (0_u32..).zip(self.backgrounds.iter_mut()) {
            let value = background.project(scroll, &viewport, axes);
            if background.current != Some(value) {
                background.current = Some(value);
                self.dirty.mark(idx, dirty::BACKGROUND);
            }
        }

        changes.moved = self
            .dirty
            .drain(dirty::POSITION)
            .deterministic()
            .run()
            .collect();

        let flipped: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        for idx in flipped {
            if self.particles[idx as usize].hidden {
                changes.hidden.push(idx);
            } else {
                changes.unhidden.push(idx);
            }
        }

        changes.backgrounds = self
            .dirty
            .drain(dirty::BACKGROUND)
            .deterministic()
            .run()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use crate::claims::ClaimRegistry;
    use crate::config::ParallaxConfig;
    use crate::fake::{FakeElement, FakePage};
    use crate::layout::Viewport;
    use crate::positioner::{BackgroundAxis, Positioner};

    fn scanned(page: &FakePage, config: ParallaxConfig) -> (Positioner, ClaimRegistry) {
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(config, &mut claims);
        let mut layout = page.layout();
        p.detect_viewport(&layout);
        p.scan(&mut layout, &mut claims);
        (p, claims)
    }

    #[test]
    fn ratio_one_never_moves() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(1.0).at(Point::new(0.0, 200.0)));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        for y in [0.0, 50.0, 150.0] {
            let changes = p.reposition(Point::new(0.0, y));
            assert!(changes.moved.is_empty(), "no move at scroll {y}");
        }
    }

    #[test]
    fn half_ratio_reports_moves() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let changes = p.reposition(Point::new(0.0, 100.0));
        assert_eq!(changes.moved, [0]);
        assert_eq!(p.particle_at(0).position(), Point::new(0.0, 250.0));
    }

    #[test]
    fn unchanged_inputs_are_memoized() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let first = p.reposition(Point::new(0.0, 100.0));
        assert!(!first.memoized);
        let second = p.reposition(Point::new(0.0, 100.0));
        assert!(second.memoized);
        assert!(second.is_empty());
    }

    #[test]
    fn viewport_change_breaks_memo() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let _ = p.reposition(Point::new(0.0, 100.0));
        p.set_viewport(Viewport::new(800.0, 300.0));
        let changes = p.reposition(Point::new(0.0, 100.0));
        assert!(!changes.memoized);
    }

    #[test]
    fn hide_and_show_are_reported_once() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(
            FakeElement::particle(1.0)
                .at(Point::new(0.0, 100.0))
                .sized(Size::new(100.0, 50.0)),
        );
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let scrolled_past = p.reposition(Point::new(0.0, 400.0));
        assert_eq!(scrolled_past.hidden, [0]);
        assert!(p.particle_at(0).is_hidden());

        let further = p.reposition(Point::new(0.0, 500.0));
        assert!(further.hidden.is_empty(), "already hidden");

        let back = p.reposition(Point::new(0.0, 0.0));
        assert_eq!(back.unhidden, [0]);
        assert!(!p.particle_at(0).is_hidden());
    }

    #[test]
    fn culling_can_be_disabled() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(1.0).at(Point::new(0.0, 100.0)));
        let config = ParallaxConfig {
            hide_distant_elements: false,
            ..ParallaxConfig::default()
        };
        let (mut p, _claims) = scanned(&page, config);

        let changes = p.reposition(Point::new(0.0, 5000.0));
        assert!(changes.hidden.is_empty());
    }

    #[test]
    fn first_pass_writes_every_background() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::background(1.0, "0px", "0px"));
        page.add(FakeElement::background(0.5, "0px", "0px"));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let first = p.reposition(Point::ZERO);
        assert_eq!(first.backgrounds, [0, 1]);

        let second = p.reposition(Point::new(0.0, 10.0));
        assert_eq!(second.backgrounds, [1], "ratio one stays at 0px");
        assert_eq!(
            p.background_at(1).current(),
            Some((BackgroundAxis::Px(0.0), BackgroundAxis::Px(5.0)))
        );
    }

    #[test]
    fn non_finite_scroll_is_treated_as_zero() {
        let mut page = FakePage::new(800.0, 600.0);
        page.add(FakeElement::particle(0.5).at(Point::new(0.0, 200.0)));
        let (mut p, _claims) = scanned(&page, ParallaxConfig::default());

        let changes = p.reposition(Point::new(f64::NAN, f64::INFINITY));
        assert!(changes.moved.is_empty());
        assert_eq!(p.particle_at(0).position(), Point::new(0.0, 200.0));
    }

    #[test]
    fn unscanned_positioner_reports_nothing() {
        let mut claims = ClaimRegistry::new();
        let mut p = Positioner::new(ParallaxConfig::default(), &mut claims);
        let changes = p.reposition(Point::new(0.0, 100.0));
        assert!(changes.is_empty());
        assert!(!changes.memoized);
    }
}
