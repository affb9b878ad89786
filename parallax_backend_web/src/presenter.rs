// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM style writes.
//!
//! Applies [`ParallaxChanges`] to the tracked elements by writing inline
//! styles, and restores the original inline styles from a
//! [`ResetSnapshot`].

use alloc::format;
use alloc::string::String;

use kurbo::Vec2;
use parallax_core::backend::Presenter;
use parallax_core::config::PositionProperty;
use parallax_core::css;
use parallax_core::positioner::{ParallaxChanges, Positioner, ResetSnapshot};
use web_sys::{CssStyleDeclaration, HtmlElement};

use crate::elements::DomContext;

/// Hides and shows particles culled for being far outside the viewport.
pub trait Visibility {
    /// Hides `element`.
    fn hide(&mut self, element: &HtmlElement);
    /// Shows `element` again.
    fn show(&mut self, element: &HtmlElement);
}

/// Default [`Visibility`]: toggles `display: none`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayToggle;

impl Visibility for DisplayToggle {
    fn hide(&mut self, element: &HtmlElement) {
        let _ = element.style().set_property("display", "none");
    }

    fn show(&mut self, element: &HtmlElement) {
        let _ = element.style().remove_property("display");
    }
}

/// [`Visibility`] from a pair of callbacks, e.g. to fade instead of hide.
pub struct VisibilityFns<H, S> {
    hide: H,
    show: S,
}

impl<H, S> VisibilityFns<H, S>
where
    H: FnMut(&HtmlElement),
    S: FnMut(&HtmlElement),
{
    /// Creates a visibility policy from `hide` and `show` callbacks.
    pub fn new(hide: H, show: S) -> Self {
        Self { hide, show }
    }
}

impl<H, S> Visibility for VisibilityFns<H, S>
where
    H: FnMut(&HtmlElement),
    S: FnMut(&HtmlElement),
{
    fn hide(&mut self, element: &HtmlElement) {
        (self.hide)(element);
    }

    fn show(&mut self, element: &HtmlElement) {
        (self.show)(element);
    }
}

impl<H, S> core::fmt::Debug for VisibilityFns<H, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisibilityFns").finish_non_exhaustive()
    }
}

/// Writes positioner results to live DOM elements.
pub struct DomPresenter<V = DisplayToggle> {
    context: DomContext,
    visibility: V,
}

impl<V> core::fmt::Debug for DomPresenter<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl DomPresenter {
    /// Creates a presenter that hides culled particles with `display: none`.
    #[must_use]
    pub fn new(context: DomContext) -> Self {
        Self::with_visibility(context, DisplayToggle)
    }
}

impl<V: Visibility> DomPresenter<V> {
    /// Creates a presenter with a custom hide/show policy.
    #[must_use]
    pub fn with_visibility(context: DomContext, visibility: V) -> Self {
        Self {
            context,
            visibility,
        }
    }

    /// Returns the shared page context.
    #[must_use]
    pub fn context(&self) -> &DomContext {
        &self.context
    }
}

impl<V: Visibility> Presenter for DomPresenter<V> {
    fn apply(&mut self, positioner: &Positioner, changes: &ParallaxChanges) {
        let axes = positioner.axes();

        // 1. Visibility
        for &idx in &changes.hidden {
            if let Some(el) = self.context.element(positioner.particle_at(idx).element) {
                self.visibility.hide(&el);
            }
        }
        for &idx in &changes.unhidden {
            if let Some(el) = self.context.element(positioner.particle_at(idx).element) {
                self.visibility.show(&el);
            }
        }

        // 2. Positions
        for &idx in &changes.moved {
            let particle = positioner.particle_at(idx);
            let Some(el) = self.context.element(particle.element) else {
                continue;
            };
            let style = el.style();
            match positioner.config().position_property {
                PositionProperty::Position => {
                    let position = particle.position();
                    if axes.horizontal {
                        let _ = style.set_property("left", &css::px(position.x));
                    }
                    if axes.vertical {
                        let _ = style.set_property("top", &css::px(position.y));
                    }
                }
                PositionProperty::Transform => {
                    let _ = style.set_property("transform", &translate3d(particle.translation()));
                }
            }
        }

        // 3. Backgrounds
        for &idx in &changes.backgrounds {
            let background = positioner.background_at(idx);
            let (Some(el), Some((x, y))) = (
                self.context.element(background.element),
                background.current(),
            ) else {
                continue;
            };
            let style = el.style();
            let _ = style.set_property("background-position-x", &background.axis_css(x, true));
            let _ = style.set_property("background-position-y", &background.axis_css(y, false));
        }
    }

    fn restore(&mut self, snapshot: &ResetSnapshot) {
        for particle in snapshot.particles.iter().rev() {
            let Some(el) = self.context.element(particle.element) else {
                continue;
            };
            let style = el.style();
            restore_property(&style, "left", &particle.original.left);
            restore_property(&style, "top", &particle.original.top);
            restore_property(&style, "transform", &particle.original.transform);
            self.visibility.show(&el);
        }

        for background in snapshot.backgrounds.iter().rev() {
            let Some(el) = self.context.element(background.element) else {
                continue;
            };
            let style = el.style();
            let _ = style.set_property("background-position-x", &background.start_value.x);
            let _ = style.set_property("background-position-y", &background.start_value.y);
        }
    }
}

/// Writes `value`, or removes the property when it was not set inline.
fn restore_property(style: &CssStyleDeclaration, property: &str, value: &str) {
    if value.is_empty() {
        let _ = style.remove_property(property);
    } else {
        let _ = style.set_property(property, value);
    }
}

/// Formats a translation as a CSS `translate3d()` value.
fn translate3d(offset: Vec2) -> String {
    format!("translate3d({}, {}, 0)", css::px(offset.x), css::px(offset.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate3d_uses_pixel_units() {
        assert_eq!(
            translate3d(Vec2::new(0.0, -125.5)),
            "translate3d(0px, -125.5px, 0)"
        );
    }

    #[test]
    fn non_finite_translation_is_written_as_zero() {
        assert_eq!(
            translate3d(Vec2::new(f64::NAN, 3.0)),
            "translate3d(0px, 3px, 0)"
        );
    }
}
