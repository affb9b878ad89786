// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penner easing curves.
//!
//! Every curve uses the classic `(elapsed, start, delta, duration)`
//! parameterization: at `elapsed == 0` it returns `start`, at
//! `elapsed == duration` it returns `start + delta`. Names follow the
//! jQuery convention (`"easeOutBounce"`), see [`Easing::from_name`].

use core::f64::consts::PI;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Default overshoot of the back curves (about 10%).
pub const DEFAULT_OVERSHOOT: f64 = 1.70158;

/// An easing curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "variant names are the curve names")]
pub enum Easing {
    Linear,
    /// Alias of [`OutQuad`](Self::OutQuad).
    #[default]
    Swing,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    /// Every curve, in declaration order.
    pub const ALL: [Self; 32] = [
        Self::Linear,
        Self::Swing,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InExpo,
        Self::OutExpo,
        Self::InOutExpo,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InElastic,
        Self::OutElastic,
        Self::InOutElastic,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
        Self::InBounce,
        Self::OutBounce,
        Self::InOutBounce,
    ];

    /// Returns the jQuery-style name of the curve.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Swing => "swing",
            Self::InQuad => "easeInQuad",
            Self::OutQuad => "easeOutQuad",
            Self::InOutQuad => "easeInOutQuad",
            Self::InCubic => "easeInCubic",
            Self::OutCubic => "easeOutCubic",
            Self::InOutCubic => "easeInOutCubic",
            Self::InQuart => "easeInQuart",
            Self::OutQuart => "easeOutQuart",
            Self::InOutQuart => "easeInOutQuart",
            Self::InQuint => "easeInQuint",
            Self::OutQuint => "easeOutQuint",
            Self::InOutQuint => "easeInOutQuint",
            Self::InSine => "easeInSine",
            Self::OutSine => "easeOutSine",
            Self::InOutSine => "easeInOutSine",
            Self::InExpo => "easeInExpo",
            Self::OutExpo => "easeOutExpo",
            Self::InOutExpo => "easeInOutExpo",
            Self::InCirc => "easeInCirc",
            Self::OutCirc => "easeOutCirc",
            Self::InOutCirc => "easeInOutCirc",
            Self::InElastic => "easeInElastic",
            Self::OutElastic => "easeOutElastic",
            Self::InOutElastic => "easeInOutElastic",
            Self::InBack => "easeInBack",
            Self::OutBack => "easeOutBack",
            Self::InOutBack => "easeInOutBack",
            Self::InBounce => "easeInBounce",
            Self::OutBounce => "easeOutBounce",
            Self::InOutBounce => "easeInOutBounce",
        }
    }

    /// Looks a curve up by its jQuery-style name.
    ///
    /// `"jswing"` is accepted as an alias of `"swing"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "jswing" {
            return Some(Self::Swing);
        }
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Evaluates the curve.
    ///
    /// `progress` is the normalized completion some animation drivers pass
    /// alongside the timing values; the curves are computed from `elapsed`
    /// and `duration` and ignore it. A non-positive or non-finite `duration`
    /// jumps straight to the end value.
    #[must_use]
    pub fn apply(self, progress: f64, elapsed: f64, start: f64, delta: f64, duration: f64) -> f64 {
        _ = progress;
        if !(duration.is_finite() && duration > 0.0) {
            return start + delta;
        }
        let (t, b, c, d) = (elapsed, start, delta, duration);
        match self {
            Self::Linear => c * t / d + b,
            Self::Swing | Self::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Self::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            Self::InOutQuad => in_out(t, b, c, d, |t| t * t, |t| {
                let u = t - 1.0;
                1.0 - u * (u - 2.0)
            }),
            Self::InCubic => {
                let t = t / d;
                c * t * t * t + b
            }
            Self::OutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Self::InOutCubic => in_out(t, b, c, d, |t| t * t * t, |t| {
                let u = t - 2.0;
                u * u * u + 2.0
            }),
            Self::InQuart => {
                let t = t / d;
                c * t * t * t * t + b
            }
            Self::OutQuart => {
                let t = t / d - 1.0;
                -c * (t * t * t * t - 1.0) + b
            }
            Self::InOutQuart => in_out(t, b, c, d, |t| t * t * t * t, |t| {
                let u = t - 2.0;
                2.0 - u * u * u * u
            }),
            Self::InQuint => {
                let t = t / d;
                c * t * t * t * t * t + b
            }
            Self::OutQuint => {
                let t = t / d - 1.0;
                c * (t * t * t * t * t + 1.0) + b
            }
            Self::InOutQuint => in_out(t, b, c, d, |t| t * t * t * t * t, |t| {
                let u = t - 2.0;
                u * u * u * u * u + 2.0
            }),
            Self::InSine => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Self::OutSine => c * (t / d * (PI / 2.0)).sin() + b,
            Self::InOutSine => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,
            Self::InExpo => {
                if t == 0.0 {
                    b
                } else {
                    c * 2.0_f64.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Self::OutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (1.0 - 2.0_f64.powf(-10.0 * t / d)) + b
                }
            }
            Self::InOutExpo => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                in_out(
                    t,
                    b,
                    c,
                    d,
                    |t| 2.0_f64.powf(10.0 * (t - 1.0)),
                    |t| 2.0 - 2.0_f64.powf(-10.0 * (t - 1.0)),
                )
            }
            Self::InCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            Self::OutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            Self::InOutCirc => in_out(t, b, c, d, |t| 1.0 - (1.0 - t * t).sqrt(), |t| {
                let u = t - 2.0;
                (1.0 - u * u).sqrt() + 1.0
            }),
            Self::InElastic => elastic_in(t, b, c, d),
            Self::OutElastic => elastic_out(t, b, c, d),
            Self::InOutElastic => elastic_in_out(t, b, c, d),
            Self::InBack => back_in(t, b, c, d, DEFAULT_OVERSHOOT),
            Self::OutBack => back_out(t, b, c, d, DEFAULT_OVERSHOOT),
            Self::InOutBack => back_in_out(t, b, c, d, DEFAULT_OVERSHOOT),
            Self::InBounce => c - bounce_out(d - t, 0.0, c, d) + b,
            Self::OutBounce => bounce_out(t, b, c, d),
            Self::InOutBounce => {
                if t < d / 2.0 {
                    (c - bounce_out(d - t * 2.0, 0.0, c, d)) * 0.5 + b
                } else {
                    bounce_out(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
                }
            }
        }
    }

    /// Evaluates the curve on the unit interval: `ease(0) == 0`,
    /// `ease(1) == 1`.
    #[must_use]
    pub fn ease(self, t: f64) -> f64 {
        self.apply(t, t, 0.0, 1.0, 1.0)
    }
}

/// Shared shape of the symmetric in-out curves.
///
/// Time is scaled to `0..2`; `first` covers the first half and returns
/// `0..1`, `second` the second half and returns `1..2`. Both are halved.
fn in_out(
    t: f64,
    b: f64,
    c: f64,
    d: f64,
    first: impl Fn(f64) -> f64,
    second: impl Fn(f64) -> f64,
) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * first(t) + b
    } else {
        c / 2.0 * second(t) + b
    }
}

fn elastic_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    let t = t - 1.0;
    -(c * 2.0_f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
}

fn elastic_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    c * 2.0_f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}

fn elastic_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let p = d * (0.3 * 1.5);
    let s = p / 4.0;
    let t = t - 1.0;
    let wave = ((t * d - s) * (2.0 * PI) / p).sin();
    if t < 0.0 {
        -0.5 * (c * 2.0_f64.powf(10.0 * t) * wave) + b
    } else {
        c * 2.0_f64.powf(-10.0 * t) * wave * 0.5 + c + b
    }
}

/// Back-in with an explicit overshoot `s`.
#[must_use]
pub fn back_in(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let t = t / d;
    c * t * t * ((s + 1.0) * t - s) + b
}

/// Back-out with an explicit overshoot `s`.
#[must_use]
pub fn back_out(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
}

/// Back-in-out with an explicit overshoot `s`.
#[must_use]
pub fn back_in_out(t: f64, b: f64, c: f64, d: f64, s: f64) -> f64 {
    let s = s * 1.525;
    in_out(t, b, c, d, |t| t * t * ((s + 1.0) * t - s), |t| {
        let u = t - 2.0;
        u * u * ((s + 1.0) * u + s) + 2.0
    })
}

fn bounce_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn every_curve_hits_both_endpoints() {
        for easing in Easing::ALL {
            let start = easing.apply(0.0, 0.0, 10.0, 90.0, 400.0);
            let end = easing.apply(1.0, 400.0, 10.0, 90.0, 400.0);
            assert!(close(start, 10.0), "{} starts at {start}", easing.name());
            assert!(close(end, 100.0), "{} ends at {end}", easing.name());
        }
    }

    #[test]
    fn names_round_trip() {
        for easing in Easing::ALL {
            assert_eq!(Easing::from_name(easing.name()), Some(easing));
        }
        assert_eq!(Easing::from_name("jswing"), Some(Easing::Swing));
        assert_eq!(Easing::from_name("easeSideways"), None);
    }

    #[test]
    fn swing_matches_out_quad() {
        for t in [0.1, 0.4, 0.75] {
            assert_eq!(Easing::Swing.ease(t), Easing::OutQuad.ease(t));
        }
    }

    #[test]
    fn in_out_curves_pass_midpoint() {
        for easing in [
            Easing::InOutQuad,
            Easing::InOutCubic,
            Easing::InOutQuart,
            Easing::InOutQuint,
            Easing::InOutSine,
            Easing::InOutCirc,
            Easing::InOutBounce,
        ] {
            assert!(close(easing.ease(0.5), 0.5), "{} midpoint", easing.name());
        }
    }

    #[test]
    fn back_overshoots_below_start() {
        assert!(Easing::InBack.ease(0.2) < 0.0);
        assert!(back_in(0.2, 0.0, 1.0, 1.0, 0.0) >= 0.0, "no overshoot with s = 0");
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        assert_eq!(Easing::InQuad.apply(0.0, 0.0, 5.0, 10.0, 0.0), 15.0);
    }
}
