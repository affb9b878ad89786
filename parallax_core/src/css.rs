// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient numeric parsing of CSS and attribute values.
//!
//! Page data is never trusted to be well formed. Every helper here degrades
//! to zero (or `None`, where absence carries meaning) instead of failing, so
//! that a malformed attribute never stops a reposition pass.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Vec2;

/// Replaces NaN and infinities with `0.0`.
#[inline]
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Parses the leading integer of a CSS value, ignoring any unit suffix.
///
/// Leading whitespace and a single sign are accepted. Parsing stops at the
/// first non-digit, so `"12.7px"` yields `12`. Returns `None` when no digit
/// is present (`"auto"`, `""`, `"-"`).
#[must_use]
pub fn parse_leading_int(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude = digits[..len]
        .bytes()
        .fold(0.0_f64, |acc, b| acc * 10.0 + f64::from(b - b'0'));
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a pixel length, treating anything unparsable as `0`.
///
/// `"auto"` margins, empty strings, and percentages without digits all map
/// to zero.
#[inline]
#[must_use]
pub fn px_or_zero(value: &str) -> f64 {
    parse_leading_int(value).unwrap_or(0.0)
}

/// Parses a whole attribute value as a number.
///
/// Surrounding whitespace is ignored. Returns `None` for empty input and for
/// anything that is not entirely a finite decimal number.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an optional attribute value where presence matters.
///
/// Missing attributes stay `None`. A present but malformed value becomes
/// `Some(0.0)`.
#[inline]
#[must_use]
pub fn attribute_number(value: Option<&str>) -> Option<f64> {
    value.map(|v| parse_number(v).unwrap_or(0.0))
}

/// Extracts the translation component of a computed CSS transform.
///
/// Computed styles report transforms as `matrix(a, b, c, d, e, f)` or
/// `matrix3d(...)` with sixteen entries. Returns `None` for `"none"` and for
/// anything that cannot be read.
#[must_use]
pub fn parse_translation(transform: &str) -> Option<Vec2> {
    let s = transform.trim();
    let (body, x_idx, y_idx, count) = if let Some(rest) = s.strip_prefix("matrix3d(") {
        (rest, 12, 13, 16)
    } else if let Some(rest) = s.strip_prefix("matrix(") {
        (rest, 4, 5, 6)
    } else {
        return None;
    };
    let body = body.strip_suffix(')')?;
    let values: Vec<f64> = body
        .split(',')
        .map(|part| parse_number(part).unwrap_or(0.0))
        .collect();
    if values.len() != count {
        return None;
    }
    Some(Vec2::new(values[x_idx], values[y_idx]))
}

/// Formats a pixel value the way the browser would serialize it.
#[inline]
#[must_use]
pub fn px(value: f64) -> String {
    format!("{}px", finite_or_zero(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_ignores_units() {
        assert_eq!(parse_leading_int("12px"), Some(12.0));
        assert_eq!(parse_leading_int("  -40px"), Some(-40.0));
        assert_eq!(parse_leading_int("12.7px"), Some(12.0));
        assert_eq!(parse_leading_int("50%"), Some(50.0));
    }

    #[test]
    fn leading_int_rejects_non_numeric() {
        assert_eq!(parse_leading_int("auto"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("left"), None);
    }

    #[test]
    fn px_or_zero_degrades() {
        assert_eq!(px_or_zero("auto"), 0.0);
        assert_eq!(px_or_zero("center"), 0.0);
        assert_eq!(px_or_zero("8px"), 8.0);
    }

    #[test]
    fn attribute_presence_is_preserved() {
        assert_eq!(attribute_number(None), None);
        assert_eq!(attribute_number(Some("0.5")), Some(0.5));
        assert_eq!(attribute_number(Some("fast")), Some(0.0));
        assert_eq!(attribute_number(Some(" 2 ")), Some(2.0));
    }

    #[test]
    fn parse_number_rejects_non_finite() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1e3"), Some(1000.0));
    }

    #[test]
    fn translation_from_2d_matrix() {
        let t = parse_translation("matrix(1, 0, 0, 1, -10, 25)").unwrap();
        assert_eq!(t, Vec2::new(-10.0, 25.0));
    }

    #[test]
    fn translation_from_3d_matrix() {
        let t = parse_translation(
            "matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 7, -3, 0, 1)",
        )
        .unwrap();
        assert_eq!(t, Vec2::new(7.0, -3.0));
    }

    #[test]
    fn translation_none() {
        assert_eq!(parse_translation("none"), None);
        assert_eq!(parse_translation("matrix(1, 0)"), None);
    }

    #[test]
    fn px_formats_like_css() {
        assert_eq!(px(10.0), "10px");
        assert_eq!(px(-2.5), "-2.5px");
        assert_eq!(px(f64::NAN), "0px");
    }
}
