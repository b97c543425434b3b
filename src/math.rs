// src/math.rs

//! Scalar interpolation helpers and epsilon-based float comparison.
//!
//! These free functions back every sampling and blending path in the crate:
//! `Color` interpolation, `Pixmap` texel filtering and the cubic resize
//! kernel all funnel through them.

/// Tolerance used for color component comparison.
pub const EPSILON: f32 = 1.0e-6;

/// Compares two floats within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_eq(lhs: f32, rhs: f32) -> bool {
    (lhs - rhs).abs() < EPSILON
}

/// Returns true when the value is within [`EPSILON`] of zero.
#[inline]
#[must_use]
pub fn is_zero(value: f32) -> bool {
    value.abs() < EPSILON
}

/// Linear interpolation between two values.
///
/// `factor` 0.0 returns `start`, 1.0 returns `end`.
#[inline]
#[must_use]
pub fn linear_interpolation(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

/// Cosine interpolation between two values.
///
/// The factor is remapped onto a half cosine wave, easing in and out.
#[inline]
#[must_use]
pub fn cosine_interpolation(start: f32, end: f32, factor: f32) -> f32 {
    let eased = (1.0 - (factor * std::f32::consts::PI).cos()) * 0.5;

    linear_interpolation(start, end, eased)
}

/// Cubic interpolation through four samples.
///
/// Interpolates between `b` and `c`; `a` and `d` shape the tangents.
#[inline]
#[must_use]
pub fn cubic_interpolation(a: f32, b: f32, c: f32, d: f32, factor: f32) -> f32 {
    let term_a = d - c - a + b;
    let term_b = a - b - term_a;
    let term_c = c - a;
    let term_d = b;

    let factor_sq = factor * factor;

    term_a * factor * factor_sq + term_b * factor_sq + term_c * factor + term_d
}

/// Catmull-Rom spline interpolation through four samples.
///
/// Interpolates between `p1` and `p2`; the curve passes through both.
#[inline]
#[must_use]
pub fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, factor: f32) -> f32 {
    let factor_sq = factor * factor;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * factor
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * factor_sq
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * factor_sq * factor)
}
