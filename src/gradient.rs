// src/gradient.rs

//! One-dimensional color ramp made of sorted keyframes, sampled by the
//! gradient fill operations on `Pixmap`.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::math;

/// An ordered list of `(position, color)` keyframes over [0, 1].
///
/// Sampling between two keyframes interpolates linearly; sampling outside
/// the keyframe range clamps to the nearest endpoint. At least two
/// keyframes are needed for the ramp to produce anything but a constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    keyframes: Vec<(f32, Color)>,
}

impl Gradient {
    #[must_use]
    pub fn new() -> Self {
        Gradient::default()
    }

    /// Inserts a keyframe, keeping positions sorted. The position is
    /// clamped to [0, 1]; an existing keyframe at the same position is
    /// replaced.
    pub fn add_color_at(&mut self, position: f32, color: Color) {
        let position = position.clamp(0.0, 1.0);

        let mut insert_at = self.keyframes.len();

        for (index, keyframe) in self.keyframes.iter().enumerate() {
            if math::approx_eq(keyframe.0, position) {
                self.keyframes[index].1 = color;

                return;
            }

            if keyframe.0 > position {
                insert_at = index;

                break;
            }
        }

        self.keyframes.insert(insert_at, (position, color));
    }

    /// Samples the ramp at a position.
    ///
    /// Positions at or beyond the endpoint keyframes return the endpoint
    /// color. An empty gradient has no meaningful answer and falls back
    /// to black.
    #[must_use]
    pub fn color_at(&self, position: f32) -> Color {
        if self.keyframes.is_empty() {
            log::warn!("Sampling an empty gradient, returning black");

            return Color::BLACK;
        }

        let first = &self.keyframes[0];
        let last = &self.keyframes[self.keyframes.len() - 1];

        if position <= first.0 {
            return first.1;
        }

        if position >= last.0 {
            return last.1;
        }

        for pair in self.keyframes.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);

            if position < upper.0 {
                let span = upper.0 - lower.0;

                if math::is_zero(span) {
                    return lower.1;
                }

                let factor = (position - lower.0) / span;

                return Color::linear_interpolation(&lower.1, &upper.1, factor);
            }
        }

        last.1
    }

    /// The sorted keyframe list.
    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[(f32, Color)] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}
