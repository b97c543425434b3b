// src/color.rs

//! Four-channel floating-point color value with arithmetic, HSV access,
//! luminance conversion and the compositing operators used by `Pixmap`
//! and `Processor`.
//!
//! Every constructor and mutating operation clamps components to [0, 1],
//! so a `Color` is never out of range. Equality is epsilon-approximate.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math;
use crate::types::{BlendMode, Component, GrayscaleMode};

/// Rec. 601 luminance weights (red, green, blue).
const REC_601_WEIGHTS: [f32; 3] = [0.2989, 0.5866, 0.1145];
/// Rec. 709 luminance weights.
const REC_709_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];
/// ITU luminance weights.
const ITU_WEIGHTS: [f32; 3] = [0.2220, 0.7067, 0.0713];

/// An RGBA color with every component held in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Color::BLACK
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        math::approx_eq(self.red, other.red)
            && math::approx_eq(self.green, other.green)
            && math::approx_eq(self.blue, other.blue)
            && math::approx_eq(self.alpha, other.alpha)
    }
}

impl Color {
    pub const WHITE: Color = Color::opaque(1.0, 1.0, 1.0);
    pub const LIGHT_GREY: Color = Color::opaque(0.75, 0.75, 0.75);
    pub const GREY: Color = Color::opaque(0.5, 0.5, 0.5);
    pub const DARK_GREY: Color = Color::opaque(0.25, 0.25, 0.25);
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);

    pub const RED: Color = Color::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::opaque(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::opaque(0.0, 0.0, 1.0);
    pub const CYAN: Color = Color::opaque(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::opaque(1.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::opaque(1.0, 1.0, 0.0);

    pub const LIGHT_RED: Color = Color::opaque(1.0, 0.666, 0.666);
    pub const LIGHT_GREEN: Color = Color::opaque(0.666, 1.0, 0.666);
    pub const LIGHT_BLUE: Color = Color::opaque(0.666, 0.666, 1.0);
    pub const LIGHT_CYAN: Color = Color::opaque(0.666, 1.0, 1.0);
    pub const LIGHT_MAGENTA: Color = Color::opaque(1.0, 0.666, 1.0);
    pub const LIGHT_YELLOW: Color = Color::opaque(1.0, 1.0, 0.666);

    pub const DARK_RED: Color = Color::opaque(0.333, 0.0, 0.0);
    pub const DARK_GREEN: Color = Color::opaque(0.0, 0.333, 0.0);
    pub const DARK_BLUE: Color = Color::opaque(0.0, 0.0, 0.333);
    pub const DARK_CYAN: Color = Color::opaque(0.0, 0.333, 0.333);
    pub const DARK_MAGENTA: Color = Color::opaque(0.333, 0.0, 0.333);
    pub const DARK_YELLOW: Color = Color::opaque(0.333, 0.333, 0.0);

    pub const TRANSLUCENT_WHITE: Color = Color::with_half_alpha(Color::WHITE);
    pub const TRANSLUCENT_LIGHT_GREY: Color = Color::with_half_alpha(Color::LIGHT_GREY);
    pub const TRANSLUCENT_GREY: Color = Color::with_half_alpha(Color::GREY);
    pub const TRANSLUCENT_DARK_GREY: Color = Color::with_half_alpha(Color::DARK_GREY);
    pub const TRANSLUCENT_BLACK: Color = Color::with_half_alpha(Color::BLACK);
    pub const TRANSLUCENT_RED: Color = Color::with_half_alpha(Color::RED);
    pub const TRANSLUCENT_GREEN: Color = Color::with_half_alpha(Color::GREEN);
    pub const TRANSLUCENT_BLUE: Color = Color::with_half_alpha(Color::BLUE);
    pub const TRANSLUCENT_CYAN: Color = Color::with_half_alpha(Color::CYAN);
    pub const TRANSLUCENT_MAGENTA: Color = Color::with_half_alpha(Color::MAGENTA);
    pub const TRANSLUCENT_YELLOW: Color = Color::with_half_alpha(Color::YELLOW);

    pub const TRANSPARENT: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    /// Const constructor for the predefined table; inputs must already be
    /// in range.
    const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Color {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    const fn with_half_alpha(base: Color) -> Self {
        Color {
            alpha: 0.5,
            ..base
        }
    }

    /// Builds a color, clamping every component to [0, 1].
    #[must_use]
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Color {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Opaque color from three components.
    #[must_use]
    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Color::new(red, green, blue, 1.0)
    }

    /// Opaque gray.
    #[must_use]
    pub fn from_gray(value: f32) -> Self {
        Color::new(value, value, value, 1.0)
    }

    /// Opaque color from raw components (integer scale or unit floats).
    #[must_use]
    pub fn from_rgb_components<C: Component>(components: [C; 3]) -> Self {
        Color::new(
            components[0].to_unit(),
            components[1].to_unit(),
            components[2].to_unit(),
            1.0,
        )
    }

    /// Color from four raw components.
    #[must_use]
    pub fn from_rgba_components<C: Component>(components: [C; 4]) -> Self {
        Color::new(
            components[0].to_unit(),
            components[1].to_unit(),
            components[2].to_unit(),
            components[3].to_unit(),
        )
    }

    /// An opaque color with uniform random components.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Color::new(rng.gen(), rng.gen(), rng.gen(), 1.0)
    }

    #[inline]
    #[must_use]
    pub fn red(&self) -> f32 {
        self.red
    }

    #[inline]
    #[must_use]
    pub fn green(&self) -> f32 {
        self.green
    }

    #[inline]
    #[must_use]
    pub fn blue(&self) -> f32 {
        self.blue
    }

    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Red premultiplied by alpha.
    #[inline]
    #[must_use]
    pub fn red_a(&self) -> f32 {
        self.red * self.alpha
    }

    /// Green premultiplied by alpha.
    #[inline]
    #[must_use]
    pub fn green_a(&self) -> f32 {
        self.green * self.alpha
    }

    /// Blue premultiplied by alpha.
    #[inline]
    #[must_use]
    pub fn blue_a(&self) -> f32 {
        self.blue * self.alpha
    }

    /// Plain channel average, the gray value stored by grayscale pixmaps.
    #[inline]
    #[must_use]
    pub fn gray(&self) -> f32 {
        (self.red + self.green + self.blue) / 3.0
    }

    /// All four components in RGBA order.
    #[inline]
    #[must_use]
    pub fn components(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// All four components mapped onto a storage type.
    #[must_use]
    pub fn to_components<C: Component>(&self) -> [C; 4] {
        [
            C::from_unit(self.red),
            C::from_unit(self.green),
            C::from_unit(self.blue),
            C::from_unit(self.alpha),
        ]
    }

    pub fn set_red(&mut self, value: f32) {
        self.red = value.clamp(0.0, 1.0);
    }

    pub fn set_green(&mut self, value: f32) {
        self.green = value.clamp(0.0, 1.0);
    }

    pub fn set_blue(&mut self, value: f32) {
        self.blue = value.clamp(0.0, 1.0);
    }

    pub fn set_alpha(&mut self, value: f32) {
        self.alpha = value.clamp(0.0, 1.0);
    }

    fn set_rgb(&mut self, red: f32, green: f32, blue: f32) {
        self.red = red.clamp(0.0, 1.0);
        self.green = green.clamp(0.0, 1.0);
        self.blue = blue.clamp(0.0, 1.0);
    }

    /// Hue angle in degrees.
    ///
    /// The achromatic case (max == min) reports 240 degrees, a historical
    /// convention kept for output compatibility.
    #[must_use]
    pub fn hue(&self) -> f32 {
        let max = self.red.max(self.green).max(self.blue);
        let min = self.red.min(self.green).min(self.blue);

        if math::approx_eq(max, min) {
            return 240.0;
        }

        let delta = max - min;

        let mut hue = if max == self.red {
            (self.green - self.blue) / delta
        } else if max == self.green {
            2.0 + (self.blue - self.red) / delta
        } else {
            4.0 + (self.red - self.green) / delta
        };

        hue *= 60.0;

        if hue < 0.0 {
            hue += 360.0;
        } else if hue > 360.0 {
            hue -= 360.0;
        }

        hue
    }

    /// Saturation in percent (0-100).
    #[must_use]
    pub fn saturation(&self) -> f32 {
        let max = self.red.max(self.green).max(self.blue);

        if math::is_zero(max) {
            return 0.0;
        }

        let min = self.red.min(self.green).min(self.blue);

        (max - min) / max * 100.0
    }

    /// Brightness in percent (0-100).
    #[must_use]
    pub fn value(&self) -> f32 {
        self.red.max(self.green).max(self.blue) * 100.0
    }

    /// Rotates the hue, keeping saturation and value.
    pub fn set_hue(&mut self, degrees: f32) {
        let hue = degrees.rem_euclid(360.0);

        self.update_from_hsv(hue, self.saturation(), self.value());
    }

    /// Replaces the saturation percentage, keeping hue and value.
    pub fn set_saturation(&mut self, percent: f32) {
        let saturation = percent.clamp(0.0, 100.0);

        self.update_from_hsv(self.hue(), saturation, self.value());
    }

    /// Replaces the brightness percentage, keeping hue and saturation.
    pub fn set_value(&mut self, percent: f32) {
        let value = percent.clamp(0.0, 100.0);

        self.update_from_hsv(self.hue(), self.saturation(), value);
    }

    /// Sector-based HSV to RGB conversion with hue in degrees and
    /// saturation/value in percent. Hue is quantized to the nearest
    /// 60-degree sector; component clamping absorbs the overshoot the
    /// magic terms produce at partial saturation.
    fn update_from_hsv(&mut self, hue: f32, saturation: f32, value: f32) {
        const MIN: f32 = 0.01;
        const MAX: f32 = 100.0;

        if math::is_zero(saturation) {
            let gray = value * MIN;

            self.set_rgb(gray, gray, gray);

            return;
        }

        let rounded = (hue / 60.0).round();
        let sector = (rounded as u32) % 6;
        let factorial = rounded - sector as f32;

        let magic_a = value * (MAX - saturation);
        let magic_b = value * (MAX - factorial * saturation);
        let magic_c = value * (MAX - (MAX - factorial) * saturation);

        match sector {
            0 => self.set_rgb(value * MIN, magic_c * MIN, magic_a * MIN),
            1 => self.set_rgb(magic_b * MIN, value * MIN, magic_a * MIN),
            2 => self.set_rgb(magic_a * MIN, value * MIN, magic_c * MIN),
            3 => self.set_rgb(magic_a * MIN, magic_b * MIN, value * MIN),
            4 => self.set_rgb(magic_c * MIN, magic_a * MIN, value * MIN),
            _ => self.set_rgb(value * MIN, magic_a * MIN, magic_c * MIN),
        }
    }

    /// Luminance of the color under the given conversion formula.
    ///
    /// `option` parameterizes `Decomposition` (max/min select),
    /// `SingleChannel` (channel select) and `ShadesScale` (quantization
    /// step).
    #[must_use]
    pub fn luminance(&self, mode: GrayscaleMode, option: i32) -> f32 {
        match mode {
            GrayscaleMode::Average => self.gray(),
            GrayscaleMode::LumaRec601 => self.weighted_luminance(&REC_601_WEIGHTS),
            GrayscaleMode::LumaRec709 => self.weighted_luminance(&REC_709_WEIGHTS),
            GrayscaleMode::LumaItu => self.weighted_luminance(&ITU_WEIGHTS),
            GrayscaleMode::Desaturation => {
                let max = self.red.max(self.green).max(self.blue);
                let min = self.red.min(self.green).min(self.blue);

                (max + min) / 2.0
            }
            GrayscaleMode::Decomposition => {
                if option > 0 {
                    self.red.max(self.green).max(self.blue)
                } else {
                    self.red.min(self.green).min(self.blue)
                }
            }
            GrayscaleMode::SingleChannel => match option {
                0 => self.red,
                1 => self.green,
                _ => self.blue,
            },
            GrayscaleMode::ShadesScale => {
                let average = self.gray();

                if option <= 0 {
                    return average;
                }

                let step = option as f32;

                (average / step).round() * step
            }
        }
    }

    /// Luminance mapped onto a storage component.
    #[must_use]
    pub fn luminance_component<C: Component>(&self, mode: GrayscaleMode, option: i32) -> C {
        C::from_unit(self.luminance(mode, option))
    }

    fn weighted_luminance(&self, weights: &[f32; 3]) -> f32 {
        self.red * weights[0] + self.green * weights[1] + self.blue * weights[2]
    }

    /// Combines two alpha values: multiplicative, or the screen-composite
    /// form `a + b - a*b` when `premultiplied` is set.
    #[inline]
    #[must_use]
    pub fn alpha_blending(alpha_a: f32, alpha_b: f32, premultiplied: bool) -> f32 {
        if premultiplied {
            alpha_a + alpha_b - alpha_a * alpha_b
        } else {
            alpha_a * alpha_b
        }
    }

    /// Screen operator: `1 - (1-a)(1-b)` per color channel.
    #[must_use]
    pub fn screen_blending(base: &Color, operand: &Color) -> Color {
        Color::new(
            1.0 - (1.0 - base.red) * (1.0 - operand.red),
            1.0 - (1.0 - base.green) * (1.0 - operand.green),
            1.0 - (1.0 - base.blue) * (1.0 - operand.blue),
            Color::alpha_blending(base.alpha, operand.alpha, false),
        )
    }

    /// Overlay operator: multiply in the shadows, screen in the lights.
    #[must_use]
    pub fn overlay_blending(base: &Color, operand: &Color) -> Color {
        fn channel(a: f32, b: f32) -> f32 {
            if a < 0.5 {
                2.0 * a * b
            } else {
                1.0 - 2.0 * (1.0 - a) * (1.0 - b)
            }
        }

        Color::new(
            channel(base.red, operand.red),
            channel(base.green, operand.green),
            channel(base.blue, operand.blue),
            Color::alpha_blending(base.alpha, operand.alpha, false),
        )
    }

    /// Per-channel absolute difference.
    #[must_use]
    pub fn difference_blending(base: &Color, operand: &Color) -> Color {
        fn channel(a: f32, b: f32) -> f32 {
            a.max(b) - a.min(b)
        }

        Color::new(
            channel(base.red, operand.red),
            channel(base.green, operand.green),
            channel(base.blue, operand.blue),
            Color::alpha_blending(base.alpha, operand.alpha, false),
        )
    }

    /// Per-channel minimum.
    #[must_use]
    pub fn darken_blending(base: &Color, operand: &Color) -> Color {
        Color::new(
            base.red.min(operand.red),
            base.green.min(operand.green),
            base.blue.min(operand.blue),
            Color::alpha_blending(base.alpha, operand.alpha, false),
        )
    }

    /// Per-channel maximum.
    #[must_use]
    pub fn lighten_blending(base: &Color, operand: &Color) -> Color {
        Color::new(
            base.red.max(operand.red),
            base.green.max(operand.green),
            base.blue.max(operand.blue),
            Color::alpha_blending(base.alpha, operand.alpha, false),
        )
    }

    /// Merges `operand` over `base` under a blend mode.
    ///
    /// `Replace` returns the operand outright. Every other mode computes
    /// the operator result, then interpolates `base` toward it by
    /// `operand.alpha() * opacity`, so the operand's alpha and the global
    /// opacity jointly control blend strength.
    #[must_use]
    pub fn blend(base: Color, operand: Color, mode: BlendMode, opacity: f32) -> Color {
        let result = match mode {
            BlendMode::Replace => return operand,
            BlendMode::Normal => operand,
            BlendMode::Addition => base + operand,
            BlendMode::Subtract => base - operand,
            BlendMode::Multiply => base * operand,
            BlendMode::Divide => base / operand,
            BlendMode::Screen => Color::screen_blending(&base, &operand),
            BlendMode::Overlay => Color::overlay_blending(&base, &operand),
            BlendMode::Difference => Color::difference_blending(&base, &operand),
            BlendMode::Darken => Color::darken_blending(&base, &operand),
            BlendMode::Lighten => Color::lighten_blending(&base, &operand),
        };

        Color::linear_interpolation(&base, &result, operand.alpha * opacity)
    }

    /// Component-wise linear interpolation across all four channels.
    #[must_use]
    pub fn linear_interpolation(start: &Color, end: &Color, factor: f32) -> Color {
        Color::new(
            math::linear_interpolation(start.red, end.red, factor),
            math::linear_interpolation(start.green, end.green, factor),
            math::linear_interpolation(start.blue, end.blue, factor),
            math::linear_interpolation(start.alpha, end.alpha, factor),
        )
    }

    /// Component-wise cosine interpolation across all four channels.
    #[must_use]
    pub fn cosine_interpolation(start: &Color, end: &Color, factor: f32) -> Color {
        Color::new(
            math::cosine_interpolation(start.red, end.red, factor),
            math::cosine_interpolation(start.green, end.green, factor),
            math::cosine_interpolation(start.blue, end.blue, factor),
            math::cosine_interpolation(start.alpha, end.alpha, factor),
        )
    }

    /// Bilinear interpolation of four corner colors.
    #[must_use]
    pub fn bilinear_interpolation(
        bottom_left: &Color,
        bottom_right: &Color,
        top_left: &Color,
        top_right: &Color,
        factor_x: f32,
        factor_y: f32,
    ) -> Color {
        let bottom = Color::linear_interpolation(bottom_left, bottom_right, factor_x);
        let top = Color::linear_interpolation(top_left, top_right, factor_x);

        Color::linear_interpolation(&bottom, &top, factor_y)
    }

    /// Bicosine interpolation of four corner colors.
    #[must_use]
    pub fn bicosine_interpolation(
        bottom_left: &Color,
        bottom_right: &Color,
        top_left: &Color,
        top_right: &Color,
        factor_x: f32,
        factor_y: f32,
    ) -> Color {
        let bottom = Color::cosine_interpolation(bottom_left, bottom_right, factor_x);
        let top = Color::cosine_interpolation(top_left, top_right, factor_x);

        Color::cosine_interpolation(&bottom, &top, factor_y)
    }
}

impl std::ops::Add for Color {
    type Output = Color;

    /// All four channels combine, clamped.
    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.red + rhs.red,
            self.green + rhs.green,
            self.blue + rhs.blue,
            self.alpha + rhs.alpha,
        )
    }
}

impl std::ops::Sub for Color {
    type Output = Color;

    /// All four channels combine, floored at zero.
    fn sub(self, rhs: Color) -> Color {
        Color::new(
            self.red - rhs.red,
            self.green - rhs.green,
            self.blue - rhs.blue,
            self.alpha - rhs.alpha,
        )
    }
}

impl std::ops::Mul for Color {
    type Output = Color;

    /// All four channels multiply.
    fn mul(self, rhs: Color) -> Color {
        Color::new(
            self.red * rhs.red,
            self.green * rhs.green,
            self.blue * rhs.blue,
            self.alpha * rhs.alpha,
        )
    }
}

impl std::ops::Div for Color {
    type Output = Color;

    /// Per-channel division on RGB; a non-positive divisor yields zero
    /// instead of infinity. Alpha keeps the left operand's value.
    fn div(self, rhs: Color) -> Color {
        fn channel(a: f32, b: f32) -> f32 {
            if b <= 0.0 {
                0.0
            } else {
                a / b
            }
        }

        Color::new(
            channel(self.red, rhs.red),
            channel(self.green, rhs.green),
            channel(self.blue, rhs.blue),
            self.alpha,
        )
    }
}

impl std::ops::Add<f32> for Color {
    type Output = Color;

    /// Offsets RGB, alpha untouched.
    fn add(self, rhs: f32) -> Color {
        Color::new(
            self.red + rhs,
            self.green + rhs,
            self.blue + rhs,
            self.alpha,
        )
    }
}

impl std::ops::Sub<f32> for Color {
    type Output = Color;

    /// Offsets RGB downward, alpha untouched.
    fn sub(self, rhs: f32) -> Color {
        Color::new(
            self.red - rhs,
            self.green - rhs,
            self.blue - rhs,
            self.alpha,
        )
    }
}

impl std::ops::Mul<f32> for Color {
    type Output = Color;

    /// Scales RGB, alpha untouched.
    fn mul(self, rhs: f32) -> Color {
        Color::new(
            self.red * rhs,
            self.green * rhs,
            self.blue * rhs,
            self.alpha,
        )
    }
}

impl std::ops::Div<f32> for Color {
    type Output = Color;

    /// Scales RGB down; a non-positive scalar returns the color unchanged.
    fn div(self, rhs: f32) -> Color {
        if rhs <= 0.0 {
            return self;
        }

        Color::new(
            self.red / rhs,
            self.green / rhs,
            self.blue / rhs,
            self.alpha,
        )
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Color({:.4}, {:.4}, {:.4}, {:.4})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}
