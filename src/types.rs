// src/types.rs

//! Core pixel-buffer vocabulary: channel layouts, filtering/blend/mirror
//! mode enums, per-pixmap feature flags and the `Component` storage trait.

use bitflags::bitflags;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Channel layout of a pixmap.
///
/// The discriminant is the authoritative stride: the number of components
/// per pixel used in every buffer offset computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ChannelMode {
    /// Single gray component.
    Grayscale = 1,
    /// Gray component followed by alpha.
    GrayscaleAlpha = 2,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl ChannelMode {
    /// Components per pixel.
    #[inline]
    #[must_use]
    pub const fn color_count(self) -> usize {
        self as usize
    }

    /// Whether the layout carries an alpha component.
    #[inline]
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, ChannelMode::GrayscaleAlpha | ChannelMode::Rgba)
    }

    /// Index of the alpha component inside a pixel, if the layout has one.
    #[inline]
    #[must_use]
    pub const fn alpha_index(self) -> Option<usize> {
        match self {
            ChannelMode::GrayscaleAlpha => Some(1),
            ChannelMode::Rgba => Some(3),
            _ => None,
        }
    }
}

/// One component slot inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
}

impl Channel {
    /// Component offset inside an RGB(A) pixel.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Resampling strategy used by `Processor::resize` and texel sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilteringMode {
    /// Sample at the rounded source coordinate.
    Nearest,
    /// Bilinear from the four nearest texels.
    #[default]
    Linear,
    /// 4x4 Catmull-Rom bicubic convolution.
    Cubic,
}

/// Axis selection for `Processor::mirror`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorMode {
    /// Flip rows (top-bottom).
    X,
    /// Flip columns (left-right).
    Y,
    /// Flip both axes, equal to a half turn.
    Both,
}

/// Luminance formula used for grayscale conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrayscaleMode {
    /// Plain (r + g + b) / 3.
    Average,
    /// Rec. 601 weights.
    LumaRec601,
    /// Rec. 709 weights.
    #[default]
    LumaRec709,
    /// ITU weights.
    LumaItu,
    /// (max + min) / 2.
    Desaturation,
    /// Channel max (option > 0) or min.
    Decomposition,
    /// A single channel selected by the option parameter (0 red, 1 green,
    /// otherwise blue).
    SingleChannel,
    /// Average quantized to a step given by the option parameter. A
    /// non-positive option leaves the average unquantized.
    ShadesScale,
}

/// Compositing operator controlling how a new color merges with a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Overwrite the destination, ignoring opacity.
    #[default]
    Replace,
    /// Alpha compositing.
    Normal,
    Addition,
    Subtract,
    Multiply,
    Divide,
    Screen,
    Overlay,
    Difference,
    Darken,
    Lighten,
}

bitflags! {
    /// Per-pixmap feature switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PixmapFlags: u8 {
        /// Out-of-range UV coordinates wrap modulo 1 instead of sampling black.
        const UV_WRAPPING     = 1 << 0;
        /// Mutations grow the updated-region rectangle.
        const REGION_TRACKING = 1 << 1;
    }
}

impl Default for PixmapFlags {
    /// Both features enabled.
    fn default() -> Self {
        PixmapFlags::UV_WRAPPING | PixmapFlags::REGION_TRACKING
    }
}

/// Storage type of one pixel component.
///
/// Integer components span `[0, MAX]`, floats span `[0, 1]`; the unit
/// conversions bridge the two so `Color` math always runs in floats.
pub trait Component:
    Copy + Default + std::fmt::Debug + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// Black / fully transparent.
    const ZERO: Self;
    /// Full scale: the integer maximum, or 1.0 for floats.
    const ONE: Self;

    /// Maps the component onto [0, 1].
    fn to_unit(self) -> f32;

    /// Maps a [0, 1] value onto the component range, rounding half up for
    /// integer components. Out-of-range input is clamped.
    fn from_unit(value: f32) -> Self;

    /// Uniform random value across the component range.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl Component for u8 {
    const ZERO: Self = 0;
    const ONE: Self = u8::MAX;

    #[inline(always)]
    fn to_unit(self) -> f32 {
        f32::from(self) / 255.0
    }

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
    }

    #[inline(always)]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

impl Component for u16 {
    const ZERO: Self = 0;
    const ONE: Self = u16::MAX;

    #[inline(always)]
    fn to_unit(self) -> f32 {
        f32::from(self) / 65535.0
    }

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        (value.clamp(0.0, 1.0) * 65535.0 + 0.5) as u16
    }

    #[inline(always)]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}

impl Component for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline(always)]
    fn to_unit(self) -> f32 {
        self
    }

    #[inline(always)]
    fn from_unit(value: f32) -> Self {
        value.clamp(0.0, 1.0)
    }

    #[inline(always)]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.gen()
    }
}
