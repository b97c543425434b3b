// src/geometry.rs

//! Minimal 2D geometry: `Point` for signed drawing coordinates and `Rect`
//! for axis-aligned clip regions and dirty-area tracking.

use serde::{Deserialize, Serialize};

/// A signed 2D coordinate used by the drawing primitives.
///
/// Points may lie outside a pixmap; the drawing code clamps or skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Swaps the X and Y components, used when rasterizing steep segments.
    #[inline]
    pub fn swap_axes(&mut self) {
        std::mem::swap(&mut self.x, &mut self.y);
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixmap space (origin top-left).
///
/// `x`/`y` locate the top-left corner; `width`/`height` extend right and
/// down. A rectangle with a zero dimension is invalid and ignored by
/// region operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering `width` x `height` at the origin.
    #[inline]
    #[must_use]
    pub const fn from_dimensions(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Both dimensions are nonzero.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// One-past-the-right column.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One-past-the-bottom row.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The rectangle lies completely inside a buffer of the given dimensions.
    #[inline]
    #[must_use]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// The rectangle's origin starts beyond the buffer, leaving no overlap.
    #[inline]
    #[must_use]
    pub const fn is_outside(&self, width: u32, height: u32) -> bool {
        self.x >= width || self.y >= height
    }

    /// Shrinks the rectangle so it fits inside the given dimensions.
    ///
    /// The origin is untouched; callers reject rectangles whose origin is
    /// already outside via [`Rect::is_outside`].
    pub fn crop_on_overflow(&mut self, width: u32, height: u32) {
        if self.right() > width {
            self.width = width.saturating_sub(self.x);
        }

        if self.bottom() > height {
            self.height = height.saturating_sub(self.y);
        }
    }

    /// Grows this rectangle to the union of itself and `other`.
    ///
    /// Invalid operands are skipped; merging into an invalid rectangle
    /// adopts `other` wholesale.
    pub fn merge(&mut self, other: &Rect) {
        if !other.is_valid() {
            return;
        }

        if !self.is_valid() {
            *self = *other;

            return;
        }

        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        self.x = self.x.min(other.x);
        self.y = self.y.min(other.y);
        self.width = right - self.x;
        self.height = bottom - self.y;
    }

    /// Whether a point falls inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
