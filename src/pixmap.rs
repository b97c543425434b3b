// src/pixmap.rs

//! Owned 2D pixel buffer with a channel layout, dirty-region tracking and
//! normalized sampling.
//!
//! A `Pixmap<C>` stores `width * height * stride` components of type `C`
//! in row-major order, where the stride is dictated by the channel mode.
//! Pixel access converts between storage components and `Color` values;
//! all public accessors are bounds-checked and return `Result` instead of
//! trusting the caller. The fill, noise and gradient helpers mark the
//! whole image updated; single-pixel writes grow the tracked region one
//! pixel at a time.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::gradient::Gradient;
use crate::math;
use crate::noise::PerlinNoise;
use crate::types::{BlendMode, Channel, ChannelMode, Component, GrayscaleMode, PixmapFlags};

/// A two-dimensional pixel buffer.
///
/// Equality compares dimensions, channel mode and pixel content; the
/// dirty region and feature flags are bookkeeping and do not participate.
#[derive(Debug, Clone)]
pub struct Pixmap<C: Component = u8> {
    width: u32,
    height: u32,
    channel_mode: ChannelMode,
    data: Vec<C>,
    updated_region: Option<Rect>,
    flags: PixmapFlags,
}

impl<C: Component> Default for Pixmap<C> {
    /// An empty, invalid pixmap. Every pixel operation rejects it until
    /// `initialize` gives it a size.
    fn default() -> Self {
        Pixmap {
            width: 0,
            height: 0,
            channel_mode: ChannelMode::Rgb,
            data: Vec::new(),
            updated_region: None,
            flags: PixmapFlags::default(),
        }
    }
}

impl<C: Component> PartialEq for Pixmap<C> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.channel_mode == other.channel_mode
            && self.data == other.data
    }
}

impl<C: Component> Pixmap<C> {
    /// Allocates a zeroed pixmap; alpha channels start fully opaque.
    pub fn new(width: u32, height: u32, channel_mode: ChannelMode) -> Result<Self> {
        let mut pixmap = Pixmap::default();

        pixmap.initialize(width, height, channel_mode)?;

        Ok(pixmap)
    }

    /// Allocates a pixmap filled with a uniform color.
    pub fn filled(width: u32, height: u32, channel_mode: ChannelMode, color: &Color) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height, channel_mode)?;

        pixmap.fill(color)?;

        Ok(pixmap)
    }

    /// Wraps an existing component buffer. The buffer length must match
    /// `width * height * stride` exactly.
    pub fn from_raw(
        width: u32,
        height: u32,
        channel_mode: ChannelMode,
        data: Vec<C>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * channel_mode.color_count();

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Pixmap {
            width,
            height,
            channel_mode,
            data,
            updated_region: None,
            flags: PixmapFlags::default(),
        })
    }

    /// (Re)allocates the buffer for new dimensions. Content is zeroed,
    /// alpha channels are set to one and the dirty region is cleared.
    pub fn initialize(&mut self, width: u32, height: u32, channel_mode: ChannelMode) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        self.width = width;
        self.height = height;
        self.channel_mode = channel_mode;
        self.data = vec![C::ZERO; self.element_count()];
        self.updated_region = None;

        self.init_alpha_channel();

        Ok(())
    }

    /// Releases the storage; the pixmap becomes invalid with RGB mode.
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.channel_mode = ChannelMode::Rgb;
        self.data = Vec::new();
        self.updated_region = None;
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && !self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_gray_scale(&self) -> bool {
        matches!(
            self.channel_mode,
            ChannelMode::Grayscale | ChannelMode::GrayscaleAlpha
        )
    }

    #[inline]
    #[must_use]
    pub fn has_alpha_channel(&self) -> bool {
        self.channel_mode.has_alpha()
    }

    /// Number of pixels.
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Components per pixel.
    #[inline]
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.channel_mode.color_count()
    }

    /// Total component count of the buffer.
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.pixel_count() * self.color_count()
    }

    /// Components per row.
    #[inline]
    #[must_use]
    pub fn pitch(&self) -> usize {
        self.width as usize * self.color_count()
    }

    /// Buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<C>()
    }

    /// True when the coordinates fall outside the buffer.
    #[inline]
    #[must_use]
    pub fn overflow(&self, x: u32, y: u32) -> bool {
        x >= self.width || y >= self.height
    }

    /// Raw component storage, row-major.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[C] {
        &self.data
    }

    /// Mutable raw component storage. Writes through this slice bypass
    /// dirty-region tracking.
    #[inline]
    #[must_use]
    pub fn data_mut(&mut self) -> &mut [C] {
        &mut self.data
    }

    pub(crate) fn storage_mut(&mut self) -> &mut Vec<C> {
        &mut self.data
    }

    /// One row of components.
    pub fn row(&self, y: u32) -> Result<&[C]> {
        if y >= self.height {
            return Err(Error::OutOfBounds {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let start = y as usize * self.pitch();

        Ok(&self.data[start..start + self.pitch()])
    }

    /// One mutable row of components. Bypasses dirty-region tracking.
    pub fn row_mut(&mut self, y: u32) -> Result<&mut [C]> {
        if y >= self.height {
            return Err(Error::OutOfBounds {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let pitch = self.pitch();
        let start = y as usize * pitch;

        Ok(&mut self.data[start..start + pitch])
    }

    /// The components of one pixel.
    pub fn pixel_slice(&self, x: u32, y: u32) -> Result<&[C]> {
        self.check_coords(x, y)?;

        let stride = self.color_count();
        let start = self.pixel_index(x, y) * stride;

        Ok(&self.data[start..start + stride])
    }

    /// The mutable components of one pixel. Bypasses dirty-region
    /// tracking.
    pub fn pixel_slice_mut(&mut self, x: u32, y: u32) -> Result<&mut [C]> {
        self.check_coords(x, y)?;

        let stride = self.color_count();
        let start = self.pixel_index(x, y) * stride;

        Ok(&mut self.data[start..start + stride])
    }

    /// Flat pixel index for row-major coordinates.
    #[inline]
    #[must_use]
    pub fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// X coordinate of a flat pixel index.
    #[inline]
    #[must_use]
    pub fn x(&self, pixel_index: usize) -> u32 {
        (pixel_index % self.width as usize) as u32
    }

    /// Y coordinate of a flat pixel index.
    #[inline]
    #[must_use]
    pub fn y(&self, pixel_index: usize) -> u32 {
        (pixel_index / self.width as usize) as u32
    }

    /// Normalized horizontal texture coordinate of a flat pixel index.
    #[must_use]
    pub fn u(&self, pixel_index: usize) -> f32 {
        if self.width <= 1 {
            return 0.0;
        }

        self.x(pixel_index) as f32 / (self.width - 1) as f32
    }

    /// Normalized vertical texture coordinate of a flat pixel index.
    #[must_use]
    pub fn v(&self, pixel_index: usize) -> f32 {
        if self.height <= 1 {
            return 0.0;
        }

        self.y(pixel_index) as f32 / (self.height - 1) as f32
    }

    /// Storage slot of a channel under the current mode, if the mode
    /// carries that channel. Grayscale modes expose their gray value
    /// through `Channel::Red`.
    #[must_use]
    pub fn channel_slot(&self, channel: Channel) -> Option<usize> {
        match (self.channel_mode, channel) {
            (ChannelMode::Grayscale | ChannelMode::GrayscaleAlpha, Channel::Red) => Some(0),
            (ChannelMode::GrayscaleAlpha, Channel::Alpha) => Some(1),
            (ChannelMode::Rgb | ChannelMode::Rgba, Channel::Red) => Some(0),
            (ChannelMode::Rgb | ChannelMode::Rgba, Channel::Green) => Some(1),
            (ChannelMode::Rgb | ChannelMode::Rgba, Channel::Blue) => Some(2),
            (ChannelMode::Rgba, Channel::Alpha) => Some(3),
            _ => None,
        }
    }

    pub fn enable_uv_wrapping(&mut self, state: bool) {
        self.flags.set(PixmapFlags::UV_WRAPPING, state);
    }

    #[must_use]
    pub fn is_uv_wrapping_enabled(&self) -> bool {
        self.flags.contains(PixmapFlags::UV_WRAPPING)
    }

    pub fn enable_region_tracking(&mut self, state: bool) {
        self.flags.set(PixmapFlags::REGION_TRACKING, state);
    }

    #[must_use]
    pub fn is_region_tracking_enabled(&self) -> bool {
        self.flags.contains(PixmapFlags::REGION_TRACKING)
    }

    /// The rectangle touched by writes since the last reset, if any.
    #[inline]
    #[must_use]
    pub fn updated_region(&self) -> Option<Rect> {
        self.updated_region
    }

    /// Grows the tracked region by one pixel.
    pub fn mark_pixel_updated(&mut self, x: u32, y: u32) {
        if !self.flags.contains(PixmapFlags::REGION_TRACKING) {
            return;
        }

        let pixel = Rect::new(x, y, 1, 1);

        match self.updated_region.as_mut() {
            Some(region) => region.merge(&pixel),
            None => self.updated_region = Some(pixel),
        }
    }

    /// Grows the tracked region by a rectangle.
    pub fn mark_rectangle_updated(&mut self, rectangle: Rect) {
        if !self.flags.contains(PixmapFlags::REGION_TRACKING) {
            return;
        }

        match self.updated_region.as_mut() {
            Some(region) => region.merge(&rectangle),
            None => self.updated_region = Some(rectangle),
        }
    }

    /// Marks the whole image updated.
    pub fn mark_everything_updated(&mut self) {
        if !self.flags.contains(PixmapFlags::REGION_TRACKING) {
            return;
        }

        self.updated_region = Some(Rect::from_dimensions(self.width, self.height));
    }

    pub fn reset_updated_region(&mut self) {
        self.updated_region = None;
    }

    /// Reads a pixel as a color. Grayscale modes replicate the gray value
    /// over RGB; modes without alpha report full opacity.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Color> {
        self.check_coords(x, y)?;

        Ok(self.color_at_offset(self.pixel_index(x, y) * self.color_count()))
    }

    /// Reads a pixel by flat index.
    pub fn pixel_at(&self, pixel_index: usize) -> Result<Color> {
        self.check_index(pixel_index)?;

        Ok(self.color_at_offset(pixel_index * self.color_count()))
    }

    /// Reads a pixel, falling back to black outside the buffer. The taps
    /// of the bicubic sampler rely on this fallback.
    #[must_use]
    pub fn safe_pixel(&self, x: i64, y: i64) -> Color {
        if !self.is_valid()
            || x < 0
            || y < 0
            || x >= i64::from(self.width)
            || y >= i64::from(self.height)
        {
            return Color::BLACK;
        }

        self.color_at_offset(self.pixel_index(x as u32, y as u32) * self.color_count())
    }

    /// Reads the pixel nearest to the coordinates, clamping to the edges.
    pub fn closest_pixel(&self, x: i64, y: i64) -> Result<Color> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;

        Ok(self.color_at_offset(self.pixel_index(x, y) * self.color_count()))
    }

    /// Writes a color to a pixel, converting to the channel layout.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: &Color) -> Result<()> {
        self.check_coords(x, y)?;

        let offset = self.pixel_index(x, y) * self.color_count();

        self.write_color_at_offset(offset, color);
        self.mark_pixel_updated(x, y);

        Ok(())
    }

    /// Writes a color to a pixel by flat index.
    pub fn set_pixel_at(&mut self, pixel_index: usize, color: &Color) -> Result<()> {
        self.check_index(pixel_index)?;

        self.write_color_at_offset(pixel_index * self.color_count(), color);

        let (x, y) = (self.x(pixel_index), self.y(pixel_index));

        self.mark_pixel_updated(x, y);

        Ok(())
    }

    /// Writes a color to a pixel, silently ignoring coordinates outside
    /// the buffer.
    pub fn set_free_pixel(&mut self, x: i32, y: i32, color: &Color) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }

        let offset = self.pixel_index(x as u32, y as u32) * self.color_count();

        self.write_color_at_offset(offset, color);
        self.mark_pixel_updated(x as u32, y as u32);
    }

    /// Interpolates the stored pixel toward a color.
    pub fn mix_pixel(&mut self, x: u32, y: u32, color: &Color, mix: f32) -> Result<()> {
        self.check_coords(x, y)?;

        let offset = self.pixel_index(x, y) * self.color_count();
        let previous = self.color_at_offset(offset);

        self.write_color_at_offset(offset, &Color::linear_interpolation(&previous, color, mix));
        self.mark_pixel_updated(x, y);

        Ok(())
    }

    /// Blends a color over the stored pixel. `Replace` writes directly
    /// without reading the previous value.
    pub fn blend_pixel(
        &mut self,
        x: u32,
        y: u32,
        color: &Color,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        self.check_coords(x, y)?;

        let offset = self.pixel_index(x, y) * self.color_count();

        let merged = if mode == BlendMode::Replace {
            *color
        } else {
            Color::blend(self.color_at_offset(offset), *color, mode, opacity)
        };

        self.write_color_at_offset(offset, &merged);
        self.mark_pixel_updated(x, y);

        Ok(())
    }

    /// Blends a color, silently ignoring coordinates outside the buffer.
    /// The drawing primitives plot through this.
    pub fn blend_free_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: &Color,
        mode: BlendMode,
        opacity: f32,
    ) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }

        // Coordinates are validated above, blend_pixel cannot fail here.
        let _ = self.blend_pixel(x as u32, y as u32, color, mode, opacity);
    }

    /// Writes one component of a pixel.
    pub fn set_pixel_element(&mut self, x: u32, y: u32, channel: Channel, value: C) -> Result<()> {
        self.check_coords(x, y)?;

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let offset = self.pixel_index(x, y) * self.color_count() + slot;

        self.data[offset] = value;
        self.mark_pixel_updated(x, y);

        Ok(())
    }

    /// Reads one component of a pixel.
    pub fn pixel_element(&self, x: u32, y: u32, channel: Channel) -> Result<C> {
        self.check_coords(x, y)?;

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        Ok(self.data[self.pixel_index(x, y) * self.color_count() + slot])
    }

    /// Samples at normalized coordinates, picking the nearest pixel.
    ///
    /// Out-of-range coordinates wrap when UV wrapping is enabled and
    /// sample black otherwise.
    #[must_use]
    pub fn nearest_sample(&self, u: f32, v: f32) -> Color {
        if !self.is_valid() {
            return Color::BLACK;
        }

        let (u, v) = match self.resolve_uv(u, v) {
            Some(coords) => coords,
            None => return Color::BLACK,
        };

        let real_x = (self.width - 1) as f32 * u;
        let real_y = (self.height - 1) as f32 * v;

        let offset = self.pixel_index(real_x.round() as u32, real_y.round() as u32)
            * self.color_count();

        self.color_at_offset(offset)
    }

    /// Samples at normalized coordinates with bilinear filtering.
    #[must_use]
    pub fn linear_sample(&self, u: f32, v: f32) -> Color {
        self.planar_sample(u, v, Color::bilinear_interpolation)
    }

    /// Samples at normalized coordinates with bicosine filtering.
    #[must_use]
    pub fn cosine_sample(&self, u: f32, v: f32) -> Color {
        self.planar_sample(u, v, Color::bicosine_interpolation)
    }

    /// Samples at normalized coordinates with a 4x4 bicubic kernel.
    /// Taps outside the buffer read as black rather than clamping to the
    /// edge, which darkens extreme borders slightly.
    #[must_use]
    pub fn cubic_sample(&self, u: f32, v: f32) -> Color {
        if !self.is_valid() {
            return Color::BLACK;
        }

        let (u, v) = match self.resolve_uv(u, v) {
            Some(coords) => coords,
            None => return Color::BLACK,
        };

        let real_x = (self.width - 1) as f32 * u;
        let real_y = (self.height - 1) as f32 * v;

        let lo_x = real_x.floor() as i64;
        let lo_y = real_y.floor() as i64;
        let factor_x = real_x - real_x.floor();
        let factor_y = real_y - real_y.floor();

        let mut taps = [[Color::BLACK; 4]; 4];

        for (j, row) in taps.iter_mut().enumerate() {
            for (i, tap) in row.iter_mut().enumerate() {
                *tap = self.safe_pixel(lo_x + i as i64 - 1, lo_y + j as i64 - 1);
            }
        }

        let component = |select: &dyn Fn(&Color) -> f32| {
            let rows = [0, 1, 2, 3].map(|j: usize| {
                math::cubic_interpolation(
                    select(&taps[j][0]),
                    select(&taps[j][1]),
                    select(&taps[j][2]),
                    select(&taps[j][3]),
                    factor_x,
                )
            });

            math::cubic_interpolation(rows[0], rows[1], rows[2], rows[3], factor_y)
        };

        Color::new(
            component(&|color| color.red()),
            component(&|color| color.green()),
            component(&|color| color.blue()),
            component(&|color| color.alpha()),
        )
    }

    /// Average of every pixel, per channel. Sums are accumulated in f64
    /// so integer components cannot overflow. Invalid pixmaps average to
    /// black.
    #[must_use]
    pub fn average_color(&self) -> Color {
        if !self.is_valid() {
            return Color::default();
        }

        let stride = self.color_count();
        let count = self.pixel_count() as f64;

        if self.is_gray_scale() {
            let mut sum = 0.0_f64;

            for offset in (0..self.data.len()).step_by(stride) {
                sum += f64::from(self.data[offset].to_unit());
            }

            return Color::from_gray((sum / count) as f32);
        }

        let mut sums = [0.0_f64; 3];

        for offset in (0..self.data.len()).step_by(stride) {
            for (slot, sum) in sums.iter_mut().enumerate() {
                *sum += f64::from(self.data[offset + slot].to_unit());
            }
        }

        Color::from_rgb(
            (sums[0] / count) as f32,
            (sums[1] / count) as f32,
            (sums[2] / count) as f32,
        )
    }

    /// Converts the buffer in place to the alpha-carrying variant of its
    /// mode, giving every pixel the provided alpha. Modes that already
    /// carry alpha are left untouched.
    pub fn add_alpha_channel(&mut self, alpha: C) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        match self.channel_mode {
            ChannelMode::GrayscaleAlpha | ChannelMode::Rgba => Ok(()),
            ChannelMode::Grayscale => {
                let gray = std::mem::take(&mut self.data);
                let mut data = Vec::with_capacity(gray.len() * 2);

                for value in gray {
                    data.push(value);
                    data.push(alpha);
                }

                self.data = data;
                self.channel_mode = ChannelMode::GrayscaleAlpha;
                self.mark_everything_updated();

                Ok(())
            }
            ChannelMode::Rgb => {
                let rgb = std::mem::take(&mut self.data);
                let mut data = Vec::with_capacity(rgb.len() / 3 * 4);

                for pixel in rgb.chunks_exact(3) {
                    data.extend_from_slice(pixel);
                    data.push(alpha);
                }

                self.data = data;
                self.channel_mode = ChannelMode::Rgba;
                self.mark_everything_updated();

                Ok(())
            }
        }
    }

    /// Fills every pixel with a color, alpha included.
    pub fn fill(&mut self, color: &Color) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = self.color_count();

        for offset in (0..self.data.len()).step_by(stride) {
            self.write_color_at_offset(offset, color);
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills the color channels with a raw component value. Alpha
    /// channels are left untouched.
    pub fn fill_value(&mut self, value: C) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        match self.channel_mode {
            ChannelMode::Grayscale | ChannelMode::Rgb => self.data.fill(value),
            ChannelMode::GrayscaleAlpha => {
                for offset in (0..self.data.len()).step_by(2) {
                    self.data[offset] = value;
                }
            }
            ChannelMode::Rgba => {
                for offset in (0..self.data.len()).step_by(4) {
                    self.data[offset] = value;
                    self.data[offset + 1] = value;
                    self.data[offset + 2] = value;
                }
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Tiles raw component data over the color channels, wrapping around
    /// the source when it is shorter than the buffer. Alpha channels are
    /// left untouched.
    pub fn fill_buffer(&mut self, source: &[C]) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        match self.channel_mode {
            ChannelMode::Grayscale | ChannelMode::Rgb => {
                for chunk in self.data.chunks_mut(source.len()) {
                    chunk.copy_from_slice(&source[..chunk.len()]);
                }
            }
            ChannelMode::GrayscaleAlpha => {
                let mut cursor = 0;

                for offset in (0..self.data.len()).step_by(2) {
                    self.data[offset] = source[cursor];
                    cursor = (cursor + 1) % source.len();
                }
            }
            ChannelMode::Rgba => {
                let mut cursor = 0;

                for offset in (0..self.data.len()).step_by(4) {
                    for slot in 0..3 {
                        self.data[offset + slot] = source[cursor];
                        cursor = (cursor + 1) % source.len();
                    }
                }
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Tiles another pixmap over this one, repeating it in both axes.
    /// Both pixmaps must share a channel mode.
    pub fn fill_pattern(&mut self, pattern: &Pixmap<C>) -> Result<()> {
        if !self.is_valid() || !pattern.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if self.channel_mode != pattern.channel_mode {
            return Err(Error::ChannelModeMismatch {
                expected: self.channel_mode,
                actual: pattern.channel_mode,
            });
        }

        let pitch = self.pitch();
        let pattern_pitch = pattern.pitch();
        let mut pattern_row = 0_u32;

        for row_index in 0..self.height {
            let source = pattern.row(pattern_row)?;
            let destination = self.row_mut(row_index)?;

            let mut offset = 0;

            while offset < pitch {
                let chunk = (pitch - offset).min(pattern_pitch);

                destination[offset..offset + chunk].copy_from_slice(&source[..chunk]);

                offset += chunk;
            }

            pattern_row = (pattern_row + 1) % pattern.height;
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills each row with the gradient color for its vertical position,
    /// producing horizontal bands.
    pub fn fill_horizontal(&mut self, gradient: &Gradient) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = self.color_count();
        let pitch = self.pitch();

        for row_index in 0..self.height {
            let position = row_index as f32 / self.height as f32;
            let color = gradient.color_at(position);

            let start = row_index as usize * pitch;

            for offset in (start..start + pitch).step_by(stride) {
                self.write_color_at_offset(offset, &color);
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills each column with the gradient color for its horizontal
    /// position, producing vertical bands.
    pub fn fill_vertical(&mut self, gradient: &Gradient) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = self.color_count();
        let pitch = self.pitch();

        for col_index in 0..self.width {
            let position = col_index as f32 / self.width as f32;
            let color = gradient.color_at(position);

            for row_index in 0..self.height {
                let offset = row_index as usize * pitch + col_index as usize * stride;

                self.write_color_at_offset(offset, &color);
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills one channel with a raw component value.
    pub fn fill_channel(&mut self, channel: Channel, value: C) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let stride = self.color_count();

        for offset in (slot..self.data.len()).step_by(stride) {
            self.data[offset] = value;
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Tiles raw component data over one channel, wrapping around the
    /// source when it is shorter than the pixel count.
    pub fn fill_channel_buffer(&mut self, channel: Channel, source: &[C]) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let stride = self.color_count();
        let mut cursor = 0;

        for offset in (slot..self.data.len()).step_by(stride) {
            self.data[offset] = source[cursor];
            cursor = (cursor + 1) % source.len();
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Tiles another pixmap's luminance over one channel.
    pub fn fill_channel_pattern(
        &mut self,
        channel: Channel,
        pattern: &Pixmap<C>,
        mode: GrayscaleMode,
        option: i32,
    ) -> Result<()> {
        if !self.is_valid() || !pattern.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let stride = self.color_count();
        let pitch = self.pitch();
        let pattern_stride = pattern.color_count();

        for row_index in 0..self.height {
            let pattern_y = row_index % pattern.height;

            for col_index in 0..self.width {
                let pattern_x = col_index % pattern.width;
                let pattern_offset =
                    pattern.pixel_index(pattern_x, pattern_y) * pattern_stride;

                let value = pattern
                    .color_at_offset(pattern_offset)
                    .luminance_component::<C>(mode, option);

                let offset = row_index as usize * pitch + col_index as usize * stride + slot;

                self.data[offset] = value;
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills one channel with per-row gradient luminance bands.
    pub fn fill_channel_horizontal(
        &mut self,
        channel: Channel,
        gradient: &Gradient,
        mode: GrayscaleMode,
        option: i32,
    ) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let stride = self.color_count();
        let pitch = self.pitch();

        for row_index in 0..self.height {
            let position = row_index as f32 / self.height as f32;
            let value = gradient
                .color_at(position)
                .luminance_component::<C>(mode, option);

            let start = row_index as usize * pitch + slot;

            for offset in (start..(row_index as usize + 1) * pitch).step_by(stride) {
                self.data[offset] = value;
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Fills one channel with per-column gradient luminance bands.
    pub fn fill_channel_vertical(
        &mut self,
        channel: Channel,
        gradient: &Gradient,
        mode: GrayscaleMode,
        option: i32,
    ) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let slot = self.channel_slot(channel).ok_or(Error::MissingChannel {
            channel,
            mode: self.channel_mode,
        })?;

        let stride = self.color_count();
        let pitch = self.pitch();

        for col_index in 0..self.width {
            let position = col_index as f32 / self.width as f32;
            let value = gradient
                .color_at(position)
                .luminance_component::<C>(mode, option);

            for row_index in 0..self.height {
                let offset = row_index as usize * pitch + col_index as usize * stride + slot;

                self.data[offset] = value;
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Zeroes the whole buffer, alpha included. No-op on an invalid
    /// pixmap.
    pub fn zero_fill(&mut self) {
        if !self.is_valid() {
            return;
        }

        self.data.fill(C::ZERO);
        self.mark_everything_updated();
    }

    /// Fills the color channels with uniform random values. Alpha
    /// channels are left untouched.
    pub fn noise(&mut self) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let length = if self.is_gray_scale() {
            self.pixel_count()
        } else {
            self.pixel_count() * 3
        };

        let mut rng = StdRng::from_entropy();
        let buffer: Vec<C> = (0..length).map(|_| C::random(&mut rng)).collect();

        self.fill_buffer(&buffer)
    }

    /// Fills the color channels with Perlin noise. Grayscale modes and
    /// `gray_noise` use one generator for all channels; otherwise each of
    /// red, green and blue gets an independently seeded field. Alpha
    /// channels are left untouched.
    pub fn perlin_noise(&mut self, scale: f32, gray_noise: bool) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let mut rng = StdRng::from_entropy();
        let stride = self.color_count();
        let limit = self.pixel_count();

        if self.is_gray_scale() || gray_noise {
            let generator = PerlinNoise::seeded(rng.gen());
            let channels = if self.is_gray_scale() { 1 } else { 3 };

            for index in 0..limit {
                let value =
                    C::from_unit(generator.generate_unit(self.u(index) * scale, self.v(index) * scale));

                let offset = index * stride;

                for slot in 0..channels {
                    self.data[offset + slot] = value;
                }
            }
        } else {
            let generators = [
                PerlinNoise::seeded(rng.gen()),
                PerlinNoise::seeded(rng.gen()),
                PerlinNoise::seeded(rng.gen()),
            ];

            for index in 0..limit {
                let u = self.u(index) * scale;
                let v = self.v(index) * scale;
                let offset = index * stride;

                for (slot, generator) in generators.iter().enumerate() {
                    self.data[offset + slot] = C::from_unit(generator.generate_unit(u, v));
                }
            }
        }

        self.mark_everything_updated();

        Ok(())
    }

    /// Applies a function to every pixel in buffer order. Returning
    /// `false` from the function skips the write for that pixel.
    pub fn for_each_pixel(&mut self, mut update: impl FnMut(&mut Color) -> bool) {
        let stride = self.color_count();

        for index in 0..self.pixel_count() {
            let offset = index * stride;
            let mut color = self.color_at_offset(offset);

            if update(&mut color) {
                self.write_color_at_offset(offset, &color);

                let (x, y) = (self.x(index), self.y(index));

                self.mark_pixel_updated(x, y);
            }
        }
    }

    /// Row-major variant handing coordinates to the function.
    pub fn for_each_pixel_row_major(
        &mut self,
        mut update: impl FnMut(&mut Color, u32, u32) -> bool,
    ) {
        let stride = self.color_count();

        for y in 0..self.height {
            for x in 0..self.width {
                let offset = self.pixel_index(x, y) * stride;
                let mut color = self.color_at_offset(offset);

                if update(&mut color, x, y) {
                    self.write_color_at_offset(offset, &color);
                    self.mark_pixel_updated(x, y);
                }
            }
        }
    }

    /// Column-major variant handing coordinates to the function.
    pub fn for_each_pixel_col_major(
        &mut self,
        mut update: impl FnMut(&mut Color, u32, u32) -> bool,
    ) {
        let stride = self.color_count();

        for x in 0..self.width {
            for y in 0..self.height {
                let offset = self.pixel_index(x, y) * stride;
                let mut color = self.color_at_offset(offset);

                if update(&mut color, x, y) {
                    self.write_color_at_offset(offset, &color);
                    self.mark_pixel_updated(x, y);
                }
            }
        }
    }

    /// Rebuilds the buffer with another component type, preserving
    /// dimensions, mode, flags and the dirty region.
    #[must_use]
    pub fn convert<D: Component>(&self) -> Pixmap<D> {
        Pixmap {
            width: self.width,
            height: self.height,
            channel_mode: self.channel_mode,
            data: self
                .data
                .iter()
                .map(|value| D::from_unit(value.to_unit()))
                .collect(),
            updated_region: self.updated_region,
            flags: self.flags,
        }
    }

    fn check_coords(&self, x: u32, y: u32) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if self.overflow(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    fn check_index(&self, pixel_index: usize) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if pixel_index >= self.pixel_count() {
            return Err(Error::IndexOutOfBounds {
                index: pixel_index,
                len: self.pixel_count(),
            });
        }

        Ok(())
    }

    fn resolve_uv(&self, mut u: f32, mut v: f32) -> Option<(f32, f32)> {
        if self.flags.contains(PixmapFlags::UV_WRAPPING) {
            if !(0.0..=1.0).contains(&u) {
                u = u.abs() % 1.0;
            }

            if !(0.0..=1.0).contains(&v) {
                v = v.abs() % 1.0;
            }

            Some((u, v))
        } else if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            None
        } else {
            Some((u, v))
        }
    }

    /// Shared four-tap sampler behind the bilinear and bicosine variants.
    fn planar_sample(
        &self,
        u: f32,
        v: f32,
        interpolate: fn(&Color, &Color, &Color, &Color, f32, f32) -> Color,
    ) -> Color {
        if !self.is_valid() {
            return Color::BLACK;
        }

        let (u, v) = match self.resolve_uv(u, v) {
            Some(coords) => coords,
            None => return Color::BLACK,
        };

        let stride = self.color_count();

        let real_x = (self.width - 1) as f32 * u;
        let lo_x = real_x.floor() as u32;
        let hi_x = real_x.ceil() as u32;

        let real_y = (self.height - 1) as f32 * v;
        let lo_y = real_y.floor() as u32;
        let hi_y = real_y.ceil() as u32;

        interpolate(
            &self.color_at_offset(self.pixel_index(lo_x, lo_y) * stride),
            &self.color_at_offset(self.pixel_index(hi_x, lo_y) * stride),
            &self.color_at_offset(self.pixel_index(lo_x, hi_y) * stride),
            &self.color_at_offset(self.pixel_index(hi_x, hi_y) * stride),
            real_x - lo_x as f32,
            real_y - lo_y as f32,
        )
    }

    fn color_at_offset(&self, offset: usize) -> Color {
        match self.channel_mode {
            ChannelMode::Grayscale => {
                let gray = self.data[offset].to_unit();

                Color::new(gray, gray, gray, 1.0)
            }
            ChannelMode::GrayscaleAlpha => {
                let gray = self.data[offset].to_unit();

                Color::new(gray, gray, gray, self.data[offset + 1].to_unit())
            }
            ChannelMode::Rgb => Color::new(
                self.data[offset].to_unit(),
                self.data[offset + 1].to_unit(),
                self.data[offset + 2].to_unit(),
                1.0,
            ),
            ChannelMode::Rgba => Color::new(
                self.data[offset].to_unit(),
                self.data[offset + 1].to_unit(),
                self.data[offset + 2].to_unit(),
                self.data[offset + 3].to_unit(),
            ),
        }
    }

    fn write_color_at_offset(&mut self, offset: usize, color: &Color) {
        match self.channel_mode {
            ChannelMode::Grayscale => {
                self.data[offset] = C::from_unit(color.gray());
            }
            ChannelMode::GrayscaleAlpha => {
                self.data[offset] = C::from_unit(color.gray());
                self.data[offset + 1] = C::from_unit(color.alpha());
            }
            ChannelMode::Rgb => {
                self.data[offset] = C::from_unit(color.red());
                self.data[offset + 1] = C::from_unit(color.green());
                self.data[offset + 2] = C::from_unit(color.blue());
            }
            ChannelMode::Rgba => {
                self.data[offset] = C::from_unit(color.red());
                self.data[offset + 1] = C::from_unit(color.green());
                self.data[offset + 2] = C::from_unit(color.blue());
                self.data[offset + 3] = C::from_unit(color.alpha());
            }
        }
    }

    fn init_alpha_channel(&mut self) {
        if let Some(slot) = self.channel_mode.alpha_index() {
            let stride = self.color_count();

            for offset in (slot..self.data.len()).step_by(stride) {
                self.data[offset] = C::ONE;
            }
        }
    }
}

impl<C: Component> std::fmt::Display for Pixmap<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Pixmap data :")?;
        writeln!(f, "Width : {}", self.width)?;
        writeln!(f, "Height : {}", self.height)?;
        writeln!(
            f,
            "Channels count : {} ({:?})",
            self.color_count(),
            self.channel_mode
        )?;
        writeln!(f, "Pixel count : {}", self.pixel_count())?;
        writeln!(f, "Element count : {}", self.element_count())?;
        write!(f, "Data size : {} bytes", self.bytes())
    }
}
