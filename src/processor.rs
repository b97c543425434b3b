// src/processor.rs

//! Drawing and transformation routines layered over [`Pixmap`].
//!
//! A [`Processor`] borrows one pixmap mutably and mutates it in place:
//! segment, circle and rectangle drawing, whole-buffer translation and
//! wrapping shifts, block transfers, blended region copies and masked
//! stencil copies. Reworks that change dimensions or channel layout
//! (resize, crop, extend, mirror, rotation, channel conversions) are
//! associated functions that leave their input untouched and return a
//! fresh pixmap.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::math;
use crate::pixmap::Pixmap;
use crate::types::{
    BlendMode, Channel, ChannelMode, Component, FilteringMode, GrayscaleMode, MirrorMode,
};

/// In-place pixmap editor.
///
/// Holds an internal scratch buffer so translation and shifting never
/// read pixels they have already overwritten. The buffer is lazily
/// allocated and reused across calls.
#[derive(Debug)]
pub struct Processor<'a, C: Component = u8> {
    target: &'a mut Pixmap<C>,
    swap_buffer: Vec<C>,
}

impl<'a, C: Component> Processor<'a, C> {
    /// Wraps a pixmap for in-place processing.
    pub fn new(target: &'a mut Pixmap<C>) -> Self {
        Self {
            target,
            swap_buffer: Vec::new(),
        }
    }

    /// Read access to the pixmap being processed.
    #[must_use]
    pub fn target(&self) -> &Pixmap<C> {
        self.target
    }

    /// Multiplies every color component by a scalar. Alpha is scaled too;
    /// results clamp to `[0, 1]`.
    pub fn scale_value(&mut self, scalar: f32) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        self.target.for_each_pixel(|pixel| {
            *pixel = *pixel * scalar;

            true
        });

        Ok(())
    }

    /// Multiplies a single channel of every pixel by a scalar.
    pub fn scale_value_channel(&mut self, scalar: f32, channel: Channel) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        self.target.for_each_pixel(|pixel| {
            match channel {
                Channel::Red => pixel.set_red(pixel.red() * scalar),
                Channel::Green => pixel.set_green(pixel.green() * scalar),
                Channel::Blue => pixel.set_blue(pixel.blue() * scalar),
                Channel::Alpha => pixel.set_alpha(pixel.alpha() * scalar),
            }

            true
        });

        Ok(())
    }

    /// Draws a segment between two points with Bresenham stepping.
    ///
    /// Endpoints may lie outside the pixmap: they are pulled back onto
    /// the nearest edge along the segment's own direction before
    /// plotting. A segment entirely off one side is a no-op.
    pub fn draw_segment(
        &mut self,
        mut a: Point,
        mut b: Point,
        color: &Color,
        mode: BlendMode,
    ) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let width = self.target.width() as i32;
        let height = self.target.height() as i32;

        if (a.x < 0 && b.x < 0)
            || (a.x > width && b.x > width)
            || (a.y < 0 && b.y < 0)
            || (a.y > height && b.y > height)
        {
            return Ok(());
        }

        if !self.clamp_segment_point(&mut a, b) {
            return Ok(());
        }

        if !self.clamp_segment_point(&mut b, a) {
            return Ok(());
        }

        let steep = (b.y - a.y).abs() > (b.x - a.x).abs();

        if steep {
            a.swap_axes();
            b.swap_axes();
        }

        if a.x > b.x {
            std::mem::swap(&mut a, &mut b);
        }

        let delta_x = b.x - a.x;
        let delta_y = (b.y - a.y).abs();

        let mut error = delta_x as f32 / 2.0;
        let y_step = if a.y < b.y { 1 } else { -1 };
        let mut y = a.y;

        for x in a.x..=b.x {
            if steep {
                self.target.blend_free_pixel(y, x, color, mode, 1.0);
            } else {
                self.target.blend_free_pixel(x, y, color, mode, 1.0);
            }

            error -= delta_y as f32;

            if error < 0.0 {
                y += y_step;
                error += delta_x as f32;
            }
        }

        Ok(())
    }

    /// Draws a circle outline with the midpoint algorithm, plotting all
    /// eight octants per step. Pixels falling outside are skipped.
    pub fn draw_circle(
        &mut self,
        center: Point,
        radius: i32,
        color: &Color,
        mode: BlendMode,
    ) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let mut x = 0;
        let mut y = radius;
        let mut delta = radius - 1;

        while y >= x {
            for (offset_x, offset_y) in [
                (x, y),
                (y, x),
                (-x, y),
                (-y, x),
                (x, -y),
                (y, -x),
                (-x, -y),
                (-y, -x),
            ] {
                self.target
                    .blend_free_pixel(center.x + offset_x, center.y + offset_y, color, mode, 1.0);
            }

            if delta >= 2 * x {
                delta -= 2 * x - 1;
                x += 1;
            } else if delta <= 2 * (radius - y) {
                delta += 2 * y - 1;
                y -= 1;
            } else {
                delta += 2 * (y - x - 1);
                y -= 1;
                x += 1;
            }
        }

        Ok(())
    }

    /// Draws the outline of a rectangle. The stroke sits on the
    /// rectangle's outermost pixels.
    pub fn draw_square(&mut self, rectangle: Rect, color: &Color, mode: BlendMode) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !rectangle.is_valid() {
            log::debug!("Degenerate rectangle {:?}, nothing to draw", rectangle);

            return Ok(());
        }

        let left = rectangle.x as i32;
        let top = rectangle.y as i32;
        let right = rectangle.right() as i32 - 1;
        let bottom = rectangle.bottom() as i32 - 1;

        self.draw_segment(Point::new(left, top), Point::new(right, top), color, mode)?;
        self.draw_segment(Point::new(right, top), Point::new(right, bottom), color, mode)?;
        self.draw_segment(Point::new(right, bottom), Point::new(left, bottom), color, mode)?;
        self.draw_segment(Point::new(left, bottom), Point::new(left, top), color, mode)
    }

    /// Draws the two diagonals of a rectangle.
    pub fn draw_cross(&mut self, rectangle: Rect, color: &Color, mode: BlendMode) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !rectangle.is_valid() {
            log::debug!("Degenerate rectangle {:?}, nothing to draw", rectangle);

            return Ok(());
        }

        let left = rectangle.x as i32;
        let top = rectangle.y as i32;
        let right = rectangle.right() as i32 - 1;
        let bottom = rectangle.bottom() as i32 - 1;

        self.draw_segment(Point::new(left, top), Point::new(right, bottom), color, mode)?;
        self.draw_segment(Point::new(left, bottom), Point::new(right, top), color, mode)
    }

    /// Draws an axis-aligned cross through the middle of a rectangle.
    pub fn draw_straight_cross(
        &mut self,
        rectangle: Rect,
        color: &Color,
        mode: BlendMode,
    ) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !rectangle.is_valid() {
            log::debug!("Degenerate rectangle {:?}, nothing to draw", rectangle);

            return Ok(());
        }

        let left = rectangle.x as i32;
        let top = rectangle.y as i32;
        let right = rectangle.right() as i32 - 1;
        let bottom = rectangle.bottom() as i32 - 1;
        let middle_x = rectangle.x as i32 + (rectangle.width / 2) as i32;
        let middle_y = rectangle.y as i32 + (rectangle.height / 2) as i32;

        self.draw_segment(
            Point::new(middle_x, top),
            Point::new(middle_x, bottom),
            color,
            mode,
        )?;
        self.draw_segment(
            Point::new(left, middle_y),
            Point::new(right, middle_y),
            color,
            mode,
        )
    }

    /// Translates the whole content by a pixel offset. Positive X moves
    /// content to the right, positive Y moves it down. Vacated areas are
    /// filled with zeroes; content pushed past the edge is lost. An
    /// offset reaching either dimension blanks the pixmap entirely.
    pub fn translate(&mut self, x_direction: i32, y_direction: i32) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if x_direction == 0 && y_direction == 0 {
            return Ok(());
        }

        self.prepare_swap_buffer();

        let width = self.target.width();
        let height = self.target.height();

        if x_direction.unsigned_abs() < width && y_direction.unsigned_abs() < height {
            let pitch = self.target.pitch();
            let stride = self.target.color_count();

            let x_offset = x_direction.unsigned_abs() as usize * stride;
            let copy_len = pitch - x_offset;
            let row_limit = height - y_direction.unsigned_abs();

            for row_index in 0..row_limit {
                let (source_row, destination_row) = if y_direction > 0 {
                    (row_index, row_index + y_direction as u32)
                } else {
                    (row_index + y_direction.unsigned_abs(), row_index)
                };

                let source_start = source_row as usize * pitch
                    + if x_direction > 0 { 0 } else { x_offset };
                let destination_start = destination_row as usize * pitch
                    + if x_direction > 0 { x_offset } else { 0 };

                self.swap_buffer[destination_start..destination_start + copy_len]
                    .copy_from_slice(&self.target.data()[source_start..source_start + copy_len]);
            }
        }

        self.target.mark_everything_updated();

        self.swap_buffers()
    }

    /// Shifts the content with wrap-around on both axes. Pixels pushed
    /// past an edge reappear on the opposite side, so no data is lost.
    pub fn shift(&mut self, x_direction: i32, y_direction: i32) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let width = self.target.width();
        let height = self.target.height();

        let x_direction = x_direction.rem_euclid(width as i32) as u32;
        let y_direction = y_direction.rem_euclid(height as i32) as u32;

        if x_direction == 0 && y_direction == 0 {
            return Ok(());
        }

        self.prepare_swap_buffer();

        let pitch = self.target.pitch();
        let stride = self.target.color_count();

        let wrap_len = x_direction as usize * stride;
        let head_len = pitch - wrap_len;

        let mut destination_row = y_direction;

        for row_index in 0..height {
            let source_start = row_index as usize * pitch;
            let destination_start = destination_row as usize * pitch;

            let source_row = &self.target.data()[source_start..source_start + pitch];

            self.swap_buffer[destination_start..destination_start + wrap_len]
                .copy_from_slice(&source_row[head_len..]);
            self.swap_buffer[destination_start + wrap_len..destination_start + pitch]
                .copy_from_slice(&source_row[..head_len]);

            destination_row += 1;

            if destination_row >= height {
                destination_row = 0;
            }
        }

        self.target.mark_everything_updated();

        self.swap_buffers()
    }

    /// Scrolls whole rows without wrap-around, the way a terminal
    /// scrolls its text area. Positive distances move rows down,
    /// negative distances move them up; freed rows are zeroed. A
    /// distance reaching the height blanks the pixmap.
    pub fn shift_text_area(&mut self, distance: i32) -> Result<()> {
        if !self.target.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if distance == 0 {
            return Ok(());
        }

        self.prepare_swap_buffer();

        let height = self.target.height();

        if distance.unsigned_abs() < height {
            let pitch = self.target.pitch();
            let kept = (height - distance.unsigned_abs()) as usize * pitch;

            if distance > 0 {
                let offset = distance as usize * pitch;

                self.swap_buffer[offset..offset + kept]
                    .copy_from_slice(&self.target.data()[..kept]);
            } else {
                let offset = distance.unsigned_abs() as usize * pitch;

                self.swap_buffer[..kept]
                    .copy_from_slice(&self.target.data()[offset..offset + kept]);
            }
        }

        self.target.mark_everything_updated();

        self.swap_buffers()
    }

    /// Raw block transfer from another pixmap. Both clips must be fully
    /// inside their pixmaps, share dimensions, and both pixmaps must use
    /// the same channel mode. Rows are copied without blending.
    pub fn blit(
        &mut self,
        source: &Pixmap<C>,
        source_clip: Rect,
        destination_clip: Rect,
    ) -> Result<()> {
        Self::check_clipping(source, &source_clip)?;
        Self::check_clipping(self.target, &destination_clip)?;

        if source.channel_mode() != self.target.channel_mode() {
            return Err(Error::ChannelModeMismatch {
                expected: self.target.channel_mode(),
                actual: source.channel_mode(),
            });
        }

        if source_clip.width != destination_clip.width
            || source_clip.height != destination_clip.height
        {
            return Err(Error::RegionSizeMismatch {
                source: source_clip,
                destination: destination_clip,
            });
        }

        let stride = self.target.color_count();
        let row_len = destination_clip.width as usize * stride;
        let source_pitch = source.pitch();
        let target_pitch = self.target.pitch();

        for row in 0..destination_clip.height {
            let source_start =
                (source_clip.y + row) as usize * source_pitch + source_clip.x as usize * stride;
            let destination_start = (destination_clip.y + row) as usize * target_pitch
                + destination_clip.x as usize * stride;

            self.target.data_mut()[destination_start..destination_start + row_len]
                .copy_from_slice(&source.data()[source_start..source_start + row_len]);
        }

        self.target.mark_rectangle_updated(destination_clip);

        Ok(())
    }

    /// Blits the whole source onto the same area of the target.
    pub fn blit_full(&mut self, source: &Pixmap<C>) -> Result<()> {
        let area = Rect::from_dimensions(source.width(), source.height());

        self.blit(source, area, area)
    }

    /// Blits the whole source into a destination clip.
    pub fn blit_to(&mut self, source: &Pixmap<C>, destination_clip: Rect) -> Result<()> {
        self.blit(
            source,
            Rect::from_dimensions(source.width(), source.height()),
            destination_clip,
        )
    }

    /// Copies a region of another pixmap onto the target with blending.
    ///
    /// Unlike [`blit`](Self::blit) this is permissive: clips are clamped
    /// to their pixmaps, mismatched clip sizes copy the overlapping
    /// portion, and channel modes may differ since pixels travel as
    /// [`Color`] values. A replace-mode copy between identical layouts
    /// with matching, fully-inside clips is dispatched as a plain block
    /// transfer.
    pub fn copy(
        &mut self,
        source: &Pixmap<C>,
        source_clip: Rect,
        destination_clip: Rect,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        if mode == BlendMode::Replace
            && source.channel_mode() == self.target.channel_mode()
            && source_clip.width == destination_clip.width
            && source_clip.height == destination_clip.height
            && Self::check_clipping(source, &source_clip).is_ok()
            && Self::check_clipping(self.target, &destination_clip).is_ok()
        {
            return self.blit(source, source_clip, destination_clip);
        }

        let source_clip = match Self::clamped_clip(source, source_clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        let destination_clip = match Self::clamped_clip(self.target, destination_clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        let rows = destination_clip.height.min(source_clip.height);
        let columns = destination_clip.width.min(source_clip.width);

        for y in 0..rows {
            for x in 0..columns {
                let color = source.pixel(source_clip.x + x, source_clip.y + y)?;

                self.target.blend_pixel(
                    destination_clip.x + x,
                    destination_clip.y + y,
                    &color,
                    mode,
                    opacity,
                )?;
            }
        }

        self.target.mark_rectangle_updated(Rect::new(
            destination_clip.x,
            destination_clip.y,
            columns,
            rows,
        ));

        Ok(())
    }

    /// Copies the whole source onto the same area of the target.
    pub fn copy_full(&mut self, source: &Pixmap<C>, mode: BlendMode, opacity: f32) -> Result<()> {
        let area = Rect::from_dimensions(source.width(), source.height());

        self.copy(source, area, area, mode, opacity)
    }

    /// Copies the whole source into a destination clip.
    pub fn copy_to(
        &mut self,
        source: &Pixmap<C>,
        destination_clip: Rect,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        self.copy(
            source,
            Rect::from_dimensions(source.width(), source.height()),
            destination_clip,
            mode,
            opacity,
        )
    }

    /// Copies the whole source at a signed position. Negative positions
    /// trim the source on that side; a source entirely outside the
    /// target is a no-op.
    pub fn copy_at(
        &mut self,
        source: &Pixmap<C>,
        x_position: i32,
        y_position: i32,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        let mut source_clip = Rect::from_dimensions(source.width(), source.height());
        let mut destination_clip = Rect::from_dimensions(source.width(), source.height());

        if x_position < 0 {
            let trimmed = x_position.unsigned_abs();

            if trimmed >= source.width() {
                log::debug!("The source pixmap lies left of the target, nothing to copy");

                return Ok(());
            }

            source_clip.x = trimmed;
            source_clip.width = source.width() - trimmed;
            destination_clip.width = source_clip.width;
        } else {
            destination_clip.x = x_position as u32;
        }

        if y_position < 0 {
            let trimmed = y_position.unsigned_abs();

            if trimmed >= source.height() {
                log::debug!("The source pixmap lies above the target, nothing to copy");

                return Ok(());
            }

            source_clip.y = trimmed;
            source_clip.height = source.height() - trimmed;
            destination_clip.height = source_clip.height;
        } else {
            destination_clip.y = y_position as u32;
        }

        self.copy(source, source_clip, destination_clip, mode, opacity)
    }

    /// Blends a uniform color over a region. The clip is clamped to the
    /// pixmap; a clip entirely outside is a no-op.
    pub fn copy_color(
        &mut self,
        color: &Color,
        clip: Rect,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        let clip = match Self::clamped_clip(self.target, clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        for y in 0..clip.height {
            for x in 0..clip.width {
                self.target
                    .blend_pixel(clip.x + x, clip.y + y, color, mode, opacity)?;
            }
        }

        self.target.mark_rectangle_updated(clip);

        Ok(())
    }

    /// Copies a region of another pixmap through a grayscale mask.
    ///
    /// The mask must be a valid grayscale pixmap with the target's exact
    /// dimensions. Destination pixels whose mask value is zero are left
    /// untouched; all others receive the blended source pixel.
    pub fn stencil(
        &mut self,
        source: &Pixmap<C>,
        source_clip: Rect,
        destination_clip: Rect,
        mask: &Pixmap<C>,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        Self::check_mask(self.target, mask)?;

        let source_clip = match Self::clamped_clip(source, source_clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        let destination_clip = match Self::clamped_clip(self.target, destination_clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        let rows = destination_clip.height.min(source_clip.height);
        let columns = destination_clip.width.min(source_clip.width);

        for y in 0..rows {
            for x in 0..columns {
                let destination_x = destination_clip.x + x;
                let destination_y = destination_clip.y + y;

                if math::is_zero(mask.pixel(destination_x, destination_y)?.red()) {
                    continue;
                }

                let color = source.pixel(source_clip.x + x, source_clip.y + y)?;

                self.target
                    .blend_pixel(destination_x, destination_y, &color, mode, opacity)?;
            }
        }

        self.target.mark_rectangle_updated(Rect::new(
            destination_clip.x,
            destination_clip.y,
            columns,
            rows,
        ));

        Ok(())
    }

    /// Blends a uniform color through a grayscale mask.
    pub fn stencil_color(
        &mut self,
        color: &Color,
        clip: Rect,
        mask: &Pixmap<C>,
        mode: BlendMode,
        opacity: f32,
    ) -> Result<()> {
        Self::check_mask(self.target, mask)?;

        let clip = match Self::clamped_clip(self.target, clip)? {
            Some(clip) => clip,
            None => return Ok(()),
        };

        for y in 0..clip.height {
            for x in 0..clip.width {
                let destination_x = clip.x + x;
                let destination_y = clip.y + y;

                if math::is_zero(mask.pixel(destination_x, destination_y)?.red()) {
                    continue;
                }

                self.target
                    .blend_pixel(destination_x, destination_y, color, mode, opacity)?;
            }
        }

        self.target.mark_rectangle_updated(clip);

        Ok(())
    }

    /// Resamples a pixmap to new dimensions.
    ///
    /// Identical dimensions return a plain clone. Sampling ratios are
    /// computed against `source dimension - 1` over the destination
    /// dimension, so upscales compress the source very slightly toward
    /// the origin instead of stretching the last row and column.
    pub fn resize(
        source: &Pixmap<C>,
        width: u32,
        height: u32,
        filtering: FilteringMode,
    ) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if width == source.width() && height == source.height() {
            return Ok(Self::passthrough(source));
        }

        let mut destination = Pixmap::new(width, height, source.channel_mode())?;

        match filtering {
            FilteringMode::Nearest => Self::resize_nearest(source, &mut destination),
            FilteringMode::Linear => Self::resize_linear(source, &mut destination),
            FilteringMode::Cubic => Self::resize_cubic(source, &mut destination),
        }

        Ok(destination)
    }

    /// Resamples a pixmap by a uniform ratio. Fractional dimensions are
    /// truncated; a ratio collapsing either dimension to zero is an
    /// error.
    pub fn resize_by_ratio(
        source: &Pixmap<C>,
        ratio: f32,
        filtering: FilteringMode,
    ) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let width = (source.width() as f32 * ratio) as u32;
        let height = (source.height() as f32 * ratio) as u32;

        Self::resize(source, width, height, filtering)
    }

    /// Extracts a rectangular area as a new pixmap. The rectangle is
    /// clamped to the source; a rectangle entirely outside is an error.
    pub fn crop(source: &Pixmap<C>, rectangle: Rect) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !rectangle.is_valid() || rectangle.is_outside(source.width(), source.height()) {
            return Err(Error::InvalidRegion { region: rectangle });
        }

        let mut rectangle = rectangle;
        rectangle.crop_on_overflow(source.width(), source.height());

        let stride = source.color_count();
        let row_len = rectangle.width as usize * stride;

        let mut data = Vec::with_capacity(rectangle.area() as usize * stride);

        for row in 0..rectangle.height {
            let start =
                (rectangle.y + row) as usize * source.pitch() + rectangle.x as usize * stride;

            data.extend_from_slice(&source.data()[start..start + row_len]);
        }

        Pixmap::from_raw(rectangle.width, rectangle.height, source.channel_mode(), data)
    }

    /// Returns a pixmap enlarged by solid borders. The border widths are
    /// `[left, top, right, bottom]` and the original content sits at
    /// `(left, top)` in the result.
    pub fn extend(source: &Pixmap<C>, borders: [u32; 4], color: &Color) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let [left, top, right, bottom] = borders;

        if left == 0 && top == 0 && right == 0 && bottom == 0 {
            return Ok(Self::passthrough(source));
        }

        let width = source.width() + left + right;
        let height = source.height() + top + bottom;

        let mut destination = Pixmap::filled(width, height, source.channel_mode(), color)?;

        let mut processor = Processor::new(&mut destination);
        processor.blit_to(source, Rect::new(left, top, source.width(), source.height()))?;

        destination.reset_updated_region();

        Ok(destination)
    }

    /// Returns a mirrored pixmap. `X` flips top and bottom, `Y` flips
    /// left and right, `Both` does both at once.
    pub fn mirror(source: &Pixmap<C>, mode: MirrorMode) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = source.color_count();
        let pitch = source.pitch();

        let mut data = vec![C::ZERO; source.data().len()];

        match mode {
            MirrorMode::X => {
                for row in 0..source.height() {
                    let inverted = (source.height() - 1 - row) as usize;

                    data[inverted * pitch..(inverted + 1) * pitch]
                        .copy_from_slice(source.row(row)?);
                }
            }
            MirrorMode::Y => {
                let width = source.width() as usize;

                for row in 0..source.height() {
                    let row_offset = row as usize * pitch;

                    for (index, pixel) in source.row(row)?.chunks_exact(stride).enumerate() {
                        let inverted = row_offset + (width - 1 - index) * stride;

                        data[inverted..inverted + stride].copy_from_slice(pixel);
                    }
                }
            }
            MirrorMode::Both => {
                let count = source.pixel_count();

                for (index, pixel) in source.data().chunks_exact(stride).enumerate() {
                    let inverted = (count - 1 - index) * stride;

                    data[inverted..inverted + stride].copy_from_slice(pixel);
                }
            }
        }

        Pixmap::from_raw(source.width(), source.height(), source.channel_mode(), data)
    }

    /// Returns the pixmap rotated a quarter turn clockwise. Width and
    /// height swap.
    pub fn rotate_quarter_turn(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = source.color_count();
        let source_width = source.width() as usize;
        let destination_width = source.height() as usize;

        let mut data = vec![C::ZERO; source.data().len()];

        for y in 0..source.height() as usize {
            for x in 0..source_width {
                let source_start = (y * source_width + x) * stride;
                let destination_start = (x * destination_width + (destination_width - 1 - y)) * stride;

                data[destination_start..destination_start + stride]
                    .copy_from_slice(&source.data()[source_start..source_start + stride]);
            }
        }

        Pixmap::from_raw(source.height(), source.width(), source.channel_mode(), data)
    }

    /// Returns the pixmap rotated a half turn.
    pub fn rotate_half_turn(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        Self::mirror(source, MirrorMode::Both)
    }

    /// Returns the pixmap rotated a quarter turn counterclockwise.
    /// Width and height swap.
    pub fn rotate_three_quarter_turn(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let stride = source.color_count();
        let source_width = source.width() as usize;
        let destination_width = source.height() as usize;

        let mut data = vec![C::ZERO; source.data().len()];

        for y in 0..source.height() as usize {
            for x in 0..source_width {
                let source_start = (y * source_width + x) * stride;
                let destination_start = ((source_width - 1 - x) * destination_width + y) * stride;

                data[destination_start..destination_start + stride]
                    .copy_from_slice(&source.data()[source_start..source_start + stride]);
            }
        }

        Pixmap::from_raw(source.height(), source.width(), source.channel_mode(), data)
    }

    /// Returns the pixmap with red, green and blue inverted. Alpha is
    /// preserved; grayscale pixmaps pass through unchanged.
    pub fn inverse_colors(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.is_gray_scale() {
            return Ok(Self::passthrough(source));
        }

        let stride = source.color_count();

        let mut data = Vec::with_capacity(source.element_count());

        for pixel in source.data().chunks_exact(stride) {
            data.push(C::from_unit(1.0 - pixel[0].to_unit()));
            data.push(C::from_unit(1.0 - pixel[1].to_unit()));
            data.push(C::from_unit(1.0 - pixel[2].to_unit()));

            if stride == 4 {
                data.push(pixel[3]);
            }
        }

        Pixmap::from_raw(source.width(), source.height(), source.channel_mode(), data)
    }

    /// Returns the pixmap with red and blue exchanged, turning RGB data
    /// into BGR and back. With `swap_alpha` an RGBA pixmap becomes ABGR
    /// instead of BGRA. Grayscale pixmaps pass through unchanged.
    pub fn swap_channels(source: &Pixmap<C>, swap_alpha: bool) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.is_gray_scale() {
            return Ok(Self::passthrough(source));
        }

        let stride = source.color_count();

        let mut data = Vec::with_capacity(source.element_count());

        for pixel in source.data().chunks_exact(stride) {
            if stride == 4 && swap_alpha {
                data.extend_from_slice(&[pixel[3], pixel[2], pixel[1], pixel[0]]);
            } else {
                data.push(pixel[2]);
                data.push(pixel[1]);
                data.push(pixel[0]);

                if stride == 4 {
                    data.push(pixel[3]);
                }
            }
        }

        Pixmap::from_raw(source.width(), source.height(), source.channel_mode(), data)
    }

    /// Returns the pixmap with an opaque alpha channel appended.
    /// Pixmaps that already carry alpha pass through unchanged.
    pub fn add_alpha_channel(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.has_alpha_channel() {
            return Ok(Self::passthrough(source));
        }

        let (mode, stride) = match source.channel_mode() {
            ChannelMode::Grayscale => (ChannelMode::GrayscaleAlpha, 1),
            _ => (ChannelMode::Rgba, 3),
        };

        let mut data = Vec::with_capacity(source.pixel_count() * (stride + 1));

        for pixel in source.data().chunks_exact(stride) {
            data.extend_from_slice(pixel);
            data.push(C::ONE);
        }

        Pixmap::from_raw(source.width(), source.height(), mode, data)
    }

    /// Returns the pixmap without its alpha channel. Pixmaps without
    /// alpha pass through unchanged.
    pub fn remove_alpha_channel(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !source.has_alpha_channel() {
            return Ok(Self::passthrough(source));
        }

        let (mode, kept) = match source.channel_mode() {
            ChannelMode::GrayscaleAlpha => (ChannelMode::Grayscale, 1),
            _ => (ChannelMode::Rgb, 3),
        };

        let stride = source.color_count();

        let mut data = Vec::with_capacity(source.pixel_count() * kept);

        for pixel in source.data().chunks_exact(stride) {
            data.extend_from_slice(&pixel[..kept]);
        }

        Pixmap::from_raw(source.width(), source.height(), mode, data)
    }

    /// Extracts one channel as a grayscale pixmap.
    ///
    /// Asking for alpha where none exists yields a fully white pixmap,
    /// the implicit opacity of alpha-less layouts. Asking for a color
    /// channel of a grayscale pixmap returns the gray values themselves.
    pub fn extract_channel(source: &Pixmap<C>, channel: Channel) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        let slot = match (source.channel_mode(), channel) {
            (ChannelMode::Grayscale | ChannelMode::Rgb, Channel::Alpha) => {
                let mut output = Pixmap::filled(
                    source.width(),
                    source.height(),
                    ChannelMode::Grayscale,
                    &Color::WHITE,
                )?;
                output.reset_updated_region();

                return Ok(output);
            }
            (ChannelMode::Grayscale, _) => return Ok(Self::passthrough(source)),
            (ChannelMode::GrayscaleAlpha, Channel::Alpha) => 1,
            (ChannelMode::GrayscaleAlpha, _) => 0,
            (_, channel) => channel.index(),
        };

        let stride = source.color_count();

        let data: Vec<C> = source
            .data()
            .iter()
            .skip(slot)
            .step_by(stride)
            .copied()
            .collect();

        Pixmap::from_raw(source.width(), source.height(), ChannelMode::Grayscale, data)
    }

    /// Converts to a single-channel pixmap using a luminance formula.
    /// The `option` argument feeds `SingleChannel` (channel index) and
    /// `ShadesScale` (shade count). Grayscale pixmaps pass through
    /// unchanged.
    pub fn to_grayscale(
        source: &Pixmap<C>,
        mode: GrayscaleMode,
        option: i32,
    ) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.is_gray_scale() {
            return Ok(Self::passthrough(source));
        }

        let mut data = Vec::with_capacity(source.pixel_count());

        for index in 0..source.pixel_count() {
            data.push(source.pixel_at(index)?.luminance_component::<C>(mode, option));
        }

        Pixmap::from_raw(source.width(), source.height(), ChannelMode::Grayscale, data)
    }

    /// Converts to a three-channel RGB pixmap. Gray values replicate
    /// into all three channels; alpha is dropped.
    pub fn to_rgb(source: &Pixmap<C>) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.channel_mode() == ChannelMode::Rgb {
            return Ok(Self::passthrough(source));
        }

        let mut data = Vec::with_capacity(source.pixel_count() * 3);

        for index in 0..source.pixel_count() {
            let color = source.pixel_at(index)?;

            data.push(C::from_unit(color.red()));
            data.push(C::from_unit(color.green()));
            data.push(C::from_unit(color.blue()));
        }

        Pixmap::from_raw(source.width(), source.height(), ChannelMode::Rgb, data)
    }

    /// Converts to a four-channel RGBA pixmap with a uniform alpha.
    /// Existing RGBA pixmaps pass through with their own alpha kept.
    pub fn to_rgba(source: &Pixmap<C>, opacity: f32) -> Result<Pixmap<C>> {
        if !source.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if source.channel_mode() == ChannelMode::Rgba {
            return Ok(Self::passthrough(source));
        }

        let alpha = C::from_unit(opacity);

        let mut data = Vec::with_capacity(source.pixel_count() * 4);

        for index in 0..source.pixel_count() {
            let color = source.pixel_at(index)?;

            data.push(C::from_unit(color.red()));
            data.push(C::from_unit(color.green()));
            data.push(C::from_unit(color.blue()));
            data.push(alpha);
        }

        Pixmap::from_raw(source.width(), source.height(), ChannelMode::Rgba, data)
    }

    /// Zeroes the scratch buffer and sizes it to match the target.
    fn prepare_swap_buffer(&mut self) {
        let len = self.target.data().len();

        self.swap_buffer.clear();
        self.swap_buffer.resize(len, C::ZERO);
    }

    /// Exchanges the target's storage with the scratch buffer.
    fn swap_buffers(&mut self) -> Result<()> {
        if self.swap_buffer.len() != self.target.data().len() {
            return Err(Error::SizeMismatch {
                expected: self.target.data().len(),
                actual: self.swap_buffer.len(),
            });
        }

        std::mem::swap(self.target.storage_mut(), &mut self.swap_buffer);

        Ok(())
    }

    /// Pulls a point lying outside the pixmap back onto an edge, along
    /// the segment toward `other`. Returns false when the segment never
    /// crosses the visible area.
    fn clamp_segment_point(&self, point: &mut Point, other: Point) -> bool {
        let width = self.target.width() as f32;
        let height = self.target.height() as f32;

        let segment = (
            (point.x as f32, point.y as f32),
            (other.x as f32, other.y as f32),
        );

        if point.x < 0 || point.y < 0 {
            // Entering through the left edge, or failing that, the top.
            let edges = [
                ((0.0, 0.0), (0.0, height - 1.0)),
                ((0.0, 0.0), (width - 1.0, 0.0)),
            ];

            return Self::clamp_to_edges(point, segment, &edges, width, height);
        }

        if point.x > self.target.width() as i32 || point.y > self.target.height() as i32 {
            // Leaving through the bottom edge, or failing that, the right.
            let edges = [
                ((0.0, height - 1.0), (width - 1.0, height - 1.0)),
                ((width - 1.0, 0.0), (width - 1.0, height - 1.0)),
            ];

            return Self::clamp_to_edges(point, segment, &edges, width, height);
        }

        true
    }

    fn clamp_to_edges(
        point: &mut Point,
        segment: ((f32, f32), (f32, f32)),
        edges: &[((f32, f32), (f32, f32)); 2],
        width: f32,
        height: f32,
    ) -> bool {
        for (edge_start, edge_end) in edges {
            if let Some((x, y)) =
                Self::line_intersection(*edge_start, *edge_end, segment.0, segment.1)
            {
                let x = x.round();
                let y = y.round();

                if x >= 0.0 && y >= 0.0 && x < width && y < height {
                    point.x = x as i32;
                    point.y = y as i32;

                    return true;
                }
            }
        }

        false
    }

    /// Intersection of two infinite lines, each given by two points.
    /// Returns `None` for parallel lines.
    fn line_intersection(
        first_start: (f32, f32),
        first_end: (f32, f32),
        second_start: (f32, f32),
        second_end: (f32, f32),
    ) -> Option<(f32, f32)> {
        let denominator = (first_start.0 - first_end.0) * (second_start.1 - second_end.1)
            - (first_start.1 - first_end.1) * (second_start.0 - second_end.0);

        if math::is_zero(denominator) {
            return None;
        }

        let first_cross = first_start.0 * first_end.1 - first_start.1 * first_end.0;
        let second_cross = second_start.0 * second_end.1 - second_start.1 * second_end.0;

        let x = (first_cross * (second_start.0 - second_end.0)
            - (first_start.0 - first_end.0) * second_cross)
            / denominator;
        let y = (first_cross * (second_start.1 - second_end.1)
            - (first_start.1 - first_end.1) * second_cross)
            / denominator;

        Some((x, y))
    }

    /// Strict clip validation for raw transfers: the pixmap must be
    /// valid and the clip fully inside it.
    fn check_clipping(pixmap: &Pixmap<C>, clip: &Rect) -> Result<()> {
        if !pixmap.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !clip.is_valid() || !clip.fits_within(pixmap.width(), pixmap.height()) {
            return Err(Error::InvalidRegion { region: *clip });
        }

        Ok(())
    }

    /// Permissive clip validation for blended copies: clamps the clip to
    /// the pixmap and returns `None` when nothing overlaps.
    fn clamped_clip(pixmap: &Pixmap<C>, clip: Rect) -> Result<Option<Rect>> {
        if !pixmap.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !clip.is_valid() || clip.is_outside(pixmap.width(), pixmap.height()) {
            log::debug!("Clip {:?} leaves nothing to copy", clip);

            return Ok(None);
        }

        let mut clip = clip;
        clip.crop_on_overflow(pixmap.width(), pixmap.height());

        Ok(Some(clip))
    }

    /// A stencil mask must be a valid grayscale pixmap matching the
    /// target's dimensions.
    fn check_mask(target: &Pixmap<C>, mask: &Pixmap<C>) -> Result<()> {
        if !mask.is_valid() {
            return Err(Error::InvalidPixmap);
        }

        if !mask.is_gray_scale() {
            return Err(Error::ChannelModeMismatch {
                expected: ChannelMode::Grayscale,
                actual: mask.channel_mode(),
            });
        }

        if mask.width() != target.width() || mask.height() != target.height() {
            return Err(Error::SizeMismatch {
                expected: target.pixel_count(),
                actual: mask.pixel_count(),
            });
        }

        Ok(())
    }

    fn resize_nearest(source: &Pixmap<C>, destination: &mut Pixmap<C>) {
        let stride = source.color_count();
        let source_pitch = source.pitch();

        let x_ratio = (source.width() - 1) as f32 / destination.width() as f32;
        let y_ratio = (source.height() - 1) as f32 / destination.height() as f32;

        let width = destination.width();
        let height = destination.height();

        let mut cursor = 0;
        let data = destination.data_mut();

        for destination_y in 0..height {
            let source_y = (y_ratio * destination_y as f32).round() as usize;
            let row_start = source_y * source_pitch;

            for destination_x in 0..width {
                let source_x = (x_ratio * destination_x as f32).round() as usize;
                let source_index = row_start + source_x * stride;

                for slot in 0..stride {
                    data[cursor] = source.data()[source_index + slot];
                    cursor += 1;
                }
            }
        }
    }

    fn resize_linear(source: &Pixmap<C>, destination: &mut Pixmap<C>) {
        let stride = source.color_count();
        let source_width = source.width() as usize;

        let x_ratio = (source.width() - 1) as f32 / destination.width() as f32;
        let y_ratio = (source.height() - 1) as f32 / destination.height() as f32;

        let width = destination.width();
        let height = destination.height();

        let mut cursor = 0;
        let data = destination.data_mut();

        for destination_y in 0..height {
            let real_y = y_ratio * destination_y as f32;
            let row_low = real_y.floor() as usize * source_width;
            let row_high = real_y.ceil() as usize * source_width;
            let y_factor = real_y - real_y.floor();

            for destination_x in 0..width {
                let real_x = x_ratio * destination_x as f32;
                let x_low = real_x.floor() as usize;
                let x_high = real_x.ceil() as usize;
                let x_factor = real_x - real_x.floor();

                let index_a = (row_low + x_low) * stride;
                let index_b = (row_low + x_high) * stride;
                let index_c = (row_high + x_low) * stride;
                let index_d = (row_high + x_high) * stride;

                for slot in 0..stride {
                    let low = math::linear_interpolation(
                        source.data()[index_a + slot].to_unit(),
                        source.data()[index_b + slot].to_unit(),
                        x_factor,
                    );
                    let high = math::linear_interpolation(
                        source.data()[index_c + slot].to_unit(),
                        source.data()[index_d + slot].to_unit(),
                        x_factor,
                    );

                    data[cursor] = C::from_unit(math::linear_interpolation(low, high, y_factor));
                    cursor += 1;
                }
            }
        }
    }

    fn resize_cubic(source: &Pixmap<C>, destination: &mut Pixmap<C>) {
        let stride = source.color_count();
        let mode = source.channel_mode();

        let x_ratio = (source.width() - 1) as f32 / destination.width() as f32;
        let y_ratio = (source.height() - 1) as f32 / destination.height() as f32;

        let width = destination.width();
        let height = destination.height();

        let mut cursor = 0;
        let data = destination.data_mut();

        for destination_y in 0..height {
            let real_y = y_ratio * destination_y as f32;
            let y_low = real_y.floor() as i64;
            let y_factor = real_y - real_y.floor();

            for destination_x in 0..width {
                let real_x = x_ratio * destination_x as f32;
                let x_low = real_x.floor() as i64;
                let x_factor = real_x - real_x.floor();

                for slot in 0..stride {
                    let mut rows = [0.0_f32; 4];

                    for (row_offset, row_value) in rows.iter_mut().enumerate() {
                        let tap_y = y_low - 1 + row_offset as i64;

                        let mut taps = [0.0_f32; 4];

                        for (tap_offset, tap) in taps.iter_mut().enumerate() {
                            let color = source.safe_pixel(x_low - 1 + tap_offset as i64, tap_y);

                            *tap = Self::tap_component(&color, mode, slot);
                        }

                        *row_value =
                            math::catmull_rom(taps[0], taps[1], taps[2], taps[3], x_factor);
                    }

                    let value = math::catmull_rom(rows[0], rows[1], rows[2], rows[3], y_factor);

                    data[cursor] = C::from_unit(value.clamp(0.0, 1.0));
                    cursor += 1;
                }
            }
        }
    }

    /// Selects the color component feeding a given storage slot.
    fn tap_component(color: &Color, mode: ChannelMode, slot: usize) -> f32 {
        match (mode, slot) {
            (ChannelMode::Grayscale, _) => color.red(),
            (ChannelMode::GrayscaleAlpha, 0) => color.red(),
            (ChannelMode::GrayscaleAlpha, _) => color.alpha(),
            (_, 0) => color.red(),
            (_, 1) => color.green(),
            (_, 2) => color.blue(),
            (_, _) => color.alpha(),
        }
    }

    /// Clone that drops the dirty region, for conversions that turn out
    /// to be identities.
    fn passthrough(source: &Pixmap<C>) -> Pixmap<C> {
        let mut output = source.clone();
        output.reset_updated_region();

        output
    }
}

#[cfg(test)]
mod tests;
