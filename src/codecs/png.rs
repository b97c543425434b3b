// src/codecs/png.rs

//! PNG codec backed by the `image` crate's decoder and encoder.
//!
//! Every decode lands on one of the four 8-bit channel modes: palette entries
//! expand to their colors, sub-8-bit grays expand to 8 bits and 16-bit
//! samples truncate.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ExtendedColorType, ImageEncoder, ImageFormat};

use crate::codecs::PixmapCodec;
use crate::pixmap::Pixmap;
use crate::processor::Processor;
use crate::types::{ChannelMode, MirrorMode};

/// The fixed 8-byte prefix of every PNG stream.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Reads and writes PNG files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec {
    invert_y_axis: bool,
}

impl PngCodec {
    /// Creates a codec. `invert_y_axis` selects whether pixmap row 0 holds
    /// the bottom image row instead of the top one.
    #[must_use]
    pub fn new(invert_y_axis: bool) -> Self {
        Self { invert_y_axis }
    }
}

impl PixmapCodec for PngCodec {
    fn invert_y_axis(&self) -> bool {
        self.invert_y_axis
    }

    fn set_invert_y_axis(&mut self, invert: bool) {
        self.invert_y_axis = invert;
    }

    fn read_file(&self, path: &Path) -> Result<Pixmap<u8>> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read the PNG file {}", path.display()))?;

        anyhow::ensure!(
            bytes.len() >= PNG_SIGNATURE.len() && bytes[..PNG_SIGNATURE.len()] == PNG_SIGNATURE,
            "Failed to read {}: not a PNG stream (bad signature)",
            path.display()
        );

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .with_context(|| format!("Failed to decode the PNG file {}", path.display()))?;

        let pixmap = match decoded.color() {
            ColorType::L8 | ColorType::L16 => {
                let buffer = decoded.into_luma8();
                let (width, height) = buffer.dimensions();

                Pixmap::from_raw(width, height, ChannelMode::Grayscale, buffer.into_raw())?
            }
            ColorType::La8 | ColorType::La16 => {
                let buffer = decoded.into_luma_alpha8();
                let (width, height) = buffer.dimensions();

                Pixmap::from_raw(width, height, ChannelMode::GrayscaleAlpha, buffer.into_raw())?
            }
            ColorType::Rgb8 | ColorType::Rgb16 => {
                let buffer = decoded.into_rgb8();
                let (width, height) = buffer.dimensions();

                Pixmap::from_raw(width, height, ChannelMode::Rgb, buffer.into_raw())?
            }
            _ => {
                let buffer = decoded.into_rgba8();
                let (width, height) = buffer.dimensions();

                Pixmap::from_raw(width, height, ChannelMode::Rgba, buffer.into_raw())?
            }
        };

        if self.invert_y_axis {
            let flipped = Processor::mirror(&pixmap, MirrorMode::X)?;

            return Ok(flipped);
        }

        Ok(pixmap)
    }

    fn write_file(&self, path: &Path, pixmap: &Pixmap<u8>) -> Result<()> {
        anyhow::ensure!(
            pixmap.is_valid(),
            "Cannot write an invalid pixmap to {}",
            path.display()
        );

        let flipped;
        let source = if self.invert_y_axis {
            flipped = Processor::mirror(pixmap, MirrorMode::X)?;

            &flipped
        } else {
            pixmap
        };

        let color_type = match source.channel_mode() {
            ChannelMode::Grayscale => ExtendedColorType::L8,
            ChannelMode::GrayscaleAlpha => ExtendedColorType::La8,
            ChannelMode::Rgb => ExtendedColorType::Rgb8,
            ChannelMode::Rgba => ExtendedColorType::Rgba8,
        };

        let output = fs::File::create(path)
            .with_context(|| format!("Failed to create the PNG file {}", path.display()))?;
        let encoder = PngEncoder::new(output);

        encoder
            .write_image(source.data(), source.width(), source.height(), color_type)
            .with_context(|| format!("Failed to write the PNG file {}", path.display()))
    }
}
