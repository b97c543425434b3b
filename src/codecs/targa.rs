// src/codecs/targa.rs

//! Hand-parsed Targa (TGA) codec.
//!
//! Handles uncompressed true-color (16/24/32-bit), palette (8-bit indices)
//! and grayscale (8/16-bit) images. Run-length and Huffman encoded files are
//! recognized and rejected. Rows on disk run bottom to top when the header's
//! Y origin is zero, so reads and writes mirror vertically whenever that
//! disagrees with the codec's `invert_y_axis` convention.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::codecs::PixmapCodec;
use crate::pixmap::Pixmap;
use crate::processor::Processor;
use crate::types::{ChannelMode, MirrorMode};

const HEADER_LEN: usize = 18;

/// The fixed Targa file header, in on-disk field order.
#[derive(Debug, Clone, Copy, Default)]
struct Header {
    /// Byte 0: length of the identification field that follows the header.
    id_length: u8,
    /// Byte 1: 1 when a colormap is present, 0 otherwise.
    color_map_type: u8,
    /// Byte 2: image type code (1 palette, 2 true-color, 3 grayscale,
    /// 9/10/11 their run-length encoded forms, 32/33 Huffman variants).
    image_type: u8,
    /// Bytes 3-4: first palette slot described by the colormap.
    color_map_origin: u16,
    /// Bytes 5-6: number of colormap entries.
    color_map_length: u16,
    /// Byte 7: bits per colormap entry (15, 16, 24 or 32).
    color_map_entry_size: u8,
    /// Bytes 8-9: X coordinate of the image origin.
    x_origin: u16,
    /// Bytes 10-11: Y coordinate of the image origin; zero means the first
    /// row on disk is the bottom of the image.
    y_origin: u16,
    /// Bytes 12-13: width in pixels.
    width: u16,
    /// Bytes 14-15: height in pixels.
    height: u16,
    /// Byte 16: bits per pixel (8, 16, 24 or 32).
    pixel_depth: u8,
    /// Byte 17: attribute bits and origin corner flags.
    descriptor: u8,
}

impl Header {
    fn parse(bytes: &[u8]) -> Result<Self> {
        anyhow::ensure!(
            bytes.len() >= HEADER_LEN,
            "Targa file is shorter than its {}-byte header",
            HEADER_LEN
        );

        Ok(Self {
            id_length: bytes[0],
            color_map_type: bytes[1],
            image_type: bytes[2],
            color_map_origin: u16::from_le_bytes([bytes[3], bytes[4]]),
            color_map_length: u16::from_le_bytes([bytes[5], bytes[6]]),
            color_map_entry_size: bytes[7],
            x_origin: u16::from_le_bytes([bytes[8], bytes[9]]),
            y_origin: u16::from_le_bytes([bytes[10], bytes[11]]),
            width: u16::from_le_bytes([bytes[12], bytes[13]]),
            height: u16::from_le_bytes([bytes[14], bytes[15]]),
            pixel_depth: bytes[16],
            descriptor: bytes[17],
        })
    }

    fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];

        bytes[0] = self.id_length;
        bytes[1] = self.color_map_type;
        bytes[2] = self.image_type;
        bytes[3..5].copy_from_slice(&self.color_map_origin.to_le_bytes());
        bytes[5..7].copy_from_slice(&self.color_map_length.to_le_bytes());
        bytes[7] = self.color_map_entry_size;
        bytes[8..10].copy_from_slice(&self.x_origin.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.y_origin.to_le_bytes());
        bytes[12..14].copy_from_slice(&self.width.to_le_bytes());
        bytes[14..16].copy_from_slice(&self.height.to_le_bytes());
        bytes[16] = self.pixel_depth;
        bytes[17] = self.descriptor;

        bytes
    }

    fn log_fields(&self) {
        log::debug!(
            "Targa header: type {}, {}x{} at {} bpp, colormap {} (origin {}, length {}, {}-bit entries), origin ({}, {}), id {} bytes, descriptor {:#04x}",
            self.image_type,
            self.width,
            self.height,
            self.pixel_depth,
            self.color_map_type,
            self.color_map_origin,
            self.color_map_length,
            self.color_map_entry_size,
            self.x_origin,
            self.y_origin,
            self.id_length,
            self.descriptor
        );
    }

    fn color_map_bytes(&self) -> usize {
        if self.color_map_type == 0 {
            return 0;
        }

        usize::from(self.color_map_length) * entry_bytes(self.color_map_entry_size)
    }

    fn data_offset(&self) -> usize {
        HEADER_LEN + usize::from(self.id_length) + self.color_map_bytes()
    }

    /// Returns the pixel payload slice, checking it holds a full image at
    /// `bytes_per_pixel`.
    fn pixel_data<'a>(&self, bytes: &'a [u8], bytes_per_pixel: usize) -> Result<&'a [u8]> {
        let start = self.data_offset();
        let expected = usize::from(self.width) * usize::from(self.height) * bytes_per_pixel;

        anyhow::ensure!(
            bytes.len() >= start + expected,
            "Truncated Targa pixel data (expected {} bytes, found {})",
            expected,
            bytes.len().saturating_sub(start)
        );

        Ok(&bytes[start..start + expected])
    }
}

/// Reads and writes uncompressed Targa files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargaCodec {
    invert_y_axis: bool,
}

impl TargaCodec {
    /// Creates a codec. `invert_y_axis` selects whether pixmap row 0 holds
    /// the bottom image row instead of the top one.
    #[must_use]
    pub fn new(invert_y_axis: bool) -> Self {
        Self { invert_y_axis }
    }
}

impl PixmapCodec for TargaCodec {
    fn invert_y_axis(&self) -> bool {
        self.invert_y_axis
    }

    fn set_invert_y_axis(&mut self, invert: bool) {
        self.invert_y_axis = invert;
    }

    fn read_file(&self, path: &Path) -> Result<Pixmap<u8>> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read the Targa file {}", path.display()))?;

        let header = Header::parse(&bytes)
            .with_context(|| format!("Failed to parse the Targa header of {}", path.display()))?;

        header.log_fields();

        anyhow::ensure!(
            header.width > 0 && header.height > 0,
            "Failed to read {}: the Targa header declares an empty {}x{} image",
            path.display(),
            header.width,
            header.height
        );

        let pixmap = match header.image_type {
            1 => decode_palette(&header, &bytes),
            2 => decode_true_color(&header, &bytes),
            3 => decode_grayscale(&header, &bytes),
            9 | 10 | 11 => Err(anyhow::anyhow!(
                "run-length encoded Targa data is not supported"
            )),
            32 | 33 => Err(anyhow::anyhow!(
                "Huffman-compressed Targa data is not supported"
            )),
            other => Err(anyhow::anyhow!("no pixel data (Targa type {})", other)),
        }
        .with_context(|| format!("Failed to read the Targa file {}", path.display()))?;

        // Mirror when the file's stated origin row disagrees with ours.
        let flip = if self.invert_y_axis {
            header.y_origin > 0
        } else {
            header.y_origin == 0
        };

        if flip {
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
        anyhow::ensure!(
            pixmap.width() <= u32::from(u16::MAX) && pixmap.height() <= u32::from(u16::MAX),
            "Pixmap dimensions {}x{} exceed the Targa 16-bit limit",
            pixmap.width(),
            pixmap.height()
        );

        let image_type = match pixmap.channel_mode() {
            ChannelMode::Grayscale => 3,
            ChannelMode::Rgb | ChannelMode::Rgba => 2,
            ChannelMode::GrayscaleAlpha => anyhow::bail!(
                "Failed to write {}: grayscale-alpha has no uncompressed Targa representation",
                path.display()
            ),
        };

        let stride = pixmap.color_count();

        // Y origin zero: rows are stored bottom-first.
        let header = Header {
            image_type,
            width: pixmap.width() as u16,
            height: pixmap.height() as u16,
            pixel_depth: (stride * 8) as u8,
            ..Header::default()
        };

        header.log_fields();

        let mut bytes = Vec::with_capacity(HEADER_LEN + pixmap.data().len());
        bytes.extend_from_slice(&header.to_bytes());

        for step in 0..pixmap.height() {
            let row_index = if self.invert_y_axis {
                step
            } else {
                pixmap.height() - 1 - step
            };

            let row = pixmap.row(row_index)?;

            if stride == 1 {
                bytes.extend_from_slice(row);
            } else {
                // RGB(A) -> BGR(A)
                for pixel in row.chunks_exact(stride) {
                    bytes.push(pixel[2]);
                    bytes.push(pixel[1]);
                    bytes.push(pixel[0]);

                    if stride == 4 {
                        bytes.push(pixel[3]);
                    }
                }
            }
        }

        fs::write(path, &bytes)
            .with_context(|| format!("Failed to write the Targa file {}", path.display()))
    }
}

fn entry_bytes(entry_size: u8) -> usize {
    (usize::from(entry_size) + 7) / 8
}

/// Widens a 5-bit channel to 8 bits, replicating the top bits into the
/// bottom ones so full intensity maps to 255.
fn expand_five_bits(bits: u16) -> u8 {
    let bits = (bits & 0x1F) as u8;

    (bits << 3) | (bits >> 2)
}

fn decode_true_color(header: &Header, bytes: &[u8]) -> Result<Pixmap<u8>> {
    let width = u32::from(header.width);
    let height = u32::from(header.height);

    match header.pixel_depth {
        16 => {
            let data = header.pixel_data(bytes, 2)?;
            let mut pixels = Vec::with_capacity(data.len() / 2 * 3);

            for chunk in data.chunks_exact(2) {
                let value = u16::from_le_bytes([chunk[0], chunk[1]]);

                pixels.push(expand_five_bits(value >> 10));
                pixels.push(expand_five_bits(value >> 5));
                pixels.push(expand_five_bits(value));
            }

            Ok(Pixmap::from_raw(width, height, ChannelMode::Rgb, pixels)?)
        }
        24 => {
            let data = header.pixel_data(bytes, 3)?;
            let pixmap = Pixmap::from_raw(width, height, ChannelMode::Rgb, data.to_vec())?;

            Ok(Processor::swap_channels(&pixmap, false)?)
        }
        32 => {
            let data = header.pixel_data(bytes, 4)?;
            let pixmap = Pixmap::from_raw(width, height, ChannelMode::Rgba, data.to_vec())?;

            Ok(Processor::swap_channels(&pixmap, false)?)
        }
        other => anyhow::bail!("unsupported true-color depth of {} bits", other),
    }
}

fn decode_palette(header: &Header, bytes: &[u8]) -> Result<Pixmap<u8>> {
    anyhow::ensure!(
        header.color_map_type == 1,
        "palette image without a colormap"
    );
    anyhow::ensure!(
        header.pixel_depth == 8,
        "unsupported palette index depth of {} bits",
        header.pixel_depth
    );

    let entry_bytes = entry_bytes(header.color_map_entry_size);
    let map_start = HEADER_LEN + usize::from(header.id_length);
    let map_len = header.color_map_bytes();

    anyhow::ensure!(bytes.len() >= map_start + map_len, "truncated colormap");

    let palette = &bytes[map_start..map_start + map_len];
    let indices = header.pixel_data(bytes, 1)?;

    let mode = if entry_bytes == 4 {
        ChannelMode::Rgba
    } else {
        ChannelMode::Rgb
    };

    let mut pixels = Vec::with_capacity(indices.len() * mode.color_count());

    for &index in indices {
        let slot = usize::from(index)
            .checked_sub(usize::from(header.color_map_origin))
            .filter(|&slot| slot < usize::from(header.color_map_length))
            .ok_or_else(|| anyhow::anyhow!("palette index {} is outside the colormap", index))?;

        let entry = &palette[slot * entry_bytes..(slot + 1) * entry_bytes];

        match entry_bytes {
            2 => {
                let value = u16::from_le_bytes([entry[0], entry[1]]);

                pixels.push(expand_five_bits(value >> 10));
                pixels.push(expand_five_bits(value >> 5));
                pixels.push(expand_five_bits(value));
            }
            3 => pixels.extend_from_slice(&[entry[2], entry[1], entry[0]]),
            4 => pixels.extend_from_slice(&[entry[2], entry[1], entry[0], entry[3]]),
            other => anyhow::bail!("unsupported colormap entry size of {} bytes", other),
        }
    }

    Ok(Pixmap::from_raw(
        u32::from(header.width),
        u32::from(header.height),
        mode,
        pixels,
    )?)
}

fn decode_grayscale(header: &Header, bytes: &[u8]) -> Result<Pixmap<u8>> {
    let width = u32::from(header.width);
    let height = u32::from(header.height);

    match header.pixel_depth {
        8 => {
            let data = header.pixel_data(bytes, 1)?;

            Ok(Pixmap::from_raw(
                width,
                height,
                ChannelMode::Grayscale,
                data.to_vec(),
            )?)
        }
        // Luminance in the low byte, the attribute channel in the high one.
        16 => {
            let data = header.pixel_data(bytes, 2)?;

            Ok(Pixmap::from_raw(
                width,
                height,
                ChannelMode::GrayscaleAlpha,
                data.to_vec(),
            )?)
        }
        other => anyhow::bail!("unsupported grayscale depth of {} bits", other),
    }
}
