// src/codecs/mod.rs

//! On-disk image codecs for 8-bit pixmaps.
//!
//! Each format implements [`PixmapCodec`], which pairs `read_file`/`write_file`
//! with an `invert_y_axis` flag describing which image row the pixmap's row 0
//! holds: the top row when the flag is clear (the Vulkan/DirectX convention)
//! or the bottom row when it is set (the OpenGL/Targa convention). The
//! [`read_file`] and [`write_file`] free functions pick a codec from the file
//! extension.

pub mod png;
pub mod targa;

use std::path::Path;

use anyhow::{Context, Result};

use crate::pixmap::Pixmap;

pub use png::PngCodec;
pub use targa::TargaCodec;

/// A reader/writer pair for one on-disk image format.
///
/// Codecs operate on 8-bit pixmaps: formats carrying wider or narrower
/// samples normalize to 8 bits per component during decode.
pub trait PixmapCodec {
    /// When true, row 0 of the pixmap holds the bottom row of the image.
    fn invert_y_axis(&self) -> bool;

    /// Selects which image row the pixmap's row 0 corresponds to.
    fn set_invert_y_axis(&mut self, invert: bool);

    /// Decodes the file at `path` into a fresh pixmap.
    fn read_file(&self, path: &Path) -> Result<Pixmap<u8>>;

    /// Encodes `pixmap` into the file at `path`, replacing any previous
    /// content.
    fn write_file(&self, path: &Path, pixmap: &Pixmap<u8>) -> Result<()>;
}

/// Reads an image file with the codec matching its extension.
///
/// Extensions are matched case-insensitively; anything other than `png`,
/// `tga` or `targa` is an error.
pub fn read_file(path: &Path) -> Result<Pixmap<u8>> {
    codec_for(path)?.read_file(path)
}

/// Writes `pixmap` to a file with the codec matching its extension.
pub fn write_file(path: &Path, pixmap: &Pixmap<u8>) -> Result<()> {
    codec_for(path)?.write_file(path, pixmap)
}

fn codec_for(path: &Path) -> Result<Box<dyn PixmapCodec>> {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .with_context(|| format!("Failed to pick a codec for {}: no file extension", path.display()))?;

    match extension.as_str() {
        "png" => Ok(Box::new(PngCodec::default())),
        "tga" | "targa" => Ok(Box::new(TargaCodec::default())),
        other => Err(anyhow::anyhow!(
            "Failed to pick a codec for {}: unsupported file extension '{}'",
            path.display(),
            other
        )),
    }
}
