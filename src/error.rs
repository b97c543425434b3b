// src/error.rs

//! Error types for pixel-buffer operations.
//!
//! Core operations return `Result<T, Error>`; the file codecs wrap these in
//! `anyhow` chains with path context at the I/O boundary.

use crate::geometry::Rect;
use crate::types::{Channel, ChannelMode};

/// Error raised by `Pixmap` and `Processor` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pixmap has a zero dimension and rejects all access.
    InvalidPixmap,
    /// Construction was asked for a zero-sized buffer.
    InvalidDimensions { width: u32, height: u32 },
    /// A pixel coordinate lies outside the buffer.
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A flat pixel index lies outside the buffer.
    IndexOutOfBounds { index: usize, len: usize },
    /// A raw buffer length does not match the expected element count.
    SizeMismatch { expected: usize, actual: usize },
    /// Two pixmaps disagree on channel layout where they must match.
    ChannelModeMismatch {
        expected: ChannelMode,
        actual: ChannelMode,
    },
    /// A channel index does not exist under the pixmap's channel mode.
    MissingChannel { channel: Channel, mode: ChannelMode },
    /// A clip rectangle is degenerate or does not fit the pixmap.
    InvalidRegion { region: Rect },
    /// Source and destination clips must share dimensions for a raw copy.
    RegionSizeMismatch { source: Rect, destination: Rect },
    /// A fill source slice was empty.
    EmptyBuffer,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidPixmap => write!(f, "pixmap is uninitialized or zero-sized"),
            Error::InvalidDimensions { width, height } => {
                write!(f, "invalid pixmap dimensions {}x{}", width, height)
            }
            Error::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "pixel ({}, {}) is outside the {}x{} buffer",
                    x, y, width, height
                )
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "pixel index {} is outside a buffer of {} pixels", index, len)
            }
            Error::SizeMismatch { expected, actual } => {
                write!(f, "buffer size mismatch: expected {}, got {}", expected, actual)
            }
            Error::ChannelModeMismatch { expected, actual } => {
                write!(
                    f,
                    "channel mode mismatch: expected {:?}, got {:?}",
                    expected, actual
                )
            }
            Error::MissingChannel { channel, mode } => {
                write!(f, "channel {:?} does not exist in {:?} layout", channel, mode)
            }
            Error::InvalidRegion { region } => {
                write!(
                    f,
                    "region {}x{} at ({}, {}) is invalid for this pixmap",
                    region.width, region.height, region.x, region.y
                )
            }
            Error::RegionSizeMismatch {
                source,
                destination,
            } => {
                write!(
                    f,
                    "clip size mismatch: source {}x{}, destination {}x{}",
                    source.width, source.height, destination.width, destination.height
                )
            }
            Error::EmptyBuffer => write!(f, "source buffer is empty"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for pixel-buffer operations.
pub type Result<T> = std::result::Result<T, Error>;
