// src/lib.rs

//! A software pixel-buffer library: typed 2D buffers, channel-aware color
//! math, drawing and resampling routines, and PNG/Targa file codecs.
//!
//! The building blocks:
//!
//! - [`Color`]: four `f32` channels clamped to `[0, 1]`, with arithmetic,
//!   HSV conversions, luminance and blend modes.
//! - [`Gradient`]: a keyframed color ramp sampled by position.
//! - [`Pixmap`]: a width-by-height pixel buffer over one of four channel
//!   layouts, tracking the region touched by writes.
//! - [`Processor`]: drawing, compositing, scrolling and geometric
//!   transforms over a borrowed pixmap, plus resampling and channel
//!   conversions that produce fresh ones.
//! - [`codecs`]: PNG and Targa readers/writers dispatched by file
//!   extension.

pub mod codecs;
pub mod color;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod math;
pub mod noise;
pub mod pixmap;
pub mod processor;
pub mod types;

pub use color::Color;
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use gradient::Gradient;
pub use noise::PerlinNoise;
pub use pixmap::Pixmap;
pub use processor::Processor;
pub use types::{
    BlendMode, Channel, ChannelMode, Component, FilteringMode, GrayscaleMode, MirrorMode,
    PixmapFlags,
};
