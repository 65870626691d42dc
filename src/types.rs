//! Shared types for exchanging pixel data with canvas and display APIs.

use std::fmt;
use std::str::FromStr;

use half::f16;
use serde::{Deserialize, Serialize};

use crate::color::HdrColorSpace;
use crate::error::{HdrCanvasError, Result};

/// Storage format of an `ImageData` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageDataPixelFormat {
    /// 8-bit unsigned normalized channels
    #[serde(rename = "rgba-unorm8")]
    RgbaUnorm8,
    /// IEEE-754 half precision channels
    #[serde(rename = "rgba-float16")]
    RgbaFloat16,
}

impl ImageDataPixelFormat {
    /// Returns the web-exposed name of this pixel format.
    pub const fn as_str(self) -> &'static str {
        match self {
            ImageDataPixelFormat::RgbaUnorm8 => "rgba-unorm8",
            ImageDataPixelFormat::RgbaFloat16 => "rgba-float16",
        }
    }

    /// Parses an optional pixel format name, falling back to `default` when the
    /// name is absent or not recognised.
    pub fn parse_or(name: Option<&str>, default: Self) -> Self {
        match name.map(str::parse::<Self>) {
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                tracing::debug!(error = %e, fallback = %default, "using default pixel format");
                default
            }
            None => default,
        }
    }
}

impl fmt::Display for ImageDataPixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageDataPixelFormat {
    type Err = HdrCanvasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rgba-unorm8" => Ok(ImageDataPixelFormat::RgbaUnorm8),
            "rgba-float16" => Ok(ImageDataPixelFormat::RgbaFloat16),
            other => Err(HdrCanvasError::UnknownPixelFormat(other.to_string())),
        }
    }
}

/// A flat RGBA channel buffer in one of the numeric domains used by canvases.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageDataArray {
    /// 8-bit SDR channels (`Uint8ClampedArray`)
    Uint8(Vec<u8>),
    /// 16-bit integer channels (`Uint16Array`)
    Uint16(Vec<u16>),
    /// Half precision channels (`Float16Array`)
    Float16(Vec<f16>),
}

/// Numeric domain of an [`ImageDataArray`], without the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDataArrayKind {
    Uint8,
    Uint16,
    Float16,
}

impl ImageDataArrayKind {
    /// Kind to read an untyped JS array as.
    ///
    /// `srgb` data is 8-bit; anything else is taken to be in the receiving
    /// image's own domain.
    pub fn for_plain_array(color_space: HdrColorSpace, native: Self) -> Self {
        match color_space {
            HdrColorSpace::Srgb => ImageDataArrayKind::Uint8,
            _ => native,
        }
    }
}

impl ImageDataArray {
    /// Builds a buffer of `kind` from untyped numbers.
    ///
    /// Integer domains round and saturate to their range.
    pub fn from_numbers(kind: ImageDataArrayKind, values: &[f64]) -> Self {
        match kind {
            ImageDataArrayKind::Uint8 => ImageDataArray::Uint8(
                values
                    .iter()
                    .map(|v| v.round().clamp(0.0, f64::from(u8::MAX)) as u8)
                    .collect(),
            ),
            ImageDataArrayKind::Uint16 => ImageDataArray::Uint16(
                values
                    .iter()
                    .map(|v| v.round().clamp(0.0, f64::from(u16::MAX)) as u16)
                    .collect(),
            ),
            ImageDataArrayKind::Float16 => {
                ImageDataArray::Float16(values.iter().copied().map(f16::from_f64).collect())
            }
        }
    }

    /// Number of channel values in the buffer.
    pub fn len(&self) -> usize {
        match self {
            ImageDataArray::Uint8(d) => d.len(),
            ImageDataArray::Uint16(d) => d.len(),
            ImageDataArray::Float16(d) => d.len(),
        }
    }

    /// Returns `true` if the buffer holds no channels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the numeric domain, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            ImageDataArray::Uint8(_) => "Uint8ClampedArray",
            ImageDataArray::Uint16(_) => "Uint16Array",
            ImageDataArray::Float16(_) => "Float16Array",
        }
    }
}

/// The image-data exchange object handed between HDR images and canvases.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImageData {
    /// Color space the channel values are encoded in
    pub color_space: HdrColorSpace,
    /// Storage format hint for the canvas
    pub pixel_format: ImageDataPixelFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA channels, no padding
    pub data: ImageDataArray,
}

impl HdrImageData {
    /// Wraps 8-bit sRGB pixels as produced by a 2D canvas.
    pub fn from_srgb(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            color_space: HdrColorSpace::Srgb,
            pixel_format: ImageDataPixelFormat::RgbaUnorm8,
            width,
            height,
            data: ImageDataArray::Uint8(data),
        }
    }

}

/// Number of RGBA channels in a `width` x `height` image.
#[inline]
pub fn channel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Fails unless `actual` is exactly the channel count of a `width` x `height` image.
pub fn check_channel_len(width: u32, height: u32, actual: usize) -> Result<()> {
    let expected = channel_count(width, height);
    if actual != expected {
        return Err(HdrCanvasError::DataLengthMismatch { expected, actual });
    }
    Ok(())
}
