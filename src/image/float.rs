//! HDR image backed by half precision float channels.

use half::f16;

use crate::color::{rescale_array_to_f16, ConversionStrategy, HdrColorSpace};
use crate::error::{HdrCanvasError, Result};
use crate::types::{
    channel_count, check_channel_len, HdrImageData, ImageDataArray, ImageDataArrayKind,
    ImageDataPixelFormat,
};

use wasm_bindgen::prelude::wasm_bindgen;

use super::HdrImage;

/// An HDR image whose channels are IEEE-754 half floats.
///
/// Nominal range is `0.0..=1.0`; values above 1.0 are extended brightness.
/// sRGB input is promoted by linear rescale, not by color conversion.
#[wasm_bindgen(js_name = Float16Image)]
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    color_space: HdrColorSpace,
    pixel_format: ImageDataPixelFormat,
    data: Vec<f16>,
}

impl FloatImage {
    /// Creates a zero-filled image.
    ///
    /// `color_space` defaults to `rec2100-hlg` and `pixel_format` to
    /// `rgba-float16`.
    pub fn new(
        width: u32,
        height: u32,
        color_space: Option<HdrColorSpace>,
        pixel_format: Option<ImageDataPixelFormat>,
    ) -> Self {
        Self {
            width,
            height,
            color_space: color_space.unwrap_or_default(),
            pixel_format: pixel_format.unwrap_or(Self::DEFAULT_PIXEL_FORMAT),
            data: vec![f16::ZERO; channel_count(width, height)],
        }
    }

    /// Builds an image from raw 8-bit RGBA bytes, always treated as sRGB.
    pub fn from_image_data_array(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        check_channel_len(width, height, bytes.len())?;
        let mut image = Self::new(width, height, None, None);
        image.data = rescale_array_to_f16(bytes);
        Ok(image)
    }

    fn import(image_data: HdrImageData) -> Result<(u32, u32, Vec<f16>)> {
        let HdrImageData {
            color_space,
            width,
            height,
            data,
            ..
        } = image_data;

        let data = match (color_space, data) {
            (HdrColorSpace::Srgb, ImageDataArray::Uint8(bytes)) => rescale_array_to_f16(&bytes),
            (HdrColorSpace::Rec2100Hlg, ImageDataArray::Float16(halves)) => halves,
            (HdrColorSpace::Srgb, other) => {
                return Err(HdrCanvasError::PixelFormatMismatch {
                    expected: "Uint8ClampedArray",
                    actual: other.kind(),
                })
            }
            (HdrColorSpace::Rec2100Hlg, other) => {
                return Err(HdrCanvasError::PixelFormatMismatch {
                    expected: "Float16Array",
                    actual: other.kind(),
                })
            }
            (space, _) => {
                return Err(HdrCanvasError::UnsupportedColorSpace(space.to_string()));
            }
        };

        check_channel_len(width, height, data.len())?;
        Ok((width, height, data))
    }
}

impl HdrImage for FloatImage {
    type Channel = f16;

    const STRATEGY: ConversionStrategy = ConversionStrategy::LinearRescale;
    const DEFAULT_PIXEL_FORMAT: ImageDataPixelFormat = ImageDataPixelFormat::RgbaFloat16;
    const NATIVE_ARRAY: ImageDataArrayKind = ImageDataArrayKind::Float16;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_space(&self) -> HdrColorSpace {
        self.color_space
    }

    fn pixel_format(&self) -> ImageDataPixelFormat {
        self.pixel_format
    }

    fn data(&self) -> &[f16] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [f16] {
        &mut self.data
    }

    fn get_image_data(&self) -> HdrImageData {
        HdrImageData {
            color_space: self.color_space,
            pixel_format: self.pixel_format,
            width: self.width,
            height: self.height,
            data: ImageDataArray::Float16(self.data.clone()),
        }
    }

    fn set_image_data(&mut self, image_data: HdrImageData) -> Result<()> {
        let (width, height, data) = Self::import(image_data)?;
        self.width = width;
        self.height = height;
        self.data = data;
        self.color_space = HdrColorSpace::default();
        Ok(())
    }

    fn from_image_data(image_data: HdrImageData) -> Result<Self> {
        let (width, height, data) = Self::import(image_data)?;
        Ok(Self {
            width,
            height,
            color_space: HdrColorSpace::default(),
            pixel_format: Self::DEFAULT_PIXEL_FORMAT,
            data,
        })
    }
}
