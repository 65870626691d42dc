//! HDR image backed by 16-bit unsigned integer channels.

use crate::color::{convert_array_to_rec2100_hlg, ConversionStrategy, HdrColorSpace};
use crate::error::{HdrCanvasError, Result};
use crate::types::{
    channel_count, check_channel_len, HdrImageData, ImageDataArray, ImageDataArrayKind,
    ImageDataPixelFormat,
};

use wasm_bindgen::prelude::wasm_bindgen;

use super::HdrImage;

/// An HDR image whose channels are `u16` values in `0..=65535`.
///
/// Used on engines that cannot yet build half float image data. sRGB input
/// is promoted with the perceptual (colorimetric) conversion.
#[wasm_bindgen(js_name = Uint16Image)]
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerImage {
    width: u32,
    height: u32,
    color_space: HdrColorSpace,
    pixel_format: ImageDataPixelFormat,
    data: Vec<u16>,
}

impl IntegerImage {
    /// Creates a zero-filled image.
    ///
    /// `color_space` defaults to `rec2100-hlg`. The only pixel format this
    /// variant can report is `rgba-unorm8`; anything else falls back to it.
    pub fn new(
        width: u32,
        height: u32,
        color_space: Option<HdrColorSpace>,
        pixel_format: Option<ImageDataPixelFormat>,
    ) -> Self {
        let pixel_format = match pixel_format {
            Some(ImageDataPixelFormat::RgbaUnorm8) | None => Self::DEFAULT_PIXEL_FORMAT,
            Some(other) => {
                tracing::debug!(format = %other, "pixel format not available for Uint16 images");
                Self::DEFAULT_PIXEL_FORMAT
            }
        };
        Self {
            width,
            height,
            color_space: color_space.unwrap_or_default(),
            pixel_format,
            data: vec![0; channel_count(width, height)],
        }
    }

    /// Validates and converts `image_data` into a buffer this variant can own.
    fn import(image_data: HdrImageData) -> Result<(u32, u32, Vec<u16>)> {
        let HdrImageData {
            color_space,
            width,
            height,
            data,
            ..
        } = image_data;

        let data = match (color_space, data) {
            (HdrColorSpace::Srgb, ImageDataArray::Uint8(bytes)) => {
                convert_array_to_rec2100_hlg(&bytes)
            }
            (HdrColorSpace::Rec2100Hlg, ImageDataArray::Uint16(words)) => words,
            (HdrColorSpace::Srgb, other) => {
                return Err(HdrCanvasError::PixelFormatMismatch {
                    expected: "Uint8ClampedArray",
                    actual: other.kind(),
                })
            }
            (HdrColorSpace::Rec2100Hlg, other) => {
                return Err(HdrCanvasError::PixelFormatMismatch {
                    expected: "Uint16Array",
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

impl HdrImage for IntegerImage {
    type Channel = u16;

    const STRATEGY: ConversionStrategy = ConversionStrategy::Perceptual;
    const DEFAULT_PIXEL_FORMAT: ImageDataPixelFormat = ImageDataPixelFormat::RgbaUnorm8;
    const NATIVE_ARRAY: ImageDataArrayKind = ImageDataArrayKind::Uint16;

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

    fn data(&self) -> &[u16] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    fn get_image_data(&self) -> HdrImageData {
        HdrImageData {
            color_space: self.color_space,
            pixel_format: self.pixel_format,
            width: self.width,
            height: self.height,
            data: ImageDataArray::Uint16(self.data.clone()),
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
