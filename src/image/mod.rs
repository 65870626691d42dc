//! HDR pixel buffers.
//!
//! [`HdrImage`] is the capability set shared by the two storage variants:
//! [`IntegerImage`] keeps channels as `u16` (0..=65535) and [`FloatImage`]
//! keeps them as half floats (nominally 0.0..=1.0, larger values are brighter
//! than SDR white). Both store row-major RGBA with no padding, so
//! `data().len() == width * height * 4` at all times.

pub mod float;
pub mod integer;
pub mod js;

use std::fmt::Debug;

use crate::color::{ConversionStrategy, HdrColorSpace};
use crate::error::Result;
use crate::types::{HdrImageData, ImageDataArrayKind, ImageDataPixelFormat};

pub use float::FloatImage;
pub use integer::IntegerImage;

/// First Chromium major version whose `ImageData` accepts `rgba-float16`.
pub const FLOAT16_IMAGE_MIN_VERSION: u32 = 137;

/// Operations shared by every HDR pixel buffer variant.
pub trait HdrImage: Clone + Debug + Sized {
    /// Numeric type of one channel value.
    type Channel: Copy + Debug + PartialEq;

    /// How this variant promotes 8-bit sRGB data.
    const STRATEGY: ConversionStrategy;

    /// Pixel format reported when none (or an unusable one) is requested.
    const DEFAULT_PIXEL_FORMAT: ImageDataPixelFormat;

    /// Array kind of image data already in the default color space.
    const NATIVE_ARRAY: ImageDataArrayKind;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Color space the channel values are encoded in.
    fn color_space(&self) -> HdrColorSpace;

    /// Storage format reported to canvases.
    fn pixel_format(&self) -> ImageDataPixelFormat;

    /// Flat RGBA channel buffer.
    fn data(&self) -> &[Self::Channel];

    /// Mutable flat RGBA channel buffer.
    fn data_mut(&mut self) -> &mut [Self::Channel];

    /// Packages the buffer and its metadata into an image-data object.
    fn get_image_data(&self) -> HdrImageData;

    /// Replaces dimensions and buffer from `image_data`.
    ///
    /// `srgb` data is promoted using [`Self::STRATEGY`]; data already in the
    /// default color space is adopted without copying. Any other color space
    /// fails with `UnsupportedColorSpace`. On error the image is unchanged.
    /// Afterwards the color space is always the default.
    fn set_image_data(&mut self, image_data: HdrImageData) -> Result<()>;

    /// Builds a new image following the rules of [`HdrImage::set_image_data`].
    fn from_image_data(image_data: HdrImageData) -> Result<Self>;

    /// Returns a copy of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the buffer.
    fn get_pixel(&self, x: u32, y: u32) -> [Self::Channel; 4] {
        let pos = self.pixel_offset(x, y);
        let d = self.data();
        [d[pos], d[pos + 1], d[pos + 2], d[pos + 3]]
    }

    /// Overwrites the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the buffer.
    fn set_pixel(&mut self, x: u32, y: u32, px: [Self::Channel; 4]) {
        let pos = self.pixel_offset(x, y);
        self.data_mut()[pos..pos + 4].copy_from_slice(&px);
    }

    /// Sets every pixel to `color`.
    ///
    /// Returns `None` and leaves the buffer untouched unless `color` has
    /// exactly four channels.
    fn fill(&mut self, color: &[Self::Channel]) -> Option<&mut Self> {
        if color.len() != 4 {
            return None;
        }
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(color);
        }
        Some(self)
    }

    /// Replaces every pixel, in scan order, with `f(r, g, b, a)` of its own
    /// current channels. Each pixel is written before the next is read.
    fn pixel_callback<F>(&mut self, mut f: F)
    where
        F: FnMut(Self::Channel, Self::Channel, Self::Channel, Self::Channel) -> [Self::Channel; 4],
    {
        for px in self.data_mut().chunks_exact_mut(4) {
            let out = f(px[0], px[1], px[2], px[3]);
            px.copy_from_slice(&out);
        }
    }

    #[doc(hidden)]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width() as usize + x as usize) * 4
    }
}

/// Which storage variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantTag {
    /// `u16` channels, perceptual promotion
    Integer,
    /// Half float channels, linear-rescale promotion
    Float,
}

impl VariantTag {
    /// Pixel format an image of this variant reports unless told otherwise.
    pub fn default_pixel_format(self) -> ImageDataPixelFormat {
        match self {
            VariantTag::Integer => IntegerImage::DEFAULT_PIXEL_FORMAT,
            VariantTag::Float => FloatImage::DEFAULT_PIXEL_FORMAT,
        }
    }
}

/// Chooses a variant from the detected Chromium major version.
///
/// Engines older than [`FLOAT16_IMAGE_MIN_VERSION`] cannot build half float
/// image data and get [`VariantTag::Integer`]; everything else, including
/// unrecognised browsers, gets [`VariantTag::Float`].
pub fn select_variant(browser_major_version: Option<u32>) -> VariantTag {
    match browser_major_version {
        Some(v) if v < FLOAT16_IMAGE_MIN_VERSION => VariantTag::Integer,
        _ => VariantTag::Float,
    }
}

/// An image of either variant, chosen at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyHdrImage {
    Integer(IntegerImage),
    Float(FloatImage),
}

impl AnyHdrImage {
    /// Creates a zero-filled image of the requested variant.
    pub fn new_instance(
        tag: VariantTag,
        width: u32,
        height: u32,
        color_space: Option<HdrColorSpace>,
        pixel_format: Option<ImageDataPixelFormat>,
    ) -> Self {
        match tag {
            VariantTag::Integer => {
                AnyHdrImage::Integer(IntegerImage::new(width, height, color_space, pixel_format))
            }
            VariantTag::Float => {
                AnyHdrImage::Float(FloatImage::new(width, height, color_space, pixel_format))
            }
        }
    }

    /// Imports image data into a new image of the requested variant.
    pub fn from_image_data(tag: VariantTag, image_data: HdrImageData) -> Result<Self> {
        Ok(match tag {
            VariantTag::Integer => AnyHdrImage::Integer(IntegerImage::from_image_data(image_data)?),
            VariantTag::Float => AnyHdrImage::Float(FloatImage::from_image_data(image_data)?),
        })
    }

    pub fn variant(&self) -> VariantTag {
        match self {
            AnyHdrImage::Integer(_) => VariantTag::Integer,
            AnyHdrImage::Float(_) => VariantTag::Float,
        }
    }

    /// How this image promotes 8-bit sRGB data.
    pub fn strategy(&self) -> ConversionStrategy {
        match self {
            AnyHdrImage::Integer(_) => IntegerImage::STRATEGY,
            AnyHdrImage::Float(_) => FloatImage::STRATEGY,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            AnyHdrImage::Integer(i) => i.width(),
            AnyHdrImage::Float(i) => i.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            AnyHdrImage::Integer(i) => i.height(),
            AnyHdrImage::Float(i) => i.height(),
        }
    }

    pub fn color_space(&self) -> HdrColorSpace {
        match self {
            AnyHdrImage::Integer(i) => i.color_space(),
            AnyHdrImage::Float(i) => i.color_space(),
        }
    }

    pub fn pixel_format(&self) -> ImageDataPixelFormat {
        match self {
            AnyHdrImage::Integer(i) => i.pixel_format(),
            AnyHdrImage::Float(i) => i.pixel_format(),
        }
    }

    pub fn get_image_data(&self) -> HdrImageData {
        match self {
            AnyHdrImage::Integer(i) => i.get_image_data(),
            AnyHdrImage::Float(i) => i.get_image_data(),
        }
    }

    pub fn set_image_data(&mut self, image_data: HdrImageData) -> Result<()> {
        match self {
            AnyHdrImage::Integer(i) => i.set_image_data(image_data),
            AnyHdrImage::Float(i) => i.set_image_data(image_data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_variant() {
        assert_eq!(select_variant(Some(120)), VariantTag::Integer);
        assert_eq!(select_variant(Some(136)), VariantTag::Integer);
        assert_eq!(select_variant(Some(137)), VariantTag::Float);
        assert_eq!(select_variant(Some(140)), VariantTag::Float);
        assert_eq!(select_variant(None), VariantTag::Float);
    }

    #[test]
    fn test_variant_default_pixel_format() {
        assert_eq!(
            VariantTag::Integer.default_pixel_format(),
            ImageDataPixelFormat::RgbaUnorm8
        );
        assert_eq!(
            VariantTag::Float.default_pixel_format(),
            ImageDataPixelFormat::RgbaFloat16
        );
        assert_eq!(IntegerImage::NATIVE_ARRAY, ImageDataArrayKind::Uint16);
        assert_eq!(FloatImage::NATIVE_ARRAY, ImageDataArrayKind::Float16);
    }

    #[test]
    fn test_new_instance_dispatch() {
        let image = AnyHdrImage::new_instance(VariantTag::Integer, 3, 2, None, None);
        assert_eq!(image.variant(), VariantTag::Integer);
        assert_eq!(image.strategy(), ConversionStrategy::Perceptual);
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.color_space(), HdrColorSpace::Rec2100Hlg);

        let image = AnyHdrImage::new_instance(
            VariantTag::Float,
            1,
            1,
            Some(HdrColorSpace::Rec2100Pq),
            None,
        );
        assert_eq!(image.variant(), VariantTag::Float);
        assert_eq!(image.strategy(), ConversionStrategy::LinearRescale);
        assert_eq!(image.color_space(), HdrColorSpace::Rec2100Pq);
        assert_eq!(image.pixel_format(), ImageDataPixelFormat::RgbaFloat16);
    }

    #[test]
    fn test_from_image_data_dispatch() {
        let data = HdrImageData::from_srgb(1, 1, vec![255, 255, 255, 255]);
        let image = AnyHdrImage::from_image_data(VariantTag::Integer, data.clone()).unwrap();
        assert_eq!(image.variant(), VariantTag::Integer);

        let mut image = AnyHdrImage::from_image_data(VariantTag::Float, data.clone()).unwrap();
        assert_eq!(image.get_image_data().data.len(), 4);
        image.set_image_data(data).unwrap();
        assert_eq!(image.color_space(), HdrColorSpace::Rec2100Hlg);
    }
}
