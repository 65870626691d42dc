//! Color spaces, transfer functions and SDR to HDR promotion.

pub mod convert;
pub mod math;
pub mod space;

pub use convert::{
    convert_array_to_rec2100_hlg, convert_pixel_to_rec2100_hlg, rescale_array_to_f16,
    scale_u8_to_u16, ConversionStrategy, SDR_MULTIPLIER,
};
pub use space::{Color, ColorSpaceId, HdrColorSpace, Transfer, DEFAULT_COLOR_SPACE};
