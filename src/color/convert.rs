//! Promotion of 8-bit sRGB pixel data into the HDR storage domains.
//!
//! Two strategies exist and are kept distinct:
//!
//! - [`ConversionStrategy::Perceptual`] runs every pixel through the color
//!   engine (sRGB to rec2100-hlg) and scales into `u16`.
//! - [`ConversionStrategy::LinearRescale`] divides each byte by 255 and rounds
//!   to the nearest half float. No color-space transform is applied, so the
//!   result is not colorimetrically equal to the perceptual path.

use half::f16;

use super::space::{Color, ColorSpaceId, HdrColorSpace};

/// Multiplier promoting a normalized channel value into the 16-bit integer domain.
pub const SDR_MULTIPLIER: f64 = 65535.0; // 2^16 - 1

/// How an image variant promotes 8-bit sRGB data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// Colorimetric sRGB to rec2100-hlg through the color engine
    Perceptual,
    /// Byte / 255 rounded to half precision, no color transform
    LinearRescale,
}

/// Widens an 8-bit value to 16 bits by bit replication.
///
/// Only valid for channels that need no color conversion, such as alpha.
#[inline]
pub const fn scale_u8_to_u16(value: u8) -> u16 {
    ((value as u16) << 8) | value as u16
}

/// Converts one 8-bit sRGB pixel to a 16-bit rec2100-hlg pixel.
pub fn convert_pixel_to_rec2100_hlg(pixel: [u8; 4]) -> [u16; 4] {
    let target = HdrColorSpace::Rec2100Hlg.engine_space();

    let srgb = Color::new(
        ColorSpaceId::Srgb,
        [
            f64::from(pixel[0]) / 255.0,
            f64::from(pixel[1]) / 255.0,
            f64::from(pixel[2]) / 255.0,
        ],
        f64::from(pixel[3]) / 255.0,
    );
    let hlg = srgb.to(target);

    [
        to_u16(hlg.coords[0]),
        to_u16(hlg.coords[1]),
        to_u16(hlg.coords[2]),
        to_u16(hlg.alpha),
    ]
}

/// Converts a buffer of 8-bit sRGB pixels to 16-bit rec2100-hlg pixels.
///
/// A trailing partial pixel is ignored.
pub fn convert_array_to_rec2100_hlg(data: &[u8]) -> Vec<u16> {
    let mut out = vec![0u16; data.len()];
    for (src, dst) in data.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        dst.copy_from_slice(&convert_pixel_to_rec2100_hlg([src[0], src[1], src[2], src[3]]));
    }
    out
}

/// Rescales every byte to `[0, 1]` and rounds it to the nearest half float.
pub fn rescale_array_to_f16(data: &[u8]) -> Vec<f16> {
    data.iter()
        .map(|&v| f16::from_f64(f64::from(v) / 255.0))
        .collect()
}

#[inline]
fn to_u16(v: f64) -> u16 {
    (v * SDR_MULTIPLIER).round().clamp(0.0, SDR_MULTIPLIER) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_u8_to_u16() {
        assert_eq!(scale_u8_to_u16(0), 0);
        assert_eq!(scale_u8_to_u16(0x80), 0x8080);
        assert_eq!(scale_u8_to_u16(255), 65535);
    }

    #[test]
    fn test_convert_pure_red() {
        assert_eq!(
            convert_pixel_to_rec2100_hlg([255, 0, 0, 255]),
            [42982, 15358, 7480, 65535]
        );
    }

    #[test]
    fn test_convert_white_and_black() {
        assert_eq!(
            convert_pixel_to_rec2100_hlg([255, 255, 255, 255]),
            [49151, 49151, 49151, 65535]
        );
        assert_eq!(convert_pixel_to_rec2100_hlg([0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn test_alpha_is_linear() {
        for a in [0u8, 1, 77, 128, 254, 255] {
            let px = convert_pixel_to_rec2100_hlg([10, 20, 30, a]);
            assert_eq!(px[3], scale_u8_to_u16(a));
        }
    }

    #[test]
    fn test_convert_array() {
        let data = [255, 0, 0, 255, 0, 0, 0, 0];
        let out = convert_array_to_rec2100_hlg(&data);
        assert_eq!(out.len(), 8);
        assert_eq!(&out[..4], &[42982, 15358, 7480, 65535]);
        assert_eq!(&out[4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_rescale_is_not_perceptual() {
        let out = rescale_array_to_f16(&[255, 0, 0, 255]);
        assert_eq!(out, vec![f16::ONE, f16::ZERO, f16::ZERO, f16::ONE]);

        let mid = rescale_array_to_f16(&[128]);
        assert_eq!(mid[0], f16::from_f64(128.0 / 255.0));
    }
}
