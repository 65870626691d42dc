//! Behavioral tests for HDR pixel buffers through the public API.

use half::f16;
use hdr_canvas::capability::{check_float16_array, reset_get_context, StaticEnvironment};
use hdr_canvas::{
    AnyHdrImage, FloatImage, HdrCanvasError, HdrColorSpace, HdrImage, HdrImageData,
    ImageDataArray, ImageDataPixelFormat, IntegerImage, VariantTag,
};

#[test]
fn test_new_images_are_zeroed() {
    let image = IntegerImage::new(4, 3, None, None);
    assert_eq!(image.data().len(), 4 * 3 * 4);
    assert!(image.data().iter().all(|&c| c == 0));

    let image = FloatImage::new(4, 3, None, None);
    assert_eq!(image.data().len(), 4 * 3 * 4);
    assert!(image.data().iter().all(|c| c.to_f32() == 0.0));
}

#[test]
fn test_fill_then_get_pixel() {
    let mut image = IntegerImage::new(3, 3, None, None);
    image.fill(&[1, 2, 3, 4]).unwrap();
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(image.get_pixel(x, y), [1, 2, 3, 4]);
        }
    }
}

#[test]
fn test_fill_with_wrong_length_changes_nothing() {
    let mut image = IntegerImage::new(2, 2, None, None);
    image.set_pixel(1, 1, [9, 9, 9, 9]);
    let before = image.clone();
    assert!(image.fill(&[1, 2, 3]).is_none());
    assert!(image.fill(&[1, 2, 3, 4, 5]).is_none());
    assert_eq!(image, before);
}

#[test]
fn test_clone_is_deep() {
    let mut original = FloatImage::new(2, 1, None, None);
    let copy = original.clone();
    original.set_pixel(0, 0, [f16::ONE; 4]);
    assert_eq!(copy.get_pixel(0, 0), [f16::ZERO; 4]);
    assert_eq!(original.get_pixel(0, 0), [f16::ONE; 4]);
}

#[test]
fn test_image_data_round_trip() {
    let mut image = IntegerImage::new(2, 2, None, None);
    image.pixel_callback(|_, _, _, _| [100, 200, 300, 65535]);

    let exported = image.get_image_data();
    assert_eq!(exported.color_space, HdrColorSpace::Rec2100Hlg);

    let mut restored = IntegerImage::new(1, 1, None, None);
    restored.set_image_data(exported).unwrap();
    assert_eq!(restored, image);
}

#[test]
fn test_srgb_red_promotes_to_hlg() {
    let data = HdrImageData::from_srgb(1, 1, vec![255, 0, 0, 255]);
    let image = IntegerImage::from_image_data(data).unwrap();
    assert_eq!(image.get_pixel(0, 0), [42982, 15358, 7480, 65535]);
    assert_eq!(image.color_space(), HdrColorSpace::Rec2100Hlg);
}

#[test]
fn test_unsupported_color_space() {
    let data = HdrImageData {
        color_space: HdrColorSpace::DisplayP3,
        pixel_format: ImageDataPixelFormat::RgbaUnorm8,
        width: 1,
        height: 1,
        data: ImageDataArray::Uint8(vec![0; 4]),
    };
    assert_eq!(
        IntegerImage::from_image_data(data.clone()),
        Err(HdrCanvasError::UnsupportedColorSpace("display-p3".to_string()))
    );
    assert!(matches!(
        FloatImage::from_image_data(data),
        Err(HdrCanvasError::UnsupportedColorSpace(_))
    ));
}

#[test]
fn test_length_mismatch_is_rejected() {
    let data = HdrImageData::from_srgb(2, 2, vec![0; 12]);
    assert_eq!(
        IntegerImage::from_image_data(data),
        Err(HdrCanvasError::DataLengthMismatch {
            expected: 16,
            actual: 12
        })
    );
}

#[test]
fn test_identity_callback_keeps_buffer() {
    let data = HdrImageData::from_srgb(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 128]);
    let mut image = FloatImage::from_image_data(data).unwrap();
    let before = image.clone();
    image.pixel_callback(|r, g, b, a| [r, g, b, a]);
    assert_eq!(image, before);
}

#[test]
fn test_any_image_follows_variant() {
    let image = AnyHdrImage::new_instance(VariantTag::Integer, 1, 1, None, None);
    assert!(matches!(image, AnyHdrImage::Integer(_)));
    assert_eq!(image.pixel_format(), ImageDataPixelFormat::RgbaUnorm8);

    let image = AnyHdrImage::new_instance(VariantTag::Float, 1, 1, None, None);
    assert!(matches!(image, AnyHdrImage::Float(_)));
    assert_eq!(image.pixel_format(), ImageDataPixelFormat::RgbaFloat16);
}

#[test]
fn test_float16_unavailable_reports_false() {
    assert!(!check_float16_array(&StaticEnvironment::sdr_display()));
}

#[test]
fn test_reset_without_override_is_noop() {
    assert!(reset_get_context().is_ok());
    assert!(reset_get_context().is_ok());
}
