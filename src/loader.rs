//! Loading SDR images into 8-bit sRGB image data.
//!
//! In the browser the resource is fetched and rasterized through an
//! `ImageBitmap` and an `OffscreenCanvas`. Hosts without a canvas can decode
//! encoded bytes with [`decode_sdr_bytes`] instead; both produce the same
//! `srgb` / `Uint8` image data.

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, ImageBitmap, OffscreenCanvas, OffscreenCanvasRenderingContext2d, Response};

use crate::error::{HdrCanvasError, Result};
use crate::image::HdrImage;
use crate::types::HdrImageData;

async fn resolve(promise: Promise) -> Result<wasm_bindgen::JsValue> {
    Ok(JsFuture::from(promise).await?)
}

fn cast<T: JsCast>(value: wasm_bindgen::JsValue, what: &str) -> Result<T> {
    value
        .dyn_into()
        .map_err(|_| HdrCanvasError::Loader(format!("expected {}", what)))
}

/// Fetches `url` and rasterizes it into 8-bit sRGB image data.
///
/// Returns `Ok(None)` when no 2D context is available to rasterize with.
/// Network failures, non-success responses and undecodable bodies are
/// errors.
pub async fn load_sdr_image_data(url: &str) -> Result<Option<HdrImageData>> {
    let window =
        web_sys::window().ok_or_else(|| HdrCanvasError::Loader("no global window".to_string()))?;

    let response: Response = cast(resolve(window.fetch_with_str(url)).await?, "Response")?;
    if !response.ok() {
        return Err(HdrCanvasError::Loader(format!(
            "fetching {} failed with status {}",
            url,
            response.status()
        )));
    }
    let blob: Blob = cast(resolve(response.blob()?).await?, "Blob")?;
    let bitmap: ImageBitmap = cast(
        resolve(window.create_image_bitmap_with_blob(&blob)?).await?,
        "ImageBitmap",
    )?;

    let (width, height) = (bitmap.width(), bitmap.height());
    let offscreen = OffscreenCanvas::new(width, height)?;
    let Some(context) = offscreen.get_context("2d")? else {
        tracing::debug!(url, "no 2d context for rasterizing");
        return Ok(None);
    };
    let context: OffscreenCanvasRenderingContext2d =
        cast(context.into(), "OffscreenCanvasRenderingContext2D")?;

    context.draw_image_with_image_bitmap(&bitmap, 0.0, 0.0)?;
    let pixels = context.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
    tracing::debug!(url, width, height, "loaded SDR image");

    Ok(Some(HdrImageData::from_srgb(
        pixels.width(),
        pixels.height(),
        pixels.data().0,
    )))
}

/// Decodes an encoded JPEG or PNG into 8-bit sRGB image data.
///
/// Returns `Ok(None)` for an image without pixels.
pub fn decode_sdr_bytes(bytes: &[u8]) -> Result<Option<HdrImageData>> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        tracing::debug!("decoded image has no pixels");
        return Ok(None);
    }
    Ok(Some(HdrImageData::from_srgb(width, height, rgba.into_raw())))
}

/// Loads `url` and promotes it into an HDR image of variant `I`.
pub async fn from_url<I: HdrImage>(url: &str) -> Result<Option<I>> {
    load_sdr_image_data(url)
        .await?
        .map(I::from_image_data)
        .transpose()
}

/// Decodes `bytes` and promotes them into an HDR image of variant `I`.
pub fn from_bytes<I: HdrImage>(bytes: &[u8]) -> Result<Option<I>> {
    decode_sdr_bytes(bytes)?.map(I::from_image_data).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HdrColorSpace;
    use crate::image::{FloatImage, IntegerImage};
    use crate::types::ImageDataArray;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, pixels: Vec<u8>) -> Vec<u8> {
        let image = RgbaImage::from_raw(width, height, pixels).unwrap();
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let png = encode_png(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128]);
        let data = decode_sdr_bytes(&png).unwrap().unwrap();
        assert_eq!((data.width, data.height), (2, 1));
        assert_eq!(data.color_space, HdrColorSpace::Srgb);
        assert_eq!(
            data.data,
            ImageDataArray::Uint8(vec![255, 0, 0, 255, 0, 0, 255, 128])
        );
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_sdr_bytes(&[0x00, 0x01, 0x02, 0x03]),
            Err(HdrCanvasError::Decode(_))
        ));
    }

    #[test]
    fn test_from_bytes_promotes() {
        let png = encode_png(1, 1, vec![255, 0, 0, 255]);
        let image: IntegerImage = from_bytes(&png).unwrap().unwrap();
        assert_eq!(image.get_pixel(0, 0), [42982, 15358, 7480, 65535]);
        assert_eq!(image.color_space(), HdrColorSpace::Rec2100Hlg);

        let image: FloatImage = from_bytes(&png).unwrap().unwrap();
        assert_eq!(image.get_pixel(0, 0)[0].to_f32(), 1.0);
        assert_eq!(image.get_pixel(0, 0)[1].to_f32(), 0.0);
    }
}
