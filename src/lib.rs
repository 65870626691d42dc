//! HDR Canvas WASM Library
//!
//! High dynamic range pixel buffers and HDR canvas negotiation for the web,
//! compiled to WebAssembly.
//!
//! # Features
//!
//! - **Pixel buffers**: `Uint16Image` (16-bit integer channels) and
//!   `Float16Image` (half float channels), chosen per browser version
//! - **SDR promotion**: 8-bit sRGB image data to `rec2100-hlg`
//! - **Capability checks**: HDR display, HDR video, half float image data,
//!   bit depth and HDR 2D canvas support
//! - **Context negotiation**: HDR 2D context options, a global
//!   `getContext` override and WebGPU canvas configuration
//!
//! # Color Spaces
//!
//! `srgb`, `display-p3`, `rec2100-hlg` (the default) and `rec2100-pq`.

#![allow(clippy::unused_unit)]

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod capability;
pub mod color;
pub mod error;
pub mod image;
pub mod interop;
pub mod loader;
pub mod logging;
pub mod types;

use capability::BrowserEnvironment;

pub use color::{Color, ColorSpaceId, ConversionStrategy, HdrColorSpace, DEFAULT_COLOR_SPACE};
pub use error::{HdrCanvasError, Result};
pub use crate::image::{select_variant, AnyHdrImage, FloatImage, HdrImage, IntegerImage, VariantTag};
pub use types::{HdrImageData, ImageDataArray, ImageDataArrayKind, ImageDataPixelFormat};

fn default_log_level() -> tracing::level_filters::LevelFilter {
    if cfg!(debug_assertions) {
        tracing::level_filters::LevelFilter::DEBUG
    } else {
        tracing::level_filters::LevelFilter::INFO
    }
}

/// Initializes the WASM module.
///
/// Routes log output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    logging::init_logging(default_log_level());
}

/// Checks whether the display supports a wide gamut with high dynamic range.
#[wasm_bindgen(js_name = checkHDR)]
pub fn check_hdr() -> bool {
    capability::check_hdr(&BrowserEnvironment)
}

/// Checks whether the browser can play high dynamic range video.
#[wasm_bindgen(js_name = checkHDRVideo)]
pub fn check_hdr_video() -> bool {
    capability::check_hdr_video(&BrowserEnvironment)
}

/// Checks whether an HDR 2D canvas context can be created.
///
/// Requires an HDR display and half float image data support. On older
/// Chromium releases this may need the
/// `enable-experimental-web-platform-features` flag.
#[wasm_bindgen(js_name = checkHDRCanvas)]
pub fn check_hdr_canvas() -> bool {
    capability::check_hdr_canvas(&BrowserEnvironment)
}

/// Checks whether `ImageData` can be backed by a `Float16Array`.
#[wasm_bindgen(js_name = checkFloat16Array)]
pub fn check_float16_array() -> bool {
    capability::check_float16_array(&BrowserEnvironment)
}

/// Checks whether the screen reports more than 8 bits per channel.
#[wasm_bindgen(js_name = checkHDRBitDepth)]
pub fn check_hdr_bit_depth() -> bool {
    capability::check_hdr_bit_depth(&BrowserEnvironment)
}

/// Returns the HDR 2D context options for the running browser.
///
/// # Example (JavaScript)
/// ```js
/// const ctx = canvas.getContext("2d", getHdrOptions());
/// ```
#[wasm_bindgen(js_name = getHdrOptions)]
pub fn get_hdr_options() -> std::result::Result<JsValue, JsValue> {
    let version = capability::browser_major_version(&BrowserEnvironment);
    capability::get_hdr_options(version)
        .to_js_value()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Switches a canvas to extended dynamic range and returns its HDR 2D context.
///
/// Returns `undefined` if no context could be created.
#[wasm_bindgen(js_name = initHDRCanvas)]
pub fn init_hdr_canvas(canvas: &HtmlCanvasElement) -> Option<js_sys::Object> {
    let version = capability::browser_major_version(&BrowserEnvironment);
    capability::init_hdr_canvas(canvas, &capability::get_hdr_options(version))
}

/// Makes every `canvas.getContext` call request HDR options by default.
///
/// Calling it again while the override is active has no effect.
#[wasm_bindgen(js_name = defaultGetContextHDR)]
pub fn default_get_context_hdr() {
    let version = capability::browser_major_version(&BrowserEnvironment);
    if let Err(e) = capability::default_get_context_hdr(&capability::get_hdr_options(version)) {
        tracing::error!(error = %e, "unable to override canvas getContext");
    }
}

/// Restores the original `canvas.getContext`, if it was overridden.
#[wasm_bindgen(js_name = resetGetContext)]
pub fn reset_get_context() {
    if let Err(e) = capability::reset_get_context() {
        tracing::error!(error = %e, "unable to restore canvas getContext");
    }
}

/// Creates a zero-filled HDR image of the variant the browser can display.
///
/// Returns a `Uint16Image` on Chromium releases before 137, otherwise a
/// `Float16Image`.
///
/// Unknown pixel format names fall back to the variant's default.
///
/// # Errors
/// Returns an error for unknown color space names.
#[wasm_bindgen(js_name = newHDRImage)]
pub fn new_hdr_image(
    width: u32,
    height: u32,
    color_space: Option<String>,
    pixel_format: Option<String>,
) -> std::result::Result<JsValue, JsValue> {
    let color_space = color_space
        .map(|s| s.parse::<HdrColorSpace>())
        .transpose()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let tag = capability::detect_variant(&BrowserEnvironment);
    let pixel_format = pixel_format
        .map(|s| ImageDataPixelFormat::parse_or(Some(&s), tag.default_pixel_format()));

    Ok(
        match AnyHdrImage::new_instance(tag, width, height, color_space, pixel_format) {
            AnyHdrImage::Integer(image) => image.into(),
            AnyHdrImage::Float(image) => image.into(),
        },
    )
}

/// Returns the WebGPU canvas configuration for HDR output.
///
/// # Example (JavaScript)
/// ```js
/// context.configure({ device, ...getWebGpuHdrConfiguration(true) });
/// ```
#[wasm_bindgen(js_name = getWebGpuHdrConfiguration)]
pub fn get_webgpu_hdr_configuration(alpha: bool) -> std::result::Result<JsValue, JsValue> {
    capability::webgpu_canvas_configuration(alpha)
        .to_js_value()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let level = default_log_level();
        assert!(level >= tracing::level_filters::LevelFilter::INFO);
    }

    #[test]
    fn test_reexports() {
        assert_eq!(DEFAULT_COLOR_SPACE, HdrColorSpace::Rec2100Hlg);
        assert_eq!(select_variant(Some(136)), VariantTag::Integer);
        let image = IntegerImage::new(1, 1, None, None);
        assert_eq!(image.get_image_data().data, ImageDataArray::Uint16(vec![0; 4]));
    }

    #[test]
    fn test_new_image_pixel_format_fallback() {
        for tag in [VariantTag::Integer, VariantTag::Float] {
            for name in ["float32", "bogus"] {
                let format = ImageDataPixelFormat::parse_or(Some(name), tag.default_pixel_format());
                let image = AnyHdrImage::new_instance(tag, 1, 1, None, Some(format));
                assert_eq!(image.pixel_format(), tag.default_pixel_format());
            }
        }
    }
}
