//! Error types for HDR image and canvas operations.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that can occur while building, converting or displaying HDR images.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HdrCanvasError {
    /// Image data declared a color space the target image cannot import
    #[error("ColorSpace {0} isn't supported!")]
    UnsupportedColorSpace(String),

    /// A color space or pixel format name that is not part of the predefined set
    #[error("Unknown pixel format: {0}")]
    UnknownPixelFormat(String),

    /// Pixel buffer length does not match `width * height * 4`
    #[error("Pixel data length mismatch: expected {expected} channels, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Pixel buffer holds a numeric domain the target image cannot adopt
    #[error("Pixel data format mismatch: expected {expected}, got {actual}")]
    PixelFormatMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An environment capability query failed
    #[error("Capability check failed: {0}")]
    Capability(String),

    /// Fetching an SDR image failed
    #[error("Image loading error: {0}")]
    Loader(String),

    /// Decoding an SDR image failed
    #[error("Image decoding error: {0}")]
    Decode(String),

    /// A JavaScript call raised an exception
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Result type alias for HDR canvas operations.
pub type Result<T> = std::result::Result<T, HdrCanvasError>;

impl From<image::ImageError> for HdrCanvasError {
    fn from(err: image::ImageError) -> Self {
        HdrCanvasError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for HdrCanvasError {
    fn from(err: serde_json::Error) -> Self {
        HdrCanvasError::Js(err.to_string())
    }
}

impl From<JsValue> for HdrCanvasError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        HdrCanvasError::Js(message)
    }
}

impl From<HdrCanvasError> for JsValue {
    fn from(err: HdrCanvasError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
