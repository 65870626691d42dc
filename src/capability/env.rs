//! The environment queries capability checks are built on.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Window};

use super::canvas::ContextOptions;
use crate::error::{HdrCanvasError, Result};
use crate::interop::{construct_global, to_js_object};
use crate::types::ImageDataPixelFormat;

/// Queries a display environment answers for capability detection.
///
/// Any method may fail; checks turn failures into `false`.
pub trait Environment {
    /// `screen.colorDepth`, in bits for all three color channels.
    fn screen_color_depth(&self) -> Result<f64>;

    /// Whether a CSS media query currently matches.
    fn match_media(&self, query: &str) -> Result<bool>;

    /// The navigator user agent string.
    fn user_agent(&self) -> Result<String>;

    /// Attempts to construct a 1x1 `rgba-float16` image data object.
    fn create_float16_image_data(&self) -> Result<()>;

    /// Creates a scratch canvas and requests a 2D context with `options`.
    ///
    /// Returns whether a context was handed out.
    fn create_canvas_context(&self, options: &ContextOptions) -> Result<bool>;
}

/// The live browser window, queried through `web-sys`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserEnvironment;

impl BrowserEnvironment {
    fn window() -> Result<Window> {
        web_sys::window().ok_or_else(|| HdrCanvasError::Capability("no global window".to_string()))
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Float16CheckSettings {
    pixel_format: ImageDataPixelFormat,
}

impl Environment for BrowserEnvironment {
    fn screen_color_depth(&self) -> Result<f64> {
        let screen = Self::window()?.screen()?;
        Ok(f64::from(screen.color_depth()?))
    }

    fn match_media(&self, query: &str) -> Result<bool> {
        Ok(Self::window()?
            .match_media(query)?
            .is_some_and(|list| list.matches()))
    }

    fn user_agent(&self) -> Result<String> {
        Ok(Self::window()?.navigator().user_agent()?)
    }

    fn create_float16_image_data(&self) -> Result<()> {
        let array = construct_global("Float16Array", &Array::of1(&JsValue::from(4)))?;
        let settings = to_js_object(&Float16CheckSettings {
            pixel_format: ImageDataPixelFormat::RgbaFloat16,
        })?;
        construct_global(
            "ImageData",
            &Array::of4(&array, &JsValue::from(1), &JsValue::from(1), &settings),
        )?;
        Ok(())
    }

    fn create_canvas_context(&self, options: &ContextOptions) -> Result<bool> {
        let document = Self::window()?
            .document()
            .ok_or_else(|| HdrCanvasError::Capability("no document".to_string()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| HdrCanvasError::Capability("canvas element is not an HTMLCanvasElement".to_string()))?;
        let context = canvas.get_context_with_context_options("2d", &options.to_js_value()?)?;
        Ok(context.is_some())
    }
}

/// A fixed environment, for hosts without a browser and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticEnvironment {
    pub color_depth: f64,
    pub dynamic_range_high: bool,
    pub color_gamut_rec2020: bool,
    pub color_gamut_p3: bool,
    pub video_dynamic_range_high: bool,
    pub webkit_video_dynamic_range_high: bool,
    pub user_agent: String,
    pub float16_image_data: bool,
    pub hdr_canvas_context: bool,
}

impl StaticEnvironment {
    /// A wide-gamut, 10-bit HDR display in a recent Chromium.
    pub fn hdr_display() -> Self {
        Self {
            color_depth: 30.0,
            dynamic_range_high: true,
            color_gamut_rec2020: true,
            color_gamut_p3: true,
            video_dynamic_range_high: true,
            webkit_video_dynamic_range_high: false,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36".to_string(),
            float16_image_data: true,
            hdr_canvas_context: true,
        }
    }

    /// An 8-bit sRGB display.
    pub fn sdr_display() -> Self {
        Self {
            color_depth: 24.0,
            dynamic_range_high: false,
            color_gamut_rec2020: false,
            color_gamut_p3: false,
            video_dynamic_range_high: false,
            webkit_video_dynamic_range_high: false,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string(),
            float16_image_data: false,
            hdr_canvas_context: false,
        }
    }
}

impl Environment for StaticEnvironment {
    fn screen_color_depth(&self) -> Result<f64> {
        Ok(self.color_depth)
    }

    fn match_media(&self, query: &str) -> Result<bool> {
        match query {
            "(dynamic-range: high)" => Ok(self.dynamic_range_high),
            "(color-gamut: rec2020)" => Ok(self.color_gamut_rec2020),
            "(color-gamut: p3)" => Ok(self.color_gamut_p3),
            "(video-dynamic-range: high)" => Ok(self.video_dynamic_range_high),
            "(-webkit-video-dynamic-range: high)" => Ok(self.webkit_video_dynamic_range_high),
            other => Err(HdrCanvasError::Capability(format!("unknown media query {}", other))),
        }
    }

    fn user_agent(&self) -> Result<String> {
        Ok(self.user_agent.clone())
    }

    fn create_float16_image_data(&self) -> Result<()> {
        if self.float16_image_data {
            Ok(())
        } else {
            Err(HdrCanvasError::Js("Float16Array is not available".to_string()))
        }
    }

    fn create_canvas_context(&self, _options: &ContextOptions) -> Result<bool> {
        Ok(self.hdr_canvas_context)
    }
}
