//! HDR canvas context options and context acquisition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlCanvasElement;

use super::browser::browser_major_version;
use super::env::Environment;
use crate::color::{HdrColorSpace, DEFAULT_COLOR_SPACE};
use crate::error::{HdrCanvasError, Result};
use crate::interop::{get_property, to_js_object};

/// First Chromium major version that takes `colorType` instead of `pixelFormat`.
pub const COLOR_TYPE_MIN_VERSION: u32 = 133;

/// Storage hint accepted by older engines under the `pixelFormat` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPixelFormat {
    Uint8,
    Float16,
}

/// Storage hint accepted by newer engines under the `colorType` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasColorType {
    Unorm8,
    Float16,
}

/// Settings passed to `getContext("2d", ...)`.
///
/// At most one of `pixel_format` / `color_type` is set; engines reject the
/// key they do not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub color_space: HdrColorSpace,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<CanvasPixelFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_type: Option<CanvasColorType>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        get_hdr_options(None)
    }
}

impl ContextOptions {
    /// Converts to a plain JavaScript settings object.
    pub fn to_js_value(&self) -> Result<JsValue> {
        to_js_object(self)
    }

    /// Merges these options over caller supplied options; HDR keys win.
    ///
    /// A missing or non-object `user` yields just the HDR keys.
    pub fn merged_over(&self, user: Option<&Value>) -> Result<Value> {
        let mut merged = match user {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                tracing::warn!(options = %other, "ignoring non-object context options");
                Map::new()
            }
            None => Map::new(),
        };
        if let Value::Object(hdr) = serde_json::to_value(self)? {
            merged.extend(hdr);
        }
        Ok(Value::Object(merged))
    }
}

/// Builds the 2D context options for an engine of the given major version.
///
/// Always requests the default HDR color space with a half float backing
/// store; the key naming the backing store depends on the version. Unknown
/// engines get the newer key.
pub fn get_hdr_options(browser_major_version: Option<u32>) -> ContextOptions {
    match browser_major_version {
        Some(v) if v < COLOR_TYPE_MIN_VERSION => ContextOptions {
            color_space: DEFAULT_COLOR_SPACE,
            pixel_format: Some(CanvasPixelFormat::Float16),
            color_type: None,
        },
        _ => ContextOptions {
            color_space: DEFAULT_COLOR_SPACE,
            pixel_format: None,
            color_type: Some(CanvasColorType::Float16),
        },
    }
}

/// Dynamic range mode for `configureHighDynamicRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicRangeMode {
    Standard,
    Extended,
}

/// Argument of `canvas.configureHighDynamicRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighDynamicRangeOptions {
    pub mode: DynamicRangeMode,
}

impl HighDynamicRangeOptions {
    pub const fn extended() -> Self {
        Self {
            mode: DynamicRangeMode::Extended,
        }
    }
}

/// A canvas that can be switched to extended range and asked for contexts.
pub trait HdrCanvasSurface {
    /// The rendering context handle handed out.
    type Context;

    fn configure_high_dynamic_range(&self, options: &HighDynamicRangeOptions) -> Result<()>;

    fn get_context(&self, kind: &str, options: &Value) -> Result<Option<Self::Context>>;
}

impl HdrCanvasSurface for HtmlCanvasElement {
    type Context = js_sys::Object;

    fn configure_high_dynamic_range(&self, options: &HighDynamicRangeOptions) -> Result<()> {
        let configure = get_property(self.as_ref(), "configureHighDynamicRange")?;
        let configure: js_sys::Function = configure.dyn_into().map_err(|_| {
            HdrCanvasError::Capability("configureHighDynamicRange is not supported".to_string())
        })?;
        configure.call1(self.as_ref(), &to_js_object(options)?)?;
        Ok(())
    }

    fn get_context(&self, kind: &str, options: &Value) -> Result<Option<Self::Context>> {
        Ok(self.get_context_with_context_options(kind, &to_js_object(options)?)?)
    }
}

/// Switches `canvas` to extended dynamic range and requests an HDR 2D context.
///
/// A canvas without `configureHighDynamicRange` still gets its context
/// requested. Returns `None` when no context could be created.
pub fn init_hdr_canvas<C: HdrCanvasSurface>(canvas: &C, options: &ContextOptions) -> Option<C::Context> {
    if let Err(e) = canvas.configure_high_dynamic_range(&HighDynamicRangeOptions::extended()) {
        tracing::warn!(error = %e, "unable to configure extended dynamic range");
    }

    let result = serde_json::to_value(options)
        .map_err(HdrCanvasError::from)
        .and_then(|options| canvas.get_context("2d", &options));
    match result {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "unable to create HDR 2d context");
            None
        }
    }
}

/// Opt-in context acquisition that always merges in HDR options.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrContextFactory {
    options: ContextOptions,
}

impl HdrContextFactory {
    pub fn new(options: ContextOptions) -> Self {
        Self { options }
    }

    /// Builds a factory with options for the detected browser.
    pub fn detect<E: Environment + ?Sized>(env: &E) -> Self {
        Self::new(get_hdr_options(browser_major_version(env)))
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Requests a `kind` context from `canvas` with HDR keys merged over `user_options`.
    pub fn get_context<C: HdrCanvasSurface>(
        &self,
        canvas: &C,
        kind: &str,
        user_options: Option<&Value>,
    ) -> Result<Option<C::Context>> {
        canvas.get_context(kind, &self.options.merged_over(user_options)?)
    }
}
