//! WebGPU canvas configuration for HDR output.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use super::canvas::{DynamicRangeMode, HighDynamicRangeOptions};
use crate::color::{HdrColorSpace, DEFAULT_COLOR_SPACE};
use crate::error::Result;
use crate::interop::to_js_object;

/// Half float swap chain format.
pub const HDR_TEXTURE_FORMAT: &str = "rgba16float";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuAlphaMode {
    Opaque,
    Premultiplied,
}

/// The HDR specific part of `GPUCanvasContext.configure(...)`.
///
/// The device is supplied by the renderer and merged in on the JS side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuCanvasHdrConfiguration {
    pub format: String,
    pub color_space: HdrColorSpace,
    pub tone_mapping: HighDynamicRangeOptions,
    pub alpha_mode: GpuAlphaMode,
}

impl Default for GpuCanvasHdrConfiguration {
    fn default() -> Self {
        webgpu_canvas_configuration(true)
    }
}

impl GpuCanvasHdrConfiguration {
    pub fn to_js_value(&self) -> Result<JsValue> {
        to_js_object(self)
    }

    pub fn is_extended(&self) -> bool {
        self.tone_mapping.mode == DynamicRangeMode::Extended
    }
}

/// Configuration for an extended range WebGPU canvas.
///
/// `alpha` selects premultiplied output; otherwise the canvas is opaque.
pub fn webgpu_canvas_configuration(alpha: bool) -> GpuCanvasHdrConfiguration {
    GpuCanvasHdrConfiguration {
        format: HDR_TEXTURE_FORMAT.to_string(),
        color_space: DEFAULT_COLOR_SPACE,
        tone_mapping: HighDynamicRangeOptions::extended(),
        alpha_mode: if alpha {
            GpuAlphaMode::Premultiplied
        } else {
            GpuAlphaMode::Opaque
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_configuration_shape() {
        let config = webgpu_canvas_configuration(true);
        assert!(config.is_extended());
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "format": "rgba16float",
                "colorSpace": "rec2100-hlg",
                "toneMapping": { "mode": "extended" },
                "alphaMode": "premultiplied"
            })
        );
    }

    #[test]
    fn test_opaque_without_alpha() {
        assert_eq!(
            webgpu_canvas_configuration(false).alpha_mode,
            GpuAlphaMode::Opaque
        );
        assert_eq!(
            GpuCanvasHdrConfiguration::default().alpha_mode,
            GpuAlphaMode::Premultiplied
        );
    }
}
