//! Display and browser capability detection, plus HDR surface negotiation.

pub mod browser;
pub mod canvas;
pub mod check;
pub mod env;
pub mod patch;
pub mod webgpu;

pub use browser::{browser_major_version, parse_browser_version};
pub use canvas::{
    get_hdr_options, init_hdr_canvas, CanvasColorType, CanvasPixelFormat, ContextOptions,
    DynamicRangeMode, HdrCanvasSurface, HdrContextFactory, HighDynamicRangeOptions,
    COLOR_TYPE_MIN_VERSION,
};
pub use check::{
    check_float16_array, check_hdr, check_hdr_bit_depth, check_hdr_canvas, check_hdr_video,
};
pub use env::{BrowserEnvironment, Environment, StaticEnvironment};
pub use patch::{default_get_context_hdr, is_get_context_patched, reset_get_context, PatchSlot};
pub use webgpu::{webgpu_canvas_configuration, GpuAlphaMode, GpuCanvasHdrConfiguration};

use crate::image::{select_variant, VariantTag};

/// Picks the pixel buffer variant the detected browser can display.
pub fn detect_variant<E: Environment + ?Sized>(env: &E) -> VariantTag {
    select_variant(browser_major_version(env))
}
