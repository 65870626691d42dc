//! HDR capability checks.
//!
//! Every check answers `false` instead of failing; the reason is logged.

use super::browser::browser_major_version;
use super::canvas::get_hdr_options;
use super::env::Environment;
use crate::error::Result;

fn absorb(check: &'static str, result: Result<bool>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::error!(check, error = %e, "capability check failed");
        false
    })
}

fn bits_per_channel<E: Environment + ?Sized>(env: &E) -> Result<f64> {
    Ok(env.screen_color_depth()? / 3.0)
}

/// Whether the display reports a wide gamut and high dynamic range.
///
/// A non-integer bits-per-channel value disqualifies the display, since some
/// platforms misreport their color depth.
pub fn check_hdr<E: Environment + ?Sized>(env: &E) -> bool {
    absorb("checkHDR", (|| -> Result<bool> {
        let bits = bits_per_channel(env)?;
        let dynamic_range_high = env.match_media("(dynamic-range: high)")?;
        let wide_gamut =
            env.match_media("(color-gamut: rec2020)")? || env.match_media("(color-gamut: p3)")?;

        if !(wide_gamut && dynamic_range_high) {
            return Ok(false);
        }
        if bits != bits.round() {
            tracing::debug!(bits, "non-integer bits per channel reported");
            return Ok(false);
        }
        Ok(bits > 8.0)
    })())
}

/// Whether the environment can play high dynamic range video.
pub fn check_hdr_video<E: Environment + ?Sized>(env: &E) -> bool {
    absorb("checkHDRVideo", (|| -> Result<bool> {
        if env.match_media("(video-dynamic-range: high)")? {
            return Ok(true);
        }
        env.match_media("(-webkit-video-dynamic-range: high)")
    })())
}

/// Whether half float backed image data can be constructed.
pub fn check_float16_array<E: Environment + ?Sized>(env: &E) -> bool {
    match env.create_float16_image_data() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "half float image data unavailable");
            false
        }
    }
}

/// Whether the display reports more than 8 bits per channel.
pub fn check_hdr_bit_depth<E: Environment + ?Sized>(env: &E) -> bool {
    absorb("checkHDRBitDepth", bits_per_channel(env).map(|bits| bits > 8.0))
}

/// Whether an HDR 2D canvas context can actually be created.
pub fn check_hdr_canvas<E: Environment + ?Sized>(env: &E) -> bool {
    if !check_hdr(env) || !check_float16_array(env) {
        return false;
    }
    let options = get_hdr_options(browser_major_version(env));
    let created = env.create_canvas_context(&options);
    if created.is_err() {
        tracing::error!(
            "bad canvas color space test - make sure that the Chromium browser flag \
             'enable-experimental-web-platform-features' has been enabled"
        );
    }
    absorb("checkHDRCanvas", created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::canvas::ContextOptions;
    use crate::capability::env::StaticEnvironment;
    use crate::error::HdrCanvasError;

    struct BrokenEnvironment;

    impl Environment for BrokenEnvironment {
        fn screen_color_depth(&self) -> Result<f64> {
            Err(HdrCanvasError::Capability("no screen".to_string()))
        }
        fn match_media(&self, _query: &str) -> Result<bool> {
            Err(HdrCanvasError::Capability("no matchMedia".to_string()))
        }
        fn user_agent(&self) -> Result<String> {
            Err(HdrCanvasError::Capability("no navigator".to_string()))
        }
        fn create_float16_image_data(&self) -> Result<()> {
            Err(HdrCanvasError::Js("Float16Array is not defined".to_string()))
        }
        fn create_canvas_context(&self, _options: &ContextOptions) -> Result<bool> {
            Err(HdrCanvasError::Js("no document".to_string()))
        }
    }

    #[test]
    fn test_check_hdr_display() {
        assert!(check_hdr(&StaticEnvironment::hdr_display()));
        assert!(!check_hdr(&StaticEnvironment::sdr_display()));
    }

    #[test]
    fn test_check_hdr_needs_gamut_and_range() {
        let mut env = StaticEnvironment::hdr_display();
        env.color_gamut_rec2020 = false;
        assert!(check_hdr(&env), "p3 alone is a wide gamut");
        env.color_gamut_p3 = false;
        assert!(!check_hdr(&env));

        let mut env = StaticEnvironment::hdr_display();
        env.dynamic_range_high = false;
        assert!(!check_hdr(&env));
    }

    #[test]
    fn test_check_hdr_rejects_fractional_depth() {
        let mut env = StaticEnvironment::hdr_display();
        env.color_depth = 32.0;
        assert!(!check_hdr(&env));
    }

    #[test]
    fn test_check_hdr_rejects_8_bit() {
        let mut env = StaticEnvironment::hdr_display();
        env.color_depth = 24.0;
        assert!(!check_hdr(&env));
    }

    #[test]
    fn test_check_hdr_video_fallback() {
        let mut env = StaticEnvironment::sdr_display();
        assert!(!check_hdr_video(&env));
        env.webkit_video_dynamic_range_high = true;
        assert!(check_hdr_video(&env));
    }

    #[test]
    fn test_bit_depth() {
        assert!(check_hdr_bit_depth(&StaticEnvironment::hdr_display()));
        assert!(!check_hdr_bit_depth(&StaticEnvironment::sdr_display()));
    }

    #[test]
    fn test_float16_array() {
        assert!(check_float16_array(&StaticEnvironment::hdr_display()));
        assert!(!check_float16_array(&StaticEnvironment::sdr_display()));
    }

    #[test]
    fn test_check_hdr_canvas() {
        assert!(check_hdr_canvas(&StaticEnvironment::hdr_display()));

        let mut env = StaticEnvironment::hdr_display();
        env.hdr_canvas_context = false;
        assert!(!check_hdr_canvas(&env));

        let mut env = StaticEnvironment::hdr_display();
        env.float16_image_data = false;
        assert!(!check_hdr_canvas(&env));
    }

    #[test]
    fn test_failures_become_false() {
        let env = BrokenEnvironment;
        assert!(!check_hdr(&env));
        assert!(!check_hdr_video(&env));
        assert!(!check_float16_array(&env));
        assert!(!check_hdr_bit_depth(&env));
        assert!(!check_hdr_canvas(&env));
    }
}
