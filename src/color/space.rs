//! Predefined HDR color spaces and the conversion engine behind them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::math;
use crate::error::{HdrCanvasError, Result};

/// A predefined color space recognised by HDR canvases and image data.
///
/// `rec2100-display-linear` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdrColorSpace {
    #[serde(rename = "display-p3")]
    DisplayP3,
    #[serde(rename = "srgb")]
    Srgb,
    #[serde(rename = "rec2100-hlg")]
    Rec2100Hlg,
    #[serde(rename = "rec2100-pq")]
    Rec2100Pq,
}

/// Color space HDR images are stored in unless told otherwise.
pub const DEFAULT_COLOR_SPACE: HdrColorSpace = HdrColorSpace::Rec2100Hlg;

impl HdrColorSpace {
    /// Every predefined color space.
    pub const ALL: [HdrColorSpace; 4] = [
        HdrColorSpace::Rec2100Hlg,
        HdrColorSpace::DisplayP3,
        HdrColorSpace::Srgb,
        HdrColorSpace::Rec2100Pq,
    ];

    /// Web-exposed name, e.g. `"rec2100-hlg"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            HdrColorSpace::DisplayP3 => "display-p3",
            HdrColorSpace::Srgb => "srgb",
            HdrColorSpace::Rec2100Hlg => "rec2100-hlg",
            HdrColorSpace::Rec2100Pq => "rec2100-pq",
        }
    }

    /// The conversion engine's identifier for this color space.
    pub const fn engine_space(self) -> ColorSpaceId {
        match self {
            HdrColorSpace::Rec2100Hlg => ColorSpaceId::Rec2100Hlg,
            HdrColorSpace::DisplayP3 => ColorSpaceId::P3,
            HdrColorSpace::Srgb => ColorSpaceId::Srgb,
            HdrColorSpace::Rec2100Pq => ColorSpaceId::Rec2100Pq,
        }
    }
}

impl Default for HdrColorSpace {
    fn default() -> Self {
        DEFAULT_COLOR_SPACE
    }
}

impl fmt::Display for HdrColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HdrColorSpace {
    type Err = HdrCanvasError;

    /// Parses a web name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "display-p3" => Ok(HdrColorSpace::DisplayP3),
            "srgb" => Ok(HdrColorSpace::Srgb),
            "rec2100-hlg" => Ok(HdrColorSpace::Rec2100Hlg),
            "rec2100-pq" => Ok(HdrColorSpace::Rec2100Pq),
            other => Err(HdrCanvasError::UnsupportedColorSpace(other.to_string())),
        }
    }
}

/// Transfer function of an engine color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Srgb,
    Hlg,
    Pq,
}

impl Transfer {
    /// Encoded value to media-white relative linear light.
    #[inline]
    pub fn to_linear(self, v: f64) -> f64 {
        match self {
            Transfer::Srgb => math::srgb_to_linear(v),
            Transfer::Hlg => math::hlg_to_linear(v),
            Transfer::Pq => math::pq_to_linear(v),
        }
    }

    /// Media-white relative linear light to encoded value.
    #[inline]
    pub fn from_linear(self, v: f64) -> f64 {
        match self {
            Transfer::Srgb => math::linear_to_srgb(v),
            Transfer::Hlg => math::linear_to_hlg(v),
            Transfer::Pq => math::linear_to_pq(v),
        }
    }
}

/// Color spaces known to the conversion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpaceId {
    Srgb,
    P3,
    Rec2100Hlg,
    Rec2100Pq,
}

impl ColorSpaceId {
    /// Engine name, e.g. `"rec2100hlg"`.
    pub const fn name(self) -> &'static str {
        match self {
            ColorSpaceId::Srgb => "sRGB",
            ColorSpaceId::P3 => "p3",
            ColorSpaceId::Rec2100Hlg => "rec2100hlg",
            ColorSpaceId::Rec2100Pq => "rec2100pq",
        }
    }

    pub const fn transfer(self) -> Transfer {
        match self {
            ColorSpaceId::Srgb | ColorSpaceId::P3 => Transfer::Srgb,
            ColorSpaceId::Rec2100Hlg => Transfer::Hlg,
            ColorSpaceId::Rec2100Pq => Transfer::Pq,
        }
    }

    const fn to_xyz(self) -> &'static [[f64; 3]; 3] {
        match self {
            ColorSpaceId::Srgb => &math::SRGB_TO_XYZ,
            ColorSpaceId::P3 => &math::P3_TO_XYZ,
            ColorSpaceId::Rec2100Hlg | ColorSpaceId::Rec2100Pq => &math::BT2020_TO_XYZ,
        }
    }

    const fn from_xyz(self) -> &'static [[f64; 3]; 3] {
        match self {
            ColorSpaceId::Srgb => &math::XYZ_TO_SRGB,
            ColorSpaceId::P3 => &math::XYZ_TO_P3,
            ColorSpaceId::Rec2100Hlg | ColorSpaceId::Rec2100Pq => &math::XYZ_TO_BT2020,
        }
    }

    fn shares_primaries(self, other: ColorSpaceId) -> bool {
        matches!(
            (self, other),
            (
                ColorSpaceId::Rec2100Hlg | ColorSpaceId::Rec2100Pq,
                ColorSpaceId::Rec2100Hlg | ColorSpaceId::Rec2100Pq
            ) | (ColorSpaceId::Srgb, ColorSpaceId::Srgb)
                | (ColorSpaceId::P3, ColorSpaceId::P3)
        )
    }
}

/// A color value: three encoded coordinates in a space, plus alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub space: ColorSpaceId,
    pub coords: [f64; 3],
    pub alpha: f64,
}

impl Color {
    pub fn new(space: ColorSpaceId, coords: [f64; 3], alpha: f64) -> Self {
        Self {
            space,
            coords,
            alpha,
        }
    }

    /// Converts to another space: decode, move through XYZ, re-encode.
    ///
    /// No gamut mapping is performed and alpha is carried unchanged.
    pub fn to(&self, target: ColorSpaceId) -> Color {
        if target == self.space {
            return *self;
        }

        let src = self.space.transfer();
        let linear = self.coords.map(|c| src.to_linear(c));

        let converted = if self.space.shares_primaries(target) {
            linear
        } else {
            let xyz = math::apply_matrix(linear, self.space.to_xyz());
            math::apply_matrix(xyz, target.from_xyz())
        };

        let dst = target.transfer();
        Color {
            space: target,
            coords: converted.map(|c| dst.from_linear(c)),
            alpha: self.alpha,
        }
    }
}
