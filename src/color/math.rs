//! Transfer functions and primaries matrices for the predefined HDR color spaces.
//!
//! All values are relative to media white: linear 1.0 is diffuse/SDR white.
//! HLG and PQ encodings are scaled so that media white lands at the
//! conventional reference levels (HLG 0.75, PQ 203 cd/m²).

/// sRGB transfer function constants.
const SRGB_THRESHOLD: f64 = 0.04045;
const SRGB_LINEAR_THRESHOLD: f64 = 0.0031308;
const SRGB_LINEAR_SCALE: f64 = 12.92;
const SRGB_GAMMA: f64 = 2.4;
const SRGB_A: f64 = 0.055;

/// HLG constants (ITU-R BT.2100).
const HLG_A: f64 = 0.17883277;
const HLG_B: f64 = 0.28466892; // 1 - 4*a
const HLG_C: f64 = 0.55991073; // 0.5 - a * ln(4*a)

/// Places 18% grey at HLG 0.38, so media white sits at 0.75.
pub const HLG_MEDIA_WHITE_SCALE: f64 = 3.7743;

/// BT.2100 PQ constants.
const PQ_M1: f64 = 2610.0 / 16384.0;
const PQ_M2: f64 = 2523.0 / 32.0;
const PQ_C1: f64 = 3424.0 / 4096.0;
const PQ_C2: f64 = 2413.0 / 128.0;
const PQ_C3: f64 = 2392.0 / 128.0;

/// Absolute luminance of media white for PQ, in cd/m².
pub const PQ_MEDIA_WHITE_NITS: f64 = 203.0;

/// Maximum luminance for PQ in cd/m².
pub const PQ_MAX_NITS: f64 = 10000.0;

// ============================================================================
// sRGB
// ============================================================================

/// sRGB encoded value to linear light. Sign is preserved for out-of-gamut values.
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    let abs = v.abs();
    if abs <= SRGB_THRESHOLD {
        v / SRGB_LINEAR_SCALE
    } else {
        v.signum() * ((abs + SRGB_A) / (1.0 + SRGB_A)).powf(SRGB_GAMMA)
    }
}

/// Linear light to sRGB encoded value. Sign is preserved for out-of-gamut values.
#[inline]
pub fn linear_to_srgb(v: f64) -> f64 {
    let abs = v.abs();
    if abs > SRGB_LINEAR_THRESHOLD {
        v.signum() * ((1.0 + SRGB_A) * abs.powf(1.0 / SRGB_GAMMA) - SRGB_A)
    } else {
        v * SRGB_LINEAR_SCALE
    }
}

// ============================================================================
// BT.2100 HLG
// ============================================================================

/// HLG OETF applied to media-white relative linear light.
#[inline]
pub fn linear_to_hlg(v: f64) -> f64 {
    let e = (v / HLG_MEDIA_WHITE_SCALE).max(0.0);
    if e <= 1.0 / 12.0 {
        (3.0 * e).sqrt()
    } else {
        HLG_A * (12.0 * e - HLG_B).ln() + HLG_C
    }
}

/// Inverse HLG OETF, returning media-white relative linear light.
#[inline]
pub fn hlg_to_linear(v: f64) -> f64 {
    let scene = if v <= 0.5 {
        v * v / 3.0
    } else {
        (((v - HLG_C) / HLG_A).exp() + HLG_B) / 12.0
    };
    scene * HLG_MEDIA_WHITE_SCALE
}

// ============================================================================
// BT.2100 PQ
// ============================================================================

/// PQ inverse EOTF applied to media-white relative linear light.
#[inline]
pub fn linear_to_pq(v: f64) -> f64 {
    let y = (v * PQ_MEDIA_WHITE_NITS / PQ_MAX_NITS).max(0.0);
    let y_m1 = y.powf(PQ_M1);
    ((PQ_C1 + PQ_C2 * y_m1) / (1.0 + PQ_C3 * y_m1)).powf(PQ_M2)
}

/// PQ EOTF, returning media-white relative linear light.
#[inline]
pub fn pq_to_linear(v: f64) -> f64 {
    let p = v.max(0.0).powf(1.0 / PQ_M2);
    let numerator = (p - PQ_C1).max(0.0);
    let denominator = PQ_C2 - PQ_C3 * p;
    if denominator <= 0.0 {
        return PQ_MAX_NITS / PQ_MEDIA_WHITE_NITS;
    }
    (numerator / denominator).powf(1.0 / PQ_M1) * PQ_MAX_NITS / PQ_MEDIA_WHITE_NITS
}

// ============================================================================
// Primaries (D65, no chromatic adaptation needed between these spaces)
// ============================================================================

/// Linear sRGB to XYZ.
#[rustfmt::skip]
pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.41239079926595934, 0.357584339383878,   0.1804807884018343 ],
    [0.21263900587151027, 0.715168678767756,   0.07219231536073371],
    [0.01933081871559182, 0.11919477979462598, 0.9505321522496607 ],
];

/// XYZ to linear sRGB.
#[rustfmt::skip]
pub const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [ 3.2409699419045226,  -1.537383177570094,   -0.4986107602930034 ],
    [-0.9692436362808796,   1.8759675015077202,   0.04155505740717559],
    [ 0.05563007969699366, -0.20397695888897652,  1.0569715142428786 ],
];

/// Linear Display P3 to XYZ.
#[rustfmt::skip]
pub const P3_TO_XYZ: [[f64; 3]; 3] = [
    [0.4865709486482162, 0.26566769316909306, 0.1982172852343625],
    [0.2289745640697488, 0.6917385218365064,  0.079286914093745 ],
    [0.0,                0.04511338185890264, 1.043944368900976 ],
];

/// XYZ to linear Display P3.
#[rustfmt::skip]
pub const XYZ_TO_P3: [[f64; 3]; 3] = [
    [ 2.493496911941425,   -0.9313836179191239,  -0.40271078445071684 ],
    [-0.8294889695615747,   1.7626640603183463,   0.023624685841943577],
    [ 0.03584583024378447, -0.07617238926804182,  0.9568845240076872  ],
];

/// Linear BT.2020 to XYZ.
#[rustfmt::skip]
pub const BT2020_TO_XYZ: [[f64; 3]; 3] = [
    [0.6369580483012914, 0.14461690358620832,  0.1688809751641721 ],
    [0.2627002120112671, 0.6779980715188708,   0.05930171646986196],
    [0.0,                0.028072693049087428, 1.060985057710791  ],
];

/// XYZ to linear BT.2020.
#[rustfmt::skip]
pub const XYZ_TO_BT2020: [[f64; 3]; 3] = [
    [ 1.716651187971268,  -0.355670783776392, -0.253366281373660 ],
    [-0.666684351832489,   1.616481236634939,  0.0157685458139111],
    [ 0.017639857445311,  -0.042770613257809,  0.942103121235474 ],
];

/// Applies a 3x3 color matrix to RGB values.
#[inline]
pub fn apply_matrix(rgb: [f64; 3], matrix: &[[f64; 3]; 3]) -> [f64; 3] {
    [
        matrix[0][0] * rgb[0] + matrix[0][1] * rgb[1] + matrix[0][2] * rgb[2],
        matrix[1][0] * rgb[0] + matrix[1][1] * rgb[1] + matrix[1][2] * rgb[2],
        matrix[2][0] * rgb[0] + matrix[2][1] * rgb[1] + matrix[2][2] * rgb[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_srgb_roundtrip() {
        for i in 0..=100 {
            let linear = f64::from(i) / 100.0;
            let back = srgb_to_linear(linear_to_srgb(linear));
            assert!(approx_eq(linear, back), "Failed at {}: {}", linear, back);
        }
    }

    #[test]
    fn test_srgb_preserves_sign() {
        assert!(srgb_to_linear(-0.5) < 0.0);
        assert!(approx_eq(srgb_to_linear(-0.5), -srgb_to_linear(0.5)));
    }

    #[test]
    fn test_hlg_roundtrip() {
        for i in 0..=100 {
            let linear = f64::from(i) / 50.0;
            let back = hlg_to_linear(linear_to_hlg(linear));
            assert!((linear - back).abs() < 1e-7, "Failed at {}: {}", linear, back);
        }
    }

    #[test]
    fn test_hlg_media_white() {
        assert!((linear_to_hlg(1.0) - 0.75).abs() < 1e-4);
        assert_eq!(linear_to_hlg(0.0), 0.0);
    }

    #[test]
    fn test_pq_roundtrip() {
        for i in 0..=100 {
            let linear = f64::from(i) / 20.0;
            let back = pq_to_linear(linear_to_pq(linear));
            assert!((linear - back).abs() < 1e-6, "Failed at {}: {}", linear, back);
        }
    }

    #[test]
    fn test_matrix_inverse_pairs() {
        let rgb = [0.25, 0.5, 0.75];
        for (to, from) in [
            (&SRGB_TO_XYZ, &XYZ_TO_SRGB),
            (&P3_TO_XYZ, &XYZ_TO_P3),
            (&BT2020_TO_XYZ, &XYZ_TO_BT2020),
        ] {
            let back = apply_matrix(apply_matrix(rgb, to), from);
            for i in 0..3 {
                assert!((rgb[i] - back[i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_white_maps_to_white() {
        let xyz = apply_matrix([1.0, 1.0, 1.0], &SRGB_TO_XYZ);
        let rec2020 = apply_matrix(xyz, &XYZ_TO_BT2020);
        for c in rec2020 {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }
}
