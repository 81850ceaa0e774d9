/// BT.709 luma weights, shared by the transform and the I/O helpers.
pub const LUMA_BT709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Luminance perceptuelle BT.709 d'une couleur linéaire.
///
/// # Example
/// ```
/// use gp_core::color::luminance;
/// assert!((luminance(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
/// assert_eq!(luminance(0.0, 0.0, 0.0), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    r * LUMA_BT709[0] + g * LUMA_BT709[1] + b * LUMA_BT709[2]
}

/// Quantize a normalized channel to 8 bits, clamping out-of-range input.
///
/// NaN maps to 0.
///
/// # Example
/// ```
/// use gp_core::color::to_unorm8;
/// assert_eq!(to_unorm8(1.0), 255);
/// assert_eq!(to_unorm8(2.5), 255);
/// assert_eq!(to_unorm8(-1.0), 0);
/// assert_eq!(to_unorm8(f32::NAN), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn to_unorm8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unorm8_roundtrip_is_exact() {
        for i in 0..=255u8 {
            assert_eq!(to_unorm8(f32::from(i) / 255.0), i);
        }
    }

    #[test]
    fn luma_weights_sum_to_one() {
        let sum: f32 = LUMA_BT709.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
}
