//! Matrice de Bayer utilisée pour générer l'atlas de glyphes intégré.

/// Matrice de Bayer 8x8. Normalisée sur 64 niveaux (0-63).
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Ordered-dither test: is texel (x, y) lit at `density` ∈ [0, 1]?
///
/// Density 0 lights nothing, density 1 lights everything, and the lit set
/// only grows with density.
///
/// # Example
/// ```
/// use gp_glyph::dither::bayer_covers;
/// assert!(!bayer_covers(0.0, 3, 5));
/// assert!(bayer_covers(1.0, 3, 5));
/// ```
#[must_use]
#[inline(always)]
pub fn bayer_covers(density: f32, x: u32, y: u32) -> bool {
    let threshold = (f32::from(BAYER_8X8[(y % 8) as usize][(x % 8) as usize]) + 0.5) / 64.0;
    threshold < density
}
