use std::sync::Arc;

use crate::config::TilePolicy;
use crate::error::CoreError;
use crate::texture::RenderTexture;

/// Default monochrome tint (phosphor green).
pub const DEFAULT_MONO_TINT: [f32; 3] = [0.2, 1.0, 0.4];

/// Nombre maximal de glyphes dans un atlas.
///
/// Bounds the built-in atlas to `MAX_GLYPH_COUNT × cell` texels wide.
pub const MAX_GLYPH_COUNT: u32 = 256;

/// Paramètres de stylisation consommés par le programme glyphe, une frame à la fois.
///
/// Passed by value into the pass each frame; the pass never keeps a copy.
///
/// # Example
/// ```
/// use gp_core::params::StylizationParameters;
/// let p = StylizationParameters::default();
/// assert_eq!(p.tile_size(), 24);
/// assert_eq!(p.cell_count(), 3600);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StylizationParameters {
    /// Target output width in pixels.
    pub frame_width: u32,
    /// Target output height in pixels.
    pub frame_height: u32,
    /// Glyph cells across the frame.
    pub tiles_x: u32,
    /// Glyph cells down the frame.
    pub tiles_y: u32,
    /// Atlas strip holding `glyph_count` cells side by side. `None` selects the built-in ramp.
    pub glyph_atlas: Option<Arc<RenderTexture>>,
    /// Number of glyphs in the atlas.
    pub glyph_count: u32,
    /// Output gain, [0, ∞).
    pub brightness: f32,
    /// Use `mono_tint` instead of the block colour.
    pub monochrome: bool,
    /// Tint applied when `monochrome` is set.
    pub mono_tint: [f32; 3],
}

impl Default for StylizationParameters {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
            tiles_x: 80,
            tiles_y: 45,
            glyph_atlas: None,
            glyph_count: 8,
            brightness: 0.8,
            monochrome: false,
            mono_tint: DEFAULT_MONO_TINT,
        }
    }
}

impl StylizationParameters {
    /// Side of a square tile in pixels, `frame_width / tiles_x` rounded down.
    ///
    /// Returns 0 when `tiles_x` is 0; [`validate`](Self::validate) rejects that case.
    #[must_use]
    pub fn tile_size(&self) -> u32 {
        self.frame_width.checked_div(self.tiles_x).unwrap_or(0)
    }

    /// Number of glyph cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.tiles_x) * u64::from(self.tiles_y)
    }

    /// Check the parameters before they reach the transform.
    ///
    /// # Errors
    /// - [`CoreError::InvalidDimensions`] for a zero frame size or a tile
    ///   smaller than one pixel.
    /// - [`CoreError::Config`] for zero tile counts, a glyph count outside
    ///   `1..=MAX_GLYPH_COUNT`, or a negative or non-finite brightness.
    /// - [`CoreError::NonUniformTiles`] under [`TilePolicy::Reject`] when the
    ///   frame does not split into whole square tiles.
    /// - [`CoreError::Atlas`] when the atlas is narrower than one pixel per glyph.
    ///
    /// # Example
    /// ```
    /// use gp_core::config::TilePolicy;
    /// use gp_core::params::StylizationParameters;
    /// let mut p = StylizationParameters::default();
    /// assert!(p.validate(TilePolicy::Reject).is_ok());
    /// p.tiles_x = 77;
    /// assert!(p.validate(TilePolicy::Reject).is_err());
    /// assert!(p.validate(TilePolicy::RoundDown).is_ok());
    /// ```
    pub fn validate(&self, policy: TilePolicy) -> Result<(), CoreError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(CoreError::InvalidDimensions {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(CoreError::Config(format!(
                "tiles_x et tiles_y doivent être > 0 (reçu {}×{})",
                self.tiles_x, self.tiles_y
            )));
        }
        if self.glyph_count == 0 || self.glyph_count > MAX_GLYPH_COUNT {
            return Err(CoreError::Config(format!(
                "glyph_count hors domaine : {} (1..={MAX_GLYPH_COUNT})",
                self.glyph_count
            )));
        }
        if !self.brightness.is_finite() || self.brightness < 0.0 {
            return Err(CoreError::Config(format!(
                "brightness hors domaine : {}",
                self.brightness
            )));
        }
        if self.tiles_x > self.frame_width || self.tiles_y > self.frame_height {
            return Err(CoreError::InvalidDimensions {
                width: self.frame_width,
                height: self.frame_height,
            });
        }

        let tile = self.tile_size();
        let uniform = self.frame_width % self.tiles_x == 0
            && self.frame_height % self.tiles_y == 0
            && self.frame_height / self.tiles_y == tile;
        if !uniform {
            match policy {
                TilePolicy::Reject => {
                    return Err(CoreError::NonUniformTiles {
                        frame_width: self.frame_width,
                        frame_height: self.frame_height,
                        tiles_x: self.tiles_x,
                        tiles_y: self.tiles_y,
                    });
                }
                TilePolicy::RoundDown => {
                    log::debug!(
                        "Tuiles non uniformes, arrondi à {tile}px ({}×{} / {}×{})",
                        self.frame_width,
                        self.frame_height,
                        self.tiles_x,
                        self.tiles_y
                    );
                }
            }
        }

        if let Some(atlas) = &self.glyph_atlas
            && atlas.width() < self.glyph_count
        {
            return Err(CoreError::Atlas(format!(
                "{}px de large pour {} glyphes",
                atlas.width(),
                self.glyph_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{ColorFormat, TextureDescriptor};

    #[test]
    fn reference_scenario_tile_size() {
        let p = StylizationParameters::default();
        assert_eq!(p.tile_size(), 24);
        assert_eq!(p.frame_height / p.tiles_y, 24);
        assert_eq!(p.cell_count(), 80 * 45);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let base = StylizationParameters::default();
        for p in [
            StylizationParameters { tiles_x: 0, ..base.clone() },
            StylizationParameters { tiles_y: 0, ..base.clone() },
            StylizationParameters { glyph_count: 0, ..base.clone() },
            StylizationParameters { frame_width: 0, ..base.clone() },
        ] {
            assert!(p.validate(TilePolicy::RoundDown).is_err());
        }
    }

    #[test]
    fn glyph_count_above_limit_is_rejected() {
        let p = StylizationParameters {
            frame_width: 16,
            frame_height: 16,
            tiles_x: 2,
            tiles_y: 2,
            glyph_count: 600_000_000,
            ..StylizationParameters::default()
        };
        assert!(matches!(p.validate(TilePolicy::Reject), Err(CoreError::Config(_))));
        let p = StylizationParameters {
            glyph_count: MAX_GLYPH_COUNT,
            ..p
        };
        assert!(p.validate(TilePolicy::Reject).is_ok());
    }

    #[test]
    fn large_finite_brightness_is_accepted() {
        let p = StylizationParameters {
            brightness: 1000.0,
            ..StylizationParameters::default()
        };
        assert!(p.validate(TilePolicy::Reject).is_ok());
    }

    #[test]
    fn tile_size_of_zero_tiles_does_not_panic() {
        let p = StylizationParameters {
            tiles_x: 0,
            ..StylizationParameters::default()
        };
        assert_eq!(p.tile_size(), 0);
    }

    #[test]
    fn non_square_tiles_are_non_uniform() {
        // 1920/80 = 24 but 1080/30 = 36
        let p = StylizationParameters {
            tiles_y: 30,
            ..StylizationParameters::default()
        };
        assert!(matches!(
            p.validate(TilePolicy::Reject),
            Err(CoreError::NonUniformTiles { .. })
        ));
        assert!(p.validate(TilePolicy::RoundDown).is_ok());
    }

    #[test]
    fn negative_brightness_is_rejected() {
        let p = StylizationParameters {
            brightness: -0.1,
            ..StylizationParameters::default()
        };
        assert!(matches!(p.validate(TilePolicy::Reject), Err(CoreError::Config(_))));
    }

    #[test]
    fn atlas_narrower_than_glyph_count_is_rejected() {
        let atlas = RenderTexture::new(TextureDescriptor::new(4, 8, ColorFormat::Rgba8Unorm));
        let p = StylizationParameters {
            glyph_atlas: Some(Arc::new(atlas)),
            ..StylizationParameters::default()
        };
        assert!(matches!(p.validate(TilePolicy::Reject), Err(CoreError::Atlas(_))));
    }
}
