use std::path::Path;
use std::sync::Arc;

use gp_core::error::CoreError;
use gp_core::frame::FrameBuffer;
use gp_core::params::MAX_GLYPH_COUNT;
use gp_core::texture::{ColorFormat, RenderTexture, TextureDescriptor};

use crate::dither::bayer_covers;

/// Side of a cell in the built-in atlas, in texels.
pub const DEFAULT_CELL: u32 = 8;

/// Largest cell side accepted by [`GlyphAtlas::procedural`].
pub const MAX_CELL: u32 = 64;

/// Atlas de glyphes : une bande horizontale de `glyph_count` cellules.
///
/// Glyphs are ordered from the emptiest (index 0, darkest blocks) to the
/// densest. Coverage is the brightest channel of a texel times its alpha,
/// so white-on-black and coloured atlases both work.
///
/// # Example
/// ```
/// use gp_glyph::atlas::GlyphAtlas;
/// let atlas = GlyphAtlas::procedural(8, 8);
/// assert_eq!(atlas.cell_width(), 8);
/// assert_eq!(atlas.coverage(0, 3, 3, 24), 0.0);
/// assert_eq!(atlas.coverage(7, 3, 3, 24), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct GlyphAtlas {
    texture: Arc<RenderTexture>,
    glyph_count: u32,
}

impl GlyphAtlas {
    /// Build the built-in ramp: glyph `i` is a Bayer pattern of density `i / (n - 1)`.
    ///
    /// `glyph_count` is clamped to `1..=MAX_GLYPH_COUNT` and `cell` to
    /// `1..=MAX_CELL`.
    #[must_use]
    pub fn procedural(glyph_count: u32, cell: u32) -> Self {
        let glyph_count = glyph_count.clamp(1, MAX_GLYPH_COUNT);
        let cell = cell.clamp(1, MAX_CELL);
        // Both factors are bounded above, the product fits.
        let width = glyph_count.saturating_mul(cell);
        let mut tex = RenderTexture::new(TextureDescriptor::new(width, cell, ColorFormat::Rgba8Unorm));
        let steps = (glyph_count - 1).max(1) as f32;
        for glyph in 0..glyph_count {
            let density = if glyph_count == 1 {
                1.0
            } else {
                glyph as f32 / steps
            };
            for y in 0..cell {
                for x in 0..cell {
                    let v = if bayer_covers(density, x, y) { 1.0 } else { 0.0 };
                    tex.set_texel(glyph * cell + x, y, [v, v, v, 1.0]);
                }
            }
        }
        Self {
            texture: Arc::new(tex),
            glyph_count,
        }
    }

    /// Wrap an existing texture.
    ///
    /// # Errors
    /// Returns [`CoreError::Atlas`] if `glyph_count` is zero or the texture is
    /// narrower than one texel per glyph.
    pub fn from_texture(texture: Arc<RenderTexture>, glyph_count: u32) -> Result<Self, CoreError> {
        if glyph_count == 0 {
            return Err(CoreError::Atlas("glyph_count = 0".into()));
        }
        if texture.width() < glyph_count || texture.height() == 0 {
            return Err(CoreError::Atlas(format!(
                "texture {}×{} trop petite pour {glyph_count} glyphes",
                texture.width(),
                texture.height()
            )));
        }
        Ok(Self {
            texture,
            glyph_count,
        })
    }

    /// Charge un atlas depuis une image (PNG, JPEG, BMP, GIF).
    ///
    /// # Errors
    /// [`CoreError::FileNotFound`] if the path does not exist,
    /// [`CoreError::Atlas`] if the image cannot be decoded or is too small.
    ///
    /// # Example
    /// ```no_run
    /// use gp_glyph::atlas::GlyphAtlas;
    /// use std::path::Path;
    /// let atlas = GlyphAtlas::from_image(Path::new("glyphs.png"), 8).unwrap();
    /// ```
    pub fn from_image(path: &Path, glyph_count: u32) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let img = image::open(path)
            .map_err(|e| CoreError::Atlas(format!("{} : {e}", path.display())))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let frame = FrameBuffer {
            data: rgba.into_raw(),
            width,
            height,
        };
        log::info!(
            "Atlas chargé : {} ({width}×{height}, {glyph_count} glyphes)",
            path.display()
        );
        let atlas = Self::from_texture(
            Arc::new(RenderTexture::from_frame(&frame, ColorFormat::Rgba8Unorm)),
            glyph_count,
        )?;
        if atlas.is_truncated() {
            log::warn!("Largeur d'atlas {width} non divisible par {glyph_count}, cellules tronquées");
        }
        Ok(atlas)
    }

    /// `true` if the atlas width is not a multiple of the glyph count (the
    /// rightmost texels belong to no cell).
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.texture.width() % self.glyph_count != 0
    }

    #[must_use]
    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    /// Width of one glyph cell in texels.
    #[must_use]
    pub fn cell_width(&self) -> u32 {
        (self.texture.width() / self.glyph_count).max(1)
    }

    #[must_use]
    pub fn texture(&self) -> &Arc<RenderTexture> {
        &self.texture
    }

    /// Coverage of `glyph` at tile-local pixel (`lx`, `ly`) of a `tile_size` tile.
    ///
    /// Nearest-texel lookup; out-of-range glyph indices clamp to the last glyph.
    #[inline(always)]
    #[must_use]
    pub fn coverage(&self, glyph: u32, lx: u32, ly: u32, tile_size: u32) -> f32 {
        let tile = u64::from(tile_size.max(1));
        let glyph = glyph.min(self.glyph_count - 1);
        let cell_w = self.cell_width();
        let ax = glyph * cell_w + (u64::from(lx) * u64::from(cell_w) / tile) as u32;
        let ay = (u64::from(ly) * u64::from(self.texture.height()) / tile) as u32;
        let [r, g, b, a] = self.texture.texel(
            ax.min(self.texture.width() - 1),
            ay.min(self.texture.height() - 1),
        );
        (r.max(g).max(b) * a).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean_coverage(atlas: &GlyphAtlas, glyph: u32) -> f32 {
        let cell = atlas.cell_width();
        let mut sum = 0.0;
        for y in 0..cell {
            for x in 0..cell {
                sum += atlas.coverage(glyph, x, y, cell);
            }
        }
        sum / (cell * cell) as f32
    }

    #[test]
    fn procedural_ramp_grows_with_index() {
        let atlas = GlyphAtlas::procedural(8, DEFAULT_CELL);
        let mut prev = -1.0;
        for g in 0..8 {
            let c = mean_coverage(&atlas, g);
            assert!(c > prev, "glyphe {g} pas plus dense que le précédent");
            prev = c;
        }
        assert_eq!(mean_coverage(&atlas, 0), 0.0);
        assert_eq!(mean_coverage(&atlas, 7), 1.0);
    }

    #[test]
    fn glyph_index_clamps_to_last() {
        let atlas = GlyphAtlas::procedural(4, 4);
        assert_eq!(atlas.coverage(99, 0, 0, 4), atlas.coverage(3, 0, 0, 4));
    }

    #[test]
    fn huge_glyph_count_is_clamped_not_overflowed() {
        let atlas = GlyphAtlas::procedural(600_000_000, DEFAULT_CELL);
        assert_eq!(atlas.glyph_count(), MAX_GLYPH_COUNT);
        assert_eq!(atlas.texture().width(), MAX_GLYPH_COUNT * DEFAULT_CELL);
        let atlas = GlyphAtlas::procedural(4, u32::MAX);
        assert_eq!(atlas.cell_width(), MAX_CELL);
    }

    #[test]
    fn uneven_strip_is_flagged() {
        let tex = RenderTexture::new(TextureDescriptor::new(10, 4, ColorFormat::Rgba8Unorm));
        assert!(GlyphAtlas::from_texture(Arc::new(tex), 4).unwrap().is_truncated());
        assert!(!GlyphAtlas::procedural(4, 4).is_truncated());
    }

    #[test]
    fn texture_too_narrow_is_rejected() {
        let tex = RenderTexture::new(TextureDescriptor::new(3, 8, ColorFormat::Rgba8Unorm));
        assert!(GlyphAtlas::from_texture(Arc::new(tex), 8).is_err());
    }

    #[test]
    fn missing_image_reports_path() {
        let err = GlyphAtlas::from_image(Path::new("/nonexistent/glyphs.png"), 8).unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound { .. }));
    }

    #[test]
    fn loads_png_strip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");
        let mut img = image::RgbaImage::new(8, 4);
        // second glyph fully white, first left black
        for y in 0..4 {
            for x in 4..8 {
                img.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
            }
        }
        img.save(&path).unwrap();

        let atlas = GlyphAtlas::from_image(&path, 2).unwrap();
        assert_eq!(atlas.cell_width(), 4);
        assert_eq!(atlas.coverage(0, 1, 1, 16), 0.0);
        assert_eq!(atlas.coverage(1, 1, 1, 16), 1.0);
    }
}
