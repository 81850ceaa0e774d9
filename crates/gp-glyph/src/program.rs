use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gp_core::params::{DEFAULT_MONO_TINT, MAX_GLYPH_COUNT};
use gp_core::program::{GlyphProgram, Uniforms, slots};
use gp_core::texture::RenderTexture;
use rayon::prelude::*;

use crate::atlas::{DEFAULT_CELL, GlyphAtlas};
use crate::block::{glyph_index, reduce_blocks};
use crate::grid::TileGrid;

/// Uniform inputs of [`AsciiProgram`], decoded from the bound slots.
#[derive(Clone, Debug, PartialEq)]
pub struct AsciiUniforms {
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub glyph_count: u32,
    pub monochrome: bool,
    pub brightness: f32,
    pub mono_tint: [f32; 3],
    pub atlas: Option<Arc<RenderTexture>>,
}

impl AsciiUniforms {
    /// Decode the slots written by the parameter binder.
    ///
    /// Returns `None` if a required slot is unbound or has the wrong type.
    /// `_CharTex` and `_monoTint` are optional. `_tileSize` is not read: the
    /// tile side is derived from `_resolutionX / _tilesX` so it cannot
    /// disagree with the grid. The glyph count is capped at [`MAX_GLYPH_COUNT`].
    #[must_use]
    pub fn read(u: &Uniforms) -> Option<Self> {
        let count = |name: &str| u.get_float(name).map(|v| v.max(1.0) as u32);
        Some(Self {
            tiles_x: count(slots::TILES_X)?,
            tiles_y: count(slots::TILES_Y)?,
            resolution_x: count(slots::RESOLUTION_X)?,
            resolution_y: count(slots::RESOLUTION_Y)?,
            glyph_count: count(slots::CHAR_COUNT)?.min(MAX_GLYPH_COUNT),
            monochrome: u.get_int(slots::MONOCHROMATIC)? != 0,
            brightness: u.get_float(slots::BRIGHTNESS)?.max(0.0),
            mono_tint: u
                .get_vector(slots::MONO_TINT)
                .map_or(DEFAULT_MONO_TINT, |v| [v[0], v[1], v[2]]),
            atlas: u.get_texture(slots::CHAR_TEX).flatten().cloned(),
        })
    }
}

/// Programme ASCII de référence, exécuté sur CPU.
///
/// Each tile of the source is reduced to its mean colour; the mean's
/// luminance picks one of `glyph_count` atlas cells; the cell is stretched
/// over the tile and tinted by the mean colour (or the fixed tint in
/// monochrome mode), then scaled by brightness. Alpha is written as 1.
///
/// # Example
/// ```
/// use gp_core::program::{GlyphProgram, Uniforms};
/// use gp_core::texture::{ColorFormat, RenderTexture, TextureDescriptor};
/// use gp_glyph::program::AsciiProgram;
///
/// let mut u = Uniforms::default();
/// u.set_float("_tilesX", 2.0);
/// u.set_float("_tilesY", 2.0);
/// u.set_float("_resolutionX", 16.0);
/// u.set_float("_resolutionY", 16.0);
/// u.set_float("_charCount", 4.0);
/// u.set_int("_monochromatic", 0);
/// u.set_float("_brightness", 1.0);
///
/// let desc = TextureDescriptor::new(16, 16, ColorFormat::DefaultHdr);
/// let mut src = RenderTexture::new(desc);
/// src.fill([1.0, 1.0, 1.0, 1.0]);
/// let mut dst = RenderTexture::new(desc);
/// AsciiProgram::new().apply(&u, &src, &mut dst);
/// // White blocks pick the solid glyph.
/// assert_eq!(dst.texel(5, 5), [1.0, 1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Default)]
pub struct AsciiProgram {
    warned_unbound: AtomicBool,
    warned_atlas: AtomicBool,
    warned_truncated: AtomicBool,
}

impl AsciiProgram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn atlas_for(&self, u: &AsciiUniforms) -> GlyphAtlas {
        if let Some(tex) = &u.atlas {
            match GlyphAtlas::from_texture(Arc::clone(tex), u.glyph_count) {
                Ok(atlas) => {
                    if atlas.is_truncated() && !self.warned_truncated.swap(true, Ordering::Relaxed) {
                        log::warn!(
                            "Largeur d'atlas {} non divisible par {}, cellules tronquées",
                            tex.width(),
                            u.glyph_count
                        );
                    }
                    return atlas;
                }
                Err(e) => {
                    if !self.warned_atlas.swap(true, Ordering::Relaxed) {
                        log::warn!("Atlas inutilisable ({e}), rampe intégrée utilisée");
                    }
                }
            }
        }
        GlyphAtlas::procedural(u.glyph_count, DEFAULT_CELL)
    }
}

impl GlyphProgram for AsciiProgram {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn apply(&self, uniforms: &Uniforms, source: &RenderTexture, target: &mut RenderTexture) {
        if source.width() != target.width() || source.height() != target.height() {
            log::error!(
                "ascii: dimensions source {}×{} ≠ cible {}×{}",
                source.width(),
                source.height(),
                target.width(),
                target.height()
            );
            return;
        }
        if source.width() == 0 || source.height() == 0 {
            return;
        }
        let Some(u) = AsciiUniforms::read(uniforms) else {
            if !self.warned_unbound.swap(true, Ordering::Relaxed) {
                log::warn!("ascii: uniformes manquants, copie sans transformation");
            }
            if let Err(e) = target.copy_from(source) {
                log::error!("ascii: copie impossible : {e}");
            }
            return;
        };

        let atlas = self.atlas_for(&u);
        let grid = TileGrid::new(u.tiles_x, u.tiles_y, u.resolution_x, u.resolution_y);
        let cols = grid.columns(source.width());
        let rows = grid.rows(source.height());
        let blocks = reduce_blocks(source, &grid, &cols, &rows);
        let glyphs: Vec<u32> = blocks
            .iter()
            .map(|b| glyph_index(b.luminance, u.glyph_count))
            .collect();

        let tiles_x = grid.tiles_x() as usize;
        let tile_size = grid.tile_size();
        let stride = source.width() as usize * 4;
        let format = target.format();
        let alpha = format.encode(1.0);

        target
            .data
            .par_chunks_exact_mut(stride)
            .zip(rows.par_iter())
            .for_each(|(row, rc)| {
                let base = rc.tile as usize * tiles_x;
                for (px, cc) in row.chunks_exact_mut(4).zip(&cols) {
                    let tile = base + cc.tile as usize;
                    let cov = atlas.coverage(glyphs[tile], cc.local, rc.local, tile_size);
                    let tint = if u.monochrome {
                        u.mono_tint
                    } else {
                        blocks[tile].mean
                    };
                    let gain = cov * u.brightness;
                    px[0] = format.encode(tint[0] * gain);
                    px[1] = format.encode(tint[1] * gain);
                    px[2] = format.encode(tint[2] * gain);
                    px[3] = alpha;
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use gp_core::texture::{ColorFormat, TextureDescriptor};

    use super::*;

    fn uniforms(tiles: u32, res: u32, mono: bool) -> Uniforms {
        let mut u = Uniforms::default();
        u.set_float(slots::TILES_X, tiles as f32);
        u.set_float(slots::TILES_Y, tiles as f32);
        u.set_float(slots::RESOLUTION_X, res as f32);
        u.set_float(slots::RESOLUTION_Y, res as f32);
        u.set_float(slots::TILE_SIZE, (res / tiles) as f32);
        u.set_float(slots::CHAR_COUNT, 8.0);
        u.set_int(slots::MONOCHROMATIC, i32::from(mono));
        u.set_float(slots::BRIGHTNESS, 1.0);
        u
    }

    fn solid(size: u32, rgb: [f32; 3]) -> RenderTexture {
        let mut tex = RenderTexture::new(TextureDescriptor::new(size, size, ColorFormat::DefaultHdr));
        tex.fill([rgb[0], rgb[1], rgb[2], 1.0]);
        tex
    }

    fn run(u: &Uniforms, src: &RenderTexture) -> RenderTexture {
        let mut dst = RenderTexture::new(src.descriptor);
        AsciiProgram::new().apply(u, src, &mut dst);
        dst
    }

    #[test]
    fn black_frame_stays_black() {
        let out = run(&uniforms(4, 32, false), &solid(32, [0.0; 3]));
        assert!(out.data.chunks_exact(4).all(|p| p[..3] == [0.0, 0.0, 0.0] && p[3] == 1.0));
    }

    #[test]
    fn colour_mode_tints_with_block_mean() {
        let out = run(&uniforms(4, 32, false), &solid(32, [1.0, 1.0, 1.0]));
        assert_eq!(out.texel(9, 9), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn every_tile_repeats_the_same_glyph_on_uniform_input() {
        let out = run(&uniforms(4, 32, false), &solid(32, [0.5, 0.5, 0.5]));
        for ty in 0..4 {
            for tx in 0..4 {
                for ly in 0..8 {
                    for lx in 0..8 {
                        assert_eq!(out.texel(tx * 8 + lx, ty * 8 + ly), out.texel(lx, ly));
                    }
                }
            }
        }
    }

    #[test]
    fn monochrome_ignores_hue_at_equal_luminance() {
        // Pure red and pure green scaled to the same BT.709 luminance (0.2 → glyph 1).
        let red = solid(16, [0.2 / 0.2126, 0.0, 0.0]);
        let green = solid(16, [0.0, 0.2 / 0.7152, 0.0]);
        let u = uniforms(2, 16, true);
        assert_eq!(run(&u, &red), run(&u, &green));

        let u = uniforms(2, 16, false);
        assert_ne!(run(&u, &red), run(&u, &green));
    }

    #[test]
    fn monochrome_uses_bound_tint() {
        let mut u = uniforms(2, 16, true);
        u.set_vector(slots::MONO_TINT, [1.0, 0.0, 0.0, 1.0]);
        let out = run(&u, &solid(16, [1.0, 1.0, 1.0]));
        assert_eq!(out.texel(3, 3), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn brightness_scales_output() {
        let mut u = uniforms(2, 16, false);
        u.set_float(slots::BRIGHTNESS, 0.5);
        let out = run(&u, &solid(16, [1.0, 1.0, 1.0]));
        assert_eq!(out.texel(0, 0), [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn huge_glyph_count_does_not_overflow() {
        let mut u = uniforms(2, 16, false);
        u.set_float(slots::CHAR_COUNT, 6e8);
        let out = run(&u, &solid(16, [1.0, 1.0, 1.0]));
        assert_eq!(out.texel(0, 0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(AsciiUniforms::read(&u).unwrap().glyph_count, MAX_GLYPH_COUNT);
    }

    #[test]
    fn bound_tile_size_is_advisory() {
        let mut src = RenderTexture::new(TextureDescriptor::new(16, 16, ColorFormat::DefaultHdr));
        for y in 0..16 {
            for x in 0..16 {
                src.set_texel(x, y, [x as f32 / 15.0, 0.5, y as f32 / 15.0, 1.0]);
            }
        }
        let u = uniforms(2, 16, false);
        let mut odd = u.clone();
        odd.set_float(slots::TILE_SIZE, 3.0);
        assert_eq!(run(&u, &src), run(&odd, &src));
    }

    #[test]
    fn truncated_atlas_is_still_sampled() {
        let mut atlas = RenderTexture::new(TextureDescriptor::new(17, 2, ColorFormat::Rgba8Unorm));
        atlas.fill([1.0, 1.0, 1.0, 1.0]);
        let mut u = uniforms(2, 16, false);
        u.set_texture(slots::CHAR_TEX, Some(Arc::new(atlas)));
        let program = AsciiProgram::new();
        let src = solid(16, [1.0, 1.0, 1.0]);
        let mut dst = RenderTexture::new(src.descriptor);
        program.apply(&u, &src, &mut dst);
        program.apply(&u, &src, &mut dst);
        assert!(program.warned_truncated.load(Ordering::Relaxed));
        assert_eq!(dst.texel(4, 4), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn unbound_uniforms_copy_source() {
        let src = solid(8, [0.3, 0.6, 0.9]);
        let out = run(&Uniforms::default(), &src);
        assert_eq!(out, src);
    }

    #[test]
    fn output_is_deterministic() {
        let mut src = RenderTexture::new(TextureDescriptor::new(48, 48, ColorFormat::DefaultHdr));
        for y in 0..48 {
            for x in 0..48 {
                src.set_texel(x, y, [x as f32 / 47.0, y as f32 / 47.0, 0.5, 1.0]);
            }
        }
        let u = uniforms(6, 48, false);
        assert_eq!(run(&u, &src), run(&u, &src));
    }
}
