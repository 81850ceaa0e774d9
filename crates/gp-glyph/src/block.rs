use gp_core::color::luminance;
use gp_core::texture::RenderTexture;
use rayon::prelude::*;

use crate::grid::{TileCoord, TileGrid, spans};

/// Couleur moyenne et luminance d'une tuile de la source.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockStats {
    /// Mean RGB of every source pixel mapped to the tile.
    pub mean: [f32; 3],
    /// BT.709 luminance of `mean`, clamped to [0, 1].
    pub luminance: f32,
}

/// Reduce `source` to one [`BlockStats`] per tile, row-major.
///
/// `cols` and `rows` are the grid's axis maps for the source extent. Tiles
/// that no source pixel maps to come out black. Each tile row is summed by
/// one task, in pixel order, so the result does not depend on scheduling.
#[must_use]
pub fn reduce_blocks(
    source: &RenderTexture,
    grid: &TileGrid,
    cols: &[TileCoord],
    rows: &[TileCoord],
) -> Vec<BlockStats> {
    let tiles_x = grid.tiles_x() as usize;
    let row_spans = spans(rows, grid.tiles_y());

    row_spans
        .par_iter()
        .map(|span| {
            let mut sums = vec![[0.0f64; 3]; tiles_x];
            let mut counts = vec![0u32; tiles_x];
            for y in span.clone() {
                for (x, col) in cols.iter().enumerate() {
                    let [r, g, b, _] = source.texel(x as u32, y as u32);
                    let acc = &mut sums[col.tile as usize];
                    acc[0] += f64::from(r);
                    acc[1] += f64::from(g);
                    acc[2] += f64::from(b);
                    counts[col.tile as usize] += 1;
                }
            }
            sums.iter()
                .zip(&counts)
                .map(|(sum, &n)| {
                    if n == 0 {
                        return BlockStats::default();
                    }
                    let n = f64::from(n);
                    let mean = sum.map(|c| (c / n) as f32);
                    BlockStats {
                        mean,
                        luminance: luminance(mean[0], mean[1], mean[2]).clamp(0.0, 1.0),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .concat()
}

/// Bucket a luminance into one of `glyph_count` glyphs.
///
/// # Example
/// ```
/// use gp_glyph::block::glyph_index;
/// assert_eq!(glyph_index(0.0, 8), 0);
/// assert_eq!(glyph_index(0.5, 8), 4);
/// assert_eq!(glyph_index(1.0, 8), 7);
/// ```
#[inline(always)]
#[must_use]
pub fn glyph_index(lum: f32, glyph_count: u32) -> u32 {
    let count = glyph_count.max(1);
    ((lum.clamp(0.0, 1.0) * count as f32) as u32).min(count - 1)
}
