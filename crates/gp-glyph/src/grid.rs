use std::ops::Range;

use gp_core::params::StylizationParameters;

/// Position of a pixel inside the tile grid along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCoord {
    /// Tile index along the axis.
    pub tile: u32,
    /// Pixel offset inside the tile, in `[0, tile_size)`.
    pub local: u32,
}

/// Grille de tuiles carrées posée sur la résolution cible.
///
/// Pixels of an image of any size are first scaled into target-resolution
/// space, then split into `tile_size` squares. Pixels past the last whole
/// tile (non-divisible sizes) join the last row/column.
///
/// # Example
/// ```
/// use gp_glyph::grid::TileGrid;
/// let grid = TileGrid::new(80, 45, 1920, 1080);
/// assert_eq!(grid.tile_size(), 24);
/// assert_eq!(grid.cell_count(), 3600);
/// let cols = grid.columns(1920);
/// assert_eq!(cols[25].tile, 1);
/// assert_eq!(cols[25].local, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles_x: u32,
    tiles_y: u32,
    tile_size: u32,
    frame_width: u32,
    frame_height: u32,
}

impl TileGrid {
    /// Zero inputs are raised to 1 so the grid is always usable.
    #[must_use]
    pub fn new(tiles_x: u32, tiles_y: u32, frame_width: u32, frame_height: u32) -> Self {
        let tiles_x = tiles_x.max(1);
        let tiles_y = tiles_y.max(1);
        let frame_width = frame_width.max(1);
        let frame_height = frame_height.max(1);
        Self {
            tiles_x,
            tiles_y,
            tile_size: (frame_width / tiles_x).max(1),
            frame_width,
            frame_height,
        }
    }

    #[must_use]
    pub fn from_params(params: &StylizationParameters) -> Self {
        Self::new(
            params.tiles_x,
            params.tiles_y,
            params.frame_width,
            params.frame_height,
        )
    }

    #[must_use]
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    #[must_use]
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    #[must_use]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles_x as usize * self.tiles_y as usize
    }

    /// Tile coordinate of each column of an image `width` pixels wide.
    #[must_use]
    pub fn columns(&self, width: u32) -> Vec<TileCoord> {
        map_axis(width, self.frame_width, self.tiles_x, self.tile_size)
    }

    /// Tile coordinate of each row of an image `height` pixels tall.
    #[must_use]
    pub fn rows(&self, height: u32) -> Vec<TileCoord> {
        map_axis(height, self.frame_height, self.tiles_y, self.tile_size)
    }
}

fn map_axis(extent: u32, frame: u32, tiles: u32, tile_size: u32) -> Vec<TileCoord> {
    let extent64 = u64::from(extent.max(1));
    (0..extent)
        .map(|i| {
            let p = (u64::from(i) * u64::from(frame) / extent64) as u32;
            let tile = (p / tile_size).min(tiles - 1);
            let local = (p - tile * tile_size).min(tile_size - 1);
            TileCoord { tile, local }
        })
        .collect()
}

/// Range of pixel indices covered by each tile along an axis.
///
/// `coords` must come from [`TileGrid::columns`] or [`TileGrid::rows`]
/// (non-decreasing tile indices). Tiles no pixel maps to get an empty range.
///
/// # Example
/// ```
/// use gp_glyph::grid::{spans, TileGrid};
/// let grid = TileGrid::new(2, 2, 4, 4);
/// let s = spans(&grid.rows(4), 2);
/// assert_eq!(s, vec![0..2, 2..4]);
/// ```
#[must_use]
pub fn spans(coords: &[TileCoord], tiles: u32) -> Vec<Range<usize>> {
    let mut out = vec![0..0; tiles as usize];
    let mut start = 0;
    while start < coords.len() {
        let tile = coords[start].tile;
        let mut end = start + 1;
        while end < coords.len() && coords[end].tile == tile {
            end += 1;
        }
        out[tile as usize] = start..end;
        start = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_grid_maps_pixels_one_to_one() {
        let grid = TileGrid::new(80, 45, 1920, 1080);
        let rows = grid.rows(1080);
        assert_eq!(rows[0], TileCoord { tile: 0, local: 0 });
        assert_eq!(rows[23], TileCoord { tile: 0, local: 23 });
        assert_eq!(rows[24], TileCoord { tile: 1, local: 0 });
        assert_eq!(rows[1079], TileCoord { tile: 44, local: 23 });
        for s in spans(&rows, 45) {
            assert_eq!(s.len(), 24);
        }
    }

    #[test]
    fn round_down_folds_remainder_into_last_tile() {
        // 100 / 7 = 14, 7 * 14 = 98: columns 98 and 99 join tile 6
        let grid = TileGrid::new(7, 7, 100, 100);
        let cols = grid.columns(100);
        assert_eq!(cols[98], TileCoord { tile: 6, local: 13 });
        assert_eq!(cols[99], TileCoord { tile: 6, local: 13 });
        let s = spans(&cols, 7);
        assert_eq!(s[6], 84..100);
    }

    #[test]
    fn smaller_image_is_scaled_into_target_space() {
        // 960 px image against a 1920 px target: each column spans two target pixels
        let grid = TileGrid::new(80, 45, 1920, 1080);
        let cols = grid.columns(960);
        assert_eq!(cols[12], TileCoord { tile: 1, local: 0 });
        assert_eq!(spans(&cols, 80)[0], 0..12);
    }

    #[test]
    fn image_smaller_than_grid_leaves_empty_tiles() {
        let grid = TileGrid::new(4, 4, 8, 8);
        let s = spans(&grid.columns(2), 4);
        assert_eq!(s[0], 0..1);
        assert!(s[1].is_empty());
        assert_eq!(s[2], 1..2);
        assert!(s[3].is_empty());
    }
}
