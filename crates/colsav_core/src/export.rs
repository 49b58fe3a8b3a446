//! The map-only `.MP` format the game's scenario loader reads.

use crate::sav::grid::TileGrid;
use crate::sav::types::TERRAIN_OCEAN;

pub const MP_HEADER_LEN: usize = 6;
const MP_LAYER_COUNT: u16 = 4;

/// Encode `grid` as an `.MP` file: a 6-byte header followed by the terrain,
/// blank and land-flag planes. The border is forced to ocean.
pub fn encode_mp(grid: &TileGrid) -> Vec<u8> {
    let width = grid.width();
    let height = grid.height();
    let map_size = width * height;

    let mut out = Vec::with_capacity(MP_HEADER_LEN + 3 * map_size);
    out.extend_from_slice(&(width as u16).to_le_bytes());
    out.extend_from_slice(&(height as u16).to_le_bytes());
    out.extend_from_slice(&MP_LAYER_COUNT.to_le_bytes());
    out.resize(MP_HEADER_LEN + 3 * map_size, 0);

    for tile in grid.iter() {
        let idx = grid.index(tile.row, tile.col);
        let (terrain, flag) = if grid.is_border(tile.row, tile.col) {
            (TERRAIN_OCEAN, 0)
        } else {
            (tile.terrain_byte(), 1)
        };
        out[MP_HEADER_LEN + idx] = terrain;
        out[MP_HEADER_LEN + 2 * map_size + idx] = flag;
    }

    out
}
