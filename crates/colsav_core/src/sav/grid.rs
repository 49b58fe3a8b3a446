use crate::error::EditError;

use super::tile::Tile;

/// Row-major tile storage for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// `tiles` must be row-major and hold exactly `width * height` entries.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    /// Signed lookup for neighbour scans; anything off the map is `None`.
    pub fn get_offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<&Tile> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        self.get(r, c)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Tile> {
        if !self.contains(row, col) {
            return None;
        }
        self.tiles.get(self.index(row, col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Tile> {
        if !self.contains(row, col) {
            return None;
        }
        let idx = self.index(row, col);
        self.tiles.get_mut(idx)
    }

    pub fn tile(&self, row: usize, col: usize) -> Result<&Tile, EditError> {
        let (width, height) = (self.width, self.height);
        self.get(row, col).ok_or(EditError::OutOfBounds {
            row,
            col,
            width,
            height,
        })
    }

    pub fn tile_mut(&mut self, row: usize, col: usize) -> Result<&mut Tile, EditError> {
        let (width, height) = (self.width, self.height);
        self.get_mut(row, col).ok_or(EditError::OutOfBounds {
            row,
            col,
            width,
            height,
        })
    }

    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.height || col + 1 == self.width
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Tiles not on the map border, row-major.
    pub fn interior_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        let (width, height) = (self.width, self.height);
        self.tiles.iter_mut().filter(move |t| {
            t.row > 0 && t.col > 0 && t.row + 1 < height && t.col + 1 < width
        })
    }

    pub fn any_modified(&self) -> bool {
        self.tiles.iter().any(|t| t.modified)
    }
}
