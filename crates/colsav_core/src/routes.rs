//! Super-block connectivity grids for the game's land and sea "go to"
//! routing. Each 4x4 block of tiles gets one byte whose bits say which of the
//! eight neighbouring blocks can be reached from it.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sav::grid::TileGrid;
use crate::sav::tile::Tile;
use crate::sav::types::{OPEN_OCEAN_REGION, ROUTE_BLOCK_SIZE};

/// Reachability radius between two anchor tiles. Matches the game engine.
pub const MAX_HOPS: usize = 6;

const WINDOW: usize = 2 * MAX_HOPS + 1;

/// Clockwise from north; the discriminant is the bit index in a route byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// One direction from each opposite pair; scanning these from every
    /// block visits each adjacent pair exactly once.
    pub const FORWARD: [Direction; 4] = [Self::E, Self::SE, Self::S, Self::SW];

    pub fn bit(&self) -> u8 {
        1 << (*self as u8)
    }

    pub fn opposite(&self) -> Direction {
        Self::ALL[(*self as usize + 4) % 8]
    }

    /// `(row, col)` step.
    pub fn delta(&self) -> (isize, isize) {
        match *self {
            Self::N => (-1, 0),
            Self::NE => (-1, 1),
            Self::E => (0, 1),
            Self::SE => (1, 1),
            Self::S => (1, 0),
            Self::SW => (1, -1),
            Self::W => (0, -1),
            Self::NW => (-1, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

pub fn decode_route_byte(byte: u8) -> [bool; 8] {
    Direction::ALL.map(|d| byte & d.bit() != 0)
}

pub fn encode_route_byte(links: &[bool; 8]) -> u8 {
    Direction::ALL
        .iter()
        .zip(links)
        .filter(|&(_, &set)| set)
        .fold(0, |acc, (d, _)| acc | d.bit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medium {
    Land,
    Sea,
}

impl Medium {
    pub fn of(tile: &Tile) -> Self {
        if tile.is_water() { Self::Sea } else { Self::Land }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Land => "land",
            Self::Sea => "sea",
        }
    }

    /// Whether `tile` may represent its block for this medium.
    fn qualifies_as_anchor(&self, tile: &Tile) -> bool {
        match *self {
            Self::Land => !tile.is_water(),
            Self::Sea => tile.is_water() && tile.path_region == OPEN_OCEAN_REGION,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTile {
    pub links: [bool; 8],
    /// `(row, col)` of the representative tile, if the block has one.
    pub anchor: Option<(usize, usize)>,
}

impl RouteTile {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            links: decode_route_byte(byte),
            anchor: None,
        }
    }

    pub fn byte(&self) -> u8 {
        encode_route_byte(&self.links)
    }

    pub fn has(&self, dir: Direction) -> bool {
        self.links[dir as usize]
    }

    pub fn link(&mut self, dir: Direction) {
        self.links[dir as usize] = true;
    }
}

/// One route grid, stored row-major in memory and serialized column-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteGrid {
    pub medium: Medium,
    pub rows: usize,
    pub cols: usize,
    pub blocks: Vec<RouteTile>,
}

impl RouteGrid {
    pub fn empty(medium: Medium, rows: usize, cols: usize) -> Self {
        Self {
            medium,
            rows,
            cols,
            blocks: vec![RouteTile::default(); rows * cols],
        }
    }

    /// Decode a table as stored in the save (`col * rows + row`).
    pub fn from_bytes(medium: Medium, rows: usize, cols: usize, bytes: &[u8]) -> Self {
        let mut grid = Self::empty(medium, rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                if let Some(&b) = bytes.get(col * rows + row) {
                    grid.blocks[row * cols + col] = RouteTile::from_byte(b);
                }
            }
        }
        grid
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.rows * self.cols];
        for row in 0..self.rows {
            for col in 0..self.cols {
                out[col * self.rows + row] = self.blocks[row * self.cols + col].byte();
            }
        }
        out
    }

    pub fn block(&self, row: usize, col: usize) -> Option<&RouteTile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.blocks.get(row * self.cols + col)
    }

    pub fn neighbor(&self, row: usize, col: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = dir.delta();
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < self.rows && c < self.cols).then_some((r, c))
    }

    /// True when every link has its mirror on the neighbouring block.
    pub fn is_symmetric(&self) -> bool {
        (0..self.rows).all(|row| {
            (0..self.cols).all(|col| {
                Direction::ALL.iter().all(|&dir| {
                    let here = self.blocks[row * self.cols + col].has(dir);
                    match self.neighbor(row, col, dir) {
                        Some((r, c)) => here == self.blocks[r * self.cols + c].has(dir.opposite()),
                        None => !here,
                    }
                })
            })
        })
    }
}

/// Synthesizes route grids from the current tile grid. Holds no state
/// between calls, so rebuilding is always safe.
pub struct RouteGraphBuilder<'a> {
    grid: &'a TileGrid,
}

impl<'a> RouteGraphBuilder<'a> {
    pub fn new(grid: &'a TileGrid) -> Self {
        Self { grid }
    }

    pub fn build(&self, medium: Medium) -> RouteGrid {
        let rows = self.grid.height().div_ceil(ROUTE_BLOCK_SIZE);
        let cols = self.grid.width().div_ceil(ROUTE_BLOCK_SIZE);
        let mut routes = RouteGrid::empty(medium, rows, cols);

        for row in 0..rows {
            for col in 0..cols {
                routes.blocks[row * cols + col].anchor = self.anchor(medium, row, col);
            }
        }

        for row in 0..rows {
            for col in 0..cols {
                let Some(from) = routes.blocks[row * cols + col].anchor else {
                    continue;
                };
                for dir in Direction::FORWARD {
                    let Some((nr, nc)) = routes.neighbor(row, col, dir) else {
                        continue;
                    };
                    let Some(to) = routes.blocks[nr * cols + nc].anchor else {
                        continue;
                    };
                    if self.reachable(medium, from, to) {
                        routes.blocks[row * cols + col].link(dir);
                        routes.blocks[nr * cols + nc].link(dir.opposite());
                    }
                }
            }
        }

        routes
    }

    /// First qualifying tile in the block's inner 2x2, row-major.
    fn anchor(&self, medium: Medium, block_row: usize, block_col: usize) -> Option<(usize, usize)> {
        let top = block_row * ROUTE_BLOCK_SIZE;
        let left = block_col * ROUTE_BLOCK_SIZE;
        for row in top + 1..=top + 2 {
            for col in left + 1..=left + 2 {
                if let Some(tile) = self.grid.get(row, col)
                    && medium.qualifies_as_anchor(tile)
                {
                    return Some((row, col));
                }
            }
        }
        None
    }

    /// Breadth-first search from `from` over 8-connected tiles of the same
    /// medium, limited to [`MAX_HOPS`] steps.
    fn reachable(&self, medium: Medium, from: (usize, usize), to: (usize, usize)) -> bool {
        if from == to {
            return true;
        }
        if from.0.abs_diff(to.0) > MAX_HOPS || from.1.abs_diff(to.1) > MAX_HOPS {
            return false;
        }

        // Visited set over the (2*MAX_HOPS+1)^2 window centred on `from`;
        // nothing outside it is reachable within the hop limit.
        let mut visited = [false; WINDOW * WINDOW];
        let slot = |r: usize, c: usize| {
            let wr = r + MAX_HOPS - from.0;
            let wc = c + MAX_HOPS - from.1;
            wr * WINDOW + wc
        };

        let mut queue = VecDeque::new();
        visited[slot(from.0, from.1)] = true;
        queue.push_back((from, 0usize));

        while let Some(((row, col), hops)) = queue.pop_front() {
            if hops == MAX_HOPS {
                continue;
            }
            for dir in Direction::ALL {
                let (dr, dc) = dir.delta();
                let Some(tile) = self.grid.get_offset(row, col, dr, dc) else {
                    continue;
                };
                if Medium::of(tile) != medium {
                    continue;
                }
                let next = (tile.row, tile.col);
                if next == to {
                    return true;
                }
                let idx = slot(next.0, next.1);
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((next, hops + 1));
                }
            }
        }

        false
    }
}
