//! Consistency check for the path-region layer.
//!
//! The game expects region 0 exactly on the map border and one label per
//! contiguous same-medium area. Label 15 is shared by every area that did
//! not get a code of its own.

use std::fmt;

use serde::Serialize;

use crate::routes::Medium;
use crate::sav::grid::TileGrid;
use crate::sav::types::OVERFLOW_REGION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionIssue {
    /// Region 0 off the border, or a non-zero region on it.
    BorderMismatch { row: usize, col: usize, path_region: u8 },
    /// Two touching tiles of the same medium carry different labels.
    LabelMismatch {
        first: (usize, usize),
        second: (usize, usize),
        first_region: u8,
        second_region: u8,
    },
    /// Two separate areas share one label.
    DisjointRegion {
        medium: Medium,
        path_region: u8,
        first: (usize, usize),
        second: (usize, usize),
    },
}

impl fmt::Display for RegionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BorderMismatch {
                row,
                col,
                path_region,
            } => {
                if *path_region == 0 {
                    write!(f, "interior tile ({row}, {col}) has region 0")
                } else {
                    write!(f, "border tile ({row}, {col}) has region {path_region}")
                }
            }
            Self::LabelMismatch {
                first,
                second,
                first_region,
                second_region,
            } => write!(
                f,
                "adjacent tiles {first:?} and {second:?} have regions {first_region} and {second_region}"
            ),
            Self::DisjointRegion {
                medium,
                path_region,
                first,
                second,
            } => write!(
                f,
                "{} region {path_region} is split: {first:?} and {second:?} are not connected",
                medium.as_str()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub ok: bool,
    /// Distinct connected areas found; zero when the border check failed.
    pub areas: usize,
    pub issue: Option<RegionIssue>,
}

impl RegionReport {
    fn pass(areas: usize) -> Self {
        Self {
            ok: true,
            areas,
            issue: None,
        }
    }

    fn fail(areas: usize, issue: RegionIssue) -> Self {
        Self {
            ok: false,
            areas,
            issue: Some(issue),
        }
    }
}

impl fmt::Display for RegionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            None => write!(f, "regions ok ({} areas)", self.areas),
            Some(issue) => write!(f, "region check failed: {issue}"),
        }
    }
}

/// Disjoint-set forest keyed by dense tile index.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[idx] != root {
            let next = self.parent[idx];
            self.parent[idx] = root;
            idx = next;
        }
        root
    }

    /// The lower index always becomes the root, so results do not depend on
    /// scan order.
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

// Neighbours already visited in a row-major scan: W, NW, N, NE.
const BACKWARD: [(isize, isize); 4] = [(0, -1), (-1, -1), (-1, 0), (-1, 1)];

pub struct RegionValidator<'a> {
    grid: &'a TileGrid,
}

impl<'a> RegionValidator<'a> {
    pub fn new(grid: &'a TileGrid) -> Self {
        Self { grid }
    }

    pub fn validate(&self) -> RegionReport {
        let grid = self.grid;

        for tile in grid.iter() {
            let border = grid.is_border(tile.row, tile.col);
            if border != (tile.path_region == 0) {
                return RegionReport::fail(
                    0,
                    RegionIssue::BorderMismatch {
                        row: tile.row,
                        col: tile.col,
                        path_region: tile.path_region,
                    },
                );
            }
        }

        let mut sets = UnionFind::new(grid.width() * grid.height());
        for tile in grid.iter() {
            if grid.is_border(tile.row, tile.col) {
                continue;
            }
            let medium = Medium::of(tile);
            for (dr, dc) in BACKWARD {
                let Some(other) = grid.get_offset(tile.row, tile.col, dr, dc) else {
                    continue;
                };
                if grid.is_border(other.row, other.col) || Medium::of(other) != medium {
                    continue;
                }
                if other.path_region != tile.path_region {
                    return RegionReport::fail(
                        0,
                        RegionIssue::LabelMismatch {
                            first: (other.row, other.col),
                            second: (tile.row, tile.col),
                            first_region: other.path_region,
                            second_region: tile.path_region,
                        },
                    );
                }
                sets.union(
                    grid.index(tile.row, tile.col),
                    grid.index(other.row, other.col),
                );
            }
        }

        let mut seen: Vec<((Medium, u8), (usize, usize))> = Vec::new();
        let mut areas = 0;
        for tile in grid.iter() {
            if grid.is_border(tile.row, tile.col) {
                continue;
            }
            let idx = grid.index(tile.row, tile.col);
            if sets.find(idx) != idx {
                continue;
            }
            areas += 1;
            if tile.path_region == OVERFLOW_REGION {
                continue;
            }
            let key = (Medium::of(tile), tile.path_region);
            if let Some(&(_, first)) = seen.iter().find(|(k, _)| *k == key) {
                return RegionReport::fail(
                    areas,
                    RegionIssue::DisjointRegion {
                        medium: key.0,
                        path_region: key.1,
                        first,
                        second: (tile.row, tile.col),
                    },
                );
            }
            seen.push((key, (tile.row, tile.col)));
        }

        RegionReport::pass(areas)
    }
}
