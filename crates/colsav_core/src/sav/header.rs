use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::reader::LittleEndianSlice;

use super::types::{
    COLONY_COUNT_OFFSET, COLONY_RECORD_SIZE, COLONY_TABLE_START, MAP_HEIGHT_OFFSET,
    MAP_LAYER_COUNT, MAP_WIDTH_OFFSET, POWER_COUNT, POWER_RECORD_SIZE, PRIME_LCR_DISTANCE,
    ROUTE_BLOCK_SIZE, TRIBE_BLOCK_SIZE, UNIT_COUNT_OFFSET, UNIT_RECORD_SIZE, VILLAGE_COUNT_OFFSET,
    VILLAGE_RECORD_SIZE,
};

/// The five header scalars every other offset is derived from.
///
/// All `*_start` accessors are pure functions of these fields; nothing is
/// cached, so a header is cheap to copy and always self-consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub map_width: u16,
    pub map_height: u16,
    pub colony_count: u16,
    pub unit_count: u16,
    pub village_count: u16,
}

impl SaveHeader {
    pub fn parse(r: &LittleEndianSlice<'_>) -> Result<Self, FormatError> {
        let header = Self {
            map_width: r.read_u16(MAP_WIDTH_OFFSET, "header")?,
            map_height: r.read_u16(MAP_HEIGHT_OFFSET, "header")?,
            colony_count: r.read_u16(COLONY_COUNT_OFFSET, "header")?,
            unit_count: r.read_u16(UNIT_COUNT_OFFSET, "header")?,
            village_count: r.read_u16(VILLAGE_COUNT_OFFSET, "header")?,
        };

        header.check_map_size()?;
        Ok(header)
    }

    /// Both route tables sit between the map layers and the prime/lcr byte,
    /// so their combined length is capped by that gap.
    pub fn check_map_size(&self) -> Result<(), FormatError> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(FormatError::InvalidField {
                field: "map size",
                message: format!("{}x{} map", self.map_width, self.map_height),
            });
        }
        let route_bytes = 2 * self.route_table_len();
        if route_bytes > PRIME_LCR_DISTANCE {
            return Err(FormatError::InvalidField {
                field: "map size",
                message: format!(
                    "{}x{} map needs {route_bytes} route bytes, only {PRIME_LCR_DISTANCE} fit before the prime/lcr byte",
                    self.map_width, self.map_height
                ),
            });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.map_width as usize
    }

    pub fn height(&self) -> usize {
        self.map_height as usize
    }

    pub fn map_size(&self) -> usize {
        self.width() * self.height()
    }

    pub fn colony_table_start(&self) -> usize {
        COLONY_TABLE_START
    }

    pub fn colony_offset(&self, index: usize) -> usize {
        self.colony_table_start() + index * COLONY_RECORD_SIZE
    }

    pub fn unit_table_start(&self) -> usize {
        self.colony_offset(self.colony_count as usize)
    }

    pub fn power_table_start(&self) -> usize {
        self.unit_table_start() + self.unit_count as usize * UNIT_RECORD_SIZE
    }

    pub fn power_offset(&self, index: usize) -> usize {
        self.power_table_start() + index * POWER_RECORD_SIZE
    }

    pub fn village_table_start(&self) -> usize {
        self.power_offset(POWER_COUNT)
    }

    pub fn village_offset(&self, index: usize) -> usize {
        self.village_table_start() + index * VILLAGE_RECORD_SIZE
    }

    pub fn tribe_block_start(&self) -> usize {
        self.village_offset(self.village_count as usize)
    }

    pub fn terrain_map_start(&self) -> usize {
        self.tribe_block_start() + TRIBE_BLOCK_SIZE
    }

    pub fn mask_map_start(&self) -> usize {
        self.terrain_map_start() + self.map_size()
    }

    pub fn path_map_start(&self) -> usize {
        self.terrain_map_start() + 2 * self.map_size()
    }

    pub fn seen_map_start(&self) -> usize {
        self.terrain_map_start() + 3 * self.map_size()
    }

    pub fn map_layers_end(&self) -> usize {
        self.terrain_map_start() + MAP_LAYER_COUNT * self.map_size()
    }

    pub fn route_rows(&self) -> usize {
        self.height().div_ceil(ROUTE_BLOCK_SIZE)
    }

    pub fn route_cols(&self) -> usize {
        self.width().div_ceil(ROUTE_BLOCK_SIZE)
    }

    pub fn route_table_len(&self) -> usize {
        self.route_rows() * self.route_cols()
    }

    pub fn sea_route_start(&self) -> usize {
        self.map_layers_end()
    }

    pub fn land_route_start(&self) -> usize {
        self.sea_route_start() + self.route_table_len()
    }

    pub fn prime_lcr_offset(&self) -> usize {
        self.map_layers_end() + PRIME_LCR_DISTANCE
    }

    /// Index of `(row, col)` within any of the map layers.
    pub fn tile_index(&self, row: usize, col: usize) -> usize {
        row * self.width() + col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(colonies: u16, units: u16, villages: u16) -> SaveHeader {
        SaveHeader {
            map_width: 58,
            map_height: 72,
            colony_count: colonies,
            unit_count: units,
            village_count: villages,
        }
    }

    #[test]
    fn empty_tables_match_reference_bases() {
        let h = header(0, 0, 0);
        assert_eq!(h.village_table_start(), 0x676);
        assert_eq!(h.terrain_map_start(), 0xBBD);
    }

    #[test]
    fn offsets_follow_record_counts() {
        let h = header(3, 10, 5);
        assert_eq!(h.village_table_start(), 0xCA * 3 + 0x1C * 10 + 0x676);
        assert_eq!(h.terrain_map_start(), 0xBBD + 3 * 202 + 10 * 28 + 5 * 18);
        assert_eq!(h.mask_map_start(), h.terrain_map_start() + 58 * 72);
        assert_eq!(
            h.prime_lcr_offset(),
            h.terrain_map_start() + 4 * 58 * 72 + 0x264
        );
    }

    #[test]
    fn route_tables_cover_partial_blocks() {
        let h = SaveHeader {
            map_width: 6,
            map_height: 9,
            ..header(0, 0, 0)
        };
        assert_eq!(h.route_rows(), 3);
        assert_eq!(h.route_cols(), 2);
        assert_eq!(h.land_route_start(), h.sea_route_start() + 6);
    }

    #[test]
    fn route_tables_must_fit_before_prime_byte() {
        assert_eq!(header(0, 0, 0).check_map_size(), Ok(()));
        let oversized = SaveHeader {
            map_width: 64,
            map_height: 80,
            ..header(0, 0, 0)
        };
        let err = oversized.check_map_size().expect_err("640 route bytes");
        assert!(matches!(err, FormatError::InvalidField { field: "map size", .. }));
        assert!(err.to_string().contains("640 route bytes"));
        let zero = SaveHeader {
            map_width: 0,
            ..header(0, 0, 0)
        };
        assert!(zero.check_map_size().is_err());
    }
}
