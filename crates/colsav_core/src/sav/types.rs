// Header scalars (little-endian u16)
pub const MAP_WIDTH_OFFSET: usize = 0x0C;
pub const MAP_HEIGHT_OFFSET: usize = 0x0E;
pub const VILLAGE_COUNT_OFFSET: usize = 0x2A;
pub const UNIT_COUNT_OFFSET: usize = 0x2C;
pub const COLONY_COUNT_OFFSET: usize = 0x2E;

// Fixed table geometry
pub const COLONY_TABLE_START: usize = 0x186;
pub const COLONY_RECORD_SIZE: usize = 0xCA;
pub const UNIT_RECORD_SIZE: usize = 0x1C;
pub const POWER_RECORD_SIZE: usize = 0x13C;
pub const POWER_COUNT: usize = 4;
pub const VILLAGE_RECORD_SIZE: usize = 0x12;
/// Opaque block between the village table and the first map layer.
pub const TRIBE_BLOCK_SIZE: usize = 0x547;

/// Terrain, mask, path and seen layers. Only the first three are decoded.
pub const MAP_LAYER_COUNT: usize = 4;
/// Distance from the end of the seen layer to the packed prime/lcr byte.
pub const PRIME_LCR_DISTANCE: usize = 0x264;

pub const ROUTE_BLOCK_SIZE: usize = 4;

// Offsets inside a power record
pub const POWER_FATHERS_OFFSET: usize = 7;

// Offsets inside a village record
pub const VILLAGE_COL_OFFSET: usize = 0;
pub const VILLAGE_ROW_OFFSET: usize = 1;
pub const VILLAGE_TRIBE_OFFSET: usize = 2;
pub const VILLAGE_FLAGS_OFFSET: usize = 3;
pub const VILLAGE_MISSION_OFFSET: usize = 5;
pub const VILLAGE_TRAINED_BIT: u8 = 0x02;
pub const VILLAGE_CAPITAL_BIT: u8 = 0x04;
pub const VILLAGE_SCOUTED_BIT: u8 = 0x08;
pub const NO_MISSION: u8 = 0xFF;

// Terrain ids that matter to placement and routing rules
pub const TERRAIN_ARCTIC: u8 = 24;
pub const TERRAIN_OCEAN: u8 = 25;
pub const TERRAIN_SEA_LANE: u8 = 26;

/// Path region of open ocean; bays and lakes use other labels.
pub const OPEN_OCEAN_REGION: u8 = 1;
/// Shared label for regions that ran out of distinct codes.
pub const OVERFLOW_REGION: u8 = 15;
/// Explorer nibble value marking an unvisited rumor.
pub const RUMOR_UNEXPLORED: u8 = 0x0F;
