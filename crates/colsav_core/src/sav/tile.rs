use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EditError, FormatError};

use super::buildings::Fortification;
use super::types::{TERRAIN_ARCTIC, TERRAIN_OCEAN, TERRAIN_SEA_LANE};
use super::village::VillageMarker;
use crate::power::Power;

// Terrain byte (layer 1)
const SPECIAL_BIT: u8 = 0x10;
const FOREST_BIT: u8 = 0x08;
const HILLS_BIT: u8 = 0x20;
const RIVER_BIT: u8 = 0x40;
const PROMINENT_BIT: u8 = 0x80;
const SPECIAL_BASE_MASK: u8 = 0x1F;
const PLAIN_BASE_MASK: u8 = 0x07;

// Mask byte (layer 2)
const UNIT_BIT: u8 = 0x01;
const COLONY_BIT: u8 = 0x02;
const DEPLETED_BIT: u8 = 0x04;
const ROAD_BIT: u8 = 0x08;
const PURCHASED_BIT: u8 = 0x10;
const PACIFIC_BIT: u8 = 0x20;
const PLOWED_BIT: u8 = 0x40;
const UNKNOWN_MASK_BIT: u8 = 0x80;

/// The three raw bytes a tile occupies, one per decoded map layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBytes {
    pub terrain: u8,
    pub mask: u8,
    pub path: u8,
}

/// Owning colony shown on a tile: power plus fortification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyMarker {
    pub power: Power,
    pub fortification: Fortification,
}

impl ColonyMarker {
    /// Sprite-style tag, e.g. `efort` or `dcolony`.
    pub fn tag(&self) -> String {
        format!("{}{}", self.power.letter(), self.fortification.tag())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,

    pub base: u8,
    pub forested: bool,
    pub hills: bool,
    pub river: bool,
    pub prominent: bool,

    pub unit: bool,
    pub colony_bit: bool,
    pub depleted: bool,
    pub road: bool,
    pub purchased: bool,
    pub pacific: bool,
    pub plowed: bool,
    pub unknown_mask_bit: bool,

    pub path_region: u8,
    pub explorer: u8,

    pub colony: Option<ColonyMarker>,
    pub village: Option<VillageMarker>,
    #[serde(skip)]
    pub modified: bool,
}

impl Tile {
    pub fn decode(row: usize, col: usize, bytes: TileBytes) -> Self {
        let mut tile = Self {
            row,
            col,
            ..Self::default()
        };
        tile.apply_terrain_byte(bytes.terrain);

        let mask = bytes.mask;
        tile.unit = mask & UNIT_BIT != 0;
        tile.colony_bit = mask & COLONY_BIT != 0;
        tile.depleted = mask & DEPLETED_BIT != 0;
        tile.road = mask & ROAD_BIT != 0;
        tile.purchased = mask & PURCHASED_BIT != 0;
        tile.pacific = mask & PACIFIC_BIT != 0;
        tile.plowed = mask & PLOWED_BIT != 0;
        tile.unknown_mask_bit = mask & UNKNOWN_MASK_BIT != 0;

        tile.path_region = bytes.path & 0x0F;
        tile.explorer = bytes.path >> 4;
        tile
    }

    pub fn encode(&self) -> TileBytes {
        TileBytes {
            terrain: self.terrain_byte(),
            mask: self.mask_byte(),
            path: self.path_byte(),
        }
    }

    pub fn terrain_byte(&self) -> u8 {
        self.base
            | flag(self.forested, FOREST_BIT)
            | flag(self.hills, HILLS_BIT)
            | flag(self.river, RIVER_BIT)
            | flag(self.prominent, PROMINENT_BIT)
    }

    pub fn mask_byte(&self) -> u8 {
        flag(self.unit, UNIT_BIT)
            | flag(self.colony_bit, COLONY_BIT)
            | flag(self.depleted, DEPLETED_BIT)
            | flag(self.road, ROAD_BIT)
            | flag(self.purchased, PURCHASED_BIT)
            | flag(self.pacific, PACIFIC_BIT)
            | flag(self.plowed, PLOWED_BIT)
            | flag(self.unknown_mask_bit, UNKNOWN_MASK_BIT)
    }

    pub fn path_byte(&self) -> u8 {
        (self.path_region & 0x0F) | ((self.explorer & 0x0F) << 4)
    }

    /// Replace the terrain-derived fields with those of a freshly painted
    /// terrain byte. Mask and path fields are left alone.
    pub fn update(&mut self, terrain: u8) {
        self.apply_terrain_byte(terrain);
        self.modified = true;
    }

    pub fn is_water(&self) -> bool {
        self.base == TERRAIN_OCEAN || self.base == TERRAIN_SEA_LANE
    }

    pub fn terrain(&self) -> Result<Terrain, FormatError> {
        Terrain::from_base(self.base)
    }

    fn apply_terrain_byte(&mut self, terrain: u8) {
        let special = terrain & SPECIAL_BIT != 0;
        self.base = if special {
            terrain & SPECIAL_BASE_MASK
        } else {
            terrain & PLAIN_BASE_MASK
        };
        self.forested = terrain & FOREST_BIT != 0 && !special;
        self.hills = terrain & HILLS_BIT != 0;
        self.river = terrain & RIVER_BIT != 0;
        self.prominent = terrain & PROMINENT_BIT != 0;
    }
}

fn flag(set: bool, bit: u8) -> u8 {
    if set { bit } else { 0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Tundra,
    Desert,
    Plains,
    Prairie,
    Grassland,
    Savannah,
    Marsh,
    Swamp,
    Arctic,
    Ocean,
    SeaLane,
}

impl Terrain {
    pub const ALL: [Terrain; 11] = [
        Self::Tundra,
        Self::Desert,
        Self::Plains,
        Self::Prairie,
        Self::Grassland,
        Self::Savannah,
        Self::Marsh,
        Self::Swamp,
        Self::Arctic,
        Self::Ocean,
        Self::SeaLane,
    ];

    pub fn from_base(base: u8) -> Result<Self, FormatError> {
        match base {
            0 => Ok(Self::Tundra),
            1 => Ok(Self::Desert),
            2 => Ok(Self::Plains),
            3 => Ok(Self::Prairie),
            4 => Ok(Self::Grassland),
            5 => Ok(Self::Savannah),
            6 => Ok(Self::Marsh),
            7 => Ok(Self::Swamp),
            TERRAIN_ARCTIC => Ok(Self::Arctic),
            TERRAIN_OCEAN => Ok(Self::Ocean),
            TERRAIN_SEA_LANE => Ok(Self::SeaLane),
            other => Err(FormatError::unknown("terrain", other)),
        }
    }

    pub fn base(&self) -> u8 {
        match *self {
            Self::Tundra => 0,
            Self::Desert => 1,
            Self::Plains => 2,
            Self::Prairie => 3,
            Self::Grassland => 4,
            Self::Savannah => 5,
            Self::Marsh => 6,
            Self::Swamp => 7,
            Self::Arctic => TERRAIN_ARCTIC,
            Self::Ocean => TERRAIN_OCEAN,
            Self::SeaLane => TERRAIN_SEA_LANE,
        }
    }

    /// Arctic, ocean and sea lane carry the special bit and cannot be
    /// forested.
    pub fn is_special(&self) -> bool {
        self.base() & SPECIAL_BIT != 0
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Self::Ocean | Self::SeaLane)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Tundra => "Tundra",
            Self::Desert => "Desert",
            Self::Plains => "Plains",
            Self::Prairie => "Prairie",
            Self::Grassland => "Grassland",
            Self::Savannah => "Savannah",
            Self::Marsh => "Marsh",
            Self::Swamp => "Swamp",
            Self::Arctic => "Arctic",
            Self::Ocean => "Ocean",
            Self::SeaLane => "Sea Lane",
        }
    }

    pub fn forest_name(&self) -> Option<&'static str> {
        match *self {
            Self::Tundra => Some("Boreal Forest"),
            Self::Desert => Some("Scrub Forest"),
            Self::Plains => Some("Mixed Forest"),
            Self::Prairie => Some("Broadleaf Forest"),
            Self::Grassland => Some("Conifer Forest"),
            Self::Savannah => Some("Tropical Forest"),
            Self::Marsh => Some("Wetland Forest"),
            Self::Swamp => Some("Rain Forest"),
            Self::Arctic | Self::Ocean | Self::SeaLane => None,
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay painted on top of a base terrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[default]
    None,
    Forest,
    Mountains,
    Hills,
    MinorRiver,
    MajorRiver,
    HillsMinorRiver,
    ForestMinorRiver,
    ForestMajorRiver,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Self::None,
        Self::Forest,
        Self::Mountains,
        Self::Hills,
        Self::MinorRiver,
        Self::MajorRiver,
        Self::HillsMinorRiver,
        Self::ForestMinorRiver,
        Self::ForestMajorRiver,
    ];

    pub fn bits(&self) -> u8 {
        match *self {
            Self::None => 0,
            Self::Forest => FOREST_BIT,
            Self::Mountains => HILLS_BIT | PROMINENT_BIT,
            Self::Hills => HILLS_BIT,
            Self::MinorRiver => RIVER_BIT,
            Self::MajorRiver => RIVER_BIT | PROMINENT_BIT,
            Self::HillsMinorRiver => HILLS_BIT | RIVER_BIT,
            Self::ForestMinorRiver => FOREST_BIT | RIVER_BIT,
            Self::ForestMajorRiver => FOREST_BIT | RIVER_BIT | PROMINENT_BIT,
        }
    }

    pub fn has_forest(&self) -> bool {
        self.bits() & FOREST_BIT != 0
    }

    pub fn has_hills(&self) -> bool {
        self.bits() & HILLS_BIT != 0
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::None => "(None)",
            Self::Forest => "Forest",
            Self::Mountains => "Mountains",
            Self::Hills => "Hills",
            Self::MinorRiver => "Minor River",
            Self::MajorRiver => "Major River",
            Self::HillsMinorRiver => "Hills/Minor River",
            Self::ForestMinorRiver => "Forest/Minor River",
            Self::ForestMajorRiver => "Forest/Major River",
        }
    }
}

/// Combine a terrain and a feature into the terrain byte a painted tile
/// receives. Forests are only valid on the eight plain biomes, hills and
/// mountains only on land.
pub fn compose_terrain(terrain: Terrain, feature: Feature) -> Result<u8, EditError> {
    if feature.has_forest() && terrain.is_special() {
        return Err(EditError::IncompatibleFeature {
            terrain: terrain.as_str(),
            feature: feature.as_str(),
        });
    }
    if feature.has_hills() && terrain.is_water() {
        return Err(EditError::IncompatibleFeature {
            terrain: terrain.as_str(),
            feature: feature.as_str(),
        });
    }
    Ok(terrain.base() + feature.bits())
}
