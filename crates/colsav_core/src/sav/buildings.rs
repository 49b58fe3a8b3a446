use serde::{Deserialize, Serialize};

use crate::error::{EditError, FormatError};

/// First byte of the building flags run inside a colony record.
pub const BUILDING_BYTES_OFFSET: usize = 0x84;
pub const BUILDING_BYTES_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Building {
    Stockade,
    Fort,
    Fortress,
    Armory,
    Magazine,
    Arsenal,
    Docks,
    Drydock,
    Shipyard,
    TownHall,
    Schoolhouse,
    College,
    University,
    Warehouse,
    WarehouseExpansion,
    Stable,
    CustomHouse,
    PrintingPress,
    Newspaper,
    WeaversHouse,
    WeaversShop,
    TextileMill,
    TobacconistsHouse,
    TobacconistsShop,
    CigarFactory,
    DistillersHouse,
    DistillersShop,
    RumFactory,
    FurTradersHouse,
    FurTradersShop,
    FurFactory,
    CarpentersShop,
    LumberMill,
    Church,
    Cathedral,
    BlacksmithsHouse,
    BlacksmithsShop,
    IronWorks,
}

/// Static decode/encode metadata for one building flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingInfo {
    pub building: Building,
    pub key: &'static str,
    pub label: &'static str,
    pub byte: usize,
    pub bit: u8,
}

const fn info(
    building: Building,
    key: &'static str,
    label: &'static str,
    byte: usize,
    bit: u8,
) -> BuildingInfo {
    BuildingInfo {
        building,
        key,
        label,
        byte,
        bit,
    }
}

/// Every known building flag, in on-disk bit order. Indexed by
/// `Building as usize`.
pub const BUILDINGS: [BuildingInfo; 38] = [
    info(Building::Stockade, "stockade", "Stockade", 0x84, 0x01),
    info(Building::Fort, "fort", "Fort", 0x84, 0x02),
    info(Building::Fortress, "fortress", "Fortress", 0x84, 0x04),
    info(Building::Armory, "armory", "Armory", 0x84, 0x08),
    info(Building::Magazine, "magazine", "Magazine", 0x84, 0x10),
    info(Building::Arsenal, "arsenal", "Arsenal", 0x84, 0x20),
    info(Building::Docks, "docks", "Docks", 0x84, 0x40),
    info(Building::Drydock, "drydock", "Drydock", 0x84, 0x80),
    info(Building::Shipyard, "shipyard", "Shipyard", 0x85, 0x01),
    info(Building::TownHall, "townhall", "Townhall", 0x85, 0x02),
    info(Building::Schoolhouse, "schoolhouse", "Schoolhouse", 0x85, 0x10),
    info(Building::College, "college", "College", 0x85, 0x20),
    info(Building::University, "university", "University", 0x85, 0x40),
    info(Building::Warehouse, "warehouse", "Warehouse", 0x85, 0x80),
    info(
        Building::WarehouseExpansion,
        "warehouseexpansion",
        "Warehouse Expansion",
        0x86,
        0x01,
    ),
    info(Building::Stable, "stable", "Stable", 0x86, 0x02),
    info(Building::CustomHouse, "customhouse", "Custom House", 0x86, 0x04),
    info(Building::PrintingPress, "press", "Printing Press", 0x86, 0x08),
    info(Building::Newspaper, "newspaper", "Newspaper", 0x86, 0x10),
    info(Building::WeaversHouse, "weavershouse", "Weaver's House", 0x86, 0x20),
    info(Building::WeaversShop, "weaversshop", "Weaver's Shop", 0x86, 0x40),
    info(Building::TextileMill, "textilemill", "Textile Mill", 0x86, 0x80),
    info(
        Building::TobacconistsHouse,
        "tobacconistshouse",
        "Tobacconist's House",
        0x87,
        0x01,
    ),
    info(
        Building::TobacconistsShop,
        "tobacconistsshop",
        "Tobacconist's Shop",
        0x87,
        0x02,
    ),
    info(Building::CigarFactory, "cigarfactory", "Cigar Factory", 0x87, 0x04),
    info(
        Building::DistillersHouse,
        "distillershouse",
        "Distiller's House",
        0x87,
        0x08,
    ),
    info(
        Building::DistillersShop,
        "distillersshop",
        "Distiller's Shop",
        0x87,
        0x10,
    ),
    info(Building::RumFactory, "rumfactory", "Rum Factory", 0x87, 0x20),
    info(
        Building::FurTradersHouse,
        "furtradershouse",
        "Fur Trader's House",
        0x88,
        0x01,
    ),
    info(
        Building::FurTradersShop,
        "furtradersshop",
        "Fur Trader's Shop",
        0x88,
        0x02,
    ),
    info(Building::FurFactory, "furfactory", "Fur Factory", 0x88, 0x04),
    info(
        Building::CarpentersShop,
        "carpentersshop",
        "Carpenter's Shop",
        0x88,
        0x08,
    ),
    info(Building::LumberMill, "lumbermill", "Lumber Mill", 0x88, 0x10),
    info(Building::Church, "church", "Church", 0x88, 0x20),
    info(Building::Cathedral, "cathedral", "Cathedral", 0x88, 0x40),
    info(
        Building::BlacksmithsHouse,
        "blacksmithshouse",
        "Blacksmith's House",
        0x88,
        0x80,
    ),
    info(
        Building::BlacksmithsShop,
        "blacksmithsshop",
        "Blacksmith's Shop",
        0x89,
        0x01,
    ),
    info(Building::IronWorks, "ironworks", "Iron Works", 0x89, 0x02),
];

impl Building {
    pub fn info(&self) -> &'static BuildingInfo {
        &BUILDINGS[*self as usize]
    }

    pub fn key(&self) -> &'static str {
        self.info().key
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn from_key(key: &str) -> Result<Self, FormatError> {
        BUILDINGS
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.building)
            .ok_or_else(|| FormatError::UnknownName {
                kind: "building",
                name: key.to_string(),
            })
    }

    /// Upgrade group the building belongs to; the town hall has none.
    pub fn group(&self) -> Option<BuildingGroup> {
        BuildingGroup::ALL
            .into_iter()
            .find(|g| g.tiers().contains(self))
    }
}

/// Mask of the bits in each building byte that map to a known building.
pub fn known_bits() -> [u8; BUILDING_BYTES_LEN] {
    let mut mask = [0u8; BUILDING_BYTES_LEN];
    for b in &BUILDINGS {
        mask[b.byte - BUILDING_BYTES_OFFSET] |= b.bit;
    }
    mask
}

/// Set of constructed buildings, one bit per [`Building`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingSet(u64);

impl BuildingSet {
    pub fn from_bytes(bytes: &[u8; BUILDING_BYTES_LEN]) -> Self {
        let mut set = Self::default();
        for b in &BUILDINGS {
            if bytes[b.byte - BUILDING_BYTES_OFFSET] & b.bit != 0 {
                set.insert(b.building);
            }
        }
        set
    }

    pub fn to_bytes(&self) -> [u8; BUILDING_BYTES_LEN] {
        let mut bytes = [0u8; BUILDING_BYTES_LEN];
        for b in &BUILDINGS {
            if self.contains(b.building) {
                bytes[b.byte - BUILDING_BYTES_OFFSET] += b.bit;
            }
        }
        bytes
    }

    pub fn contains(&self, building: Building) -> bool {
        self.0 & (1 << building as u64) != 0
    }

    pub fn insert(&mut self, building: Building) {
        self.0 |= 1 << building as u64;
    }

    pub fn remove(&mut self, building: Building) {
        self.0 &= !(1 << building as u64);
    }

    pub fn set(&mut self, building: Building, built: bool) {
        if built {
            self.insert(building);
        } else {
            self.remove(building);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Building> + '_ {
        BUILDINGS
            .iter()
            .map(|b| b.building)
            .filter(|&b| self.contains(b))
    }

    pub fn fortification(&self) -> Fortification {
        if self.contains(Building::Fortress) {
            Fortification::Fortress
        } else if self.contains(Building::Fort) {
            Fortification::Fort
        } else if self.contains(Building::Stockade) {
            Fortification::Stockade
        } else {
            Fortification::None
        }
    }

    /// Highest built tier of `group`, or `None` if nothing in it is built.
    pub fn level(&self, group: BuildingGroup) -> Option<Building> {
        group
            .tiers()
            .iter()
            .rev()
            .copied()
            .find(|&b| self.contains(b))
    }

    /// Select `tier` within `group`: every lower tier is built, every higher
    /// tier is cleared. `None` clears the whole group when the group allows
    /// having nothing built.
    pub fn select(
        &mut self,
        group: BuildingGroup,
        tier: Option<Building>,
    ) -> Result<(), EditError> {
        let tiers = group.tiers();
        let selected = match tier {
            Some(building) => {
                let idx = tiers.iter().position(|&b| b == building).ok_or(
                    EditError::WrongGroup {
                        building: building.label(),
                        group: group.as_str(),
                    },
                )?;
                Some(idx)
            }
            None if group.is_optional() => None,
            None => {
                return Err(EditError::NotApplicable(format!(
                    "the {} group always has a building",
                    group.as_str()
                )));
            }
        };

        for (idx, &building) in tiers.iter().enumerate() {
            self.set(building, selected.is_some_and(|s| idx <= s));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fortification {
    #[default]
    None,
    Stockade,
    Fort,
    Fortress,
}

impl Fortification {
    pub fn tag(&self) -> &'static str {
        match *self {
            Self::None => "colony",
            Self::Stockade => "stockade",
            Self::Fort => "fort",
            Self::Fortress => "fortress",
        }
    }
}

/// Mutually exclusive upgrade chains, lowest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingGroup {
    Fortification,
    Press,
    Church,
    Carpentry,
    Stable,
    Warehouse,
    Blacksmith,
    Armory,
    Docks,
    CustomHouse,
    Schoolhouse,
    Fur,
    Cotton,
    Rum,
    Tobacco,
}

impl BuildingGroup {
    pub const ALL: [BuildingGroup; 15] = [
        Self::Fortification,
        Self::Press,
        Self::Church,
        Self::Carpentry,
        Self::Stable,
        Self::Warehouse,
        Self::Blacksmith,
        Self::Armory,
        Self::Docks,
        Self::CustomHouse,
        Self::Schoolhouse,
        Self::Fur,
        Self::Cotton,
        Self::Rum,
        Self::Tobacco,
    ];

    pub fn tiers(&self) -> &'static [Building] {
        use Building::*;
        match *self {
            Self::Fortification => &[Stockade, Fort, Fortress],
            Self::Press => &[PrintingPress, Newspaper],
            Self::Church => &[Church, Cathedral],
            Self::Carpentry => &[CarpentersShop, LumberMill],
            Self::Stable => &[Stable],
            Self::Warehouse => &[Warehouse, WarehouseExpansion],
            Self::Blacksmith => &[BlacksmithsHouse, BlacksmithsShop, IronWorks],
            Self::Armory => &[Armory, Magazine, Arsenal],
            Self::Docks => &[Docks, Drydock, Shipyard],
            Self::CustomHouse => &[CustomHouse],
            Self::Schoolhouse => &[Schoolhouse, College, University],
            Self::Fur => &[FurTradersHouse, FurTradersShop, FurFactory],
            Self::Cotton => &[WeaversHouse, WeaversShop, TextileMill],
            Self::Rum => &[DistillersHouse, DistillersShop, RumFactory],
            Self::Tobacco => &[TobacconistsHouse, TobacconistsShop, CigarFactory],
        }
    }

    /// Production chains every colony starts with cannot be emptied.
    pub fn is_optional(&self) -> bool {
        !matches!(
            self,
            Self::Carpentry
                | Self::Blacksmith
                | Self::Fur
                | Self::Cotton
                | Self::Rum
                | Self::Tobacco
        )
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Fortification => "fortification",
            Self::Press => "press",
            Self::Church => "church",
            Self::Carpentry => "carpentry",
            Self::Stable => "stable",
            Self::Warehouse => "warehouse",
            Self::Blacksmith => "blacksmith",
            Self::Armory => "armory",
            Self::Docks => "docks",
            Self::CustomHouse => "customhouse",
            Self::Schoolhouse => "schoolhouse",
            Self::Fur => "fur",
            Self::Cotton => "cotton",
            Self::Rum => "rum",
            Self::Tobacco => "tobacco",
        }
    }
}

/// Which gated buildings a colony may hold, from its surroundings and its
/// power's founding fathers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingAvailability {
    /// Any of the eight neighbouring tiles is water.
    pub coastal: bool,
    /// A neighbouring water tile belongs to the open ocean region.
    pub ocean_access: bool,
    pub adam_smith: bool,
    pub peter_stuyvesant: bool,
}

impl BuildingAvailability {
    pub fn allows(&self, building: Building) -> bool {
        use Building::*;
        match building {
            Docks => self.coastal,
            Drydock | Shipyard => self.ocean_access,
            RumFactory | TextileMill | CigarFactory | FurFactory | IronWorks | Arsenal => {
                self.adam_smith
            }
            CustomHouse => self.peter_stuyvesant,
            _ => true,
        }
    }
}
