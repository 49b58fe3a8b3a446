use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::power::Power;
use crate::reader::LittleEndianSlice;

use super::types::{
    NO_MISSION, VILLAGE_CAPITAL_BIT, VILLAGE_COL_OFFSET, VILLAGE_FLAGS_OFFSET,
    VILLAGE_MISSION_OFFSET, VILLAGE_ROW_OFFSET, VILLAGE_SCOUTED_BIT, VILLAGE_TRAINED_BIT,
    VILLAGE_TRIBE_OFFSET,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tribe {
    Inca,
    Aztec,
    Arawak,
    Iroquois,
    Cherokee,
    Apache,
    Sioux,
    Tupi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Culture {
    Civilized,
    Advanced,
    Agrarian,
    SemiNomadic,
}

impl Tribe {
    /// Tribe ids start after the four European powers.
    pub fn from_raw(raw: u8) -> Result<Self, FormatError> {
        match raw {
            4 => Ok(Self::Inca),
            5 => Ok(Self::Aztec),
            6 => Ok(Self::Arawak),
            7 => Ok(Self::Iroquois),
            8 => Ok(Self::Cherokee),
            9 => Ok(Self::Apache),
            10 => Ok(Self::Sioux),
            11 => Ok(Self::Tupi),
            other => Err(FormatError::unknown("tribe", other)),
        }
    }

    pub fn raw(&self) -> u8 {
        *self as u8 + 4
    }

    pub fn culture(&self) -> Culture {
        match *self {
            Self::Inca => Culture::Civilized,
            Self::Aztec => Culture::Advanced,
            Self::Arawak | Self::Iroquois | Self::Cherokee => Culture::Agrarian,
            Self::Apache | Self::Sioux | Self::Tupi => Culture::SemiNomadic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Inca => "Inca",
            Self::Aztec => "Aztec",
            Self::Arawak => "Arawak",
            Self::Iroquois => "Iroquois",
            Self::Cherokee => "Cherokee",
            Self::Apache => "Apache",
            Self::Sioux => "Sioux",
            Self::Tupi => "Tupi",
        }
    }
}

/// Village state copied onto the tile it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageMarker {
    pub tribe: Tribe,
    pub trained: bool,
    pub capital: bool,
    pub scouted: bool,
    pub mission: Option<Power>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    pub row: usize,
    pub col: usize,
    pub marker: VillageMarker,
}

impl Village {
    pub fn parse(r: &LittleEndianSlice<'_>, offset: usize) -> Result<Self, FormatError> {
        const SECTION: &str = "village table";
        let col = r.read_u8(offset + VILLAGE_COL_OFFSET, SECTION)? as usize;
        let row = r.read_u8(offset + VILLAGE_ROW_OFFSET, SECTION)? as usize;
        let tribe = Tribe::from_raw(r.read_u8(offset + VILLAGE_TRIBE_OFFSET, SECTION)?)?;
        let flags = r.read_u8(offset + VILLAGE_FLAGS_OFFSET, SECTION)?;
        let mission = match r.read_u8(offset + VILLAGE_MISSION_OFFSET, SECTION)? {
            NO_MISSION => None,
            raw => Some(Power::from_raw(raw & 0x03)?),
        };

        Ok(Self {
            row,
            col,
            marker: VillageMarker {
                tribe,
                trained: flags & VILLAGE_TRAINED_BIT != 0,
                capital: flags & VILLAGE_CAPITAL_BIT != 0,
                scouted: flags & VILLAGE_SCOUTED_BIT != 0,
                mission,
            },
        })
    }
}
