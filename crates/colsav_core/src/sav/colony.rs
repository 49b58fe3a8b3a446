use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::power::Power;
use crate::reader::LittleEndianSlice;

use super::buildings::{
    BUILDING_BYTES_LEN, BUILDING_BYTES_OFFSET, BuildingSet, Fortification, known_bits,
};
use super::tile::ColonyMarker;
use super::types::COLONY_RECORD_SIZE;

// Offsets inside a colony record
const COL_OFFSET: usize = 0x00;
const ROW_OFFSET: usize = 0x01;
const NAME_OFFSET: usize = 0x02;
const NAME_LEN: usize = 0x18;
const POWER_OFFSET: usize = 0x1A;
const POPULATION_OFFSET: usize = 0x1F;
const OCCUPATION_OFFSET: usize = 0x20;
const SPECIALTY_OFFSET: usize = 0x40;
const SPOT_TIME_OFFSET: usize = 0x60;
const SPOT_TIME_BYTES: usize = 16;
const FIELD_OFFSET: usize = 0x70;
const EXPORTS_OFFSET: usize = 0x8A;
const HAMMERS_OFFSET: usize = 0x92;
const CONSTRUCTION_OFFSET: usize = 0x94;
const CARGO_OFFSET: usize = 0x9A;
const SENTIMENT_OFFSET: usize = 0xC2;
const SENTIMENT_DIVISOR_OFFSET: usize = 0xC6;

pub const WORKER_SLOTS: usize = 32;
pub const CARGO_KINDS: usize = 16;

/// On-disk order of the eight surrounding field tiles.
pub const FIELD_DIRECTIONS: [&str; 8] = ["N", "E", "S", "W", "NW", "NE", "SE", "SW"];

pub const GOODS_NAMES: [&str; CARGO_KINDS] = [
    "Food",
    "Sugar",
    "Tobacco",
    "Cotton",
    "Furs",
    "Lumber",
    "Ore",
    "Silver",
    "Horses",
    "Rum",
    "Cigars",
    "Cloth",
    "Coats",
    "Trade Goods",
    "Tools",
    "Muskets",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    pub row: usize,
    pub col: usize,
    pub name: String,
    pub power: Power,
    pub population: u8,
    pub occupation: [u8; WORKER_SLOTS],
    pub specialty: [u8; WORKER_SLOTS],
    /// One nibble per worker slot, low nibble first.
    pub spot_time: [u8; WORKER_SLOTS],
    pub field: [u8; 8],
    pub buildings: BuildingSet,
    /// Bits of the building run that no known building claims. Kept so an
    /// edited colony writes them back untouched.
    pub unknown_building_bits: [u8; BUILDING_BYTES_LEN],
    pub exports: u16,
    pub hammers: u16,
    pub construction: u8,
    pub cargo: [u16; CARGO_KINDS],
    pub sentiment: u16,
    pub sentiment_divisor: u16,
    #[serde(skip)]
    pub modified: bool,
}

impl Colony {
    /// Decode one fixed-size colony record. `record` must hold at least
    /// [`COLONY_RECORD_SIZE`] bytes.
    pub fn decode(record: &[u8]) -> Result<Self, FormatError> {
        if record.len() < COLONY_RECORD_SIZE {
            return Err(FormatError::Truncated {
                section: "colony record",
                need: COLONY_RECORD_SIZE,
                have: record.len(),
            });
        }
        const SECTION: &str = "colony record";
        let r = LittleEndianSlice::new(record);

        let mut spot_time = [0u8; WORKER_SLOTS];
        let packed = r.read_bytes(SPOT_TIME_OFFSET, SPOT_TIME_BYTES, SECTION)?;
        for (i, &b) in packed.iter().enumerate() {
            spot_time[2 * i] = b & 0x0F;
            spot_time[2 * i + 1] = b >> 4;
        }

        let mut cargo = [0u16; CARGO_KINDS];
        for (i, slot) in cargo.iter_mut().enumerate() {
            *slot = r.read_u16(CARGO_OFFSET + 2 * i, SECTION)?;
        }

        let building_bytes = r.read_array::<BUILDING_BYTES_LEN>(BUILDING_BYTES_OFFSET, SECTION)?;
        let known = known_bits();
        let mut unknown_building_bits = [0u8; BUILDING_BYTES_LEN];
        for (i, slot) in unknown_building_bits.iter_mut().enumerate() {
            *slot = building_bytes[i] & !known[i];
        }

        Ok(Self {
            col: r.read_u8(COL_OFFSET, SECTION)? as usize,
            row: r.read_u8(ROW_OFFSET, SECTION)? as usize,
            name: r.read_fixed_string(NAME_OFFSET, NAME_LEN, SECTION)?,
            power: Power::from_raw(r.read_u8(POWER_OFFSET, SECTION)?)?,
            population: r.read_u8(POPULATION_OFFSET, SECTION)?,
            occupation: r.read_array(OCCUPATION_OFFSET, SECTION)?,
            specialty: r.read_array(SPECIALTY_OFFSET, SECTION)?,
            spot_time,
            field: r.read_array(FIELD_OFFSET, SECTION)?,
            buildings: BuildingSet::from_bytes(&building_bytes),
            unknown_building_bits,
            exports: r.read_u16(EXPORTS_OFFSET, SECTION)?,
            hammers: r.read_u16(HAMMERS_OFFSET, SECTION)?,
            construction: r.read_u8(CONSTRUCTION_OFFSET, SECTION)?,
            cargo,
            sentiment: r.read_u16(SENTIMENT_OFFSET, SECTION)?,
            sentiment_divisor: r.read_u16(SENTIMENT_DIVISOR_OFFSET, SECTION)?,
            modified: false,
        })
    }

    /// The six building bytes as they belong at record offset 0x84.
    pub fn building_bytes(&self) -> [u8; BUILDING_BYTES_LEN] {
        let mut bytes = self.buildings.to_bytes();
        for (b, extra) in bytes.iter_mut().zip(self.unknown_building_bits) {
            *b |= extra;
        }
        bytes
    }

    pub fn fortification(&self) -> Fortification {
        self.buildings.fortification()
    }

    pub fn marker(&self) -> ColonyMarker {
        ColonyMarker {
            power: self.power,
            fortification: self.fortification(),
        }
    }
}
