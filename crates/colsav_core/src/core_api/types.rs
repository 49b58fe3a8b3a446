use serde::{Deserialize, Serialize};

use crate::power::Power;
use crate::sav::buildings::Fortification;
use crate::sav::village::{Culture, Tribe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub map_width: u16,
    pub map_height: u16,
    pub colony_count: u16,
    pub unit_count: u16,
    pub village_count: u16,
    pub prime: u8,
    pub lcr: u8,
    pub powers: Vec<PowerSummary>,
    pub colonies: Vec<ColonySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerSummary {
    pub power: Power,
    pub adam_smith: bool,
    pub peter_stuyvesant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColonySummary {
    pub index: usize,
    pub name: String,
    pub power: Power,
    pub row: usize,
    pub col: usize,
    pub population: u8,
    pub fortification: Fortification,
    /// Keys of every constructed building, in table order.
    pub buildings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VillageSummary {
    pub row: usize,
    pub col: usize,
    pub tribe: Tribe,
    pub culture: Culture,
    pub trained: bool,
    pub capital: bool,
    pub scouted: bool,
    pub mission: Option<Power>,
}
