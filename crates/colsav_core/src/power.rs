use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// One of the four European colonial powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Power {
    English,
    French,
    Spanish,
    Dutch,
}

impl Power {
    pub const ALL: [Power; 4] = [Self::English, Self::French, Self::Spanish, Self::Dutch];

    pub fn from_raw(raw: u8) -> Result<Self, FormatError> {
        match raw {
            0 => Ok(Self::English),
            1 => Ok(Self::French),
            2 => Ok(Self::Spanish),
            3 => Ok(Self::Dutch),
            other => Err(FormatError::unknown("power", other)),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::English => 0,
            Self::French => 1,
            Self::Spanish => 2,
            Self::Dutch => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::English => "English",
            Self::French => "French",
            Self::Spanish => "Spanish",
            Self::Dutch => "Dutch",
        }
    }

    /// Single-letter prefix used by the game's map sprites.
    pub fn letter(&self) -> char {
        match *self {
            Self::English => 'e',
            Self::French => 'f',
            Self::Spanish => 's',
            Self::Dutch => 'd',
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Founding-father flags stored in byte 7 of each power record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundingFathers {
    pub adam_smith: bool,
    pub peter_stuyvesant: bool,
}

impl FoundingFathers {
    pub const ADAM_SMITH_BIT: u8 = 0x01;
    pub const PETER_STUYVESANT_BIT: u8 = 0x08;

    pub fn from_byte(raw: u8) -> Self {
        Self {
            adam_smith: raw & Self::ADAM_SMITH_BIT != 0,
            peter_stuyvesant: raw & Self::PETER_STUYVESANT_BIT != 0,
        }
    }
}
