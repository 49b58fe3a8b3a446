use thiserror::Error;

/// Decode failures. None of these are recoverable: the input is not a
/// save file this crate understands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("truncated save: {section} needs {need} bytes, file has {have}")]
    Truncated {
        section: &'static str,
        need: usize,
        have: usize,
    },

    #[error("unknown {kind} value {value:#04x}")]
    UnknownVariant { kind: &'static str, value: u32 },

    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },

    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl FormatError {
    pub fn unknown(kind: &'static str, value: impl Into<u32>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// Rejected mutations. The document is left untouched when one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("tile ({row}, {col}) outside {height}x{width} map")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("no colony at index {index} ({count} colonies)")]
    UnknownColony { index: usize, count: usize },

    #[error("{feature} cannot be placed on {terrain}")]
    IncompatibleFeature {
        terrain: &'static str,
        feature: &'static str,
    },

    #[error("{building} does not belong to the {group} group")]
    WrongGroup {
        building: &'static str,
        group: &'static str,
    },

    #[error("{field} value {value} out of range 0..={max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("{0}")]
    NotApplicable(String),
}
