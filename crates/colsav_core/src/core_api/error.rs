use thiserror::Error;

use crate::error::{EditError, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Parse,
    InvalidEdit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<FormatError> for CoreError {
    fn from(e: FormatError) -> Self {
        Self::new(CoreErrorCode::Parse, format!("failed to parse save: {e}"))
    }
}

impl From<EditError> for CoreError {
    fn from(e: EditError) -> Self {
        Self::new(CoreErrorCode::InvalidEdit, e.to_string())
    }
}
