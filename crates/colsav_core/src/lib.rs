//! Decoding, editing and re-encoding of Sid Meier's Colonization `.SAV`
//! files.
//!
//! [`sav::Document`] owns the save buffer and the decoded map, colonies and
//! villages. [`routes`] and [`regions`] hold the two map-wide algorithms run
//! on save, and [`core_api`] wraps everything in a session for front ends.

pub mod core_api;
pub mod error;
pub mod export;
pub mod layout;
pub mod pattern;
pub mod power;
pub mod reader;
pub mod regions;
pub mod routes;
pub mod sav;

pub use error::{EditError, FormatError};
pub use sav::{Document, MapExport, SaveOutcome};
