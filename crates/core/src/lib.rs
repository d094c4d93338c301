//! Pure domain logic for the Gartenplan backend.
//!
//! This crate has no I/O and no async: it holds the shared id/timestamp
//! types, the domain error type, the field normalizer for spreadsheet-derived
//! text, and the raw-record mapping layer used by the batch importer.

pub mod error;
pub mod import;
pub mod normalize;
pub mod types;
