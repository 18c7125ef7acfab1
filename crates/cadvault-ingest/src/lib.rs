//! Parts-list ingestion.
//!
//! Reads the `Item` / `Description` / `Revision` export that drives a vault
//! resolution run. Header names are matched case-insensitively and a leading
//! UTF-8 BOM is tolerated.

mod error;
mod parts;

pub use error::{IngestError, Result};
pub use parts::{PartRow, PartsList, read_parts, read_parts_csv};
