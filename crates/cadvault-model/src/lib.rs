//! Data model for vault file resolution.
//!
//! The types here flow through the whole pipeline: a [`PartRecord`] is read
//! from the parts list, normalized into a [`NormalizedIdentifier`], matched
//! against [`IndexedFile`]s, summarized as a [`ResolutionResult`] and finally
//! turned into a [`RenderJob`] for the automation driver.

pub mod enums;
pub mod error;
pub mod file;
pub mod record;
pub mod resolution;

pub use enums::{DocumentType, SuffixTag};
pub use error::{ModelError, Result};
pub use file::IndexedFile;
pub use record::{NormalizedIdentifier, PartRecord};
pub use resolution::{ItemStatus, RenderJob, ResolutionResult};
