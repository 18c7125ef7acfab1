//! Vault library indexing.
//!
//! This crate scans the CAD library once and produces an immutable [`Index`]
//! that the resolver queries for every parts-list row.
//!
//! # Features
//!
//! - **Normalization**: [`normalize`] turns item cells and filename stems into
//!   the same base token, so lookups are symmetric
//! - **Revision hints**: pluggable [`RevisionRule`]s read revision codes from
//!   filenames
//! - **Indexing**: [`build_index`] walks the library root with an optional
//!   [`AbortSignal`]
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cadvault_index::{IndexOptions, build_index, normalize};
//!
//! let index = build_index(Path::new("/vault/library"), &IndexOptions::default())?;
//! let id = normalize("19136261SGT")?;
//! let files = index.lookup(&id.base_token);
//! ```

mod error;
mod indexer;
mod normalize;
mod revision;

// === Error Types ===
pub use error::{IndexError, Result};

// === Normalization ===
pub use normalize::normalize;

// === Revision Rules ===
pub use revision::{
    Disabled, LetterDigit, PatternRule, RevisionRule, RevisionRuleConfig, Separated,
    TrailingLetter,
};

// === Indexing ===
pub use indexer::{AbortSignal, Index, IndexOptions, IndexStats, build_index, classify_path};
