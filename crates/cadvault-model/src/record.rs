use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SuffixTag;

/// One row of the parts list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub item: String,
    /// Informational only; resolution never reads it.
    pub description: String,
    pub revision: Option<String>,
}

impl PartRecord {
    pub fn new(item: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            description: description.into(),
            revision: None,
        }
    }

    /// Attach a revision; blank values are treated as no revision.
    #[must_use]
    pub fn with_revision(mut self, revision: Option<&str>) -> Self {
        self.revision = revision
            .map(str::trim)
            .filter(|rev| !rev.is_empty())
            .map(str::to_string);
        self
    }

    /// Requested revision in the upper-case form used by revision hints.
    pub fn revision_key(&self) -> Option<String> {
        self.revision.as_deref().map(str::to_uppercase)
    }
}

/// Canonical identifier: base token plus the marker that was stripped from it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NormalizedIdentifier {
    pub base_token: String,
    pub suffix_tag: Option<SuffixTag>,
}

impl NormalizedIdentifier {
    pub fn new(base_token: impl Into<String>, suffix_tag: Option<SuffixTag>) -> Self {
        Self {
            base_token: base_token.into(),
            suffix_tag,
        }
    }
}

impl fmt::Display for NormalizedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suffix_tag {
            Some(tag) => write!(f, "{}[{}]", self.base_token, tag),
            None => f.write_str(&self.base_token),
        }
    }
}
