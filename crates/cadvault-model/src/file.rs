use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{DocumentType, SuffixTag};

/// A CAD file discovered under the library root at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub base_token: String,
    pub document_type: DocumentType,
    pub suffix_tag: Option<SuffixTag>,
    /// Upper-cased revision code parsed from the filename.
    pub revision_hint: Option<String>,
}

impl IndexedFile {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    pub fn matches_revision(&self, revision: &str) -> bool {
        self.revision_hint
            .as_deref()
            .is_some_and(|hint| hint.eq_ignore_ascii_case(revision))
    }
}
