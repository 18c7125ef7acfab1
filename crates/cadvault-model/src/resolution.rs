//! Resolution outcomes and render jobs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{DocumentType, IndexedFile, NormalizedIdentifier};

/// Outcome of resolving one part record against the index.
///
/// `matches` has an entry for every document type that was required; the
/// value is `None` when that type ended up in `ambiguous` or `missing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub item: String,
    pub identifier: NormalizedIdentifier,
    pub matches: BTreeMap<DocumentType, Option<IndexedFile>>,
    pub ambiguous: BTreeSet<DocumentType>,
    pub missing: BTreeSet<DocumentType>,
    /// Paths that tied for an ambiguous document type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub candidates: BTreeMap<DocumentType, Vec<PathBuf>>,
    /// Document types matched to a file whose revision differs from the
    /// requested one.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub revision_fallback: BTreeSet<DocumentType>,
}

impl ResolutionResult {
    pub fn new(item: impl Into<String>, identifier: NormalizedIdentifier) -> Self {
        Self {
            item: item.into(),
            identifier,
            matches: BTreeMap::new(),
            ambiguous: BTreeSet::new(),
            missing: BTreeSet::new(),
            candidates: BTreeMap::new(),
            revision_fallback: BTreeSet::new(),
        }
    }

    pub fn record_match(&mut self, doc: DocumentType, file: IndexedFile) {
        self.matches.insert(doc, Some(file));
    }

    /// Match `file` even though it does not carry the requested revision.
    pub fn record_revision_fallback(&mut self, doc: DocumentType, file: IndexedFile) {
        self.matches.insert(doc, Some(file));
        self.revision_fallback.insert(doc);
    }

    pub fn record_ambiguous(&mut self, doc: DocumentType, candidates: Vec<PathBuf>) {
        self.matches.insert(doc, None);
        self.ambiguous.insert(doc);
        self.candidates.insert(doc, candidates);
    }

    pub fn record_missing(&mut self, doc: DocumentType) {
        self.matches.insert(doc, None);
        self.missing.insert(doc);
    }

    pub fn matched(&self, doc: DocumentType) -> Option<&IndexedFile> {
        self.matches.get(&doc).and_then(Option::as_ref)
    }

    /// Matched files in part, assembly, drawing order.
    pub fn resolved_files(&self) -> impl Iterator<Item = &IndexedFile> {
        self.matches.values().filter_map(Option::as_ref)
    }

    pub fn has_resolved(&self) -> bool {
        self.resolved_files().next().is_some()
    }

    pub fn status(&self) -> ItemStatus {
        if !self.ambiguous.is_empty() {
            ItemStatus::Ambiguous
        } else if !self.missing.is_empty() {
            ItemStatus::Missing
        } else {
            ItemStatus::Resolved
        }
    }
}

/// Per-item summary used by the dry-run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Every required document type matched exactly one file.
    Resolved,
    /// At least one document type had several equally valid files.
    Ambiguous,
    /// At least one required document type had no file.
    Missing,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Resolved => "resolved",
            ItemStatus::Ambiguous => "ambiguous",
            ItemStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files handed to the automation driver for one item.
///
/// `files` is ordered part, assembly, drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderJob {
    pub item: String,
    pub files: Vec<IndexedFile>,
}

impl RenderJob {
    /// Folder name the renderer writes this job's output into.
    ///
    /// Spreadsheet exports sometimes turn numeric part numbers into floats
    /// (`19136261.0`); that suffix is dropped and any remaining dots become
    /// underscores.
    pub fn job_name(&self) -> String {
        let trimmed = self.item.trim();
        let base = match trimmed.strip_suffix(".0") {
            Some(head) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => head,
            _ => trimmed,
        };
        base.replace('.', "_")
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.path.as_path())
    }
}
