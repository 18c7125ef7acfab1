//! Library scan and the immutable file index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use cadvault_model::{DocumentType, IndexedFile};

use crate::error::{IndexError, Result};
use crate::normalize::normalize;
use crate::revision::{RevisionRule, TrailingLetter};

/// Cancellation flag shared between the caller and a running scan.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Options controlling a library scan.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub follow_links: bool,
    pub revision_rule: Arc<dyn RevisionRule>,
    pub abort: Option<AbortSignal>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            revision_rule: Arc::new(TrailingLetter),
            abort: None,
        }
    }
}

impl IndexOptions {
    #[must_use]
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    #[must_use]
    pub fn with_revision_rule(mut self, rule: Arc<dyn RevisionRule>) -> Self {
        self.revision_rule = rule;
        self
    }

    #[must_use]
    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = Some(abort);
        self
    }
}

/// Every CAD file under the library root, grouped by base token.
///
/// Built once per run and never mutated afterwards; files on disk that change
/// after the scan are not reflected.
#[derive(Debug, Clone)]
pub struct Index {
    root: PathBuf,
    entries: BTreeMap<String, Vec<IndexedFile>>,
    file_count: usize,
    revision_rule: Arc<dyn RevisionRule>,
}

/// Summary counts for an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub files: usize,
    pub base_tokens: usize,
    pub parts: usize,
    pub assemblies: usize,
    pub drawings: usize,
    pub tagged: usize,
    pub with_revision: usize,
}

impl Index {
    /// Build an index from an existing path listing without touching the disk.
    ///
    /// Paths that are not CAD documents are skipped.
    pub fn from_paths<I>(root: impl Into<PathBuf>, paths: I, rule: Arc<dyn RevisionRule>) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let files = paths
            .into_iter()
            .filter_map(|path| classify_path(&path, rule.as_ref()))
            .collect();
        Self::from_files(root.into(), files, rule)
    }

    fn from_files(root: PathBuf, files: Vec<IndexedFile>, rule: Arc<dyn RevisionRule>) -> Self {
        let file_count = files.len();
        let mut entries: BTreeMap<String, Vec<IndexedFile>> = BTreeMap::new();
        for file in files {
            entries
                .entry(file.base_token.clone())
                .or_default()
                .push(file);
        }
        for files in entries.values_mut() {
            files.sort_by(|a, b| a.path.cmp(&b.path));
        }

        Self {
            root,
            entries,
            file_count,
            revision_rule: rule,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rule the filenames were split with.
    pub fn revision_rule(&self) -> &dyn RevisionRule {
        self.revision_rule.as_ref()
    }

    /// All files sharing a base token.
    pub fn lookup(&self, base_token: &str) -> &[IndexedFile] {
        self.entries
            .get(base_token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn lookup_type(
        &self,
        base_token: &str,
        doc: DocumentType,
    ) -> impl Iterator<Item = &IndexedFile> {
        self.lookup(base_token)
            .iter()
            .filter(move |file| file.document_type == doc)
    }

    pub fn has_type(&self, base_token: &str, doc: DocumentType) -> bool {
        self.lookup_type(base_token, doc).next().is_some()
    }

    pub fn files(&self) -> impl Iterator<Item = &IndexedFile> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.file_count
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    pub fn base_token_count(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            files: self.file_count,
            base_tokens: self.entries.len(),
            ..IndexStats::default()
        };
        for file in self.files() {
            match file.document_type {
                DocumentType::Part => stats.parts += 1,
                DocumentType::Assembly => stats.assemblies += 1,
                DocumentType::Drawing => stats.drawings += 1,
            }
            if file.suffix_tag.is_some() {
                stats.tagged += 1;
            }
            if file.revision_hint.is_some() {
                stats.with_revision += 1;
            }
        }
        stats
    }
}

/// Recursively scan `root` and index every CAD document found.
///
/// Entries below the root that cannot be read are logged and skipped; an
/// unreadable root is fatal. When the abort signal fires the partial index is
/// discarded.
pub fn build_index(root: &Path, options: &IndexOptions) -> Result<Index> {
    if !root.is_dir() {
        return Err(IndexError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|e| IndexError::DirectoryRead {
        path: root.to_path_buf(),
        source: e,
    })?;

    let start = Instant::now();
    let mut files = Vec::new();
    let mut walked = 0usize;
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        if options.abort.as_ref().is_some_and(AbortSignal::is_aborted) {
            warn!(scanned = files.len(), "index build aborted");
            return Err(IndexError::Aborted {
                scanned: files.len(),
            });
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                if error.depth() == 0 {
                    let source = error
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Err(IndexError::DirectoryRead { path, source });
                }
                warn!(path = %path.display(), %error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        walked += 1;
        if let Some(file) = classify_path(entry.path(), options.revision_rule.as_ref()) {
            files.push(file);
        }
    }

    let index = Index::from_files(
        root.to_path_buf(),
        files,
        Arc::clone(&options.revision_rule),
    );
    info!(
        root = %root.display(),
        walked,
        indexed = index.len(),
        base_tokens = index.base_token_count(),
        duration_ms = start.elapsed().as_millis(),
        "index built"
    );
    Ok(index)
}

/// Classify a single path, or `None` when it is not a CAD document.
pub fn classify_path(path: &Path, rule: &dyn RevisionRule) -> Option<IndexedFile> {
    let document_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentType::from_extension)?;
    let file_name = path.file_name().and_then(|name| name.to_str())?;
    if file_name.starts_with("~$") {
        return None;
    }
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let upper = stem.trim().to_uppercase();

    let (remainder, revision_hint) = match rule.split(&upper) {
        Some((head, rev)) => (head, Some(rev.to_string())),
        None => (upper.as_str(), None),
    };

    let identifier = match normalize(remainder) {
        Ok(identifier) => identifier,
        Err(error) => {
            debug!(path = %path.display(), %error, "skipping file without identifier");
            return None;
        }
    };

    Some(IndexedFile {
        path: path.to_path_buf(),
        base_token: identifier.base_token,
        document_type,
        suffix_tag: identifier.suffix_tag,
        revision_hint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadvault_model::SuffixTag;

    fn classify(name: &str) -> Option<IndexedFile> {
        classify_path(Path::new(name), &TrailingLetter)
    }

    #[test]
    fn test_classify_plain_part() {
        let file = classify("lib/19136261.SLDPRT").unwrap();
        assert_eq!(file.base_token, "19136261");
        assert_eq!(file.document_type, DocumentType::Part);
        assert_eq!(file.suffix_tag, None);
        assert_eq!(file.revision_hint, None);
    }

    #[test]
    fn test_classify_revision_and_suffix() {
        let file = classify("lib/19136261b.sldasm").unwrap();
        assert_eq!(file.base_token, "19136261");
        assert_eq!(file.document_type, DocumentType::Assembly);
        assert_eq!(file.revision_hint.as_deref(), Some("B"));

        let file = classify("lib/19136261SGT-A.SLDDRW").unwrap();
        assert_eq!(file.base_token, "19136261");
        assert_eq!(file.suffix_tag, Some(SuffixTag::Sgt));
        assert_eq!(file.revision_hint.as_deref(), Some("A"));
    }

    #[test]
    fn test_classify_skips_other_files() {
        assert!(classify("lib/19136261.pdf").is_none());
        assert!(classify("lib/~$19136261.SLDDRW").is_none());
        assert!(classify("lib/19136261").is_none());
    }

    #[test]
    fn test_from_paths_groups_by_token() {
        let paths = [
            "lib/a/19136261.SLDPRT",
            "lib/b/19136261GT.SLDPRT",
            "lib/100.SLDASM",
            "lib/notes.txt",
        ]
        .into_iter()
        .map(PathBuf::from);
        let index = Index::from_paths("lib", paths, Arc::new(TrailingLetter));

        assert_eq!(index.len(), 3);
        assert_eq!(index.base_token_count(), 2);
        assert_eq!(index.lookup("19136261").len(), 2);
        assert!(index.has_type("100", DocumentType::Assembly));
        assert!(!index.has_type("100", DocumentType::Part));
        assert!(index.lookup("999").is_empty());

        let stats = index.stats();
        assert_eq!(stats.parts, 2);
        assert_eq!(stats.assemblies, 1);
        assert_eq!(stats.tagged, 1);
    }

    #[test]
    fn test_abort_signal_is_shared() {
        let signal = AbortSignal::new();
        let clone = signal.clone();
        assert!(!signal.is_aborted());
        clone.abort();
        assert!(signal.is_aborted());
    }
}
