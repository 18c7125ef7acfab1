//! Suffix/revision disambiguation against the index.
//!
//! For every document type the candidate set is narrowed in two steps:
//!
//! 1. **Revision**: when the row names a revision, keep files whose revision
//!    hint equals it (only if at least one does)
//! 2. **Suffix tag**: keep files whose suffix tag equals the identifier's
//!    (including "no tag"), again only if at least one does
//!
//! One survivor is a match, several are reported as ambiguous and none as
//! missing. Ties are never broken by path or scan order. A match that does
//! not carry the requested revision is logged and flagged on the result.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cadvault_index::{Index, normalize};
use cadvault_model::{
    DocumentType, IndexedFile, ItemStatus, ModelError, NormalizedIdentifier, PartRecord,
    ResolutionResult, SuffixTag,
};

/// Outcome of narrowing one document type's candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    Match(&'a IndexedFile),
    Ambiguous(Vec<&'a IndexedFile>),
    Missing,
}

/// A row that could not be resolved at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub item: String,
    pub reason: String,
}

/// Results of resolving a whole parts list, in input order.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRun {
    pub results: Vec<ResolutionResult>,
    pub skipped: Vec<SkippedRow>,
}

/// Resolves part records against an immutable [`Index`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a Index,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a Index {
        self.index
    }

    /// Resolve one record.
    ///
    /// Part is always required; assembly and drawing only when the index holds
    /// files of that type for the base token.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidIdentifier`] for a blank item.
    pub fn resolve(&self, record: &PartRecord) -> Result<ResolutionResult, ModelError> {
        let (identifier, revision) = self.identify(record)?;
        let mut result = ResolutionResult::new(record.item.trim(), identifier.clone());

        for doc in DocumentType::ALL {
            let candidates: Vec<&IndexedFile> = self
                .index
                .lookup_type(&identifier.base_token, doc)
                .collect();
            if candidates.is_empty() && doc != DocumentType::Part {
                continue;
            }
            match select(candidates, revision.as_deref(), identifier.suffix_tag) {
                Selection::Match(file) => match revision.as_deref() {
                    Some(requested) if !file.matches_revision(requested) => {
                        warn!(
                            item = %result.item,
                            document_type = %doc,
                            requested,
                            found = ?file.revision_hint,
                            path = %file.path.display(),
                            "requested revision not in library, using closest file"
                        );
                        result.record_revision_fallback(doc, file.clone());
                    }
                    _ => result.record_match(doc, file.clone()),
                },
                Selection::Ambiguous(files) => {
                    let paths = files.iter().map(|file| file.path.clone()).collect();
                    result.record_ambiguous(doc, paths);
                }
                Selection::Missing => result.record_missing(doc),
            }
        }

        Ok(result)
    }

    /// Identifier and requested revision for `record`.
    ///
    /// When the normalized item is unknown to the index it is split with the
    /// index's revision rule, the same way filenames are (`19136261A`). The
    /// split code is used only if the row names no revision itself.
    fn identify(
        &self,
        record: &PartRecord,
    ) -> Result<(NormalizedIdentifier, Option<String>), ModelError> {
        let identifier = normalize(&record.item)?;
        let revision = record.revision_key();
        if !self.index.lookup(&identifier.base_token).is_empty() {
            return Ok((identifier, revision));
        }

        let stem = record.item.trim().to_uppercase();
        let Some((head, code)) = self.index.revision_rule().split(&stem) else {
            return Ok((identifier, revision));
        };
        match normalize(head) {
            Ok(split) if !self.index.lookup(&split.base_token).is_empty() => {
                debug!(
                    item = %stem,
                    base_token = %split.base_token,
                    revision = code,
                    "item carries a revision code"
                );
                Ok((split, revision.or_else(|| Some(code.to_string()))))
            }
            _ => Ok((identifier, revision)),
        }
    }

    /// Resolve every `(row number, record)` pair, fanning out over `threads`
    /// workers when above one.
    ///
    /// Results keep the order of `rows` regardless of thread count. Rows with
    /// invalid identifiers are collected in [`ResolutionRun::skipped`].
    pub fn resolve_rows(&self, rows: &[(usize, &PartRecord)], threads: usize) -> ResolutionRun {
        let start = Instant::now();
        let outcomes = self.resolve_records(rows, threads);

        let mut run = ResolutionRun::default();
        for (&(row, record), outcome) in rows.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    log_result(row, &result);
                    run.results.push(result);
                }
                Err(error) => {
                    warn!(row, %error, "skipping row");
                    run.skipped.push(SkippedRow {
                        row,
                        item: record.item.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            rows = rows.len(),
            resolved = run.results.len(),
            skipped = run.skipped.len(),
            threads,
            duration_ms = start.elapsed().as_millis(),
            "resolution complete"
        );
        run
    }

    fn resolve_records(
        &self,
        rows: &[(usize, &PartRecord)],
        threads: usize,
    ) -> Vec<Result<ResolutionResult, ModelError>> {
        if threads > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                // Indexed collect keeps input order.
                Ok(pool) => {
                    return pool.install(|| {
                        rows.par_iter()
                            .map(|&(_, record)| self.resolve(record))
                            .collect()
                    });
                }
                Err(error) => {
                    warn!(%error, threads, "thread pool unavailable, resolving sequentially");
                }
            }
        }
        rows.iter()
            .map(|&(_, record)| self.resolve(record))
            .collect()
    }
}

/// Narrow `candidates` for one document type.
pub fn select<'a>(
    candidates: Vec<&'a IndexedFile>,
    revision: Option<&str>,
    suffix_tag: Option<SuffixTag>,
) -> Selection<'a> {
    let mut pool = candidates;

    if let Some(revision) = revision {
        let exact: Vec<&IndexedFile> = pool
            .iter()
            .copied()
            .filter(|file| file.matches_revision(revision))
            .collect();
        if !exact.is_empty() {
            pool = exact;
        }
    }

    if pool.len() > 1 {
        let tagged: Vec<&IndexedFile> = pool
            .iter()
            .copied()
            .filter(|file| file.suffix_tag == suffix_tag)
            .collect();
        if !tagged.is_empty() {
            pool = tagged;
        }
    }

    match pool.len() {
        0 => Selection::Missing,
        1 => Selection::Match(pool[0]),
        _ => Selection::Ambiguous(pool),
    }
}

fn log_result(row: usize, result: &ResolutionResult) {
    match result.status() {
        ItemStatus::Resolved => debug!(
            row,
            item = %result.item,
            files = result.resolved_files().count(),
            "resolved"
        ),
        ItemStatus::Ambiguous => warn!(
            row,
            item = %result.item,
            ambiguous = ?result.ambiguous,
            "ambiguous files, none selected"
        ),
        ItemStatus::Missing => debug!(
            row,
            item = %result.item,
            missing = ?result.missing,
            "missing files"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str, tag: Option<SuffixTag>, rev: Option<&str>) -> IndexedFile {
        IndexedFile {
            path: PathBuf::from(name),
            base_token: "19136261".to_string(),
            document_type: DocumentType::Part,
            suffix_tag: tag,
            revision_hint: rev.map(str::to_string),
        }
    }

    #[test]
    fn test_select_revision_exact() {
        let a = file("A", None, Some("A"));
        let b = file("B", None, Some("B"));
        assert_eq!(select(vec![&a, &b], Some("B"), None), Selection::Match(&b));
    }

    #[test]
    fn test_select_unknown_revision_falls_back_to_suffix() {
        let plain = file("plain", None, None);
        let gt = file("gt", Some(SuffixTag::Gt), None);
        assert_eq!(
            select(vec![&plain, &gt], Some("Z"), Some(SuffixTag::Gt)),
            Selection::Match(&gt)
        );
        assert_eq!(select(vec![&plain, &gt], None, None), Selection::Match(&plain));
    }

    #[test]
    fn test_select_revision_then_suffix() {
        let plain_b = file("plain_b", None, Some("B"));
        let sgt_b = file("sgt_b", Some(SuffixTag::Sgt), Some("B"));
        let sgt_a = file("sgt_a", Some(SuffixTag::Sgt), Some("A"));
        assert_eq!(
            select(vec![&plain_b, &sgt_b, &sgt_a], Some("b"), Some(SuffixTag::Sgt)),
            Selection::Match(&sgt_b)
        );
    }

    #[test]
    fn test_select_ties_are_ambiguous() {
        let a = file("A", None, Some("A"));
        let b = file("B", None, Some("B"));
        assert_eq!(
            select(vec![&a, &b], None, None),
            Selection::Ambiguous(vec![&a, &b])
        );
    }

    #[test]
    fn test_select_unmatched_tag_keeps_pool() {
        let plain = file("plain", None, None);
        assert_eq!(
            select(vec![&plain], None, Some(SuffixTag::Plt)),
            Selection::Match(&plain)
        );
        assert_eq!(select(vec![], None, None), Selection::Missing);
    }
}
