//! Render work-list and the dry-run views over resolution results.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use cadvault_model::{DocumentType, ItemStatus, RenderJob, ResolutionResult};

use crate::resolver::SkippedRow;

/// Ordered view over a run's resolution results.
///
/// Every view is computed from the same results; nothing is re-resolved.
#[derive(Debug, Clone, Copy)]
pub struct WorkList<'a> {
    results: &'a [ResolutionResult],
    skipped: &'a [SkippedRow],
}

impl<'a> WorkList<'a> {
    pub fn new(results: &'a [ResolutionResult]) -> Self {
        Self {
            results,
            skipped: &[],
        }
    }

    #[must_use]
    pub fn with_skipped(mut self, skipped: &'a [SkippedRow]) -> Self {
        self.skipped = skipped;
        self
    }

    /// One job per result with at least one resolved file, in input order.
    ///
    /// Ambiguous and missing document types are left out of `files`.
    pub fn build(&self) -> Vec<RenderJob> {
        self.results
            .iter()
            .filter(|result| result.has_resolved())
            .map(|result| RenderJob {
                item: result.item.clone(),
                files: result.resolved_files().cloned().collect(),
            })
            .collect()
    }

    /// Per-item status plus totals.
    pub fn test_view(&self) -> TestReport {
        let mut totals = ReportTotals {
            skipped: self.skipped.len(),
            ..ReportTotals::default()
        };
        let items: Vec<ItemReport> = self
            .results
            .iter()
            .map(|result| {
                let report = ItemReport::from_result(result);
                totals.items += 1;
                totals.files += report.matched.len();
                match report.status {
                    ItemStatus::Resolved => totals.resolved += 1,
                    ItemStatus::Ambiguous => totals.ambiguous += 1,
                    ItemStatus::Missing => totals.missing += 1,
                }
                report
            })
            .collect();

        TestReport {
            items,
            totals,
            skipped: self.skipped.to_vec(),
        }
    }

    /// `(item, document type, path)` for every resolved file, in job order.
    pub fn print_view(&self) -> Vec<PrintEntry> {
        self.results
            .iter()
            .flat_map(|result| {
                result.resolved_files().map(|file| PrintEntry {
                    item: result.item.clone(),
                    document_type: file.document_type,
                    path: file.path.clone(),
                })
            })
            .collect()
    }
}

/// Status of one item in the test view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub item: String,
    pub status: ItemStatus,
    pub matched: Vec<DocumentType>,
    pub ambiguous: Vec<DocumentType>,
    pub missing: Vec<DocumentType>,
}

impl ItemReport {
    fn from_result(result: &ResolutionResult) -> Self {
        Self {
            item: result.item.clone(),
            status: result.status(),
            matched: result
                .resolved_files()
                .map(|file| file.document_type)
                .collect(),
            ambiguous: result.ambiguous.iter().copied().collect(),
            missing: result.missing.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub items: usize,
    pub resolved: usize,
    pub ambiguous: usize,
    pub missing: usize,
    pub skipped: usize,
    /// Resolved files across all items.
    pub files: usize,
}

impl ReportTotals {
    pub fn has_unresolved(&self) -> bool {
        self.ambiguous > 0 || self.missing > 0
    }
}

/// Dry-run "test" report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub items: Vec<ItemReport>,
    pub totals: ReportTotals,
    pub skipped: Vec<SkippedRow>,
}

impl TestReport {
    /// First report for `item` (parts lists may repeat an item).
    pub fn get(&self, item: &str) -> Option<&ItemReport> {
        self.items.iter().find(|report| report.item == item)
    }
}

/// One line of the dry-run "print" report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintEntry {
    pub item: String,
    pub document_type: DocumentType,
    pub path: PathBuf,
}

/// Tab-separated rendering of the print view.
pub fn render_print_report(entries: &[PrintEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.item);
        out.push('\t');
        out.push_str(entry.document_type.label());
        out.push('\t');
        out.push_str(&entry.path.display().to_string());
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JobLine<'a> {
    sequence: usize,
    job_name: String,
    item: &'a str,
    files: Vec<JobFile<'a>>,
}

#[derive(Serialize)]
struct JobFile<'a> {
    document_type: DocumentType,
    path: &'a std::path::Path,
}

/// Write jobs as JSON lines for the automation driver, one job per line.
pub fn write_job_lines<W: Write>(jobs: &[RenderJob], mut writer: W) -> io::Result<()> {
    for (sequence, job) in jobs.iter().enumerate() {
        let line = JobLine {
            sequence: sequence + 1,
            job_name: job.job_name(),
            item: &job.item,
            files: job
                .files
                .iter()
                .map(|file| JobFile {
                    document_type: file.document_type,
                    path: &file.path,
                })
                .collect(),
        };
        serde_json::to_writer(&mut writer, &line)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
