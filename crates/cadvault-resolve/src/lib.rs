//! Vault file resolution.
//!
//! [`Resolver`] maps part records to indexed files one document type at a
//! time, surfacing ties as ambiguity instead of guessing. [`WorkList`] turns
//! the ordered results into render jobs and the dry-run report views.

mod resolver;
mod worklist;

pub use resolver::{ResolutionRun, Resolver, Selection, SkippedRow, select};
pub use worklist::{
    ItemReport, PrintEntry, ReportTotals, TestReport, WorkList, render_print_report,
    write_job_lines,
};
