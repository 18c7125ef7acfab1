//! Dry-run views and job export.

use std::path::PathBuf;
use std::sync::Arc;

use cadvault_index::{Index, TrailingLetter};
use cadvault_model::{DocumentType, ItemStatus, PartRecord};
use cadvault_resolve::{Resolver, WorkList, render_print_report, write_job_lines};

fn sample_run() -> Vec<cadvault_model::ResolutionResult> {
    let index = Index::from_paths(
        "lib",
        [
            "lib/101.SLDPRT",
            "lib/101.SLDASM",
            "lib/101.SLDDRW",
            "lib/102A.SLDPRT",
            "lib/102B.SLDPRT",
            "lib/102.SLDDRW",
            "lib/104PLT.SLDPRT",
        ]
        .into_iter()
        .map(PathBuf::from),
        Arc::new(TrailingLetter),
    );
    let records: Vec<PartRecord> = ["101", "102", "103", "104PLT"]
        .into_iter()
        .map(|item| PartRecord::new(item, ""))
        .collect();
    let rows: Vec<(usize, &PartRecord)> = records
        .iter()
        .enumerate()
        .map(|(offset, record)| (offset + 2, record))
        .collect();
    Resolver::new(&index).resolve_rows(&rows, 1).results
}

#[test]
fn test_view_counts_statuses() {
    let results = sample_run();
    let report = WorkList::new(&results).test_view();

    assert_eq!(report.totals.items, 4);
    assert_eq!(report.totals.resolved, 2);
    assert_eq!(report.totals.ambiguous, 1);
    assert_eq!(report.totals.missing, 1);
    assert_eq!(report.totals.files, 5);
    assert!(report.totals.has_unresolved());

    let item = report.get("102").expect("102 reported");
    assert_eq!(item.status, ItemStatus::Ambiguous);
    assert_eq!(item.ambiguous, vec![DocumentType::Part]);
    assert_eq!(item.matched, vec![DocumentType::Drawing]);
    assert_eq!(report.get("103").map(|r| r.status), Some(ItemStatus::Missing));
}

#[test]
fn print_report_snapshot() {
    let results = sample_run();
    let entries = WorkList::new(&results).print_view();
    let report = render_print_report(&entries);
    insta::assert_snapshot!(report);
}

#[test]
fn jobs_export_as_json_lines() {
    let results = sample_run();
    let jobs = WorkList::new(&results).build();
    assert_eq!(jobs.len(), 3);

    let mut buffer = Vec::new();
    write_job_lines(&jobs, &mut buffer).expect("write jobs");
    let text = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["sequence"], 1);
    assert_eq!(lines[0]["job_name"], "101");
    assert_eq!(lines[0]["files"].as_array().map(Vec::len), Some(3));
    assert_eq!(lines[1]["item"], "102");
    assert_eq!(lines[1]["files"][0]["document_type"], "drawing");
    assert_eq!(lines[2]["item"], "104PLT");
}
