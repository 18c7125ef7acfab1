//! Tests for cadvault-model types.

use std::path::PathBuf;

use cadvault_model::{
    DocumentType, IndexedFile, ItemStatus, NormalizedIdentifier, PartRecord, RenderJob,
    ResolutionResult, SuffixTag,
};

#[test]
fn blank_revision_is_none() {
    let record = PartRecord::new("19136261", "Bracket").with_revision(Some("   "));
    assert_eq!(record.revision, None);

    let record = PartRecord::new("19136261", "Bracket").with_revision(Some(" b "));
    assert_eq!(record.revision.as_deref(), Some("b"));
    assert_eq!(record.revision_key().as_deref(), Some("B"));
}

#[test]
fn identifier_display_includes_tag() {
    let plain = NormalizedIdentifier::new("19136261", None);
    let tagged = NormalizedIdentifier::new("19136261", Some(SuffixTag::Sgt));
    assert_eq!(plain.to_string(), "19136261");
    assert_eq!(tagged.to_string(), "19136261[SGT]");
}

#[test]
fn revision_match_is_case_insensitive() {
    let file = IndexedFile {
        path: PathBuf::from("lib/19136261B.SLDPRT"),
        base_token: "19136261".to_string(),
        document_type: DocumentType::Part,
        suffix_tag: None,
        revision_hint: Some("B".to_string()),
    };
    assert!(file.matches_revision("b"));
    assert!(!file.matches_revision("A"));
    assert_eq!(file.file_name(), "19136261B.SLDPRT");
}

#[test]
fn resolution_result_serializes() {
    let mut result = ResolutionResult::new(
        "19136261SGT",
        NormalizedIdentifier::new("19136261", Some(SuffixTag::Sgt)),
    );
    result.record_missing(DocumentType::Part);
    let json = serde_json::to_string(&result).expect("serialize result");
    assert!(json.contains("\"SGT\""));
    assert!(json.contains("\"part\""));
    assert!(!json.contains("candidates"));

    let round: ResolutionResult = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(round, result);
    assert_eq!(round.status(), ItemStatus::Missing);
}

#[test]
fn render_job_serializes_paths_in_order() {
    let files = DocumentType::ALL
        .into_iter()
        .map(|doc| IndexedFile {
            path: PathBuf::from(format!("19136261.{}", doc.extension())),
            base_token: "19136261".to_string(),
            document_type: doc,
            suffix_tag: None,
            revision_hint: None,
        })
        .collect();
    let job = RenderJob {
        item: "19136261".to_string(),
        files,
    };
    let value = serde_json::to_value(&job).expect("serialize job");
    let types: Vec<&str> = value["files"]
        .as_array()
        .expect("files array")
        .iter()
        .filter_map(|file| file["document_type"].as_str())
        .collect();
    assert_eq!(types, vec!["part", "assembly", "drawing"]);
}
