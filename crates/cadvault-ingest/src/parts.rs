//! Parts-list CSV reading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use cadvault_model::PartRecord;

use crate::error::{IngestError, Result};

const ITEM_HEADERS: &[&str] = &["item", "part number", "part"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "desc"];
const REVISION_HEADERS: &[&str] = &["revision", "rev"];

/// A parts-list row with its spreadsheet row number (header is row 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRow {
    pub row: usize,
    pub record: PartRecord,
}

/// Rows read from one parts list, in file order.
#[derive(Debug, Clone, Default)]
pub struct PartsList {
    pub source: PathBuf,
    pub rows: Vec<PartRow>,
}

impl PartsList {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a parts list from a CSV file.
pub fn read_parts_csv(path: &Path) -> Result<PartsList> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let parts = read_parts(file, path)?;
    info!(
        path = %path.display(),
        rows = parts.len(),
        "parts list loaded"
    );
    Ok(parts)
}

/// Read a parts list from any reader; `source` is only used in errors.
///
/// Rows with a blank item are kept so the resolver can report them against
/// their row number. Rows where every cell is blank are dropped.
pub fn read_parts<R: Read>(reader: R, source: &Path) -> Result<PartsList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(source, &e))?
        .clone();

    let idx_item =
        header_index(&headers, ITEM_HEADERS).ok_or_else(|| IngestError::MissingColumn {
            column: "Item".to_string(),
            path: source.to_path_buf(),
        })?;
    let idx_description = header_index(&headers, DESCRIPTION_HEADERS);
    let idx_revision = header_index(&headers, REVISION_HEADERS);

    let mut rows = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(source, &e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = record
            .position()
            .map_or(offset + 2, |pos| pos.line() as usize);
        let item = get_string(&record, Some(idx_item)).unwrap_or_default();
        let description = get_string(&record, idx_description).unwrap_or_default();
        let revision = get_string(&record, idx_revision);
        debug!(row, item = %item, revision = ?revision, "parts row");
        rows.push(PartRow {
            row,
            record: PartRecord::new(item, description).with_revision(revision.as_deref()),
        });
    }

    Ok(PartsList {
        source: source.to_path_buf(),
        rows,
    })
}

fn header_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim_matches('\u{feff}').trim();
        names.iter().any(|name| h.eq_ignore_ascii_case(name))
    })
}

fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<PartsList> {
        read_parts(text.as_bytes(), Path::new("parts.csv"))
    }

    #[test]
    fn test_reads_rows_in_order() {
        let parts = parse("Item,Description,Revision\n101,Bracket,A\n102,Plate,\n103,Gusset,b\n")
            .unwrap();
        let items: Vec<&str> = parts.rows.iter().map(|r| r.record.item.as_str()).collect();
        assert_eq!(items, vec!["101", "102", "103"]);
        assert_eq!(parts.rows[0].row, 2);
        assert_eq!(parts.rows[1].record.revision, None);
        assert_eq!(parts.rows[2].record.revision.as_deref(), Some("b"));
    }

    #[test]
    fn test_headers_case_insensitive_with_bom() {
        let parts = parse("\u{feff}ITEM , rev\n19136261SGT,C\n").unwrap();
        assert_eq!(parts.rows[0].record.item, "19136261SGT");
        assert_eq!(parts.rows[0].record.description, "");
        assert_eq!(parts.rows[0].record.revision.as_deref(), Some("C"));
    }

    #[test]
    fn test_blank_item_kept_blank_row_dropped() {
        let parts = parse("Item,Description\n , orphan description\n,\n104,Cover\n").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.rows[0].record.item, "");
        assert_eq!(parts.rows[0].row, 2);
        assert_eq!(parts.rows[1].row, 4);
    }

    #[test]
    fn test_missing_item_column() {
        let err = parse("Description,Revision\nBracket,A\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }
}
