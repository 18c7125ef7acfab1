//! Closed vocabularies used by the vault naming conventions.
//!
//! Both enums round-trip through their upper-case string form so they can be
//! read from filenames, configuration and reports alike.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Vendor/variant marker appended to some part numbers.
///
/// - **GT**: e.g. `19136261GT`
/// - **SGT**: e.g. `19136261SGT`
/// - **PLT**: e.g. `19136261PLT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SuffixTag {
    Gt,
    Sgt,
    Plt,
}

impl SuffixTag {
    /// Markers ordered longest first, so `SGT` is tried before `GT`.
    pub const MATCH_ORDER: [SuffixTag; 3] = [SuffixTag::Sgt, SuffixTag::Plt, SuffixTag::Gt];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixTag::Gt => "GT",
            SuffixTag::Sgt => "SGT",
            SuffixTag::Plt => "PLT",
        }
    }
}

impl fmt::Display for SuffixTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuffixTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GT" => Ok(SuffixTag::Gt),
            "SGT" => Ok(SuffixTag::Sgt),
            "PLT" => Ok(SuffixTag::Plt),
            _ => Err(ModelError::UnknownSuffixTag(s.to_string())),
        }
    }
}

/// CAD document kind, identified by file extension.
///
/// The derived ordering (part, assembly, drawing) is the order files appear in
/// a render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// `.SLDPRT`
    Part,
    /// `.SLDASM`
    Assembly,
    /// `.SLDDRW`
    Drawing,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Part,
        DocumentType::Assembly,
        DocumentType::Drawing,
    ];

    /// Upper-case file extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentType::Part => "SLDPRT",
            DocumentType::Assembly => "SLDASM",
            DocumentType::Drawing => "SLDDRW",
        }
    }

    /// Classify a file extension (case-insensitive, leading dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|doc| doc.extension().eq_ignore_ascii_case(ext))
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Part => "part",
            DocumentType::Assembly => "assembly",
            DocumentType::Drawing => "drawing",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(doc) = Self::from_extension(trimmed) {
            return Ok(doc);
        }
        Self::ALL
            .into_iter()
            .find(|doc| doc.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownDocumentType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_match_order_is_longest_first() {
        let lengths: Vec<usize> = SuffixTag::MATCH_ORDER
            .iter()
            .map(|tag| tag.as_str().len())
            .collect();
        assert_eq!(lengths, vec![3, 3, 2]);
    }

    #[test]
    fn document_type_from_extension_ignores_case() {
        assert_eq!(
            DocumentType::from_extension("sldprt"),
            Some(DocumentType::Part)
        );
        assert_eq!(
            DocumentType::from_extension(".SldAsm"),
            Some(DocumentType::Assembly)
        );
        assert_eq!(DocumentType::from_extension("pdf"), None);
    }

    #[test]
    fn document_type_parses_label_or_extension() {
        assert_eq!("drawing".parse::<DocumentType>().ok(), Some(DocumentType::Drawing));
        assert_eq!("SLDDRW".parse::<DocumentType>().ok(), Some(DocumentType::Drawing));
        assert!("step".parse::<DocumentType>().is_err());
    }

    #[test]
    fn document_types_sort_part_assembly_drawing() {
        let mut docs = vec![
            DocumentType::Drawing,
            DocumentType::Part,
            DocumentType::Assembly,
        ];
        docs.sort();
        assert_eq!(docs, DocumentType::ALL.to_vec());
    }
}
