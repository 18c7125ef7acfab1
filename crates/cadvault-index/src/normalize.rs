//! Identifier normalization shared by part numbers and filenames.

use cadvault_model::{ModelError, NormalizedIdentifier, SuffixTag};

/// Characters allowed between a base token and its suffix marker or revision.
pub(crate) const SEPARATORS: &[char] = &[' ', '-', '_', '.'];

/// Convert a raw item cell (or filename stem) into its canonical form.
///
/// Trims whitespace, upper-cases, drops a spreadsheet float artifact
/// (`19136261.0`) and strips one trailing `GT`/`SGT`/`PLT` marker. Markers are
/// tried longest first, so `19136261SGT` yields tag `SGT` rather than base
/// `19136261S` with tag `GT`. A value that *is* a marker (`"GT"`) is kept as
/// its own base token.
///
/// # Errors
///
/// Returns [`ModelError::InvalidIdentifier`] when the input is blank or has no
/// alphanumeric characters.
pub fn normalize(raw: &str) -> Result<NormalizedIdentifier, ModelError> {
    let trimmed = raw.trim();
    if !has_identifier_chars(trimmed) {
        return Err(ModelError::InvalidIdentifier {
            raw: raw.to_string(),
        });
    }

    let upper = trimmed.to_uppercase();
    let upper = strip_float_artifact(&upper);

    for tag in SuffixTag::MATCH_ORDER {
        let Some(head) = upper.strip_suffix(tag.as_str()) else {
            continue;
        };
        let head = head.trim_end_matches(SEPARATORS);
        if has_identifier_chars(head) {
            return Ok(NormalizedIdentifier::new(head, Some(tag)));
        }
        // The whole value is the marker; a shorter marker must not re-split it.
        break;
    }

    Ok(NormalizedIdentifier::new(
        upper.trim_end_matches(SEPARATORS),
        None,
    ))
}

pub(crate) fn has_identifier_chars(value: &str) -> bool {
    value.chars().any(char::is_alphanumeric)
}

fn strip_float_artifact(value: &str) -> &str {
    match value.strip_suffix(".0") {
        Some(head) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => head,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> (String, Option<SuffixTag>) {
        let id = normalize(raw).expect("normalize");
        (id.base_token, id.suffix_tag)
    }

    #[test]
    fn test_plain_identifier() {
        assert_eq!(norm("  19136261 "), ("19136261".to_string(), None));
        assert_eq!(norm("ab-100"), ("AB-100".to_string(), None));
    }

    #[test]
    fn test_longest_marker_first() {
        assert_eq!(
            norm("19136261SGT"),
            ("19136261".to_string(), Some(SuffixTag::Sgt))
        );
        assert_eq!(
            norm("19136261GT"),
            ("19136261".to_string(), Some(SuffixTag::Gt))
        );
        assert_eq!(
            norm("19136261plt"),
            ("19136261".to_string(), Some(SuffixTag::Plt))
        );
    }

    #[test]
    fn test_separated_marker() {
        assert_eq!(
            norm("19136261 - SGT"),
            ("19136261".to_string(), Some(SuffixTag::Sgt))
        );
        assert_eq!(
            norm("19136261_gt"),
            ("19136261".to_string(), Some(SuffixTag::Gt))
        );
    }

    #[test]
    fn test_marker_only_is_not_split() {
        assert_eq!(norm("SGT"), ("SGT".to_string(), None));
        assert_eq!(norm("gt"), ("GT".to_string(), None));
    }

    #[test]
    fn test_float_artifact() {
        assert_eq!(norm("19136261.0"), ("19136261".to_string(), None));
        assert_eq!(norm("AB1.0"), ("AB1.0".to_string(), None));
    }

    #[test]
    fn test_invalid_identifiers() {
        for raw in ["", "   ", "\t", "--", " . "] {
            assert!(
                matches!(normalize(raw), Err(ModelError::InvalidIdentifier { .. })),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
