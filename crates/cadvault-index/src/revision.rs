//! Revision hint extraction from filename stems.
//!
//! Libraries differ in how they encode revisions (`19136261A`, `19136261-B`,
//! `19136261A2`, ...), so extraction is a pluggable [`RevisionRule`]. The
//! built-in rules cover the common conventions and [`PatternRule`] accepts a
//! user supplied regex.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use cadvault_model::SuffixTag;

use crate::error::{IndexError, Result};
use crate::normalize::{SEPARATORS, has_identifier_chars};

/// Splits an upper-cased filename stem into `(remainder, revision)`.
///
/// Returning `None` means the stem carries no revision; the whole stem is then
/// normalized as the identifier.
pub trait RevisionRule: fmt::Debug + Send + Sync {
    fn split<'a>(&self, stem: &'a str) -> Option<(&'a str, &'a str)>;
}

/// A single letter glued to the part number (`19136261A`) or set off by a
/// separator (`19136261-A`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingLetter;

impl RevisionRule for TrailingLetter {
    fn split<'a>(&self, stem: &'a str) -> Option<(&'a str, &'a str)> {
        if let Some((head, token)) = separated_token(stem) {
            if token.len() == 1 && token.chars().all(|c| c.is_ascii_alphabetic()) {
                return Some((head, token));
            }
        }
        glued_revision(stem, 0)
    }
}

/// Like [`TrailingLetter`] but the letter may be followed by up to
/// `max_digits` digits (`19136261A2`).
#[derive(Debug, Clone, Copy)]
pub struct LetterDigit {
    pub max_digits: usize,
}

impl Default for LetterDigit {
    fn default() -> Self {
        Self { max_digits: 2 }
    }
}

impl RevisionRule for LetterDigit {
    fn split<'a>(&self, stem: &'a str) -> Option<(&'a str, &'a str)> {
        if let Some((head, token)) = separated_token(stem) {
            if is_revision_token(token, 1, self.max_digits) {
                return Some((head, token));
            }
        }
        glued_revision(stem, self.max_digits)
    }
}

/// Only separator-delimited tokens count (`19136261-AB`, `19136261 C1`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Separated;

impl RevisionRule for Separated {
    fn split<'a>(&self, stem: &'a str) -> Option<(&'a str, &'a str)> {
        let (head, token) = separated_token(stem)?;
        if is_revision_token(token, 2, 2) && !is_suffix_marker(token) {
            Some((head, token))
        } else {
            None
        }
    }
}

/// Never extracts a revision.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl RevisionRule for Disabled {
    fn split<'a>(&self, _stem: &'a str) -> Option<(&'a str, &'a str)> {
        None
    }
}

/// User supplied regex with a named `rev` group, anchored at the end of the
/// stem. A trailing `$` in the pattern is optional.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
}

impl PatternRule {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("(?:{pattern})$"))
            .case_insensitive(true)
            .build()
            .map_err(|source| IndexError::InvalidRevisionPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        if !regex.capture_names().flatten().any(|name| name == "rev") {
            return Err(IndexError::MissingRevisionGroup {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self { regex })
    }
}

impl RevisionRule for PatternRule {
    fn split<'a>(&self, stem: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.regex.captures(stem)?;
        let whole = caps.get(0)?;
        let rev = caps.name("rev")?;
        let head = stem[..whole.start()].trim_end_matches(SEPARATORS);
        if rev.as_str().is_empty() || !has_identifier_chars(head) {
            return None;
        }
        Some((head, rev.as_str()))
    }
}

/// Serializable selection of a revision rule, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RevisionRuleConfig {
    #[default]
    TrailingLetter,
    LetterDigit,
    Separated,
    None,
    Pattern { pattern: String },
}

impl RevisionRuleConfig {
    pub fn build(&self) -> Result<Arc<dyn RevisionRule>> {
        Ok(match self {
            Self::TrailingLetter => Arc::new(TrailingLetter),
            Self::LetterDigit => Arc::new(LetterDigit::default()),
            Self::Separated => Arc::new(Separated),
            Self::None => Arc::new(Disabled),
            Self::Pattern { pattern } => Arc::new(PatternRule::new(pattern)?),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::TrailingLetter => "trailing-letter",
            Self::LetterDigit => "letter-digit",
            Self::Separated => "separated",
            Self::None => "none",
            Self::Pattern { pattern } => pattern,
        }
    }
}

/// Last separator-delimited token and the trimmed text before it.
fn separated_token(stem: &str) -> Option<(&str, &str)> {
    let idx = stem.rfind(SEPARATORS)?;
    let token = &stem[idx + 1..];
    let head = stem[..idx].trim_end_matches(SEPARATORS);
    if token.is_empty() || !has_identifier_chars(head) {
        return None;
    }
    Some((head, token))
}

/// Letter plus up to `max_digits` digits directly after a digit.
fn glued_revision(stem: &str, max_digits: usize) -> Option<(&str, &str)> {
    let bytes = stem.as_bytes();
    let mut pos = bytes.len();
    let mut digits = 0;
    while digits < max_digits && pos > 0 && bytes[pos - 1].is_ascii_digit() {
        pos -= 1;
        digits += 1;
    }
    if pos < 2 || !bytes[pos - 1].is_ascii_alphabetic() || !bytes[pos - 2].is_ascii_digit() {
        return None;
    }
    let start = pos - 1;
    Some((&stem[..start], &stem[start..]))
}

fn is_revision_token(token: &str, max_letters: usize, max_digits: usize) -> bool {
    let letters = token
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .count();
    let digits = token.len() - letters;
    (1..=max_letters).contains(&letters)
        && digits <= max_digits
        && token.bytes().skip(letters).all(|b| b.is_ascii_digit())
}

fn is_suffix_marker(token: &str) -> bool {
    SuffixTag::MATCH_ORDER
        .iter()
        .any(|tag| tag.as_str().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_letter() {
        let rule = TrailingLetter;
        assert_eq!(rule.split("19136261A"), Some(("19136261", "A")));
        assert_eq!(rule.split("19136261SGT-B"), Some(("19136261SGT", "B")));
        assert_eq!(rule.split("19136261 C"), Some(("19136261", "C")));
        assert_eq!(rule.split("19136261"), None);
        assert_eq!(rule.split("19136261SGT"), None);
        assert_eq!(rule.split("19136261GT"), None);
        assert_eq!(rule.split("A"), None);
    }

    #[test]
    fn test_letter_digit() {
        let rule = LetterDigit::default();
        assert_eq!(rule.split("19136261A2"), Some(("19136261", "A2")));
        assert_eq!(rule.split("19136261B"), Some(("19136261", "B")));
        assert_eq!(rule.split("19136261-C10"), Some(("19136261", "C10")));
        assert_eq!(rule.split("19136261"), None);
        assert_eq!(rule.split("19136261A123"), None);
    }

    #[test]
    fn test_separated_skips_markers() {
        let rule = Separated;
        assert_eq!(rule.split("19136261-AB"), Some(("19136261", "AB")));
        assert_eq!(rule.split("19136261_GT"), None);
        assert_eq!(rule.split("19136261A"), None);
    }

    #[test]
    fn test_pattern_rule() {
        let rule = PatternRule::new(r"REV(?<rev>[A-Z]+)$").expect("compile");
        assert_eq!(rule.split("19136261_REVC"), Some(("19136261", "C")));
        assert_eq!(rule.split("19136261"), None);

        assert!(matches!(
            PatternRule::new(r"([A-Z])$"),
            Err(IndexError::MissingRevisionGroup { .. })
        ));
        assert!(matches!(
            PatternRule::new(r"(?<rev>[A-Z"),
            Err(IndexError::InvalidRevisionPattern { .. })
        ));
    }

    #[test]
    fn test_pattern_rule_anchors_at_stem_end() {
        let rule = PatternRule::new(r"(?<rev>[A-Z])").expect("compile");
        assert_eq!(rule.split("AB100C"), Some(("AB100", "C")));
        assert_eq!(rule.split("AB100"), None);

        let rule = PatternRule::new(r"_(?<rev>\d{2})").expect("compile");
        assert_eq!(rule.split("19136261_01"), Some(("19136261", "01")));
        assert_eq!(rule.split("19136261_01_DRAFT"), None);
    }

    #[test]
    fn test_config_builds_rule() {
        let rule = RevisionRuleConfig::None.build().expect("build");
        assert_eq!(rule.split("19136261A"), None);
        let rule = RevisionRuleConfig::default().build().expect("build");
        assert_eq!(rule.split("19136261A"), Some(("19136261", "A")));
    }
}
