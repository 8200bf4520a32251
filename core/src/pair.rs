//! Input listing parsing
//!
//! The input is a plain-text listing with one `feature<DELIM>word` record per
//! line. Parsing normalizes both fields (trim + lowercase), drops duplicate
//! words keeping the first occurrence, and sorts by word so that downstream
//! exports are deterministic and reviewable.

use crate::{MinpairError, Result};

/// One half of a minimal pair: a word plus the phonetic feature that
/// distinguishes it from its partners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairComponent {
    pub distinctive_feature: String,
    pub word: String,
}

/// Parse a raw listing into deduplicated, sorted pair components.
///
/// A record missing its word field is a fatal input error.
pub fn parse_components(input: &str, delimiter: char) -> Result<Vec<PairComponent>> {
    let mut components: Vec<PairComponent> = Vec::new();
    for line in input.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Only the first two fields matter; trailing fields are discarded
        let mut fields = line.split(delimiter);
        let feature = fields.next().unwrap_or_default().trim().to_lowercase();
        let word = fields
            .next()
            .ok_or_else(|| MinpairError::InvalidRecord(format!("missing word field: {line:?}")))?
            .trim()
            .to_lowercase();
        if word.is_empty() {
            return Err(MinpairError::InvalidRecord(format!(
                "empty word field: {line:?}"
            )));
        }
        // First occurrence wins
        if !components.iter().any(|c| c.word == word) {
            components.push(PairComponent {
                distinctive_feature: feature,
                word,
            });
        }
    }
    components.sort_by(|a, b| a.word.cmp(&b.word));
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_lowercases_and_sorts() {
        let input = "voicing;ba\nvoicing;pa\ntone;ma";
        let components = parse_components(input, ';').unwrap();
        let words: Vec<&str> = components.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["ba", "ma", "pa"]);
        assert_eq!(components[0].distinctive_feature, "voicing");
        assert_eq!(components[1].distinctive_feature, "tone");
    }

    #[test]
    fn test_duplicate_word_keeps_first_occurrence() {
        let input = "voicing;ba\ntone;BA\naspiration;pa";
        let components = parse_components(input, ';').unwrap();
        assert_eq!(components.len(), 2);
        let ba = components.iter().find(|c| c.word == "ba").unwrap();
        assert_eq!(ba.distinctive_feature, "voicing");
    }

    #[test]
    fn test_fields_are_normalized() {
        let components = parse_components("  Voicing ;  BA  ", ';').unwrap();
        assert_eq!(components[0].distinctive_feature, "voicing");
        assert_eq!(components[0].word, "ba");
    }

    #[test]
    fn test_pipe_delimiter_variant() {
        let components = parse_components("tone|ma\nvoicing|ba", '|').unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].word, "ba");
    }

    #[test]
    fn test_trailing_fields_are_discarded() {
        let components = parse_components("voicing;ba;stray;fields", ';').unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].word, "ba");
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let components = parse_components("\nvoicing;ba\n\n\ntone;ma\n", ';').unwrap();
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn test_missing_word_field_is_fatal() {
        let err = parse_components("voicing;ba\njust-a-feature", ';').unwrap_err();
        assert!(matches!(err, MinpairError::InvalidRecord(_)));
    }

    #[test]
    fn test_empty_word_field_is_fatal() {
        let err = parse_components("voicing; ", ';').unwrap_err();
        assert!(matches!(err, MinpairError::InvalidRecord(_)));
    }
}
