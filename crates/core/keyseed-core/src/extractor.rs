//! Candidate token extraction from raw suggestion items
//!
//! Two strategies are available. [`ExtractionMode::Bracketed`] scans the
//! textual form of an item for `[...]` groups and splits them on commas. Items
//! without any bracket group produce nothing, which means plain flat suggestion
//! strings are dropped. That is the historical behaviour and stays the default.
//! [`ExtractionMode::Flatten`] walks nested lists directly and keeps plain
//! strings as single tokens.

use crate::types::SuggestionItem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static BRACKET_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"));

/// Characters that leak into token text from stringified payloads
const STRAY_CHARS: &[char] = &['"', '\'', '[', ']'];

/// Token extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Bracket-group scan of the item text
    #[default]
    Bracketed,
    /// Flatten nested lists; plain text is one token
    Flatten,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bracketed" | "legacy" => Ok(Self::Bracketed),
            "flatten" | "flat" => Ok(Self::Flatten),
            other => Err(format!(
                "unknown extraction mode '{}', expected 'bracketed' or 'flatten'",
                other
            )),
        }
    }
}

/// Turns suggestion items into cleaned candidate tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenExtractor {
    mode: ExtractionMode,
}

impl TokenExtractor {
    /// Create an extractor using the given strategy
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    /// Active strategy
    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Extract candidate tokens from one item
    pub fn extract(&self, item: &SuggestionItem) -> Vec<String> {
        let raw = match self.mode {
            ExtractionMode::Bracketed => bracket_pieces(&item.to_text()),
            ExtractionMode::Flatten => item.leaves().into_iter().map(str::to_string).collect(),
        };
        raw.iter().map(|piece| clean_token(piece)).collect()
    }

    /// Extract candidate tokens from every item, in order
    pub fn extract_all(&self, items: &[SuggestionItem]) -> Vec<String> {
        items.iter().flat_map(|item| self.extract(item)).collect()
    }
}

/// Comma-separated pieces of every bracket group in `text`
fn bracket_pieces(text: &str) -> Vec<String> {
    BRACKET_GROUP
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .flat_map(|group| {
            group
                .as_str()
                .split(',')
                .map(|piece| piece.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Strip stray quote and bracket characters from the token edges
///
/// Inner apostrophes belong to the phrase (`pomme d'api`) and are kept.
pub fn clean_token(token: &str) -> String {
    token.trim().trim_matches(STRAY_CHARS).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> SuggestionItem {
        SuggestionItem::Text(s.to_string())
    }

    #[test]
    fn test_bracket_group_split() {
        let extractor = TokenExtractor::default();
        assert_eq!(extractor.extract(&text("[foo, bar]")), vec!["foo", "bar"]);
    }

    #[test]
    fn test_plain_text_yields_nothing_in_bracketed_mode() {
        let extractor = TokenExtractor::default();
        assert!(extractor.extract(&text("plain suggestion")).is_empty());
    }

    #[test]
    fn test_multiple_groups() {
        let extractor = TokenExtractor::default();
        assert_eq!(
            extractor.extract(&text("x [a, b] y [c]")),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_list_item_is_stringified_with_brackets() {
        let extractor = TokenExtractor::new(ExtractionMode::Bracketed);
        let item = SuggestionItem::List(vec![text("laptop bag"), text("laptop stand")]);
        assert_eq!(extractor.extract(&item), vec!["laptop bag", "laptop stand"]);
    }

    #[test]
    fn test_stray_characters_are_cleaned() {
        let extractor = TokenExtractor::default();
        assert_eq!(
            extractor.extract(&text(r#"['laptop bag', "laptop stand"]"#)),
            vec!["laptop bag", "laptop stand"]
        );
        // the scan stops at the first closing bracket, so `c` is lost
        assert_eq!(
            extractor.extract(&text("[[a, b], c]")),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_inner_apostrophes_survive_cleanup() {
        assert_eq!(clean_token(" 'l'ordinateur portable' "), "l'ordinateur portable");
        assert_eq!(clean_token("\"pomme d'api\"]"), "pomme d'api");
        assert_eq!(clean_token("['']"), "");

        let extractor = TokenExtractor::default();
        let item = SuggestionItem::List(vec![text("pomme d'api rouge"), text("pomme d'api bio")]);
        assert_eq!(
            extractor.extract(&item),
            vec!["pomme d'api rouge", "pomme d'api bio"]
        );
    }

    #[test]
    fn test_flatten_mode_keeps_plain_text() {
        let extractor = TokenExtractor::new(ExtractionMode::Flatten);
        assert_eq!(
            extractor.extract(&text("plain suggestion")),
            vec!["plain suggestion"]
        );
        let nested = SuggestionItem::List(vec![
            text("a"),
            SuggestionItem::List(vec![text("'b'"), text("c")]),
        ]);
        assert_eq!(extractor.extract(&nested), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "Flatten".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::Flatten
        );
        assert_eq!(
            "bracketed".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::Bracketed
        );
        assert!("fuzzy".parse::<ExtractionMode>().is_err());
    }
}
