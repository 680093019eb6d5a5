//! Core value types shared by every pipeline stage

use crate::{KeyseedError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A seed keyword: trimmed, lowercased and never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Normalize and validate a raw keyword
    ///
    /// Blank input is a precondition failure and is rejected here, before any
    /// query is generated for it.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(KeyseedError::validation("keyword cannot be empty"));
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized keyword text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Keyword {
    type Error = KeyseedError;

    fn try_from(value: String) -> Result<Self> {
        Keyword::new(value)
    }
}

impl From<Keyword> for String {
    fn from(value: Keyword) -> Self {
        value.0
    }
}

/// Parse a list of raw keywords, skipping blank entries and duplicates
///
/// Order of first appearance is kept.
pub fn parse_keywords<I, S>(raw: I) -> Vec<Keyword>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .filter_map(|s| Keyword::new(s).ok())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Which catalog a modifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierCategory {
    /// Question words ("comment", "pourquoi", "vs")
    Interrogative,
    /// Purchase intent ("acheter", "pas cher")
    Transactional,
    /// Supplied by the caller at run time
    Custom,
}

/// A word or phrase combined with a keyword to provoke varied suggestions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    text: String,
    category: ModifierCategory,
}

impl Modifier {
    /// Create a modifier, returning `None` for blank text
    pub fn new(text: impl AsRef<str>, category: ModifierCategory) -> Option<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
                category,
            })
        }
    }

    /// Modifier text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Catalog the modifier came from
    pub fn category(&self) -> ModifierCategory {
        self.category
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One unit of network work: a keyword paired with a modifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Position in the expanded query space
    pub index: usize,
    /// Seed keyword
    pub keyword: Keyword,
    /// Modifier
    pub modifier: Modifier,
}

impl Query {
    /// Search phrase sent upstream: `{modifier} * {keyword}`
    pub fn search_phrase(&self) -> String {
        format!("{} * {}", self.modifier, self.keyword)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.keyword, self.modifier)
    }
}

/// A raw suggestion item as returned by the autocomplete service
///
/// The service normally returns flat strings, but some responses nest
/// sequences inside the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionItem {
    /// Plain suggestion text
    Text(String),
    /// Nested sequence of items
    List(Vec<SuggestionItem>),
}

impl SuggestionItem {
    /// Textual form used by bracket scanning
    ///
    /// Lists render as `[a, b]`, recursively.
    pub fn to_text(&self) -> String {
        match self {
            SuggestionItem::Text(s) => s.clone(),
            SuggestionItem::List(items) => {
                let inner: Vec<String> = items.iter().map(SuggestionItem::to_text).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }

    /// Text leaves of this item, depth first
    pub fn leaves(&self) -> Vec<&str> {
        match self {
            SuggestionItem::Text(s) => vec![s.as_str()],
            SuggestionItem::List(items) => items.iter().flat_map(SuggestionItem::leaves).collect(),
        }
    }
}

impl From<&serde_json::Value> for SuggestionItem {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => SuggestionItem::Text(s.clone()),
            serde_json::Value::Array(items) => {
                SuggestionItem::List(items.iter().map(SuggestionItem::from).collect())
            }
            other => SuggestionItem::Text(other.to_string()),
        }
    }
}
