//! Autocomplete response envelope parsing
//!
//! The `firefox` output format is a JSON array: `[echoed_query, [item, ...], ...]`.
//! Anything else is treated as "no suggestions".

use crate::types::SuggestionItem;
use serde_json::Value;
use thiserror::Error;

/// Why a body could not be read as a suggestion envelope
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// Top-level value is not an array
    #[error("expected a JSON array at the top level")]
    NotAnArray,
    /// Array has fewer than two elements
    #[error("expected at least 2 elements, found {0}")]
    TooShort(usize),
    /// Second element is not an array
    #[error("second element is not an array")]
    ItemsNotArray,
}

/// Decoded suggestion envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEnvelope {
    /// Query string echoed by the service (empty if it was not a string)
    pub echoed_query: String,
    /// Suggestion items
    pub items: Vec<SuggestionItem>,
}

/// Parse a raw body, reporting the reason on failure
pub fn parse_envelope(raw: &str) -> Result<SuggestionEnvelope, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let elements = value.as_array().ok_or(ParseError::NotAnArray)?;
    if elements.len() < 2 {
        return Err(ParseError::TooShort(elements.len()));
    }

    let items = elements[1].as_array().ok_or(ParseError::ItemsNotArray)?;

    Ok(SuggestionEnvelope {
        echoed_query: elements[0].as_str().unwrap_or_default().to_string(),
        items: items
            .iter()
            .filter(|item| !is_empty_item(item))
            .map(SuggestionItem::from)
            .collect(),
    })
}

// null, "", [], false and 0 carry no suggestion
fn is_empty_item(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Object(o) => o.is_empty(),
    }
}

/// Parse a raw body into suggestion items; any deviation yields an empty list
pub fn parse_items(raw: &str) -> Vec<SuggestionItem> {
    parse_envelope(raw)
        .map(|envelope| envelope.items)
        .unwrap_or_default()
}
