//! Built-in modifier catalogs

use crate::types::{Modifier, ModifierCategory};

/// French question words and connectors
pub const FRENCH_INTERROGATIVE: &[&str] = &[
    "comment",
    "pourquoi",
    "laquelle",
    "lequel",
    "ou",
    "quand",
    "que",
    "qu'est ce",
    "quel",
    "vs",
    "qui",
    "quelle",
    "quoi",
    "avec",
    "pour",
    "sans",
    "comme",
    "contre",
    "et",
];

/// French purchase-intent modifiers
pub const FRENCH_TRANSACTIONAL: &[&str] = &[
    "acheter",
    "pas cher",
    "comparatif",
    "guide d'achat",
    "le meilleur",
];

/// English question words and connectors
pub const ENGLISH_INTERROGATIVE: &[&str] = &[
    "how", "why", "which", "where", "when", "what", "who", "vs", "with", "for", "without", "like",
    "versus", "and",
];

/// English purchase-intent modifiers
pub const ENGLISH_TRANSACTIONAL: &[&str] = &["buy", "cheap", "best", "review", "comparison"];

/// A pair of built-in modifier lists for one language
#[derive(Debug, Clone, Copy)]
pub struct ModifierCatalog {
    interrogative: &'static [&'static str],
    transactional: &'static [&'static str],
}

impl ModifierCatalog {
    /// French catalog (default, matches `hl=fr`)
    pub fn french() -> Self {
        Self {
            interrogative: FRENCH_INTERROGATIVE,
            transactional: FRENCH_TRANSACTIONAL,
        }
    }

    /// English catalog
    pub fn english() -> Self {
        Self {
            interrogative: ENGLISH_INTERROGATIVE,
            transactional: ENGLISH_TRANSACTIONAL,
        }
    }

    /// Catalog for a suggestion language code; anything but `en` gets French
    pub fn for_language(language: &str) -> Self {
        if language.trim().eq_ignore_ascii_case("en") {
            Self::english()
        } else {
            Self::french()
        }
    }

    /// Interrogative modifiers in catalog order
    pub fn interrogative(&self) -> Vec<Modifier> {
        to_modifiers(self.interrogative, ModifierCategory::Interrogative)
    }

    /// Transactional modifiers in catalog order
    pub fn transactional(&self) -> Vec<Modifier> {
        to_modifiers(self.transactional, ModifierCategory::Transactional)
    }
}

impl Default for ModifierCatalog {
    fn default() -> Self {
        Self::french()
    }
}

fn to_modifiers(words: &[&str], category: ModifierCategory) -> Vec<Modifier> {
    words
        .iter()
        .filter_map(|w| Modifier::new(w, category))
        .collect()
}
