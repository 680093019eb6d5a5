//! Query space generation: seed keywords crossed with modifiers

use crate::catalog::ModifierCatalog;
use crate::types::{Keyword, Modifier, ModifierCategory, Query};
use serde::{Deserialize, Serialize};

/// Declarative modifier selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierConfig {
    /// Include the interrogative catalog
    #[serde(default = "default_true")]
    pub include_interrogative: bool,
    /// Include the transactional catalog
    #[serde(default = "default_true")]
    pub include_transactional: bool,
    /// Extra modifiers appended after the catalogs
    #[serde(default)]
    pub custom_modifiers: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            include_interrogative: true,
            include_transactional: true,
            custom_modifiers: Vec::new(),
        }
    }
}

impl ModifierConfig {
    /// Only the given custom modifiers, no built-in catalog
    pub fn custom_only<I, S>(modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include_interrogative: false,
            include_transactional: false,
            custom_modifiers: modifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve the selected modifiers in expansion order
    pub fn resolve(&self, catalog: &ModifierCatalog) -> Vec<Modifier> {
        let mut selected = Vec::new();
        if self.include_interrogative {
            selected.extend(catalog.interrogative());
        }
        if self.include_transactional {
            selected.extend(catalog.transactional());
        }
        selected.extend(
            self.custom_modifiers
                .iter()
                .filter_map(|m| Modifier::new(m, ModifierCategory::Custom)),
        );
        selected
    }
}

/// Cross product of keywords and selected modifiers
#[derive(Debug, Clone)]
pub struct QueryExpander {
    keywords: Vec<Keyword>,
    modifiers: Vec<Modifier>,
}

impl QueryExpander {
    /// Create an expander over already-resolved modifiers
    pub fn new(keywords: Vec<Keyword>, modifiers: Vec<Modifier>) -> Self {
        Self {
            keywords,
            modifiers,
        }
    }

    /// Create an expander from a modifier configuration
    pub fn from_config(
        keywords: Vec<Keyword>,
        config: &ModifierConfig,
        catalog: &ModifierCatalog,
    ) -> Self {
        Self::new(keywords, config.resolve(catalog))
    }

    /// Total number of queries; the progress denominator
    pub fn total(&self) -> usize {
        self.keywords.len() * self.modifiers.len()
    }

    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Selected modifiers in expansion order
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Lazily yield queries: each keyword, then each modifier
    pub fn queries(&self) -> impl Iterator<Item = Query> + '_ {
        self.keywords
            .iter()
            .flat_map(move |keyword| {
                self.modifiers
                    .iter()
                    .map(move |modifier| (keyword, modifier))
            })
            .enumerate()
            .map(|(index, (keyword, modifier))| Query {
                index,
                keyword: keyword.clone(),
                modifier: modifier.clone(),
            })
    }
}
