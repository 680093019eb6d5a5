//! Relevance and noise filtering for candidate tokens

use crate::types::Keyword;
use once_cell::sync::Lazy;
use regex::Regex;

static SHORT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}$").expect("short number pattern is valid"));

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after cleanup
    Empty,
    /// Bare one- or two-digit number
    ShortNumber,
    /// Does not contain the source keyword
    Irrelevant,
}

/// Keeps tokens that relate back to their source keyword
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceFilter;

impl RelevanceFilter {
    /// Create a filter
    pub fn new() -> Self {
        Self
    }

    /// Check a single token; rules are applied in order
    pub fn check(&self, keyword: &Keyword, token: &str) -> Result<(), Rejection> {
        if token.is_empty() {
            return Err(Rejection::Empty);
        }
        if SHORT_NUMBER.is_match(token) {
            return Err(Rejection::ShortNumber);
        }
        if !token.contains(keyword.as_str()) {
            return Err(Rejection::Irrelevant);
        }
        Ok(())
    }

    /// Keep only relevant, non-noise tokens
    pub fn filter(&self, keyword: &Keyword, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|token| match self.check(keyword, token) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::trace!(keyword = %keyword, token = %token, ?reason, "token dropped");
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(s: &str) -> Keyword {
        Keyword::new(s).unwrap()
    }

    #[test]
    fn test_short_numbers_dropped_years_kept() {
        let filter = RelevanceFilter::new();
        // "2024" passes the noise rule; the keyword makes it relevant
        let year = kw("2024");
        assert_eq!(filter.check(&year, "5"), Err(Rejection::ShortNumber));
        assert_eq!(filter.check(&year, "42"), Err(Rejection::ShortNumber));
        assert_eq!(filter.check(&year, "2024"), Ok(()));

        let shoes = kw("shoes");
        assert_eq!(filter.check(&shoes, "5"), Err(Rejection::ShortNumber));
        assert_eq!(filter.check(&shoes, "2024"), Err(Rejection::Irrelevant));
    }

    #[test]
    fn test_relevance_gate() {
        let filter = RelevanceFilter::new();
        let kept = filter.filter(
            &kw("shoes"),
            vec![
                "best shoes".to_string(),
                "best hats".to_string(),
                String::new(),
                "shoes 2024".to_string(),
            ],
        );
        assert_eq!(kept, vec!["best shoes", "shoes 2024"]);
    }

    #[test]
    fn test_relevance_is_case_sensitive() {
        let filter = RelevanceFilter::new();
        assert_eq!(
            filter.check(&kw("shoes"), "Best SHOES"),
            Err(Rejection::Irrelevant)
        );
    }
}
