//! Suggestion fetching with per-query failure containment
//!
//! A blocked or slow query must not abort the batch, so [`SuggestionFetcher::fetch`]
//! never returns an error. Every failure becomes "no suggestions" plus a
//! diagnostic.

use crate::diagnostics::{DiagnosticSink, Severity};
use crate::parser::{parse_envelope, ParseError};
use crate::transport::{SuggestTransport, TransportError, UserAgentPool};
use crate::types::{Query, SuggestionItem};
use crate::{KeyseedError, Result};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Public Google autocomplete endpoint
pub const DEFAULT_ENDPOINT: &str = "https://suggestqueries.google.com/complete/search";

/// Why a query produced no suggestions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchIssue {
    /// Non-2xx status
    #[error("HTTP error {0}")]
    HttpStatus(u16),
    /// Blank body
    #[error("empty response")]
    EmptyBody,
    /// Body was not a suggestion envelope
    #[error("invalid response: {0}")]
    Malformed(#[from] ParseError),
    /// Request never completed
    #[error("network error: {0}")]
    Network(#[from] TransportError),
}

impl FetchIssue {
    /// Severity reported to the diagnostic sink
    pub fn severity(&self) -> Severity {
        match self {
            FetchIssue::HttpStatus(_) | FetchIssue::EmptyBody => Severity::Warning,
            FetchIssue::Malformed(_) | FetchIssue::Network(_) => Severity::Error,
        }
    }
}

/// Issues one request per query against the autocomplete endpoint
#[derive(Clone)]
pub struct SuggestionFetcher {
    transport: Arc<dyn SuggestTransport>,
    endpoint: Url,
    language: String,
    region: String,
    user_agents: UserAgentPool,
}

impl SuggestionFetcher {
    /// Create a fetcher against `endpoint` for the given language/region pair
    pub fn new(
        transport: Arc<dyn SuggestTransport>,
        endpoint: &str,
        language: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            KeyseedError::config(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;

        Ok(Self {
            transport,
            endpoint,
            language: language.into(),
            region: region.into(),
            user_agents: UserAgentPool::default(),
        })
    }

    /// Replace the user-agent pool
    pub fn with_user_agents(mut self, pool: UserAgentPool) -> Self {
        self.user_agents = pool;
        self
    }

    /// Request URL for a query
    ///
    /// The search phrase `{modifier} * {keyword}` is form-encoded, so spaces
    /// become `+` as the service expects.
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("output", "firefox")
            .append_pair("q", &query.search_phrase())
            .append_pair("hl", &self.language)
            .append_pair("gl", &self.region);
        url
    }

    /// Fetch suggestions, reporting the reason when there are none
    pub async fn try_fetch(
        &self,
        query: &Query,
    ) -> std::result::Result<Vec<SuggestionItem>, FetchIssue> {
        let url = self.request_url(query);
        debug!(query = %query, url = %url, "fetching suggestions");

        let response = self.transport.get(&url, self.user_agents.pick()).await?;

        if !response.is_success() {
            return Err(FetchIssue::HttpStatus(response.status));
        }
        if response.body.trim().is_empty() {
            return Err(FetchIssue::EmptyBody);
        }

        let envelope = parse_envelope(&response.body)?;
        debug!(query = %query, items = envelope.items.len(), "suggestions received");
        Ok(envelope.items)
    }

    /// Fetch suggestions; failures become an empty list and a diagnostic
    pub async fn fetch(
        &self,
        query: &Query,
        diagnostics: &dyn DiagnosticSink,
    ) -> Vec<SuggestionItem> {
        match self.try_fetch(query).await {
            Ok(items) => items,
            Err(issue) => {
                report_issue(&issue, query, diagnostics);
                Vec::new()
            }
        }
    }
}

/// Send a fetch issue to the diagnostic sink
pub fn report_issue(issue: &FetchIssue, query: &Query, diagnostics: &dyn DiagnosticSink) {
    diagnostics.emit(issue.severity(), &format!("{} for {}", issue, query));
}

impl std::fmt::Debug for SuggestionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionFetcher")
            .field("endpoint", &self.endpoint.as_str())
            .field("language", &self.language)
            .field("region", &self.region)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDiagnostics;
    use crate::transport::{MockSuggestTransport, RawResponse};
    use crate::types::{Keyword, Modifier, ModifierCategory};
    use std::time::Duration;

    fn query(keyword: &str, modifier: &str) -> Query {
        Query {
            index: 0,
            keyword: Keyword::new(keyword).unwrap(),
            modifier: Modifier::new(modifier, ModifierCategory::Custom).unwrap(),
        }
    }

    fn fetcher_with(mock: MockSuggestTransport) -> SuggestionFetcher {
        SuggestionFetcher::new(Arc::new(mock), DEFAULT_ENDPOINT, "fr", "fr").unwrap()
    }

    fn responding(status: u16, body: &'static str) -> MockSuggestTransport {
        let mut mock = MockSuggestTransport::new();
        mock.expect_get().times(1).returning(move |_, _| {
            Ok(RawResponse {
                status,
                body: body.to_string(),
            })
        });
        mock
    }

    #[test]
    fn test_request_url_shape() {
        let fetcher = fetcher_with(MockSuggestTransport::new());
        let url = fetcher.request_url(&query("laptop", "pas cher"));
        assert_eq!(
            url.as_str(),
            "https://suggestqueries.google.com/complete/search?output=firefox&q=pas+cher+*+laptop&hl=fr&gl=fr"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = SuggestionFetcher::new(
            Arc::new(MockSuggestTransport::new()),
            "not a url",
            "fr",
            "fr",
        );
        assert!(matches!(result, Err(KeyseedError::Config(_))));
    }

    #[tokio::test]
    async fn test_success_returns_items() {
        let fetcher = fetcher_with(responding(200, r#"["buy * laptop", ["laptop bag"]]"#));
        let sink = RecordingDiagnostics::new();

        let items = fetcher.fetch(&query("laptop", "buy"), &sink).await;

        assert_eq!(items, vec![SuggestionItem::Text("laptop bag".to_string())]);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_http_500_is_soft_failure() {
        let fetcher = fetcher_with(responding(500, "internal error"));
        let sink = RecordingDiagnostics::new();

        let items = fetcher.fetch(&query("laptop", "buy"), &sink).await;

        assert!(items.is_empty());
        let recorded = sink.entries();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, Severity::Warning);
        assert!(recorded[0].1.contains("500"));
    }

    #[tokio::test]
    async fn test_empty_body_is_warning() {
        let fetcher = fetcher_with(responding(200, "   \n"));
        let sink = RecordingDiagnostics::new();

        assert!(fetcher.fetch(&query("laptop", "buy"), &sink).await.is_empty());
        assert_eq!(sink.count(Severity::Warning), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let fetcher = fetcher_with(responding(200, "<html>captcha</html>"));
        let sink = RecordingDiagnostics::new();

        assert!(fetcher.fetch(&query("laptop", "buy"), &sink).await.is_empty());
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_error() {
        let fetcher = fetcher_with(responding(200, r#"["buy * laptop"]"#));

        let issue = fetcher.try_fetch(&query("laptop", "buy")).await.unwrap_err();
        assert_eq!(issue, FetchIssue::Malformed(ParseError::TooShort(1)));
        assert_eq!(issue.severity(), Severity::Error);
    }

    #[tokio::test]
    async fn test_network_failure_includes_cause() {
        let mut mock = MockSuggestTransport::new();
        mock.expect_get()
            .returning(|_, _| Err(TransportError::Timeout(Duration::from_secs(5))));
        let fetcher = fetcher_with(mock);
        let sink = RecordingDiagnostics::new();

        assert!(fetcher.fetch(&query("laptop", "buy"), &sink).await.is_empty());
        let recorded = sink.entries();
        assert_eq!(recorded[0].0, Severity::Error);
        assert!(recorded[0].1.contains("timed out"));
        assert!(recorded[0].1.contains("laptop (buy)"));
    }

    #[tokio::test]
    async fn test_user_agent_comes_from_pool() {
        let mut mock = MockSuggestTransport::new();
        mock.expect_get()
            .withf(|_, agent| agent.contains("keyseed-test"))
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse {
                    status: 200,
                    body: r#"["q", []]"#.to_string(),
                })
            });
        let fetcher = fetcher_with(mock)
            .with_user_agents(UserAgentPool::with_agents(vec!["keyseed-test/1.0".to_string()]));

        let items = fetcher
            .fetch(&query("laptop", "buy"), &RecordingDiagnostics::new())
            .await;
        assert!(items.is_empty());
    }
}
