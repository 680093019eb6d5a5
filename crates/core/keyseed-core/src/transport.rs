//! HTTP transport for the autocomplete endpoint

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::{KeyseedError, Result};

/// Realistic desktop browser identities rotated across requests
const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

/// Picks a browser identity per request
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Pool with the built-in browser identities
    pub fn browsers() -> Self {
        Self {
            agents: BROWSER_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Pool with caller-provided identities; falls back to the built-ins when empty
    pub fn with_agents(agents: Vec<String>) -> Self {
        if agents.is_empty() {
            Self::browsers()
        } else {
            Self { agents }
        }
    }

    /// Pick one identity at random
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(BROWSER_USER_AGENTS[0])
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::browsers()
    }
}

/// Status and body of an upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl RawResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Request exceeded its time budget
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Connection, DNS or protocol failure
    #[error("{0}")]
    Connection(String),
}

/// Issues GET requests against the suggestion endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestTransport: Send + Sync {
    /// Fetch `url` with the given user agent
    async fn get(&self, url: &Url, user_agent: &str)
        -> std::result::Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(KeyseedError::config("request timeout must be greater than zero"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl SuggestTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &Url,
        user_agent: &str,
    ) -> std::result::Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(RawResponse { status, body })
    }
}

impl ReqwestTransport {
    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}
