//! Test doubles for running the pipeline without a network

use crate::diagnostics::{DiagnosticSink, Severity};
use crate::progress::{progress_fraction, ProgressReporter};
use crate::transport::{RawResponse, SuggestTransport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
enum Scripted {
    Respond {
        delay: Duration,
        status: u16,
        body: String,
    },
    Fail(TransportError),
}

/// Transport answering from a table keyed by search phrase (`q` parameter)
///
/// Unscripted phrases get a 404 with an empty body.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: HashMap<String, Scripted>,
    requests: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `phrase` immediately
    pub fn respond(self, phrase: &str, status: u16, body: &str) -> Self {
        self.respond_after(phrase, Duration::ZERO, status, body)
    }

    /// Answer `phrase` after `delay`
    pub fn respond_after(mut self, phrase: &str, delay: Duration, status: u16, body: &str) -> Self {
        self.script.insert(
            phrase.to_string(),
            Scripted::Respond {
                delay,
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Fail `phrase` with a transport error
    pub fn fail(mut self, phrase: &str, error: TransportError) -> Self {
        self.script.insert(phrase.to_string(), Scripted::Fail(error));
        self
    }

    /// Shared counter of requests received
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl SuggestTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &Url,
        _user_agent: &str,
    ) -> std::result::Result<RawResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let phrase = url
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        match self.script.get(&phrase).cloned() {
            Some(Scripted::Respond {
                delay,
                status,
                body,
            }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(RawResponse { status, body })
            }
            Some(Scripted::Fail(error)) => Err(error),
            None => Ok(RawResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Diagnostic sink that keeps everything it receives
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingDiagnostics {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded diagnostics in arrival order
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Number of diagnostics with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((severity, message.to_string()));
        }
    }
}

/// Progress observer that keeps every call
#[derive(Debug, Default)]
pub struct RecordingProgress {
    calls: Mutex<Vec<(usize, usize)>>,
}

impl RecordingProgress {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// `(completed, total)` pairs in call order
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Fraction reported by the last call
    pub fn last_fraction(&self) -> Option<f64> {
        self.calls()
            .last()
            .map(|(completed, total)| progress_fraction(*completed, *total))
    }

    /// Whether reported fractions never decreased
    pub fn is_monotonic(&self) -> bool {
        let fractions: Vec<f64> = self
            .calls()
            .iter()
            .map(|(c, t)| progress_fraction(*c, *t))
            .collect();
        fractions.windows(2).all(|w| w[0] <= w[1])
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, completed: usize, total: usize) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((completed, total));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_transport_matches_phrase() {
        let transport = ScriptedTransport::new().respond("buy * laptop", 200, "[]");
        let url = Url::parse("https://example.com/s?output=firefox&q=buy+*+laptop").unwrap();

        let response = transport.get(&url, "ua").await.unwrap();
        assert_eq!(response.status, 200);

        let other = Url::parse("https://example.com/s?q=unknown").unwrap();
        assert_eq!(transport.get(&other, "ua").await.unwrap().status, 404);
        assert_eq!(transport.request_counter().load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let transport = ScriptedTransport::new()
            .fail("x", TransportError::Connection("connection reset".to_string()));
        let url = Url::parse("https://example.com/s?q=x").unwrap();
        assert!(transport.get(&url, "ua").await.is_err());
    }

    #[test]
    fn test_recorders() {
        let diagnostics = RecordingDiagnostics::new();
        diagnostics.emit(Severity::Error, "boom");
        assert_eq!(diagnostics.count(Severity::Error), 1);

        let progress = RecordingProgress::new();
        progress.report(1, 2);
        progress.report(2, 2);
        assert!(progress.is_monotonic());
        assert_eq!(progress.last_fraction(), Some(1.0));
    }
}
