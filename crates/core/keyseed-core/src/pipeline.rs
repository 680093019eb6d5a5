//! Expansion pipeline: expand → fetch → parse → extract → filter → aggregate
//!
//! Two execution modes share the same per-query stage chain:
//! - sequential (concurrency 1): each query finishes before the next starts
//! - worker pool (concurrency > 1): workers pull queries from a shared queue
//!   and send one outcome per query to a single consumer that owns the table
//!
//! A query's rows travel as a single message, so cancellation can only ever
//! drop whole queries.

use crate::aggregator::ResultTable;
use crate::catalog::ModifierCatalog;
use crate::config::SuggestConfig;
use crate::diagnostics::{DiagnosticSink, TracingDiagnostics};
use crate::expander::{ModifierConfig, QueryExpander};
use crate::extractor::{ExtractionMode, TokenExtractor};
use crate::fetcher::{report_issue, SuggestionFetcher};
use crate::filter::RelevanceFilter;
use crate::progress::{NoopProgress, ProgressReporter};
use crate::transport::ReqwestTransport;
use crate::types::{Keyword, Query};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

/// Execution options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Concurrent in-flight queries; 1 runs sequentially
    pub concurrency: usize,
    /// Sort rows by query index after a concurrent run
    pub preserve_order: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            preserve_order: true,
        }
    }
}

/// What one query produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Query index in the expanded space
    pub index: usize,
    /// Source keyword
    pub keyword: Keyword,
    /// Tokens that passed the relevance filter
    pub phrases: Vec<String>,
    /// Whether the fetch failed (the query still counts as completed)
    pub failed: bool,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Aggregated rows
    pub table: ResultTable,
    /// Queries in the expanded space
    pub total_queries: usize,
    /// Queries that finished (with or without suggestions)
    pub completed_queries: usize,
    /// Finished queries whose fetch failed
    pub failed_queries: usize,
    /// Whether the run was cancelled before finishing
    pub cancelled: bool,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Queries never completed because of cancellation
    pub fn skipped_queries(&self) -> usize {
        self.total_queries.saturating_sub(self.completed_queries)
    }
}

/// Single writer for the table and the progress counter
struct Aggregation<'a> {
    table: ResultTable,
    total: usize,
    completed: usize,
    failed: usize,
    progress: &'a dyn ProgressReporter,
}

impl<'a> Aggregation<'a> {
    fn new(total: usize, progress: &'a dyn ProgressReporter) -> Self {
        Self {
            table: ResultTable::new(),
            total,
            completed: 0,
            failed: 0,
            progress,
        }
    }

    fn record(&mut self, outcome: QueryOutcome) {
        self.table
            .append(outcome.index, &outcome.keyword, outcome.phrases);
        self.completed += 1;
        if outcome.failed {
            self.failed += 1;
        }
        self.progress.report(self.completed, self.total);
    }
}

/// Keyword expansion pipeline
#[derive(Clone)]
pub struct Pipeline {
    fetcher: SuggestionFetcher,
    extractor: TokenExtractor,
    filter: RelevanceFilter,
    catalog: ModifierCatalog,
    options: PipelineOptions,
    diagnostics: Arc<dyn DiagnosticSink>,
    progress: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    /// Pipeline around a fetcher, with default extraction and sinks
    pub fn new(fetcher: SuggestionFetcher) -> Self {
        Self {
            fetcher,
            extractor: TokenExtractor::default(),
            filter: RelevanceFilter::new(),
            catalog: ModifierCatalog::default(),
            options: PipelineOptions::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            progress: Arc::new(NoopProgress),
        }
    }

    /// Build a pipeline talking to the real endpoint over HTTP
    pub fn from_config(config: &SuggestConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout())?;
        let fetcher = SuggestionFetcher::new(
            Arc::new(transport),
            &config.endpoint,
            config.language.clone(),
            config.region.clone(),
        )?;

        Ok(Self::new(fetcher)
            .with_extraction(config.extraction)
            .with_catalog(ModifierCatalog::for_language(&config.language))
            .with_concurrency(config.effective_concurrency()))
    }

    /// Set the token extraction strategy
    pub fn with_extraction(mut self, mode: ExtractionMode) -> Self {
        self.extractor = TokenExtractor::new(mode);
        self
    }

    /// Set the built-in modifier catalog
    pub fn with_catalog(mut self, catalog: ModifierCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the number of concurrent queries (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.options.concurrency = concurrency.max(1);
        self
    }

    /// Whether concurrent runs sort rows back into query order
    pub fn with_preserve_order(mut self, preserve: bool) -> Self {
        self.options.preserve_order = preserve;
        self
    }

    /// Set the diagnostic sink
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Set the progress observer
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Active options
    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Expand keywords against the selected modifiers
    pub fn expander(&self, keywords: Vec<Keyword>, modifiers: &ModifierConfig) -> QueryExpander {
        QueryExpander::from_config(keywords, modifiers, &self.catalog)
    }

    /// Run to completion
    pub async fn run(&self, keywords: Vec<Keyword>, modifiers: &ModifierConfig) -> RunReport {
        self.run_with_cancel(keywords, modifiers, CancellationToken::new())
            .await
    }

    /// Run until done or until `cancel` fires
    ///
    /// A cancelled run returns the rows of every query that completed before
    /// cancellation.
    pub async fn run_with_cancel(
        &self,
        keywords: Vec<Keyword>,
        modifiers: &ModifierConfig,
        cancel: CancellationToken,
    ) -> RunReport {
        let expander = self.expander(keywords, modifiers);
        let total = expander.total();
        let start = Instant::now();

        if expander.is_empty() {
            info!("nothing to expand: no keywords or no modifiers selected");
            return RunReport::default();
        }

        let span = info_span!(
            "expansion",
            total,
            concurrency = self.options.concurrency
        );
        let mut aggregation = Aggregation::new(total, self.progress.as_ref());

        async {
            info!("starting keyword expansion");
            if self.options.concurrency <= 1 {
                self.run_sequential(&expander, &mut aggregation, &cancel)
                    .await;
            } else {
                self.run_pool(&expander, &mut aggregation, &cancel).await;
                if self.options.preserve_order {
                    aggregation.table.sort_by_query();
                }
            }
        }
        .instrument(span)
        .await;

        let report = RunReport {
            total_queries: total,
            completed_queries: aggregation.completed,
            failed_queries: aggregation.failed,
            cancelled: cancel.is_cancelled() && aggregation.completed < total,
            elapsed_ms: start.elapsed().as_millis() as u64,
            table: aggregation.table,
        };

        info!(
            rows = report.table.len(),
            completed = report.completed_queries,
            failed = report.failed_queries,
            cancelled = report.cancelled,
            elapsed_ms = report.elapsed_ms,
            "keyword expansion finished"
        );
        report
    }

    /// Fetch, extract and filter a single query
    pub async fn process_query(&self, query: &Query) -> QueryOutcome {
        let (items, failed) = match self.fetcher.try_fetch(query).await {
            Ok(items) => (items, false),
            Err(issue) => {
                report_issue(&issue, query, self.diagnostics.as_ref());
                (Vec::new(), true)
            }
        };

        let tokens = self.extractor.extract_all(&items);
        let candidates = tokens.len();
        let phrases = self.filter.filter(&query.keyword, tokens);
        debug!(
            query = %query,
            items = items.len(),
            candidates,
            kept = phrases.len(),
            "query processed"
        );

        QueryOutcome {
            index: query.index,
            keyword: query.keyword.clone(),
            phrases,
            failed,
        }
    }

    async fn run_sequential(
        &self,
        expander: &QueryExpander,
        aggregation: &mut Aggregation<'_>,
        cancel: &CancellationToken,
    ) {
        for query in expander.queries() {
            if cancel.is_cancelled() {
                break;
            }
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                outcome = self.process_query(&query) => outcome,
            };
            aggregation.record(outcome);
        }
    }

    async fn run_pool(
        &self,
        expander: &QueryExpander,
        aggregation: &mut Aggregation<'_>,
        cancel: &CancellationToken,
    ) {
        let workers = self.options.concurrency.min(expander.total());
        let queue: Arc<Mutex<VecDeque<Query>>> = Arc::new(Mutex::new(expander.queries().collect()));
        let (tx, mut rx) = mpsc::channel::<QueryOutcome>(workers * 2);

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let pipeline = self.clone();
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let next = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    let Some(query) = next else {
                        break;
                    };

                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        outcome = pipeline.process_query(&query) => outcome,
                    };
                    if tx.send(outcome).await.is_err() {
                        break;
                    }
                }
                debug!(worker, "worker finished");
            }));
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            aggregation.record(outcome);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("expansion worker panicked: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("fetcher", &self.fetcher)
            .field("extraction", &self.extractor.mode())
            .field("options", &self.options)
            .finish()
    }
}
