//! Keyseed core pipeline
//!
//! Expands seed keywords into related query phrases by asking a public
//! autocomplete service about each keyword combined with a set of modifiers
//! ("comment", "pourquoi", "acheter", "vs", ...). It includes:
//!
//! - Query space generation from keywords and modifier catalogs
//! - Suggestion fetching with per-query failure containment
//! - Envelope parsing and candidate token extraction
//! - Relevance filtering and result aggregation
//! - Sequential or bounded-concurrency execution with cancellation
//!
//! # Example
//!
//! ```no_run
//! use keyseed_core::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = Pipeline::from_config(&SuggestConfig::default())?;
//!     let report = pipeline
//!         .run(parse_keywords(["laptop"]), &ModifierConfig::default())
//!         .await;
//!     report.table.write_delimited(std::io::stdout())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expander;
pub mod extractor;
pub mod fetcher;
pub mod filter;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod testing;
pub mod transport;
pub mod types;

pub use aggregator::{ResultRow, ResultTable, EXPORT_DELIMITER, EXPORT_HEADER};
pub use catalog::ModifierCatalog;
pub use config::{get_env_bool, get_env_int, get_env_or, load_env, SuggestConfig};
pub use diagnostics::{DiagnosticSink, Severity, TracingDiagnostics};
pub use error::{KeyseedError, Result};
pub use expander::{ModifierConfig, QueryExpander};
pub use extractor::{ExtractionMode, TokenExtractor};
pub use fetcher::{FetchIssue, SuggestionFetcher, DEFAULT_ENDPOINT};
pub use filter::RelevanceFilter;
pub use logging::init_logging;
pub use parser::{parse_envelope, parse_items, ParseError, SuggestionEnvelope};
pub use pipeline::{Pipeline, PipelineOptions, QueryOutcome, RunReport};
pub use progress::{
    progress_fraction, ChannelProgress, LogProgress, NoopProgress, ProgressReporter, RunProgress,
};
pub use transport::{RawResponse, ReqwestTransport, SuggestTransport, TransportError, UserAgentPool};
pub use types::{parse_keywords, Keyword, Modifier, ModifierCategory, Query, SuggestionItem};

pub use tokio_util::sync::CancellationToken;
