//! Keyseed command-line tool
//!
//! Expands seed keywords through autocomplete suggestions and writes the
//! `;`-delimited result table to stdout. Logs go to stderr.

mod input;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use keyseed_core::config::{DEFAULT_LANGUAGE, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS};
use keyseed_core::{
    load_env, parse_keywords, CancellationToken, ExtractionMode, LogProgress, ModifierConfig,
    Pipeline, SuggestConfig, DEFAULT_ENDPOINT,
};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed keywords; read from stdin (one per line or CSV) when omitted
    keywords: Vec<String>,

    /// Suggestion language (hl)
    #[arg(short, long, env = "KEYSEED_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Suggestion region (gl)
    #[arg(short, long, env = "KEYSEED_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Autocomplete endpoint
    #[arg(long, env = "KEYSEED_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(short, long, env = "KEYSEED_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Concurrent requests, 1 for sequential
    #[arg(short, long, env = "KEYSEED_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Token extraction strategy
    #[arg(
        short,
        long,
        env = "KEYSEED_EXTRACTION",
        value_enum,
        default_value_t = ExtractionArg::Bracketed
    )]
    extraction: ExtractionArg,

    /// Skip the interrogative modifier catalog
    #[arg(long)]
    no_interrogative: bool,

    /// Skip the transactional modifier catalog
    #[arg(long)]
    no_transactional: bool,

    /// Extra modifier (repeatable, or comma-separated)
    #[arg(
        short,
        long = "modifier",
        env = "KEYSEED_CUSTOM_MODIFIERS",
        value_delimiter = ','
    )]
    modifiers: Vec<String>,

    /// Drop repeated (keyword, phrase) rows before export
    #[arg(long)]
    dedup: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtractionArg {
    /// Scan bracket groups in suggestion text (legacy)
    Bracketed,
    /// Flatten nested lists; keep plain suggestions
    Flatten,
}

impl From<ExtractionArg> for ExtractionMode {
    fn from(arg: ExtractionArg) -> Self {
        match arg {
            ExtractionArg::Bracketed => ExtractionMode::Bracketed,
            ExtractionArg::Flatten => ExtractionMode::Flatten,
        }
    }
}

impl Cli {
    fn suggest_config(&self) -> SuggestConfig {
        SuggestConfig {
            endpoint: self.endpoint.clone(),
            language: self.language.clone(),
            region: self.region.clone(),
            timeout_secs: self.timeout,
            concurrency: self.concurrency,
            extraction: self.extraction.into(),
        }
    }

    /// Catalog toggles from the environment, switched off by `--no-*` flags
    fn modifier_config(&self) -> ModifierConfig {
        let from_env = ModifierConfig::from_env();
        ModifierConfig {
            include_interrogative: from_env.include_interrogative && !self.no_interrogative,
            include_transactional: from_env.include_transactional && !self.no_transactional,
            custom_modifiers: self.modifiers.clone(),
        }
    }

    fn raw_keywords(&self) -> Result<Vec<String>> {
        if !self.keywords.is_empty() {
            return Ok(self.keywords.clone());
        }
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail!("no keywords given: pass them as arguments or pipe them on stdin");
        }
        input::read_keyword_lines(stdin.lock()).context("failed to read keywords from stdin")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so KEYSEED_LOG_LEVEL from the file reaches the filter
    let env_file = load_env()?;
    keyseed_core::init_logging();
    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();

    let keywords = parse_keywords(cli.raw_keywords()?);
    if keywords.is_empty() {
        bail!("please provide at least one non-blank keyword");
    }

    let modifiers = cli.modifier_config();
    let config = cli.suggest_config();
    let pipeline = Pipeline::from_config(&config)
        .context("invalid configuration")?
        .with_progress(Arc::new(LogProgress::default()));

    let expander = pipeline.expander(keywords.clone(), &modifiers);
    if expander.is_empty() {
        bail!("no modifier selected: enable a catalog or pass --modifier");
    }
    info!(
        keywords = keywords.len(),
        modifiers = expander.modifiers().len(),
        queries = expander.total(),
        "expanding keywords"
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing with partial results");
            on_interrupt.cancel();
        }
    });

    let report = pipeline.run_with_cancel(keywords, &modifiers, cancel).await;
    let skipped = report.skipped_queries();

    let table = if cli.dedup {
        report.table.deduplicated()
    } else {
        report.table
    };

    if table.is_empty() {
        warn!("no keyword extracted");
    } else {
        info!(rows = table.len(), "extraction complete");
    }
    if skipped > 0 {
        warn!(skipped, "run cancelled before all queries completed");
    }

    table
        .write_delimited(io::stdout().lock())
        .context("failed to write results")?;
    Ok(())
}
