//! Per-query diagnostic reporting

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The service answered, but with nothing usable
    Warning,
    /// The service returned garbage or could not be reached
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Receives human-readable warnings and errors for individual queries
///
/// Implementations must not block and must not fail.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic
    fn emit(&self, severity: Severity, message: &str);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warning => warn!(target: "keyseed::fetch", "{}", message),
            Severity::Error => error!(target: "keyseed::fetch", "{}", message),
        }
    }
}
