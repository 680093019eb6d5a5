//! Logging setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `KEYSEED_LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter directive from `KEYSEED_LOG_LEVEL`, or the default
pub fn log_level() -> String {
    std::env::var("KEYSEED_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
}

/// Initialize the global logging system
///
/// `RUST_LOG` takes precedence over `KEYSEED_LOG_LEVEL`. Output goes to stderr
/// so stdout stays free for exported data. Calling this twice is harmless.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging();
        init_logging();
        tracing::info!("logging initialized");
    }

    #[test]
    fn test_default_level() {
        if std::env::var("KEYSEED_LOG_LEVEL").is_err() {
            assert_eq!(log_level(), DEFAULT_LOG_LEVEL);
        }
    }
}
