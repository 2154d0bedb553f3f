//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub use tracing_subscriber::util::TryInitError;

/// Default filter directive for a log level: quiet dependencies, verbose registrar crates.
fn default_directive(level: &str) -> String {
    format!("warn,registrar_core={level},tests={level}")
}

/// Builds the filter from `RUST_LOG`, falling back to `config.level`.
///
/// `RUST_LOG=debug` and `RUST_LOG=trace` are shorthands that only raise the registrar crates.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(level) if level == "debug" || level == "trace" => {
            EnvFilter::new(default_directive(&level))
        }
        Ok(_) => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level))),
        Err(_) => EnvFilter::new(default_directive(&config.level)),
    }
}

/// Installs the global subscriber.
///
/// `config.format == "json"` emits one JSON object per event. Any other format uses the pretty
/// multi-line layout with file and line.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    if config.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json();
        registry.with(fmt_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).try_init()
    }
}
