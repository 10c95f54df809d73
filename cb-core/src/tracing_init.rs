//! Tracing subscriber setup for hosts embedding content block discovery.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CbError, Result};

/// Initialize the tracing subscriber with environment-based configuration
///
/// Filtering follows `RUST_LOG` (e.g. `RUST_LOG=cb_config=debug`).
///
/// `RUST_LOG_FORMAT` selects the output format:
/// - `json` - JSON formatted output
/// - `pretty` - Pretty formatted output (default)
/// - `compact` - Compact single-line output
pub fn init() -> Result<()> {
    init_with_defaults("info")
}

/// Initialize with a default filter used when `RUST_LOG` is not set.
pub fn init_with_defaults(default_filter: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format.as_str() {
        "json" => registry.with(fmt::layer().with_ansi(false).json()).try_init(),
        "compact" => registry.with(fmt::layer().compact()).try_init(),
        _ => registry.with(fmt::layer().pretty()).try_init(),
    };

    result.map_err(|e| CbError::Other(anyhow::anyhow!("Failed to initialize tracing: {}", e)))
}
