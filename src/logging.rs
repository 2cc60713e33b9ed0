//! Logging initialization.

use crate::config::LoggingConfig;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times; only the first call applies.
///
/// Output goes to stderr so stdout stays free for the MCP protocol. `RUST_LOG`
/// overrides the configured level.
pub fn init(config: &LoggingConfig) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test { "debug" } else { config.level.as_str() };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        let result = if is_test {
            builder.compact().with_test_writer().try_init()
        } else if config.json {
            builder.json().with_writer(std::io::stderr).try_init()
        } else {
            builder.compact().with_writer(std::io::stderr).try_init()
        };

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
