//! Logging infrastructure for breathe.
//!
//! Provides centralized tracing setup for all binaries. Log lines go to
//! stderr so that stdout stays reserved for session output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with sensible defaults
///
/// This sets up tracing with:
/// - Environment-based filtering (RUST_LOG)
/// - Compact format on stderr
///
/// Default level is INFO, but can be overridden with RUST_LOG env var.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhaseScheduler;

    #[test]
    fn test_scheduler_logs_with_subscriber() {
        init_test();
        init_test();

        let mut scheduler = PhaseScheduler::new();
        let catalog = crate::build_default_catalog();
        scheduler.start(catalog.find("stimulating").unwrap());
        scheduler.advance();
        scheduler.stop();
        assert_eq!(scheduler.session().unwrap().total_elapsed(), 1);
    }
}
