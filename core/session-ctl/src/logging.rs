//! Tracing setup for session-ctl.
//!
//! Logs go to stderr so stdout stays machine-readable.
//! `SESSION_REGISTRY_DEBUG_LOG=1` forces debug. Otherwise `RUST_LOG` is
//! honored, falling back to warnings and errors only.

use std::env;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV_VAR: &str = "SESSION_REGISTRY_DEBUG_LOG";

/// Installs the global subscriber. Hold the returned guard until exit so
/// buffered lines are flushed.
pub fn init() -> Option<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(writer)
        .with_target(false)
        .try_init();

    result.ok().map(|_| guard)
}

fn build_filter() -> EnvFilter {
    if debug_enabled(env::var(DEBUG_ENV_VAR).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}
