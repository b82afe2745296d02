//! Tracing subscriber setup for hosts embedding the editor core.
//!
//! The core only emits `tracing` events; nothing is printed unless the host installs a
//! subscriber, either its own or the stderr one built here.

use crate::config::Config;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Install a stderr subscriber filtered at the configured level.
///
/// `RUST_LOG` directives take precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init(cfg: &Config) -> Result<(), TryInitError> {
    let level = parse_level(&cfg.log_level).unwrap_or(LevelFilter::INFO);

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(layer).try_init()
}

pub(crate) fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
