//! logging
//!
//! Diagnostic logging via `tracing`.
//!
//! Standard output carries the exported rows, so log events are only ever
//! written to standard error. `RUST_LOG` overrides the level chosen from
//! the command-line flags.

use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

/// Log verbosity chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`--quiet`)
    Quiet,
    /// Warnings and errors
    #[default]
    Normal,
    /// Per-page request tracing (`--debug`)
    Debug,
}

impl Verbosity {
    /// Pick a verbosity from the `--debug` and `--quiet` flags.
    ///
    /// `--debug` wins if both are given.
    pub fn from_flags(debug: bool, quiet: bool) -> Self {
        match (debug, quiet) {
            (true, _) => Verbosity::Debug,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Get the tracing level filter for this verbosity.
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::ERROR,
            Verbosity::Normal => LevelFilter::WARN,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity.as_level_filter().into())
        .from_env_lossy();

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .without_time()
        .try_init();
}
