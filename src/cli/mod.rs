//! cli
//!
//! Command-line interface layer for ghexport.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Merge flags, environment and the config file into [`Settings`]
//! - Resolve credentials before any request
//! - Drive the export on a single-threaded runtime, rows to stdout
//!
//! # Architecture
//!
//! The CLI layer is thin. Everything it decides is captured in a
//! [`Settings`] value which is then handed to [`crate::engine::export`].
//! Precedence is built-in defaults < config file < flags and environment.

pub mod args;

pub use args::Cli;

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::auth::{self, CredentialInputs, TerminalPrompt};
use crate::core::config::{validate_api_base, validate_per_page, Config};
use crate::core::types::{Cutoff, Scope, TypeError};
use crate::engine::{self, ExportOptions};
use crate::forge::github::GitHubForge;
use crate::logging::{self, Verbosity};
use crate::output::{DelimitedWriter, Delimiter};

/// Exit status for a since-date that does not parse.
pub const EXIT_USAGE: i32 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Everything an export run needs, resolved once.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Repository to export
    pub scope: Scope,
    /// Cutoff and page size
    pub options: ExportOptions,
    /// Output field delimiter
    pub delimiter: Delimiter,
    /// Write a header row
    pub header: bool,
    /// REST API base URL
    pub api_base: String,
}

impl Settings {
    /// Merge command-line flags over the loaded config.
    ///
    /// `now` anchors the default cutoff of one month ago.
    ///
    /// # Errors
    ///
    /// Fails on a malformed `--since` date (checked first), an invalid
    /// owner or repo, or an out-of-range page size or API base.
    pub fn resolve(cli: &Cli, config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let cutoff = match &cli.since {
            Some(since) => Cutoff::parse_date(since)?,
            None => Cutoff::one_month_before(now),
        };

        let owner = cli.owner.as_deref().unwrap_or(config.owner());
        let repo = cli.repo.as_deref().unwrap_or(config.repo());
        let scope = Scope::new(owner, repo)?;

        let per_page = match cli.per_page {
            Some(per_page) => {
                validate_per_page(per_page).context("invalid --per-page")?;
                per_page
            }
            None => config.per_page(),
        };

        let api_base = match &cli.api_base {
            Some(api_base) => {
                validate_api_base(api_base).context("invalid --api-base")?;
                api_base.trim_end_matches('/').to_string()
            }
            None => config.api_base().to_string(),
        };

        let delimiter = if cli.tab {
            Delimiter::Tab
        } else {
            config.delimiter()
        };

        Ok(Self {
            scope,
            options: ExportOptions::new(cutoff).with_per_page(per_page),
            delimiter,
            header: cli.header || config.header(),
            api_base,
        })
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Returns the
/// process exit status.
pub fn run() -> i32 {
    let cli = Cli::parse_args();
    logging::init_logging(Verbosity::from_flags(cli.debug, cli.quiet));

    match execute(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {:#}", err);
            exit_code(&err)
        }
    }
}

/// Map a failure to its exit status.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<TypeError>() {
        Some(TypeError::InvalidCutoff { .. }) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// Resolve settings and credentials, then export to stdout.
fn execute(cli: &Cli) -> Result<()> {
    let loaded = Config::load(cli.config.as_deref())?;
    for warning in &loaded.warnings {
        tracing::warn!(path = %warning.path.display(), "{}", warning.message);
    }
    if let Some(path) = loaded.config.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let settings = Settings::resolve(cli, &loaded.config, Utc::now())?;

    let inputs = CredentialInputs {
        token: cli.token_or_env(),
        username: cli.username.clone(),
        password: cli.password.clone(),
    };
    let credentials = auth::resolve(inputs, &TerminalPrompt)?;

    tracing::debug!(
        scope = %settings.scope,
        cutoff = %settings.options.cutoff,
        credentials = credentials.kind(),
        "resolved settings"
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let forge =
        GitHubForge::with_api_base(settings.scope.clone(), credentials, &settings.api_base);

    let stdout = std::io::stdout();
    let mut writer = DelimitedWriter::new(stdout.lock(), settings.delimiter)
        .with_header(settings.header);

    // Page requests are awaited one at a time on this thread
    match rt.block_on(engine::export(&forge, &settings.options, &mut writer)) {
        Ok(summary) => {
            tracing::info!(
                items = summary.items_emitted(),
                pages = summary.pages_fetched(),
                "export complete"
            );
        }
        // The reader closed the pipe; nothing left to do
        Err(err) if err.is_broken_pipe() => return Ok(()),
        Err(err) => {
            return Err(err).with_context(|| format!("export of {} failed", settings.scope))
        }
    }

    // An empty export still gets its header row
    if let Err(err) = writer.finish_header() {
        if !err.is_broken_pipe() {
            return Err(err.into());
        }
    }

    let mut stdout = writer.into_inner();
    match stdout.flush() {
        Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => Err(err.into()),
        _ => Ok(()),
    }
}
