//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `-o/--owner`, `-r/--repo`: repository to export
//! - `-s/--since`: cutoff date (`YYYY-MM-DD`)
//! - `-t/--tab`: tab-separated output
//! - `--token`, `--username`, `--password`: credentials (also from env)
//! - `--debug` / `--quiet` / `-q`: log verbosity

use clap::Parser;
use std::path::PathBuf;

/// Export a GitHub repository's issue and pull request history as CSV/TSV
#[derive(Parser, Debug)]
#[command(name = "ghexport")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Everything opened in golang/go during the last month
    ghexport > go.csv

    # Since the start of 2024, tab separated, with a header row
    ghexport -o rust-lang -r cargo -s 2024-01-01 --tab --header > cargo.tsv

    # Authenticated, to raise the rate limit
    GITHUB_TOKEN=ghp_... ghexport -o acme -r widgets")]
pub struct Cli {
    /// Repository owner [default: golang]
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Repository name [default: go]
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Export items created on or after this date (YYYY-MM-DD) [default: one month ago]
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    pub since: Option<String>,

    /// Separate fields with tabs instead of commas
    #[arg(short, long)]
    pub tab: bool,

    /// Write a header row before the data
    #[arg(long)]
    pub header: bool,

    /// Items requested per page (1-100) [default: 100]
    #[arg(long, value_name = "N")]
    pub per_page: Option<u8>,

    /// REST API base URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Personal access token [env: GITHUBTOKEN, GITHUB_TOKEN]
    #[arg(long)]
    pub token: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "GITHUB_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication (prompted if omitted)
    #[arg(long, env = "GITHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read configuration from this file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Token from the flag, then `$GITHUBTOKEN`, then `$GITHUB_TOKEN`.
    ///
    /// Empty values are skipped, so a blank `GITHUBTOKEN` falls through.
    pub fn token_or_env(&self) -> Option<String> {
        self.token_from(|name| std::env::var(name).ok())
    }

    fn token_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        let present = |v: &String| !v.trim().is_empty();
        self.token
            .clone()
            .filter(present)
            .or_else(|| TOKEN_VARS.iter().find_map(|name| lookup(name).filter(present)))
    }
}

/// Environment variables holding a token, in lookup order.
const TOKEN_VARS: [&str; 2] = ["GITHUBTOKEN", "GITHUB_TOKEN"];
