//! ghexport - Export GitHub issue and pull request history as CSV/TSV
//!
//! ghexport walks a repository's issues and pull requests newest first and
//! writes one spreadsheet-friendly row per item created since a cutoff
//! date. Paging stops at the first item older than the cutoff, so only the
//! pages that hold new items are ever requested.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, resolves settings)
//! - [`engine`] - Pager, cutoff traversal and export orchestration
//! - [`core`] - Domain types and configuration
//! - [`forge`] - Abstraction over the remote API (GitHub, mock)
//! - [`auth`] - Credential resolution
//! - [`output`] - Row projection and delimited writer
//! - [`logging`] - Diagnostic logging to stderr
//!
//! # Invariants
//!
//! 1. Items reach the sink in the order the API returns them
//! 2. Nothing older than the cutoff is emitted
//! 3. No page is requested past the cutoff or past the last page
//! 4. Rows already written stay written when a later request fails

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod logging;
pub mod output;
