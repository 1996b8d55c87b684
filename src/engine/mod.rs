//! engine
//!
//! Drives an export: page through each category newest first and hand
//! items to a sink until the cutoff.
//!
//! # Architecture
//!
//! ```text
//! export -> traverse(Issue) -> Pager -> Forge
//!        -> traverse(PullRequest) -> Pager -> Forge
//! ```
//!
//! - [`pager`]: lazy page sequence over one forge listing
//! - [`traverse`](mod@traverse): cutoff traversal of one category
//!
//! # Invariants
//!
//! - Categories are traversed one after another, never concurrently
//! - The first error ends the export; nothing already emitted is undone
//! - No request is made for a page past the cutoff or past the last page
//!
//! # Example
//!
//! ```
//! use ghexport::core::types::{Category, Cutoff, Item};
//! use ghexport::engine::{export, ExportOptions};
//! use ghexport::forge::mock::MockForge;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//! let options = ExportOptions::new(Cutoff::parse_date("2024-01-01").unwrap());
//! let mut sink: Vec<(Category, Item)> = Vec::new();
//!
//! let summary = export(&forge, &options, &mut sink).await.unwrap();
//! assert_eq!(summary.items_emitted(), 0);
//! assert_eq!(summary.traversals.len(), 2);
//! # });
//! ```

pub mod pager;
pub mod traverse;

pub use pager::Pager;
pub use traverse::{traverse, TraversalSummary};

use thiserror::Error;

use crate::core::config::schema::MAX_PER_PAGE;
use crate::core::types::{Category, Cutoff};
use crate::forge::{Forge, ForgeError};
use crate::output::{ItemSink, SinkError};

/// Errors that end an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A page request failed.
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] ForgeError),

    /// The sink could not take an item.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ExportError {
    /// Whether the sink's reader went away (e.g. output piped into `head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, ExportError::Sink(e) if e.is_broken_pipe())
    }
}

/// Parameters of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Items created before this instant are not exported
    pub cutoff: Cutoff,
    /// Items requested per page
    pub per_page: u8,
}

impl ExportOptions {
    /// Options with the largest page size the API allows.
    pub fn new(cutoff: Cutoff) -> Self {
        Self {
            cutoff,
            per_page: MAX_PER_PAGE,
        }
    }

    /// Set the page size.
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// One summary per category, in export order
    pub traversals: Vec<TraversalSummary>,
}

impl ExportSummary {
    /// Total items handed to the sink.
    pub fn items_emitted(&self) -> usize {
        self.traversals.iter().map(|t| t.items_emitted).sum()
    }

    /// Total pages fetched.
    pub fn pages_fetched(&self) -> usize {
        self.traversals.iter().map(|t| t.pages_fetched).sum()
    }

    /// Summary for one category, if it was traversed.
    pub fn for_category(&self, category: Category) -> Option<&TraversalSummary> {
        self.traversals.iter().find(|t| t.category == category)
    }
}

/// Export issues, then pull requests, into `sink`.
///
/// # Errors
///
/// Returns the first [`ExportError`]. Pull requests are not traversed if
/// the issue traversal failed.
pub async fn export<F, S>(
    forge: &F,
    options: &ExportOptions,
    sink: &mut S,
) -> Result<ExportSummary, ExportError>
where
    F: Forge + ?Sized,
    S: ItemSink + ?Sized,
{
    tracing::debug!(
        forge = forge.name(),
        cutoff = %options.cutoff,
        per_page = options.per_page,
        "starting export"
    );

    let mut traversals = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let summary = traverse(forge, category, options.cutoff, options.per_page, sink).await?;
        traversals.push(summary);
    }

    Ok(ExportSummary { traversals })
}
