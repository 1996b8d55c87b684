//! output
//!
//! Row projection and delimited-text output.
//!
//! # Architecture
//!
//! The export engine hands every accepted item to an [`ItemSink`]. The
//! engine knows nothing about rows or formats; the sink decides what an
//! item turns into. The production sink is [`DelimitedWriter`], which
//! projects each item into a [`Row`] and writes it as one CSV/TSV line.
//!
//! # Modules
//!
//! - `row`: item → row projection and spreadsheet formatting
//! - `delimited`: CSV/TSV writer sink

mod delimited;
mod row;

pub use delimited::{DelimitedWriter, HEADER};
pub use row::{format_created_at, spreadsheet_hyperlink, Row, CREATED_AT_FORMAT};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{Category, Item};

/// Errors from writing an item to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("failed to write row: {0}")]
    Io(#[from] std::io::Error),
}

impl SinkError {
    /// Whether the reader on the other end went away (e.g. `| head`).
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            SinkError::Io(e) => e.kind() == std::io::ErrorKind::BrokenPipe,
        }
    }
}

/// Consumer of exported items.
///
/// Called once per item newer than the cutoff, in traversal order.
/// Returning an error aborts the export.
pub trait ItemSink {
    /// Accept one item.
    fn accept(&mut self, category: Category, item: &Item) -> Result<(), SinkError>;
}

impl<S: ItemSink + ?Sized> ItemSink for &mut S {
    fn accept(&mut self, category: Category, item: &Item) -> Result<(), SinkError> {
        (**self).accept(category, item)
    }
}

/// Collects items in memory. Useful for tests and for callers that want
/// the items rather than text.
impl ItemSink for Vec<(Category, Item)> {
    fn accept(&mut self, category: Category, item: &Item) -> Result<(), SinkError> {
        self.push((category, item.clone()));
        Ok(())
    }
}

/// Field delimiter for the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Comma-separated values
    #[default]
    Comma,
    /// Tab-separated values
    Tab,
}

impl Delimiter {
    /// The delimiter character.
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}
