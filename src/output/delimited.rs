//! output::delimited
//!
//! CSV/TSV writer sink.
//!
//! Each accepted item becomes one line. The writer is flushed after every
//! row so that rows already written survive a later fetch failure.

use std::io::Write;

use super::{Delimiter, ItemSink, Row, SinkError};
use crate::core::types::{Category, Item};

/// Column names for the optional header row.
pub const HEADER: [&str; 5] = ["Author", "Type", "Number", "Title", "Created"];

/// Quote character used when a field needs quoting.
const QUOTE: char = '"';

/// Sink writing one delimited line per item.
///
/// # Example
///
/// ```
/// use ghexport::output::{DelimitedWriter, Delimiter};
///
/// let mut out = Vec::new();
/// let mut writer = DelimitedWriter::new(&mut out, Delimiter::Tab);
/// writer.write_fields(&["a", "b,c"]).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "a\tb,c\n");
/// ```
#[derive(Debug)]
pub struct DelimitedWriter<W: Write> {
    writer: W,
    delimiter: Delimiter,
    /// Header still to be written before the first row
    pending_header: bool,
    rows_written: usize,
}

impl<W: Write> DelimitedWriter<W> {
    /// Create a writer without a header row.
    pub fn new(writer: W, delimiter: Delimiter) -> Self {
        Self {
            writer,
            delimiter,
            pending_header: false,
            rows_written: 0,
        }
    }

    /// Write a header row before the first data row.
    ///
    /// The header is written lazily, so an export that fails before the
    /// first item leaves the output empty.
    #[must_use]
    pub fn with_header(mut self, include: bool) -> Self {
        self.pending_header = include;
        self
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Escape a field value for the configured delimiter.
    fn escape_field(&self, value: &str) -> String {
        // Leading whitespace is quoted so importers don't trim it
        let needs_quoting = value.contains(self.delimiter.as_char())
            || value.contains(QUOTE)
            || value.contains('\n')
            || value.contains('\r')
            || value.starts_with(char::is_whitespace)
            || value == "\\.";

        if needs_quoting {
            let escaped = value.replace(QUOTE, "\"\"");
            format!("{}{}{}", QUOTE, escaped, QUOTE)
        } else {
            value.to_string()
        }
    }

    /// Write one line of fields and flush.
    pub fn write_fields(&mut self, fields: &[&str]) -> Result<(), SinkError> {
        let line: Vec<String> = fields.iter().map(|f| self.escape_field(f)).collect();
        writeln!(
            self.writer,
            "{}",
            line.join(&self.delimiter.as_char().to_string())
        )?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write the header now if it is still pending.
    pub fn finish_header(&mut self) -> Result<(), SinkError> {
        if self.pending_header {
            self.pending_header = false;
            self.write_fields(&HEADER)?;
        }
        Ok(())
    }
}

impl<W: Write> ItemSink for DelimitedWriter<W> {
    fn accept(&mut self, category: Category, item: &Item) -> Result<(), SinkError> {
        self.finish_header()?;
        let row = Row::project(category, item);
        self.write_fields(&row.fields())?;
        self.rows_written += 1;
        Ok(())
    }
}
