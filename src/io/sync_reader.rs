//! Synchronous script reader
//!
//! This module provides `SyncReader`, a streaming reader that yields one
//! `LedgerCommand` per script row through the `Iterator` interface.
//!
//! # Memory Efficiency
//!
//! Rows are deserialized one at a time; the script is never loaded into
//! memory as a whole.

use crate::io::csv_format::{convert_script_record, ScriptRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over a script file
///
/// Malformed rows are yielded as `LedgerError::ParseError` with the line
/// number attached, so the caller can log them and keep going.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a script file
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::IoError` if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| {
            LedgerError::io_error(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerCommand, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<ScriptRecord>();

        let next = deserializer.next()?;
        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        match next {
            Ok(record) => {
                Some(convert_script_record(record).map_err(|e| LedgerError::parse_error(line, e)))
            }
            Err(e) => Some(Err(LedgerError::parse_error(line, e.to_string()))),
        }
    }
}
