//! Synchronous processing strategy
//!
//! Applies script rows one at a time, in file order, on the calling thread.
//! `SyncReader` streams the rows, so memory use does not grow with the
//! script length beyond the ledger itself.

use crate::core::Ledger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use log::warn;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use concurrent_ledger::cli::ReportKind;
/// use concurrent_ledger::core::Ledger;
/// use concurrent_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let ledger = Ledger::new();
/// let mut output = io::stdout();
///
/// SyncProcessingStrategy
///     .process(Path::new("script.csv"), &ledger, ReportKind::Accounts, &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn run(&self, input_path: &Path, ledger: &Ledger) -> Result<(), LedgerError> {
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(command) => {
                    // Rejected commands are reported and skipped
                    if let Err(e) = ledger.apply(command.clone()) {
                        warn!("Command {:?} rejected: {}", command, e);
                    }
                }
                Err(e) => {
                    warn!("Skipping script row: {}", e);
                }
            }
        }

        Ok(())
    }
}
