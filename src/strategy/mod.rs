//! Processing strategy module for ledger scripts
//!
//! This module defines the Strategy pattern for complete script processing
//! pipelines, from CSV parsing to applying commands on a `Ledger`. Different
//! implementations (sequential, concurrent batches) can be selected at
//! runtime and always produce the same ledger state.

use crate::cli::{ReportKind, StrategyType};
use crate::core::Ledger;
use crate::io::{write_accounts_csv, write_transactions_csv};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete script pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Apply every command of the script at `input_path` to `ledger`
    ///
    /// Malformed rows and rejected commands are logged and skipped; they do
    /// not abort processing.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal problems such as an unreadable input
    /// file or a runtime that cannot be started.
    fn run(&self, input_path: &Path, ledger: &Ledger) -> Result<(), LedgerError>;

    /// Run the script and write the requested report to `output`
    fn process(
        &self,
        input_path: &Path,
        ledger: &Ledger,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<(), LedgerError> {
        self.run(input_path, ledger)?;
        write_report(ledger, report, output)
    }
}

/// Write a ledger report as CSV
pub fn write_report(
    ledger: &Ledger,
    report: ReportKind,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match report {
        ReportKind::Accounts => write_accounts_csv(&ledger.list_accounts(), output),
        ReportKind::Transactions => write_transactions_csv(&ledger.list_transactions(), output),
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects the
/// defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
