//! Asynchronous batch processing strategy
//!
//! Reads the script in batches with `csv-async` on a tokio multi-threaded
//! runtime and hands every batch to a `BatchProcessor`, which executes the
//! transactions of different accounts in parallel.
//!
//! Batches are processed one after another, so an account whose commands
//! span several batches still sees them in file order.

use crate::core::{BatchProcessor, Ledger};
use crate::io::async_reader::AsyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use log::{debug, warn};
use std::path::Path;

/// Configuration for async batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of script rows per batch
    pub batch_size: usize,

    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a configuration, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn run(&self, input_path: &Path, ledger: &Ledger) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(ledger.clone());

            let file = tokio::fs::File::open(input_path).await.map_err(|e| {
                LedgerError::io_error(format!(
                    "Failed to open file '{}': {}",
                    input_path.display(),
                    e
                ))
            })?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the batch before reading the next one to keep
                // per-account ordering across batch boundaries
                let results = processor.process_batch(batch).await;
                debug!("Processed batch of {} commands", results.len());
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportKind;
    use crate::strategy::SyncProcessingStrategy;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        let default = BatchConfig::default();

        assert_eq!(config.batch_size, default.batch_size);
        assert_eq!(config.max_concurrent_batches, default.max_concurrent_batches);
    }

    #[test]
    fn test_batch_config_keeps_custom_values() {
        let config = BatchConfig::new(5, 3);

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_concurrent_batches, 3);
    }

    #[test]
    fn test_async_strategy_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let result = strategy.run(Path::new("nonexistent.csv"), &Ledger::new());

        assert!(matches!(result, Err(LedgerError::IoError { .. })));
    }

    #[test]
    fn test_async_strategy_small_batches_match_sync() {
        // Account 1's commands span several batches of 2
        let script = "type,account,owner,amount\n\
                      open,,alice,100\n\
                      open,,bob,5\n\
                      deposit,1,,50\n\
                      withdraw,2,,10\n\
                      withdraw,1,,200\n\
                      deposit,2,,1.5\n\
                      withdraw,1,,100\n\
                      transfer,2,,1\n\
                      deactivate,2,,\n\
                      deposit,2,,1\n";
        let file = create_temp_csv(script);

        let sync_ledger = Ledger::new();
        let mut sync_output = Vec::new();
        SyncProcessingStrategy
            .process(file.path(), &sync_ledger, ReportKind::Transactions, &mut sync_output)
            .unwrap();

        let async_ledger = Ledger::new();
        let mut async_output = Vec::new();
        AsyncProcessingStrategy::new(BatchConfig::new(2, 4))
            .process(file.path(), &async_ledger, ReportKind::Transactions, &mut async_output)
            .unwrap();

        assert_eq!(sync_output, async_output);
        assert_eq!(sync_ledger.list_accounts(), async_ledger.list_accounts());
        assert_eq!(async_ledger.get_balance(1), Ok(Decimal::new(50, 0)));
    }
}
