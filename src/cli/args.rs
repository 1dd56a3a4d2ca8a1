use crate::core::LedgerConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply a script of account and transaction operations to an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(about = "Apply a script of account and transaction operations to an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Input CSV script path
    #[arg(value_name = "INPUT", help = "Path to the input CSV script")]
    pub input_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Report written to stdout once the script has run
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "accounts",
        help = "Report to print: 'accounts' or 'transactions'"
    )]
    pub report: ReportKind,

    /// Number of script rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of script rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Account table capacity
    #[arg(
        long = "max-accounts",
        value_name = "COUNT",
        help = "Maximum number of accounts (default: unbounded)"
    )]
    pub max_accounts: Option<usize>,

    /// Transaction log capacity
    #[arg(
        long = "max-transactions",
        value_name = "COUNT",
        help = "Maximum number of transactions (default: unbounded)"
    )]
    pub max_transactions: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// One row per account with its balance
    Accounts,
    /// One row per transaction with its status
    Transactions,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.max_accounts, self.max_transactions)
    }
}
