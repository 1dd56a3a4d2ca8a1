//! Core business logic module
//!
//! This module contains the ledger components:
//! - `account_table` - Accounts, id allocation and lookup
//! - `transaction_log` - Submitted transactions and their status
//! - `engine` - Transaction execution under per-account locks
//! - `ledger` - Facade over the three components above
//! - `batch_processor` - Concurrent execution of script batches

pub mod account_table;
pub mod batch_processor;
pub mod engine;
pub mod ledger;
pub mod transaction_log;

pub use account_table::AccountTable;
pub use batch_processor::BatchProcessor;
pub use engine::TransactionEngine;
pub use ledger::{Ledger, LedgerConfig};
pub use transaction_log::TransactionLog;
