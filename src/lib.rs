//! Concurrent Ledger Library
//!
//! # Overview
//!
//! An in-memory ledger of customer accounts that applies deposit and
//! withdrawal transactions under concurrent access. Transactions against
//! the same account are applied one at a time; transactions against
//! different accounts run in parallel.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError, etc.)
//! - [`core`] - Ledger components:
//!   - [`core::account_table`] - Account storage, id allocation and lookup
//!   - [`core::transaction_log`] - Submitted transactions and their status
//!   - [`core::engine`] - Transaction execution under per-account locks
//!   - [`core::ledger`] - Facade over the components above
//! - [`cli`], [`io`], [`strategy`] - Script-driven command-line front-end
//!
//! # Transaction Lifecycle
//!
//! A transaction is created `Pending` and is executed exactly once, ending
//! `Completed` or `Failed`. Validation failures are recorded on the
//! transaction rather than returned to the caller:
//!
//! - **Deposit**: amount must be positive
//! - **Withdraw**: amount must be positive and covered by the balance
//! - any other kind fails as unknown
//!
//! # Example
//!
//! ```
//! use concurrent_ledger::{Ledger, TransactionKind, TransactionStatus};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new();
//! let account = ledger.create_account("alice", Decimal::new(100, 0)).unwrap();
//!
//! let tx = ledger
//!     .create_transaction(account, TransactionKind::Withdraw, Decimal::new(200, 0))
//!     .unwrap();
//! assert_eq!(ledger.execute(tx), Ok(TransactionStatus::Failed));
//! assert_eq!(ledger.get_balance(account), Ok(Decimal::new(100, 0)));
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use self::core::{AccountTable, Ledger, LedgerConfig, TransactionEngine, TransactionLog};
pub use types::{
    AccountId, AccountSnapshot, LedgerCommand, LedgerError, Transaction, TransactionId,
    TransactionKind, TransactionStatus,
};
