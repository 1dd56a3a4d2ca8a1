//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account-related types
//! - `transaction`: Transaction-related types and identifiers
//! - `command`: Shell commands applied to a ledger
//! - `error`: Error types for the ledger

pub mod account;
pub mod command;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId, AccountSnapshot};
pub use command::LedgerCommand;
pub use error::LedgerError;
pub use transaction::{
    Transaction, TransactionEntry, TransactionId, TransactionKind, TransactionStatus,
};
