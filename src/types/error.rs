//! Error types for the ledger engine
//!
//! This module defines every error the ledger can report.
//!
//! # Error Categories
//!
//! - **Creation Errors**: capacity limits and negative opening balances, returned
//!   synchronously from `create_account` / `create_transaction`
//! - **Execution Errors**: recorded as the failure reason of a `Failed` transaction
//! - **Lookup Errors**: unknown account or transaction ids
//! - **Shell Errors**: I/O and CSV parsing problems in the script front-end

use super::account::AccountId;
use super::transaction::{TransactionId, TransactionStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// All variants are recoverable. Validation failures raised while executing a
/// transaction are stored on the transaction instead of being returned to the
/// caller of `execute`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A table has reached its configured capacity
    #[error("Capacity exceeded: at most {limit} {resource} allowed")]
    CapacityExceeded {
        /// Which table is full ("accounts" or "transactions")
        resource: String,
        /// The configured limit
        limit: usize,
    },

    /// Amount is not acceptable for the requested operation
    ///
    /// Raised for a negative opening balance and for non-positive deposits.
    #[error("Invalid amount {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// No active account with this id
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The account id that was looked up
        account: AccountId,
    },

    /// No transaction with this id was ever created
    #[error("Transaction {tx} not found")]
    TransactionNotFound {
        /// The transaction id that was looked up
        tx: TransactionId,
    },

    /// Withdrawal amount is non-positive or exceeds the balance
    #[error(
        "Insufficient funds or invalid amount for account {account}: balance {balance}, requested {requested}"
    )]
    InsufficientFundsOrInvalidAmount {
        /// Target account
        account: AccountId,
        /// Balance at the time of the check
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// The transaction kind is neither a deposit nor a withdrawal
    #[error("Unknown transaction type '{kind}'")]
    UnknownTransactionType {
        /// The kind name as submitted
        kind: String,
    },

    /// Applying the deposit would overflow the balance
    #[error("Arithmetic overflow on account {account}")]
    ArithmeticOverflow {
        /// Target account
        account: AccountId,
    },

    /// The transaction already reached a terminal status
    #[error("Transaction {tx} is already {status}")]
    TransactionAlreadyFinalized {
        /// Transaction id
        tx: TransactionId,
        /// The terminal status it holds
        status: TransactionStatus,
    },

    /// I/O error while reading a script or writing a report
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Malformed script row
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a CapacityExceeded error
    pub fn capacity_exceeded(resource: &str, limit: usize) -> Self {
        LedgerError::CapacityExceeded {
            resource: resource.to_string(),
            limit,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx: TransactionId) -> Self {
        LedgerError::TransactionNotFound { tx }
    }

    /// Create an InsufficientFundsOrInvalidAmount error
    pub fn insufficient_funds_or_invalid_amount(
        account: AccountId,
        balance: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFundsOrInvalidAmount {
            account,
            balance,
            requested,
        }
    }

    /// Create an UnknownTransactionType error
    pub fn unknown_transaction_type(kind: &str) -> Self {
        LedgerError::UnknownTransactionType {
            kind: kind.to_string(),
        }
    }

    pub fn arithmetic_overflow(account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow { account }
    }

    pub fn already_finalized(tx: TransactionId, status: TransactionStatus) -> Self {
        LedgerError::TransactionAlreadyFinalized { tx, status }
    }

    /// Create an IoError error
    pub fn io_error(message: impl Into<String>) -> Self {
        LedgerError::IoError {
            message: message.into(),
        }
    }

    /// Create a ParseError error for a script line
    pub fn parse_error(line: u64, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line: Some(line),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::capacity_exceeded(
        LedgerError::capacity_exceeded("accounts", 1000),
        "Capacity exceeded: at most 1000 accounts allowed"
    )]
    #[case::invalid_amount(
        LedgerError::invalid_amount(Decimal::new(-5, 0)),
        "Invalid amount -5"
    )]
    #[case::account_not_found(LedgerError::account_not_found(7), "Account 7 not found")]
    #[case::transaction_not_found(
        LedgerError::transaction_not_found(99),
        "Transaction 99 not found"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds_or_invalid_amount(
            1,
            Decimal::new(150, 0),
            Decimal::new(200, 0)
        ),
        "Insufficient funds or invalid amount for account 1: balance 150, requested 200"
    )]
    #[case::unknown_type(
        LedgerError::unknown_transaction_type("transfer"),
        "Unknown transaction type 'transfer'"
    )]
    #[case::overflow(LedgerError::arithmetic_overflow(3), "Arithmetic overflow on account 3")]
    #[case::already_finalized(
        LedgerError::already_finalized(4, TransactionStatus::Completed),
        "Transaction 4 is already Completed"
    )]
    #[case::parse_error_with_line(
        LedgerError::parse_error(42, "Invalid field"),
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_csv_error_conversion() {
        let csv_error = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("not-a-number\n".as_bytes())
            .deserialize::<u64>()
            .next()
            .unwrap()
            .unwrap_err();

        let error: LedgerError = csv_error.into();

        assert!(matches!(error, LedgerError::ParseError { line: Some(_), .. }));
        assert!(error.to_string().starts_with("CSV parse error at line"));
    }
}
