//! Transaction-related types for the ledger
//!
//! This module defines transaction kinds, the status state machine, the live
//! `TransactionEntry` kept by the transaction log and the `Transaction`
//! snapshot handed out for reporting.

use super::account::AccountId;
use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Transaction identifier
///
/// Assigned from 1 upwards by the transaction log. Numbered independently of
/// account ids.
pub type TransactionId = u64;

/// Kinds of transaction the engine knows how to apply
///
/// Kind names are not validated when a transaction is created. Only
/// `deposit` and `withdraw` are recognised (case-insensitively); any other
/// name is kept as `Unknown` and the transaction fails when it is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account
    ///
    /// Requires the amount to be covered by the current balance.
    Withdraw,

    /// Unrecognised kind name, rejected at execution time
    Unknown(String),
}

impl From<&str> for TransactionKind {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "deposit" => TransactionKind::Deposit,
            "withdraw" => TransactionKind::Withdraw,
            _ => TransactionKind::Unknown(name.trim().to_string()),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdraw => f.write_str("Withdraw"),
            TransactionKind::Unknown(name) => f.write_str(name),
        }
    }
}

/// Lifecycle status of a transaction
///
/// ```text
/// Pending --(validation passes)--> Completed
/// Pending --(validation fails | account missing | unknown kind)--> Failed
/// ```
///
/// Both `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Point-in-time copy of a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub account: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,

    /// Why the transaction failed (set together with `Failed`)
    pub failure: Option<LedgerError>,
}

#[derive(Debug)]
struct Outcome {
    status: TransactionStatus,
    failure: Option<LedgerError>,
}

/// Transaction as stored in the transaction log
///
/// The immutable request fields are plain values; only the outcome sits
/// behind a small per-entry mutex, so recording a status never touches the
/// log-wide index lock.
#[derive(Debug)]
pub struct TransactionEntry {
    id: TransactionId,
    account: AccountId,
    kind: TransactionKind,
    amount: Decimal,
    outcome: Mutex<Outcome>,
}

impl TransactionEntry {
    /// Create a new entry in the `Pending` state
    pub fn new(
        id: TransactionId,
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Self {
        TransactionEntry {
            id,
            account,
            kind,
            amount,
            outcome: Mutex::new(Outcome {
                status: TransactionStatus::Pending,
                failure: None,
            }),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    /// Record the terminal outcome of this transaction
    ///
    /// `Ok(())` moves the entry to `Completed`, `Err(reason)` to `Failed` with
    /// the reason attached. The transition happens at most once.
    ///
    /// # Errors
    ///
    /// Returns `TransactionAlreadyFinalized` if the entry is not `Pending`.
    pub fn finalize(
        &self,
        result: Result<(), LedgerError>,
    ) -> Result<TransactionStatus, LedgerError> {
        let mut outcome = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        if outcome.status.is_terminal() {
            return Err(LedgerError::already_finalized(self.id, outcome.status));
        }

        match result {
            Ok(()) => outcome.status = TransactionStatus::Completed,
            Err(reason) => {
                outcome.status = TransactionStatus::Failed;
                outcome.failure = Some(reason);
            }
        }
        Ok(outcome.status)
    }

    pub fn snapshot(&self) -> Transaction {
        let outcome = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        Transaction {
            id: self.id,
            account: self.account,
            kind: self.kind.clone(),
            amount: self.amount,
            status: outcome.status,
            failure: outcome.failure.clone(),
        }
    }
}
