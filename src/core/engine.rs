//! Transaction execution engine
//!
//! This module provides the `TransactionEngine`, which applies queued
//! transactions to their target accounts.
//!
//! # Locking Discipline
//!
//! ```text
//! execute(tx)
//!     ├── TransactionLog::find         (log read lock, released)
//!     ├── AccountTable::lookup_active  (shard lock, released)
//!     └── Account::lock                (held until return)
//!           ├── validate
//!           ├── record status          (per-entry lock)
//!           └── write balance
//! ```
//!
//! Every execution holds at most one account lock and never waits on an
//! index lock while holding it, so two executions cannot deadlock.
//! Executions against the same account are serialized by that account's
//! lock; executions against different accounts run in parallel.
//!
//! The engine is cheap to clone and can be shared across threads and tasks.

use crate::core::account_table::AccountTable;
use crate::core::transaction_log::TransactionLog;
use crate::types::{
    AccountId, LedgerError, TransactionEntry, TransactionId, TransactionKind, TransactionStatus,
};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Transaction execution orchestrator
///
/// Resolves a transaction's account, takes that account's lock, validates
/// the business rules and records the outcome.
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    accounts: Arc<AccountTable>,
    transactions: Arc<TransactionLog>,
}

impl TransactionEngine {
    /// Create an engine over a shared account table and transaction log
    pub fn new(accounts: Arc<AccountTable>, transactions: Arc<TransactionLog>) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    /// Execute a pending transaction
    ///
    /// Validation failures are not returned as errors: they are recorded on
    /// the transaction as a `Failed` status with the reason attached, and
    /// `Ok(TransactionStatus::Failed)` is returned. Validation runs before
    /// any mutation, so a failed transaction never partially applies.
    ///
    /// The outcome is recorded with `TransactionEntry::finalize` on the entry
    /// already resolved in step one, which is what
    /// `TransactionLog::update_status` does after its own lookup. Going
    /// through the entry keeps the log lock out of the account critical
    /// section.
    ///
    /// # Arguments
    ///
    /// * `tx` - Id returned by `TransactionLog::create_transaction`
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionStatus)` - The terminal status just recorded
    /// * `Err(LedgerError::TransactionNotFound)` - If the id was never created
    /// * `Err(LedgerError::TransactionAlreadyFinalized)` - If the transaction
    ///   was already executed; the balance is left untouched
    pub fn execute(&self, tx: TransactionId) -> Result<TransactionStatus, LedgerError> {
        let entry = self.transactions.find(tx).ok_or_else(|| {
            warn!("Transaction {} not found", tx);
            LedgerError::transaction_not_found(tx)
        })?;

        let account_id = entry.account();
        let Some(account) = self.accounts.lookup_active(account_id) else {
            warn!("Account {} not found for transaction {}", account_id, tx);
            return entry.finalize(Err(LedgerError::account_not_found(account_id)));
        };

        let mut balance = account.lock();

        // Deactivation takes the account lock, so this answer is stable
        // until the guard drops.
        if !account.is_active() {
            warn!("Account {} deactivated before transaction {}", account_id, tx);
            return entry.finalize(Err(LedgerError::account_not_found(account_id)));
        }

        match Self::validate(&entry, account_id, *balance) {
            Ok(new_balance) => {
                let status = entry.finalize(Ok(()))?;
                *balance = new_balance;
                debug!(
                    "Transaction {}: {} {} on account {}, new balance {}",
                    tx,
                    entry.kind(),
                    entry.amount(),
                    account_id,
                    new_balance
                );
                Ok(status)
            }
            Err(reason) => {
                warn!("Transaction {} failed: {}", tx, reason);
                entry.finalize(Err(reason))
            }
        }
    }

    /// Check the business rules and compute the post-transaction balance
    fn validate(
        entry: &TransactionEntry,
        account: AccountId,
        balance: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let amount = entry.amount();

        match entry.kind() {
            TransactionKind::Deposit => {
                if amount <= Decimal::ZERO {
                    return Err(LedgerError::invalid_amount(amount));
                }
                balance
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::arithmetic_overflow(account))
            }
            TransactionKind::Withdraw => {
                if amount <= Decimal::ZERO || amount > balance {
                    return Err(LedgerError::insufficient_funds_or_invalid_amount(
                        account, balance, amount,
                    ));
                }
                Ok(balance - amount)
            }
            TransactionKind::Unknown(name) => Err(LedgerError::unknown_transaction_type(name)),
        }
    }
}
