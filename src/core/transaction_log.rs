//! Transaction log
//!
//! This module provides the `TransactionLog`, which records every submitted
//! transaction together with its lifecycle status.
//!
//! # Design
//!
//! Entries live in a `BTreeMap` keyed by id behind a log-wide `RwLock`.
//! Ids are allocated monotonically under the write lock, so id order is
//! insertion order and `list_all` can report in submission order without
//! extra bookkeeping.
//!
//! The log lock only protects the index. Each entry carries its own small
//! outcome lock, so the engine records a status without re-entering the
//! log-wide lock while it holds an account lock.

use crate::types::{
    AccountId, LedgerError, Transaction, TransactionEntry, TransactionId, TransactionKind,
    TransactionStatus,
};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct LogIndex {
    entries: BTreeMap<TransactionId, Arc<TransactionEntry>>,
    next_id: TransactionId,
}

/// Thread-safe, append-only transaction log
#[derive(Debug)]
pub struct TransactionLog {
    index: RwLock<LogIndex>,

    /// Maximum number of transactions, `None` for unbounded
    capacity: Option<usize>,
}

impl TransactionLog {
    /// Create an empty, unbounded log
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create an empty log holding at most `capacity` transactions
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            index: RwLock::new(LogIndex {
                entries: BTreeMap::new(),
                next_id: 1,
            }),
            capacity,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, LogIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LogIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new `Pending` transaction
    ///
    /// Neither the account id nor the amount is validated here; all business
    /// validation happens when the transaction is executed.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the log is full.
    pub fn create_transaction(
        &self,
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        let mut index = self.write();

        if let Some(limit) = self.capacity {
            if index.entries.len() >= limit {
                warn!("Transaction log full ({} transactions)", limit);
                return Err(LedgerError::capacity_exceeded("transactions", limit));
            }
        }

        let id = index.next_id;
        index.next_id += 1;
        debug!(
            "Queued transaction {}: {} {} on account {}",
            id, kind, amount, account
        );
        index
            .entries
            .insert(id, Arc::new(TransactionEntry::new(id, account, kind, amount)));

        Ok(id)
    }

    /// Find a transaction by id
    pub fn find(&self, id: TransactionId) -> Option<Arc<TransactionEntry>> {
        self.read().entries.get(&id).map(Arc::clone)
    }

    /// Record the terminal status of a transaction
    ///
    /// `Ok(())` completes the transaction, `Err(reason)` fails it. The engine
    /// finalizes entries it has already resolved directly on the entry; both
    /// paths share the same one-shot transition.
    ///
    /// # Errors
    ///
    /// * `TransactionNotFound` - The id was never created
    /// * `TransactionAlreadyFinalized` - The transaction is already terminal
    pub fn update_status(
        &self,
        id: TransactionId,
        result: Result<(), LedgerError>,
    ) -> Result<TransactionStatus, LedgerError> {
        self.find(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?
            .finalize(result)
    }

    /// Snapshots of every transaction in submission order
    pub fn list_all(&self) -> Vec<Transaction> {
        self.read()
            .entries
            .values()
            .map(|entry| entry.snapshot())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
