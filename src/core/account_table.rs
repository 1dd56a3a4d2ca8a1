//! Account table
//!
//! This module provides the `AccountTable`, which owns every account of the
//! ledger and hands out shared references to them.
//!
//! # Design
//!
//! Accounts are indexed by id in a `DashMap`. The map's shard locks only
//! protect the index itself: lookups clone the account's `Arc` and release
//! the shard before the caller takes the account's own lock. Balance
//! mutation is therefore serialized per account, never per table.
//!
//! Account creation is rare and cheap, so it is fully serialized on a
//! table-wide creation lock that also owns the id counter. That keeps the
//! capacity check, the id allocation and the insertion atomic.

use crate::types::{Account, AccountId, AccountSnapshot, LedgerError};
use dashmap::DashMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, PoisonError};

/// Thread-safe table of accounts
///
/// All methods take `&self` and may be called from any number of threads.
#[derive(Debug)]
pub struct AccountTable {
    /// Id-indexed accounts
    accounts: DashMap<AccountId, Arc<Account>>,

    /// Next id to hand out; held for the whole of `create_account`
    next_id: Mutex<AccountId>,

    /// Maximum number of accounts, `None` for unbounded
    capacity: Option<usize>,
}

impl AccountTable {
    /// Create an empty, unbounded table
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create an empty table holding at most `capacity` accounts
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: Mutex::new(1),
            capacity,
        }
    }

    /// Open a new active account
    ///
    /// # Arguments
    ///
    /// * `owner` - Opaque customer reference
    /// * `initial_balance` - Opening balance, must not be negative
    ///
    /// # Returns
    ///
    /// * `Ok(AccountId)` - The freshly allocated id
    /// * `Err(LedgerError::CapacityExceeded)` - If the table is full
    /// * `Err(LedgerError::InvalidAmount)` - If `initial_balance` is negative
    pub fn create_account(
        &self,
        owner: &str,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.capacity {
            if self.accounts.len() >= limit {
                warn!("Account table full ({} accounts)", limit);
                return Err(LedgerError::capacity_exceeded("accounts", limit));
            }
        }

        if initial_balance < Decimal::ZERO {
            warn!("Rejected negative opening balance {} for {}", initial_balance, owner);
            return Err(LedgerError::invalid_amount(initial_balance));
        }

        let id = *next_id;
        *next_id += 1;
        self.accounts
            .insert(id, Arc::new(Account::new(id, owner, initial_balance)));

        debug!("Opened account {} for {} with {}", id, owner, initial_balance);
        Ok(id)
    }

    /// Look up an active account
    ///
    /// Returns `None` if the id is unknown or the account was deactivated.
    /// The account's lock is not acquired; callers lock it explicitly before
    /// touching the balance.
    pub fn lookup_active(&self, id: AccountId) -> Option<Arc<Account>> {
        self.lookup(id).filter(|account| account.is_active())
    }

    /// Look up an account regardless of its active flag
    pub fn lookup(&self, id: AccountId) -> Option<Arc<Account>> {
        self.accounts.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Deactivate an account
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the id is unknown or already inactive.
    pub fn deactivate(&self, id: AccountId) -> Result<(), LedgerError> {
        let account = self
            .lookup_active(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        if account.deactivate() {
            debug!("Deactivated account {}", id);
            Ok(())
        } else {
            Err(LedgerError::account_not_found(id))
        }
    }

    /// Snapshots of all accounts, ordered by id
    ///
    /// Each account is locked on its own while it is copied; the result is
    /// not a single atomic cut across accounts.
    pub fn list_all(&self) -> Vec<AccountSnapshot> {
        // Collect the handles first so no shard lock is held while
        // account locks are taken.
        let accounts: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut snapshots: Vec<AccountSnapshot> =
            accounts.iter().map(|account| account.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Number of accounts ever created (active or not)
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountTable {
    fn default() -> Self {
        Self::new()
    }
}
