//! Account-related types for the ledger
//!
//! This module defines the live `Account` held by the account table and the
//! `AccountSnapshot` value used for reporting.

use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Account identifier
///
/// Assigned from 1 upwards by the account table, never reused.
pub type AccountId = u64;

/// Customer account
///
/// Every account owns its own mutex around the balance. The lock is
/// independent of every other account's lock, so balances of different
/// accounts can be mutated in parallel.
#[derive(Debug)]
pub struct Account {
    id: AccountId,

    /// Opaque customer reference, immutable after creation
    owner: String,

    /// Accounts are never removed, only deactivated
    ///
    /// Flipped only while the balance lock is held, so a reader holding the
    /// lock observes a stable value.
    active: AtomicBool,

    balance: Mutex<Decimal>,
}

impl Account {
    /// Create a new active account
    ///
    /// The caller is responsible for validating `initial_balance`.
    pub fn new(id: AccountId, owner: impl Into<String>, initial_balance: Decimal) -> Self {
        Account {
            id,
            owner: owner.into(),
            active: AtomicBool::new(true),
            balance: Mutex::new(initial_balance),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Acquire this account's exclusive lock
    ///
    /// The balance may only be read or written through the returned guard.
    /// The lock is released when the guard is dropped. A poisoned lock is
    /// recovered: balance updates are single assignments, so the value is
    /// never left half-written.
    pub fn lock(&self) -> MutexGuard<'_, Decimal> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the balance under the account lock
    pub fn balance(&self) -> Decimal {
        *self.lock()
    }

    /// Mark the account inactive
    ///
    /// Returns `false` when the account was already inactive. Takes the
    /// account lock so no transaction is mid-flight on the account while the
    /// flag changes.
    pub fn deactivate(&self) -> bool {
        let _guard = self.lock();
        self.active.swap(false, Ordering::AcqRel)
    }

    /// Consistent copy of the account state for reporting
    pub fn snapshot(&self) -> AccountSnapshot {
        let balance = self.lock();
        AccountSnapshot {
            id: self.id,
            owner: self.owner.clone(),
            balance: *balance,
            active: self.is_active(),
        }
    }
}

/// Point-in-time copy of an account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub owner: String,
    pub balance: Decimal,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_active_with_initial_balance() {
        let account = Account::new(1, "alice", Decimal::new(100, 0));

        assert_eq!(account.id(), 1);
        assert_eq!(account.owner(), "alice");
        assert!(account.is_active());
        assert_eq!(account.balance(), Decimal::new(100, 0));
    }

    #[test]
    fn test_lock_guards_balance_mutation() {
        let account = Account::new(1, "alice", Decimal::new(100, 0));

        {
            let mut balance = account.lock();
            *balance += Decimal::new(50, 0);
        }

        assert_eq!(account.balance(), Decimal::new(150, 0));
    }

    #[test]
    fn test_deactivate_only_once() {
        let account = Account::new(1, "alice", Decimal::ZERO);

        assert!(account.deactivate());
        assert!(!account.is_active());
        assert!(!account.deactivate());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let account = Account::new(2, "bob", Decimal::new(2500, 2));
        account.deactivate();

        let snapshot = account.snapshot();
        assert_eq!(
            snapshot,
            AccountSnapshot {
                id: 2,
                owner: "bob".to_string(),
                balance: Decimal::new(2500, 2),
                active: false,
            }
        );
    }
}
