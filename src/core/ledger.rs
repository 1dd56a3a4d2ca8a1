//! Ledger facade
//!
//! The `Ledger` bundles the account table, the transaction log and the
//! engine behind the operations a front-end needs. It is `Send + Sync` and
//! cheap to clone; clones share the same underlying state.

use crate::core::account_table::AccountTable;
use crate::core::engine::TransactionEngine;
use crate::core::transaction_log::TransactionLog;
use crate::types::{
    AccountId, AccountSnapshot, LedgerCommand, LedgerError, Transaction, TransactionId,
    TransactionKind, TransactionStatus,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Capacity limits of a ledger
///
/// Both limits default to unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum number of accounts
    pub max_accounts: Option<usize>,

    /// Maximum number of transactions
    pub max_transactions: Option<usize>,
}

impl LedgerConfig {
    pub fn new(max_accounts: Option<usize>, max_transactions: Option<usize>) -> Self {
        Self {
            max_accounts,
            max_transactions,
        }
    }

    pub fn with_max_accounts(mut self, limit: usize) -> Self {
        self.max_accounts = Some(limit);
        self
    }

    pub fn with_max_transactions(mut self, limit: usize) -> Self {
        self.max_transactions = Some(limit);
        self
    }
}

/// In-memory ledger of accounts and transactions
#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: Arc<AccountTable>,
    transactions: Arc<TransactionLog>,
    engine: TransactionEngine,
}

impl Ledger {
    /// Create an unbounded ledger
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let accounts = Arc::new(AccountTable::with_capacity(config.max_accounts));
        let transactions = Arc::new(TransactionLog::with_capacity(config.max_transactions));
        let engine = TransactionEngine::new(Arc::clone(&accounts), Arc::clone(&transactions));

        Self {
            accounts,
            transactions,
            engine,
        }
    }

    /// Open an account; see [`AccountTable::create_account`]
    pub fn create_account(
        &self,
        owner: &str,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        self.accounts.create_account(owner, initial_balance)
    }

    /// Queue a transaction; see [`TransactionLog::create_transaction`]
    pub fn create_transaction(
        &self,
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<TransactionId, LedgerError> {
        self.transactions.create_transaction(account, kind, amount)
    }

    /// Execute a queued transaction; see [`TransactionEngine::execute`]
    pub fn execute(&self, tx: TransactionId) -> Result<TransactionStatus, LedgerError> {
        self.engine.execute(tx)
    }

    /// Queue a transaction and execute it immediately
    ///
    /// Returns the new transaction id with its terminal status.
    pub fn submit(
        &self,
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<(TransactionId, TransactionStatus), LedgerError> {
        let tx = self.create_transaction(account, kind, amount)?;
        let status = self.execute(tx)?;
        Ok((tx, status))
    }

    pub fn get_status(&self, tx: TransactionId) -> Result<TransactionStatus, LedgerError> {
        self.transactions
            .find(tx)
            .map(|entry| entry.status())
            .ok_or_else(|| LedgerError::transaction_not_found(tx))
    }

    pub fn find_transaction(&self, tx: TransactionId) -> Result<Transaction, LedgerError> {
        self.transactions
            .find(tx)
            .map(|entry| entry.snapshot())
            .ok_or_else(|| LedgerError::transaction_not_found(tx))
    }

    /// Current balance of an active account, read under the account lock
    pub fn get_balance(&self, account: AccountId) -> Result<Decimal, LedgerError> {
        self.accounts
            .lookup_active(account)
            .map(|account| account.balance())
            .ok_or_else(|| LedgerError::account_not_found(account))
    }

    pub fn deactivate_account(&self, account: AccountId) -> Result<(), LedgerError> {
        self.accounts.deactivate(account)
    }

    /// All transactions in submission order
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.list_all()
    }

    /// All accounts, active or not, ordered by id
    pub fn list_accounts(&self) -> Vec<AccountSnapshot> {
        self.accounts.list_all()
    }

    /// Apply one shell command
    ///
    /// Creation errors are returned; execution failures are recorded on the
    /// transaction and are not errors here.
    pub fn apply(&self, command: LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                owner,
                initial_balance,
            } => self.create_account(&owner, initial_balance).map(|_| ()),
            LedgerCommand::Deactivate { account } => self.deactivate_account(account),
            LedgerCommand::Submit {
                account,
                kind,
                amount,
            } => self.submit(account, kind, amount).map(|_| ()),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
