//! Shell commands
//!
//! A `LedgerCommand` is one already-validated row of a script, ready to be
//! applied to a `Ledger`.

use super::account::AccountId;
use super::transaction::TransactionKind;
use rust_decimal::Decimal;

/// A single operation requested by the shell
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Open a new account for `owner`
    Open {
        owner: String,
        initial_balance: Decimal,
    },

    /// Deactivate an existing account
    Deactivate { account: AccountId },

    /// Create a transaction and execute it straight away
    Submit {
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
    },
}

impl LedgerCommand {
    /// Whether the command changes the set of active accounts
    ///
    /// Lifecycle commands act as ordering barriers for concurrent
    /// processing: every transaction before them must have run first.
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, LedgerCommand::Submit { .. })
    }
}
