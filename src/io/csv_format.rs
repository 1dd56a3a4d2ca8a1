//! CSV format handling for ledger scripts and reports
//!
//! This module centralizes the CSV format knowledge:
//! - `ScriptRecord`: the raw row of an input script
//! - `convert_script_record`: validation and conversion into a `LedgerCommand`
//! - `write_accounts_csv` / `write_transactions_csv`: report serialization
//!
//! # Script Format
//!
//! ```text
//! type,account,owner,amount
//! open,,alice,100
//! deposit,1,,50
//! withdraw,1,,200
//! deactivate,1,,
//! ```
//!
//! Any `type` other than `open` and `deactivate` is submitted as a
//! transaction of that kind; unknown kinds fail when executed.

use crate::types::{
    AccountId, AccountSnapshot, LedgerCommand, LedgerError, Transaction, TransactionKind,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Raw script row as read from CSV
///
/// Fields are kept as loosely typed as possible so that a bad value is
/// reported with context instead of failing deserialization.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScriptRecord {
    #[serde(rename = "type")]
    pub op: String,
    pub account: Option<AccountId>,
    pub owner: Option<String>,
    pub amount: Option<String>,
}

fn parse_amount(record: &ScriptRecord) -> Result<Option<Decimal>, String> {
    match record.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => Decimal::from_str(amount_str)
            .map(Some)
            .map_err(|_| format!("Invalid amount '{}' for '{}'", amount_str, record.op)),
        _ => Ok(None),
    }
}

fn require_account(record: &ScriptRecord) -> Result<AccountId, String> {
    record
        .account
        .ok_or_else(|| format!("'{}' requires an account", record.op))
}

/// Convert a raw script row into a ledger command
///
/// # Errors
///
/// Returns a description of the problem if a required field is missing or
/// the amount is not a decimal number. Business rules (negative amounts,
/// unknown kinds) are left to the ledger.
pub fn convert_script_record(record: ScriptRecord) -> Result<LedgerCommand, String> {
    let amount = parse_amount(&record)?;

    match record.op.trim().to_lowercase().as_str() {
        "open" => {
            let owner = record
                .owner
                .as_deref()
                .map(str::trim)
                .filter(|owner| !owner.is_empty())
                .ok_or_else(|| "'open' requires an owner".to_string())?;
            Ok(LedgerCommand::Open {
                owner: owner.to_string(),
                initial_balance: amount.unwrap_or(Decimal::ZERO),
            })
        }
        "deactivate" => Ok(LedgerCommand::Deactivate {
            account: require_account(&record)?,
        }),
        _ => {
            let account = require_account(&record)?;
            let amount = amount.ok_or_else(|| {
                format!("'{}' on account {} requires an amount", record.op, account)
            })?;
            Ok(LedgerCommand::Submit {
                account,
                kind: TransactionKind::from(record.op.as_str()),
                amount,
            })
        }
    }
}

/// Write account snapshots as CSV
///
/// Columns: `account,owner,balance,active`. Rows are sorted by account id
/// and balances are printed with four decimal places.
pub fn write_accounts_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "owner", "balance", "active"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer.write_record(&[
            account.id.to_string(),
            account.owner,
            format!("{:.4}", account.balance),
            account.active.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

/// Write the transaction table as CSV
///
/// Columns: `tx,account,type,amount,status`, in submission order.
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["tx", "account", "type", "amount", "status"])?;

    let mut sorted_transactions = transactions.to_vec();
    sorted_transactions.sort_by_key(|tx| tx.id);

    for tx in sorted_transactions {
        writer.write_record(&[
            tx.id.to_string(),
            tx.account.to_string(),
            tx.kind.to_string(),
            format!("{:.4}", tx.amount),
            tx.status.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
