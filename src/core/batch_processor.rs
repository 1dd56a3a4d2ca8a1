//! Concurrent batch processing for the async strategy
//!
//! This module provides the `BatchProcessor`, which applies a batch of
//! shell commands to a shared `Ledger` using tokio tasks.
//!
//! # Ordering
//!
//! A batch is split into segments at lifecycle commands (`Open`,
//! `Deactivate`). Lifecycle commands run alone, in file order. Within a
//! segment every transaction is first queued in file order, so transaction
//! ids match what sequential processing would assign. The queued
//! transactions are then partitioned by target account and each account's
//! list is executed in order by its own task. Different accounts run in
//! parallel, which is exactly the isolation the engine's per-account locks
//! allow, and the end state equals sequential processing.

use std::collections::HashMap;
use std::mem;

use log::{error, warn};

use crate::core::Ledger;
use crate::types::{AccountId, LedgerCommand, LedgerError, TransactionId};

/// Result of applying a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was applied
    pub command: LedgerCommand,

    /// Creation errors and `TransactionNotFound`; execution failures are
    /// recorded on the transaction and reported as `Ok`
    pub result: Result<(), LedgerError>,
}

impl ProcessingResult {
    /// Pair a command with its result, logging rejections
    pub fn new(command: LedgerCommand, result: Result<(), LedgerError>) -> Self {
        if let Err(e) = &result {
            warn!("Command {:?} rejected: {}", command, e);
        }
        Self { command, result }
    }
}

/// Applies command batches with per-account parallelism
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    ledger: Ledger,
}

impl BatchProcessor {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Group queued transactions by target account, keeping their order
    pub fn partition_by_account(
        &self,
        queued: Vec<(AccountId, TransactionId, LedgerCommand)>,
    ) -> HashMap<AccountId, Vec<(TransactionId, LedgerCommand)>> {
        let mut account_batches: HashMap<AccountId, Vec<(TransactionId, LedgerCommand)>> =
            HashMap::new();

        for (account, tx, command) in queued {
            account_batches
                .entry(account)
                .or_default()
                .push((tx, command));
        }

        account_batches
    }

    /// Apply a batch of commands
    ///
    /// Returns one result per command. Results of transactions that ran
    /// concurrently come back in no particular order.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(batch.len());
        let mut segment = Vec::new();

        for command in batch {
            if command.is_lifecycle() {
                results.extend(self.process_segment(mem::take(&mut segment)).await);

                let result = self.ledger.apply(command.clone());
                results.push(ProcessingResult::new(command, result));
            } else {
                segment.push(command);
            }
        }

        results.extend(self.process_segment(segment).await);
        results
    }

    /// Queue a run of transaction commands in order, then execute them
    /// concurrently across accounts
    async fn process_segment(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        if commands.is_empty() {
            return Vec::new();
        }

        let mut results = Vec::new();
        let mut queued = Vec::with_capacity(commands.len());

        for command in commands {
            let LedgerCommand::Submit {
                account,
                kind,
                amount,
            } = &command
            else {
                continue;
            };

            match self
                .ledger
                .create_transaction(*account, kind.clone(), *amount)
            {
                Ok(tx) => queued.push((*account, tx, command)),
                Err(e) => results.push(ProcessingResult::new(command, Err(e))),
            }
        }

        // Spawn one tokio task per account
        let mut tasks = Vec::new();
        for (_account, transactions) in self.partition_by_account(queued) {
            let ledger = self.ledger.clone();
            let task = tokio::spawn(async move {
                transactions
                    .into_iter()
                    .map(|(tx, command)| {
                        ProcessingResult::new(command, ledger.execute(tx).map(|_| ()))
                    })
                    .collect::<Vec<_>>()
            });
            tasks.push(task);
        }

        for task in tasks {
            match task.await {
                Ok(account_results) => results.extend(account_results),
                Err(e) => {
                    error!("Task panicked: {:?}", e);
                }
            }
        }

        results
    }
}
