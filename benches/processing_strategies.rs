//! Benchmark suite for comparing processing strategies
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Fixtures:
//! - `benchmark_small.csv` - 10 accounts, 100 transactions
//! - `benchmark_medium.csv` - 100 accounts, 10,000 transactions

use concurrent_ledger::cli::StrategyType;
use concurrent_ledger::core::Ledger;
use concurrent_ledger::strategy::create_strategy;
use concurrent_ledger::strategy::BatchConfig;
use concurrent_ledger::TransactionKind;
use rust_decimal::Decimal;
use std::path::Path;

fn main() {
    divan::main();
}

fn run(strategy_type: StrategyType, fixture: &str) {
    let config = matches!(strategy_type, StrategyType::Async).then(BatchConfig::default);
    let strategy = create_strategy(strategy_type, config);
    let ledger = Ledger::new();

    strategy
        .run(Path::new(fixture), &ledger)
        .expect("Processing failed");
}

#[divan::bench]
fn sync_strategy_small() {
    run(StrategyType::Sync, "benches/fixtures/benchmark_small.csv");
}

#[divan::bench]
fn async_strategy_small() {
    run(StrategyType::Async, "benches/fixtures/benchmark_small.csv");
}

#[divan::bench]
fn sync_strategy_medium() {
    run(StrategyType::Sync, "benches/fixtures/benchmark_medium.csv");
}

#[divan::bench]
fn async_strategy_medium() {
    run(StrategyType::Async, "benches/fixtures/benchmark_medium.csv");
}

/// Contended deposits from 8 threads against one account versus 8 accounts
#[divan::bench(args = [1, 8])]
fn threaded_deposits(accounts: u64) {
    let ledger = Ledger::new();
    for i in 0..accounts {
        ledger
            .create_account(&format!("owner-{}", i), Decimal::ZERO)
            .expect("Account creation failed");
    }

    std::thread::scope(|scope| {
        for t in 0..8u64 {
            let ledger = &ledger;
            scope.spawn(move || {
                let account = t % accounts + 1;
                for _ in 0..1000 {
                    ledger
                        .submit(account, TransactionKind::Deposit, Decimal::ONE)
                        .expect("Submit failed");
                }
            });
        }
    });
}
