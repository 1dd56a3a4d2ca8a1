//! Ledger CLI
//!
//! Applies a CSV script of ledger operations and prints a report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --strategy sync --report transactions script.csv > transactions.csv
//! cargo run -- --max-accounts 1000 --max-transactions 100 script.csv
//! RUST_LOG=debug cargo run -- script.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use concurrent_ledger::cli;
use concurrent_ledger::core::Ledger;
use concurrent_ledger::strategy;
use log::error;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let ledger = Ledger::with_config(args.to_ledger_config());

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &ledger, args.report, &mut output) {
        error!("{}", e);
        process::exit(1);
    }
}
