//! End-to-end integration tests
//!
//! These tests validate the complete script processing pipeline using
//! predefined CSV fixtures. Each fixture directory under `tests/fixtures/`
//! holds:
//! - `input.csv`: the script
//! - `expected.csv`: the accounts report
//! - `expected_transactions.csv`: the transactions report
//!
//! Every fixture is run with both the synchronous and the async strategy.

#[cfg(test)]
mod tests {
    use concurrent_ledger::cli::{ReportKind, StrategyType};
    use concurrent_ledger::core::{Ledger, LedgerConfig};
    use concurrent_ledger::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a fixture script and compare one report with its expected file
    fn run_test_fixture(
        fixture_name: &str,
        strategy_type: StrategyType,
        report: ReportKind,
        expected_file: &str,
    ) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/{}", fixture_dir, expected_file);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        // Small batches so scripts span several of them in async mode
        let strategy = create_strategy(strategy_type, Some(BatchConfig::new(3, 4)));
        let ledger = Ledger::new();

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(Path::new(&input_path), &ledger, report, &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to process script: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?}, report: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, report, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path")]
    #[case("invalid_amounts")]
    #[case("missing_accounts")]
    #[case("unknown_types")]
    #[case("deactivation")]
    #[case("multiple_accounts")]
    #[case("malformed_data")]
    #[case("precision_testing")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, ReportKind::Accounts, "expected.csv");
        run_test_fixture(
            fixture,
            strategy,
            ReportKind::Transactions,
            "expected_transactions.csv",
        );
    }

    #[rstest]
    fn test_capacity_limits(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let mut script = NamedTempFile::new().expect("Failed to create temp file");
        script
            .write_all(
                b"type,account,owner,amount\n\
                  open,,alice,10\n\
                  open,,bob,10\n\
                  deposit,1,,1\n\
                  deposit,1,,1\n\
                  deposit,1,,1\n",
            )
            .unwrap();
        script.flush().unwrap();

        let ledger = Ledger::with_config(LedgerConfig::new(Some(1), Some(2)));
        let mut output = Vec::new();
        create_strategy(strategy, None)
            .process(script.path(), &ledger, ReportKind::Accounts, &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,owner,balance,active\n1,alice,12.0000,true\n"
        );
        assert_eq!(ledger.list_transactions().len(), 2);
    }
}
