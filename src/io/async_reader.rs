//! Asynchronous script reader
//!
//! This module provides `AsyncReader`, which reads script rows in batches
//! from any `futures::io::AsyncRead` source using `csv-async`.

use crate::io::csv_format::{convert_script_record, ScriptRecord};
use crate::types::LedgerCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use log::warn;

/// Batching reader over an async script source
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` valid commands
    ///
    /// Malformed rows are logged and skipped; they do not count towards the
    /// batch size. An empty batch means the end of the input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ScriptRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match convert_script_record(record) {
                    Ok(command) => batch.push(command),
                    Err(e) => warn!("Skipping script row: {}", e),
                },
                Some(Err(e)) => warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let csv_content = "type,account,owner,amount\n\
            open,,alice,10\n\
            deposit,1,,1\n\
            deposit,1,,2\n\
            withdraw,1,,3\n\
            deposit,1,,4\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch1 = async_reader.read_batch(2).await;
        assert_eq!(batch1.len(), 2);
        assert!(matches!(batch1[0], LedgerCommand::Open { .. }));

        let batch2 = async_reader.read_batch(2).await;
        assert_eq!(
            batch2[1],
            LedgerCommand::Submit {
                account: 1,
                kind: TransactionKind::Withdraw,
                amount: Decimal::new(3, 0),
            }
        );

        let batch3 = async_reader.read_batch(2).await;
        assert_eq!(batch3.len(), 1);

        let batch4 = async_reader.read_batch(2).await;
        assert_eq!(batch4.len(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let reader = Cursor::new("type,account,owner,amount\n".as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_malformed_rows() {
        let csv_content = "type,account,owner,amount\n\
            deposit,1,,abc\n\
            open,,,5\n\
            deposit,nope,,1\n\
            deposit,1,,2\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![LedgerCommand::Submit {
                account: 1,
                kind: TransactionKind::Deposit,
                amount: Decimal::new(2, 0),
            }]
        );
    }

    #[tokio::test]
    async fn test_async_reader_keeps_unknown_kinds() {
        let reader = Cursor::new("type,account,owner,amount\ntransfer,1,,5\n".as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![LedgerCommand::Submit {
                account: 1,
                kind: TransactionKind::Unknown("transfer".to_string()),
                amount: Decimal::new(5, 0),
            }]
        );
    }
}
