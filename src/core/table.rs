//! Table store abstractions

use crate::core::record::ExchangeRateRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Display;
use tracing::debug;

/// Largest group of items sent to [`RateTable::batch_write`] at once.
pub const MAX_BATCH_SIZE: usize = 25;

/// Key condition for an index query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCondition {
    TimestampEq(NaiveDate),
}

impl Display for KeyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyCondition::TimestampEq(date) => write!(f, "Timestamp = {date}"),
        }
    }
}

#[async_trait]
pub trait RateTable: Send + Sync {
    /// Inserts or replaces the record for `(currency, timestamp)`.
    async fn put_item(&self, item: ExchangeRateRecord) -> Result<()>;

    /// Writes a group of records. Implementations may apply the group atomically,
    /// but callers must not rely on atomicity across groups.
    async fn batch_write(&self, items: Vec<ExchangeRateRecord>) -> Result<()> {
        for item in items {
            self.put_item(item).await?;
        }
        Ok(())
    }

    /// Returns every record of the named index matching `condition`.
    async fn query(
        &self,
        index: &str,
        condition: KeyCondition,
    ) -> Result<Vec<ExchangeRateRecord>>;
}

/// Buffers puts and hands them to the table in groups of [`MAX_BATCH_SIZE`].
///
/// Call [`BatchWriter::finish`] to write whatever is still buffered.
pub struct BatchWriter<'a> {
    table: &'a dyn RateTable,
    buffer: Vec<ExchangeRateRecord>,
    written: usize,
}

impl<'a> BatchWriter<'a> {
    pub fn new(table: &'a dyn RateTable) -> Self {
        Self {
            table,
            buffer: Vec::with_capacity(MAX_BATCH_SIZE),
            written: 0,
        }
    }

    pub async fn put_item(&mut self, item: ExchangeRateRecord) -> Result<()> {
        self.buffer.push(item);
        if self.buffer.len() >= MAX_BATCH_SIZE {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let items = std::mem::take(&mut self.buffer);
        let count = items.len();
        debug!("Flushing batch of {} items", count);
        self.table.batch_write(items).await?;
        self.written += count;
        Ok(())
    }

    /// Flushes the remaining items and returns how many were written in total.
    pub async fn finish(mut self) -> Result<usize> {
        self.flush().await?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingTable {
        batches: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl RateTable for CountingTable {
        async fn put_item(&self, _item: ExchangeRateRecord) -> Result<()> {
            Ok(())
        }

        async fn batch_write(&self, items: Vec<ExchangeRateRecord>) -> Result<()> {
            self.batches.lock().unwrap().push(items.len());
            Ok(())
        }

        async fn query(
            &self,
            _index: &str,
            _condition: KeyCondition,
        ) -> Result<Vec<ExchangeRateRecord>> {
            Ok(vec![])
        }
    }

    fn record(n: usize) -> ExchangeRateRecord {
        ExchangeRateRecord {
            currency: format!("C{n:02}"),
            rate: Decimal::new(n as i64, 2),
            timestamp: NaiveDate::from_ymd_opt(2024, 7, 17).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_batch_writer_groups_items() {
        let table = CountingTable::default();
        let mut writer = BatchWriter::new(&table);
        for n in 0..60 {
            writer.put_item(record(n)).await.unwrap();
        }
        let written = writer.finish().await.unwrap();

        assert_eq!(written, 60);
        assert_eq!(*table.batches.lock().unwrap(), vec![25, 25, 10]);
    }

    #[tokio::test]
    async fn test_batch_writer_empty_finish_writes_nothing() {
        let table = CountingTable::default();
        let writer = BatchWriter::new(&table);

        assert_eq!(writer.finish().await.unwrap(), 0);
        assert!(table.batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_key_condition_display() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();
        assert_eq!(
            KeyCondition::TimestampEq(date).to_string(),
            "Timestamp = 2024-07-17"
        );
    }
}
