use crate::core::table::{KeyCondition, RateTable};
use crate::core::ExchangeRateRecord;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use tracing::debug;

type PrimaryKey = (String, NaiveDate);

#[derive(Default)]
struct Inner {
    items: BTreeMap<PrimaryKey, ExchangeRateRecord>,
    by_timestamp: BTreeMap<NaiveDate, BTreeSet<String>>,
}

/// In-memory table keyed by `(currency, timestamp)` with a timestamp index.
pub struct MemoryTable {
    index: String,
    inner: Mutex<Inner>,
}

impl MemoryTable {
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Inner {
    fn upsert(&mut self, item: ExchangeRateRecord) {
        self.by_timestamp
            .entry(item.timestamp)
            .or_default()
            .insert(item.currency.clone());
        self.items
            .insert((item.currency.clone(), item.timestamp), item);
    }
}

#[async_trait]
impl RateTable for MemoryTable {
    async fn put_item(&self, item: ExchangeRateRecord) -> Result<()> {
        debug!("Table PUT {} @ {}", item.currency, item.timestamp);
        self.inner.lock().await.upsert(item);
        Ok(())
    }

    async fn batch_write(&self, items: Vec<ExchangeRateRecord>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        debug!("Table BATCH PUT of {} items", items.len());
        for item in items {
            inner.upsert(item);
        }
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        condition: KeyCondition,
    ) -> Result<Vec<ExchangeRateRecord>> {
        if index != self.index {
            bail!("Table has no index named {}", index);
        }
        let KeyCondition::TimestampEq(date) = condition;

        let inner = self.inner.lock().await;
        let records: Vec<ExchangeRateRecord> = inner
            .by_timestamp
            .get(&date)
            .into_iter()
            .flatten()
            .filter_map(|currency| inner.items.get(&(currency.clone(), date)).cloned())
            .collect();
        debug!("Table QUERY {} returned {} items", condition, records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(currency: &str, rate: &str, date: NaiveDate) -> ExchangeRateRecord {
        ExchangeRateRecord {
            currency: currency.to_string(),
            rate: Decimal::from_str(rate).unwrap(),
            timestamp: date,
        }
    }

    #[tokio::test]
    async fn test_memory_table_put_query() {
        let table = MemoryTable::new("TSIndex");
        let today = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();
        let yesterday = today.pred_opt().unwrap();

        table.put_item(record("USD", "1.0934", today)).await.unwrap();
        table.put_item(record("USD", "1.09", yesterday)).await.unwrap();
        table.put_item(record("JPY", "171.21", today)).await.unwrap();

        let items = table
            .query("TSIndex", KeyCondition::TimestampEq(today))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|r| r.timestamp == today));

        let items = table
            .query("TSIndex", KeyCondition::TimestampEq(yesterday))
            .await
            .unwrap();
        assert_eq!(items, vec![record("USD", "1.09", yesterday)]);
    }

    #[tokio::test]
    async fn test_memory_table_upsert() {
        let table = MemoryTable::new("TSIndex");
        let today = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();

        table.put_item(record("USD", "1.0", today)).await.unwrap();
        table
            .batch_write(vec![record("USD", "1.0934", today)])
            .await
            .unwrap();

        assert_eq!(table.len().await, 1);
        let items = table
            .query("TSIndex", KeyCondition::TimestampEq(today))
            .await
            .unwrap();
        assert_eq!(items, vec![record("USD", "1.0934", today)]);
    }

    #[tokio::test]
    async fn test_memory_table_empty_query() {
        let table = MemoryTable::new("TSIndex");
        let today = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();

        assert!(table.is_empty().await);
        let items = table
            .query("TSIndex", KeyCondition::TimestampEq(today))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_memory_table_unknown_index() {
        let table = MemoryTable::new("TSIndex");
        let today = NaiveDate::from_ymd_opt(2024, 7, 17).unwrap();

        let result = table
            .query("CurrencyIndex", KeyCondition::TimestampEq(today))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Table has no index named CurrencyIndex"
        );
    }
}
